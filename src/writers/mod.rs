//! Writers for the run artifacts.
//!
//! Each format has a `write_*_to` variant over any [`std::io::Write`] and a
//! path-based wrapper that buffers a freshly created file.

pub mod npy;
pub mod ubc;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::types::ForwardError;

pub use npy::{npy_header, write_npy_f64, write_npy_f64_to};
pub use ubc::{
    write_mesh, write_mesh_to, write_model, write_model_to, write_observations,
    write_observations_to,
};

pub(crate) fn with_file(
    path: &Path,
    body: impl FnOnce(&mut BufWriter<File>) -> Result<(), ForwardError>,
) -> Result<(), ForwardError> {
    let file = File::create(path).map_err(|source| ForwardError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    body(&mut writer)?;
    writer.flush()?;
    Ok(())
}
