//! UBC-GIF text formats: gravity observations, tensor mesh and cell model.

use std::io::Write;
use std::path::Path;

use crate::forward::Observations;
use crate::grid::{Axis, TensorMesh};
use crate::survey::ReceiverSet;
use crate::types::ForwardError;
use crate::writers::with_file;

/// Count line, then `x y z gz uncertainty` per receiver in receiver order.
pub fn write_observations_to<W: Write>(
    writer: &mut W,
    receivers: &ReceiverSet,
    observations: &Observations,
) -> Result<(), ForwardError> {
    ForwardError::check_len("observations", receivers.len(), observations.values.len())?;
    ForwardError::check_len(
        "uncertainties",
        receivers.len(),
        observations.uncertainties.len(),
    )?;

    writeln!(writer, "{}", receivers.len())?;
    for ((p, d), sigma) in receivers
        .locations()
        .iter()
        .zip(&observations.values)
        .zip(&observations.uncertainties)
    {
        writeln!(
            writer,
            "{:.6e} {:.6e} {:.6e} {:.6e} {:.6e}",
            p.x, p.y, p.z, d, sigma
        )?;
    }
    Ok(())
}

pub fn write_observations(
    path: impl AsRef<Path>,
    receivers: &ReceiverSet,
    observations: &Observations,
) -> Result<(), ForwardError> {
    with_file(path.as_ref(), |w| {
        write_observations_to(w, receivers, observations)
    })
}

/// Shape, south-west-top corner, then cell widths along x, y and z (top down).
pub fn write_mesh_to<W: Write>(writer: &mut W, mesh: &TensorMesh) -> Result<(), ForwardError> {
    let [nx, ny, nz] = mesh.shape();
    let origin = mesh.origin();
    writeln!(writer, "{nx} {ny} {nz}")?;
    writeln!(writer, "{} {} {}", origin.x, origin.y, mesh.top())?;
    write_widths(writer, mesh.widths(Axis::X).iter())?;
    write_widths(writer, mesh.widths(Axis::Y).iter())?;
    write_widths(writer, mesh.widths(Axis::Z).iter().rev())?;
    Ok(())
}

pub fn write_mesh(path: impl AsRef<Path>, mesh: &TensorMesh) -> Result<(), ForwardError> {
    with_file(path.as_ref(), |w| write_mesh_to(w, mesh))
}

fn write_widths<'a, W: Write>(
    writer: &mut W,
    widths: impl Iterator<Item = &'a f64>,
) -> Result<(), ForwardError> {
    let line = widths
        .map(|w| w.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(writer, "{line}")?;
    Ok(())
}

/// One value per line for a full-mesh vector: z fastest from the top, then x, then y.
pub fn write_model_to<W: Write>(
    writer: &mut W,
    mesh: &TensorMesh,
    values: &[f64],
) -> Result<(), ForwardError> {
    ForwardError::check_len("model", mesh.n_cells(), values.len())?;
    let [nx, ny, nz] = mesh.shape();
    for j in 0..ny {
        for i in 0..nx {
            for k in (0..nz).rev() {
                writeln!(writer, "{}", values[mesh.cell_index(i, j, k)])?;
            }
        }
    }
    Ok(())
}

pub fn write_model(
    path: impl AsRef<Path>,
    mesh: &TensorMesh,
    values: &[f64],
) -> Result<(), ForwardError> {
    with_file(path.as_ref(), |w| write_model_to(w, mesh, values))
}
