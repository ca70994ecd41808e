//! NumPy `.npy` (format 1.0) writer for little-endian `f64` arrays in C order.

use std::io::Write;
use std::path::Path;

use crate::types::ForwardError;
use crate::writers::with_file;

const MAGIC: &[u8] = b"\x93NUMPY";
const ALIGN: usize = 64;

/// Full preamble (magic, version, length, padded dict) for an array of `shape`.
pub fn npy_header(shape: &[usize]) -> Result<Vec<u8>, ForwardError> {
    let dims = match shape {
        [n] => format!("({n},)"),
        _ => format!(
            "({})",
            shape
                .iter()
                .map(|n| n.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    };
    let mut dict = format!("{{'descr': '<f8', 'fortran_order': False, 'shape': {dims}, }}");
    // magic + version + u16 length
    let preamble = MAGIC.len() + 2 + 2;
    let used = preamble + dict.len() + 1;
    dict.extend(std::iter::repeat_n(' ', (ALIGN - used % ALIGN) % ALIGN));
    dict.push('\n');

    let len = u16::try_from(dict.len()).map_err(|_| {
        ForwardError::InvalidConfig(format!("npy header too long for shape {shape:?}"))
    })?;
    let mut out = Vec::with_capacity(preamble + dict.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&[1, 0]);
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(dict.as_bytes());
    Ok(out)
}

pub fn write_npy_f64_to<W: Write>(
    writer: &mut W,
    shape: &[usize],
    data: &[f64],
) -> Result<(), ForwardError> {
    ForwardError::check_len("npy data", shape.iter().product(), data.len())?;
    writer.write_all(&npy_header(shape)?)?;
    for v in data {
        writer.write_all(&v.to_le_bytes())?;
    }
    Ok(())
}

pub fn write_npy_f64(
    path: impl AsRef<Path>,
    shape: &[usize],
    data: &[f64],
) -> Result<(), ForwardError> {
    with_file(path.as_ref(), |w| write_npy_f64_to(w, shape, data))
}
