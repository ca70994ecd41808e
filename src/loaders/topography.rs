//! Topography sample reader: one header line, then `x y z` rows.

use std::path::{Path, PathBuf};

use glam::DVec3;

use crate::topography::Topography;
use crate::types::ForwardError;

pub fn load_topography(path: impl AsRef<Path>) -> Result<Topography, ForwardError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ForwardError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_topography(&text, path)
}

pub fn parse_topography(text: &str, path: &Path) -> Result<Topography, ForwardError> {
    let mut points = Vec::new();
    for (i, line) in text.lines().enumerate().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let values: Vec<&str> = line.split_whitespace().collect();
        if values.len() != 3 {
            return Err(ForwardError::Parse {
                path: PathBuf::from(path),
                line: i + 1,
                message: format!("expected 3 columns, got {}", values.len()),
            });
        }
        let mut xyz = [0.0; 3];
        for (v, token) in xyz.iter_mut().zip(&values) {
            *v = token.parse().map_err(|_| ForwardError::Parse {
                path: PathBuf::from(path),
                line: i + 1,
                message: format!("bad number `{token}`"),
            })?;
        }
        points.push(DVec3::from_array(xyz));
    }
    Topography::new(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_header_and_blank_lines() {
        let text = "3\n0 0 10\n\n1 0 11.5\n  0 1 12 \n";
        let topo = parse_topography(text, Path::new("topo.dat")).unwrap();
        assert_eq!(topo.points().len(), 3);
        assert_eq!(topo.points()[1], DVec3::new(1.0, 0.0, 11.5));
    }

    #[test]
    fn rejects_malformed_rows() {
        let err = parse_topography("h\n0 0\n", Path::new("t.dat")).unwrap_err();
        assert!(matches!(err, ForwardError::Parse { line: 2, .. }));
        let err = parse_topography("h\n0 0 x\n", Path::new("t.dat")).unwrap_err();
        assert!(matches!(err, ForwardError::Parse { line: 2, .. }));
    }

    #[test]
    fn header_only_is_empty_input() {
        let err = parse_topography("header\n", Path::new("t.dat")).unwrap_err();
        assert!(matches!(err, ForwardError::EmptyInput(_)));
    }
}
