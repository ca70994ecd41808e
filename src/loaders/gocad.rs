//! GOCAD TSurf (`.ts`) reader.
//!
//! Supported records: `VRTX`/`PVRTX id x y z`, `ATOM`/`PATOM id ref`,
//! `TRGL a b c`, and `name:` in the header block. Other records (`PROPERTIES`,
//! `TFACE`, `BSTONE`, ...) are ignored.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use glam::DVec3;

use crate::surface::TriangulatedSurface;
use crate::types::ForwardError;

pub fn load_gocad_tsurf(path: impl AsRef<Path>) -> Result<TriangulatedSurface, ForwardError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ForwardError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_gocad_tsurf(&text, path)
}

pub fn parse_gocad_tsurf(text: &str, path: &Path) -> Result<TriangulatedSurface, ForwardError> {
    let err = |line: usize, message: String| ForwardError::Parse {
        path: PathBuf::from(path),
        line,
        message,
    };

    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l.trim()));
    match lines.by_ref().find(|(_, l)| !l.is_empty()) {
        Some((_, first)) if first.starts_with("GOCAD TSurf") => {}
        Some((lineno, first)) => {
            return Err(err(lineno, format!("expected `GOCAD TSurf` header, got `{first}`")));
        }
        None => return Err(err(0, "file is empty".to_string())),
    }

    let mut name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut vertices: Vec<DVec3> = Vec::new();
    let mut ids: HashMap<u64, usize> = HashMap::new();
    let mut triangles: Vec<[usize; 3]> = Vec::new();

    for (lineno, line) in lines {
        if let Some(value) = line.strip_prefix("name:") {
            name = value.trim().to_string();
            continue;
        }
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };
        match keyword {
            "VRTX" | "PVRTX" => {
                let id = parse_id(tokens.next(), lineno, &err)?;
                let mut coord = [0.0; 3];
                for c in &mut coord {
                    *c = parse_f64(tokens.next(), lineno, &err)?;
                }
                ids.insert(id, vertices.len());
                vertices.push(DVec3::from_array(coord));
            }
            "ATOM" | "PATOM" => {
                let id = parse_id(tokens.next(), lineno, &err)?;
                let reference = parse_id(tokens.next(), lineno, &err)?;
                let index = *ids
                    .get(&reference)
                    .ok_or_else(|| err(lineno, format!("ATOM references unknown vertex {reference}")))?;
                ids.insert(id, index);
            }
            "TRGL" => {
                let mut tri = [0usize; 3];
                for v in &mut tri {
                    let id = parse_id(tokens.next(), lineno, &err)?;
                    *v = *ids
                        .get(&id)
                        .ok_or_else(|| err(lineno, format!("TRGL references unknown vertex {id}")))?;
                }
                triangles.push(tri);
            }
            _ => {}
        }
    }

    TriangulatedSurface::new(name, vertices, triangles)
}

fn parse_id<E>(token: Option<&str>, lineno: usize, err: &E) -> Result<u64, ForwardError>
where
    E: Fn(usize, String) -> ForwardError,
{
    let token = token.ok_or_else(|| err(lineno, "missing vertex id".to_string()))?;
    token
        .parse()
        .map_err(|_| err(lineno, format!("bad vertex id `{token}`")))
}

fn parse_f64<E>(token: Option<&str>, lineno: usize, err: &E) -> Result<f64, ForwardError>
where
    E: Fn(usize, String) -> ForwardError,
{
    let token = token.ok_or_else(|| err(lineno, "missing coordinate".to_string()))?;
    token
        .parse()
        .map_err(|_| err(lineno, format!("bad coordinate `{token}`")))
}
