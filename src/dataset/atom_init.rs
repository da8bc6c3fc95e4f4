//! Per-element initialization vectors
//!
//! The dataset directory convention includes an `atom_init.json` file
//! mapping atomic numbers to fixed embedding-initialization vectors. The
//! graph core does not consume these itself; this loader exists for hosts
//! that feed them to the model.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtomInitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid atom_init file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("non-numeric element key: {0}")]
    BadKey(String),
    #[error("init vector for element {element} has length {got}, expected {expected}")]
    BadLength {
        element: u8,
        got: usize,
        expected: usize,
    },
}

/// Parse an atom_init document: `{"<atomic number>": [f64, ...], ...}`.
/// All vectors must share one length.
pub fn parse_atom_init(json: &str) -> Result<HashMap<u8, Vec<f64>>, AtomInitError> {
    let raw: HashMap<String, Vec<f64>> = serde_json::from_str(json)?;
    let mut out = HashMap::with_capacity(raw.len());
    let mut expected: Option<usize> = None;
    for (key, vector) in raw {
        let element: u8 = key
            .parse()
            .map_err(|_| AtomInitError::BadKey(key.clone()))?;
        match expected {
            None => expected = Some(vector.len()),
            Some(len) if len != vector.len() => {
                return Err(AtomInitError::BadLength {
                    element,
                    got: vector.len(),
                    expected: len,
                });
            }
            Some(_) => {}
        }
        out.insert(element, vector);
    }
    Ok(out)
}

/// Load `atom_init.json` from disk.
pub fn load_atom_init(path: &Path) -> Result<HashMap<u8, Vec<f64>>, AtomInitError> {
    parse_atom_init(&fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let init = parse_atom_init(r#"{"1": [0.0, 1.0], "30": [1.0, 0.5]}"#).unwrap();
        assert_eq!(init.len(), 2);
        assert_eq!(init[&30], vec![1.0, 0.5]);
    }

    #[test]
    fn test_bad_key() {
        let err = parse_atom_init(r#"{"Zn": [1.0]}"#).unwrap_err();
        assert!(matches!(err, AtomInitError::BadKey(_)));
    }

    #[test]
    fn test_inconsistent_lengths() {
        let err = parse_atom_init(r#"{"1": [0.0, 1.0], "6": [1.0]}"#).unwrap_err();
        assert!(matches!(err, AtomInitError::BadLength { .. }));
    }

    #[test]
    fn test_not_json() {
        assert!(matches!(
            parse_atom_init("not json"),
            Err(AtomInitError::Json(_))
        ));
    }
}
