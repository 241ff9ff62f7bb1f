//! Content fingerprints: SHA-256 over the raw file bytes.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use sha2::{Digest, Sha256};

use dgl_core::Fingerprint;

use crate::error::{io_err, StoreError};

/// Stream `path` through SHA-256 and return the lowercase hex digest.
///
/// Depends only on the bytes; name and location never matter.
pub fn fingerprint(path: &Path) -> Result<Fingerprint, StoreError> {
    let file = File::open(path).map_err(|e| io_err(path, e))?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    io::copy(&mut reader, &mut hasher).map_err(|e| io_err(path, e))?;
    Ok(Fingerprint(hex::encode(hasher.finalize())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn identical_bytes_identical_fingerprint() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.gif");
        let nested = tmp.path().join("nested");
        std::fs::create_dir_all(&nested).unwrap();
        let b = nested.join("renamed copy.gif");
        std::fs::write(&a, b"GIF89a\x01\x00").unwrap();
        std::fs::write(&b, b"GIF89a\x01\x00").unwrap();

        assert_eq!(fingerprint(&a).unwrap(), fingerprint(&b).unwrap());
    }

    #[test]
    fn different_bytes_differ() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.gif");
        let b = tmp.path().join("b.gif");
        std::fs::write(&a, b"GIF89a-one").unwrap();
        std::fs::write(&b, b"GIF89a-two").unwrap();

        assert_ne!(fingerprint(&a).unwrap(), fingerprint(&b).unwrap());
    }

    #[test]
    fn known_digest_of_empty_file() {
        let tmp = TempDir::new().unwrap();
        let empty = tmp.path().join("empty.gif");
        std::fs::write(&empty, b"").unwrap();

        assert_eq!(
            fingerprint(&empty).unwrap().as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn missing_file_reports_path() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing.gif");
        let err = fingerprint(&missing).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }), "got: {err}");
        assert!(err.to_string().contains("missing.gif"));
    }
}
