//! Deterministic hashing and digests for inputs and results.
//!
//! - Use `sha256_canonical` for JSON values/structs (goes through canonical_json).
//! - Use `sha256_hex` / `sha256_file` for raw bytes/files.
//! - Hex digests are lowercase.
//! - `SIM:<hex>` identifies a simulation result by its canonical bytes, so
//!   identical inputs always produce the identical digest.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::canonical_json::canonical_bytes_of;
use crate::{IoError, IoResult};

/// SHA-256 over raw bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// SHA-256 over the canonical JSON bytes of any serializable value.
pub fn sha256_canonical<T: Serialize>(value: &T) -> IoResult<String> {
    Ok(sha256_hex(&canonical_bytes_of(value)?))
}

/// SHA-256 over a file's raw bytes.
pub fn sha256_file(path: &Path) -> IoResult<String> {
    let f = File::open(path).map_err(|e| IoError::Hash(format!("{}: {e}", path.display())))?;
    let mut r = BufReader::new(f);
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 64 * 1024];
    loop {
        let n = r.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// `SIM:<hex64>` digest of a simulation result (or any serializable output).
pub fn result_digest<T: Serialize>(result: &T) -> IoResult<String> {
    Ok(format!("SIM:{}", sha256_canonical(result)?))
}

/// Lowercase 64-hex check.
pub fn is_hex64(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn known_vector() {
        assert_eq!(sha256_hex(b"abc"), "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
    }

    #[test]
    fn canonical_digest_ignores_key_order() {
        let a = sha256_canonical(&json!({"vaafReal": 1.5, "vaatReal": 2})).unwrap();
        let b = sha256_canonical(&json!({"vaatReal": 2, "vaafReal": 1.5})).unwrap();
        assert_eq!(a, b);
        assert!(is_hex64(&a));
    }

    #[test]
    fn result_digest_is_prefixed() {
        let d = result_digest(&json!({"totalRepassesReal": 20362775.86})).unwrap();
        assert!(d.starts_with("SIM:"));
        assert!(is_hex64(&d[4..]));
    }

    #[test]
    fn file_digest_matches_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("x.bin");
        std::fs::write(&p, b"abc").unwrap();
        assert_eq!(sha256_file(&p).unwrap(), sha256_hex(b"abc"));
        assert!(sha256_file(&dir.path().join("missing")).is_err());
    }
}
