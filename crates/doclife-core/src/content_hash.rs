//! Content hashing -- SHA-256 over raw document file bytes.
//!
//! Deliberately simple: unlike the structured, field-based content hash used
//! for the issue-tracker domain this codebase was adapted from, a document's
//! canonical identity is its file content on disk. The hash is computed by
//! streaming the file in 4KiB chunks, matching the reference registry's
//! `_calculate_content_hash`.

use sha2::{Digest, Sha256};
use std::io::{self, Read};
use std::path::Path;

const CHUNK_SIZE: usize = 4096;

/// Computes the SHA-256 hex digest of a file's contents, reading in 4KiB
/// chunks so memory use stays bounded regardless of file size.
///
/// Returns `Ok(None)` if the path does not exist (mirrors the reference
/// implementation's behavior of returning `None` for a missing file rather
/// than erroring).
pub fn compute_file_hash(path: impl AsRef<Path>) -> io::Result<Option<String>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Ok(None);
    }

    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; CHUNK_SIZE];

    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(Some(hex::encode(hasher.finalize())))
}

/// Computes the SHA-256 hex digest of an in-memory byte slice, chunked the
/// same way as [`compute_file_hash`]. Useful for tests and for callers that
/// already have the content loaded.
pub fn compute_bytes_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    for chunk in content.chunks(CHUNK_SIZE) {
        hasher.update(chunk);
    }
    hex::encode(hasher.finalize())
}

/// Minimal local hex encoder, avoiding a dependency on the `hex` crate for
/// this one call site.
mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        use std::fmt::Write;
        let bytes = bytes.as_ref();
        let mut s = String::with_capacity(bytes.len() * 2);
        for b in bytes {
            write!(s, "{b:02x}").expect("writing to a String never fails");
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_returns_none() {
        let result = compute_file_hash("/nonexistent/path/to/nowhere.md").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn hash_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.md");
        std::fs::write(&path, b"# Hello\n\nSome content.").unwrap();

        let h1 = compute_file_hash(&path).unwrap().unwrap();
        let h2 = compute_file_hash(&path).unwrap().unwrap();
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64); // SHA-256 hex digest length
    }

    #[test]
    fn hash_changes_with_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.md");
        std::fs::write(&path, b"version one").unwrap();
        let h1 = compute_file_hash(&path).unwrap().unwrap();

        std::fs::write(&path, b"version two").unwrap();
        let h2 = compute_file_hash(&path).unwrap().unwrap();
        assert_ne!(h1, h2);
    }

    #[test]
    fn large_file_chunked_matches_single_shot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.md");
        let mut f = std::fs::File::create(&path).unwrap();
        let content = vec![b'x'; CHUNK_SIZE * 3 + 17];
        f.write_all(&content).unwrap();
        drop(f);

        let from_file = compute_file_hash(&path).unwrap().unwrap();
        let from_bytes = compute_bytes_hash(&content);
        assert_eq!(from_file, from_bytes);
    }
}
