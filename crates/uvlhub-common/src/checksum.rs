//! Checksum utilities for stored files and mirror manifests
//!
//! Hubfile rows carry an MD5 content hash next to the file size; the archival
//! mirror reports SHA-256 checksums in its upload manifests.

use crate::error::{HubError, Result};
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;

/// MD5 content hash plus size for a stored file.
///
/// This is the pair persisted on every hubfile row at dataset creation time.
pub fn file_checksum_and_size(path: impl AsRef<Path>) -> Result<(String, u64)> {
    let size = std::fs::metadata(&path)?.len();
    let mut file = std::fs::File::open(&path)?;

    let mut context = md5::Context::new();
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        context.consume(&buffer[..bytes_read]);
    }

    Ok((format!("{:x}", context.compute()), size))
}

/// SHA-256 checksum of a file, hex encoded.
pub fn sha256_file_checksum(path: impl AsRef<Path>) -> Result<String> {
    let mut file = std::fs::File::open(&path)?;
    sha256_checksum(&mut file)
}

/// SHA-256 checksum of any readable source, hex encoded.
pub fn sha256_checksum<R: Read>(reader: &mut R) -> Result<String> {
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Verify a stored file against its recorded MD5 checksum.
pub fn verify_file_checksum(path: impl AsRef<Path>, expected: &str) -> Result<()> {
    let (actual, _) = file_checksum_and_size(path)?;
    if actual == expected {
        Ok(())
    } else {
        Err(HubError::ChecksumMismatch {
            expected: expected.to_string(),
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::io::Write;

    #[test]
    fn test_sha256_checksum() {
        let data = b"hello world";
        let mut cursor = Cursor::new(data);
        let checksum = sha256_checksum(&mut cursor).unwrap();
        assert_eq!(checksum, "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9");
    }

    #[test]
    fn test_file_checksum_and_size() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello world").unwrap();

        let (checksum, size) = file_checksum_and_size(file.path()).unwrap();
        assert_eq!(checksum, "5eb63bbbe01eeed093cb22bb8f5acdc3");
        assert_eq!(size, 11);
    }

    #[test]
    fn test_verify_file_checksum_mismatch() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello world").unwrap();

        let err = verify_file_checksum(file.path(), "deadbeef").unwrap_err();
        assert!(matches!(err, HubError::ChecksumMismatch { .. }));
    }
}
