//! Content digests using SHA-256

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Length of a hex-encoded SHA-256 digest
pub const DIGEST_HEX_LEN: usize = 64;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Failure to produce a digest for a file.
///
/// Opening and reading are reported separately so a vanished or locked
/// file is never confused with one that went bad halfway through.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The file could not be opened.
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file was opened but reading its content failed.
    #[error("read failed for {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ReadError {
    /// Path of the file that could not be digested
    pub fn path(&self) -> &Path {
        match self {
            Self::Open { path, .. } | Self::Read { path, .. } => path,
        }
    }
}

/// Compute the SHA-256 digest of a file
///
/// # Arguments
/// * `path` - Path to the file
///
/// # Returns
/// Lowercase hex-encoded digest, always [`DIGEST_HEX_LEN`] characters
pub fn hash_file(path: &Path) -> Result<String, ReadError> {
    let file = File::open(path).map_err(|source| ReadError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    hash_reader(file).map_err(|source| ReadError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Stream everything from `reader` through SHA-256
pub fn hash_reader<R: Read>(mut reader: R) -> io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    /// Reader that yields some bytes and then fails
    struct FailingReader {
        served: bool,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.served {
                return Err(io::Error::other("device went away"));
            }
            self.served = true;
            buf[..4].copy_from_slice(b"abcd");
            Ok(4)
        }
    }

    #[test]
    fn test_hash_file_known_value() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"test content").unwrap();

        let hash = hash_file(temp_file.path()).unwrap();
        // SHA-256 of "test content"
        assert_eq!(hash, "6ae8a75555209fd6c44157c0aed8016e763ff435a19cf186f76863140143ff72");
    }

    #[test]
    fn test_hash_empty_file() {
        let temp_file = NamedTempFile::new().unwrap();

        let hash = hash_file(temp_file.path()).unwrap();
        assert_eq!(hash, "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855");
    }

    #[test]
    fn test_hash_spans_multiple_buffers() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let data = vec![0x5au8; READ_BUFFER_SIZE * 3 + 17];
        temp_file.write_all(&data).unwrap();

        let hash = hash_file(temp_file.path()).unwrap();
        assert_eq!(hash, hash_reader(&data[..]).unwrap());
        assert_eq!(hash.len(), DIGEST_HEX_LEN);
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("gone.bin");

        match hash_file(&missing) {
            Err(ReadError::Open { path, source }) => {
                assert_eq!(path, missing);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected open error, got {:?}", other),
        }
    }

    #[test]
    fn test_read_failure_is_reported() {
        let err = hash_reader(FailingReader { served: false }).unwrap_err();
        assert_eq!(err.to_string(), "device went away");
    }

    #[test]
    fn test_error_exposes_path() {
        let err = hash_file(Path::new("/definitely/not/here")).unwrap_err();
        assert_eq!(err.path(), Path::new("/definitely/not/here"));
        assert!(err.to_string().starts_with("cannot open /definitely/not/here"));
    }
}
