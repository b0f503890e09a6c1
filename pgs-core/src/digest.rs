//! MD5 content digests.
//!
//! Digests are opaque equality tokens for change detection, never a security
//! primitive. Files are hashed in fixed-size blocks so large workbooks and
//! archives are never held in memory twice.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use md5::{Digest, Md5};

use crate::error::{io_err, CoreError};

const BLOCK_SIZE: usize = 4096;

/// Lower-case hex MD5 digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Md5Digest(pub String);

impl fmt::Display for Md5Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Digest of an in-memory buffer.
pub fn md5_bytes(bytes: &[u8]) -> Md5Digest {
    let mut hasher = Md5::new();
    hasher.update(bytes);
    Md5Digest(hex::encode(hasher.finalize()))
}

/// Digest of a file, read block by block.
pub fn md5_file(path: &Path) -> Result<Md5Digest, CoreError> {
    let mut file = File::open(path).map_err(|e| io_err(path, e))?;
    let mut hasher = Md5::new();
    let mut block = [0u8; BLOCK_SIZE];
    loop {
        let n = file.read(&mut block).map_err(|e| io_err(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&block[..n]);
    }
    Ok(Md5Digest(hex::encode(hasher.finalize())))
}

/// Write `digest` as the sole content of `path` (no trailing newline).
pub fn write_digest_file(path: &Path, digest: &Md5Digest) -> Result<(), CoreError> {
    std::fs::write(path, digest.0.as_bytes()).map_err(|e| io_err(path, e))
}
