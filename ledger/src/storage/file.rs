//! File-backed chain storage.
//!
//! Each block is a separate file named `<index>_block` under a chain
//! directory. A file's contents are `SHA256(signature):32 ‖ pack(block)`;
//! the leading hash is discarded on load and rederived from the signature.
//! Directory enumeration is reconstructed by sorting filenames on their
//! numeric prefix rather than trusting OS listing order.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::crypto::sha256;

use super::ChainStore;

const SIGNATURE_LEN: usize = 64;
const HASH_LEN: usize = 32;

/// Storage-level error type.
#[derive(Debug)]
pub enum StorageError {
    Io(io::Error),
    /// A block file was too short to contain even the leading hash and a
    /// 64-byte signature.
    TruncatedBlockFile { path: PathBuf, len: usize },
    /// A directory entry's filename didn't parse as `<index>_block`.
    MalformedFilename(PathBuf),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "I/O error: {e}"),
            StorageError::TruncatedBlockFile { path, len } => {
                write!(f, "block file {path:?} too short ({len} bytes)")
            }
            StorageError::MalformedFilename(path) => {
                write!(f, "block filename {path:?} did not match '<index>_block'")
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<io::Error> for StorageError {
    fn from(e: io::Error) -> Self {
        StorageError::Io(e)
    }
}

fn block_file_name(index: u64) -> String {
    format!("{index}_block")
}

fn parse_block_index(file_name: &str) -> Option<u64> {
    file_name.strip_suffix("_block")?.parse().ok()
}

/// Writes a single block's bytes to `<dir>/<index>_block`, creating `dir`
/// if it doesn't already exist.
///
/// `block_bytes` is the `pack()` output of a `Block` or `GenesisBlock`,
/// whose own framing places a 64-byte signature first — that prefix is
/// hashed to produce the leading `SHA256(signature)` this format requires.
pub fn write_block_file(dir: &Path, index: u64, block_bytes: &[u8]) -> Result<(), StorageError> {
    if block_bytes.len() < SIGNATURE_LEN {
        return Err(StorageError::TruncatedBlockFile {
            path: dir.join(block_file_name(index)),
            len: block_bytes.len(),
        });
    }
    fs::create_dir_all(dir)?;
    let hash = sha256(&block_bytes[..SIGNATURE_LEN]);
    let mut contents = Vec::with_capacity(HASH_LEN + block_bytes.len());
    contents.extend_from_slice(&hash);
    contents.extend_from_slice(block_bytes);
    fs::write(dir.join(block_file_name(index)), contents)?;
    Ok(())
}

/// Reads every `<index>_block` file in `dir`, sorted by numeric index, and
/// returns each one's `pack(block)` bytes with the leading hash stripped.
pub fn read_chain_dir(dir: &Path) -> Result<Vec<Vec<u8>>, StorageError> {
    let mut entries: Vec<(u64, PathBuf)> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_name = entry.file_name();
        let file_name = file_name.to_string_lossy();
        let index =
            parse_block_index(&file_name).ok_or_else(|| StorageError::MalformedFilename(path.clone()))?;
        entries.push((index, path));
    }
    entries.sort_by_key(|(index, _)| *index);

    let mut blocks = Vec::with_capacity(entries.len());
    for (_, path) in entries {
        let contents = fs::read(&path)?;
        if contents.len() < HASH_LEN {
            return Err(StorageError::TruncatedBlockFile {
                path,
                len: contents.len(),
            });
        }
        blocks.push(contents[HASH_LEN..].to_vec());
    }
    Ok(blocks)
}

/// File-backed [`ChainStore`]: one directory, one file per block, indexed
/// by append order.
pub struct FileChainStore {
    dir: PathBuf,
    next_index: u64,
}

impl FileChainStore {
    /// Opens `dir`, scanning any blocks already there once so later
    /// `append` calls don't need to re-read the whole directory.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        let next_index = if dir.exists() {
            read_chain_dir(&dir)?.len() as u64
        } else {
            0
        };
        Ok(FileChainStore { dir, next_index })
    }
}

impl ChainStore for FileChainStore {
    fn append(&mut self, block_bytes: &[u8]) -> Result<(), StorageError> {
        write_block_file(&self.dir, self.next_index, block_bytes)?;
        self.next_index += 1;
        Ok(())
    }

    fn blocks(&self) -> Result<Vec<Vec<u8>>, StorageError> {
        read_chain_dir(&self.dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fake_block(signature_byte: u8, body_byte: u8) -> Vec<u8> {
        let mut bytes = vec![signature_byte; SIGNATURE_LEN];
        bytes.extend_from_slice(&[body_byte; 16]);
        bytes
    }

    #[test]
    fn write_then_read_chain_dir_strips_leading_hash() {
        let tmp = TempDir::new().expect("create temp dir");
        let block = fake_block(1, 9);
        write_block_file(tmp.path(), 0, &block).expect("write block file");

        let blocks = read_chain_dir(tmp.path()).expect("read chain dir");
        assert_eq!(blocks, vec![block]);
    }

    #[test]
    fn read_chain_dir_sorts_by_numeric_prefix_not_lexicographic_order() {
        let tmp = TempDir::new().expect("create temp dir");
        // Lexicographic order would put "10_block" before "2_block".
        for i in [0u64, 1, 2, 10] {
            write_block_file(tmp.path(), i, &fake_block(i as u8, i as u8)).unwrap();
        }

        let blocks = read_chain_dir(tmp.path()).expect("read chain dir");
        let first_bytes: Vec<u8> = blocks.iter().map(|b| b[0]).collect();
        assert_eq!(first_bytes, vec![0, 1, 2, 10]);
    }

    #[test]
    fn rejects_truncated_block_file() {
        let tmp = TempDir::new().expect("create temp dir");
        let err = write_block_file(tmp.path(), 0, &[0u8; 10]);
        assert!(matches!(err, Err(StorageError::TruncatedBlockFile { .. })));
    }

    #[test]
    fn file_chain_store_append_roundtrips() {
        let tmp = TempDir::new().expect("create temp dir");
        let mut store = FileChainStore::new(tmp.path()).unwrap();
        store.append(&fake_block(1, 1)).unwrap();
        store.append(&fake_block(2, 2)).unwrap();
        assert_eq!(store.len().unwrap(), 2);
    }
}
