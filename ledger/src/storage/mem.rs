//! In-memory chain store, for tests and small devnets.

use super::file::StorageError;
use super::ChainStore;

/// In-memory implementation of [`ChainStore`]: a plain `Vec` of packed
/// block bytes in append order.
#[derive(Default)]
pub struct InMemoryChainStore {
    blocks: Vec<Vec<u8>>,
}

impl InMemoryChainStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChainStore for InMemoryChainStore {
    fn append(&mut self, block_bytes: &[u8]) -> Result<(), StorageError> {
        self.blocks.push(block_bytes.to_vec());
        Ok(())
    }

    fn blocks(&self) -> Result<Vec<Vec<u8>>, StorageError> {
        Ok(self.blocks.clone())
    }
}
