//! Shared Container
//!
//! A cloneable, thread-safe handle around any `BlockContainer`.
//!
//! ## Concurrency Model: Single-Writer / Multiple-Reader (SWMR)
//!
//! - **Reads** (`read_block`, `num_blocks`, `info`): take the read lock, so
//!   any number run at once
//! - **Writes** (`write_block`, `append_block`, `close`): take the write
//!   lock, so a `num_blocks` call can never observe a file that a write is
//!   in the middle of extending

use std::sync::Arc;

use parking_lot::RwLock;

use crate::container::{BlockContainer, ContainerInfo};
use crate::error::Result;

/// Thread-safe handle to one open container
#[derive(Clone, Debug)]
pub struct SharedContainer {
    inner: Arc<RwLock<Box<dyn BlockContainer>>>,
}

impl SharedContainer {
    /// Take ownership of an open container
    pub fn new(container: Box<dyn BlockContainer>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(container)),
        }
    }

    pub fn read_block(&self, index: u64) -> Result<Vec<u8>> {
        self.inner.read().read_block(index)
    }

    pub fn write_block(&self, data: &[u8], index: u64) -> Result<usize> {
        self.inner.write().write_block(data, index)
    }

    /// Write `data` as a new block after the last whole block
    ///
    /// Returns the index it was written at. Fails without writing if the
    /// block area is misaligned.
    pub fn append_block(&self, data: &[u8]) -> Result<u64> {
        let container = self.inner.write();
        let index = container.num_blocks()?;
        container.write_block(data, index)?;
        Ok(index)
    }

    pub fn num_blocks(&self) -> Result<u64> {
        self.inner.read().num_blocks()
    }

    pub fn info(&self) -> ContainerInfo {
        self.inner.read().info()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.read().is_closed()
    }

    /// Close the underlying container for every clone of this handle
    pub fn close(&self) -> Result<()> {
        self.inner.write().close()
    }
}

impl From<Box<dyn BlockContainer>> for SharedContainer {
    fn from(container: Box<dyn BlockContainer>) -> Self {
        Self::new(container)
    }
}
