//! Container Handle
//!
//! The capability surface every engine exposes, regardless of revision.

use std::fmt::Debug;
use std::path::Path;

use crate::error::Result;
use crate::revision::Revision;

/// Operations on an open block container
///
/// Block reads and writes use positioned I/O, so they only need `&self`.
/// `close` releases the underlying file; every later call reports
/// `AlreadyClosed`.
pub trait BlockContainer: Debug + Send + Sync {
    /// Read the block at `index`, exactly `block_size()` bytes
    fn read_block(&self, index: u64) -> Result<Vec<u8>>;

    /// Write `data` as the block at `index`, returning the bytes written
    ///
    /// Short payloads are zero-padded to the block size.
    fn write_block(&self, data: &[u8], index: u64) -> Result<usize>;

    /// Number of whole blocks currently in the container
    fn num_blocks(&self) -> Result<u64>;

    fn block_size(&self) -> u32;

    fn revision(&self) -> Revision;

    fn header_size(&self) -> u64;

    /// Path the container was created or opened with
    fn path(&self) -> &Path;

    fn file_name(&self) -> String {
        self.path().display().to_string()
    }

    fn is_closed(&self) -> bool;

    /// Release the underlying file
    ///
    /// `Ok` means the handle was released; OS-level close errors are not
    /// reported.
    fn close(&mut self) -> Result<()>;

    /// Snapshot of the container's fixed metadata
    fn info(&self) -> ContainerInfo {
        ContainerInfo {
            file_name: self.file_name(),
            revision: self.revision(),
            block_size: self.block_size(),
            header_size: self.header_size(),
        }
    }
}

/// Fixed metadata of an open container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerInfo {
    pub file_name: String,
    pub revision: Revision,
    pub block_size: u32,
    pub header_size: u64,
}

impl ContainerInfo {
    /// Byte offset of the block at `index`, if it fits in a u64
    pub fn block_offset(&self, index: u64) -> Option<u64> {
        index
            .checked_mul(u64::from(self.block_size))
            .and_then(|pos| pos.checked_add(self.header_size))
    }
}
