//! Configuration for blockfile containers
//!
//! Creation-time settings with sensible defaults.

use crate::revision::Revision;

/// Default block size used when none is given (4 KiB)
pub const DEFAULT_BLOCK_SIZE: u32 = 4096;

/// Settings used when creating a new container
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Format Configuration
    // -------------------------------------------------------------------------
    /// Format revision written into the header
    pub revision: Revision,

    /// Size of every block in bytes; fixed for the container's lifetime
    pub block_size: u32,

    // -------------------------------------------------------------------------
    // Write Behavior
    // -------------------------------------------------------------------------
    /// What to do with write payloads longer than `block_size`
    pub oversized_writes: OversizedWrite,
}

/// Handling of write payloads longer than the block size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OversizedWrite {
    /// Keep the first `block_size` bytes and drop the rest
    #[default]
    Truncate,

    /// Refuse the write with a configuration error
    Reject,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            revision: Revision::V1,
            block_size: DEFAULT_BLOCK_SIZE,
            oversized_writes: OversizedWrite::Truncate,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the format revision
    pub fn revision(mut self, revision: Revision) -> Self {
        self.config.revision = revision;
        self
    }

    /// Set the block size (in bytes)
    pub fn block_size(mut self, size: u32) -> Self {
        self.config.block_size = size;
        self
    }

    /// Set the oversized write policy
    pub fn oversized_writes(mut self, policy: OversizedWrite) -> Self {
        self.config.oversized_writes = policy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
