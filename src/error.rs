//! Error types for blockfile
//!
//! Provides a unified error type for all container operations.

use thiserror::Error;

use crate::revision::Revision;

/// Result type alias using BlockFileError
pub type Result<T> = std::result::Result<T, BlockFileError>;

/// Unified error type for blockfile operations
#[derive(Debug, Error)]
pub enum BlockFileError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("short read at offset {offset}: requested {expected} bytes, read {actual}")]
    ShortRead {
        offset: u64,
        expected: usize,
        actual: usize,
    },

    #[error("short write at offset {offset}: expected to write {expected} bytes, wrote {actual}")]
    ShortWrite {
        offset: u64,
        expected: usize,
        actual: usize,
    },

    // -------------------------------------------------------------------------
    // Format Errors
    // -------------------------------------------------------------------------
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    #[error("revision {0} is not implemented")]
    UnimplementedRevision(Revision),

    #[error(
        "block area is not a whole number of blocks: {blocks} blocks + {remainder} trailing bytes"
    )]
    MisalignedBlockArea { blocks: u64, remainder: u64 },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Lifecycle Errors
    // -------------------------------------------------------------------------
    #[error("container is already closed")]
    AlreadyClosed,
}

/// Header validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error(
        "bad signature: expected {expected:#010x}, found {found:#010x}",
        expected = crate::header::SIGNATURE
    )]
    BadSignature { found: u32 },

    #[error("unsupported revision: {0}")]
    UnsupportedRevision(u8),

    #[error("header declares a block size of 0")]
    ZeroBlockSize,

    #[error("revision mismatch: engine handles {expected}, header says {found}")]
    RevisionMismatch { expected: u8, found: u8 },
}

impl BlockFileError {
    /// True for failed or short reads/writes and open/stat failures
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            BlockFileError::Io(_)
                | BlockFileError::ShortRead { .. }
                | BlockFileError::ShortWrite { .. }
        )
    }

    pub fn is_format(&self) -> bool {
        matches!(self, BlockFileError::Format(_))
    }

    pub fn is_config(&self) -> bool {
        matches!(self, BlockFileError::Config(_))
    }

    /// Floor block count carried by a misaligned block area.
    ///
    /// Lets callers keep going in a degraded, read-only mode.
    pub fn floor_block_count(&self) -> Option<u64> {
        match self {
            BlockFileError::MisalignedBlockArea { blocks, .. } => Some(*blocks),
            _ => None,
        }
    }
}
