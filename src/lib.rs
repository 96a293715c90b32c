//! # blockfile
//!
//! A versioned, block-oriented binary container:
//! - A small identifying header (signature + format revision)
//! - A region of fixed-size, randomly addressable blocks
//! - Revision dispatch so the format can evolve without breaking old files
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │        create_container / open_container                    │
//! │                (Version Dispatcher)                         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Header    │          │ BlockFileV1 │
//!   │   Codec     │          │  (engine)   │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                         ┌────────────────┐
//!                         │ BlockContainer │
//!                         │    (trait)     │
//!                         └────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use blockfile::{create_container, open_container, BlockContainer};
//!
//! let mut container = create_container("data.bf", 1, 64)?;
//! container.write_block(b"hello", 0)?;
//! container.close()?;
//!
//! let container = open_container("data.bf")?;
//! assert_eq!(&container.read_block(0)?[..5], b"hello");
//! # Ok::<(), blockfile::BlockFileError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod header;
pub mod revision;
pub mod container;
pub mod engine;
pub mod shared;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{BlockFileError, FormatError, Result};
pub use config::{Config, OversizedWrite};
pub use container::{BlockContainer, ContainerInfo};
pub use engine::BlockFileV1;
pub use revision::{
    create_container, create_container_with, open_container, open_container_with, Revision,
};
pub use shared::SharedContainer;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of blockfile
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
