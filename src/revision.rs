//! Version Dispatcher
//!
//! Maps a format revision to the engine that serves it. This is the one
//! place a new revision gets wired in.
//!
//! ## Known Revisions
//! - 1: fixed-size blocks (implemented)
//! - 2, 3: reserved; recognised but rejected as not implemented
//!
//! Any other revision byte is not a blockfile format at all and is rejected
//! as unsupported.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::path::Path;

use crate::config::{Config, OversizedWrite};
use crate::container::BlockContainer;
use crate::engine::BlockFileV1;
use crate::error::{BlockFileError, FormatError, Result};
use crate::header;

/// Container format revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Revision {
    V1 = 1,
    V2 = 2,
    V3 = 3,
}

impl Revision {
    /// Every enumerated revision, implemented or not
    pub const ALL: [Revision; 3] = [Revision::V1, Revision::V2, Revision::V3];

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether this build has an engine for the revision
    pub fn is_implemented(self) -> bool {
        self.engine().is_some()
    }

    /// Engine constructors for the revision, `None` while unimplemented
    ///
    /// New revisions are wired in here and nowhere else.
    fn engine(self) -> Option<EngineEntry> {
        match self {
            Revision::V1 => Some(EngineEntry {
                create: create_v1,
                open: open_v1,
            }),
            Revision::V2 | Revision::V3 => None,
        }
    }

    /// Engine constructors, or `UnimplementedRevision`
    fn require_engine(self) -> Result<EngineEntry> {
        self.engine().ok_or(BlockFileError::UnimplementedRevision(self))
    }
}

/// Constructors for one revision's engine
#[derive(Clone, Copy)]
struct EngineEntry {
    create: fn(&Path, &Config) -> Result<Box<dyn BlockContainer>>,
    open: fn(File, &Path, OversizedWrite) -> Result<Box<dyn BlockContainer>>,
}

fn create_v1(path: &Path, config: &Config) -> Result<Box<dyn BlockContainer>> {
    Ok(Box::new(BlockFileV1::create_with(path, config)?))
}

fn open_v1(
    file: File,
    path: &Path,
    oversized_writes: OversizedWrite,
) -> Result<Box<dyn BlockContainer>> {
    Ok(Box::new(BlockFileV1::from_file(file, path, oversized_writes)?))
}

impl TryFrom<u8> for Revision {
    type Error = FormatError;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(Revision::V1),
            2 => Ok(Revision::V2),
            3 => Ok(Revision::V3),
            other => Err(FormatError::UnsupportedRevision(other)),
        }
    }
}

impl From<Revision> for u8 {
    fn from(revision: Revision) -> Self {
        revision.as_u8()
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{}", self.as_u8())
    }
}

// =============================================================================
// Construction Entry Points
// =============================================================================

/// Create a new container at `path` with the given revision and block size
///
/// A revision byte outside the enumerated set fails with
/// `FormatError::UnsupportedRevision`; an enumerated but unimplemented one
/// fails with `UnimplementedRevision`.
pub fn create_container(
    path: impl AsRef<Path>,
    revision: u8,
    block_size: u32,
) -> Result<Box<dyn BlockContainer>> {
    let config = Config::builder()
        .revision(Revision::try_from(revision)?)
        .block_size(block_size)
        .build();
    create_container_with(path, &config)
}

/// Create a new container from a full `Config`
pub fn create_container_with(
    path: impl AsRef<Path>,
    config: &Config,
) -> Result<Box<dyn BlockContainer>> {
    let path = path.as_ref();
    tracing::debug!(
        "create_container: path={}, revision={}, block_size={}",
        path.display(),
        config.revision,
        config.block_size
    );

    let engine = config.revision.require_engine()?;
    (engine.create)(path, config)
}

/// Open an existing container, dispatching on the revision in its header
pub fn open_container(path: impl AsRef<Path>) -> Result<Box<dyn BlockContainer>> {
    open_container_with(path, OversizedWrite::default())
}

/// Open an existing container with the given oversized write policy
///
/// Revision and block size always come from the header on disk.
pub fn open_container_with(
    path: impl AsRef<Path>,
    oversized_writes: OversizedWrite,
) -> Result<Box<dyn BlockContainer>> {
    let path = path.as_ref();
    let mut file = OpenOptions::new().read(true).write(true).open(path)?;

    let base = header::read_base_header(&mut file)?;
    tracing::debug!(
        "open_container: path={}, revision={}",
        path.display(),
        base.revision
    );

    let engine = base.revision.require_engine()?;
    (engine.open)(file, path, oversized_writes)
}
