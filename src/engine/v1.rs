//! Revision-1 Block Engine
//!
//! Fixed-size blocks laid out directly after a 9-byte header.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Header (9 bytes, big-endian)                            │
//! │   Signature: u32 (4) | Revision: u8 (1) | BlockSize (4) │
//! ├─────────────────────────────────────────────────────────┤
//! │ Block 0 (block_size bytes)                              │
//! │ Block 1 (block_size bytes)                              │
//! │ ...                                                     │
//! │ Block k-1                                               │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Block `i` lives at `HEADER_SIZE + i * block_size`.

use std::borrow::Cow;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, Write};
use std::path::{Path, PathBuf};

use bytes::Buf;

use crate::config::{Config, OversizedWrite};
use crate::container::BlockContainer;
use crate::error::{BlockFileError, FormatError, Result};
use crate::header::{self, BASE_HEADER_SIZE};
use crate::revision::Revision;

use super::{read_full_at, write_full_at};

/// Header size: base (5) + BlockSize (4) = 9 bytes
pub const HEADER_SIZE: u64 = BASE_HEADER_SIZE + 4;

/// An open revision-1 container
#[derive(Debug)]
pub struct BlockFileV1 {
    /// Path the container was created or opened with
    path: PathBuf,
    /// Size of every block, read from or written to the header
    block_size: u32,
    /// Handling of payloads longer than a block
    oversized_writes: OversizedWrite,
    /// `None` once closed
    file: Option<File>,
}

impl BlockFileV1 {
    /// Create a new container with the given block size
    pub fn create(path: impl AsRef<Path>, block_size: u32) -> Result<Self> {
        let config = Config::builder().block_size(block_size).build();
        Self::create_with(path, &config)
    }

    /// Create a new container from `config`
    ///
    /// The path must not exist yet; the header is written once, as a single
    /// contiguous write, and never touched again.
    pub fn create_with(path: impl AsRef<Path>, config: &Config) -> Result<Self> {
        let path = path.as_ref();

        if config.revision != Revision::V1 {
            return Err(FormatError::RevisionMismatch {
                expected: Revision::V1.as_u8(),
                found: config.revision.as_u8(),
            }
            .into());
        }

        if config.block_size == 0 {
            return Err(BlockFileError::Config(
                "block size of 0 is not allowed".to_string(),
            ));
        }

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => {
                    BlockFileError::Config(format!("{} already exists", path.display()))
                }
                _ => BlockFileError::Io(e),
            })?;

        let header = header::encode(Revision::V1, &config.block_size.to_be_bytes());
        write_header(&mut file, path, &header)?;

        tracing::debug!(
            "Created V1 container {} (block_size={})",
            path.display(),
            config.block_size
        );

        Ok(Self {
            path: path.to_path_buf(),
            block_size: config.block_size,
            oversized_writes: config.oversized_writes,
            file: Some(file),
        })
    }

    /// Open an existing revision-1 container
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Self::from_file(file, path, OversizedWrite::default())
    }

    /// Validate the full header of an already open file and wrap it
    ///
    /// The header is re-read from offset 0 regardless of the current cursor,
    /// which is left at the start of the block region.
    pub fn from_file(
        mut file: File,
        path: impl AsRef<Path>,
        oversized_writes: OversizedWrite,
    ) -> Result<Self> {
        let path = path.as_ref();

        let mut buf = [0u8; HEADER_SIZE as usize];
        file.rewind()?;
        file.read_exact(&mut buf)?;

        let (base, mut extension) = header::decode(&buf)?;
        if base.revision != Revision::V1 {
            return Err(FormatError::RevisionMismatch {
                expected: Revision::V1.as_u8(),
                found: base.revision.as_u8(),
            }
            .into());
        }

        let block_size = extension.get_u32();
        if block_size == 0 {
            return Err(FormatError::ZeroBlockSize.into());
        }

        tracing::debug!(
            "Opened V1 container {} (block_size={})",
            path.display(),
            block_size
        );

        Ok(Self {
            path: path.to_path_buf(),
            block_size,
            oversized_writes,
            file: Some(file),
        })
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn file(&self) -> Result<&File> {
        self.file.as_ref().ok_or(BlockFileError::AlreadyClosed)
    }

    /// Byte offset of block `index`: HEADER_SIZE + index * block_size
    fn block_offset(&self, index: u64) -> Result<u64> {
        index
            .checked_mul(u64::from(self.block_size))
            .and_then(|pos| pos.checked_add(HEADER_SIZE))
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("block index {} overflows the file offset range", index),
                )
                .into()
            })
    }

    /// Pad or cut `data` to exactly one block
    fn normalize<'a>(&self, data: &'a [u8]) -> Result<Cow<'a, [u8]>> {
        let block_size = self.block_size as usize;

        if data.len() == block_size {
            return Ok(Cow::Borrowed(data));
        }

        if data.len() > block_size {
            return match self.oversized_writes {
                OversizedWrite::Truncate => {
                    tracing::warn!(
                        "Truncating {} byte payload to block size {} in {}",
                        data.len(),
                        block_size,
                        self.path.display()
                    );
                    Ok(Cow::Borrowed(&data[..block_size]))
                }
                OversizedWrite::Reject => Err(BlockFileError::Config(format!(
                    "payload of {} bytes exceeds block size {}",
                    data.len(),
                    block_size
                ))),
            };
        }

        let mut block = vec![0u8; block_size];
        block[..data.len()].copy_from_slice(data);
        Ok(Cow::Owned(block))
    }
}

/// Write the header of a freshly created file, removing the file on failure
///
/// A half-written header would make the path unusable: create reports it as
/// existing and open cannot read it.
fn write_header<W: Write>(writer: &mut W, path: &Path, header: &[u8]) -> Result<()> {
    if let Err(e) = writer.write_all(header) {
        tracing::warn!("Header write failed for {}: {}", path.display(), e);
        if let Err(remove_err) = std::fs::remove_file(path) {
            tracing::warn!(
                "Could not remove partial container {}: {}",
                path.display(),
                remove_err
            );
        }
        return Err(e.into());
    }
    Ok(())
}

impl BlockContainer for BlockFileV1 {
    /// Reads past the end of the file are a `ShortRead`, never zero-filled
    fn read_block(&self, index: u64) -> Result<Vec<u8>> {
        let file = self.file()?;
        let offset = self.block_offset(index)?;

        let mut buf = vec![0u8; self.block_size as usize];
        let read = read_full_at(file, &mut buf, offset)?;
        tracing::trace!(
            "read_block: index={}, offset={}, read={}",
            index,
            offset,
            read
        );

        if read != buf.len() {
            return Err(BlockFileError::ShortRead {
                offset,
                expected: buf.len(),
                actual: read,
            });
        }

        Ok(buf)
    }

    fn write_block(&self, data: &[u8], index: u64) -> Result<usize> {
        let file = self.file()?;
        let offset = self.block_offset(index)?;
        let block = self.normalize(data)?;

        let written = write_full_at(file, &block, offset)?;
        tracing::trace!(
            "write_block: index={}, offset={}, written={}",
            index,
            offset,
            written
        );

        if written != block.len() {
            return Err(BlockFileError::ShortWrite {
                offset,
                expected: block.len(),
                actual: written,
            });
        }

        Ok(written)
    }

    fn num_blocks(&self) -> Result<u64> {
        let size = self.file()?.metadata()?.len();

        let block_area = size.checked_sub(HEADER_SIZE).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "{} is {} bytes, shorter than its {} byte header",
                    self.path.display(),
                    size,
                    HEADER_SIZE
                ),
            )
        })?;

        let block_size = u64::from(self.block_size);
        let blocks = block_area / block_size;
        let remainder = block_area % block_size;

        if remainder != 0 {
            tracing::warn!(
                "Misaligned block area in {}: {} blocks + {} trailing bytes",
                self.path.display(),
                blocks,
                remainder
            );
            return Err(BlockFileError::MisalignedBlockArea { blocks, remainder });
        }

        Ok(blocks)
    }

    fn block_size(&self) -> u32 {
        self.block_size
    }

    fn revision(&self) -> Revision {
        Revision::V1
    }

    fn header_size(&self) -> u64 {
        HEADER_SIZE
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn is_closed(&self) -> bool {
        self.file.is_none()
    }

    /// Errors from the OS-level close are not observable through
    /// `std::fs::File`, so `Ok` means the handle was released, not that the
    /// close itself succeeded. Durability needs a sync by the caller.
    fn close(&mut self) -> Result<()> {
        match self.file.take() {
            Some(file) => {
                drop(file);
                tracing::debug!("Closed V1 container {}", self.path.display());
                Ok(())
            }
            None => {
                tracing::warn!("close called twice on {}", self.path.display());
                Err(BlockFileError::AlreadyClosed)
            }
        }
    }
}
