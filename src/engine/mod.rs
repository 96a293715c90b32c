//! Engine Module
//!
//! Concrete block engines, one per implemented revision.
//!
//! ## Responsibilities
//! - Validate or write the header once
//! - Translate block indices into byte offsets
//! - Positioned reads/writes of whole blocks

mod v1;

use std::fs::File;
use std::io;

pub use v1::{BlockFileV1, HEADER_SIZE as V1_HEADER_SIZE};

// =============================================================================
// Positioned I/O
// =============================================================================

#[cfg(unix)]
fn read_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    std::os::unix::fs::FileExt::read_at(file, buf, offset)
}

#[cfg(windows)]
fn read_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    std::os::windows::fs::FileExt::seek_read(file, buf, offset)
}

#[cfg(unix)]
fn write_at(file: &File, buf: &[u8], offset: u64) -> io::Result<usize> {
    std::os::unix::fs::FileExt::write_at(file, buf, offset)
}

#[cfg(windows)]
fn write_at(file: &File, buf: &[u8], offset: u64) -> io::Result<usize> {
    std::os::windows::fs::FileExt::seek_write(file, buf, offset)
}

/// Read into `buf` starting at `offset` until it is full or EOF is hit
///
/// Returns how many bytes were actually read; callers decide whether a
/// short count is an error.
pub(crate) fn read_full_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match read_at(file, &mut buf[filled..], offset + filled as u64) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Write all of `buf` at `offset`, stopping early only if the OS accepts
/// zero bytes
pub(crate) fn write_full_at(file: &File, buf: &[u8], offset: u64) -> io::Result<usize> {
    let mut written = 0;
    while written < buf.len() {
        match write_at(file, &buf[written..], offset + written as u64) {
            Ok(0) => break,
            Ok(n) => written += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(written)
}
