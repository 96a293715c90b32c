//! Header Codec
//!
//! Encodes and decodes the fixed leading bytes of every container.
//!
//! ## Base Header (all revisions)
//! ```text
//! ┌──────────────────────┬──────────────┬─────────────────────────┐
//! │ Signature (4, BE)    │ Revision (1) │ Revision-specific bytes │
//! │ 0xB10CF11E           │              │                         │
//! └──────────────────────┴──────────────┴─────────────────────────┘
//! ```
//!
//! Only the base 5 bytes are parsed here. The extension that follows is
//! handed to the engine for the decoded revision.

use std::io::Read;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{FormatError, Result};
use crate::revision::Revision;

/// Magic number identifying a blockfile container (stored big-endian)
pub const SIGNATURE: u32 = 0xB10C_F11E;

/// Base header size: Signature (4) + Revision (1) = 5 bytes
pub const BASE_HEADER_SIZE: u64 = 5;

/// The part of the header shared by every revision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseHeader {
    pub signature: u32,
    pub revision: Revision,
}

/// Encode a header: signature + revision byte + extension, no padding
pub fn encode(revision: Revision, extension: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(BASE_HEADER_SIZE as usize + extension.len());
    buf.put_u32(SIGNATURE);
    buf.put_u8(revision.as_u8());
    buf.put_slice(extension);
    buf.freeze()
}

/// Decode the base header, returning it along with the remaining bytes
///
/// Fewer than `BASE_HEADER_SIZE` bytes is an I/O failure (the read came up
/// short), not a format failure.
pub fn decode(bytes: &[u8]) -> Result<(BaseHeader, &[u8])> {
    if (bytes.len() as u64) < BASE_HEADER_SIZE {
        return Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            format!(
                "header needs {} bytes, got {}",
                BASE_HEADER_SIZE,
                bytes.len()
            ),
        )
        .into());
    }

    let mut cursor = bytes;
    let signature = cursor.get_u32();
    if signature != SIGNATURE {
        return Err(FormatError::BadSignature { found: signature }.into());
    }

    let revision = Revision::try_from(cursor.get_u8())?;

    Ok((BaseHeader { signature, revision }, cursor))
}

/// Read and decode exactly the base header from a reader
pub fn read_base_header<R: Read>(mut reader: R) -> Result<BaseHeader> {
    let mut buf = [0u8; BASE_HEADER_SIZE as usize];
    reader.read_exact(&mut buf)?;
    let (header, _) = decode(&buf)?;
    Ok(header)
}
