//! Tests for the construction entry points and revision dispatch
//!
//! These tests verify:
//! - create_container / open_container pick the right engine
//! - Unsupported vs. not implemented revisions are told apart
//! - Error classification for missing and existing paths

use std::fs;
use std::path::PathBuf;

use blockfile::{
    create_container, create_container_with, open_container, open_container_with,
    BlockContainer, BlockFileError, Config, FormatError, OversizedWrite, Revision,
};
use tempfile::TempDir;

const TEST_BLOCKSIZE: u32 = 64;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_container() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("test.bf");
    (temp_dir, path)
}

/// Write a raw header with the given revision byte and a 64-byte block size
fn write_raw_header(path: &PathBuf, revision: u8) {
    fs::write(path, [0xB1, 0x0C, 0xF1, 0x1E, revision, 0x00, 0x00, 0x00, 0x40]).unwrap();
}

// =============================================================================
// Create Tests
// =============================================================================

#[test]
fn test_create_v1() {
    let (_temp, path) = setup_temp_container();

    let mut container = create_container(&path, 1, TEST_BLOCKSIZE).unwrap();

    assert_eq!(container.revision(), Revision::V1);
    assert_eq!(container.block_size(), TEST_BLOCKSIZE);
    assert_eq!(container.header_size(), 9);
    container.close().unwrap();
}

#[test]
fn test_create_unimplemented_revisions() {
    let (_temp, path) = setup_temp_container();

    for revision in [2u8, 3] {
        let err = create_container(&path, revision, TEST_BLOCKSIZE).unwrap_err();

        assert!(matches!(
            err,
            BlockFileError::UnimplementedRevision(r) if r.as_u8() == revision
        ));
    }
    assert!(!path.exists());
}

#[test]
fn test_create_unsupported_revisions() {
    let (_temp, path) = setup_temp_container();

    for revision in [0u8, 4, 200] {
        let err = create_container(&path, revision, TEST_BLOCKSIZE).unwrap_err();

        assert!(matches!(
            err,
            BlockFileError::Format(FormatError::UnsupportedRevision(r)) if r == revision
        ));
    }
    assert!(!path.exists());
}

#[test]
fn test_create_zero_block_size() {
    let (_temp, path) = setup_temp_container();

    let err = create_container(&path, 1, 0).unwrap_err();

    assert!(err.is_config());
}

#[test]
fn test_create_over_existing_path() {
    let (_temp, path) = setup_temp_container();
    let mut first = create_container(&path, 1, TEST_BLOCKSIZE).unwrap();
    first.write_block(b"keep me", 0).unwrap();
    first.close().unwrap();

    let err = create_container(&path, 1, TEST_BLOCKSIZE).unwrap_err();

    assert!(err.is_config());
    let container = open_container(&path).unwrap();
    assert_eq!(&container.read_block(0).unwrap()[..7], b"keep me");
}

#[test]
fn test_create_with_config() {
    let (_temp, path) = setup_temp_container();
    let config = Config::builder()
        .revision(Revision::V1)
        .block_size(128)
        .oversized_writes(OversizedWrite::Reject)
        .build();

    let container = create_container_with(&path, &config).unwrap();

    assert_eq!(container.block_size(), 128);
    assert!(container.write_block(&[1u8; 129], 0).unwrap_err().is_config());
}

#[test]
fn test_dispatch_follows_revision_table() {
    let temp_dir = TempDir::new().unwrap();

    for revision in Revision::ALL {
        let path = temp_dir.path().join(format!("rev{}.bf", revision.as_u8()));

        let result = create_container(&path, revision.as_u8(), TEST_BLOCKSIZE);

        if revision.is_implemented() {
            assert_eq!(result.unwrap().revision(), revision);
        } else {
            assert!(matches!(
                result,
                Err(BlockFileError::UnimplementedRevision(r)) if r == revision
            ));
            assert!(!path.exists());
        }
    }
}

#[test]
fn test_dispatcher_results_are_debug() {
    let (_temp, path) = setup_temp_container();

    let created = create_container(&path, 1, TEST_BLOCKSIZE);
    let debug = format!("{:?}", created);
    assert!(debug.contains("BlockFileV1"));
    assert!(debug.contains("block_size: 64"));

    let err = create_container(&path, 1, TEST_BLOCKSIZE).unwrap_err();
    assert!(format!("{:?}", err).contains("Config"));
}

// =============================================================================
// Open Tests
// =============================================================================

#[test]
fn test_open_round_trip() {
    let (_temp, path) = setup_temp_container();
    let mut container = create_container(&path, 1, TEST_BLOCKSIZE).unwrap();
    container.write_block(b"block zero", 0).unwrap();
    container.write_block(b"block one", 1).unwrap();
    container.close().unwrap();

    let mut container = open_container(&path).unwrap();

    assert_eq!(container.revision(), Revision::V1);
    assert_eq!(container.block_size(), TEST_BLOCKSIZE);
    assert_eq!(container.num_blocks().unwrap(), 2);
    assert_eq!(&container.read_block(1).unwrap()[..9], b"block one");
    container.close().unwrap();
}

#[test]
fn test_open_missing_path() {
    let (_temp, path) = setup_temp_container();

    let err = open_container(&path).unwrap_err();

    assert!(err.is_io());
}

#[test]
fn test_open_bad_signature() {
    let (_temp, path) = setup_temp_container();
    fs::write(&path, b"not a blockfile at all").unwrap();

    let err = open_container(&path).unwrap_err();

    assert!(matches!(err, BlockFileError::Format(FormatError::BadSignature { .. })));
}

#[test]
fn test_open_unimplemented_revisions() {
    let (_temp, path) = setup_temp_container();

    for revision in [2u8, 3] {
        write_raw_header(&path, revision);

        let err = open_container(&path).unwrap_err();

        assert!(matches!(
            err,
            BlockFileError::UnimplementedRevision(r) if r.as_u8() == revision
        ));
    }
}

#[test]
fn test_open_unsupported_revisions() {
    let (_temp, path) = setup_temp_container();

    for revision in [0u8, 4] {
        write_raw_header(&path, revision);

        let err = open_container(&path).unwrap_err();

        assert!(matches!(
            err,
            BlockFileError::Format(FormatError::UnsupportedRevision(r)) if r == revision
        ));
    }
}

#[test]
fn test_open_empty_file() {
    let (_temp, path) = setup_temp_container();
    fs::write(&path, b"").unwrap();

    let err = open_container(&path).unwrap_err();

    assert!(err.is_io());
}

#[test]
fn test_open_base_header_only() {
    let (_temp, path) = setup_temp_container();
    fs::write(&path, [0xB1, 0x0C, 0xF1, 0x1E, 0x01]).unwrap();

    let err = open_container(&path).unwrap_err();

    assert!(err.is_io());
}

#[test]
fn test_open_with_reject_policy() {
    let (_temp, path) = setup_temp_container();
    let mut container = create_container(&path, 1, 8).unwrap();
    container.close().unwrap();

    let container = open_container_with(&path, OversizedWrite::Reject).unwrap();

    // Block size always comes from the header
    assert_eq!(container.block_size(), 8);
    assert!(container.write_block(b"nine byte", 0).unwrap_err().is_config());
    assert_eq!(container.write_block(b"eight by", 0).unwrap(), 8);
}

#[test]
fn test_open_default_policy_truncates() {
    let (_temp, path) = setup_temp_container();
    let mut container = create_container(&path, 1, 8).unwrap();
    container.close().unwrap();

    let container = open_container_with(&path, OversizedWrite::Truncate).unwrap();

    assert_eq!(container.write_block(b"nine bytes", 0).unwrap(), 8);
    assert_eq!(container.read_block(0).unwrap(), b"nine byt");
}

#[test]
fn test_misaligned_container_reports_floor_count() {
    let (_temp, path) = setup_temp_container();
    let mut container = create_container(&path, 1, TEST_BLOCKSIZE).unwrap();
    for k in 0..3u64 {
        container.write_block(b"data", k).unwrap();
    }
    container.close().unwrap();

    let mut bytes = fs::read(&path).unwrap();
    bytes.extend_from_slice(b"garbage");
    fs::write(&path, &bytes).unwrap();

    let container = open_container(&path).unwrap();
    let err = container.num_blocks().unwrap_err();

    assert_eq!(err.floor_block_count(), Some(3));
    assert!(matches!(
        err,
        BlockFileError::MisalignedBlockArea { blocks: 3, remainder: 7 }
    ));
    // Degraded mode: whole blocks are still readable
    assert_eq!(&container.read_block(2).unwrap()[..4], b"data");
}
