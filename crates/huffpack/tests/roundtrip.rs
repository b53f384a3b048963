//! Archive round-trip tests over real files

use std::fs;
use std::path::{Path, PathBuf};

use huffpack::{ARCHIVE_EXTENSION, CancelToken, Error, NoProgress, ProgressSink, decode, encode};
use tempfile::TempDir;

fn write_source(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write source");
    path
}

/// Encode `content`, decode the result, and hand back the restored bytes
/// along with the archive path.
fn round_trip(name: &str, content: &[u8]) -> (Vec<u8>, PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let source = write_source(&dir, name, content);
    let token = CancelToken::new();

    let report = encode(
        &source,
        &dir.path().join("packed"),
        &token,
        &mut NoProgress,
    )
    .expect("encode");
    assert_eq!(report.original_size, content.len() as u64);

    let archive = dir.path().join(format!("packed.{ARCHIVE_EXTENSION}"));
    assert_eq!(report.archive_size, fs::metadata(&archive).expect("meta").len());

    let restored = decode(
        &archive,
        &dir.path().join("restored"),
        &token,
        &mut NoProgress,
    )
    .expect("decode");
    let restored_bytes = fs::read(restored).expect("read restored");
    // Persist the temp dir so the returned archive path stays valid for
    // callers that read it after this helper returns.
    let _ = dir.keep();
    (restored_bytes, archive)
}

#[test]
fn test_round_trip_text() {
    let content = b"the quick brown fox jumps over the lazy dog";
    let (restored, _) = round_trip("fox.txt", content);
    assert_eq!(restored, content);
}

#[test]
fn test_round_trip_empty_file() {
    let (restored, _) = round_trip("empty.bin", b"");
    assert_eq!(restored, b"");
}

#[test]
fn test_round_trip_single_byte() {
    let (restored, _) = round_trip("one.dat", &[42]);
    assert_eq!(restored, vec![42]);
}

#[test]
fn test_round_trip_single_repeated_byte() {
    let content = vec![7u8; 4096];
    let (restored, _) = round_trip("same.raw", &content);
    assert_eq!(restored, content);
}

#[test]
fn test_round_trip_all_byte_values() {
    let content: Vec<u8> = (0..=255u8).cycle().take(3000).collect();
    let (restored, _) = round_trip("all.bin", &content);
    assert_eq!(restored, content);
}

#[test]
fn test_archives_are_deterministic() {
    let content: Vec<u8> = b"mississippi".repeat(50);
    let (_, first) = round_trip("a.txt", &content);
    let (_, second) = round_trip("b.txt", &content);
    assert_eq!(
        fs::read(first).expect("read"),
        fs::read(second).expect("read")
    );
}

#[test]
fn test_exact_archive_bytes() {
    // Two distinct values: codes collapse to one bit each, so the whole
    // archive is predictable by hand.
    let (_, archive) = round_trip("x.bin", b"AAAB");
    let expected = [
        3, b'b', b'i', b'n', // extension
        0, 3, // node count
        0, 65, 0, 0, // leaf 'A'
        0, 66, 0, 1, // leaf 'B'
        0, 0, 0, 1, // root
        4, 10, // size digits + sentinel
        0b0001_0000, // payload: 0001 padded
    ];
    assert_eq!(fs::read(archive).expect("read"), expected);
}

#[test]
fn test_estimate_matches_archive_on_disk() {
    let dir = TempDir::new().expect("temp dir");
    let content = b"estimate me precisely, please".repeat(17);
    let source = write_source(&dir, "sample.log", &content);
    let token = CancelToken::new();

    let freq = huffpack::FrequencyTable::scan(&source, &token, &mut NoProgress).expect("scan");
    let tree = huffpack::Tree::from_frequencies(&freq);
    let estimate = huffpack::estimate_archive_size(&tree, &freq, &huffpack::extension_of(&source));

    let report = encode(&source, &dir.path().join("out"), &token, &mut NoProgress).expect("encode");
    assert_eq!(estimate, report.archive_size);
}

#[test]
fn test_extension_recovered_from_header() {
    let dir = TempDir::new().expect("temp dir");
    let source = write_source(&dir, "notes.md", b"# heading\nbody\n");
    let token = CancelToken::new();

    encode(&source, &dir.path().join("n"), &token, &mut NoProgress).expect("encode");
    fs::create_dir_all(dir.path().join("out")).expect("out dir");
    let restored = decode(
        &dir.path().join(format!("n.{ARCHIVE_EXTENSION}")),
        &dir.path().join("out/n"),
        &token,
        &mut NoProgress,
    )
    .expect("decode");
    assert_eq!(restored, dir.path().join("out/n.md"));
}

#[test]
fn test_extensionless_source_stays_extensionless() {
    let dir = TempDir::new().expect("temp dir");
    let source = write_source(&dir, "Makefile", b"all:\n\ttrue\n");
    let token = CancelToken::new();

    encode(&source, &dir.path().join("m"), &token, &mut NoProgress).expect("encode");
    let restored = decode(
        &dir.path().join(format!("m.{ARCHIVE_EXTENSION}")),
        &dir.path().join("m_out"),
        &token,
        &mut NoProgress,
    )
    .expect("decode");
    assert_eq!(restored, dir.path().join("m_out"));
}

#[test]
fn test_truncated_payload_is_an_integrity_error() {
    let dir = TempDir::new().expect("temp dir");
    let content: Vec<u8> = (0..=255u8).cycle().take(2000).collect();
    let source = write_source(&dir, "data.bin", &content);
    let token = CancelToken::new();

    encode(&source, &dir.path().join("t"), &token, &mut NoProgress).expect("encode");
    let archive = dir.path().join(format!("t.{ARCHIVE_EXTENSION}"));

    let mut bytes = fs::read(&archive).expect("read");
    bytes.truncate(bytes.len() - 40);
    fs::write(&archive, &bytes).expect("rewrite");

    let result = decode(&archive, &dir.path().join("t_out"), &token, &mut NoProgress);
    match result {
        Err(Error::TruncatedPayload {
            declared,
            recovered,
        }) => {
            assert_eq!(declared, 2000);
            assert!(recovered < declared);
        }
        other => panic!("expected TruncatedPayload, got {other:?}"),
    }
}

#[test]
fn test_trailing_bytes_after_declared_size_are_ignored() {
    let dir = TempDir::new().expect("temp dir");
    let content = b"stop at the declared size";
    let source = write_source(&dir, "data.txt", content);
    let token = CancelToken::new();

    encode(&source, &dir.path().join("g"), &token, &mut NoProgress).expect("encode");
    let archive = dir.path().join(format!("g.{ARCHIVE_EXTENSION}"));

    let mut bytes = fs::read(&archive).expect("read");
    bytes.extend_from_slice(&[0xFF, 0xFF, 0xFF]);
    fs::write(&archive, &bytes).expect("rewrite");

    let restored = decode(&archive, &dir.path().join("g_out"), &token, &mut NoProgress)
        .expect("trailing data must not fail the decode");
    assert_eq!(fs::read(restored).expect("read"), content);
}

#[test]
fn test_cancelling_mid_encode_leaves_truncated_destination() {
    struct CancelAtFirstPercent(CancelToken);

    impl ProgressSink for CancelAtFirstPercent {
        fn on_percent(&mut self) {
            self.0.request_cancel();
        }
    }

    let dir = TempDir::new().expect("temp dir");
    let source = write_source(&dir, "big.bin", &vec![9u8; 100_000]);
    let token = CancelToken::new();
    let mut sink = CancelAtFirstPercent(token.clone());

    let result = encode(&source, &dir.path().join("c"), &token, &mut sink);
    assert!(matches!(result, Err(Error::Cancelled)));

    // The destination exists but was abandoned mid-stream.
    let archive = dir.path().join(format!("c.{ARCHIVE_EXTENSION}"));
    assert!(archive.exists());
    let full = 1 + 3 + 2 + 3 * 4 + 6 + 1 + 100_000 / 8;
    assert!(fs::metadata(&archive).expect("meta").len() < full);
}

#[test]
fn test_missing_source_is_an_io_failure() {
    let dir = TempDir::new().expect("temp dir");
    let result = encode(
        Path::new("definitely/not/here.txt"),
        &dir.path().join("out"),
        &CancelToken::new(),
        &mut NoProgress,
    );
    assert!(matches!(result, Err(Error::Io(_))));
}

mod proptest_roundtrip {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Any content round-trips byte-for-byte
        #[test]
        fn round_trip_arbitrary_content(content in prop::collection::vec(any::<u8>(), 0..2048)) {
            let (restored, _) = round_trip("any.bin", &content);
            prop_assert_eq!(restored, content);
        }
    }
}
