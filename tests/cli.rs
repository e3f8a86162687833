//! Drives the `huffman` binary the way the upload shim does.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

fn huffman(args: &[&Path]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_huffman"))
        .args(args)
        .output()
        .expect("failed to launch huffman")
}

#[test]
fn compress_then_decompress() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("upload.txt");
    let packed = dir.path().join("upload.bin");
    let restored = dir.path().join("restored.txt");
    let text = "It was the best of times, it was the worst of times.\n".repeat(50);
    fs::write(&input, &text).unwrap();

    let out = huffman(&[Path::new("-c"), input.as_path(), packed.as_path()]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(fs::metadata(&packed).unwrap().len() < text.len() as u64);

    let out = huffman(&[Path::new("-d"), packed.as_path(), restored.as_path()]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(fs::read_to_string(&restored).unwrap(), text);
}

#[test]
fn empty_file_round_trips() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("empty.txt");
    let packed = dir.path().join("empty.bin");
    let restored = dir.path().join("empty.out");
    fs::write(&input, b"").unwrap();

    assert!(huffman(&[Path::new("-c"), input.as_path(), packed.as_path()]).status.success());
    assert!(huffman(&[Path::new("-d"), packed.as_path(), restored.as_path()]).status.success());
    assert!(fs::read(&restored).unwrap().is_empty());
}

#[test]
fn missing_mode_fails_with_message() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.txt");
    let output = dir.path().join("out.bin");
    fs::write(&input, b"abc").unwrap();

    let out = huffman(&[input.as_path(), output.as_path()]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("unsupported mode"));
    assert!(!output.exists());
}

#[test]
fn unknown_flag_is_rejected() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.txt");
    let output = dir.path().join("out.bin");
    fs::write(&input, b"abc").unwrap();

    let out = huffman(&[Path::new("-x"), input.as_path(), output.as_path()]);
    assert!(!out.status.success());
    assert!(!out.stderr.is_empty());
    assert!(!output.exists());
}

#[test]
fn corrupt_container_leaves_no_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("corrupt.bin");
    let output = dir.path().join("corrupt.txt");
    fs::write(&input, b"HUFZ\x01 not really").unwrap();

    let out = huffman(&[Path::new("-d"), input.as_path(), output.as_path()]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).starts_with("huffman: "));
    assert!(!output.exists());
}

#[test]
fn missing_input_reports_path() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("nowhere.txt");
    let output = dir.path().join("nowhere.bin");

    let out = huffman(&[Path::new("-c"), input.as_path(), output.as_path()]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("nowhere.txt"));
    assert!(!output.exists());
}
