#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const BYTEALYZER_EXE: &str = env!("CARGO_BIN_EXE_bytealyzer");

fn write_fixture(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, bytes).expect("Failed to write fixture");
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(BYTEALYZER_EXE)
        .args(args)
        .env_remove("BYTEALYZER_LOG")
        .output()
        .expect("Failed to run bytealyzer")
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("Non UTF-8 temp path")
}

#[test]
fn test_shows_help() {
    for flag in ["--help", "help", "-h"] {
        // Act
        let output = run(&[flag]);

        // Assert
        assert!(
            output.status.success(),
            "command failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(
            stdout.contains("Usage"),
            "stdout did not look like help text:\n{stdout}"
        );
    }
}

#[test]
fn test_info_valid() {
    // Arrange
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_fixture(&dir, "blob.bin", b"AAAA\0\x01\xFF");

    // Act
    let output = run(&["info", path_str(&path)]);

    // Assert
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("7 bytes")
            && stdout.contains("Most Common: 0x41 (4 times)")
            && stdout.contains("Printable:   4")
            && stdout.contains("Extended:    1"),
        "stdout did not look like info text:\n{stdout}"
    );
}

#[test]
fn test_info_missing_file() {
    // Arrange
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("missing.bin");

    // Act
    let output = run(&["info", path_str(&path)]);

    // Assert
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("File not found"),
        "stderr did not contain expected error text:\n{stderr}"
    );
}

#[test]
fn test_dump_rows() {
    // Arrange
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_fixture(&dir, "blob.bin", b"ABCDEFGHIJ");

    // Act
    let output = run(&["dump", path_str(&path), "--width", "4", "--offset", "0x5"]);

    // Assert
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "00000004  45 46 47 48  |EFGH|",
            "00000008  49 4A        |IJ|",
        ]
    );
}

#[test]
fn test_search_hex_and_text() {
    // Arrange
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_fixture(&dir, "blob.bin", &[0x41, 0x42, 0x43, 0x42]);

    // Act
    let hex = run(&["search", path_str(&path), "42"]);
    let text = run(&["search", path_str(&path), "b", "--mode", "text", "-i"]);

    // Assert
    let stdout = String::from_utf8_lossy(&hex.stdout);
    assert!(
        hex.status.success()
            && stdout.contains("Found 2 match(es)")
            && stdout.contains("0x00000001")
            && stdout.contains("0x00000003"),
        "stdout did not look like search results:\n{stdout}"
    );

    let stdout = String::from_utf8_lossy(&text.stdout);
    assert!(
        text.status.success() && stdout.contains("Found 2 match(es)"),
        "stdout did not look like search results:\n{stdout}"
    );
}

#[test]
fn test_search_invalid_pattern() {
    // Arrange
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_fixture(&dir, "blob.bin", b"data");

    // Act
    let output = run(&["search", path_str(&path), "ABC"]);

    // Assert
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Error:") && stderr.contains("ABC"),
        "stderr did not contain expected error text:\n{stderr}"
    );
}

#[test]
fn test_inspect() {
    // Arrange
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_fixture(&dir, "blob.bin", &[0xFF; 4]);

    // Act
    let output = run(&["inspect", path_str(&path), "0"]);

    // Assert
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success()
            && stdout.contains("i32 LE:  -1")
            && stdout.contains("f32 LE:  invalid"),
        "stdout did not look like inspector text:\n{stdout}"
    );

    // Act - offset past the end
    let output = run(&["inspect", path_str(&path), "0x10"]);

    // Assert
    assert!(!output.status.success());
}

#[test]
fn test_entropy_blocks() {
    // Arrange
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut bytes = vec![0u8; 4];
    bytes.extend([0, 1, 0, 1]);
    let path = write_fixture(&dir, "blob.bin", &bytes);

    // Act
    let output = run(&["entropy", path_str(&path), "--block-size", "4"]);

    // Assert
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["0x00000000  0.0000", "0x00000004  0.1250"]);

    // Act - zero block size is rejected
    let output = run(&["entropy", path_str(&path), "--block-size", "0"]);

    // Assert
    assert!(!output.status.success());
}

#[test]
fn test_patch_writes_edited_copy() {
    // Arrange
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_fixture(&dir, "blob.bin", &[0; 6]);

    // Act
    let output = run(&["patch", path_str(&path), "0x4", "DE AD BE EF"]);

    // Assert
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Patched 2 byte(s) at 0x4"),
        "stdout did not look like patch text:\n{stdout}"
    );

    let edited = fs::read(dir.path().join("edited_blob.bin")).expect("Missing edited file");
    assert_eq!(edited, vec![0, 0, 0, 0, 0xDE, 0xAD]);

    // Input stays untouched
    assert_eq!(fs::read(&path).expect("Missing input file"), vec![0; 6]);
}

#[test]
fn test_patch_custom_output() {
    // Arrange
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_fixture(&dir, "blob.bin", &[0; 3]);
    let out = dir.path().join("out.bin");

    // Act
    let output = run(&["patch", path_str(&path), "1", "7F", "--output", path_str(&out)]);

    // Assert
    assert!(output.status.success());
    assert_eq!(fs::read(&out).expect("Missing output file"), vec![0, 0x7F, 0]);
}

#[test]
fn test_patch_rejects_signed_hex() {
    // Arrange
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_fixture(&dir, "blob.bin", &[0; 3]);

    // Act
    let output = run(&["patch", path_str(&path), "0", "+A"]);

    // Assert
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid hex pattern"),
        "stderr did not contain expected error text:\n{stderr}"
    );
    assert!(!dir.path().join("edited_blob.bin").exists());
}

#[test]
fn test_viz_class_mode() {
    // Arrange
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_fixture(&dir, "blob.bin", &[b'A', 0x00]);

    // Act
    let output = run(&["viz", path_str(&path), "--mode", "class"]);

    // Assert
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["00000000 0 255 0", "00000001 0 0 0"]);
}

#[test]
fn test_config_file() {
    // Arrange
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_fixture(&dir, "blob.bin", b"ABCDEF");
    let config = dir.path().join("engine.toml");
    fs::write(&config, "bytes_per_row = 3\n").expect("Failed to write config");

    // Act
    let output = run(&["dump", path_str(&path), "--config", path_str(&config)]);

    // Assert
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec!["00000000  41 42 43  |ABC|", "00000003  44 45 46  |DEF|"]
    );

    // Act - malformed config
    fs::write(&config, "bytes_per_row = \"wide\"\n").expect("Failed to write config");
    let output = run(&["dump", path_str(&path), "--config", path_str(&config)]);

    // Assert
    assert!(!output.status.success());
}
