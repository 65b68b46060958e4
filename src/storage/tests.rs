use super::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_write_atomic_creates_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("tokenizer.json");

    write_atomic(&path, b"{\"version\":\"1.0\"}").expect("write should succeed");

    assert_eq!(fs::read(&path).unwrap(), b"{\"version\":\"1.0\"}");
    assert!(!temp_path(&path).exists());
}

#[test]
fn test_write_atomic_replaces_existing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tokenizer.json");
    fs::write(&path, "old").unwrap();

    write_atomic(&path, b"new").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "new");
}

#[test]
fn test_write_atomic_missing_parent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing").join("tokenizer.json");

    let err = write_atomic(&path, b"{}").unwrap_err();
    assert!(matches!(err, StorageError::NoParent { .. }));
    assert!(!path.exists());
}

#[test]
fn test_write_atomic_target_is_directory() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tokenizer.json");
    fs::create_dir(&path).unwrap();
    fs::write(path.join("keep"), "x").unwrap();

    let err = write_atomic(&path, b"{}").unwrap_err();
    assert!(matches!(err, StorageError::Io { .. }));
    assert!(!temp_path(&path).exists());
}

#[test]
fn test_temp_path_is_sibling() {
    let path = Path::new("/models/gpt2/tokenizer.json");
    assert_eq!(
        temp_path(path),
        PathBuf::from("/models/gpt2/tokenizer.json.tmp")
    );
}
