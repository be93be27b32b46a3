use infra_fs::io;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_write_atomic_creates_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("test.json");

    io::write_atomic(&path, b"{}").unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content, "{}");
}

#[test]
fn test_write_atomic_creates_missing_parents() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(".config").join("Claude").join("doc.json");

    io::write_text(&path, "hello").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
}

#[test]
fn test_write_atomic_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("test.json");
    fs::write(&path, "original").unwrap();

    io::write_atomic(&path, b"updated").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "updated");
}

#[test]
fn test_write_atomic_leaves_no_temp_files() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("test.json");

    io::write_atomic(&path, b"one").unwrap();
    io::write_atomic(&path, b"two").unwrap();

    let names: Vec<String> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["test.json".to_string()]);
}

#[test]
fn test_write_atomic_fails_when_parent_is_a_file() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();

    let result = io::write_atomic(&blocker.join("doc.json"), b"{}");
    assert!(matches!(result, Err(infra_fs::Error::Io { .. })));
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "not a directory");
}

#[test]
fn test_read_text_nonexistent_file() {
    let temp = TempDir::new().unwrap();
    let result = io::read_text(&temp.path().join("missing.txt"));
    assert!(result.is_err());
}

#[test]
fn test_read_text_if_exists() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("present.txt");
    fs::write(&path, "hi").unwrap();

    assert_eq!(io::read_text_if_exists(&path).unwrap().as_deref(), Some("hi"));
    assert!(io::read_text_if_exists(&temp.path().join("absent.txt"))
        .unwrap()
        .is_none());
}

#[test]
fn test_error_display_includes_path() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("nope.txt");
    let err = io::read_text(&missing).unwrap_err();
    assert!(err.to_string().contains("nope.txt"));
}
