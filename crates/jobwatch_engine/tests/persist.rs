use std::fs;

use jobwatch_engine::{ensure_output_dir, AtomicFileWriter};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("state").join("nested");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing_content() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().join("jobs_data.json"));

    let first = writer.write("{}").unwrap().to_path_buf();
    assert_eq!(first.file_name().unwrap(), "jobs_data.json");
    assert_eq!(fs::read_to_string(&first).unwrap(), "{}");

    let second = writer.write(r#"{"Acme": []}"#).unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(second).unwrap(), r#"{"Acme": []}"#);
}

#[test]
fn write_creates_parent_directory() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("data").join("jobs_data.json");
    let writer = AtomicFileWriter::new(&target);

    writer.write("{}").unwrap();
    assert!(target.is_file());
}

#[test]
fn no_stray_files_are_left_behind() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().join("jobs_data.json"));
    writer.write("a").unwrap();
    writer.write("b").unwrap();

    let entries: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec!["jobs_data.json"]);
}

#[test]
fn failed_write_keeps_nothing_when_parent_is_a_file() {
    let temp = TempDir::new().unwrap();
    let not_a_dir = temp.path().join("not_a_dir");
    fs::write(&not_a_dir, "x").unwrap();

    let writer = AtomicFileWriter::new(not_a_dir.join("jobs_data.json"));
    assert!(writer.write("data").is_err());
    assert_eq!(fs::read_to_string(&not_a_dir).unwrap(), "x");
}
