use crate::{FileStore, KeyValueStore};

use std::fs;

use googletest::assert_that;
use googletest::prelude::{eq, none, some};
use tempfile::TempDir;

#[test]
fn given_missing_file_when_opened_then_empty_store() {
    // Given
    let temp = TempDir::new().unwrap();

    // When
    let store = FileStore::open(temp.path().join("storage.json")).unwrap();

    // Then
    assert_that!(store.get("user").unwrap(), none());
}

#[test]
fn given_values_set_when_reopened_then_values_survive() {
    // Given
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("storage.json");
    let store = FileStore::open(&path).unwrap();
    store.set("user", r#"{"_id":"1"}"#).unwrap();
    store.set("accessToken", "abc").unwrap();

    // When
    let reopened = FileStore::open(&path).unwrap();

    // Then
    assert_that!(reopened.get("user").unwrap(), some(eq(r#"{"_id":"1"}"#)));
    assert_that!(reopened.get("accessToken").unwrap(), some(eq("abc")));
}

#[test]
fn given_removed_key_when_reopened_then_key_gone() {
    // Given
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("storage.json");
    let store = FileStore::open(&path).unwrap();
    store.set("user", "x").unwrap();
    store.remove("user").unwrap();

    // When
    let reopened = FileStore::open(&path).unwrap();

    // Then
    assert_that!(reopened.get("user").unwrap(), none());
}

#[test]
fn given_nested_missing_directory_when_set_then_directory_created() {
    // Given
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("storage.json");
    let store = FileStore::open(&path).unwrap();

    // When
    store.set("k", "v").unwrap();

    // Then
    assert!(path.exists());
}

#[test]
fn given_corrupted_file_when_opened_then_backed_up_and_empty() {
    // Given
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("storage.json");
    fs::write(&path, "{not json").unwrap();

    // When
    let store = FileStore::open(&path).unwrap();

    // Then
    assert_that!(store.get("user").unwrap(), none());
    assert!(!path.exists());
    let backups = fs::read_dir(temp.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .starts_with("storage.json.corrupted.")
        })
        .count();
    assert_that!(backups, eq(1));
}

#[test]
fn given_successful_write_when_listing_dir_then_no_temp_file_left() {
    // Given
    let temp = TempDir::new().unwrap();
    let store = FileStore::open(temp.path().join("storage.json")).unwrap();

    // When
    store.set("k", "v").unwrap();

    // Then
    let leftovers = fs::read_dir(temp.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().contains(".tmp."))
        .count();
    assert_that!(leftovers, eq(0));
}
