#![allow(dead_code)]

use std::sync::Mutex;

use akhra_books::BookManager;
use akhra_config::ConfigManager;
use akhra_storage_json::{JsonBookStorage, StoragePaths};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates isolated managers backed by unique directories for each test.
pub fn setup_test_env() -> (BookManager, ConfigManager) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let paths = StoragePaths {
        book_root: base.join("books"),
        backup_root: base.join("backups"),
    };
    let storage = JsonBookStorage::with_retention(paths, 3).expect("create json storage backend");
    let manager = BookManager::new(Box::new(storage));
    let config_manager =
        ConfigManager::with_base_dir(base).expect("create config manager for temp dir");

    (manager, config_manager)
}

/// Runs the CLI binary in script mode with `home` as its data directory.
pub fn run_script(home: &std::path::Path, script: &str) -> assert_cmd::assert::Assert {
    assert_cmd::Command::cargo_bin("akhra_cli")
        .expect("binary")
        .env("AKHRA_CLI_SCRIPT", "1")
        .env("AKHRA_HOME", home)
        .env_remove("RUST_LOG")
        .write_stdin(script.to_string())
        .assert()
}
