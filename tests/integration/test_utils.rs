//! Shared test utilities for integration tests

use std::path::Path;
use std::sync::Mutex;
use strata::Resolver;
use tempfile::TempDir;

/// Serializes access to HOME and XDG_CONFIG_HOME across tests
static CONFIG_ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Run `f` with HOME and XDG_CONFIG_HOME pointing into `test_dir`, restoring
/// the original values afterwards
pub fn with_config_home<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = CONFIG_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let home = std::env::var_os("HOME");
    let config_home = std::env::var_os("XDG_CONFIG_HOME");

    let test_home = test_dir.path().join("home");
    std::fs::create_dir_all(&test_home).unwrap();
    std::env::set_var("HOME", &test_home);
    std::env::set_var("XDG_CONFIG_HOME", test_dir.path().join("config"));

    let result = f();

    match home {
        Some(v) => std::env::set_var("HOME", v),
        None => std::env::remove_var("HOME"),
    }
    match config_home {
        Some(v) => std::env::set_var("XDG_CONFIG_HOME", v),
        None => std::env::remove_var("XDG_CONFIG_HOME"),
    }
    result
}

/// Write `contents` to `path`, creating parent directories
pub fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}

pub fn blender_resolver() -> Resolver {
    Resolver::blender(true).unwrap()
}
