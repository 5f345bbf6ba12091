//! YAML-backed persistence for the registry snapshot.
//!
//! # Storage layout
//!
//! ```text
//! ~/.rapport/             (mode 0700)
//!   registry.yaml         (mode 0600)
//! ```
//!
//! # API pattern
//!
//! Every function has two forms:
//! - `fn_at(home: &Path, …)`: explicit home; used in tests with `TempDir`
//! - `fn(…)`: derives home from `dirs::home_dir()`, delegates to `_at`
//!
//! Tests must NEVER call the no-arg wrappers; always use `_at`.

use std::path::{Path, PathBuf};

use rapport_core::{Registry, Snapshot};

use crate::error::{io_err, StoreError};

pub const STORE_DIR: &str = ".rapport";
pub const STORE_FILE: &str = "registry.yaml";

// ---------------------------------------------------------------------------
// 1. Paths
// ---------------------------------------------------------------------------

/// `<home>/.rapport/`: pure, no I/O.
pub fn store_dir_at(home: &Path) -> PathBuf {
    home.join(STORE_DIR)
}

/// `<home>/.rapport/registry.yaml`: pure, no I/O.
pub fn store_path_at(home: &Path) -> PathBuf {
    store_dir_at(home).join(STORE_FILE)
}

/// `store_path_at` convenience wrapper.
pub fn store_path() -> Result<PathBuf, StoreError> {
    Ok(store_path_at(&home()?))
}

// ---------------------------------------------------------------------------
// 2. Load
// ---------------------------------------------------------------------------

/// Read the stored snapshot. Returns `Ok(None)` if nothing has been saved yet.
///
/// Returns `StoreError::Parse` (with path) if the file is not a valid snapshot.
pub fn load_at(home: &Path) -> Result<Option<Snapshot>, StoreError> {
    let path = store_path_at(home);
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no registry file yet");
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    let snapshot: Snapshot =
        serde_yaml::from_str(&contents).map_err(|e| StoreError::Parse { path, source: e })?;
    Ok(Some(snapshot))
}

/// Restore the stored registry, or start an empty one if none was saved.
pub fn open_at(home: &Path) -> Result<Registry, StoreError> {
    match load_at(home)? {
        None => Ok(Registry::new()),
        Some(snapshot) => {
            let registry = Registry::restore(snapshot).map_err(|e| StoreError::Snapshot {
                path: store_path_at(home),
                source: e,
            })?;
            tracing::info!(
                contacts = registry.contacts().len(),
                meetings = registry.meetings().len(),
                "registry loaded"
            );
            Ok(registry)
        }
    }
}

/// `open_at` convenience wrapper.
pub fn open() -> Result<Registry, StoreError> {
    open_at(&home()?)
}

// ---------------------------------------------------------------------------
// 3. Save (atomic)
// ---------------------------------------------------------------------------

/// Atomically write `snapshot` to `<home>/.rapport/registry.yaml`.
///
/// Write flow: serialize → `registry.yaml.tmp` → `chmod 0600` → `rename`.
/// `.tmp` is always in the same directory as the target, so the rename never
/// crosses filesystems. A failed write removes the `.tmp` again and leaves
/// the previous `registry.yaml` untouched.
pub fn save_at(home: &Path, snapshot: &Snapshot) -> Result<(), StoreError> {
    let dir = store_dir_at(home);
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| io_err(&dir, e))?;
        set_dir_permissions(&dir)?;
    }
    let path = store_path_at(home);
    let tmp_path = path.with_file_name(format!("{STORE_FILE}.tmp"));

    let yaml = serde_yaml::to_string(snapshot)?;
    let written = std::fs::write(&tmp_path, yaml)
        .map_err(|e| io_err(&tmp_path, e))
        .and_then(|()| set_file_permissions(&tmp_path))
        .and_then(|()| std::fs::rename(&tmp_path, &path).map_err(|e| io_err(&path, e)));
    if let Err(e) = written {
        let _ = std::fs::remove_file(&tmp_path);
        tracing::warn!(path = %path.display(), error = %e, "registry save failed");
        return Err(e);
    }
    tracing::info!(
        path = %path.display(),
        contacts = snapshot.contacts.len(),
        meetings = snapshot.meetings.len(),
        "registry saved"
    );
    Ok(())
}

/// Snapshot `registry` and save it.
pub fn flush_at(home: &Path, registry: &Registry) -> Result<(), StoreError> {
    save_at(home, &registry.snapshot())
}

/// `flush_at` convenience wrapper.
pub fn flush(registry: &Registry) -> Result<(), StoreError> {
    flush_at(&home()?, registry)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn home() -> Result<PathBuf, StoreError> {
    dirs::home_dir().ok_or(StoreError::HomeNotFound)
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
