//! Error types for rapport-store.

use std::path::PathBuf;

use thiserror::Error;

use rapport_core::RegistryError;

/// All errors that can arise while loading or saving the registry file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML serialization error (save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load, with the offending file.
    #[error("failed to parse registry at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The file parsed, but the registry refused the snapshot it contained.
    #[error("registry at {path} is inconsistent: {source}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: RegistryError,
    },

    /// `dirs::home_dir()` returned `None`, so `~/.rapport/` cannot be located.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}

/// Convenience constructor for [`StoreError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.into(),
        source,
    }
}
