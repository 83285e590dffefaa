//! Errors raised while loading an order's cut list.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    /// The requirements file could not be read.
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not a cut list.
    #[error("invalid requirements document: {0}")]
    Json(#[from] serde_json::Error),
}
