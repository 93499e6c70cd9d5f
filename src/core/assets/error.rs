use std::io;

use thiserror::Error;

use super::AssetHandle;

/// Errors produced while resolving or loading assets.
///
/// Cloneable so a single failure can be handed to every callback and
/// event observer waiting on the same asset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("asset path '{0}' is empty or escapes the asset root")]
    InvalidPath(String),

    #[error("failed to read asset '{path}': {message}")]
    Io {
        path: String,
        kind: io::ErrorKind,
        message: String,
    },

    #[error("unknown asset handle {0}")]
    UnknownHandle(AssetHandle),

    #[error("asset loader could not be started: {0}")]
    LoaderSpawn(String),

    #[error("asset loader has stopped")]
    LoaderStopped,
}

impl AssetError {
    pub(super) fn io(path: &str, err: &io::Error) -> Self {
        AssetError::Io {
            path: path.to_string(),
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
