use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatuslineError {
    #[error("failed to read session from stdin: {0}")]
    Stdin(#[source] std::io::Error),

    #[error("invalid session JSON: {0}")]
    InvalidInput(#[source] serde_json::Error),

    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Git(#[from] git2::Error),
}

pub type Result<T> = std::result::Result<T, StatuslineError>;

/// Reads and deserializes a JSON file.
pub fn read_json<T: serde::de::DeserializeOwned>(path: &std::path::Path) -> Result<T> {
    let contents = std::fs::read_to_string(path).map_err(|source| StatuslineError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| StatuslineError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
