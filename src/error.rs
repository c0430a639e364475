//! Error types for loading input and note indexes.
//!
//! Rendering itself never fails; only the file and reader entry points do.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the fallible entry points.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Read(#[from] std::io::Error),

    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("invalid note index: {0}")]
    NoteIndex(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
