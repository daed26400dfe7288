use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThreadviewError {
    #[error("cannot determine home directory")]
    HomeDirectoryNotFound,

    #[error("cannot determine current directory: {0}")]
    CurrentDirectory(#[source] std::io::Error),

    #[error("failed to read Claude projects directory {path}: {source}")]
    ProjectsDirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no Claude project directory found for: {cwd} (tried: {expected})")]
    ProjectNotFound { cwd: PathBuf, expected: String },

    #[error("no conversation logs found in {path}")]
    NoTranscripts { path: PathBuf },

    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ThreadviewError>;
