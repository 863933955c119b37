use std::path::PathBuf;

use thiserror::Error;
use undograph::HistoryError;

pub type Result<T> = std::result::Result<T, DemoError>;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("line {line}: unknown command `{command}`")]
    UnknownCommand { line: usize, command: String },

    #[error("line {line}: `{command}` expects {expected}")]
    MissingArgument {
        line: usize,
        command: &'static str,
        expected: &'static str,
    },

    #[error("line {line}: `{value}` is not a valid {expected}")]
    InvalidArgument {
        line: usize,
        value: String,
        expected: &'static str,
    },

    #[error("line {line}: no commit at log index {index}")]
    NoSuchCommit { line: usize, index: usize },

    #[error("failed to read script {path}: {source}")]
    Script {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),

    #[error("failed to write {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

impl DemoError {
    /// Process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::UnknownCommand { .. }
            | Self::MissingArgument { .. }
            | Self::InvalidArgument { .. }
            | Self::NoSuchCommit { .. } => 2,
            Self::History(HistoryError::InvalidConfig(_)) => 3,
            _ => 1,
        }
    }
}
