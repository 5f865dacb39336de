//! Error types for the tmux backend.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TmuxError {
    #[error("tmux {subcommand} failed: {detail}")]
    CommandFailed { subcommand: String, detail: String },

    #[error("unexpected tmux output for {command}: {output:?}")]
    UnexpectedOutput { command: &'static str, output: String },

    #[error("tmux io error: {0}")]
    Io(#[from] std::io::Error),
}

impl TmuxError {
    pub fn failed(subcommand: &str, detail: impl Into<String>) -> Self {
        Self::CommandFailed {
            subcommand: subcommand.to_string(),
            detail: detail.into(),
        }
    }

    /// The tmux subcommand that failed, when the server rejected one.
    pub fn subcommand(&self) -> Option<&str> {
        match self {
            Self::CommandFailed { subcommand, .. } => Some(subcommand),
            _ => None,
        }
    }
}
