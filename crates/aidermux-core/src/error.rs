//! Error types for parsing plugin values.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("unknown buffer layout: {0}")]
    UnknownLayout(String),

    #[error("unknown chat mode: {0} (expected \"code\" or \"architect\")")]
    UnknownChatMode(String),
}
