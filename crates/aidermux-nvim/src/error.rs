//! Error types for the editor boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("no editor server address (set $NVIM or pass --server)")]
    NoServer,

    #[error("remote call failed for {expr}: {detail}")]
    RemoteCall { expr: String, detail: String },

    #[error("could not decode reply to {expr}: {source}")]
    Decode {
        expr: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("editor io error: {0}")]
    Io(#[from] std::io::Error),
}
