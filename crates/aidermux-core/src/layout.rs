//! Window layout used to display the aider session.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// How the session buffer is placed on screen, read from
/// `g:aider_buffer_open_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BufferLayout {
    /// Horizontal split.
    Split,
    /// Vertical split.
    Vsplit,
    /// Centred floating window.
    #[default]
    Floating,
}

impl BufferLayout {
    pub const ALL: [Self; 3] = [Self::Split, Self::Vsplit, Self::Floating];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Split => "split",
            Self::Vsplit => "vsplit",
            Self::Floating => "floating",
        }
    }

    /// Resolve a raw editor variable. Anything that is not one of the
    /// three layout names falls back to `Floating`.
    pub fn from_value(value: Option<&serde_json::Value>) -> Self {
        value
            .and_then(serde_json::Value::as_str)
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    pub fn is_split(self) -> bool {
        matches!(self, Self::Split | Self::Vsplit)
    }

    /// `tmux split-window` direction flag matching the editor split.
    /// A vim `vsplit` puts windows side by side, which is tmux `-h`.
    pub fn tmux_split_flag(self) -> Option<&'static str> {
        match self {
            Self::Split => Some("-v"),
            Self::Vsplit => Some("-h"),
            Self::Floating => None,
        }
    }
}

impl fmt::Display for BufferLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BufferLayout {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "split" => Ok(Self::Split),
            "vsplit" => Ok(Self::Vsplit),
            "floating" => Ok(Self::Floating),
            _ => Err(CoreError::UnknownLayout(s.to_string())),
        }
    }
}
