//! The located aider session.

use aidermux_nvim::{BufNr, JobId, WinNr};

/// aider running in an editor terminal buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalSession {
    pub bufnr: BufNr,
    pub job_id: JobId,
    /// Window currently showing the buffer, if any.
    pub winnr: Option<WinNr>,
}

impl TerminalSession {
    pub fn is_visible(&self) -> bool {
        self.winnr.is_some()
    }
}

/// aider running in a tmux pane next to the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneSession {
    pub pane_id: String,
}

/// The single live aider session. Always derived from current editor and
/// tmux state, never cached between commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Terminal(TerminalSession),
    Pane(PaneSession),
}

impl Session {
    pub fn as_terminal(&self) -> Option<&TerminalSession> {
        match self {
            Self::Terminal(t) => Some(t),
            Self::Pane(_) => None,
        }
    }
}
