//! aidermux-tmux: tmux backend IO boundary.
//! Pane creation and liveness checks, paste-buffer prompt delivery and pane
//! teardown. No session logic.

pub mod error;
pub mod executor;
pub mod pane;
pub mod paste;

pub use error::TmuxError;
pub use executor::{TmuxCommandRunner, TmuxExecutor};
pub use pane::{
    exit_pane, kill_pane, list_pane_ids, login_shell_command, pane_exists, send_keys,
    split_window,
};
pub use paste::paste_prompt;
