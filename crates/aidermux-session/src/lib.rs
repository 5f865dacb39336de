//! aidermux-session: the aider session core.
//! Locating the live session, choosing how a prompt is delivered, and
//! starting/stopping aider. Editor and tmux access go through
//! `SessionContext`, so everything here runs against fakes in tests.

pub mod backend;
pub mod commands;
pub mod context;
pub mod dispatch;
pub mod lifecycle;
pub mod locator;
pub mod session;
pub mod window;

pub use backend::{AiderBackend, Delivery, MockBackend, TerminalBackend, backend_for};
pub use commands::RepoFiles;
pub use context::SessionContext;
pub use dispatch::{send, send_from_buffer, send_keystroke, send_silently};
pub use lifecycle::{exit, hide, silent_start, start};
pub use locator::locate;
pub use session::{PaneSession, Session, TerminalSession};
