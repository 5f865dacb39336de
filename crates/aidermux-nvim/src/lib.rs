//! aidermux-nvim: editor IO boundary.
//! The `EditorHost` capability trait, its Neovim adapter over
//! `--remote-expr`, and an in-memory fake for tests.

pub mod error;
#[cfg(any(test, feature = "test-util"))]
pub mod fake;
pub mod host;
pub mod literal;
pub mod nvim_host;
pub mod remote;

pub use error::HostError;
#[cfg(any(test, feature = "test-util"))]
pub use fake::FakeEditor;
pub use host::{BufNr, BufferInfo, EditorHost, EditorSize, FloatWindow, JobId, WinNr};
pub use nvim_host::NvimHost;
pub use remote::{NvimCommandRunner, NvimRemote};
