//! aidermux-core: pure types shared by the editor and tmux boundaries.
//! Layout policy, plugin configuration, session naming convention and
//! prompt construction. No IO.

pub mod config;
pub mod error;
pub mod layout;
pub mod naming;
pub mod prompt;

pub use config::PluginConfig;
pub use error::CoreError;
pub use layout::BufferLayout;
pub use naming::is_aider_buffer_name;
pub use prompt::{ChatMode, SlashCommand, wrap_bracketed_paste};
