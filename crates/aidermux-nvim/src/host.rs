//! The editor capability interface.
//!
//! Buffers and windows are addressed the way Vim numbers them: buffer
//! numbers are stable ids, window numbers are 1-based positions in
//! `winnr()` order and change whenever windows open or close.

use aidermux_core::PluginConfig;
use aidermux_core::config::CONFIG_VARIABLES;
use serde::{Deserialize, Serialize};

use crate::error::HostError;

pub type BufNr = u32;
pub type WinNr = u32;
/// Job/channel id of a terminal buffer. `0` means no live process.
pub type JobId = i64;

/// What the session logic needs to know about a buffer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BufferInfo {
    pub bufnr: BufNr,
    pub name: String,
    pub channel: JobId,
    pub buftype: String,
    pub filetype: String,
    pub listed: bool,
}

impl BufferInfo {
    pub fn is_terminal(&self) -> bool {
        self.buftype == "terminal"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorSize {
    pub columns: u32,
    pub lines: u32,
}

/// Placement of a floating window, relative to the editor grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloatWindow {
    pub width: u32,
    pub height: u32,
    pub row: u32,
    pub col: u32,
    pub title: Option<String>,
}

impl FloatWindow {
    /// A `width`×`height` window centred in an editor of `size`.
    pub fn centered(size: EditorSize, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            row: size.lines.saturating_sub(height) / 2,
            col: size.columns.saturating_sub(width) / 2,
            title: None,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Every editor operation the plugin performs. Implemented by `NvimHost`
/// for a running Neovim and by `FakeEditor` in tests.
pub trait EditorHost {
    // ─── Buffers ─────────────────────────────────────────────────

    /// All buffer numbers, listed or not, ascending.
    fn buffer_numbers(&self) -> Result<Vec<BufNr>, HostError>;
    fn buffer_info(&self, bufnr: BufNr) -> Result<BufferInfo, HostError>;
    fn buffer_lines(&self, bufnr: BufNr) -> Result<Vec<String>, HostError>;
    fn append_lines(&self, bufnr: BufNr, lines: &[String]) -> Result<(), HostError>;
    /// Replace the whole content of `bufnr`.
    fn set_lines(&self, bufnr: BufNr, lines: &[String]) -> Result<(), HostError>;
    fn current_buffer(&self) -> Result<BufNr, HostError>;
    /// Lines `start..=end` (1-based) of the current buffer.
    fn line_range(&self, start: u32, end: u32) -> Result<Vec<String>, HostError>;
    /// Absolute path of the current buffer's file (`expand('%:p')`).
    fn current_file_path(&self) -> Result<String, HostError>;
    /// New unlisted scratch buffer, not shown anywhere.
    fn create_scratch_buffer(&self) -> Result<BufNr, HostError>;
    /// Find or create a buffer named `name` and load it.
    fn add_buffer(&self, name: &str) -> Result<BufNr, HostError>;
    /// `bdelete! N`
    fn delete_buffer(&self, bufnr: BufNr) -> Result<(), HostError>;
    /// `enew`
    fn edit_new_buffer(&self) -> Result<(), HostError>;
    /// `buffer N` in the current window.
    fn show_buffer(&self, bufnr: BufNr) -> Result<(), HostError>;
    /// `silent! e!`
    fn reload_current_buffer(&self) -> Result<(), HostError>;

    // ─── Windows ─────────────────────────────────────────────────

    /// Buffer shown in each window; index `i` is window number `i + 1`.
    fn window_buffers(&self) -> Result<Vec<BufNr>, HostError>;
    fn open_split(&self, vertical: bool) -> Result<(), HostError>;
    fn open_float(&self, bufnr: BufNr, float: &FloatWindow) -> Result<(), HostError>;
    /// `{winnr}wincmd w`
    fn focus_window(&self, winnr: WinNr) -> Result<(), HostError>;
    /// `wincmd p`
    fn focus_previous_window(&self) -> Result<(), HostError>;
    /// `close!`
    fn close_current_window(&self) -> Result<(), HostError>;
    fn editor_size(&self) -> Result<EditorSize, HostError>;
    fn set_buffer_keymap(
        &self,
        bufnr: BufNr,
        mode: &str,
        lhs: &str,
        rhs: &str,
    ) -> Result<(), HostError>;
    /// Jump to the last line and enter insert mode.
    fn start_insert_at_end(&self) -> Result<(), HostError>;

    // ─── Terminal & input ────────────────────────────────────────

    /// `terminal {command}` in the current window; returns the new buffer.
    fn open_terminal(&self, command: &str) -> Result<BufNr, HostError>;
    /// Write raw bytes to a job's stdin.
    fn chansend(&self, job: JobId, data: &str) -> Result<(), HostError>;
    fn set_register(&self, register: char, text: &str) -> Result<(), HostError>;
    /// Feed keys as if typed, without remapping, and execute them now.
    fn feedkeys(&self, keys: &str) -> Result<(), HostError>;
    /// Block until the user presses a key; returns it as a string.
    fn getchar(&self) -> Result<String, HostError>;

    // ─── State & messages ────────────────────────────────────────

    /// `g:{name}`, or `None` when unset.
    fn get_var(&self, name: &str) -> Result<Option<serde_json::Value>, HostError>;
    fn set_var(&self, name: &str, value: &str) -> Result<(), HostError>;
    fn unset_var(&self, name: &str) -> Result<(), HostError>;
    /// Environment variable of the editor process.
    fn getenv(&self, name: &str) -> Result<Option<String>, HostError>;
    fn notify(&self, message: &str) -> Result<(), HostError>;
    /// `doautocmd User {name}`
    fn emit_user_event(&self, name: &str) -> Result<(), HostError>;
    /// Run an arbitrary Ex command. Only used for command registration.
    fn execute(&self, command: &str) -> Result<(), HostError>;

    /// Read every `g:aider_*` setting into a `PluginConfig`.
    fn read_config(&self) -> Result<PluginConfig, HostError> {
        let mut map = serde_json::Map::new();
        for (key, var) in CONFIG_VARIABLES {
            if let Some(value) = self.get_var(var)? {
                map.insert((*key).to_string(), value);
            }
        }
        Ok(PluginConfig::from_value(&serde_json::Value::Object(map)))
    }
}
