//! Per-invocation context threaded through every session operation.

use aidermux_core::{BufferLayout, PluginConfig};
use aidermux_nvim::{EditorHost, HostError};
use aidermux_tmux::TmuxCommandRunner;

use crate::backend::AiderBackend;

/// Editor global holding the id of the tmux pane running aider.
pub const PANE_VAR: &str = "aider_tmux_pane_id";

/// Everything one command needs: the editor, the selected backend, the
/// optional tmux runner and the configuration read at startup. Nothing
/// about the session itself is stored here; it is re-derived on demand.
pub struct SessionContext<'a> {
    pub host: &'a dyn EditorHost,
    pub backend: &'a dyn AiderBackend,
    pub mux: Option<&'a dyn TmuxCommandRunner>,
    pub config: PluginConfig,
}

impl<'a> SessionContext<'a> {
    pub fn new(
        host: &'a dyn EditorHost,
        backend: &'a dyn AiderBackend,
        mux: Option<&'a dyn TmuxCommandRunner>,
        config: PluginConfig,
    ) -> Self {
        Self {
            host,
            backend,
            mux,
            config,
        }
    }

    pub fn layout(&self) -> BufferLayout {
        self.config.buffer_open_type
    }

    /// Whether the editor itself runs inside tmux (`$TMUX` set).
    pub fn in_tmux(&self) -> Result<bool, HostError> {
        Ok(self
            .host
            .getenv("TMUX")?
            .is_some_and(|v| !v.trim().is_empty()))
    }

    /// Pane id recorded by a previous `start`, live or not.
    pub fn registered_pane(&self) -> Result<Option<String>, HostError> {
        Ok(self
            .host
            .get_var(PANE_VAR)?
            .and_then(|v| v.as_str().map(str::to_string))
            .filter(|id| !id.is_empty()))
    }

    pub fn register_pane(&self, pane_id: &str) -> Result<(), HostError> {
        self.host.set_var(PANE_VAR, pane_id)
    }

    pub fn clear_pane(&self) -> Result<(), HostError> {
        self.host.unset_var(PANE_VAR)
    }

    /// A new pane is wanted when the editor runs in tmux, the layout is a
    /// split, a tmux runner is available and no pane is registered.
    pub fn wants_pane(&self) -> Result<bool, HostError> {
        if self.mux.is_none() || !self.layout().is_split() {
            return Ok(false);
        }
        Ok(self.in_tmux()? && self.registered_pane()?.is_none())
    }
}
