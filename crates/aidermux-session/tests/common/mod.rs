#![allow(dead_code)]

use std::sync::Mutex;

use aidermux_core::{BufferLayout, PluginConfig};
use aidermux_nvim::FakeEditor;
use aidermux_session::{AiderBackend, SessionContext};
use aidermux_tmux::{TmuxCommandRunner, TmuxError};

/// tmux stand-in: a set of live panes, a log of every invocation and a
/// snapshot of each file handed to `load-buffer`.
#[derive(Default)]
pub struct FakeTmux {
    panes: Mutex<Vec<String>>,
    calls: Mutex<Vec<Vec<String>>>,
    loaded: Mutex<Vec<String>>,
    fail_on: Mutex<Vec<String>>,
    next_pane: Mutex<u32>,
}

impl FakeTmux {
    pub fn with_panes(panes: &[&str]) -> Self {
        let tmux = Self::default();
        *tmux.panes.lock().expect("lock") = panes.iter().map(|p| p.to_string()).collect();
        *tmux.next_pane.lock().expect("lock") = 10;
        tmux
    }

    /// Make every invocation of `subcommand` fail.
    pub fn fail(&self, subcommand: &str) {
        self.fail_on.lock().expect("lock").push(subcommand.to_string());
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().expect("lock").clone()
    }

    /// Invocations of `subcommand`, without the subcommand itself.
    pub fn calls_to(&self, subcommand: &str) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter(|c| c.first().map(String::as_str) == Some(subcommand))
            .map(|c| c[1..].to_vec())
            .collect()
    }

    pub fn subcommands(&self) -> Vec<String> {
        self.calls().into_iter().filter_map(|c| c.into_iter().next()).collect()
    }

    pub fn loaded(&self) -> Vec<String> {
        self.loaded.lock().expect("lock").clone()
    }

    pub fn panes(&self) -> Vec<String> {
        self.panes.lock().expect("lock").clone()
    }
}

impl TmuxCommandRunner for FakeTmux {
    fn run(&self, args: &[&str]) -> Result<String, TmuxError> {
        self.calls
            .lock()
            .expect("lock")
            .push(args.iter().map(|s| s.to_string()).collect());
        let sub = args.first().copied().unwrap_or_default();
        if self.fail_on.lock().expect("lock").iter().any(|f| f == sub) {
            return Err(TmuxError::failed(sub, "no server running"));
        }
        match sub {
            "list-panes" => Ok(self.panes().join("\n")),
            "split-window" => {
                let mut next = self.next_pane.lock().expect("lock");
                let id = format!("%{}", *next);
                *next += 1;
                self.panes.lock().expect("lock").push(id.clone());
                Ok(format!("{id}\n"))
            }
            "kill-pane" => {
                let target = args.get(2).copied().unwrap_or_default();
                self.panes.lock().expect("lock").retain(|p| p != target);
                Ok(String::new())
            }
            "load-buffer" => {
                let path = args.last().copied().unwrap_or_default();
                let content = std::fs::read_to_string(path).map_err(TmuxError::Io)?;
                self.loaded.lock().expect("lock").push(content);
                Ok(String::new())
            }
            _ => Ok(String::new()),
        }
    }
}

pub fn config(layout: BufferLayout) -> PluginConfig {
    PluginConfig {
        buffer_open_type: layout,
        ..PluginConfig::default()
    }
}

pub fn test_config(layout: BufferLayout) -> PluginConfig {
    PluginConfig {
        testing: true,
        ..config(layout)
    }
}

pub fn context<'a>(
    editor: &'a FakeEditor,
    backend: &'a dyn AiderBackend,
    tmux: Option<&'a FakeTmux>,
    config: PluginConfig,
) -> SessionContext<'a> {
    SessionContext::new(
        editor,
        backend,
        tmux.map(|t| t as &dyn TmuxCommandRunner),
        config,
    )
}

/// An editor running inside tmux with `pane_id` registered as the session.
pub fn editor_with_pane(pane_id: &str) -> FakeEditor {
    let editor = FakeEditor::new();
    editor.set_env("TMUX", "/tmp/tmux-1000/default,4242,0");
    editor.set_global(
        aidermux_session::context::PANE_VAR,
        serde_json::Value::String(pane_id.to_string()),
    );
    editor
}
