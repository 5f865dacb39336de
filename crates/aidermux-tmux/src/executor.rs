//! Running tmux against the server the editor lives in.

use std::process::Command;

use crate::error::TmuxError;

/// One tmux invocation per call, returning stdout. Panes, paste and
/// teardown all go through this seam.
pub trait TmuxCommandRunner: Send + Sync {
    fn run(&self, args: &[&str]) -> Result<String, TmuxError>;
}

impl<T: TmuxCommandRunner + ?Sized> TmuxCommandRunner for &T {
    fn run(&self, args: &[&str]) -> Result<String, TmuxError> {
        (**self).run(args)
    }
}

/// tmux as a child process.
///
/// Without a socket override the child inherits `$TMUX` from the editor,
/// so commands target the server the editor is running in.
pub struct TmuxExecutor {
    tmux_bin: String,
    socket_path: Option<String>,
}

impl TmuxExecutor {
    pub fn new(tmux_bin: impl Into<String>) -> Self {
        Self {
            tmux_bin: tmux_bin.into(),
            socket_path: None,
        }
    }

    #[must_use]
    pub fn with_socket_path(mut self, path: impl Into<String>) -> Self {
        self.socket_path = Some(path.into());
        self
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.tmux_bin);
        if let Some(ref path) = self.socket_path {
            cmd.args(["-S", path]);
        }
        cmd.args(args);
        cmd
    }
}

impl Default for TmuxExecutor {
    fn default() -> Self {
        Self::new("tmux")
    }
}

impl TmuxCommandRunner for TmuxExecutor {
    fn run(&self, args: &[&str]) -> Result<String, TmuxError> {
        let subcommand = args.first().copied().unwrap_or_default();
        tracing::debug!("tmux {}", args.join(" "));
        let output = self.command(args).output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = match output.status.code() {
                Some(code) => format!("exit code {code}: {}", stderr.trim()),
                None => format!("killed by signal: {}", stderr.trim()),
            };
            tracing::debug!("tmux {subcommand} failed: {detail}");
            return Err(TmuxError::failed(subcommand, detail));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
