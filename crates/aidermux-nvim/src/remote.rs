//! NvimCommandRunner trait and NvimRemote (sync `--remote-expr` wrapper).

use crate::error::HostError;

/// Evaluates one Vimscript expression in the editor and returns its
/// printed result. Enables mock injection for testing.
pub trait NvimCommandRunner {
    fn eval(&self, expr: &str) -> Result<String, HostError>;
}

impl<T: NvimCommandRunner + ?Sized> NvimCommandRunner for &T {
    fn eval(&self, expr: &str) -> Result<String, HostError> {
        (**self).eval(expr)
    }
}

/// Real runner: `nvim --server {addr} --remote-expr {expr}`.
pub struct NvimRemote {
    nvim_bin: String,
    server: String,
}

impl NvimRemote {
    pub fn new(nvim_bin: impl Into<String>, server: impl Into<String>) -> Self {
        Self {
            nvim_bin: nvim_bin.into(),
            server: server.into(),
        }
    }

    /// Runner for the editor named by `server`, when one was given.
    pub fn connect(nvim_bin: &str, server: Option<&str>) -> Result<Self, HostError> {
        match server.map(str::trim).filter(|s| !s.is_empty()) {
            Some(addr) => Ok(Self::new(nvim_bin, addr)),
            None => Err(HostError::NoServer),
        }
    }

    pub fn server(&self) -> &str {
        &self.server
    }
}

impl NvimCommandRunner for NvimRemote {
    fn eval(&self, expr: &str) -> Result<String, HostError> {
        tracing::trace!("remote-expr {expr}");
        let output = std::process::Command::new(&self.nvim_bin)
            .args(["--headless", "--server", &self.server, "--remote-expr", expr])
            .output()?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() || !stderr.trim().is_empty() {
            return Err(HostError::RemoteCall {
                expr: expr.to_string(),
                detail: format!(
                    "exit code {}: {}",
                    output.status.code().unwrap_or(-1),
                    stderr.trim()
                ),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_requires_address() {
        assert!(matches!(
            NvimRemote::connect("nvim", None),
            Err(HostError::NoServer)
        ));
        assert!(matches!(
            NvimRemote::connect("nvim", Some("  ")),
            Err(HostError::NoServer)
        ));
    }

    #[test]
    fn connect_keeps_address() {
        let remote = NvimRemote::connect("nvim", Some("/tmp/nvim.sock")).expect("address");
        assert_eq!(remote.server(), "/tmp/nvim.sock");
    }

    #[test]
    fn missing_binary_is_io_error() {
        let remote = NvimRemote::new("/nonexistent/aidermux-test-nvim", "/tmp/none.sock");
        assert!(matches!(remote.eval("1"), Err(HostError::Io(_))));
    }
}
