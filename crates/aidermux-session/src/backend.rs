//! Backends that actually run aider and write to it.
//!
//! `TerminalBackend` drives a real `aider` process in a terminal buffer.
//! `MockBackend` stands in for it when `g:aider_testing` is set: no process
//! is started and every prompt is echoed into a plain `dummyaider` buffer.

use aidermux_core::naming::{MOCK_BUFFER_NAME, is_aider_buffer_name};
use aidermux_core::{PluginConfig, SlashCommand, wrap_bracketed_paste};
use aidermux_nvim::{BufNr, BufferInfo, EditorHost, HostError};

use crate::session::TerminalSession;

/// Autocmd fired once aider has been launched.
pub const OPEN_EVENT: &str = "AiderOpen";

/// Register used to stage prompts for the paste path.
pub const PROMPT_REGISTER: char = 'q';

/// How a prompt reaches the terminal job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Write prompt and newline straight to the job's stdin.
    Inject,
    /// Stage in a register, paste it into the focused terminal, then newline.
    RegisterPaste,
    /// Write the bytes as they are, no submit.
    Raw,
}

pub trait AiderBackend {
    /// Test mode tolerates session buffers without a live job.
    fn is_test_mode(&self) -> bool;

    fn is_session_buffer(&self, info: &BufferInfo, config: &PluginConfig) -> bool;

    /// Launch aider in the current window and return its buffer.
    fn run(&self, host: &dyn EditorHost, config: &PluginConfig) -> Result<BufNr, HostError>;

    fn send_prompt(
        &self,
        host: &dyn EditorHost,
        session: &TerminalSession,
        prompt: &str,
        delivery: Delivery,
    ) -> Result<(), HostError>;

    /// Stop aider and remove its buffer.
    fn exit(&self, host: &dyn EditorHost, session: &TerminalSession) -> Result<(), HostError>;
}

/// Pick the backend once per invocation.
pub fn backend_for(config: &PluginConfig) -> Box<dyn AiderBackend> {
    if config.testing {
        Box::new(MockBackend)
    } else {
        Box::new(TerminalBackend)
    }
}

pub struct TerminalBackend;

impl AiderBackend for TerminalBackend {
    fn is_test_mode(&self) -> bool {
        false
    }

    fn is_session_buffer(&self, info: &BufferInfo, config: &PluginConfig) -> bool {
        is_aider_buffer_name(&info.name, &config.command_suffixes)
    }

    fn run(&self, host: &dyn EditorHost, config: &PluginConfig) -> Result<BufNr, HostError> {
        let bufnr = host.open_terminal(&config.command)?;
        host.emit_user_event(OPEN_EVENT)?;
        tracing::debug!("started `{}` in buffer {bufnr}", config.command);
        Ok(bufnr)
    }

    fn send_prompt(
        &self,
        host: &dyn EditorHost,
        session: &TerminalSession,
        prompt: &str,
        delivery: Delivery,
    ) -> Result<(), HostError> {
        match delivery {
            Delivery::Inject => {
                let payload = format!("{}\n", wrap_bracketed_paste(prompt));
                host.chansend(session.job_id, &payload)
            }
            Delivery::RegisterPaste => {
                host.set_register(PROMPT_REGISTER, prompt)?;
                host.feedkeys("G")?;
                host.feedkeys(&format!("\"{PROMPT_REGISTER}p"))?;
                host.chansend(session.job_id, "\n")
            }
            Delivery::Raw => host.chansend(session.job_id, prompt),
        }
    }

    fn exit(&self, host: &dyn EditorHost, session: &TerminalSession) -> Result<(), HostError> {
        host.chansend(session.job_id, &format!("{}\n", SlashCommand::Exit))?;
        host.delete_buffer(session.bufnr)
    }
}

pub struct MockBackend;

impl AiderBackend for MockBackend {
    fn is_test_mode(&self) -> bool {
        true
    }

    fn is_session_buffer(&self, info: &BufferInfo, _config: &PluginConfig) -> bool {
        info.name == MOCK_BUFFER_NAME
    }

    fn run(&self, host: &dyn EditorHost, _config: &PluginConfig) -> Result<BufNr, HostError> {
        let bufnr = host.add_buffer(MOCK_BUFFER_NAME)?;
        host.show_buffer(bufnr)?;
        host.emit_user_event(OPEN_EVENT)?;
        Ok(bufnr)
    }

    fn send_prompt(
        &self,
        host: &dyn EditorHost,
        session: &TerminalSession,
        prompt: &str,
        _delivery: Delivery,
    ) -> Result<(), HostError> {
        let lines: Vec<String> = format!("input: {prompt}")
            .split('\n')
            .map(String::from)
            .collect();
        host.append_lines(session.bufnr, &lines)
    }

    fn exit(&self, host: &dyn EditorHost, session: &TerminalSession) -> Result<(), HostError> {
        host.delete_buffer(session.bufnr)
    }
}
