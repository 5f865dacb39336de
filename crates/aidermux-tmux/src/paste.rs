//! Prompt delivery into a pane through a tmux paste buffer.
//!
//! `send-keys` would reinterpret newlines as Enter, so the prompt goes
//! through a temp file and `load-buffer`, then `paste-buffer -p` pastes it
//! with bracketed-paste semantics and `C-m` submits it.

use std::io::Write;

use crate::error::TmuxError;
use crate::executor::TmuxCommandRunner;
use crate::pane::send_keys;

/// Unique tmux buffer name for one paste.
pub fn paste_buffer_name() -> String {
    format!(
        "aidermux-{}-{}",
        std::process::id(),
        chrono::Utc::now().timestamp_millis()
    )
}

/// Paste `prompt` verbatim into `pane_id` and submit it.
pub fn paste_prompt(
    runner: &impl TmuxCommandRunner,
    pane_id: &str,
    prompt: &str,
) -> Result<(), TmuxError> {
    let mut file = tempfile::Builder::new()
        .prefix("aidermux-prompt-")
        .suffix(".txt")
        .tempfile()?;
    file.write_all(prompt.as_bytes())?;
    file.flush()?;

    let buffer = paste_buffer_name();
    let path = file.path().to_string_lossy().into_owned();
    let result = paste_file(runner, pane_id, &buffer, &path);

    if let Err(e) = file.close() {
        tracing::debug!("could not remove prompt file {path}: {e}");
    }
    result
}

fn paste_file(
    runner: &impl TmuxCommandRunner,
    pane_id: &str,
    buffer: &str,
    path: &str,
) -> Result<(), TmuxError> {
    runner.run(&["load-buffer", "-b", buffer, path])?;
    let pasted = runner.run(&["paste-buffer", "-p", "-b", buffer, "-t", pane_id]);
    if let Err(e) = runner.run(&["delete-buffer", "-b", buffer]) {
        tracing::debug!("could not delete tmux buffer {buffer}: {e}");
    }
    pasted?;
    send_keys(runner, pane_id, &["C-m"])
}
