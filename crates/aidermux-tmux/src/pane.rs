//! Pane lifecycle: create the aider pane, check it is alive, tear it down.

use crate::error::TmuxError;
use crate::executor::TmuxCommandRunner;

/// Format string for `tmux list-panes -a -F`.
pub const LIST_PANE_IDS_FORMAT: &str = "#{pane_id}";

/// Execute `tmux list-panes -a` and return every pane id (`%N`).
pub fn list_pane_ids(runner: &impl TmuxCommandRunner) -> Result<Vec<String>, TmuxError> {
    let output = runner.run(&["list-panes", "-a", "-F", LIST_PANE_IDS_FORMAT])?;
    Ok(parse_pane_ids(&output))
}

fn parse_pane_ids(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

/// Whether `pane_id` is still listed by the server.
pub fn pane_exists(runner: &impl TmuxCommandRunner, pane_id: &str) -> Result<bool, TmuxError> {
    Ok(list_pane_ids(runner)?.iter().any(|id| id == pane_id))
}

/// Split the current tmux window and run `shell_command` in the new pane.
/// `direction` is `-v` or `-h`. Returns the new pane id.
pub fn split_window(
    runner: &impl TmuxCommandRunner,
    direction: &str,
    shell_command: &str,
) -> Result<String, TmuxError> {
    let output = runner.run(&[
        "split-window",
        direction,
        "-P",
        "-F",
        LIST_PANE_IDS_FORMAT,
        shell_command,
    ])?;
    let pane_id = output.trim();
    if !pane_id.starts_with('%') {
        return Err(TmuxError::UnexpectedOutput {
            command: "split-window",
            output: output.to_string(),
        });
    }
    Ok(pane_id.to_string())
}

/// Command line that runs `command` through the user's login shell so the
/// pane sees the same PATH and rc-file environment as an interactive shell.
pub fn login_shell_command(shell: &str, command: &str) -> String {
    let shell = if shell.trim().is_empty() { "sh" } else { shell.trim() };
    format!("{shell} -lc {}", shell_quote(command))
}

/// Single-quote `s` for `sh`, escaping embedded single quotes as `'\''`.
fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

pub fn send_keys(
    runner: &impl TmuxCommandRunner,
    pane_id: &str,
    keys: &[&str],
) -> Result<(), TmuxError> {
    let mut args = vec!["send-keys", "-t", pane_id];
    args.extend_from_slice(keys);
    runner.run(&args)?;
    Ok(())
}

pub fn kill_pane(runner: &impl TmuxCommandRunner, pane_id: &str) -> Result<(), TmuxError> {
    runner.run(&["kill-pane", "-t", pane_id])?;
    Ok(())
}

/// Type `exit_command` into the pane, submit it, then kill the pane.
/// The pane is killed even when the keystrokes could not be delivered.
pub fn exit_pane(
    runner: &impl TmuxCommandRunner,
    pane_id: &str,
    exit_command: &str,
) -> Result<(), TmuxError> {
    if let Err(e) = send_keys(runner, pane_id, &[exit_command, "C-m"]) {
        tracing::warn!("could not send {exit_command} to pane {pane_id}: {e}");
    }
    kill_pane(runner, pane_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recorder {
        calls: Mutex<Vec<Vec<String>>>,
        reply: String,
        fail_on: Option<&'static str>,
    }

    impl Recorder {
        fn new(reply: &str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                reply: reply.to_string(),
                fail_on: None,
            }
        }

        fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().expect("lock").clone()
        }
    }

    impl TmuxCommandRunner for Recorder {
        fn run(&self, args: &[&str]) -> Result<String, TmuxError> {
            self.calls
                .lock()
                .expect("lock")
                .push(args.iter().map(|s| s.to_string()).collect());
            if self.fail_on == args.first().copied() {
                return Err(TmuxError::failed(args[0], "boom"));
            }
            Ok(self.reply.clone())
        }
    }

    #[test]
    fn parse_ids_skips_blank_lines() {
        assert_eq!(parse_pane_ids("%0\n\n %3 \n"), vec!["%0", "%3"]);
    }

    #[test]
    fn pane_exists_checks_listing() {
        let runner = Recorder::new("%0\n%3\n");
        assert!(pane_exists(&runner, "%3").expect("list"));
        assert!(!pane_exists(&runner, "%4").expect("list"));
        assert_eq!(runner.calls()[0], vec!["list-panes", "-a", "-F", "#{pane_id}"]);
    }

    #[test]
    fn split_window_returns_pane_id() {
        let runner = Recorder::new("%7\n");
        let id = split_window(&runner, "-h", "zsh -lc 'aider'").expect("split");
        assert_eq!(id, "%7");
        assert_eq!(
            runner.calls()[0],
            vec!["split-window", "-h", "-P", "-F", "#{pane_id}", "zsh -lc 'aider'"]
        );
    }

    #[test]
    fn split_window_rejects_garbage() {
        let runner = Recorder::new("no server running\n");
        let err = split_window(&runner, "-v", "sh -lc 'aider'").expect_err("garbage");
        assert!(matches!(err, TmuxError::UnexpectedOutput { .. }));
    }

    #[test]
    fn login_shell_quotes_command() {
        assert_eq!(
            login_shell_command("/bin/zsh", "aider --model 'o3'"),
            "/bin/zsh -lc 'aider --model '\\''o3'\\'''"
        );
        assert_eq!(login_shell_command("", "aider"), "sh -lc 'aider'");
    }

    #[test]
    fn exit_pane_kills_even_if_send_fails() {
        let mut runner = Recorder::new("");
        runner.fail_on = Some("send-keys");
        exit_pane(&runner, "%2", "/exit").expect("kill still runs");
        let calls = runner.calls();
        assert_eq!(calls[0], vec!["send-keys", "-t", "%2", "/exit", "C-m"]);
        assert_eq!(calls[1], vec!["kill-pane", "-t", "%2"]);
    }
}
