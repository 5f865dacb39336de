//! CLI definition using clap derive.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "aidermux", about = "drive aider from Neovim", version)]
pub struct Cli {
    /// Address of the Neovim server to drive (default: $NVIM, then $NVIM_LISTEN_ADDRESS)
    #[arg(long, global = true, env = "NVIM")]
    pub server: Option<String>,

    /// Neovim binary used for --remote-expr calls
    #[arg(long, global = true, env = "AIDERMUX_NVIM_BIN", default_value = "nvim")]
    pub nvim_bin: String,

    /// tmux binary
    #[arg(long, global = true, env = "AIDERMUX_TMUX_BIN", default_value = "tmux")]
    pub tmux_bin: String,

    /// tmux socket path (default: the server named by $TMUX)
    #[arg(long, global = true)]
    pub tmux_socket: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// `--server`/`$NVIM`, falling back to the pre-0.9 `$NVIM_LISTEN_ADDRESS`.
    pub fn server_address(&self) -> Option<String> {
        self.server
            .clone()
            .or_else(|| std::env::var("NVIM_LISTEN_ADDRESS").ok())
            .filter(|s| !s.trim().is_empty())
    }
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Define the :Aider* commands in the editor
    Setup(SetupOpts),
    /// Show aider, starting it if needed (:AiderRun)
    Run,
    /// Start aider without showing it (:AiderSilentRun)
    SilentRun,
    /// Close the current window (:AiderHide)
    Hide,
    /// Stop aider (:AiderExit)
    Exit,
    /// Send a prompt (:AiderSendPromptByCommandline)
    Send {
        #[arg(allow_hyphen_values = true)]
        prompt: String,
    },
    /// Send a prompt without opening a window (:AiderSilentSendPromptByCommandline)
    SilentSend {
        #[arg(allow_hyphen_values = true)]
        prompt: String,
    },
    /// Send the current buffer as the prompt and discard it (:AiderSendPrompt)
    SendBuffer,
    /// Open a compose window over lines LINE1..LINE2 (:AiderVisualTextWithPrompt)
    Visual { line1: u32, line2: u32 },
    /// /add files (:AiderAddFile)
    AddFile {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// /read-only files (:AiderAddFileReadOnly)
    AddFileReadOnly {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// /add the current file (:AiderAddCurrentFile)
    AddCurrentFile,
    /// /read-only the current file (:AiderAddCurrentFileReadOnly)
    AddCurrentFileReadOnly,
    /// /add every git-tracked buffer (:AiderAddBuffers)
    AddBuffers,
    /// /web URL (:AiderAddWeb)
    AddWeb { url: String },
    /// /ask QUESTION (:AiderAsk)
    Ask {
        #[arg(allow_hyphen_values = true)]
        question: String,
    },
    /// /test COMMAND (:AiderTest)
    Test {
        #[arg(allow_hyphen_values = true)]
        command: String,
    },
    /// /paste (:AiderPaste)
    Paste,
    /// /voice (:AiderVoice)
    Voice,
    /// /chat-mode MODE (:AiderChatMode)
    ChatMode { mode: String },
    /// Forward one key typed in the editor (:AiderSendKey)
    SendKey,
    /// Forward one key from CHOICES (:AiderSendChoice)
    SendChoice { choices: String },
}

#[derive(clap::Args, Debug, Default, PartialEq, Eq)]
pub struct SetupOpts {
    /// Print the command definitions instead of executing them
    #[arg(long)]
    pub print: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("aidermux").chain(args.iter().copied()))
            .expect("parse")
    }

    #[test]
    fn send_takes_whole_prompt() {
        let cli = parse(&["--server", "/tmp/nvim.sock", "send", "fix the bug"]);
        assert_eq!(
            cli.command,
            Command::Send {
                prompt: "fix the bug".into()
            }
        );
        assert_eq!(cli.server_address().as_deref(), Some("/tmp/nvim.sock"));
    }

    #[test]
    fn visual_parses_line_range() {
        let cli = parse(&["visual", "3", "9"]);
        assert_eq!(cli.command, Command::Visual { line1: 3, line2: 9 });
    }

    #[test]
    fn add_file_requires_a_path() {
        assert!(Cli::try_parse_from(["aidermux", "add-file"]).is_err());
        let cli = parse(&["add-file", "a.rs", "b.rs"]);
        assert_eq!(
            cli.command,
            Command::AddFile {
                paths: vec!["a.rs".into(), "b.rs".into()]
            }
        );
    }

    #[test]
    fn binary_overrides() {
        let cli = parse(&["--nvim-bin", "nvim", "--tmux-bin", "tmux", "run"]);
        assert_eq!(cli.command, Command::Run);
        assert_eq!(cli.nvim_bin, "nvim");
        assert_eq!(cli.tmux_bin, "tmux");
    }

    #[test]
    fn setup_print_flag() {
        let cli = parse(&["setup", "--print"]);
        assert_eq!(cli.command, Command::Setup(SetupOpts { print: true }));
    }
}
