//! Prompt construction: aider slash commands, bracketed paste, and the
//! compose buffer seeded from a visual selection.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

pub const BRACKETED_PASTE_START: &str = "\x1b[200~";
pub const BRACKETED_PASTE_END: &str = "\x1b[201~";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatMode {
    Code,
    Architect,
}

impl ChatMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Architect => "architect",
        }
    }
}

impl FromStr for ChatMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "code" => Ok(Self::Code),
            "architect" => Ok(Self::Architect),
            other => Err(CoreError::UnknownChatMode(other.to_string())),
        }
    }
}

/// Slash commands understood by the aider REPL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Add(Vec<String>),
    ReadOnly(Vec<String>),
    Web(String),
    Ask(String),
    Test(String),
    Paste,
    Voice,
    ChatMode(ChatMode),
    Exit,
}

impl SlashCommand {
    /// `true` when the command has a required argument and it is blank.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Add(paths) | Self::ReadOnly(paths) => paths.iter().all(|p| p.trim().is_empty()),
            Self::Web(arg) | Self::Ask(arg) | Self::Test(arg) => arg.trim().is_empty(),
            Self::Paste | Self::Voice | Self::ChatMode(_) | Self::Exit => false,
        }
    }
}

impl fmt::Display for SlashCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add(paths) => write!(f, "/add {}", join_paths(paths)),
            Self::ReadOnly(paths) => write!(f, "/read-only {}", join_paths(paths)),
            Self::Web(url) => write!(f, "/web {url}"),
            Self::Ask(question) => write!(f, "/ask {question}"),
            Self::Test(cmd) => write!(f, "/test {cmd}"),
            Self::Paste => f.write_str("/paste"),
            Self::Voice => f.write_str("/voice"),
            Self::ChatMode(mode) => write!(f, "/chat-mode {}", mode.as_str()),
            Self::Exit => f.write_str("/exit"),
        }
    }
}

fn join_paths(paths: &[String]) -> String {
    paths
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Wrap a multi-line prompt in bracketed-paste markers so the REPL inserts
/// it literally. Single-line prompts pass through untouched.
pub fn wrap_bracketed_paste(prompt: &str) -> String {
    if prompt.contains('\n') {
        format!("{BRACKETED_PASTE_START}{prompt}{BRACKETED_PASTE_END}")
    } else {
        prompt.to_string()
    }
}

/// Lines of the compose buffer opened over a visual selection: the code in
/// a fenced block, optional `# rule` lines, then an empty `# prompt` section.
pub fn selection_compose_lines(
    filetype: &str,
    selection: &[String],
    additional_prompt: Option<&[String]>,
) -> Vec<String> {
    let mut lines = Vec::with_capacity(selection.len() + 8);
    lines.push(format!("```{filetype}"));
    lines.extend(selection.iter().cloned());
    lines.push("```".to_string());
    lines.push(String::new());
    if let Some(rules) = additional_prompt.filter(|r| !r.is_empty()) {
        lines.push("# rule".to_string());
        lines.extend(rules.iter().cloned());
        lines.push(String::new());
    }
    lines.push("# prompt".to_string());
    lines.push(String::new());
    lines
}
