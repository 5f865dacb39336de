//! Editor commands that build a prompt before dispatching it.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use aidermux_core::{BufferLayout, SlashCommand, prompt::selection_compose_lines};
use aidermux_nvim::HostError;

use crate::context::SessionContext;
use crate::dispatch::{self, NOT_RUNNING_NOTICE};
use crate::lifecycle;
use crate::locator::locate;
use crate::window;

pub const RUN_AGAIN_NOTICE: &str = "Run AiderAddCurrentFile again.";
pub const NO_TRACKED_BUFFERS_NOTICE: &str = "No git-tracked buffers to add.";

/// Send a slash command. Commands missing their argument are dropped.
pub fn send_command(ctx: &SessionContext<'_>, command: &SlashCommand) -> Result<(), HostError> {
    if command.is_empty() {
        tracing::debug!("dropping {command:?} without argument");
        return Ok(());
    }
    dispatch::send(ctx, &command.to_string())
}

/// `/add` (or `/read-only`) the file in the current buffer.
///
/// With no session the floating layout starts aider in the background and
/// goes on to send; the split layouts open aider and ask the user to rerun.
pub fn add_current_file(ctx: &SessionContext<'_>, read_only: bool) -> Result<(), HostError> {
    let current = ctx.host.current_buffer()?;
    if ctx.host.buffer_info(current)?.is_terminal() {
        return Ok(());
    }
    let path = ctx.host.current_file_path()?;
    if locate(ctx)?.is_none() {
        if ctx.layout() == BufferLayout::Floating {
            lifecycle::silent_start(ctx)?;
        } else {
            lifecycle::start(ctx)?;
            // A tmux pane leaves focus alone; only an editor split took it.
            if ctx.host.current_buffer()? != current {
                ctx.host.focus_previous_window()?;
            }
            return ctx.host.notify(RUN_AGAIN_NOTICE);
        }
    }
    let paths = vec![path];
    let command = if read_only {
        SlashCommand::ReadOnly(paths)
    } else {
        SlashCommand::Add(paths)
    };
    send_command(ctx, &command)
}

/// Files tracked by git, relative to the repository root.
#[derive(Debug, Clone, Default)]
pub struct RepoFiles {
    root: PathBuf,
    tracked: BTreeSet<String>,
}

impl RepoFiles {
    pub fn new(root: impl Into<PathBuf>, tracked: impl IntoIterator<Item = String>) -> Self {
        Self {
            root: root.into(),
            tracked: tracked.into_iter().collect(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Repository-relative form of `path` when git tracks it. Relative
    /// paths are taken as relative to the root.
    pub fn relative(&self, path: &str) -> Option<String> {
        let candidate = Path::new(path);
        let rel = if candidate.is_absolute() {
            candidate.strip_prefix(&self.root).ok()?
        } else {
            candidate.strip_prefix("./").unwrap_or(candidate)
        };
        let rel = rel.to_str()?.to_string();
        self.tracked.contains(&rel).then_some(rel)
    }
}

/// `/add` every listed file buffer git tracks, in one prompt.
pub fn add_buffers(ctx: &SessionContext<'_>, repo: Option<&RepoFiles>) -> Result<(), HostError> {
    let mut paths = Vec::new();
    if let Some(repo) = repo {
        for bufnr in ctx.host.buffer_numbers()? {
            let info = ctx.host.buffer_info(bufnr)?;
            if !info.listed || info.name.is_empty() || !info.buftype.is_empty() {
                continue;
            }
            if let Some(rel) = repo.relative(&info.name) {
                if !paths.contains(&rel) {
                    paths.push(rel);
                }
            }
        }
    }
    if paths.is_empty() {
        return ctx.host.notify(NO_TRACKED_BUFFERS_NOTICE);
    }
    send_command(ctx, &SlashCommand::Add(paths))
}

/// Open a compose float seeded with lines `start..=end` of the current
/// buffer. `<CR>` in normal mode sends it through `AiderSendPrompt`.
pub fn compose_from_selection(ctx: &SessionContext<'_>, start: u32, end: u32) -> Result<(), HostError> {
    let (start, end) = if start <= end { (start, end) } else { (end, start) };
    let selection = ctx.host.line_range(start, end)?;
    if ctx.layout() != BufferLayout::Floating && locate(ctx)?.is_none() {
        ctx.host.notify(NOT_RUNNING_NOTICE)?;
        return lifecycle::start(ctx);
    }
    let current = ctx.host.current_buffer()?;
    let filetype = ctx.host.buffer_info(current)?.filetype;
    let lines = selection_compose_lines(
        &filetype,
        &selection,
        ctx.config.additional_prompt.as_deref(),
    );

    let bufnr = ctx.host.create_scratch_buffer()?;
    window::open_floating(ctx, bufnr)?;
    ctx.host.set_lines(bufnr, &lines)?;
    ctx.host.start_insert_at_end()?;
    ctx.host.set_buffer_keymap(bufnr, "n", "q", "<cmd>close!<cr>")?;
    ctx.host.set_buffer_keymap(bufnr, "n", "<CR>", "<cmd>AiderSendPrompt<cr>")
}
