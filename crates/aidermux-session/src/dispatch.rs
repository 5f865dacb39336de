//! Delivering prompts to the live session.
//!
//! Exactly one delivery path runs per call, picked from the located session
//! and the layout. A failing tmux path is logged and dropped, never retried
//! through the editor.

use aidermux_core::BufferLayout;
use aidermux_nvim::HostError;

use crate::backend::Delivery;
use crate::context::SessionContext;
use crate::lifecycle;
use crate::locator::{first_terminal_window, locate, window_of};
use crate::session::{PaneSession, Session, TerminalSession};
use crate::window;

pub const NOT_RUNNING_NOTICE: &str = "Aider is not running";

const ESCAPE: &str = "\x1b";

/// Send `prompt` to aider, bringing its window forward as the layout asks.
/// With no session, aider is started and the prompt is dropped.
pub fn send(ctx: &SessionContext<'_>, prompt: &str) -> Result<(), HostError> {
    if prompt.trim().is_empty() {
        return Ok(());
    }
    let Some(session) = locate(ctx)? else {
        ctx.host.notify(NOT_RUNNING_NOTICE)?;
        return lifecycle::start(ctx);
    };
    match session {
        Session::Pane(pane) => {
            paste_to_pane(ctx, &pane, prompt);
            Ok(())
        }
        Session::Terminal(term) => match ctx.layout() {
            BufferLayout::Floating => {
                window::show_session(ctx, &term)?;
                ctx.backend.send_prompt(ctx.host, &term, prompt, Delivery::Inject)
            }
            BufferLayout::Split | BufferLayout::Vsplit => send_through_split(ctx, &term, prompt),
        },
    }
}

/// Send `prompt` without touching any window. With no session, aider is
/// started in the background and the prompt is dropped.
pub fn send_silently(ctx: &SessionContext<'_>, prompt: &str) -> Result<(), HostError> {
    if prompt.trim().is_empty() {
        return Ok(());
    }
    match locate(ctx)? {
        None => {
            ctx.host.notify(NOT_RUNNING_NOTICE)?;
            lifecycle::silent_start(ctx)
        }
        Some(Session::Pane(pane)) => {
            paste_to_pane(ctx, &pane, prompt);
            Ok(())
        }
        Some(Session::Terminal(term)) => {
            ctx.backend.send_prompt(ctx.host, &term, prompt, Delivery::Inject)
        }
    }
}

/// Send the contents of the current buffer, which is discarded first.
pub fn send_from_buffer(ctx: &SessionContext<'_>) -> Result<(), HostError> {
    let bufnr = ctx.host.current_buffer()?;
    let lines = ctx.host.buffer_lines(bufnr)?.join("\n");
    ctx.host.delete_buffer(bufnr)?;
    send(ctx, lines.trim_end_matches('\n'))
}

/// Read one key from the user and forward it to aider unsubmitted. `<Esc>`
/// cancels; `<CR>` becomes a newline. With `choices`, any other key outside
/// the set is ignored.
pub fn send_keystroke(ctx: &SessionContext<'_>, choices: Option<&str>) -> Result<(), HostError> {
    let Some(session) = locate(ctx)? else {
        ctx.host.notify(NOT_RUNNING_NOTICE)?;
        return lifecycle::silent_start(ctx);
    };
    let key = ctx.host.getchar()?;
    if key.is_empty() || key == ESCAPE {
        return Ok(());
    }
    let enter = key == "\r" || key == "\n";
    if !enter && choices.is_some_and(|set| !set.contains(key.as_str())) {
        tracing::debug!("ignoring key {key:?} outside {choices:?}");
        return Ok(());
    }
    match session {
        Session::Terminal(term) => {
            let data = if enter { "\n" } else { key.as_str() };
            ctx.backend.send_prompt(ctx.host, &term, data, Delivery::Raw)
        }
        Session::Pane(pane) => {
            let Some(mux) = ctx.mux else {
                return Ok(());
            };
            let keys: &[&str] = if enter { &["C-m"] } else { &["-l", key.as_str()] };
            if let Err(e) = aidermux_tmux::send_keys(&mux, &pane.pane_id, keys) {
                tracing::warn!("could not send key to pane {}: {e}", pane.pane_id);
            }
            Ok(())
        }
    }
}

fn paste_to_pane(ctx: &SessionContext<'_>, pane: &PaneSession, prompt: &str) {
    let Some(mux) = ctx.mux else {
        return;
    };
    if let Err(e) = aidermux_tmux::paste_prompt(&mux, &pane.pane_id, prompt) {
        tracing::warn!("prompt not delivered to pane {}: {e}", pane.pane_id);
    }
}

/// Register-and-paste into the session's split window, then return focus
/// to where the user was.
fn send_through_split(
    ctx: &SessionContext<'_>,
    term: &TerminalSession,
    prompt: &str,
) -> Result<(), HostError> {
    match term.winnr {
        Some(winnr) => ctx.host.focus_window(winnr)?,
        None => window::open_split_with(ctx, term.bufnr)?,
    }
    if ctx.host.current_buffer()? != term.bufnr {
        let fallback = match window_of(ctx.host, term.bufnr)? {
            Some(winnr) => Some(winnr),
            None => first_terminal_window(ctx.host)?,
        };
        if let Some(winnr) = fallback {
            ctx.host.focus_window(winnr)?;
        }
    }
    ctx.backend
        .send_prompt(ctx.host, term, prompt, Delivery::RegisterPaste)?;
    ctx.host.focus_previous_window()
}
