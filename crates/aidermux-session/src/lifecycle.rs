//! Starting, hiding and stopping aider.
//!
//! Session states: Absent → Running{visible|hidden} → Exited (= Absent).
//! There is no "starting" wait: a session counts as running as soon as its
//! terminal buffer or pane exists.

use aidermux_core::{BufferLayout, SlashCommand};
use aidermux_nvim::HostError;

use crate::backend::OPEN_EVENT;
use crate::context::SessionContext;
use crate::locator::{locate, locate_terminal};
use crate::session::Session;
use crate::window;

pub const BACKGROUND_NOTICE: &str = "Aider is running in the background.";

/// Show the running session, or launch a new one.
pub fn start(ctx: &SessionContext<'_>) -> Result<(), HostError> {
    match locate(ctx)? {
        Some(Session::Pane(pane)) => {
            tracing::debug!("aider already running in pane {}", pane.pane_id);
            Ok(())
        }
        Some(Session::Terminal(session)) => window::show_session(ctx, &session),
        None => {
            if ctx.wants_pane()? && spawn_pane(ctx)? {
                return Ok(());
            }
            open_new_session(ctx)
        }
    }
}

/// Launch aider in a new tmux pane through the user's login shell.
/// Returns `false` (after logging) when tmux refused, so the caller can
/// fall back to a terminal buffer.
fn spawn_pane(ctx: &SessionContext<'_>) -> Result<bool, HostError> {
    let (Some(mux), Some(direction)) = (ctx.mux, ctx.layout().tmux_split_flag()) else {
        return Ok(false);
    };
    let shell = ctx.host.getenv("SHELL")?.unwrap_or_else(|| "sh".to_string());
    let command = aidermux_tmux::login_shell_command(&shell, &ctx.config.command);
    match aidermux_tmux::split_window(&mux, direction, &command) {
        Ok(pane_id) => {
            tracing::info!("started aider in tmux pane {pane_id}");
            ctx.register_pane(&pane_id)?;
            ctx.host.emit_user_event(OPEN_EVENT)?;
            Ok(true)
        }
        Err(e) => {
            tracing::warn!("tmux split-window failed, using a terminal buffer: {e}");
            Ok(false)
        }
    }
}

fn open_new_session(ctx: &SessionContext<'_>) -> Result<(), HostError> {
    match ctx.layout() {
        BufferLayout::Floating => {
            let scratch = ctx.host.create_scratch_buffer()?;
            window::open_floating(ctx, scratch)?;
            let bufnr = ctx.backend.run(ctx.host, &ctx.config)?;
            window::map_close_keys(ctx, bufnr)?;
            if bufnr != scratch {
                if let Err(e) = ctx.host.delete_buffer(scratch) {
                    tracing::debug!("could not wipe scratch buffer {scratch}: {e}");
                }
            }
            Ok(())
        }
        layout => {
            ctx.host.open_split(layout == BufferLayout::Vsplit)?;
            ctx.backend.run(ctx.host, &ctx.config).map(|_| ())
        }
    }
}

/// Launch aider without showing it: the current window ends up on the
/// buffer it showed before.
pub fn silent_start(ctx: &SessionContext<'_>) -> Result<(), HostError> {
    let previous = ctx.host.current_buffer()?;
    ctx.host.edit_new_buffer()?;
    let blank = ctx.host.current_buffer()?;
    let bufnr = ctx.backend.run(ctx.host, &ctx.config)?;
    ctx.host.show_buffer(previous)?;
    if blank != bufnr && blank != previous {
        if let Err(e) = ctx.host.delete_buffer(blank) {
            tracing::debug!("could not wipe blank buffer {blank}: {e}");
        }
    }
    ctx.host.notify(BACKGROUND_NOTICE)
}

/// Stop aider. No session is not an error.
pub fn exit(ctx: &SessionContext<'_>) -> Result<(), HostError> {
    if let Some(pane_id) = ctx.registered_pane()? {
        match ctx.mux {
            Some(mux) => {
                let exit_command = SlashCommand::Exit.to_string();
                if let Err(e) = aidermux_tmux::exit_pane(&mux, &pane_id, &exit_command) {
                    tracing::warn!("could not kill tmux pane {pane_id}: {e}");
                }
            }
            None => tracing::warn!("no tmux available to stop pane {pane_id}"),
        }
        return ctx.clear_pane();
    }
    match locate_terminal(ctx)? {
        Some(session) => ctx.backend.exit(ctx.host, &session),
        None => Ok(()),
    }
}

/// Close the current window and reload whatever it left focused.
pub fn hide(ctx: &SessionContext<'_>) -> Result<(), HostError> {
    if let Err(e) = ctx.host.close_current_window() {
        tracing::debug!("close! failed: {e}");
    }
    ctx.host.reload_current_buffer()
}
