//! Finding the live aider session.
//!
//! The scan may delete buffers: a session-shaped terminal buffer whose job
//! is gone (left behind by session restore, say) is wiped as soon as it is
//! seen. Callers must expect editor state to change under a lookup.

use aidermux_nvim::{BufNr, EditorHost, HostError, WinNr};

use crate::context::SessionContext;
use crate::session::{PaneSession, Session, TerminalSession};

/// The live session: a registered tmux pane that still exists, else the
/// first live aider terminal buffer.
pub fn locate(ctx: &SessionContext<'_>) -> Result<Option<Session>, HostError> {
    if let Some(pane) = live_pane(ctx)? {
        return Ok(Some(Session::Pane(pane)));
    }
    Ok(locate_terminal(ctx)?.map(Session::Terminal))
}

/// Registered pane, checked against `tmux list-panes`. A pane that is
/// gone is unregistered; an unreachable tmux leaves the registration alone.
pub fn live_pane(ctx: &SessionContext<'_>) -> Result<Option<PaneSession>, HostError> {
    let Some(pane_id) = ctx.registered_pane()? else {
        return Ok(None);
    };
    let Some(mux) = ctx.mux else {
        return Ok(None);
    };
    match aidermux_tmux::pane_exists(&mux, &pane_id) {
        Ok(true) => Ok(Some(PaneSession { pane_id })),
        Ok(false) => {
            tracing::info!("tmux pane {pane_id} is gone, unregistering");
            ctx.clear_pane()?;
            Ok(None)
        }
        Err(e) => {
            tracing::warn!("tmux unreachable, ignoring pane {pane_id}: {e}");
            Ok(None)
        }
    }
}

/// First aider terminal buffer, in ascending buffer order, with a live job.
pub fn locate_terminal(ctx: &SessionContext<'_>) -> Result<Option<TerminalSession>, HostError> {
    for bufnr in ctx.host.buffer_numbers()? {
        let info = ctx.host.buffer_info(bufnr)?;
        if !ctx.backend.is_session_buffer(&info, &ctx.config) {
            continue;
        }
        if info.channel == 0 && !ctx.backend.is_test_mode() {
            tracing::info!("deleting stale aider buffer {bufnr} (no job)");
            ctx.host.delete_buffer(bufnr)?;
            continue;
        }
        return Ok(Some(TerminalSession {
            bufnr,
            job_id: info.channel,
            winnr: window_of(ctx.host, bufnr)?,
        }));
    }
    Ok(None)
}

/// Number of the first window showing `bufnr`.
pub fn window_of(host: &dyn EditorHost, bufnr: BufNr) -> Result<Option<WinNr>, HostError> {
    Ok(host
        .window_buffers()?
        .iter()
        .position(|&b| b == bufnr)
        .map(|idx| idx as WinNr + 1))
}

/// Number of the first window showing any terminal buffer.
pub fn first_terminal_window(host: &dyn EditorHost) -> Result<Option<WinNr>, HostError> {
    for (idx, bufnr) in host.window_buffers()?.into_iter().enumerate() {
        if host.buffer_info(bufnr)?.is_terminal() {
            return Ok(Some(idx as WinNr + 1));
        }
    }
    Ok(None)
}
