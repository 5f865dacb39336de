//! Putting the session buffer on screen.

use aidermux_core::BufferLayout;
use aidermux_nvim::{BufNr, FloatWindow, HostError};

use crate::context::SessionContext;
use crate::session::TerminalSession;

pub const FLOAT_TITLE: &str = "| normal mode > q: quit | terminal mode > <Esc>: quit |";

const CLOSE: &str = "<cmd>close!<cr>";

/// Open `bufnr` in a centred floating window sized from the config.
pub fn open_floating(ctx: &SessionContext<'_>, bufnr: BufNr) -> Result<(), HostError> {
    let size = ctx.host.editor_size()?;
    let float = FloatWindow::centered(size, ctx.config.floatwin_width, ctx.config.floatwin_height)
        .with_title(FLOAT_TITLE);
    ctx.host.open_float(bufnr, &float)
}

/// Keymaps that close a floating session window.
pub fn map_close_keys(ctx: &SessionContext<'_>, bufnr: BufNr) -> Result<(), HostError> {
    ctx.host.set_buffer_keymap(bufnr, "t", "<Esc>", CLOSE)?;
    ctx.host.set_buffer_keymap(bufnr, "n", "q", CLOSE)?;
    ctx.host.set_buffer_keymap(bufnr, "n", "<Esc>", CLOSE)
}

/// Open a split for the layout and show `bufnr` in it.
pub fn open_split_with(ctx: &SessionContext<'_>, bufnr: BufNr) -> Result<(), HostError> {
    ctx.host.open_split(ctx.layout() == BufferLayout::Vsplit)?;
    ctx.host.show_buffer(bufnr)
}

/// Focus the session window, opening one per layout if it is hidden.
pub fn show_session(ctx: &SessionContext<'_>, session: &TerminalSession) -> Result<(), HostError> {
    if let Some(winnr) = session.winnr {
        return ctx.host.focus_window(winnr);
    }
    match ctx.layout() {
        BufferLayout::Floating => {
            open_floating(ctx, session.bufnr)?;
            map_close_keys(ctx, session.bufnr)
        }
        BufferLayout::Split | BufferLayout::Vsplit => open_split_with(ctx, session.bufnr),
    }
}
