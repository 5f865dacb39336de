mod common;

use aidermux_core::BufferLayout;
use aidermux_nvim::{EditorHost, FakeEditor};
use aidermux_session::backend::OPEN_EVENT;
use aidermux_session::context::PANE_VAR;
use aidermux_session::lifecycle::BACKGROUND_NOTICE;
use aidermux_session::window::FLOAT_TITLE;
use aidermux_session::{MockBackend, TerminalBackend, exit, hide, locate, silent_start, start};
use common::{FakeTmux, config, context, editor_with_pane, test_config};

#[test]
fn floating_start_opens_terminal_in_float() {
    let editor = FakeEditor::new();
    let ctx = context(&editor, &TerminalBackend, None, config(BufferLayout::Floating));

    start(&ctx).expect("start");

    let win = editor.current_window();
    let float = win.float.expect("float window");
    assert_eq!((float.width, float.height), (100, 20));
    assert_eq!((float.row, float.col), (15, 50));
    assert_eq!(float.title.as_deref(), Some(FLOAT_TITLE));
    assert_eq!(editor.terminal_commands(), vec!["aider"]);
    assert_eq!(editor.events(), vec![OPEN_EVENT]);
    // the scratch buffer the float was opened on is gone
    assert_eq!(editor.buffer_count(), 2);

    let session = locate(&ctx).expect("locate").expect("session");
    let term = session.as_terminal().expect("terminal");
    assert_eq!(term.bufnr, win.bufnr);
    assert_eq!(term.winnr, Some(2));
    let keys: Vec<_> = editor.keymaps(term.bufnr).into_iter().map(|(m, l, _)| (m, l)).collect();
    assert!(keys.contains(&("t".into(), "<Esc>".into())));
    assert!(keys.contains(&("n".into(), "q".into())));
}

#[test]
fn split_start_runs_in_new_split() {
    let editor = FakeEditor::new();
    let ctx = context(&editor, &TerminalBackend, None, config(BufferLayout::Vsplit));

    start(&ctx).expect("start");

    assert_eq!(editor.window_count(), 2);
    assert!(editor.current_window().float.is_none());
    assert!(editor.buffer_info(editor.current_buffer().expect("current")).expect("info").is_terminal());
}

#[test]
fn configured_command_is_launched() {
    let editor = FakeEditor::new();
    let mut cfg = config(BufferLayout::Split);
    cfg.command = "aider --no-auto-commits".into();
    let ctx = context(&editor, &TerminalBackend, None, cfg);

    start(&ctx).expect("start");
    assert_eq!(editor.terminal_commands(), vec!["aider --no-auto-commits"]);
    assert!(locate(&ctx).expect("locate").is_some());
}

#[test]
fn start_focuses_running_session() {
    let editor = FakeEditor::new();
    let term = editor.add_terminal("term://~//4100:aider", 5);
    editor.show_in_split(term);
    editor.focus_window(1).expect("focus");
    let ctx = context(&editor, &TerminalBackend, None, config(BufferLayout::Split));

    start(&ctx).expect("start");

    assert_eq!(editor.current_window().bufnr, term);
    assert_eq!(editor.window_count(), 2);
    assert!(editor.terminal_commands().is_empty());
}

#[test]
fn start_reshows_hidden_session_in_split() {
    let editor = FakeEditor::new();
    let term = editor.add_terminal("term://~//4100:aider", 5);
    let ctx = context(&editor, &TerminalBackend, None, config(BufferLayout::Split));

    start(&ctx).expect("start");

    assert_eq!(editor.window_buffers().expect("windows"), vec![1, term]);
    assert!(editor.terminal_commands().is_empty());
}

#[test]
fn start_then_exit_restores_layout() {
    for layout in BufferLayout::ALL {
        let editor = FakeEditor::new();
        let file = editor.add_file("/repo/src/lib.rs", "rust", &["x"]);
        editor.show_in_current(file);
        let (buffers, windows) = (editor.buffer_count(), editor.window_count());

        let ctx = context(&editor, &TerminalBackend, None, config(layout));
        start(&ctx).expect("start");
        assert_eq!(editor.buffer_count(), buffers + 1, "{layout}");
        exit(&ctx).expect("exit");

        assert_eq!(editor.buffer_count(), buffers, "{layout}");
        assert_eq!(editor.window_count(), windows, "{layout}");
        assert!(locate(&ctx).expect("locate").is_none());
    }
}

#[test]
fn mock_start_then_exit_restores_layout() {
    for layout in BufferLayout::ALL {
        let editor = FakeEditor::new();
        let (buffers, windows) = (editor.buffer_count(), editor.window_count());

        let ctx = context(&editor, &MockBackend, None, test_config(layout));
        start(&ctx).expect("start");
        exit(&ctx).expect("exit");

        assert_eq!(editor.buffer_count(), buffers, "{layout}");
        assert_eq!(editor.window_count(), windows, "{layout}");
    }
}

#[test]
fn terminal_exit_sends_exit_command() {
    let editor = FakeEditor::new();
    let term = editor.add_terminal("term://~//4100:aider", 5);
    let ctx = context(&editor, &TerminalBackend, None, config(BufferLayout::Floating));

    exit(&ctx).expect("exit");

    assert_eq!(editor.chansends(), vec![(5, "/exit\n".to_string())]);
    assert!(editor.buffer(term).is_none());
}

#[test]
fn exit_without_session_changes_nothing() {
    let editor = FakeEditor::new();
    let tmux = FakeTmux::with_panes(&["%1"]);
    let ctx = context(&editor, &TerminalBackend, Some(&tmux), config(BufferLayout::Vsplit));

    exit(&ctx).expect("exit");

    assert_eq!(editor.buffer_count(), 1);
    assert_eq!(editor.window_count(), 1);
    assert!(editor.chansends().is_empty());
    assert!(tmux.calls().is_empty());
}

#[test]
fn tmux_split_layout_starts_pane() {
    let editor = FakeEditor::new();
    editor.set_env("TMUX", "/tmp/tmux-1000/default,4242,0");
    editor.set_env("SHELL", "/bin/zsh");
    let tmux = FakeTmux::with_panes(&["%1"]);
    let ctx = context(&editor, &TerminalBackend, Some(&tmux), config(BufferLayout::Vsplit));

    start(&ctx).expect("start");

    let split = tmux.calls_to("split-window");
    assert_eq!(split.len(), 1);
    assert_eq!(split[0][0], "-h");
    assert_eq!(split[0].last().map(String::as_str), Some("/bin/zsh -lc 'aider'"));
    assert_eq!(editor.global(PANE_VAR), Some(serde_json::json!("%10")));
    assert_eq!(editor.events(), vec![OPEN_EVENT]);
    assert!(editor.terminal_commands().is_empty());
    assert_eq!(editor.window_count(), 1);

    // a second start finds the pane
    start(&ctx).expect("start again");
    assert_eq!(tmux.calls_to("split-window").len(), 1);
}

#[test]
fn horizontal_split_uses_vertical_tmux_flag() {
    let editor = FakeEditor::new();
    editor.set_env("TMUX", "/tmp/tmux-1000/default,4242,0");
    let tmux = FakeTmux::with_panes(&[]);
    let ctx = context(&editor, &TerminalBackend, Some(&tmux), config(BufferLayout::Split));

    start(&ctx).expect("start");

    let split = tmux.calls_to("split-window");
    assert_eq!(split[0][0], "-v");
    assert_eq!(split[0].last().map(String::as_str), Some("sh -lc 'aider'"));
}

#[test]
fn floating_layout_ignores_tmux() {
    let editor = FakeEditor::new();
    editor.set_env("TMUX", "/tmp/tmux-1000/default,4242,0");
    let tmux = FakeTmux::with_panes(&[]);
    let ctx = context(&editor, &TerminalBackend, Some(&tmux), config(BufferLayout::Floating));

    start(&ctx).expect("start");

    assert!(tmux.calls_to("split-window").is_empty());
    assert_eq!(editor.terminal_commands(), vec!["aider"]);
}

#[test]
fn failed_split_falls_back_to_terminal() {
    let editor = FakeEditor::new();
    editor.set_env("TMUX", "/tmp/tmux-1000/default,4242,0");
    let tmux = FakeTmux::with_panes(&[]);
    tmux.fail("split-window");
    let ctx = context(&editor, &TerminalBackend, Some(&tmux), config(BufferLayout::Vsplit));

    start(&ctx).expect("start");

    assert!(editor.global(PANE_VAR).is_none());
    assert_eq!(editor.terminal_commands(), vec!["aider"]);
    assert_eq!(editor.window_count(), 2);
}

#[test]
fn pane_exit_kills_and_unregisters() {
    let editor = editor_with_pane("%3");
    let tmux = FakeTmux::with_panes(&["%3"]);
    let ctx = context(&editor, &TerminalBackend, Some(&tmux), config(BufferLayout::Vsplit));

    exit(&ctx).expect("exit");

    assert_eq!(tmux.calls_to("send-keys"), vec![vec!["-t", "%3", "/exit", "C-m"]]);
    assert_eq!(tmux.calls_to("kill-pane"), vec![vec!["-t", "%3"]]);
    assert!(tmux.panes().is_empty());
    assert!(editor.global(PANE_VAR).is_none());
}

#[test]
fn pane_exit_clears_even_when_tmux_fails() {
    let editor = editor_with_pane("%3");
    let tmux = FakeTmux::with_panes(&["%3"]);
    tmux.fail("send-keys");
    tmux.fail("kill-pane");
    let ctx = context(&editor, &TerminalBackend, Some(&tmux), config(BufferLayout::Vsplit));

    exit(&ctx).expect("exit");
    assert!(editor.global(PANE_VAR).is_none());
}

#[test]
fn silent_start_keeps_current_buffer() {
    let editor = FakeEditor::new();
    let file = editor.add_file("/repo/src/lib.rs", "rust", &["x"]);
    editor.show_in_current(file);
    let ctx = context(&editor, &TerminalBackend, None, config(BufferLayout::Floating));

    silent_start(&ctx).expect("silent start");

    assert_eq!(editor.current_window().bufnr, file);
    assert_eq!(editor.window_count(), 1);
    assert_eq!(editor.buffer_count(), 3);
    assert_eq!(editor.notices(), vec![BACKGROUND_NOTICE]);
    let session = locate(&ctx).expect("locate").expect("session");
    assert_eq!(session.as_terminal().and_then(|s| s.winnr), None);
}

#[test]
fn hide_closes_window_and_reloads() {
    let editor = FakeEditor::new();
    let ctx = context(&editor, &TerminalBackend, None, config(BufferLayout::Floating));
    start(&ctx).expect("start");
    assert_eq!(editor.window_count(), 2);

    hide(&ctx).expect("hide");

    assert_eq!(editor.window_count(), 1);
    assert_eq!(editor.executed(), vec!["silent! e!"]);
    let session = locate(&ctx).expect("locate").expect("session");
    assert!(!session.as_terminal().expect("terminal").is_visible());
}

#[test]
fn hide_on_last_window_still_reloads() {
    let editor = FakeEditor::new();
    let ctx = context(&editor, &TerminalBackend, None, config(BufferLayout::Floating));

    hide(&ctx).expect("hide");

    assert_eq!(editor.window_count(), 1);
    assert_eq!(editor.executed(), vec!["silent! e!"]);
}
