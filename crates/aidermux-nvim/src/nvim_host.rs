//! `EditorHost` over a running Neovim, one `--remote-expr` per operation.
//! Every expression is wrapped in `json_encode()` so replies decode with
//! serde regardless of type.

use serde::de::DeserializeOwned;

use crate::error::HostError;
use crate::host::{BufNr, BufferInfo, EditorHost, EditorSize, FloatWindow, JobId, WinNr};
use crate::literal::{vim_list, vim_str};
use crate::remote::NvimCommandRunner;

pub struct NvimHost<R> {
    runner: R,
}

impl<R: NvimCommandRunner> NvimHost<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    fn eval_json<T: DeserializeOwned>(&self, expr: &str) -> Result<T, HostError> {
        let reply = self.runner.eval(&format!("json_encode({expr})"))?;
        serde_json::from_str(reply.trim()).map_err(|source| HostError::Decode {
            expr: expr.to_string(),
            source,
        })
    }

    fn call(&self, expr: &str) -> Result<(), HostError> {
        self.eval_json::<serde_json::Value>(expr).map(|_| ())
    }

    fn ex(&self, command: &str) -> Result<(), HostError> {
        self.call(&format!("execute({})", vim_str(command)))
    }
}

impl<R: NvimCommandRunner> EditorHost for NvimHost<R> {
    fn buffer_numbers(&self) -> Result<Vec<BufNr>, HostError> {
        let mut numbers: Vec<BufNr> = self.eval_json("map(getbufinfo(), 'v:val.bufnr')")?;
        numbers.sort_unstable();
        Ok(numbers)
    }

    fn buffer_info(&self, bufnr: BufNr) -> Result<BufferInfo, HostError> {
        self.eval_json(&format!(
            "{{'bufnr': {bufnr}, 'name': bufname({bufnr}), \
             'channel': getbufvar({bufnr}, '&channel'), \
             'buftype': getbufvar({bufnr}, '&buftype'), \
             'filetype': getbufvar({bufnr}, '&filetype'), \
             'listed': buflisted({bufnr}) ? v:true : v:false}}"
        ))
    }

    fn buffer_lines(&self, bufnr: BufNr) -> Result<Vec<String>, HostError> {
        self.eval_json(&format!("getbufline({bufnr}, 1, '$')"))
    }

    fn append_lines(&self, bufnr: BufNr, lines: &[String]) -> Result<(), HostError> {
        self.call(&format!("appendbufline({bufnr}, '$', {})", vim_list(lines)))
    }

    fn set_lines(&self, bufnr: BufNr, lines: &[String]) -> Result<(), HostError> {
        self.call(&format!(
            "nvim_buf_set_lines({bufnr}, 0, -1, v:true, {})",
            vim_list(lines)
        ))
    }

    fn current_buffer(&self) -> Result<BufNr, HostError> {
        self.eval_json("bufnr('%')")
    }

    fn line_range(&self, start: u32, end: u32) -> Result<Vec<String>, HostError> {
        self.eval_json(&format!("getline({start}, {end})"))
    }

    fn current_file_path(&self) -> Result<String, HostError> {
        self.eval_json("expand('%:p')")
    }

    fn create_scratch_buffer(&self) -> Result<BufNr, HostError> {
        self.eval_json("nvim_create_buf(v:false, v:true)")
    }

    fn add_buffer(&self, name: &str) -> Result<BufNr, HostError> {
        let bufnr: BufNr = self.eval_json(&format!("bufadd({})", vim_str(name)))?;
        self.call(&format!("bufload({bufnr})"))?;
        Ok(bufnr)
    }

    fn delete_buffer(&self, bufnr: BufNr) -> Result<(), HostError> {
        self.ex(&format!("bdelete! {bufnr}"))
    }

    fn edit_new_buffer(&self) -> Result<(), HostError> {
        self.ex("enew")
    }

    fn show_buffer(&self, bufnr: BufNr) -> Result<(), HostError> {
        self.ex(&format!("buffer {bufnr}"))
    }

    fn reload_current_buffer(&self) -> Result<(), HostError> {
        self.ex("silent! e!")
    }

    fn window_buffers(&self) -> Result<Vec<BufNr>, HostError> {
        self.eval_json("map(range(1, winnr('$')), 'winbufnr(v:val)')")
    }

    fn open_split(&self, vertical: bool) -> Result<(), HostError> {
        self.ex(if vertical { "vsplit" } else { "split" })
    }

    fn open_float(&self, bufnr: BufNr, float: &FloatWindow) -> Result<(), HostError> {
        let mut config = format!(
            "'relative': 'editor', 'border': 'double', 'width': {}, 'height': {}, \
             'row': {}, 'col': {}",
            float.width, float.height, float.row, float.col
        );
        if let Some(ref title) = float.title {
            config.push_str(&format!(", 'title': {}", vim_str(title)));
        }
        self.call(&format!("nvim_open_win({bufnr}, v:true, {{{config}}})"))?;
        self.ex("setlocal nonumber")
    }

    fn focus_window(&self, winnr: WinNr) -> Result<(), HostError> {
        self.ex(&format!("{winnr}wincmd w"))
    }

    fn focus_previous_window(&self) -> Result<(), HostError> {
        self.ex("wincmd p")
    }

    fn close_current_window(&self) -> Result<(), HostError> {
        self.ex("close!")
    }

    fn editor_size(&self) -> Result<EditorSize, HostError> {
        self.eval_json("{'columns': &columns, 'lines': &lines}")
    }

    fn set_buffer_keymap(
        &self,
        bufnr: BufNr,
        mode: &str,
        lhs: &str,
        rhs: &str,
    ) -> Result<(), HostError> {
        self.call(&format!(
            "nvim_buf_set_keymap({bufnr}, {}, {}, {}, {{'silent': v:true}})",
            vim_str(mode),
            vim_str(lhs),
            vim_str(rhs)
        ))
    }

    fn start_insert_at_end(&self) -> Result<(), HostError> {
        self.ex("normal! G")?;
        self.ex("startinsert!")
    }

    fn open_terminal(&self, command: &str) -> Result<BufNr, HostError> {
        self.ex(&format!("terminal {command}"))?;
        self.current_buffer()
    }

    fn chansend(&self, job: JobId, data: &str) -> Result<(), HostError> {
        self.call(&format!("chansend({job}, {})", vim_str(data)))
    }

    fn set_register(&self, register: char, text: &str) -> Result<(), HostError> {
        self.call(&format!(
            "setreg({}, {})",
            vim_str(&register.to_string()),
            vim_str(text)
        ))
    }

    fn feedkeys(&self, keys: &str) -> Result<(), HostError> {
        self.call(&format!("feedkeys({}, 'nx')", vim_str(keys)))
    }

    fn getchar(&self) -> Result<String, HostError> {
        self.eval_json("getcharstr()")
    }

    fn get_var(&self, name: &str) -> Result<Option<serde_json::Value>, HostError> {
        let value: serde_json::Value = self.eval_json(&format!("get(g:, {}, v:null)", vim_str(name)))?;
        Ok((!value.is_null()).then_some(value))
    }

    fn set_var(&self, name: &str, value: &str) -> Result<(), HostError> {
        self.call(&format!("nvim_set_var({}, {})", vim_str(name), vim_str(value)))
    }

    fn unset_var(&self, name: &str) -> Result<(), HostError> {
        self.ex(&format!("silent! unlet g:{name}"))
    }

    fn getenv(&self, name: &str) -> Result<Option<String>, HostError> {
        self.eval_json(&format!("getenv({})", vim_str(name)))
    }

    fn notify(&self, message: &str) -> Result<(), HostError> {
        self.call(&format!("nvim_echo([[{}]], v:true, {{}})", vim_str(message)))
    }

    fn emit_user_event(&self, name: &str) -> Result<(), HostError> {
        self.ex(&format!("silent doautocmd <nomodeline> User {name}"))
    }

    fn execute(&self, command: &str) -> Result<(), HostError> {
        self.ex(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Replies with canned outputs in order and records every expression.
    #[derive(Default)]
    struct Scripted {
        exprs: RefCell<Vec<String>>,
        replies: RefCell<VecDeque<String>>,
    }

    impl Scripted {
        fn replying(replies: &[&str]) -> Self {
            Self {
                exprs: RefCell::default(),
                replies: RefCell::new(replies.iter().map(|s| s.to_string()).collect()),
            }
        }
    }

    impl NvimCommandRunner for Scripted {
        fn eval(&self, expr: &str) -> Result<String, HostError> {
            self.exprs.borrow_mut().push(expr.to_string());
            Ok(self
                .replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| "0".to_string()))
        }
    }

    #[test]
    fn buffer_numbers_are_sorted() {
        let runner = Scripted::replying(&["[7, 1, 3]\n"]);
        let host = NvimHost::new(&runner);
        assert_eq!(host.buffer_numbers().expect("numbers"), vec![1, 3, 7]);
        assert_eq!(
            runner.exprs.borrow()[0],
            "json_encode(map(getbufinfo(), 'v:val.bufnr'))"
        );
    }

    #[test]
    fn buffer_info_decodes() {
        let runner = Scripted::replying(&[
            r#"{"bufnr":3,"name":"term://~//12:aider","channel":5,"buftype":"terminal","filetype":"","listed":true}"#,
        ]);
        let host = NvimHost::new(&runner);
        let info = host.buffer_info(3).expect("info");
        assert_eq!(info.channel, 5);
        assert!(info.is_terminal());
        assert!(runner.exprs.borrow()[0].contains("getbufvar(3, '&channel')"));
    }

    #[test]
    fn chansend_escapes_payload() {
        let runner = Scripted::default();
        let host = NvimHost::new(&runner);
        host.chansend(4, "hello\n").expect("send");
        assert_eq!(runner.exprs.borrow()[0], "json_encode(chansend(4, \"hello\\n\"))");
    }

    #[test]
    fn ex_commands_go_through_execute() {
        let runner = Scripted::replying(&["\"\""]);
        let host = NvimHost::new(&runner);
        host.focus_window(2).expect("focus");
        assert_eq!(runner.exprs.borrow()[0], "json_encode(execute(\"2wincmd w\"))");
    }

    #[test]
    fn unset_var_reads_as_none() {
        let runner = Scripted::replying(&["null"]);
        let host = NvimHost::new(&runner);
        assert_eq!(host.get_var("aider_command").expect("var"), None);
    }

    #[test]
    fn getenv_null_is_none() {
        let runner = Scripted::replying(&["null", "\"/tmp/tmux-1000/default,1,0\""]);
        let host = NvimHost::new(&runner);
        assert_eq!(host.getenv("TMUX").expect("env"), None);
        assert_eq!(
            host.getenv("TMUX").expect("env").as_deref(),
            Some("/tmp/tmux-1000/default,1,0")
        );
    }

    #[test]
    fn float_config_includes_geometry_and_title() {
        let runner = Scripted::default();
        let host = NvimHost::new(&runner);
        let float = FloatWindow {
            width: 100,
            height: 20,
            row: 5,
            col: 10,
            title: Some("aider".into()),
        };
        host.open_float(9, &float).expect("float");
        let exprs = runner.exprs.borrow();
        assert!(exprs[0].starts_with("json_encode(nvim_open_win(9, v:true, {'relative': 'editor'"));
        assert!(exprs[0].contains("'width': 100, 'height': 20, 'row': 5, 'col': 10"));
        assert!(exprs[0].contains("'title': \"aider\""));
        assert_eq!(exprs[1], "json_encode(execute(\"setlocal nonumber\"))");
    }

    #[test]
    fn garbage_reply_is_decode_error() {
        let runner = Scripted::replying(&["E121: Undefined variable"]);
        let host = NvimHost::new(&runner);
        assert!(matches!(host.current_buffer(), Err(HostError::Decode { .. })));
    }

    #[test]
    fn read_config_collects_variables() {
        // One reply per CONFIG_VARIABLES entry, in order.
        let runner = Scripted::replying(&[
            "\"aider --no-auto-commits\"",
            "\"vsplit\"",
            "null",
            "null",
            "null",
            "1",
            "null",
        ]);
        let host = NvimHost::new(&runner);
        let cfg = host.read_config().expect("config");
        assert_eq!(cfg.command, "aider --no-auto-commits");
        assert_eq!(cfg.buffer_open_type, aidermux_core::BufferLayout::Vsplit);
        assert!(cfg.testing);
        assert_eq!(cfg.floatwin_width, aidermux_core::config::DEFAULT_FLOATWIN_WIDTH);
    }
}
