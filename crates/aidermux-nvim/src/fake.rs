//! In-memory `EditorHost` used by tests.
//!
//! Models just enough of Vim's buffer/window semantics for the session
//! logic: numbered buffers, an ordered window list with a current and a
//! previous window, and logs of every process write, key feed and
//! message.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::error::HostError;
use crate::host::{BufNr, BufferInfo, EditorHost, EditorSize, FloatWindow, JobId, WinNr};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeBuffer {
    pub info: BufferInfo,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeWindow {
    pub bufnr: BufNr,
    pub float: Option<FloatWindow>,
}

#[derive(Debug, Default)]
struct State {
    buffers: BTreeMap<BufNr, FakeBuffer>,
    next_bufnr: BufNr,
    next_channel: JobId,
    windows: Vec<FakeWindow>,
    current: usize,
    previous: Option<usize>,
    vars: HashMap<String, serde_json::Value>,
    env: HashMap<String, String>,
    registers: HashMap<char, String>,
    chansends: Vec<(JobId, String)>,
    feedkeys: Vec<String>,
    notices: Vec<String>,
    events: Vec<String>,
    executed: Vec<String>,
    keymaps: Vec<(BufNr, String, String, String)>,
    pending_keys: VecDeque<String>,
    terminal_commands: Vec<String>,
    insert_mode: bool,
}

pub struct FakeEditor {
    state: RefCell<State>,
    size: EditorSize,
}

impl Default for FakeEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeEditor {
    /// An editor as it looks right after startup: one window showing an
    /// empty, unnamed buffer 1.
    pub fn new() -> Self {
        let editor = Self {
            state: RefCell::new(State {
                next_bufnr: 1,
                next_channel: 3,
                ..State::default()
            }),
            size: EditorSize {
                columns: 200,
                lines: 50,
            },
        };
        let first = editor.insert_buffer("", "", 0, true);
        editor.state.borrow_mut().windows.push(FakeWindow {
            bufnr: first,
            float: None,
        });
        editor
    }

    fn insert_buffer(&self, name: &str, buftype: &str, channel: JobId, listed: bool) -> BufNr {
        let mut st = self.state.borrow_mut();
        let bufnr = st.next_bufnr;
        st.next_bufnr += 1;
        st.buffers.insert(
            bufnr,
            FakeBuffer {
                info: BufferInfo {
                    bufnr,
                    name: name.to_string(),
                    channel,
                    buftype: buftype.to_string(),
                    filetype: String::new(),
                    listed,
                },
                lines: vec![String::new()],
            },
        );
        bufnr
    }

    // ─── Scenario builders ───────────────────────────────────────

    /// Add a hidden terminal buffer with the given job id.
    pub fn add_terminal(&self, name: &str, channel: JobId) -> BufNr {
        self.insert_buffer(name, "terminal", channel, true)
    }

    /// Add a hidden file buffer.
    pub fn add_file(&self, path: &str, filetype: &str, lines: &[&str]) -> BufNr {
        let bufnr = self.insert_buffer(path, "", 0, true);
        let mut st = self.state.borrow_mut();
        if let Some(buf) = st.buffers.get_mut(&bufnr) {
            buf.info.filetype = filetype.to_string();
            buf.lines = lines.iter().map(|s| s.to_string()).collect();
        }
        bufnr
    }

    /// Burn buffer numbers so the next buffer gets `bufnr`.
    pub fn skip_to_bufnr(&self, bufnr: BufNr) {
        let mut st = self.state.borrow_mut();
        st.next_bufnr = st.next_bufnr.max(bufnr);
    }

    /// Show `bufnr` in a new split below the current window and focus it.
    pub fn show_in_split(&self, bufnr: BufNr) {
        let mut st = self.state.borrow_mut();
        let at = st.current + 1;
        st.windows.insert(at, FakeWindow { bufnr, float: None });
        st.previous = Some(st.current);
        st.current = at;
    }

    /// Show `bufnr` in the current window.
    pub fn show_in_current(&self, bufnr: BufNr) {
        let _ = self.show_buffer(bufnr);
    }

    pub fn set_global(&self, name: &str, value: serde_json::Value) {
        self.state.borrow_mut().vars.insert(name.to_string(), value);
    }

    pub fn set_env(&self, name: &str, value: &str) {
        self.state
            .borrow_mut()
            .env
            .insert(name.to_string(), value.to_string());
    }

    /// Keys returned by successive `getchar()` calls.
    pub fn queue_key(&self, key: &str) {
        self.state.borrow_mut().pending_keys.push_back(key.to_string());
    }

    // ─── Inspection ──────────────────────────────────────────────

    pub fn buffer(&self, bufnr: BufNr) -> Option<FakeBuffer> {
        self.state.borrow().buffers.get(&bufnr).cloned()
    }

    pub fn buffer_count(&self) -> usize {
        self.state.borrow().buffers.len()
    }

    pub fn windows(&self) -> Vec<FakeWindow> {
        self.state.borrow().windows.clone()
    }

    pub fn window_count(&self) -> usize {
        self.state.borrow().windows.len()
    }

    pub fn current_window(&self) -> FakeWindow {
        let st = self.state.borrow();
        st.windows[st.current].clone()
    }

    pub fn chansends(&self) -> Vec<(JobId, String)> {
        self.state.borrow().chansends.clone()
    }

    pub fn fed_keys(&self) -> Vec<String> {
        self.state.borrow().feedkeys.clone()
    }

    pub fn register(&self, register: char) -> Option<String> {
        self.state.borrow().registers.get(&register).cloned()
    }

    pub fn notices(&self) -> Vec<String> {
        self.state.borrow().notices.clone()
    }

    pub fn events(&self) -> Vec<String> {
        self.state.borrow().events.clone()
    }

    pub fn executed(&self) -> Vec<String> {
        self.state.borrow().executed.clone()
    }

    pub fn keymaps(&self, bufnr: BufNr) -> Vec<(String, String, String)> {
        self.state
            .borrow()
            .keymaps
            .iter()
            .filter(|(b, ..)| *b == bufnr)
            .map(|(_, mode, lhs, rhs)| (mode.clone(), lhs.clone(), rhs.clone()))
            .collect()
    }

    pub fn terminal_commands(&self) -> Vec<String> {
        self.state.borrow().terminal_commands.clone()
    }

    pub fn global(&self, name: &str) -> Option<serde_json::Value> {
        self.state.borrow().vars.get(name).cloned()
    }

    pub fn in_insert_mode(&self) -> bool {
        self.state.borrow().insert_mode
    }

    fn missing_buffer(bufnr: BufNr) -> HostError {
        HostError::RemoteCall {
            expr: format!("buffer {bufnr}"),
            detail: format!("E86: Buffer {bufnr} does not exist"),
        }
    }
}

impl EditorHost for FakeEditor {
    fn buffer_numbers(&self) -> Result<Vec<BufNr>, HostError> {
        Ok(self.state.borrow().buffers.keys().copied().collect())
    }

    fn buffer_info(&self, bufnr: BufNr) -> Result<BufferInfo, HostError> {
        self.buffer(bufnr)
            .map(|b| b.info)
            .ok_or_else(|| Self::missing_buffer(bufnr))
    }

    fn buffer_lines(&self, bufnr: BufNr) -> Result<Vec<String>, HostError> {
        self.buffer(bufnr)
            .map(|b| b.lines)
            .ok_or_else(|| Self::missing_buffer(bufnr))
    }

    fn append_lines(&self, bufnr: BufNr, lines: &[String]) -> Result<(), HostError> {
        let mut st = self.state.borrow_mut();
        let buf = st
            .buffers
            .get_mut(&bufnr)
            .ok_or_else(|| Self::missing_buffer(bufnr))?;
        buf.lines.extend(lines.iter().cloned());
        Ok(())
    }

    fn set_lines(&self, bufnr: BufNr, lines: &[String]) -> Result<(), HostError> {
        let mut st = self.state.borrow_mut();
        let buf = st
            .buffers
            .get_mut(&bufnr)
            .ok_or_else(|| Self::missing_buffer(bufnr))?;
        buf.lines = if lines.is_empty() {
            vec![String::new()]
        } else {
            lines.to_vec()
        };
        Ok(())
    }

    fn current_buffer(&self) -> Result<BufNr, HostError> {
        Ok(self.current_window().bufnr)
    }

    fn line_range(&self, start: u32, end: u32) -> Result<Vec<String>, HostError> {
        let lines = self.buffer_lines(self.current_buffer()?)?;
        let start = start.max(1) as usize - 1;
        let end = (end as usize).min(lines.len());
        Ok(lines.get(start..end).map(<[String]>::to_vec).unwrap_or_default())
    }

    fn current_file_path(&self) -> Result<String, HostError> {
        Ok(self.buffer_info(self.current_buffer()?)?.name)
    }

    fn create_scratch_buffer(&self) -> Result<BufNr, HostError> {
        Ok(self.insert_buffer("", "nofile", 0, false))
    }

    fn add_buffer(&self, name: &str) -> Result<BufNr, HostError> {
        let existing = self
            .state
            .borrow()
            .buffers
            .values()
            .find(|b| b.info.name == name)
            .map(|b| b.info.bufnr);
        Ok(existing.unwrap_or_else(|| self.insert_buffer(name, "", 0, true)))
    }

    fn delete_buffer(&self, bufnr: BufNr) -> Result<(), HostError> {
        let mut st = self.state.borrow_mut();
        if st.buffers.remove(&bufnr).is_none() {
            return Err(Self::missing_buffer(bufnr));
        }
        let current_buf = st.windows[st.current].bufnr;
        let before = st.windows.len();
        st.windows.retain(|w| w.bufnr != bufnr);
        if st.windows.is_empty() {
            // Vim keeps the last window and shows another buffer in it.
            drop(st);
            let replacement = self
                .state
                .borrow()
                .buffers
                .keys()
                .next()
                .copied();
            let replacement = match replacement {
                Some(b) => b,
                None => self.insert_buffer("", "", 0, true),
            };
            let mut st = self.state.borrow_mut();
            st.windows.push(FakeWindow {
                bufnr: replacement,
                float: None,
            });
            st.current = 0;
            st.previous = None;
            return Ok(());
        }
        if st.windows.len() != before {
            st.current = st
                .windows
                .iter()
                .position(|w| w.bufnr == current_buf)
                .unwrap_or(0);
            st.previous = None;
        }
        Ok(())
    }

    fn edit_new_buffer(&self) -> Result<(), HostError> {
        let bufnr = self.insert_buffer("", "", 0, true);
        self.show_buffer(bufnr)
    }

    fn show_buffer(&self, bufnr: BufNr) -> Result<(), HostError> {
        let mut st = self.state.borrow_mut();
        if !st.buffers.contains_key(&bufnr) {
            return Err(Self::missing_buffer(bufnr));
        }
        let current = st.current;
        st.windows[current].bufnr = bufnr;
        Ok(())
    }

    fn reload_current_buffer(&self) -> Result<(), HostError> {
        self.state.borrow_mut().executed.push("silent! e!".into());
        Ok(())
    }

    fn window_buffers(&self) -> Result<Vec<BufNr>, HostError> {
        Ok(self.state.borrow().windows.iter().map(|w| w.bufnr).collect())
    }

    fn open_split(&self, _vertical: bool) -> Result<(), HostError> {
        let bufnr = self.current_buffer()?;
        self.show_in_split(bufnr);
        Ok(())
    }

    fn open_float(&self, bufnr: BufNr, float: &FloatWindow) -> Result<(), HostError> {
        let mut st = self.state.borrow_mut();
        if !st.buffers.contains_key(&bufnr) {
            return Err(Self::missing_buffer(bufnr));
        }
        st.windows.push(FakeWindow {
            bufnr,
            float: Some(float.clone()),
        });
        st.previous = Some(st.current);
        st.current = st.windows.len() - 1;
        Ok(())
    }

    fn focus_window(&self, winnr: WinNr) -> Result<(), HostError> {
        let mut st = self.state.borrow_mut();
        let idx = winnr as usize;
        if idx == 0 || idx > st.windows.len() {
            return Ok(());
        }
        if st.current != idx - 1 {
            st.previous = Some(st.current);
            st.current = idx - 1;
        }
        Ok(())
    }

    fn focus_previous_window(&self) -> Result<(), HostError> {
        let mut st = self.state.borrow_mut();
        if let Some(prev) = st.previous.filter(|p| *p < st.windows.len()) {
            st.previous = Some(st.current);
            st.current = prev;
        }
        Ok(())
    }

    fn close_current_window(&self) -> Result<(), HostError> {
        let mut st = self.state.borrow_mut();
        if st.windows.len() == 1 {
            return Err(HostError::RemoteCall {
                expr: "close!".into(),
                detail: "E444: Cannot close last window".into(),
            });
        }
        let closing = st.current;
        st.windows.remove(closing);
        let target = st
            .previous
            .filter(|p| *p != closing)
            .map(|p| if p > closing { p - 1 } else { p })
            .unwrap_or(0);
        st.current = target.min(st.windows.len() - 1);
        st.previous = None;
        Ok(())
    }

    fn editor_size(&self) -> Result<EditorSize, HostError> {
        Ok(self.size)
    }

    fn set_buffer_keymap(
        &self,
        bufnr: BufNr,
        mode: &str,
        lhs: &str,
        rhs: &str,
    ) -> Result<(), HostError> {
        self.state.borrow_mut().keymaps.push((
            bufnr,
            mode.to_string(),
            lhs.to_string(),
            rhs.to_string(),
        ));
        Ok(())
    }

    fn start_insert_at_end(&self) -> Result<(), HostError> {
        self.state.borrow_mut().insert_mode = true;
        Ok(())
    }

    fn open_terminal(&self, command: &str) -> Result<BufNr, HostError> {
        let channel = {
            let mut st = self.state.borrow_mut();
            st.terminal_commands.push(command.to_string());
            let c = st.next_channel;
            st.next_channel += 1;
            c
        };
        let name = format!("term://~//{}:{command}", 4000 + channel);
        let bufnr = self.insert_buffer(&name, "terminal", channel, true);
        self.show_buffer(bufnr)?;
        Ok(bufnr)
    }

    fn chansend(&self, job: JobId, data: &str) -> Result<(), HostError> {
        self.state
            .borrow_mut()
            .chansends
            .push((job, data.to_string()));
        Ok(())
    }

    fn set_register(&self, register: char, text: &str) -> Result<(), HostError> {
        self.state
            .borrow_mut()
            .registers
            .insert(register, text.to_string());
        Ok(())
    }

    fn feedkeys(&self, keys: &str) -> Result<(), HostError> {
        self.state.borrow_mut().feedkeys.push(keys.to_string());
        Ok(())
    }

    fn getchar(&self) -> Result<String, HostError> {
        Ok(self
            .state
            .borrow_mut()
            .pending_keys
            .pop_front()
            .unwrap_or_else(|| "\x1b".to_string()))
    }

    fn get_var(&self, name: &str) -> Result<Option<serde_json::Value>, HostError> {
        Ok(self.global(name))
    }

    fn set_var(&self, name: &str, value: &str) -> Result<(), HostError> {
        self.set_global(name, serde_json::Value::String(value.to_string()));
        Ok(())
    }

    fn unset_var(&self, name: &str) -> Result<(), HostError> {
        self.state.borrow_mut().vars.remove(name);
        Ok(())
    }

    fn getenv(&self, name: &str) -> Result<Option<String>, HostError> {
        Ok(self.state.borrow().env.get(name).cloned())
    }

    fn notify(&self, message: &str) -> Result<(), HostError> {
        self.state.borrow_mut().notices.push(message.to_string());
        Ok(())
    }

    fn emit_user_event(&self, name: &str) -> Result<(), HostError> {
        self.state.borrow_mut().events.push(name.to_string());
        Ok(())
    }

    fn execute(&self, command: &str) -> Result<(), HostError> {
        self.state.borrow_mut().executed.push(command.to_string());
        Ok(())
    }
}
