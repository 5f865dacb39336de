//! Editor-side plugin configuration (`g:aider_*` variables).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::layout::BufferLayout;

pub const DEFAULT_COMMAND: &str = "aider";
pub const DEFAULT_FLOATWIN_WIDTH: u32 = 100;
pub const DEFAULT_FLOATWIN_HEIGHT: u32 = 20;

/// Config keys paired with the global variable each one is read from.
pub const CONFIG_VARIABLES: &[(&str, &str)] = &[
    ("command", "aider_command"),
    ("buffer_open_type", "aider_buffer_open_type"),
    ("floatwin_width", "aider_floatwin_width"),
    ("floatwin_height", "aider_floatwin_height"),
    ("additional_prompt", "aider_additional_prompt"),
    ("testing", "aider_testing"),
    ("command_suffixes", "aider_command_suffixes"),
];

/// Snapshot of the plugin configuration, read once per command invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Shell command that starts aider, e.g. `aider --no-auto-commits`.
    pub command: String,
    pub buffer_open_type: BufferLayout,
    pub floatwin_width: u32,
    pub floatwin_height: u32,
    /// Extra lines inserted under `# rule` when composing from a selection.
    pub additional_prompt: Option<Vec<String>>,
    /// Swap the terminal backend for the in-memory mock.
    pub testing: bool,
    /// Wrapper-script names that also identify a session buffer.
    pub command_suffixes: Vec<String>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_COMMAND.to_string(),
            buffer_open_type: BufferLayout::default(),
            floatwin_width: DEFAULT_FLOATWIN_WIDTH,
            floatwin_height: DEFAULT_FLOATWIN_HEIGHT,
            additional_prompt: None,
            testing: false,
            command_suffixes: Vec::new(),
        }
    }
}

impl PluginConfig {
    /// Build a config from the JSON object the editor returns. Every field
    /// is read leniently: a missing or mistyped value takes its default.
    pub fn from_value(value: &Value) -> Self {
        let defaults = Self::default();
        let command = value
            .get("command")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .unwrap_or(defaults.command);

        Self {
            command,
            buffer_open_type: BufferLayout::from_value(value.get("buffer_open_type")),
            floatwin_width: positive_u32(value.get("floatwin_width"))
                .unwrap_or(defaults.floatwin_width),
            floatwin_height: positive_u32(value.get("floatwin_height"))
                .unwrap_or(defaults.floatwin_height),
            additional_prompt: string_list(value.get("additional_prompt"))
                .filter(|lines| !lines.is_empty()),
            testing: truthy(value.get("testing")),
            command_suffixes: string_list(value.get("command_suffixes")).unwrap_or_default(),
        }
    }
}

fn positive_u32(value: Option<&Value>) -> Option<u32> {
    let n = value?.as_f64()?.floor();
    if n >= 1.0 && n <= f64::from(u32::MAX) {
        Some(n as u32)
    } else {
        None
    }
}

fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    value?
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(String::from))
        .collect()
}

/// Vim booleans arrive as `true`/`false` or as numbers.
fn truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    }
}
