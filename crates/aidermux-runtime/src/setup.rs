//! Define the `:Aider*` editor commands, each a `jobstart` of this binary.

use aidermux_nvim::EditorHost;
use aidermux_nvim::literal::vim_str;

/// How an editor command passes its arguments to the subcommand.
#[derive(Debug, Clone, Copy)]
enum Args {
    None,
    /// One argument, spaces included (`-nargs=1`, `<q-args>`).
    Whole,
    /// One or more file names (`-nargs=+`, `<f-args>`).
    Files,
    /// The command range (`-range`, `<line1>` and `<line2>`).
    Range,
}

const COMMANDS: &[(&str, &str, Args)] = &[
    ("AiderRun", "run", Args::None),
    ("AiderSilentRun", "silent-run", Args::None),
    ("AiderHide", "hide", Args::None),
    ("AiderExit", "exit", Args::None),
    ("AiderSendPromptByCommandline", "send", Args::Whole),
    ("AiderSilentSendPromptByCommandline", "silent-send", Args::Whole),
    ("AiderSendPrompt", "send-buffer", Args::None),
    ("AiderVisualTextWithPrompt", "visual", Args::Range),
    ("AiderAddFile", "add-file", Args::Files),
    ("AiderAddFileReadOnly", "add-file-read-only", Args::Files),
    ("AiderAddCurrentFile", "add-current-file", Args::None),
    ("AiderAddCurrentFileReadOnly", "add-current-file-read-only", Args::None),
    ("AiderAddBuffers", "add-buffers", Args::None),
    ("AiderAddWeb", "add-web", Args::Whole),
    ("AiderAsk", "ask", Args::Whole),
    ("AiderTest", "test", Args::Whole),
    ("AiderPaste", "paste", Args::None),
    ("AiderVoice", "voice", Args::None),
    ("AiderChatMode", "chat-mode", Args::Whole),
    ("AiderSendKey", "send-key", Args::None),
    ("AiderSendChoice", "send-choice", Args::Whole),
];

/// `command!` definitions that run `program` (plus `base_args`) for each
/// editor command.
pub fn command_definitions(program: &str, base_args: &[String]) -> Vec<String> {
    let mut prefix = vec![vim_str(program)];
    prefix.extend(base_args.iter().map(|a| vim_str(a)));
    COMMANDS
        .iter()
        .map(|(name, sub, args)| {
            let mut argv = prefix.clone();
            argv.push(vim_str(sub));
            let (attrs, list) = match args {
                Args::None => ("", format!("[{}]", argv.join(", "))),
                Args::Whole => {
                    argv.push("<q-args>".to_string());
                    ("-nargs=1 ", format!("[{}]", argv.join(", ")))
                }
                Args::Files => (
                    "-nargs=+ -complete=file ",
                    format!("[{}] + [<f-args>]", argv.join(", ")),
                ),
                Args::Range => {
                    argv.push("string(<line1>)".to_string());
                    argv.push("string(<line2>)".to_string());
                    ("-range ", format!("[{}]", argv.join(", ")))
                }
            };
            format!("command! {attrs}{name} call jobstart({list})")
        })
        .collect()
}

/// Execute every definition in the editor.
pub fn define_commands(host: &dyn EditorHost, definitions: &[String]) -> anyhow::Result<()> {
    for definition in definitions {
        host.execute(definition)?;
    }
    tracing::info!("defined {} editor commands", definitions.len());
    Ok(())
}
