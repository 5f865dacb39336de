//! aidermux: drive an aider session from Neovim.
//! Each `:Aider*` command runs this binary once; it talks back to the
//! editor over `--remote-expr`, acts on the session and exits. Runs
//! against the same editor are serialized by a lock file.

use anyhow::Context;
use clap::Parser;

use aidermux_core::{ChatMode, SlashCommand};
use aidermux_nvim::{EditorHost, NvimHost, NvimRemote};
use aidermux_session::{SessionContext, backend_for, commands, dispatch, lifecycle};
use aidermux_tmux::{TmuxCommandRunner, TmuxExecutor};

mod cli;
mod git;
mod lock;
mod setup;

use cli::Command;

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    let filter = std::env::var("AIDERMUX_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let mut base_args = Vec::new();
    if let Some(ref socket) = args.tmux_socket {
        base_args.extend(["--tmux-socket".to_string(), socket.clone()]);
    }

    if let Command::Setup(ref opts) = args.command {
        let exe = std::env::current_exe().context("locating the aidermux binary")?;
        let definitions = setup::command_definitions(&exe.to_string_lossy(), &base_args);
        if opts.print {
            for definition in &definitions {
                println!("{definition}");
            }
            return Ok(());
        }
        let (host, _) = connect(&args)?;
        return setup::define_commands(&host, &definitions);
    }

    let (host, server) = connect(&args)?;
    let _lock = lock::CommandLock::acquire(&std::env::temp_dir(), &server)?;
    let config = host.read_config().context("reading g:aider_* settings")?;
    tracing::debug!(?config, "aidermux {:?}", args.command);
    let backend = backend_for(&config);

    let mut tmux = TmuxExecutor::new(args.tmux_bin.as_str());
    if let Some(socket) = args.tmux_socket {
        tmux = tmux.with_socket_path(socket);
    }

    let mux: &dyn TmuxCommandRunner = &tmux;
    let ctx = SessionContext::new(&host, backend.as_ref(), Some(mux), config);
    run(&ctx, args.command)
}

/// The editor adapter and the server address it drives.
fn connect(args: &cli::Cli) -> anyhow::Result<(NvimHost<NvimRemote>, String)> {
    let server = args.server_address();
    let remote = NvimRemote::connect(&args.nvim_bin, server.as_deref())
        .context("no Neovim server to drive; run from inside Neovim or pass --server")?;
    tracing::debug!("driving Neovim at {}", remote.server());
    let address = remote.server().to_string();
    Ok((NvimHost::new(remote), address))
}

fn run(ctx: &SessionContext<'_>, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Setup(_) => anyhow::bail!("setup runs without a session context"),
        Command::Run => lifecycle::start(ctx)?,
        Command::SilentRun => lifecycle::silent_start(ctx)?,
        Command::Hide => lifecycle::hide(ctx)?,
        Command::Exit => lifecycle::exit(ctx)?,
        Command::Send { prompt } => dispatch::send(ctx, &prompt)?,
        Command::SilentSend { prompt } => dispatch::send_silently(ctx, &prompt)?,
        Command::SendBuffer => dispatch::send_from_buffer(ctx)?,
        Command::Visual { line1, line2 } => commands::compose_from_selection(ctx, line1, line2)?,
        Command::AddFile { paths } => commands::send_command(ctx, &SlashCommand::Add(paths))?,
        Command::AddFileReadOnly { paths } => {
            commands::send_command(ctx, &SlashCommand::ReadOnly(paths))?
        }
        Command::AddCurrentFile => commands::add_current_file(ctx, false)?,
        Command::AddCurrentFileReadOnly => commands::add_current_file(ctx, true)?,
        Command::AddBuffers => {
            let cwd = std::env::current_dir().context("reading working directory")?;
            let repo = git::discover(&cwd);
            commands::add_buffers(ctx, repo.as_ref())?
        }
        Command::AddWeb { url } => commands::send_command(ctx, &SlashCommand::Web(url))?,
        Command::Ask { question } => commands::send_command(ctx, &SlashCommand::Ask(question))?,
        Command::Test { command } => commands::send_command(ctx, &SlashCommand::Test(command))?,
        Command::Paste => commands::send_command(ctx, &SlashCommand::Paste)?,
        Command::Voice => commands::send_command(ctx, &SlashCommand::Voice)?,
        Command::ChatMode { mode } => match mode.parse::<ChatMode>() {
            Ok(mode) => commands::send_command(ctx, &SlashCommand::ChatMode(mode))?,
            Err(e) => ctx.host.notify(&e.to_string())?,
        },
        Command::SendKey => dispatch::send_keystroke(ctx, None)?,
        Command::SendChoice { choices } => dispatch::send_keystroke(ctx, Some(&choices))?,
    }
    Ok(())
}
