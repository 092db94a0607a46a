//! Countdown Timer CLI
//!
//! Runs a countdown in the terminal:
//! - Start from hours/minutes/seconds or a preset
//! - Pause, resume and reset from the keyboard
//! - A chime when time is up

use anyhow::{bail, Result};
use clap::{CommandFactory, Parser};
use tokio::io::BufReader;

use countdown::cli::{App, Cli, Commands, Display, OutputMode, StartArgs};
use countdown::types::CountdownConfig;

/// Main entry point
fn main() {
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            Display::show_error(&format!("无法启动运行时: {}", e));
            std::process::exit(1);
        }
    };

    // Execute command
    let result = runtime.block_on(execute(cli));

    // A pending stdin read cannot be cancelled; don't wait for it.
    runtime.shutdown_background();

    if let Err(e) = result {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    let config = cli.config();

    match cli.command {
        Some(Commands::Start(args)) => run_countdown(&config, &args).await?,
        Some(Commands::Presets { json }) => {
            let catalog = config.load_presets()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&catalog)?);
            } else {
                Display::show_presets(&catalog);
            }
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Starts a countdown and drives it from stdin until it is done.
async fn run_countdown(config: &CountdownConfig, args: &StartArgs) -> Result<()> {
    let output = if args.json {
        OutputMode::Json
    } else {
        OutputMode::Text
    };
    let mut app = App::new(config, output)?;

    let started = {
        let vm = app.view_model_mut();
        match &args.preset {
            Some(label) => match vm.presets().find(label).cloned() {
                Some(preset) => vm.start_preset(&preset),
                None => bail!("未找到预设：{}", label),
            },
            None => vm.start(args.hours, args.minutes, args.seconds),
        }
    };
    if !started {
        let message = app.view_model().status_message().to_string();
        app.shutdown();
        bail!(message);
    }

    if !args.json {
        Display::show_help();
    }
    app.run(BufReader::new(tokio::io::stdin()), args.stay).await
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
