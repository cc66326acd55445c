//! Acid Recorder CLI entry point

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use acid_recorder::cli::{
    app::{load_merged_config, run_record, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{Cli, Commands, RecordOptions, ScopeSnapshot},
    config_cmd::handle_config_command,
    presenter::Presenter,
    session::run_session,
};
use acid_recorder::domain::config::AppConfig;
use acid_recorder::infrastructure::XdgConfigStore;

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "acid_recorder=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let presenter = Presenter::new();

    // Handle subcommands
    if let Some(Commands::Config { action }) = cli.command {
        let store = XdgConfigStore::new();
        if let Err(e) = handle_config_command(action, &store, &presenter).await {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
        return ExitCode::SUCCESS;
    }

    // Build CLI config from args
    let cli_config = AppConfig {
        output_dir: cli
            .output_dir
            .as_ref()
            .map(|dir| dir.to_string_lossy().into_owned()),
        label: cli.label.clone(),
        duration: cli.duration.clone(),
        save_prompt: if cli.no_prompt { Some(false) } else { None },
        scope: None,
    };

    // Merge config
    let config = load_merged_config(cli_config).await;

    // Parse duration
    let duration = match config.duration_limit() {
        Ok(d) => d,
        Err(e) => {
            presenter.error(&format!("Invalid duration: {}", e));
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    let scope_snapshot = match cli.scope {
        Some(path) => ScopeSnapshot::At(path),
        None if config.scope_snapshot_or_default() => ScopeSnapshot::BesideRecording,
        None => ScopeSnapshot::Off,
    };

    let options = RecordOptions {
        label: config.label.clone().unwrap_or_default(),
        duration,
        output_dir: config.output_dir_or_default(),
        save_prompt: config.save_prompt_or_default(),
        scope_size: config.scope_size_or_default(),
        scope_snapshot,
    };
    tracing::debug!(?options, "resolved recording options");

    // Route to appropriate handler
    if cli.session {
        if options.duration.is_some() {
            presenter.warn("Time limit is ignored in session mode");
        }
        run_session(options).await
    } else {
        run_record(options).await
    }
}
