//! Main app runner for one-shot mode, plus setup shared with sessions

use std::future::pending;
use std::io::{self, IsTerminal};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use crate::application::ports::ConfigStore;
use crate::application::{Recorder, RecorderError, SaveOutcome};
use crate::domain::config::AppConfig;
use crate::infrastructure::{
    create_capture, CpalCapture, FileExporter, PixmapScope, ScopeError, XdgConfigStore,
};

use super::args::RecordOptions;
use super::input::TerminalInput;
use super::picker::TerminalPicker;
use super::presenter::Presenter;
use super::signals::ShutdownSignal;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// The recorder as wired for the terminal
pub type CliRecorder = Recorder<CpalCapture, FileExporter, Presenter, PixmapScope>;

/// Wire the cpal capture, exporter and scope into a recorder
pub(crate) fn build_recorder(
    options: &RecordOptions,
    presenter: &Arc<Presenter>,
    input: &TerminalInput,
) -> Result<CliRecorder, ScopeError> {
    let (width, height) = options.scope_size;
    let scope = PixmapScope::new(width, height)?;

    // Prompting needs someone at the terminal to answer
    let interactive = io::stdin().is_terminal() && io::stderr().is_terminal();

    let mut exporter = FileExporter::new(&options.output_dir);
    if options.save_prompt && interactive {
        exporter = exporter.with_picker(TerminalPicker::new(input.clone(), Arc::clone(presenter)));
    }

    let mut recorder = Recorder::new(create_capture(), exporter, Arc::clone(presenter), scope);
    recorder.set_label(&options.label);
    Ok(recorder)
}

/// Report a recorder error; recoverable ones are only warnings
pub(crate) fn report_error(presenter: &Presenter, e: &RecorderError) {
    if e.is_recoverable() {
        presenter.warn(&e.to_string());
    } else {
        presenter.error(&e.to_string());
    }
}

/// Write the scope frame if the options ask for one at this point
pub(crate) fn write_snapshot(
    recorder: &CliRecorder,
    options: &RecordOptions,
    saved: Option<&Path>,
    presenter: &Presenter,
) {
    let Some(target) = options.scope_snapshot.target(saved) else {
        return;
    };

    let scope = recorder.scope();
    let result = match scope.lock() {
        Ok(canvas) => canvas.save_png(&target),
        Err(poisoned) => poisoned.into_inner().save_png(&target),
    };
    match result {
        Ok(()) => presenter.info(&format!("Scope snapshot: {}", target.display())),
        Err(e) => presenter.warn(&e.to_string()),
    }
}

/// Ask whether to retry a canceled save
async fn confirm_retry(input: &TerminalInput, presenter: &Presenter) -> bool {
    presenter.prompt("Try saving again? [y/N] ");
    matches!(
        input.next_line().await.as_deref().map(str::trim),
        Some("y" | "Y" | "yes")
    )
}

/// Run a single recording: start, stop on Enter (or the time limit), save
pub async fn run_record(options: RecordOptions) -> ExitCode {
    let presenter = Arc::new(Presenter::new());

    let shutdown = ShutdownSignal::new();
    if let Err(e) = shutdown.setup() {
        presenter.error(&format!("Failed to setup signal handler: {}", e));
        return ExitCode::from(EXIT_ERROR);
    }

    let input = TerminalInput::stdin();
    let mut recorder = match build_recorder(&options, &presenter, &input) {
        Ok(recorder) => recorder,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    if let Err(e) = recorder.start().await {
        report_error(&presenter, &e);
        return ExitCode::from(EXIT_ERROR);
    }

    match options.duration {
        Some(limit) => presenter.info(&format!(
            "Recording for up to {}. Press Enter to stop.",
            limit
        )),
        None => presenter.info("Recording. Press Enter to stop."),
    }

    // Closed stdin must not end the take early
    let enter = async {
        if input.next_line().await.is_none() {
            pending::<()>().await;
        }
    };
    let time_limit = async {
        match options.duration {
            Some(limit) => tokio::time::sleep(limit.as_std()).await,
            None => pending::<()>().await,
        }
    };

    tokio::select! {
        _ = enter => {}
        _ = time_limit => presenter.info("Time limit reached"),
        _ = shutdown.wait() => {
            recorder.teardown();
            presenter.warn("Interrupted, nothing saved");
            return ExitCode::from(EXIT_ERROR);
        }
    }

    if let Err(e) = recorder.stop().await {
        report_error(&presenter, &e);
        return ExitCode::from(EXIT_ERROR);
    }
    write_snapshot(&recorder, &options, None, &presenter);

    loop {
        let result = tokio::select! {
            result = recorder.save() => result,
            _ = shutdown.wait() => {
                presenter.warn("Interrupted, nothing saved");
                return ExitCode::from(EXIT_ERROR);
            }
        };

        match result {
            Ok(SaveOutcome::Saved(path)) => {
                write_snapshot(&recorder, &options, Some(&path), &presenter);
                presenter.output(&path.to_string_lossy());
                return ExitCode::from(EXIT_SUCCESS);
            }
            Ok(SaveOutcome::Ignored) => return ExitCode::from(EXIT_ERROR),
            Err(RecorderError::SaveCanceled) => {
                presenter.warn("Save canceled");
                if !confirm_retry(&input, &presenter).await {
                    presenter.warn("Recording discarded");
                    return ExitCode::from(EXIT_SUCCESS);
                }
            }
            Err(e) => {
                report_error(&presenter, &e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    }
}

/// Load and merge configuration: defaults < file < cli
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load_or_empty().await;

    AppConfig::defaults().merge(file_config).merge(cli_config)
}
