//! Interactive session: drive one recorder with typed commands

use std::process::ExitCode;
use std::sync::Arc;

use crate::application::{SaveOutcome, Transition};
use crate::domain::recording::Duration;

use super::app::{
    build_recorder, report_error, write_snapshot, CliRecorder, EXIT_ERROR, EXIT_SUCCESS,
    EXIT_USAGE_ERROR,
};
use super::args::RecordOptions;
use super::input::TerminalInput;
use super::presenter::Presenter;
use super::signals::ShutdownSignal;

const HELP: &[(&str, &str)] = &[
    ("start", "begin a new take (discards the previous one)"),
    ("stop", "end the take and keep it"),
    ("save", "save the stopped take (repeatable)"),
    ("hold", "press and hold: start recording"),
    ("release", "let go: stop a held recording"),
    ("<empty line>", "release, from anywhere"),
    ("label <text>", "set the session label (empty clears it)"),
    ("status", "show state, label and suggested filename"),
    ("quit", "release everything and exit"),
];

/// One typed line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Start,
    Stop,
    Save,
    Hold,
    Release,
    Label(String),
    Status,
    Help,
    Quit,
    Unknown(String),
}

impl SessionCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Release;
        }

        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        match word.to_lowercase().as_str() {
            "start" => Self::Start,
            "stop" => Self::Stop,
            "save" => Self::Save,
            "hold" => Self::Hold,
            "release" => Self::Release,
            "label" => Self::Label(rest.trim().to_string()),
            "status" => Self::Status,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            _ => Self::Unknown(word.to_string()),
        }
    }
}

enum Flow {
    Continue,
    Quit,
}

fn print_help(presenter: &Presenter) {
    for (command, what) in HELP {
        presenter.key_value(command, what);
    }
}

fn print_status(recorder: &CliRecorder, presenter: &Presenter) {
    presenter.key_value("state", recorder.state().as_str());
    presenter.key_value(
        "label",
        if recorder.label().is_empty() {
            "(none)"
        } else {
            recorder.label().as_str()
        },
    );
    presenter.key_value(
        "sample rate",
        &recorder
            .sample_rate()
            .map(Presenter::format_sample_rate)
            .unwrap_or_else(|| "-".to_string()),
    );
    presenter.key_value(
        "elapsed",
        &Duration::from_millis(recorder.elapsed_ms()).clock(),
    );
    presenter.key_value("samples", &recorder.collected_samples().to_string());
    presenter.key_value("next file", &recorder.suggested_filename());
}

/// After any stop: snapshot, then show what a save would be called
fn after_stop(recorder: &CliRecorder, options: &RecordOptions, presenter: &Presenter) {
    write_snapshot(recorder, options, None, presenter);
    presenter.info(&format!("Suggested name: {}", recorder.suggested_filename()));
}

async fn execute(
    command: SessionCommand,
    recorder: &mut CliRecorder,
    options: &RecordOptions,
    presenter: &Presenter,
) -> Flow {
    let result = match command {
        SessionCommand::Start => recorder.start().await.map(|t| {
            if t == Transition::Ignored {
                presenter.info("Already recording");
            }
        }),
        SessionCommand::Stop => recorder.stop().await.map(|t| match t {
            Transition::Applied => after_stop(recorder, options, presenter),
            Transition::Ignored => presenter.info("Not recording"),
        }),
        SessionCommand::Save => recorder.save().await.map(|outcome| match outcome {
            SaveOutcome::Saved(path) => {
                write_snapshot(recorder, options, Some(&path), presenter);
                presenter.output(&path.to_string_lossy());
            }
            SaveOutcome::Ignored => presenter.info("Nothing to save: stop a take first"),
        }),
        SessionCommand::Hold => recorder.hold_press().await.map(|t| {
            if t == Transition::Ignored {
                presenter.info("Already recording");
            }
        }),
        SessionCommand::Release => recorder.hold_release().await.map(|t| {
            if t == Transition::Applied {
                after_stop(recorder, options, presenter);
            }
        }),
        SessionCommand::Label(text) => {
            recorder.set_label(&text);
            presenter.info(&format!("Suggested name: {}", recorder.suggested_filename()));
            Ok(())
        }
        SessionCommand::Status => {
            print_status(recorder, presenter);
            Ok(())
        }
        SessionCommand::Help => {
            print_help(presenter);
            Ok(())
        }
        SessionCommand::Quit => return Flow::Quit,
        SessionCommand::Unknown(word) => {
            presenter.warn(&format!("Unknown command '{}'. Type 'help'.", word));
            Ok(())
        }
    };

    if let Err(e) = result {
        report_error(presenter, &e);
    }
    Flow::Continue
}

/// Run an interactive session until `quit`, end of input or Ctrl+C
pub async fn run_session(options: RecordOptions) -> ExitCode {
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

    presenter.info("Session ready. Type 'help' for commands.");

    loop {
        let line = tokio::select! {
            line = input.next_line() => line,
            _ = shutdown.wait() => {
                presenter.warn("Interrupted");
                break;
            }
        };
        let Some(line) = line else { break };

        let flow = tokio::select! {
            flow = execute(SessionCommand::parse(&line), &mut recorder, &options, &presenter) => flow,
            _ = shutdown.wait() => {
                presenter.warn("Interrupted");
                break;
            }
        };
        if let Flow::Quit = flow {
            break;
        }
    }

    recorder.teardown();
    ExitCode::from(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic_commands() {
        assert_eq!(SessionCommand::parse("start"), SessionCommand::Start);
        assert_eq!(SessionCommand::parse(" STOP "), SessionCommand::Stop);
        assert_eq!(SessionCommand::parse("save"), SessionCommand::Save);
        assert_eq!(SessionCommand::parse("hold"), SessionCommand::Hold);
        assert_eq!(SessionCommand::parse("release"), SessionCommand::Release);
        assert_eq!(SessionCommand::parse("status"), SessionCommand::Status);
        assert_eq!(SessionCommand::parse("q"), SessionCommand::Quit);
        assert_eq!(SessionCommand::parse("?"), SessionCommand::Help);
    }

    #[test]
    fn empty_line_is_a_release() {
        assert_eq!(SessionCommand::parse(""), SessionCommand::Release);
        assert_eq!(SessionCommand::parse("   "), SessionCommand::Release);
    }

    #[test]
    fn label_keeps_the_rest_of_the_line() {
        assert_eq!(
            SessionCommand::parse("label My Track!! 01"),
            SessionCommand::Label("My Track!! 01".to_string())
        );
        assert_eq!(
            SessionCommand::parse("label"),
            SessionCommand::Label(String::new())
        );
    }

    #[test]
    fn unknown_words_are_reported() {
        assert_eq!(
            SessionCommand::parse("record now"),
            SessionCommand::Unknown("record".to_string())
        );
    }
}
