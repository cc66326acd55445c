//! Save-as prompt on the terminal

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::DestinationPicker;
use crate::domain::export::FileFilter;

use super::input::TerminalInput;
use super::presenter::Presenter;

/// Typed to abandon the save
const CANCEL: &str = "-";

/// Asks for a destination on stderr and reads the answer from the
/// shared terminal input.
///
/// An empty answer accepts the suggestion, `-` (or end of input) cancels.
/// Relative answers land next to the suggested file.
pub struct TerminalPicker {
    input: TerminalInput,
    presenter: Arc<Presenter>,
}

impl TerminalPicker {
    pub fn new(input: TerminalInput, presenter: Arc<Presenter>) -> Self {
        Self { input, presenter }
    }
}

/// Turn a typed answer into a destination, `None` meaning cancel
pub fn resolve_answer(answer: &str, suggested: &Path) -> Option<PathBuf> {
    let answer = answer.trim();
    if answer == CANCEL {
        return None;
    }
    if answer.is_empty() {
        return Some(suggested.to_path_buf());
    }

    let typed = Path::new(answer);
    if typed.is_absolute() {
        return Some(typed.to_path_buf());
    }
    Some(match suggested.parent() {
        Some(dir) => dir.join(typed),
        None => typed.to_path_buf(),
    })
}

#[async_trait]
impl DestinationPicker for TerminalPicker {
    async fn choose(&self, suggested: &Path, filter: &FileFilter) -> Option<PathBuf> {
        self.presenter.prompt(&format!(
            "Save {} as [{}] ('{}' cancels): ",
            filter,
            suggested.display(),
            CANCEL
        ));
        let answer = self.input.next_line().await?;
        resolve_answer(&answer, suggested)
    }
}
