// Interactive session: a two-state machine between entering input and
// viewing a result.
use std::fs;
use std::path::Path;

use crate::document::Document;
use crate::error::{Result, SummarizeError};
use crate::nlp::{LanguageChoice, Summary};
use crate::pipeline::Pipeline;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    AwaitingInput,
    ShowingResult { input: String, summary: Summary },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Summarized { input: String, summary: Summary },
    Reset,
}

fn already_showing() -> SummarizeError {
    SummarizeError::InvalidTransition(
        "a result is already shown; reset before summarizing again".to_string(),
    )
}

impl SessionState {
    pub fn transition(self, event: SessionEvent) -> Result<SessionState> {
        self.step(event).map_err(|(_, e)| e)
    }

    /// Like `transition`, but hands the unchanged state back on error.
    fn step(self, event: SessionEvent) -> std::result::Result<SessionState, (SessionState, SummarizeError)> {
        match (self, event) {
            (SessionState::AwaitingInput, SessionEvent::Summarized { input, summary }) => {
                Ok(SessionState::ShowingResult { input, summary })
            }
            (_, SessionEvent::Reset) => Ok(SessionState::AwaitingInput),
            (state @ SessionState::ShowingResult { .. }, SessionEvent::Summarized { .. }) => {
                Err((state, already_showing()))
            }
        }
    }

    pub fn accepts_input(&self) -> bool {
        matches!(self, SessionState::AwaitingInput)
    }

    pub fn summary(&self) -> Option<&Summary> {
        match self {
            SessionState::ShowingResult { summary, .. } => Some(summary),
            SessionState::AwaitingInput => None,
        }
    }
}

/// Session state plus the inputs submitted so far.
#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
    history: Vec<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    fn apply(&mut self, event: SessionEvent) -> Result<()> {
        match std::mem::take(&mut self.state).step(event) {
            Ok(next) => {
                self.state = next;
                Ok(())
            }
            Err((unchanged, e)) => {
                self.state = unchanged;
                Err(e)
            }
        }
    }

    /// Summarize `document` and move to the result state.
    ///
    /// Only valid while awaiting input; on a pipeline error the session stays put.
    pub fn submit(
        &mut self,
        pipeline: &Pipeline<'_>,
        document: Document,
        choice: LanguageChoice,
    ) -> Result<&Summary> {
        // checked up front so a rejected submit never runs the models
        if !self.state.accepts_input() {
            return Err(already_showing());
        }
        let summary = pipeline.run(&document, choice)?;
        let input = document.text().to_string();
        self.history.push(input.clone());
        self.apply(SessionEvent::Summarized { input, summary })?;
        self.state.summary().ok_or_else(|| {
            SummarizeError::InvalidTransition("no summary after submit".to_string())
        })
    }

    pub fn reset(&mut self) {
        self.state = SessionState::AwaitingInput;
    }

    /// Save the shown summary as a plain-text file.
    pub fn export(&self, path: &Path) -> Result<()> {
        let summary = self.state.summary().ok_or_else(|| {
            SummarizeError::InvalidTransition("nothing to export while awaiting input".to_string())
        })?;
        fs::write(path, format!("{}\n", summary.text))?;
        tracing::info!("Saved summary to {}", path.display());
        Ok(())
    }
}
