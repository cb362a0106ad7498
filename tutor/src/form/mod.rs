//! The upload and ask forms.
//!
//! `FormClient` owns everything the screen shows between actions: the selected file, the
//! question text, the last outcome and the current phase. Each action validates its input,
//! makes at most one backend call, and turns whatever came back into an [`Outcome`].

mod interpret;
mod types;

#[cfg(test)]
mod tests;

pub use interpret::{interpret_ask, interpret_upload};
pub use types::*;

use crate::http::Backend;
use crate::render::BusyIndicator;

/// Label shown while an upload is in flight.
pub const UPLOADING_LABEL: &str = "Uploading...";
/// Label shown while a question is in flight.
pub const THINKING_LABEL: &str = "Thinking...";

/// State and actions of the two forms.
pub struct FormClient<B: Backend> {
    backend: B,
    indicator: Box<dyn BusyIndicator>,
    selected_file: Option<UploadRequest>,
    query: String,
    last_outcome: Option<Outcome>,
    phase: Phase,
}

impl<B: Backend> FormClient<B> {
    pub fn new(backend: B, indicator: Box<dyn BusyIndicator>) -> Self {
        Self {
            backend,
            indicator,
            selected_file: None,
            query: String::new(),
            last_outcome: None,
            phase: Phase::Idle,
        }
    }

    pub fn selected_file(&self) -> Option<&UploadRequest> {
        self.selected_file.as_ref()
    }

    /// Replace (or clear, with `None`) the selected file.
    pub fn select_file(&mut self, file: Option<UploadRequest>) {
        self.selected_file = file;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Append a line to the question text, like typing into a text area.
    pub fn push_query_line(&mut self, line: &str) {
        if !self.query.is_empty() {
            self.query.push('\n');
        }
        self.query.push_str(line);
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
    }

    pub fn last_outcome(&self) -> Option<&Outcome> {
        self.last_outcome.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Run the upload form: warn if nothing is selected, otherwise send the file.
    #[tracing::instrument(skip(self))]
    pub async fn upload(&mut self) -> Outcome {
        self.set_phase(Phase::Validating);

        let outcome = match self.selected_file.clone() {
            None => Outcome::Warning(NO_FILE_WARNING.to_string()),
            Some(file) => {
                self.set_phase(Phase::InFlight);
                self.indicator.start(UPLOADING_LABEL);
                let result = self.backend.upload_file(&file).await;
                self.indicator.stop();
                interpret_upload(result)
            }
        };

        self.finish(outcome)
    }

    /// Run the ask form: warn if the question is blank, otherwise send it as typed.
    #[tracing::instrument(skip(self))]
    pub async fn ask(&mut self) -> Outcome {
        self.set_phase(Phase::Validating);

        let outcome = if self.query.trim().is_empty() {
            Outcome::Warning(EMPTY_QUERY_WARNING.to_string())
        } else {
            let request = QuestionRequest::new(self.query.clone());
            self.set_phase(Phase::InFlight);
            self.indicator.start(THINKING_LABEL);
            let result = self.backend.ask(&request).await;
            self.indicator.stop();
            interpret_ask(result)
        };

        self.finish(outcome)
    }

    fn set_phase(&mut self, phase: Phase) {
        tracing::trace!(from = ?self.phase, to = ?phase, "Form phase");
        self.phase = phase;
    }

    fn finish(&mut self, outcome: Outcome) -> Outcome {
        self.set_phase(outcome.phase());
        match &outcome {
            Outcome::Warning(message) => tracing::debug!(message = %message, "Action rejected"),
            Outcome::Failed { flow, failure } => tracing::info!(?flow, error = %failure, "Action failed"),
            _ => tracing::debug!("Action succeeded"),
        }
        self.last_outcome = Some(outcome.clone());
        // Terminal phases only last for one render; the form is ready again right away.
        self.set_phase(Phase::Idle);
        outcome
    }
}
