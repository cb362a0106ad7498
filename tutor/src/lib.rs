//! # tutor: Personal Tutor Assistant client
//!
//! A terminal front-end for a question-answering backend. It offers two forms:
//!
//! - **Upload**: send a file as multipart field `file` to `POST /upload-file`
//! - **Ask**: send `{"query": ...}` to `POST /ask` and show the `answer`
//!
//! Both forms validate their input before any request is made, make at most one request per
//! action, and show whatever comes back (success text, answer, or the raw error payload). The
//! forms are available as an interactive session or as one-shot `upload`/`ask` commands.
//!
//! ## Modules
//!
//! - [`form`]: form state, validation, and response interpretation
//! - [`http`]: the [`http::Backend`] trait with reqwest and mock implementations
//! - [`session`]: the interactive loop
//! - [`render`]: terminal output
//! - [`config`]: CLI arguments and layered configuration

pub mod config;
pub mod errors;
pub mod form;
pub mod http;
pub mod render;
pub mod session;
pub mod telemetry;

pub use config::{Args, Command, Config};
pub use errors::{Error, Result};
pub use form::{FormClient, Outcome};
pub use http::{Backend, ReqwestBackend};

use render::{BusyIndicator, NoIndicator, StderrIndicator};
use std::io::{IsTerminal, Write};
use std::path::Path;
use std::process::ExitCode;

/// The configured client, ready to run a command.
pub struct Application {
    config: Config,
}

impl Application {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    fn form(&self, indicator: Box<dyn BusyIndicator>) -> FormClient<ReqwestBackend> {
        FormClient::new(ReqwestBackend::new(self.config.backend_url.clone()), indicator)
    }

    fn indicator() -> Box<dyn BusyIndicator> {
        if std::io::stderr().is_terminal() {
            Box::new(StderrIndicator)
        } else {
            Box::new(NoIndicator)
        }
    }

    /// Run `command`, defaulting to the interactive session.
    pub async fn run(self, command: Option<Command>) -> Result<ExitCode> {
        tracing::info!(backend_url = %self.config.backend_url, ?command, "Starting tutor client");

        match command.unwrap_or(Command::Interactive) {
            Command::Interactive => {
                let form = self.form(Self::indicator());
                let mut session = session::Session::new(form, std::io::stdout(), self.config.show_context);
                session.run(tokio::io::BufReader::new(tokio::io::stdin())).await?;
                Ok(ExitCode::SUCCESS)
            }
            command => self.run_once(command, &mut std::io::stdout()).await,
        }
    }

    /// Run a one-shot `upload` or `ask`, writing the outcome to `out`.
    ///
    /// Exits with success only when the action succeeded; warnings and errors are failures.
    async fn run_once(&self, command: Command, out: &mut impl Write) -> Result<ExitCode> {
        let mut form = self.form(Self::indicator());

        let outcome = match command {
            Command::Upload { path } => {
                if let Some(path) = path {
                    match form::UploadRequest::from_path(&path).await {
                        Ok(file) => form.select_file(Some(file)),
                        Err(e) => return Self::report_unreadable(out, &path, e),
                    }
                }
                form.upload().await
            }
            Command::Ask { query } => {
                form.set_query(query.join(" "));
                form.ask().await
            }
            Command::Interactive => return Ok(ExitCode::SUCCESS),
        };

        self.finish(out, &outcome)
    }

    fn finish(&self, out: &mut impl Write, outcome: &Outcome) -> Result<ExitCode> {
        render::write_outcome(out, outcome, self.config.show_context)?;
        out.flush()?;
        Ok(if outcome.is_success() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
    }

    fn report_unreadable(out: &mut impl Write, path: &Path, err: std::io::Error) -> Result<ExitCode> {
        tracing::debug!(path = %path.display(), error = %err, "Could not read file to upload");
        writeln!(out, "✗ Could not read {}: {err}", path.display())?;
        out.flush()?;
        Ok(ExitCode::FAILURE)
    }
}
