//! Interactive, line-based rendition of the two forms.
//!
//! Lines starting with `/` are commands; everything else is typed into the question.
//! One action runs at a time and the session keeps going after any warning or error.

use crate::errors::Result;
use crate::form::{FormClient, UploadRequest};
use crate::http::Backend;
use crate::render;
use std::io::Write;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    File(Option<&'a str>),
    Upload,
    Submit,
    Clear,
    Show,
    Help,
    Quit,
    Unknown(&'a str),
    Text(&'a str),
}

fn parse(line: &str) -> Command<'_> {
    let Some(command) = line.trim_start().strip_prefix('/') else {
        return Command::Text(line);
    };
    let (name, rest) = command.split_once(char::is_whitespace).unwrap_or((command, ""));
    let rest = rest.trim();

    match name {
        "file" if rest.is_empty() => Command::File(None),
        "file" => Command::File(Some(rest)),
        "upload" => Command::Upload,
        "submit" => Command::Submit,
        "clear" => Command::Clear,
        "show" => Command::Show,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(name),
    }
}

/// An interactive session over a form client.
pub struct Session<B: Backend, W: Write> {
    form: FormClient<B>,
    out: W,
    show_context: bool,
}

impl<B: Backend, W: Write> Session<B, W> {
    pub fn new(form: FormClient<B>, out: W, show_context: bool) -> Self {
        Self { form, out, show_context }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Read lines until `/quit` or end of input.
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> Result<()> {
        render::write_banner(&mut self.out)?;
        let mut lines = input.lines();

        loop {
            write!(self.out, "> ")?;
            self.out.flush()?;

            let Some(line) = lines.next_line().await? else {
                writeln!(self.out)?;
                break;
            };

            if !self.handle(&line).await? {
                break;
            }
        }

        tracing::debug!("Session finished");
        Ok(())
    }

    /// Handle one line. Returns false when the session should end.
    async fn handle(&mut self, line: &str) -> Result<bool> {
        match parse(line) {
            Command::Text(text) => self.form.push_query_line(text),
            Command::File(None) => {
                self.form.select_file(None);
                writeln!(self.out, "File selection cleared")?;
            }
            Command::File(Some(path)) => self.select_file(path).await?,
            Command::Upload => {
                let outcome = self.form.upload().await;
                render::write_outcome(&mut self.out, &outcome, self.show_context)?;
            }
            Command::Submit => {
                let outcome = self.form.ask().await;
                render::write_outcome(&mut self.out, &outcome, self.show_context)?;
            }
            Command::Clear => {
                self.form.clear_query();
                writeln!(self.out, "Question cleared")?;
            }
            Command::Show => render::write_form(&mut self.out, self.form.selected_file(), self.form.query())?,
            Command::Help => writeln!(self.out, "{}", render::HELP)?,
            Command::Quit => return Ok(false),
            Command::Unknown(name) => writeln!(self.out, "⚠ Unknown command /{name}, try /help")?,
        }
        Ok(true)
    }

    async fn select_file(&mut self, path: &str) -> Result<()> {
        match UploadRequest::from_path(Path::new(path)).await {
            Ok(file) => {
                writeln!(self.out, "Selected {} ({} bytes)", file.file_name, file.bytes.len())?;
                self.form.select_file(Some(file));
            }
            Err(e) => {
                tracing::debug!(path = %path, error = %e, "Could not read selected file");
                writeln!(self.out, "✗ Could not read {path}: {e}")?;
            }
        }
        Ok(())
    }
}
