//! Terminal presentation of the forms and their outcomes.

use crate::form::{Outcome, UploadRequest};
use std::io::{self, Write};

pub const TITLE: &str = "Personal Tutor Assistant";
pub const SUBTITLE: &str = "Ask any question.";

pub const HELP: &str = "\
Commands:
  /file <path>   select a file to upload (/file alone clears it)
  /upload        upload the selected file
  /submit        submit the question typed so far
  /clear         clear the question
  /show          show the current form
  /help          show this help
  /quit          leave
Any other line is added to your question.";

/// Shows that a request is in flight.
pub trait BusyIndicator {
    fn start(&self, label: &str);
    fn stop(&self);
}

/// Writes the busy label to stderr and clears it once the request is done.
pub struct StderrIndicator;

impl BusyIndicator for StderrIndicator {
    fn start(&self, label: &str) {
        // best effort: a lost indicator must not fail the request
        let mut stderr = io::stderr().lock();
        let _ = write!(stderr, "{label}");
        let _ = stderr.flush();
    }

    fn stop(&self) {
        // Carriage return plus ANSI erase-line
        let mut stderr = io::stderr().lock();
        let _ = write!(stderr, "\r\x1b[2K");
        let _ = stderr.flush();
    }
}

/// Indicator that shows nothing, for one-shot scripted use and tests.
pub struct NoIndicator;

impl BusyIndicator for NoIndicator {
    fn start(&self, _label: &str) {}
    fn stop(&self) {}
}

pub fn write_banner(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{TITLE}")?;
    writeln!(out, "{SUBTITLE}")?;
    writeln!(out)?;
    writeln!(out, "{HELP}")
}

/// Write an outcome the way the form displays it.
///
/// `show_context` adds the retrieved context under an answer when the backend sent one.
pub fn write_outcome(out: &mut impl Write, outcome: &Outcome, show_context: bool) -> io::Result<()> {
    match outcome {
        Outcome::Warning(message) => writeln!(out, "⚠ {message}"),
        Outcome::Uploaded { message } => writeln!(out, "✓ {message}"),
        Outcome::Answered { answer, context } => {
            writeln!(out, "✓ {}", outcome.headline())?;
            writeln!(out, "{answer}")?;
            if let (true, Some(context)) = (show_context, context) {
                writeln!(out)?;
                writeln!(out, "Context used:")?;
                write_code_block(out, context)?;
            }
            Ok(())
        }
        Outcome::Failed { .. } => {
            writeln!(out, "✗ {}", outcome.headline())?;
            if let Some(code) = outcome.code_block() {
                write_code_block(out, code)?;
            }
            Ok(())
        }
    }
}

fn write_code_block(out: &mut impl Write, code: &str) -> io::Result<()> {
    writeln!(out, "```")?;
    if !code.is_empty() {
        writeln!(out, "{}", code.trim_end_matches('\n'))?;
    }
    writeln!(out, "```")
}

/// Write the current state of both forms.
pub fn write_form(out: &mut impl Write, file: Option<&UploadRequest>, query: &str) -> io::Result<()> {
    match file {
        Some(file) => writeln!(out, "File: {} ({} bytes)", file.file_name, file.bytes.len())?,
        None => writeln!(out, "File: (none selected)")?,
    }
    if query.is_empty() {
        writeln!(out, "Your Question: (empty)")
    } else {
        writeln!(out, "Your Question:")?;
        for line in query.lines() {
            writeln!(out, "  {line}")?;
        }
        Ok(())
    }
}
