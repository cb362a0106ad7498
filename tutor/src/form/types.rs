//! Values that flow through the two forms.

use serde_json::Value;
use std::fmt;
use std::path::Path;

/// Shown when the upload button is pressed with nothing selected.
pub const NO_FILE_WARNING: &str = "Please upload a file!";
/// Shown when the question text is empty or only whitespace.
pub const EMPTY_QUERY_WARNING: &str = "Please enter a question!";
/// Success text used when the backend does not send a `message`.
pub const DEFAULT_UPLOAD_MESSAGE: &str = "File uploaded!";

/// A file picked by the user, read into memory at selection time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadRequest {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, keeping only its final path component as the name.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Ok(Self { file_name, bytes })
    }

    /// MIME type for the multipart part, guessed from the file name.
    pub fn mime_type(&self) -> String {
        mime_guess::from_path(&self.file_name).first_or_octet_stream().to_string()
    }
}

/// The question as typed. Sent untrimmed.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct QuestionRequest {
    pub query: String,
}

impl QuestionRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into() }
    }
}

/// Which form produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Upload,
    Ask,
}

/// Where a single action currently is.
///
/// `Idle -> Validating -> (Rejected | InFlight) -> (Success | Error) -> Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Validating,
    Rejected,
    InFlight,
    Success,
    Error,
}

/// Why an action that reached the network did not succeed.
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    /// No response came back.
    Network { message: String },
    /// A response came back but its JSON could not be decoded.
    Decode { message: String, body: String },
    /// Upload answered with something other than JSON.
    UnexpectedContentType { content_type: Option<String>, body: String },
    /// Ask answered with well-formed JSON that carries no `answer`.
    MissingAnswer { payload: Value, body: String },
}

/// The last thing the form displays after an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Validation failed and nothing was sent.
    Warning(String),
    Uploaded {
        message: String,
    },
    Answered {
        answer: String,
        context: Option<String>,
    },
    Failed {
        flow: Flow,
        failure: Failure,
    },
}

impl Outcome {
    /// Phase an action ends in when it produces this outcome.
    pub fn phase(&self) -> Phase {
        match self {
            Outcome::Warning(_) => Phase::Rejected,
            Outcome::Uploaded { .. } | Outcome::Answered { .. } => Phase::Success,
            Outcome::Failed { .. } => Phase::Error,
        }
    }

    pub fn is_success(&self) -> bool {
        self.phase() == Phase::Success
    }

    /// One-line heading shown above any detail.
    pub fn headline(&self) -> String {
        match self {
            Outcome::Warning(message) => message.clone(),
            Outcome::Uploaded { message } => message.clone(),
            Outcome::Answered { .. } => "Answer:".to_string(),
            Outcome::Failed { flow, failure } => match (flow, failure) {
                (Flow::Upload, Failure::UnexpectedContentType { .. }) => {
                    "Upload failed. Backend response:".to_string()
                }
                (Flow::Upload, Failure::Network { message } | Failure::Decode { message, .. }) => {
                    format!("Upload failed: {message}")
                }
                (_, Failure::MissingAnswer { .. }) => "Backend Error:".to_string(),
                (_, failure) => format!("Something went wrong: {failure}"),
            },
        }
    }

    /// Text displayed verbatim in a code block, if any.
    pub fn code_block(&self) -> Option<&str> {
        match self {
            Outcome::Failed { failure, .. } => match failure {
                Failure::Network { .. } => None,
                Failure::Decode { body, .. } if body.is_empty() => None,
                Failure::Decode { body, .. }
                | Failure::UnexpectedContentType { body, .. }
                | Failure::MissingAnswer { body, .. } => Some(body.as_str()),
            },
            _ => None,
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Network { message } => write!(f, "{message}"),
            Failure::Decode { message, .. } => write!(f, "invalid JSON in response: {message}"),
            Failure::UnexpectedContentType { content_type, .. } => match content_type {
                Some(content_type) => write!(f, "unexpected content type {content_type}"),
                None => write!(f, "response had no content type"),
            },
            Failure::MissingAnswer { .. } => write!(f, "response has no answer"),
        }
    }
}
