//! Turning backend responses into outcomes.

use super::types::{DEFAULT_UPLOAD_MESSAGE, Failure, Flow, Outcome};
use crate::errors::{Error, Result};
use crate::http::HttpResponse;
use serde_json::Value;

/// Interpret the result of an upload call.
///
/// Only a JSON response counts as an answer from the backend; anything else is shown raw.
/// The status code is not consulted: any JSON reply is shown as success.
pub fn interpret_upload(result: Result<HttpResponse>) -> Outcome {
    let response = match result {
        Ok(response) => response,
        Err(e) => return failed(Flow::Upload, call_failure(e)),
    };

    if !response.is_json() {
        return failed(
            Flow::Upload,
            Failure::UnexpectedContentType {
                content_type: response.content_type,
                body: response.body,
            },
        );
    }

    let payload: Value = match serde_json::from_str(&response.body) {
        Ok(payload) => payload,
        Err(e) => {
            return failed(
                Flow::Upload,
                Failure::Decode {
                    message: e.to_string(),
                    body: response.body,
                },
            );
        }
    };

    let message = payload
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_UPLOAD_MESSAGE)
        .to_string();

    Outcome::Uploaded { message }
}

/// Interpret the result of an ask call.
///
/// The status code is not consulted: the backend reports errors as JSON without an
/// `answer`, which ends up shown as the payload.
pub fn interpret_ask(result: Result<HttpResponse>) -> Outcome {
    let response = match result {
        Ok(response) => response,
        Err(e) => return failed(Flow::Ask, call_failure(e)),
    };

    let payload: Value = match serde_json::from_str(&response.body) {
        Ok(payload) => payload,
        Err(e) => {
            return failed(
                Flow::Ask,
                Failure::Decode {
                    message: e.to_string(),
                    body: response.body,
                },
            );
        }
    };

    let Some(answer) = payload.get("answer") else {
        return failed(
            Flow::Ask,
            Failure::MissingAnswer {
                payload,
                body: response.body,
            },
        );
    };

    let answer = match answer {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    let context = payload
        .get("used_context")
        .and_then(Value::as_str)
        .map(str::to_string);

    Outcome::Answered { answer, context }
}

fn failed(flow: Flow, failure: Failure) -> Outcome {
    Outcome::Failed { flow, failure }
}

fn call_failure(err: Error) -> Failure {
    let message = err.to_string();
    let decode = matches!(&err, Error::Json(_)) || matches!(&err, Error::Http(_) if !err.is_transport());
    if decode {
        Failure::Decode {
            message,
            body: String::new(),
        }
    } else {
        Failure::Network { message }
    }
}
