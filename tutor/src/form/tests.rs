use super::*;
use crate::http::{HttpResponse, MockBackend, ReqwestBackend};
use crate::render::{BusyIndicator, NoIndicator};
use parking_lot::Mutex;
use std::sync::Arc;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mock_form() -> (MockBackend, FormClient<MockBackend>) {
    let mock = MockBackend::new();
    let form = FormClient::new(mock.clone(), Box::new(NoIndicator));
    (mock, form)
}

fn served_form(server: &MockServer) -> FormClient<ReqwestBackend> {
    let backend = ReqwestBackend::new(Url::parse(&server.uri()).unwrap());
    FormClient::new(backend, Box::new(NoIndicator))
}

/// Records the labels the form shows while busy.
#[derive(Clone, Default)]
struct RecordingIndicator {
    events: Arc<Mutex<Vec<String>>>,
}

impl BusyIndicator for RecordingIndicator {
    fn start(&self, label: &str) {
        self.events.lock().push(format!("start {label}"));
    }

    fn stop(&self) {
        self.events.lock().push("stop".to_string());
    }
}

#[tokio::test]
async fn test_blank_queries_warn_without_request() {
    let (mock, mut form) = mock_form();

    for query in ["", " ", "\t", "\n\n", "  \r\n \t "] {
        form.set_query(query);
        let outcome = form.ask().await;
        assert_eq!(outcome, Outcome::Warning(EMPTY_QUERY_WARNING.to_string()), "query {query:?}");
        assert_eq!(form.phase(), Phase::Idle);
    }

    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_upload_without_file_warns_without_request() {
    let (mock, mut form) = mock_form();

    let outcome = form.upload().await;
    assert_eq!(outcome, Outcome::Warning(NO_FILE_WARNING.to_string()));
    assert_eq!(form.last_outcome(), Some(&outcome));

    // deselecting after a selection behaves the same
    form.select_file(Some(UploadRequest::new("a.txt", b"a".to_vec())));
    form.select_file(None);
    assert_eq!(form.upload().await, Outcome::Warning(NO_FILE_WARNING.to_string()));

    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_busy_indicator_only_shown_in_flight() {
    let indicator = RecordingIndicator::default();
    let mock = MockBackend::new();
    mock.add_response("POST /ask", Ok(HttpResponse::json(200, r#"{"answer": "ok"}"#)));
    mock.add_response("POST /upload-file", Ok(HttpResponse::json(200, "{}")));
    let mut form = FormClient::new(mock.clone(), Box::new(indicator.clone()));

    form.ask().await;
    form.upload().await;
    assert!(indicator.events.lock().is_empty());

    form.set_query("q");
    form.ask().await;
    form.select_file(Some(UploadRequest::new("a.txt", b"a".to_vec())));
    form.upload().await;

    assert_eq!(
        *indicator.events.lock(),
        vec!["start Thinking...", "stop", "start Uploading...", "stop"]
    );
}

#[tokio::test]
async fn test_selected_file_survives_upload() {
    let (mock, mut form) = mock_form();
    mock.add_response("POST /upload-file", Ok(HttpResponse::json(200, r#"{"message": "one"}"#)));
    mock.add_response("POST /upload-file", Ok(HttpResponse::json(200, r#"{"message": "two"}"#)));
    form.select_file(Some(UploadRequest::new("notes.md", b"# notes".to_vec())));

    assert_eq!(form.upload().await, Outcome::Uploaded { message: "one".to_string() });
    assert_eq!(form.upload().await, Outcome::Uploaded { message: "two".to_string() });
    assert_eq!(mock.call_count(), 2);
}

#[test_log::test(tokio::test)]
async fn test_ask_renders_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .and(body_json(serde_json::json!({ "query": "what is six times seven" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "answer": "42" })))
        .expect(1)
        .mount(&server)
        .await;

    let mut form = served_form(&server);
    form.set_query("what is six times seven");
    let outcome = form.ask().await;

    assert_eq!(
        outcome,
        Outcome::Answered {
            answer: "42".to_string(),
            context: None,
        }
    );
    assert_eq!(form.phase(), Phase::Idle);
}

#[test_log::test(tokio::test)]
async fn test_ask_without_answer_shows_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"error": "bad"}"#, "application/json"))
        .mount(&server)
        .await;

    let mut form = served_form(&server);
    form.set_query("anything");
    let outcome = form.ask().await;

    assert_eq!(outcome.phase(), Phase::Error);
    assert_eq!(outcome.headline(), "Backend Error:");
    assert!(outcome.code_block().unwrap().contains(r#"{"error": "bad"}"#));
}

#[test_log::test(tokio::test)]
async fn test_upload_plain_text_response_shown_raw() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload-file"))
        .respond_with(ResponseTemplate::new(500).set_body_raw("server exploded", "text/plain"))
        .mount(&server)
        .await;

    let mut form = served_form(&server);
    form.select_file(Some(UploadRequest::new("lecture.txt", b"notes".to_vec())));
    let outcome = form.upload().await;

    assert_eq!(outcome.phase(), Phase::Error);
    assert_eq!(outcome.headline(), "Upload failed. Backend response:");
    assert_eq!(outcome.code_block(), Some("server exploded"));
}

#[test_log::test(tokio::test)]
async fn test_upload_json_message_shown() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload-file"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "message": "stored ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let mut form = served_form(&server);
    form.select_file(Some(UploadRequest::new("lecture.txt", b"notes".to_vec())));

    assert_eq!(
        form.upload().await,
        Outcome::Uploaded {
            message: "stored ok".to_string()
        }
    );
}

#[tokio::test]
async fn test_unreachable_backend_is_network_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend = ReqwestBackend::new(Url::parse(&format!("http://{addr}")).unwrap());
    let mut form = FormClient::new(backend, Box::new(NoIndicator));
    form.set_query("hello?");

    match form.ask().await {
        Outcome::Failed {
            flow: Flow::Ask,
            failure: Failure::Network { message },
        } => assert!(message.starts_with("HTTP error:")),
        other => panic!("unexpected outcome: {other:?}"),
    }
}
