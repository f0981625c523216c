use std::{
    io::{BufRead, BufReader, Read, Write},
    net::TcpListener,
    thread::{self, JoinHandle},
    time::Duration,
};

use forms_client::api::{
    dispatcher::{Dispatcher, HttpDispatcher},
    error::DispatchError,
};
use serde_json::{Value, json};

/// What the one-shot server saw.
struct Captured {
    request_line: String,
    authorization: Option<String>,
    content_type: Option<String>,
    body: Value,
}

/// Serve exactly one request with a canned reply.
fn one_shot(status: &'static str, reply: &'static str) -> (String, JoinHandle<Captured>) {
    serve_once(status, reply, reply.len())
}

/// Like [`one_shot`], but announces `declared_len` body bytes before closing.
fn serve_once(
    status: &'static str,
    reply: &'static str,
    declared_len: usize,
) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/api/v1", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();

        let mut authorization = None;
        let mut content_type = None;
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            let (name, value) = line.split_once(':').unwrap();
            let value = value.trim().to_string();
            match name.to_ascii_lowercase().as_str() {
                "authorization" => authorization = Some(value),
                "content-type" => content_type = Some(value),
                "content-length" => content_length = value.parse().unwrap(),
                _ => {}
            }
        }

        let mut body = vec![0u8; content_length];
        reader.read_exact(&mut body).unwrap();

        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\n",
            status, declared_len
        )
        .unwrap();
        write!(stream, "Connection: close\r\n\r\n{}", reply).unwrap();
        stream.flush().unwrap();

        Captured {
            request_line: request_line.trim_end().to_string(),
            authorization,
            content_type,
            body: serde_json::from_slice(&body).unwrap(),
        }
    });

    (url, handle)
}

fn dispatcher() -> HttpDispatcher {
    HttpDispatcher::new(Some(Duration::from_secs(5))).unwrap()
}

#[test]
fn posts_json_with_bearer_credential() {
    let (url, server) = one_shot("200 OK", r#"{"response":null,"user_state":null}"#);
    let body = json!({ "JsonForms": { "name": "app::MainRequest" } });

    let reply = dispatcher().send(&url, &body, Some("jwt-token")).unwrap();
    assert_eq!(reply, json!({ "response": null, "user_state": null }));

    let seen = server.join().unwrap();
    assert!(seen.request_line.starts_with("POST /api/v1 "));
    assert_eq!(seen.authorization.as_deref(), Some("Bearer jwt-token"));
    assert_eq!(seen.content_type.as_deref(), Some("application/json"));
    assert_eq!(seen.body, body);
}

#[test]
fn missing_credential_is_sent_as_empty_bearer() {
    let (url, server) = one_shot("200 OK", "{}");
    dispatcher().send(&url, &json!({}), None).unwrap();

    let seen = server.join().unwrap();
    assert_eq!(seen.authorization.as_deref(), Some("Bearer"));
}

#[test]
fn non_success_status_carries_text_body() {
    let (url, server) = one_shot("401 Unauthorized", "InvalidToken");
    let err = dispatcher().send(&url, &json!({}), Some("old")).unwrap_err();
    server.join().unwrap();

    match err {
        DispatchError::Http { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "InvalidToken");
        }
        other => panic!("expected http error, got {:?}", other),
    }
}

#[test]
fn server_error_is_an_http_error() {
    let (url, server) = one_shot("500 Internal Server Error", "Internal Error boom");
    let err = dispatcher().send(&url, &json!({}), None).unwrap_err();
    server.join().unwrap();

    assert!(matches!(err, DispatchError::Http { status: 500, .. }));
}

#[test]
fn non_json_success_is_a_decode_failure() {
    let (url, server) = one_shot("200 OK", "hello");
    let err = dispatcher().send(&url, &json!({}), None).unwrap_err();
    server.join().unwrap();

    assert!(matches!(err, DispatchError::Decode { .. }));
}

#[test]
fn unusable_url_is_a_setup_failure() {
    let err = dispatcher().send("not a url", &json!({}), None).unwrap_err();
    assert!(matches!(err, DispatchError::Setup { .. }));
}

#[test]
fn unreachable_server_is_a_network_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/api/v1", listener.local_addr().unwrap());
    drop(listener);

    let err = dispatcher().send(&url, &json!({}), None).unwrap_err();
    assert!(matches!(err, DispatchError::Network { .. }));
}

#[test]
fn truncated_error_body_is_a_network_failure() {
    let (url, server) = serve_once("401 Unauthorized", "Invalid", 64);
    let err = dispatcher().send(&url, &json!({}), Some("old")).unwrap_err();
    server.join().unwrap();

    assert!(
        matches!(err, DispatchError::Network { .. }),
        "unread body must not become an empty message, got {:?}",
        err
    );
}
