#![allow(missing_docs)]
use avc_core::config::AuthKey;
use avc_core::console::ScriptedConsole;
use avc_core::handshake::{Orchestrator, Outcome};
use avc_core::request::{ChannelIdentity, VerificationRequest};
use avc_core::service::{HttpVerificationService, VerificationService};
use avc_core::VerifyError;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

const GOOD_KEY: &str = "good-key";

fn spawn_stub(app: Router) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind stub listener");
    let addr = listener.local_addr().expect("Failed to read stub address");
    listener.set_nonblocking(true).expect("Failed to set non-blocking");
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().expect("Failed to start runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).expect("Failed to adopt listener");
            axum::serve(listener, app).await.expect("Stub server failed");
        });
    });
    format!("http://{addr}")
}

fn authkey_info() -> Value {
    json!({
        "tg_username": "alice",
        "tg_appname": "Demo App",
        "tg_appbot": "@demo_bot"
    })
}

async fn status_handler(Query(params): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
    match params.get("avc_authkey").map(String::as_str) {
        Some(GOOD_KEY) => (
            StatusCode::OK,
            Json(json!({
                "api-type": "GET",
                "response": "200",
                "avc_authkey": GOOD_KEY,
                "status": "found",
                "authkey_info": authkey_info()
            })),
        ),
        Some(_) => (StatusCode::NOT_FOUND, Json(json!({"status": "authkey not found"}))),
        None => (StatusCode::BAD_REQUEST, Json(json!({"error": "avc_authkey is required"}))),
    }
}

async fn issue_handler(Query(params): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
    if params.get("avc_authkey").map(String::as_str) != Some(GOOD_KEY) {
        return (StatusCode::NOT_FOUND, Json(json!({"status": "authkey not found"})));
    }
    match params.get("chat_id") {
        Some(chat_id) => (
            StatusCode::OK,
            Json(json!({
                "api-type": "POST",
                "response": "200",
                "status": "found",
                "sendStatus": {"status": "200", "sendTo": chat_id},
                "verificationCode": 48_291_337
            })),
        ),
        None => (StatusCode::BAD_REQUEST, Json(json!({"error": "chat_id is required"}))),
    }
}

fn stub() -> String {
    spawn_stub(Router::new().route("/api/otpVerification", get(status_handler).post(issue_handler)))
}

fn service(base_url: &str, timeout: Duration) -> HttpVerificationService {
    HttpVerificationService::new(base_url, timeout).expect("Failed to build client")
}

#[test]
fn endpoint_is_joined_to_the_base_url() {
    let service = service("http://127.0.0.1:9/", Duration::from_secs(1));
    assert_eq!(service.endpoint(), "http://127.0.0.1:9/api/otpVerification");
}

#[test]
fn query_over_http_renders_every_field() {
    let base_url = stub();
    let key = AuthKey::new(GOOD_KEY).unwrap();
    let orchestrator = Orchestrator::new(service(&base_url, Duration::from_secs(5)));
    let mut console = ScriptedConsole::new(Vec::<String>::new());

    let outcome = orchestrator
        .run(&VerificationRequest::query(&key), &mut console)
        .unwrap();

    let expected = vec![
        "api-type = GET",
        "response = 200",
        "avc_authkey = good-key",
        "status = found",
        "authkey_info = [tg_username, tg_appname, tg_appbot]",
        "tg_username = alice",
        "tg_appname = Demo App",
        "tg_appbot = @demo_bot",
    ];
    assert_eq!(console.output, expected);
    assert!(matches!(outcome, Outcome::Rendered(lines) if lines.len() == expected.len()));
}

#[test]
fn issue_over_http_sends_chat_id_and_accepts_code() {
    let base_url = stub();
    let key = AuthKey::new(GOOD_KEY).unwrap();
    let orchestrator = Orchestrator::new(service(&base_url, Duration::from_secs(5)));
    let mut console = ScriptedConsole::new(["11111111", "48291337"]);
    let request = VerificationRequest::issue(&key, ChannelIdentity::new("123456789").unwrap());

    let outcome = orchestrator.run(&request, &mut console).unwrap();

    assert_eq!(outcome, Outcome::Accepted { attempts: 2 });
}

#[test]
fn unknown_key_is_reported_with_its_status() {
    let base_url = stub();
    let key = AuthKey::new("wrong-key").unwrap();

    let reply = service(&base_url, Duration::from_secs(5))
        .send(&VerificationRequest::query(&key))
        .unwrap();
    assert_eq!(reply.status, 404);

    let orchestrator = Orchestrator::new(service(&base_url, Duration::from_secs(5)));
    let mut console = ScriptedConsole::new(Vec::<String>::new());
    let err = orchestrator
        .run(&VerificationRequest::query(&key), &mut console)
        .unwrap_err();
    assert!(matches!(err, VerifyError::Service { status: 404 }));
}

#[test]
fn refused_connection_is_a_transport_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let key = AuthKey::new(GOOD_KEY).unwrap();

    let err = service(&format!("http://127.0.0.1:{port}"), Duration::from_secs(2))
        .send(&VerificationRequest::query(&key))
        .unwrap_err();

    assert!(matches!(err, VerifyError::Transport(_)));
    assert!(!err.to_string().contains(GOOD_KEY), "errors must not leak the auth key");
}

#[test]
fn slow_service_times_out() {
    let base_url = spawn_stub(Router::new().route(
        "/api/otpVerification",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({"status": "found"}))
        }),
    ));
    let key = AuthKey::new(GOOD_KEY).unwrap();

    let err = service(&base_url, Duration::from_millis(200))
        .send(&VerificationRequest::query(&key))
        .unwrap_err();

    assert!(matches!(err, VerifyError::Transport(_)));
}
