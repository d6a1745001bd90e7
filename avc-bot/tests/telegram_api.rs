#![allow(missing_docs)]
use avc_bot::BotError;
use avc_bot::telegram::TelegramApi;
use avc_bot::transport::ChatTransport;
use avc_core::channel::{InfoLinks, Reply};
use avc_core::config::BotConfig;
use avc_core::request::ChannelIdentity;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

type Captured = Arc<Mutex<Vec<Value>>>;

async fn get_updates(State(captured): State<Captured>, Json(body): Json<Value>) -> Json<Value> {
    captured.lock().unwrap().push(body);
    Json(json!({
        "ok": true,
        "result": [
            {
                "update_id": 500,
                "message": {
                    "message_id": 1,
                    "chat": {"id": 123_456_789, "type": "private"},
                    "from": {"id": 123_456_789, "is_bot": false, "first_name": "Alice"},
                    "date": 1_700_000_000,
                    "text": "/start"
                }
            },
            {"update_id": 501, "edited_message": {"message_id": 2, "chat": {"id": 1}}},
            {
                "update_id": 502,
                "message": {"message_id": 3, "chat": {"id": 7, "type": "private"}, "sticker": {}}
            }
        ]
    }))
}

async fn send_message(State(captured): State<Captured>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let blocked = body["chat_id"] == "666";
    captured.lock().unwrap().push(body);
    if blocked {
        (
            StatusCode::FORBIDDEN,
            Json(json!({"ok": false, "error_code": 403, "description": "Forbidden: bot was blocked by the user"})),
        )
    } else {
        (StatusCode::OK, Json(json!({"ok": true, "result": {"message_id": 9}})))
    }
}

async fn spawn_bot_api() -> (TelegramApi, Captured) {
    let captured: Captured = Arc::default();
    let app = Router::new()
        .route("/bottest-token/getUpdates", post(get_updates))
        .route("/bottest-token/sendMessage", post(send_message))
        .with_state(Arc::clone(&captured));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let base_url = format!("http://{addr}");
    let config = BotConfig::from_lookup(|key| match key {
        "TELEGRAM_BOT_TOKEN" => Some("test-token".to_string()),
        "TELEGRAM_API_URL" => Some(base_url.clone()),
        "TELEGRAM_POLL_TIMEOUT_SECS" => Some("1".to_string()),
        _ => None,
    })
    .unwrap();
    (TelegramApi::new(&config).unwrap(), captured)
}

fn links() -> InfoLinks {
    InfoLinks {
        register_url: "https://example.test/register".into(),
        docs_url: "https://example.test/docs".into(),
    }
}

#[tokio::test]
async fn poll_sends_offset_and_decodes_updates() {
    let (api, captured) = spawn_bot_api().await;

    let updates = api.poll(Some(500)).await.unwrap();

    assert_eq!(updates.len(), 3);
    let first = updates[0].message.as_ref().unwrap();
    assert_eq!(first.chat.id, 123_456_789);
    assert_eq!(first.text.as_deref(), Some("/start"));
    assert!(updates[1].message.is_none());
    assert!(updates[2].message.as_ref().unwrap().text.is_none());

    let request = captured.lock().unwrap()[0].clone();
    assert_eq!(request["offset"], 500);
    assert_eq!(request["timeout"], 1);
    assert_eq!(request["allowed_updates"], json!(["message"]));
}

#[tokio::test]
async fn first_poll_omits_the_offset() {
    let (api, captured) = spawn_bot_api().await;

    api.poll(None).await.unwrap();

    let request = captured.lock().unwrap()[0].clone();
    assert!(request.get("offset").is_none());
}

#[tokio::test]
async fn send_uses_markdown_and_inline_keyboard() {
    let (api, captured) = spawn_bot_api().await;
    let chat = ChannelIdentity::from(123_456_789_i64);

    api.send(&Reply::registration(chat.clone())).await.unwrap();
    api.send(&Reply::info(chat, &links())).await.unwrap();

    let bodies = captured.lock().unwrap().clone();
    assert_eq!(bodies[0]["chat_id"], "123456789");
    assert_eq!(bodies[0]["parse_mode"], "MarkdownV2");
    assert!(bodies[0].get("reply_markup").is_none());
    assert_eq!(
        bodies[1]["reply_markup"]["inline_keyboard"],
        json!([
            [{"text": "✔ Register", "url": "https://example.test/register"}],
            [{"text": "📃 Document", "url": "https://example.test/docs"}]
        ])
    );
}

#[tokio::test]
async fn refused_send_is_an_api_error() {
    let (api, _captured) = spawn_bot_api().await;

    let err = api
        .send(&Reply::registration(ChannelIdentity::from(666_i64)))
        .await
        .unwrap_err();

    match err {
        BotError::Api { status, description } => {
            assert_eq!(status, 403);
            assert!(description.contains("blocked"));
        }
        other => panic!("expected an API error, got {other:?}"),
    }
}

#[tokio::test]
async fn transport_errors_do_not_leak_the_token() {
    let config = BotConfig::from_lookup(|key| match key {
        "TELEGRAM_BOT_TOKEN" => Some("super-secret-token".to_string()),
        "TELEGRAM_API_URL" => Some("http://127.0.0.1:9".to_string()),
        "TELEGRAM_POLL_TIMEOUT_SECS" => Some("1".to_string()),
        _ => None,
    })
    .unwrap();
    let api = TelegramApi::new(&config).unwrap();

    let err = api.poll(None).await.unwrap_err();

    assert!(matches!(err, BotError::Transport(_)));
    assert!(!err.to_string().contains("super-secret-token"));
    assert!(!format!("{api:?}").contains("super-secret-token"));
}
