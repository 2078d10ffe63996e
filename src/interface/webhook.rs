//! # Webhook
//!
//! HTTP surface for the WhatsApp Cloud API: the subscription challenge, inbound
//! message intake and a health probe. Each text message is run through the
//! dispatcher and the reply is delivered with the configured `ChatProvider`.

use axum::{
    Extension, Json, Router,
    body::Bytes,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::application::router::MessageDispatcher;
use crate::domain::error::DispatchError;
use crate::domain::traits::ChatProvider;
use crate::strings::logs;

/// Everything a webhook request needs.
pub struct WebhookState {
    pub dispatcher: Arc<MessageDispatcher>,
    pub chat: Arc<dyn ChatProvider>,
    pub verify_token: String,
}

pub fn build_router(state: Arc<WebhookState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/webhook", get(verify).post(receive))
        .layer(Extension(state))
}

async fn health_check() -> &'static str {
    "OK"
}

#[derive(Debug, Deserialize)]
struct VerifyQuery {
    #[serde(rename = "hub.mode")]
    mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    token: Option<String>,
    #[serde(rename = "hub.challenge")]
    challenge: Option<String>,
}

async fn verify(
    Extension(state): Extension<Arc<WebhookState>>,
    Query(query): Query<VerifyQuery>,
) -> Response {
    match (query.mode.as_deref(), query.token.as_deref()) {
        (Some("subscribe"), Some(token)) if token == state.verify_token => {
            tracing::info!("{}", logs::VERIFY_OK);
            query.challenge.unwrap_or_default().into_response()
        }
        _ => {
            tracing::warn!("{}", logs::VERIFY_FAILED);
            StatusCode::FORBIDDEN.into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct WebhookPayload {
    #[serde(default)]
    entry: Vec<WebhookEntry>,
}

#[derive(Debug, Deserialize)]
struct WebhookEntry {
    #[serde(default)]
    changes: Vec<WebhookChange>,
}

#[derive(Debug, Deserialize)]
struct WebhookChange {
    #[serde(default)]
    value: ChangeValue,
}

#[derive(Debug, Deserialize, Default)]
struct ChangeValue {
    #[serde(default)]
    messages: Vec<InboundMessage>,
}

#[derive(Debug, Deserialize)]
struct InboundMessage {
    from: String,
    #[serde(rename = "type", default)]
    kind: String,
    text: Option<InboundText>,
}

#[derive(Debug, Deserialize)]
struct InboundText {
    #[serde(default)]
    body: String,
}

impl WebhookPayload {
    /// (sender, text) for every text message, in delivery order.
    fn text_messages(self) -> Vec<(String, String)> {
        self.entry
            .into_iter()
            .flat_map(|entry| entry.changes)
            .flat_map(|change| change.value.messages)
            .filter_map(|msg| match msg.text {
                Some(text) => Some((msg.from, text.body)),
                None => {
                    tracing::debug!("{}", logs::ignored_message(&msg.kind));
                    None
                }
            })
            .collect()
    }
}

async fn receive(Extension(state): Extension<Arc<WebhookState>>, body: Bytes) -> Response {
    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!("{}", logs::webhook_rejected(&e.to_string()));
            return error_response(e.to_string());
        }
    };

    let mut answered = 0_usize;
    let mut rejected = Vec::new();
    for (sender, text) in payload.text_messages() {
        tracing::info!("{}", logs::message_received(&sender, &text));
        match state.dispatcher.handle(&sender, &text).await {
            Ok(reply) => {
                answered += 1;
                deliver(state.chat.as_ref(), &sender, &reply).await;
            }
            Err(e) => {
                tracing::warn!("{}", logs::webhook_rejected(&e.to_string()));
                rejected.push(e);
            }
        }
    }

    // A 400 makes the Cloud API redeliver the whole batch, so it is only safe
    // when nothing in it was answered
    match rejected.first() {
        None => Json(json!({ "status": "success" })).into_response(),
        Some(e) if answered == 0 => error_response(e.to_string()),
        Some(_) => {
            Json(json!({ "status": "success", "rejected": rejected.len() })).into_response()
        }
    }
}

/// Send failures are logged and dropped; the sender is never told.
async fn deliver(chat: &dyn ChatProvider, recipient: &str, reply: &str) {
    if let Err(e) = chat.send_message(recipient, reply).await {
        let err = DispatchError::DeliveryFailure(e);
        tracing::error!("{}", logs::delivery_failed(recipient, &err.to_string()));
    }
}

fn error_response(message: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "status": "error", "message": message })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::store::InMemoryStore;
    use crate::domain::traits::{ConversationStore, LlmProvider};
    use crate::domain::types::ConversationEntry;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::Mutex;
    use tower::ServiceExt;

    struct EchoLlm;

    #[async_trait]
    impl LlmProvider for EchoLlm {
        async fn completion(&self, window: &[ConversationEntry]) -> Result<String, String> {
            let last = window.last().map(|e| e.content.clone()).unwrap_or_default();
            Ok(format!("coach: {last}"))
        }
    }

    #[derive(Default)]
    struct RecordingChat {
        sent: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    #[async_trait]
    impl ChatProvider for RecordingChat {
        async fn send_message(&self, recipient: &str, content: &str) -> Result<(), String> {
            self.sent
                .lock()
                .unwrap()
                .push((recipient.to_string(), content.to_string()));
            if self.fail {
                return Err("HTTP 401: invalid token".to_string());
            }
            Ok(())
        }

        async fn health_check(&self) -> Result<(), String> {
            Ok(())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn app(chat: Arc<RecordingChat>) -> (Router, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        let dispatcher = Arc::new(MessageDispatcher::new(
            store.clone(),
            Arc::new(EchoLlm),
            "prompt",
        ));
        let state = Arc::new(WebhookState {
            dispatcher,
            chat,
            verify_token: "secret".to_string(),
        });
        (build_router(state), store)
    }

    fn text_payload(from: &str, body: &str) -> String {
        json!({
            "object": "whatsapp_business_account",
            "entry": [{
                "changes": [{
                    "value": {
                        "messages": [{"from": from, "type": "text", "text": {"body": body}}]
                    }
                }]
            }]
        })
        .to_string()
    }

    fn post(body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/webhook")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (router, _) = app(Arc::new(RecordingChat::default()));
        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "OK");
    }

    #[tokio::test]
    async fn test_verify_echoes_challenge() {
        let (router, _) = app(Arc::new(RecordingChat::default()));
        let uri = "/webhook?hub.mode=subscribe&hub.verify_token=secret&hub.challenge=12345";
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "12345");
    }

    #[tokio::test]
    async fn test_verify_rejects_wrong_token() {
        for uri in [
            "/webhook?hub.mode=subscribe&hub.verify_token=nope&hub.challenge=1",
            "/webhook?hub.mode=unsubscribe&hub.verify_token=secret&hub.challenge=1",
            "/webhook",
        ] {
            let (router, _) = app(Arc::new(RecordingChat::default()));
            let response = router
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_command_reply_is_sent_back() {
        let chat = Arc::new(RecordingChat::default());
        let (router, store) = app(chat.clone());

        let response = router
            .oneshot(post(text_payload("4915100000", "!weight 72 kg")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, r#"{"status":"success"}"#);

        let sent = chat.sent.lock().unwrap().clone();
        assert_eq!(
            sent,
            vec![("4915100000".to_string(), "Weight recorded: 72.0 kg".to_string())]
        );
        assert_eq!(store.get("4915100000").await.len(), 1);
    }

    #[tokio::test]
    async fn test_chat_reply_is_sent_back() {
        let chat = Arc::new(RecordingChat::default());
        let (router, _) = app(chat.clone());

        router
            .oneshot(post(text_payload("49151", "hello coach")))
            .await
            .unwrap();

        let sent = chat.sent.lock().unwrap().clone();
        assert_eq!(sent[0].1, "coach: hello coach");
    }

    #[tokio::test]
    async fn test_delivery_failure_still_acknowledges() {
        let chat = Arc::new(RecordingChat {
            fail: true,
            ..Default::default()
        });
        let (router, store) = app(chat);

        let response = router
            .oneshot(post(text_payload("49151", "hello")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        // The exchange itself is still recorded
        assert_eq!(store.get("49151").await.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_text_is_bad_request() {
        let chat = Arc::new(RecordingChat::default());
        let (router, _) = app(chat.clone());

        let response = router.oneshot(post(text_payload("49151", ""))).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(chat.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mixed_batch_is_acknowledged() {
        let chat = Arc::new(RecordingChat::default());
        let (router, store) = app(chat.clone());

        let body = json!({
            "entry": [{
                "changes": [{
                    "value": {
                        "messages": [
                            {"from": "49151", "type": "text", "text": {"body": "!mood 4"}},
                            {"from": "49152", "type": "text", "text": {"body": "   "}}
                        ]
                    }
                }]
            }]
        })
        .to_string();

        let response = router.oneshot(post(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_string(response).await,
            r#"{"rejected":1,"status":"success"}"#
        );

        let sent = chat.sent.lock().unwrap().clone();
        assert_eq!(sent, vec![("49151".to_string(), "Mood recorded: 4/5".to_string())]);
        assert_eq!(store.get("49151").await.len(), 1);
        assert!(store.get("49152").await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let (router, _) = app(Arc::new(RecordingChat::default()));
        let response = router.oneshot(post("{not json".to_string())).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_status_updates_and_media_are_ignored() {
        let chat = Arc::new(RecordingChat::default());
        let (router, _) = app(chat.clone());

        let body = json!({
            "entry": [{
                "changes": [
                    {"value": {"statuses": [{"id": "wamid.1", "status": "delivered"}]}},
                    {"value": {"messages": [{"from": "49151", "type": "image", "image": {"id": "m1"}}]}}
                ]
            }]
        })
        .to_string();

        let response = router.oneshot(post(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(chat.sent.lock().unwrap().is_empty());
    }
}
