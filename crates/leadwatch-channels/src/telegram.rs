//! Telegram Bot channel — alert delivery via `sendMessage` and topic discovery
//! via `getUpdates`.

use async_trait::async_trait;
use leadwatch_core::config::TelegramConfig;
use leadwatch_core::error::{LeadWatchError, Result};
use leadwatch_core::traits::Notifier;
use leadwatch_core::types::Ack;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SERVICE: &str = "Telegram";

/// Telegram Bot channel bound to one destination chat (and optional topic).
pub struct TelegramChannel {
    config: TelegramConfig,
    client: reqwest::Client,
}

impl TelegramChannel {
    /// Requires a bot token. The destination chat is checked on send, so a
    /// channel without one can still be used for discovery.
    pub fn new(config: TelegramConfig) -> Result<Self> {
        config.validate_token()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LeadWatchError::Network(format!("Client error: {e}")))?;
        Ok(Self { config, client })
    }

    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.bot_token,
            method
        )
    }

    /// Send an HTML message to the configured chat/topic. Never retries.
    pub async fn send_message(&self, text: &str) -> Result<Ack> {
        self.config.validate()?;

        let body = SendMessageRequest {
            chat_id: &self.config.chat_id,
            text,
            parse_mode: "HTML",
            disable_web_page_preview: true,
            message_thread_id: self.config.thread_id,
        };

        let response = self
            .client
            .post(self.api_url("sendMessage"))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error("sendMessage", e))?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|e| self.transport_error("sendMessage", e))?;
        let result: Option<TelegramApiResponse<TelegramMessage>> = serde_json::from_str(&raw).ok();

        match result {
            Some(TelegramApiResponse {
                ok: true,
                result: Some(message),
                ..
            }) if status.is_success() => {
                tracing::info!(
                    "✅ Alert sent to Telegram chat {} (message {})",
                    self.config.chat_id,
                    message.message_id
                );
                Ok(Ack {
                    chat_id: self.config.chat_id.clone(),
                    message_id: message.message_id,
                    thread_id: self.config.thread_id,
                })
            }
            other => Err(LeadWatchError::Upstream {
                service: SERVICE.into(),
                status: status.as_u16(),
                description: other
                    .and_then(|r| r.description)
                    .unwrap_or_else(|| "Unknown error".into()),
            }),
        }
    }

    /// Recent updates received by the bot.
    pub async fn get_updates(&self) -> Result<Vec<TelegramUpdate>> {
        let response = self
            .client
            .get(self.api_url("getUpdates"))
            .send()
            .await
            .map_err(|e| self.transport_error("getUpdates", e))?;

        let status = response.status();
        let body: TelegramApiResponse<Vec<TelegramUpdate>> =
            response.json().await.map_err(|e| LeadWatchError::Upstream {
                service: SERVICE.into(),
                status: status.as_u16(),
                description: format!("Invalid getUpdates response: {e}"),
            })?;

        if !body.ok {
            return Err(LeadWatchError::Upstream {
                service: SERVICE.into(),
                status: status.as_u16(),
                description: body.description.unwrap_or_else(|| "Unknown error".into()),
            });
        }
        Ok(body.result.unwrap_or_default())
    }

    /// Chats and topics of the last `limit` messages, oldest first. Updates
    /// that carry no message are ignored.
    /// Used once to find the group and thread ids to configure.
    pub async fn recent_topics(&self, limit: usize) -> Result<Vec<TopicCandidate>> {
        let mut topics: Vec<TopicCandidate> = self
            .get_updates()
            .await?
            .iter()
            .filter_map(TelegramUpdate::to_topic)
            .collect();
        let skip = topics.len().saturating_sub(limit);
        Ok(topics.split_off(skip))
    }

    fn transport_error(&self, method: &str, e: reqwest::Error) -> LeadWatchError {
        if e.is_timeout() {
            LeadWatchError::Timeout {
                service: SERVICE.into(),
                secs: self.config.timeout_secs,
            }
        } else {
            LeadWatchError::Network(format!("Telegram {method} failed: {e}"))
        }
    }
}

#[async_trait]
impl Notifier for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send(&self, message: &str) -> Result<Ack> {
        self.send_message(message).await
    }
}

/// Where a message was seen, as reported by `getUpdates`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicCandidate {
    pub chat_id: i64,
    pub chat_title: String,
    /// Set when the message was posted inside a forum topic.
    pub thread_id: Option<i64>,
    pub text: String,
}

// --- Telegram API Types ---

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
    disable_web_page_preview: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message_thread_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct TelegramApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramUpdate {
    pub update_id: i64,
    pub message: Option<TelegramMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramMessage {
    pub message_id: i64,
    pub chat: TelegramChat,
    pub text: Option<String>,
    pub message_thread_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramChat {
    pub id: i64,
    #[serde(rename = "type")]
    pub chat_type: String,
    pub title: Option<String>,
}

impl TelegramUpdate {
    pub fn to_topic(&self) -> Option<TopicCandidate> {
        let msg = self.message.as_ref()?;
        Some(TopicCandidate {
            chat_id: msg.chat.id,
            chat_title: msg
                .chat
                .title
                .clone()
                .unwrap_or_else(|| "Sin título".into()),
            thread_id: msg.message_thread_id,
            text: msg.text.clone().unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};

    const TOKEN: &str = "test-token";

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn config(api_base: &str) -> TelegramConfig {
        TelegramConfig {
            bot_token: TOKEN.into(),
            chat_id: "-1001234".into(),
            thread_id: Some(77),
            api_base: api_base.into(),
            ..TelegramConfig::default()
        }
    }

    type Captured = Arc<Mutex<Vec<Value>>>;

    async fn capture_send(
        State(captured): State<Captured>,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        captured.lock().unwrap().push(body);
        Json(json!({"ok": true, "result": {
            "message_id": 555,
            "chat": {"id": -1001234, "type": "supergroup", "title": "Sales"},
            "text": "hi",
            "message_thread_id": 77
        }}))
    }

    #[tokio::test]
    async fn test_send_message_payload_and_ack() {
        let captured: Captured = Arc::default();
        let app = Router::new()
            .route(&format!("/bot{TOKEN}/sendMessage"), post(capture_send))
            .with_state(captured.clone());
        let channel = TelegramChannel::new(config(&serve(app).await)).unwrap();

        let ack = channel.send("<b>hello</b>").await.unwrap();
        assert_eq!(
            ack,
            Ack {
                chat_id: "-1001234".into(),
                message_id: 555,
                thread_id: Some(77)
            }
        );

        let bodies = captured.lock().unwrap();
        assert_eq!(bodies.len(), 1);
        assert_eq!(
            bodies[0],
            json!({
                "chat_id": "-1001234",
                "text": "<b>hello</b>",
                "parse_mode": "HTML",
                "disable_web_page_preview": true,
                "message_thread_id": 77
            })
        );
    }

    #[tokio::test]
    async fn test_no_thread_id_omits_field() {
        let captured: Captured = Arc::default();
        let app = Router::new()
            .route(&format!("/bot{TOKEN}/sendMessage"), post(capture_send))
            .with_state(captured.clone());
        let mut cfg = config(&serve(app).await);
        cfg.thread_id = None;
        let channel = TelegramChannel::new(cfg).unwrap();

        let ack = channel.send("plain").await.unwrap();
        assert_eq!(ack.thread_id, None);
        assert!(captured.lock().unwrap()[0].get("message_thread_id").is_none());
    }

    #[tokio::test]
    async fn test_non_2xx_carries_description() {
        let app = Router::new().route(
            &format!("/bot{TOKEN}/sendMessage"),
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "ok": false,
                        "error_code": 400,
                        "description": "Bad Request: message thread not found"
                    })),
                )
            }),
        );
        let channel = TelegramChannel::new(config(&serve(app).await)).unwrap();

        match channel.send("hi").await {
            Err(LeadWatchError::Upstream {
                service,
                status,
                description,
            }) => {
                assert_eq!(service, "Telegram");
                assert_eq!(status, 400);
                assert_eq!(description, "Bad Request: message thread not found");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_body_falls_back() {
        let app = Router::new().route(
            &format!("/bot{TOKEN}/sendMessage"),
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
        let channel = TelegramChannel::new(config(&serve(app).await)).unwrap();

        let err = channel.send("hi").await.unwrap_err();
        assert!(matches!(
            err,
            LeadWatchError::Upstream { status: 502, ref description, .. } if description == "Unknown error"
        ));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_missing_destination_is_config_error() {
        let hits = Arc::new(Mutex::new(0usize));
        let counter = hits.clone();
        let app = Router::new().route(
            &format!("/bot{TOKEN}/sendMessage"),
            post(move || {
                let counter = counter.clone();
                async move {
                    *counter.lock().unwrap() += 1;
                    Json(json!({"ok": true}))
                }
            }),
        );
        let mut cfg = config(&serve(app).await);
        cfg.chat_id.clear();
        let channel = TelegramChannel::new(cfg).unwrap();

        let err = channel.send("hi").await.unwrap_err();
        assert!(matches!(err, LeadWatchError::Config(_)));
        assert_eq!(*hits.lock().unwrap(), 0);

        let mut cfg = TelegramConfig::default();
        cfg.chat_id = "-1".into();
        assert!(matches!(
            TelegramChannel::new(cfg),
            Err(LeadWatchError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_slow_send_times_out() {
        let app = Router::new().route(
            &format!("/bot{TOKEN}/sendMessage"),
            post(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(json!({"ok": true}))
            }),
        );
        let mut cfg = config(&serve(app).await);
        cfg.timeout_secs = 1;
        let channel = TelegramChannel::new(cfg).unwrap();

        let err = channel.send("hi").await.unwrap_err();
        assert!(matches!(err, LeadWatchError::Timeout { secs: 1, .. }));
    }

    #[tokio::test]
    async fn test_recent_topics() {
        let app = Router::new().route(
            &format!("/bot{TOKEN}/getUpdates"),
            get(|| async {
                Json(json!({"ok": true, "result": [
                    {"update_id": 1, "message": {
                        "message_id": 10,
                        "chat": {"id": 5, "type": "private"},
                        "text": "old"
                    }},
                    {"update_id": 2, "my_chat_member": {}},
                    {"update_id": 3, "message": {
                        "message_id": 11,
                        "chat": {"id": -1009, "type": "supergroup", "title": "Ventas"},
                        "message_thread_id": 42,
                        "text": "alerts go here"
                    }},
                    {"update_id": 4, "message": {
                        "message_id": 12,
                        "chat": {"id": -1009, "type": "supergroup", "title": "Ventas"}
                    }}
                ]}))
            }),
        );
        let mut cfg = config(&serve(app).await);
        cfg.chat_id.clear();
        let channel = TelegramChannel::new(cfg).unwrap();

        let topics = channel.recent_topics(2).await.unwrap();
        assert_eq!(
            topics,
            vec![
                TopicCandidate {
                    chat_id: -1009,
                    chat_title: "Ventas".into(),
                    thread_id: Some(42),
                    text: "alerts go here".into(),
                },
                TopicCandidate {
                    chat_id: -1009,
                    chat_title: "Ventas".into(),
                    thread_id: None,
                    text: String::new(),
                },
            ]
        );

        // Non-message updates do not count against the limit
        let last_three = channel.recent_topics(3).await.unwrap();
        assert_eq!(last_three.len(), 3);
        assert_eq!(last_three[0].text, "old");

        let all = channel.recent_topics(10).await.unwrap();
        assert_eq!(all[0].chat_title, "Sin título");
    }

    #[tokio::test]
    async fn test_get_updates_error() {
        let app = Router::new().route(
            &format!("/bot{TOKEN}/getUpdates"),
            get(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"ok": false, "error_code": 401, "description": "Unauthorized"})),
                )
            }),
        );
        let channel = TelegramChannel::new(config(&serve(app).await)).unwrap();
        let err = channel.recent_topics(5).await.unwrap_err();
        assert!(matches!(
            err,
            LeadWatchError::Upstream { status: 401, ref description, .. } if description == "Unauthorized"
        ));
    }
}
