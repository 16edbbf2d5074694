//! The handful of Telegram Bot API methods the bot needs.

use std::time::Duration;

use ao3tagbot_common::{bail, err, utils, Context as _, Report};
use isahc::{AsyncReadResponseExt as _, HttpClient, Request};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

pub const TELEGRAM_API: &str = "https://api.telegram.org";

/// Seconds a `getUpdates` call may wait for new messages.
pub const POLL_TIMEOUT: u64 = 30;

pub struct Api {
    client: HttpClient,
    /// Includes the token, never log it.
    base: String,
}

impl Api {
    pub fn new(token: &str) -> Result<Self, Report> {
        Self::with_base(TELEGRAM_API, token)
    }

    pub fn with_base(base: &str, token: &str) -> Result<Self, Report> {
        let client = utils::http_client(Duration::from_secs(POLL_TIMEOUT + 10))
            .context("unable to build telegram client")?;

        Ok(Self {
            client,
            base: format!("{}/bot{}", base.trim_end_matches('/'), token),
        })
    }

    #[tracing::instrument(skip(self, params), err)]
    async fn call<P, R>(&self, method: &'static str, params: &P) -> Result<R, Report>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = serde_json::to_vec(params)?;

        let req = Request::post(format!("{}/{}", self.base, method))
            .header("Content-Type", "application/json")
            .body(body)?;

        // Transport errors may carry the url, and with it the token.
        let mut res = self
            .client
            .send_async(req)
            .await
            .map_err(|e| err!("unable to call `{}`: {:?}", method, e.kind()))?;

        let text = res.text().await?;

        let response = serde_json::from_str::<ApiResponse<R>>(&text)
            .with_context(|| format!("invalid `{}` response (status {})", method, res.status()))?;

        match response {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse {
                error_code,
                description,
                ..
            } => bail!(
                "`{}` failed with {}: {}",
                method,
                error_code.unwrap_or_default(),
                description.unwrap_or_default()
            ),
        }
    }

    pub async fn get_me(&self) -> Result<User, Report> {
        self.call("getMe", &serde_json::json!({})).await
    }

    pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, Report> {
        self.call(
            "getUpdates",
            &GetUpdates {
                offset,
                timeout: POLL_TIMEOUT,
                allowed_updates: &["message"],
            },
        )
        .await
    }

    pub async fn send_message(&self, message: &SendMessage<'_>) -> Result<Message, Report> {
        self.call("sendMessage", message).await
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    error_code: Option<i64>,
    description: Option<String>,
}

#[derive(Debug, Serialize)]
struct GetUpdates {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    timeout: u64,
    allowed_updates: &'static [&'static str],
}

#[derive(Clone, Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
    pub caption: Option<String>,
}

impl Message {
    /// Text of a plain message, or the caption of a photo or file.
    pub fn content(&self) -> Option<&str> {
        self.text.as_deref().or(self.caption.as_deref())
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl Chat {
    /// Group title, or the name of the person in a private chat.
    pub fn full_name(&self) -> String {
        if let Some(title) = &self.title {
            return title.clone();
        }

        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");

        match (name.is_empty(), &self.username) {
            (false, _) => name,
            (true, Some(username)) => format!("@{}", username),
            (true, None) => self.id.to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct User {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendMessage<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_message_id: Option<i64>,
    pub allow_sending_without_reply: bool,
    pub disable_web_page_preview: bool,
}

impl<'a> SendMessage<'a> {
    /// A plain text reply to `message`.
    pub fn reply(message: &Message, text: &'a str) -> Self {
        Self {
            chat_id: message.chat.id,
            text,
            parse_mode: None,
            reply_to_message_id: Some(message.message_id),
            allow_sending_without_reply: true,
            disable_web_page_preview: true,
        }
    }

    /// A reply whose text is already escaped `MarkdownV2`.
    pub fn markdown_reply(message: &Message, text: &'a str) -> Self {
        Self {
            parse_mode: Some("MarkdownV2"),
            ..Self::reply(message, text)
        }
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn chat(json: serde_json::Value) -> Chat {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn chat_names() {
        let group = chat(serde_json::json!({ "id": -1, "type": "group", "title": "Book Club" }));
        assert_eq!(group.full_name(), "Book Club");

        let person = chat(serde_json::json!({
            "id": 5,
            "type": "private",
            "first_name": "Sam",
            "last_name": "Lee"
        }));
        assert_eq!(person.full_name(), "Sam Lee");
        assert_eq!(
            chat(serde_json::json!({ "id": 5, "type": "private", "username": "sam" })).full_name(),
            "@sam"
        );
        assert_eq!(
            chat(serde_json::json!({ "id": 5, "type": "private" })).full_name(),
            "5"
        );
    }

    #[test]
    fn markdown_reply_fields() {
        let message: Message = serde_json::from_value(serde_json::json!({
            "message_id": 7,
            "chat": { "id": 42, "type": "private" },
            "caption": "a caption"
        }))
        .unwrap();

        let reply = SendMessage::markdown_reply(&message, "text");
        let json = serde_json::to_value(&reply).unwrap();

        assert_eq!(message.content(), Some("a caption"));
        assert_eq!(json["chat_id"], 42);
        assert_eq!(json["reply_to_message_id"], 7);
        assert_eq!(json["parse_mode"], "MarkdownV2");
        assert!(serde_json::to_value(SendMessage::reply(&message, "t"))
            .unwrap()
            .get("parse_mode")
            .is_none());
    }

    #[tokio::test]
    async fn get_updates() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/botTOKEN/getUpdates"))
            .and(body_partial_json(serde_json::json!({ "offset": 11, "timeout": POLL_TIMEOUT })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": [{
                    "update_id": 11,
                    "message": {
                        "message_id": 3,
                        "chat": { "id": 9, "type": "group", "title": "Readers" },
                        "text": "hello"
                    }
                }, {
                    "update_id": 12,
                    "edited_message": {}
                }]
            })))
            .mount(&mock_server)
            .await;

        let api = Api::with_base(&mock_server.uri(), "TOKEN").unwrap();
        let updates = api.get_updates(Some(11)).await.unwrap();

        assert_eq!(updates.len(), 2);
        let message = updates[0].message.as_ref().unwrap();
        assert_eq!(message.content(), Some("hello"));
        assert_eq!(message.chat.full_name(), "Readers");
        assert!(updates[1].message.is_none());
    }

    #[tokio::test]
    async fn api_errors() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/botTOKEN/getMe"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "ok": false,
                "error_code": 401,
                "description": "Unauthorized"
            })))
            .mount(&mock_server)
            .await;

        let api = Api::with_base(&mock_server.uri(), "TOKEN").unwrap();
        let err = api.get_me().await.unwrap_err();

        assert_eq!(err.to_string(), "`getMe` failed with 401: Unauthorized");
    }
}
