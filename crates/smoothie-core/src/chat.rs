//! Conversation model and the chat wire format

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::BuildMode;

/// First assistant message of every session
pub const WELCOME_MESSAGE: &str =
    "Welcome! I'm your smoothie assistant. What kind of smoothie are you looking for today?";

/// Used when a reply carries no explanation
pub const FALLBACK_REPLY: &str =
    "I'm not sure what to recommend. Could you provide more details?";

/// Suggested prompts offered until the first send
pub const SUGGESTED_PROMPTS: [&str; 3] = [
    "I need a smoothie to boost my immune system",
    "What's the best smoothie for post-workout recovery?",
    "I'd like a detox smoothie for cleansing",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Price summary attached to a recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothieData {
    pub id: String,
    pub name: String,
    pub price_usd: f64,
}

/// One entry in the conversation. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    pub show_image: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smoothie_data: Option<SmoothieData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_first_recommendation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_new_smoothie: Option<bool>,
    pub timestamp: DateTime<Local>,
}

impl ChatMessage {
    fn plain(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            image_path: None,
            show_image: false,
            smoothie_data: None,
            is_first_recommendation: None,
            is_new_smoothie: None,
            timestamp: Local::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain(Role::Assistant, content)
    }

    pub fn welcome() -> Self {
        Self::assistant(WELCOME_MESSAGE)
    }

    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }

    /// Price is rendered only alongside a newly introduced smoothie
    pub fn shows_price(&self) -> bool {
        self.smoothie_data.is_some() && self.is_new_smoothie == Some(true)
    }

    /// `"($6.50)"` when the price is shown
    pub fn price_label(&self) -> Option<String> {
        if !self.shows_price() {
            return None;
        }
        self.smoothie_data
            .as_ref()
            .map(|data| format!("(${:.2})", data.price_usd))
    }

    /// Local wall-clock time, `HH:MM`
    pub fn formatted_time(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}

/// What the recommender believes the user asked for.
///
/// Unrecognised or absent values become [`Intent::Unknown`], which is handled
/// like a new request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Intent {
    NewRequest,
    FollowUp,
    GeneralChat,
    NeedsInfo,
    #[default]
    Unknown,
}

impl Intent {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "SMOOTHIE_REQUEST" | "NEW_REQUEST" => Intent::NewRequest,
            "FOLLOW_UP" => Intent::FollowUp,
            "GENERAL_CHAT" => Intent::GeneralChat,
            "NEEDS_INFO" => Intent::NeedsInfo,
            _ => Intent::Unknown,
        }
    }

    pub fn as_wire(&self) -> Option<&'static str> {
        match self {
            Intent::NewRequest => Some("SMOOTHIE_REQUEST"),
            Intent::FollowUp => Some("FOLLOW_UP"),
            Intent::GeneralChat => Some("GENERAL_CHAT"),
            Intent::NeedsInfo => Some("NEEDS_INFO"),
            Intent::Unknown => None,
        }
    }

    /// Whether the reply should always show its image
    pub fn is_new_request(&self) -> bool {
        matches!(self, Intent::NewRequest | Intent::Unknown)
    }

    /// Whether the reply may carry a price summary
    pub fn carries_recommendation(&self) -> bool {
        matches!(self, Intent::NewRequest | Intent::FollowUp)
    }
}

impl From<Option<String>> for Intent {
    fn from(value: Option<String>) -> Self {
        value.as_deref().map(Intent::parse).unwrap_or_default()
    }
}

impl From<Intent> for Option<String> {
    fn from(intent: Intent) -> Self {
        intent.as_wire().map(str::to_string)
    }
}

/// Body of a successful `POST /chat` response. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price_usd: Option<f64>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub intent: Intent,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default, rename = "requiresAddOn")]
    pub requires_add_on: Option<bool>,
}

impl ChatReply {
    /// Price summary, when id, name and price are all present
    pub fn smoothie_data(&self) -> Option<SmoothieData> {
        Some(SmoothieData {
            id: self.id.clone()?,
            name: self.name.clone()?,
            price_usd: self.price_usd?,
        })
    }

    pub fn content(&self) -> &str {
        self.explanation
            .as_deref()
            .filter(|text| !text.trim().is_empty())
            .unwrap_or(FALLBACK_REPLY)
    }
}

/// One history entry as sent over the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

/// Body of `POST /chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub history: Vec<ChatTurn>,
}

impl ChatRequest {
    pub fn from_messages(messages: &[ChatMessage]) -> Self {
        Self {
            history: messages
                .iter()
                .map(|m| ChatTurn {
                    role: m.role,
                    content: m.content.clone(),
                })
                .collect(),
        }
    }
}

/// Why a chat request produced no reply
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChatFailure {
    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("{detail}")]
    Http { status: u16, detail: String },

    #[error("Invalid JSON response from server: {0}")]
    Parse(String),
}

impl ChatFailure {
    /// Non-2xx response; an empty body falls back to the status line
    pub fn http(status: u16, reason: Option<&str>, body: &str) -> Self {
        let detail = if body.trim().is_empty() {
            format!("HTTP Error {status}: {}", reason.unwrap_or_default())
                .trim_end()
                .to_string()
        } else {
            body.to_string()
        };
        ChatFailure::Http { status, detail }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ChatFailure::Timeout)
    }

    /// Text of the assistant message appended for this failure
    pub fn user_message(&self, mode: BuildMode) -> String {
        match self {
            ChatFailure::Timeout => {
                "Request timed out. Please check your connection and try again.".to_string()
            }
            ChatFailure::Network(_) => {
                "Network error. Please check your connection and try again.".to_string()
            }
            ChatFailure::Http { .. } | ChatFailure::Parse(_) => {
                if mode.is_production() {
                    "Sorry, we couldn't process your request. Please try again later.".to_string()
                } else {
                    format!("⚠️ Error: {self}")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_parse() {
        assert_eq!(Intent::parse("SMOOTHIE_REQUEST"), Intent::NewRequest);
        assert_eq!(Intent::parse("follow_up"), Intent::FollowUp);
        assert_eq!(Intent::parse("GENERAL_CHAT"), Intent::GeneralChat);
        assert_eq!(Intent::parse("NEEDS_INFO"), Intent::NeedsInfo);
        assert_eq!(Intent::parse("SOMETHING_ELSE"), Intent::Unknown);
    }

    #[test]
    fn test_unknown_intent_counts_as_new_request() {
        assert!(Intent::Unknown.is_new_request());
        assert!(Intent::NewRequest.is_new_request());
        assert!(!Intent::FollowUp.is_new_request());
        assert!(!Intent::Unknown.carries_recommendation());
    }

    #[test]
    fn test_reply_deserializes_full_body() {
        let reply: ChatReply = serde_json::from_str(
            r#"{"id":"golden_immunity_latte","name":"Golden Immunity Latte","type":"latte",
                "price_usd":6.5,"requiresAddOn":false,"image_path":"/static/g.jpg",
                "explanation":"Great pick!","intent":"SMOOTHIE_REQUEST"}"#,
        )
        .unwrap();
        assert_eq!(reply.intent, Intent::NewRequest);
        assert_eq!(reply.kind.as_deref(), Some("latte"));
        assert_eq!(reply.requires_add_on, Some(false));
        assert_eq!(
            reply.smoothie_data(),
            Some(SmoothieData {
                id: "golden_immunity_latte".into(),
                name: "Golden Immunity Latte".into(),
                price_usd: 6.5,
            })
        );
    }

    #[test]
    fn test_reply_missing_fields() {
        let reply: ChatReply = serde_json::from_str(r#"{"intent":null}"#).unwrap();
        assert_eq!(reply.intent, Intent::Unknown);
        assert_eq!(reply.smoothie_data(), None);
        assert_eq!(reply.content(), FALLBACK_REPLY);

        let empty: ChatReply = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.intent, Intent::Unknown);
    }

    #[test]
    fn test_smoothie_data_requires_price() {
        let reply = ChatReply {
            id: Some("blue_moon".into()),
            name: Some("Blue Moon".into()),
            ..Default::default()
        };
        assert_eq!(reply.smoothie_data(), None);
    }

    #[test]
    fn test_request_wire_shape() {
        let messages = vec![ChatMessage::welcome(), ChatMessage::user("hi")];
        let body = serde_json::to_value(ChatRequest::from_messages(&messages)).unwrap();
        assert_eq!(body["history"][0]["role"], "assistant");
        assert_eq!(body["history"][1]["role"], "user");
        assert_eq!(body["history"][1]["content"], "hi");
        assert!(body["history"][1].get("timestamp").is_none());
    }

    #[test]
    fn test_failure_messages_by_mode() {
        let http = ChatFailure::http(500, Some("Internal Server Error"), "boom");
        assert_eq!(http.user_message(BuildMode::Development), "⚠️ Error: boom");
        assert_eq!(
            http.user_message(BuildMode::Production),
            "Sorry, we couldn't process your request. Please try again later."
        );
        assert!(ChatFailure::Timeout
            .user_message(BuildMode::Development)
            .starts_with("Request timed out"));
        assert!(ChatFailure::Network("refused".into())
            .user_message(BuildMode::Production)
            .starts_with("Network error"));
    }

    #[test]
    fn test_http_failure_empty_body_uses_status_line() {
        let failure = ChatFailure::http(502, Some("Bad Gateway"), "  ");
        assert_eq!(failure.to_string(), "HTTP Error 502: Bad Gateway");
    }

    #[test]
    fn test_price_label_only_for_new_smoothie() {
        let mut msg = ChatMessage::assistant("Great pick!");
        msg.smoothie_data = Some(SmoothieData {
            id: "x".into(),
            name: "X".into(),
            price_usd: 6.5,
        });
        assert_eq!(msg.price_label(), None);
        msg.is_new_smoothie = Some(true);
        assert_eq!(msg.price_label().as_deref(), Some("($6.50)"));
    }
}
