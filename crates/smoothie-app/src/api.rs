//! Chat API transport
//!
//! `POST {api_base}/chat` with `{"history": [...]}`. The transport performs
//! exactly one attempt per request; deadlines are owned by the engine.

use reqwest::{Client, StatusCode};
use smoothie_core::prelude::*;
use smoothie_core::{ChatFailure, ChatReply, ChatRequest};

/// Sends chat requests
///
/// Implement [`ChatTransport`] where the futures are `Send`; the local
/// variant comes for free and is what the browser shell uses.
#[trait_variant::make(ChatTransport: Send)]
pub trait LocalChatTransport {
    async fn send(&self, request: &ChatRequest) -> std::result::Result<ChatReply, ChatFailure>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: Client,
    endpoint: String,
}

impl ChatClient {
    pub fn new(api_base: &str) -> Result<Self> {
        let base = url::Url::parse(api_base)
            .map_err(|e| Error::client_init(format!("invalid API base '{}': {}", api_base, e)))?;
        let endpoint = format!("{}/chat", base.as_str().trim_end_matches('/'));

        let client = Client::builder()
            .build()
            .map_err(|e| Error::client_init(e.to_string()))?;

        debug!("Chat endpoint: {}", endpoint);
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn post_chat(
        &self,
        request: &ChatRequest,
    ) -> std::result::Result<ChatReply, ChatFailure> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(classify_error)?;

        let status = response.status();
        let body = response.text().await.map_err(classify_error)?;

        if !status.is_success() {
            return Err(http_failure(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| ChatFailure::Parse(e.to_string()))
    }
}

// reqwest's browser futures are not `Send`
#[cfg(not(target_arch = "wasm32"))]
impl ChatTransport for ChatClient {
    async fn send(&self, request: &ChatRequest) -> std::result::Result<ChatReply, ChatFailure> {
        self.post_chat(request).await
    }
}

#[cfg(target_arch = "wasm32")]
impl LocalChatTransport for ChatClient {
    async fn send(&self, request: &ChatRequest) -> std::result::Result<ChatReply, ChatFailure> {
        self.post_chat(request).await
    }
}

fn classify_error(error: reqwest::Error) -> ChatFailure {
    if error.is_timeout() {
        ChatFailure::Timeout
    } else if error.is_decode() {
        ChatFailure::Parse(error.to_string())
    } else {
        ChatFailure::Network(error.to_string())
    }
}

fn http_failure(status: StatusCode, body: &str) -> ChatFailure {
    ChatFailure::http(status.as_u16(), status.canonical_reason(), body)
}
