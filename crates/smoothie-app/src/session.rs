//! Chat session controller
//!
//! Owns the append-only message list, the id of the smoothie currently on
//! screen and the set of in-flight requests. Network I/O happens elsewhere:
//! [`ChatSession::submit`] hands back the request to send and
//! [`ChatSession::complete`] / [`ChatSession::expire`] take the outcome.

use std::collections::BTreeSet;

use serde::Serialize;
use smoothie_core::chat::SUGGESTED_PROMPTS;
use smoothie_core::{
    resolve_image_source, BuildMode, ChatFailure, ChatMessage, ChatReply, ChatRequest,
};

/// Identifies one chat round trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A request ready to be sent
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingChat {
    pub id: RequestId,
    pub request: ChatRequest,
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    current_smoothie_id: Option<String>,
    pending: BTreeSet<RequestId>,
    next_request: u64,
    show_prompt_buttons: bool,
    api_base: String,
    mode: BuildMode,
}

impl ChatSession {
    pub fn new(api_base: impl Into<String>, mode: BuildMode) -> Self {
        Self {
            messages: vec![ChatMessage::welcome()],
            current_smoothie_id: None,
            pending: BTreeSet::new(),
            next_request: 1,
            show_prompt_buttons: true,
            api_base: api_base.into(),
            mode,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn current_smoothie_id(&self) -> Option<&str> {
        self.current_smoothie_id.as_deref()
    }

    /// Typing indicator: on while any request is in flight
    pub fn is_typing(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending(&self) -> impl Iterator<Item = RequestId> + '_ {
        self.pending.iter().copied()
    }

    pub fn is_pending(&self, id: RequestId) -> bool {
        self.pending.contains(&id)
    }

    pub fn show_prompt_buttons(&self) -> bool {
        self.show_prompt_buttons
    }

    /// Suggested prompts, empty once the user has sent anything
    pub fn suggested_prompts(&self) -> &'static [&'static str] {
        if self.show_prompt_buttons {
            &SUGGESTED_PROMPTS
        } else {
            &[]
        }
    }

    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    /// Append the user's message and allocate a request.
    ///
    /// Returns `None` without touching anything when `text` is blank.
    pub fn submit(&mut self, text: &str) -> Option<OutgoingChat> {
        if text.trim().is_empty() {
            return None;
        }

        self.show_prompt_buttons = false;
        self.messages.push(ChatMessage::user(text));

        let id = RequestId(self.next_request);
        self.next_request += 1;
        self.pending.insert(id);

        tracing::debug!("Chat request {} with {} history turns", id, self.messages.len());

        Some(OutgoingChat {
            id,
            request: ChatRequest::from_messages(&self.messages),
        })
    }

    /// Record the outcome of a request.
    ///
    /// Returns the appended assistant message, or `None` when the request is
    /// no longer pending (it already timed out or completed).
    pub fn complete(
        &mut self,
        id: RequestId,
        outcome: Result<ChatReply, ChatFailure>,
    ) -> Option<&ChatMessage> {
        if !self.pending.remove(&id) {
            tracing::debug!("Dropping late reply for request {}", id);
            return None;
        }

        let message = match outcome {
            Ok(reply) => self.recommendation(reply),
            Err(failure) => self.failure_message(id, &failure),
        };
        self.messages.push(message);
        self.messages.last()
    }

    /// Deadline passed: append the timeout message if still pending
    pub fn expire(&mut self, id: RequestId) -> bool {
        if !self.pending.remove(&id) {
            return false;
        }
        let message = self.failure_message(id, &ChatFailure::Timeout);
        self.messages.push(message);
        true
    }

    /// Forget all in-flight requests without appending anything
    pub fn abandon_pending(&mut self) -> Vec<RequestId> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }

    fn recommendation(&mut self, reply: ChatReply) -> ChatMessage {
        let intent = reply.intent;

        let is_first_recommendation = !self
            .messages
            .iter()
            .any(|m| m.is_assistant() && m.smoothie_data.is_some());

        let is_new_smoothie = match reply.id.as_deref() {
            Some(id) => self.current_smoothie_id.as_deref() != Some(id),
            None => false,
        };
        let show_image = is_new_smoothie || intent.is_new_request();

        if let Some(id) = &reply.id {
            self.current_smoothie_id = Some(id.clone());
        }

        let image_path = if show_image {
            resolve_image_source(
                reply.id.as_deref(),
                reply.image_path.as_deref(),
                &self.api_base,
                self.mode,
            )
        } else {
            None
        };

        let smoothie_data = if intent.carries_recommendation() {
            reply.smoothie_data()
        } else {
            None
        };

        let mut message = ChatMessage::assistant(reply.content());
        message.image_path = image_path;
        message.show_image = show_image;
        message.smoothie_data = smoothie_data;
        message.is_first_recommendation = Some(is_first_recommendation);
        message.is_new_smoothie = Some(is_new_smoothie);
        message
    }

    fn failure_message(&self, id: RequestId, failure: &ChatFailure) -> ChatMessage {
        if self.mode.is_production() {
            tracing::warn!("Chat request {} failed: {}", id, failure);
        } else {
            tracing::error!("Chat request {} failed: {:?}", id, failure);
        }
        ChatMessage::assistant(failure.user_message(self.mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smoothie_core::{Intent, Role, SmoothieData};

    const API: &str = "http://localhost:8000";

    fn session() -> ChatSession {
        ChatSession::new(API, BuildMode::Development)
    }

    fn golden_reply() -> ChatReply {
        ChatReply {
            id: Some("golden_immunity_latte".into()),
            name: Some("Golden Immunity Latte".into()),
            price_usd: Some(6.5),
            explanation: Some("Great pick!".into()),
            intent: Intent::NewRequest,
            ..Default::default()
        }
    }

    #[test]
    fn test_starts_with_welcome() {
        let s = session();
        assert_eq!(s.messages().len(), 1);
        assert_eq!(s.messages()[0].role, Role::Assistant);
        assert!(s.messages()[0].content.starts_with("Welcome!"));
        assert!(!s.is_typing());
        assert_eq!(s.suggested_prompts().len(), 3);
    }

    #[test]
    fn test_blank_submit_is_noop() {
        let mut s = session();
        assert!(s.submit("   ").is_none());
        assert!(s.submit("").is_none());
        assert_eq!(s.messages().len(), 1);
        assert!(s.show_prompt_buttons());
        assert!(!s.is_typing());
    }

    #[test]
    fn test_submit_builds_history_with_new_message() {
        let mut s = session();
        let out = s.submit("I need a smoothie to boost my immune system").unwrap();
        assert_eq!(out.request.history.len(), 2);
        assert_eq!(out.request.history[1].role, Role::User);
        assert_eq!(
            out.request.history[1].content,
            "I need a smoothie to boost my immune system"
        );
        assert!(s.is_typing());
        assert!(!s.show_prompt_buttons());
        assert!(s.suggested_prompts().is_empty());
    }

    #[test]
    fn test_round_trip_appends_two_in_order() {
        let mut s = session();
        let before = s.messages().len();
        let out = s.submit("hello").unwrap();
        s.complete(out.id, Ok(golden_reply())).unwrap();

        assert_eq!(s.messages().len(), before + 2);
        assert_eq!(s.messages()[before].role, Role::User);
        assert_eq!(s.messages()[before + 1].role, Role::Assistant);
        assert!(!s.is_typing());
    }

    #[test]
    fn test_scenario_a_new_recommendation() {
        let mut s = session();
        let out = s.submit("I need a smoothie to boost my immune system").unwrap();
        let msg = s.complete(out.id, Ok(golden_reply())).unwrap().clone();

        assert_eq!(msg.content, "Great pick!");
        assert_eq!(
            msg.smoothie_data,
            Some(SmoothieData {
                id: "golden_immunity_latte".into(),
                name: "Golden Immunity Latte".into(),
                price_usd: 6.5,
            })
        );
        assert!(msg.show_image);
        assert_eq!(msg.image_path.as_deref(), Some("assets/GoldenImmunityLate.jpg"));
        assert_eq!(msg.is_first_recommendation, Some(true));
        assert_eq!(msg.is_new_smoothie, Some(true));
        assert_eq!(s.current_smoothie_id(), Some("golden_immunity_latte"));
    }

    #[test]
    fn test_scenario_b_follow_up_hides_image() {
        let mut s = session();
        let first = s.submit("I need a smoothie to boost my immune system").unwrap();
        s.complete(first.id, Ok(golden_reply()));

        let follow = s.submit("how much sugar does it have").unwrap();
        let reply = ChatReply {
            id: Some("golden_immunity_latte".into()),
            explanation: Some("About 12g.".into()),
            intent: Intent::FollowUp,
            ..Default::default()
        };
        let msg = s.complete(follow.id, Ok(reply)).unwrap();

        assert!(!msg.show_image);
        assert_eq!(msg.image_path, None);
        assert_eq!(msg.content, "About 12g.");
        assert_eq!(msg.is_new_smoothie, Some(false));
        assert_eq!(msg.is_first_recommendation, Some(false));
    }

    #[test]
    fn test_changed_id_shows_image() {
        let mut s = session();
        let a = s.submit("one").unwrap();
        s.complete(a.id, Ok(golden_reply()));

        let b = s.submit("something else").unwrap();
        let reply = ChatReply {
            id: Some("blue_moon".into()),
            intent: Intent::FollowUp,
            ..Default::default()
        };
        let msg = s.complete(b.id, Ok(reply)).unwrap();
        assert!(msg.show_image);
        assert_eq!(msg.image_path.as_deref(), Some("assets/BlueMoon.jpg"));
    }

    #[test]
    fn test_same_id_with_new_request_intent_shows_image() {
        let mut s = session();
        let a = s.submit("one").unwrap();
        s.complete(a.id, Ok(golden_reply()));
        let b = s.submit("again").unwrap();
        let msg = s.complete(b.id, Ok(golden_reply())).unwrap();
        assert!(msg.show_image);
        assert_eq!(msg.is_new_smoothie, Some(false));
    }

    #[test]
    fn test_unknown_intent_shows_image() {
        let mut s = session();
        let a = s.submit("one").unwrap();
        s.complete(a.id, Ok(golden_reply()));
        let b = s.submit("two").unwrap();
        let reply = ChatReply {
            id: Some("golden_immunity_latte".into()),
            ..Default::default()
        };
        let msg = s.complete(b.id, Ok(reply)).unwrap();
        assert!(msg.show_image);
        assert_eq!(msg.smoothie_data, None);
    }

    #[test]
    fn test_general_chat_has_no_price() {
        let mut s = session();
        let a = s.submit("hi there").unwrap();
        let reply = ChatReply {
            id: Some("blue_moon".into()),
            name: Some("Blue Moon".into()),
            price_usd: Some(7.0),
            intent: Intent::GeneralChat,
            ..Default::default()
        };
        let msg = s.complete(a.id, Ok(reply)).unwrap();
        assert_eq!(msg.smoothie_data, None);
    }

    #[test]
    fn test_missing_explanation_falls_back() {
        let mut s = session();
        let a = s.submit("?").unwrap();
        let msg = s.complete(a.id, Ok(ChatReply::default())).unwrap();
        assert_eq!(
            msg.content,
            "I'm not sure what to recommend. Could you provide more details?"
        );
    }

    #[test]
    fn test_scenario_d_abort_yields_single_timeout_message() {
        let mut s = session();
        let out = s.submit("slow").unwrap();
        let before = s.messages().len();

        let msg = s.complete(out.id, Err(ChatFailure::Timeout)).unwrap();
        assert!(msg.content.starts_with("Request timed out"));
        assert!(!s.is_typing());

        // deadline firing afterwards must not add a second message
        assert!(!s.expire(out.id));
        assert_eq!(s.messages().len(), before + 1);
    }

    #[test]
    fn test_late_reply_after_expiry_is_dropped() {
        let mut s = session();
        let out = s.submit("slow").unwrap();
        assert!(s.expire(out.id));
        let count = s.messages().len();

        assert!(s.complete(out.id, Ok(golden_reply())).is_none());
        assert_eq!(s.messages().len(), count);
        assert!(s.messages().last().unwrap().content.starts_with("Request timed out"));
    }

    #[test]
    fn test_concurrent_requests_keep_typing_until_all_done() {
        let mut s = session();
        let a = s.submit("first").unwrap();
        let b = s.submit("second").unwrap();
        assert_ne!(a.id, b.id);
        // second request carries both user messages
        assert_eq!(b.request.history.len(), 3);

        s.complete(b.id, Ok(golden_reply()));
        assert!(s.is_typing());
        s.complete(a.id, Err(ChatFailure::Network("refused".into())));
        assert!(!s.is_typing());
        assert!(s.messages().last().unwrap().content.starts_with("Network error"));
    }

    #[test]
    fn test_production_errors_are_generic() {
        let mut s = ChatSession::new(API, BuildMode::Production);
        let a = s.submit("x").unwrap();
        let msg = s
            .complete(a.id, Err(ChatFailure::Parse("expected value".into())))
            .unwrap();
        assert_eq!(
            msg.content,
            "Sorry, we couldn't process your request. Please try again later."
        );
    }

    #[test]
    fn test_development_errors_show_detail() {
        let mut s = session();
        let a = s.submit("x").unwrap();
        let msg = s
            .complete(a.id, Err(ChatFailure::http(500, None, "recommender crashed")))
            .unwrap();
        assert_eq!(msg.content, "⚠️ Error: recommender crashed");
    }

    #[test]
    fn test_production_image_path_for_unbundled_id() {
        let mut s = ChatSession::new(API, BuildMode::Production);
        let a = s.submit("x").unwrap();
        let reply = ChatReply {
            id: Some("seasonal_special".into()),
            image_path: Some("/static/menu/Seasonal.jpg".into()),
            intent: Intent::NewRequest,
            ..Default::default()
        };
        let msg = s.complete(a.id, Ok(reply)).unwrap();
        assert_eq!(msg.image_path.as_deref(), Some("/images/Seasonal.jpg"));
    }

    #[test]
    fn test_abandon_pending_clears_typing() {
        let mut s = session();
        let a = s.submit("x").unwrap();
        assert_eq!(s.abandon_pending(), vec![a.id]);
        assert!(!s.is_typing());
        assert!(s.complete(a.id, Ok(golden_reply())).is_none());
    }
}
