//! Headless mode - the chat widget on a terminal
//!
//! Drives the same Engine the browser shell uses, with a [`HeadlessSurface`]
//! standing in for the page. Output is either human-readable text or NDJSON
//! (one event per line, tagged by an "event" field) for scripting.
//!
//! # Example Output
//!
//! ```json
//! {"event":"mounted","layout":"desktop","api_base":"http://localhost:8000","timestamp":1704700001000}
//! {"event":"message","index":1,"role":"user","content":"Something green","timestamp":1704700002000}
//! {"event":"typing","typing":true,"timestamp":1704700002001}
//! ```
//!
//! [`HeadlessSurface`]: smoothie_app::HeadlessSurface

pub mod runner;

use std::io::{self, Write};

use chrono::Utc;
use serde::Serialize;
use smoothie_app::{EngineEvent, PhaseTransition};
use smoothie_core::{ChatMessage, DeviceClass, Role};
use tracing::error;

/// Events emitted in headless mode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    /// Widget mounted and ready for input
    Mounted {
        layout: &'static str,
        api_base: String,
        timestamp: i64,
    },

    /// Suggested prompts, numbered from 1 on the terminal
    Prompts {
        prompts: Vec<&'static str>,
        timestamp: i64,
    },

    /// A message entered the conversation
    Message {
        index: usize,
        role: Role,
        content: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        image: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        price: Option<String>,
        timestamp: i64,
    },

    /// Typing indicator toggled
    Typing { typing: bool, timestamp: i64 },

    PromptsHidden { timestamp: i64 },

    KeyboardPhase {
        #[serde(flatten)]
        transition: PhaseTransition,
        timestamp: i64,
    },

    DeviceChanged { layout: &'static str, timestamp: i64 },

    /// Error occurred
    Error {
        message: String,
        fatal: bool,
        timestamp: i64,
    },
}

impl HeadlessEvent {
    /// Emit this event to stdout as JSON
    pub fn emit(&self) {
        let mut stdout = io::stdout().lock();
        if let Err(e) = self.write_json(&mut stdout) {
            error!("Failed to write headless event to stdout: {}", e);
        }
    }

    /// Write one NDJSON line and flush
    pub fn write_json<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let json = serde_json::to_string(self).map_err(io::Error::other)?;
        writeln!(out, "{}", json)?;
        out.flush()
    }

    /// Get current timestamp in milliseconds
    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    // ─────────────────────────────────────────────────────────
    // Convenience constructors
    // ─────────────────────────────────────────────────────────

    pub fn mounted(class: DeviceClass, api_base: &str) -> Self {
        Self::Mounted {
            layout: layout_name(class),
            api_base: api_base.to_string(),
            timestamp: Self::now(),
        }
    }

    pub fn prompts(prompts: &[&'static str]) -> Self {
        Self::Prompts {
            prompts: prompts.to_vec(),
            timestamp: Self::now(),
        }
    }

    pub fn message(index: usize, message: &ChatMessage) -> Self {
        Self::Message {
            index,
            role: message.role,
            content: message.content.clone(),
            image: message
                .show_image
                .then(|| message.image_path.clone())
                .flatten(),
            price: message.price_label(),
            timestamp: Self::now(),
        }
    }

    pub fn error(message: String, fatal: bool) -> Self {
        Self::Error {
            message,
            fatal,
            timestamp: Self::now(),
        }
    }

    /// Translate an engine event
    pub fn from_engine(event: &EngineEvent) -> Self {
        let timestamp = Self::now();
        match event {
            EngineEvent::MessageAppended { index, message } => Self::message(*index, message),
            EngineEvent::TypingChanged { typing } => Self::Typing {
                typing: *typing,
                timestamp,
            },
            EngineEvent::PromptsHidden => Self::PromptsHidden { timestamp },
            EngineEvent::KeyboardPhaseChanged { old, new } => Self::KeyboardPhase {
                transition: PhaseTransition::new(*old, *new),
                timestamp,
            },
            EngineEvent::DeviceChanged { class } => Self::DeviceChanged {
                layout: layout_name(*class),
                timestamp,
            },
        }
    }
}

/// Layout table name for a device class
pub fn layout_name(class: DeviceClass) -> &'static str {
    match class {
        DeviceClass::Desktop => "desktop",
        DeviceClass::Mobile => "mobile",
        DeviceClass::VerySmallMobile => "very-small-mobile",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smoothie_app::KeyboardPhase;
    use smoothie_core::SmoothieData;

    fn to_value(event: &HeadlessEvent) -> serde_json::Value {
        let mut buf = Vec::new();
        event.write_json(&mut buf).expect("write failed");
        assert!(buf.ends_with(b"\n"));
        serde_json::from_slice(&buf).expect("invalid JSON")
    }

    #[test]
    fn test_mounted_serialization() {
        let value = to_value(&HeadlessEvent::mounted(
            DeviceClass::Desktop,
            "http://localhost:8000",
        ));
        assert_eq!(value["event"], "mounted");
        assert_eq!(value["layout"], "desktop");
        assert_eq!(value["api_base"], "http://localhost:8000");
        assert!(value["timestamp"].is_number());
    }

    #[test]
    fn test_user_message_serialization() {
        let value = to_value(&HeadlessEvent::message(1, &ChatMessage::user("Something green")));
        assert_eq!(value["event"], "message");
        assert_eq!(value["index"], 1);
        assert_eq!(value["role"], "user");
        assert_eq!(value["content"], "Something green");
        assert!(value.get("image").is_none());
        assert!(value.get("price").is_none());
    }

    #[test]
    fn test_recommendation_carries_image_and_price() {
        let mut message = ChatMessage::assistant("Try Mango Tango.");
        message.image_path = Some("/images/MangoTango.jpg".into());
        message.show_image = true;
        message.is_new_smoothie = Some(true);
        message.smoothie_data = Some(SmoothieData {
            id: "mango_tango".into(),
            name: "Mango Tango".into(),
            price_usd: 6.5,
        });

        let value = to_value(&HeadlessEvent::message(2, &message));
        assert_eq!(value["image"], "/images/MangoTango.jpg");
        assert_eq!(value["price"], "($6.50)");
    }

    #[test]
    fn test_hidden_image_is_omitted() {
        let mut message = ChatMessage::assistant("Same one again.");
        message.image_path = Some("/images/MangoTango.jpg".into());
        message.show_image = false;

        let value = to_value(&HeadlessEvent::message(3, &message));
        assert!(value.get("image").is_none());
    }

    #[test]
    fn test_keyboard_phase_flattens_transition() {
        let value = to_value(&HeadlessEvent::from_engine(
            &EngineEvent::KeyboardPhaseChanged {
                old: KeyboardPhase::Idle,
                new: KeyboardPhase::FocusPending,
            },
        ));
        assert_eq!(value["event"], "keyboard_phase");
        assert_eq!(value["from"], "idle");
        assert_eq!(value["to"], "focus_pending");
    }

    #[test]
    fn test_device_changed_uses_layout_name() {
        let value = to_value(&HeadlessEvent::from_engine(&EngineEvent::DeviceChanged {
            class: DeviceClass::VerySmallMobile,
        }));
        assert_eq!(value["event"], "device_changed");
        assert_eq!(value["layout"], "very-small-mobile");
    }

    #[test]
    fn test_error_serialization() {
        let value = to_value(&HeadlessEvent::error("Connection failed".into(), true));
        assert_eq!(value["event"], "error");
        assert_eq!(value["message"], "Connection failed");
        assert_eq!(value["fatal"], true);
    }
}
