//! Domain events emitted by the Engine for external consumers
//!
//! Events are derived by diffing the state before and after each dispatch,
//! so a consumer (the headless runner, the browser shell) sees each change
//! exactly once, in order.

use serde::Serialize;
use smoothie_core::{ChatMessage, DeviceClass};

use crate::keyboard::KeyboardPhase;

#[derive(Debug, Clone)]
pub enum EngineEvent {
    // ─────────────────────────────────────────────────────────
    // Chat
    // ─────────────────────────────────────────────────────────
    /// A message was appended at `index`
    MessageAppended { index: usize, message: ChatMessage },

    /// The typing indicator turned on or off
    TypingChanged { typing: bool },

    /// Suggested prompts were hidden after the first send
    PromptsHidden,

    // ─────────────────────────────────────────────────────────
    // Layout
    // ─────────────────────────────────────────────────────────
    KeyboardPhaseChanged {
        old: KeyboardPhase,
        new: KeyboardPhase,
    },

    DeviceChanged { class: DeviceClass },
}

impl EngineEvent {
    /// Short label for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            EngineEvent::MessageAppended { .. } => "message_appended",
            EngineEvent::TypingChanged { .. } => "typing_changed",
            EngineEvent::PromptsHidden => "prompts_hidden",
            EngineEvent::KeyboardPhaseChanged { .. } => "keyboard_phase_changed",
            EngineEvent::DeviceChanged { .. } => "device_changed",
        }
    }
}

/// Serializable summary of a phase change, for NDJSON consumers
#[derive(Debug, Clone, Serialize)]
pub struct PhaseTransition {
    pub from: &'static str,
    pub to: &'static str,
}

impl PhaseTransition {
    pub fn new(old: KeyboardPhase, new: KeyboardPhase) -> Self {
        Self {
            from: old.name(),
            to: new.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_label() {
        assert_eq!(EngineEvent::PromptsHidden.event_type(), "prompts_hidden");
        assert_eq!(
            EngineEvent::TypingChanged { typing: true }.event_type(),
            "typing_changed"
        );
    }

    #[test]
    fn test_phase_transition_names() {
        let t = PhaseTransition::new(KeyboardPhase::Idle, KeyboardPhase::FocusPending);
        assert_eq!(t.from, "idle");
        assert_eq!(t.to, "focus_pending");
    }
}
