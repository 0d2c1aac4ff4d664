//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `keyboard`: Keyboard-compensation state machine
//! - `lifecycle`: Mount, unmount, resize and mount-time scroll polling
//! - `chat`: Send, completion, deadline and image-load handlers

pub(crate) mod chat;
pub(crate) mod keyboard;
pub(crate) mod lifecycle;
pub(crate) mod update;


use std::time::Duration;

use crate::message::Message;
use crate::session::{OutgoingChat, RequestId};
use crate::timer::Timer;

// Re-export main entry point
pub use update::update;

/// Actions that the engine should perform after update
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateAction {
    /// Schedule `timer`, replacing it if already pending
    ScheduleTimer { timer: Timer, after: Duration },

    CancelTimer(Timer),

    /// Drop every pending timer (unmount)
    CancelAllTimers,

    /// Issue a chat request. The deadline timer is scheduled separately.
    SendChat(OutgoingChat),

    /// Abort the network call of a request that is no longer wanted
    AbortChat(RequestId),
}

impl UpdateAction {
    pub fn schedule(timer: Timer, after: Duration) -> Self {
        UpdateAction::ScheduleTimer { timer, after }
    }

    pub fn schedule_ms(timer: Timer, ms: u64) -> Self {
        Self::schedule(timer, Duration::from_millis(ms))
    }
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Actions for the engine to perform, in order
    pub actions: Vec<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            actions: Vec::new(),
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            actions: vec![action],
        }
    }

    pub fn push(&mut self, action: UpdateAction) {
        self.actions.push(action);
    }

    pub fn with_action(mut self, action: UpdateAction) -> Self {
        self.actions.push(action);
        self
    }

    pub fn with_message(mut self, msg: Message) -> Self {
        self.message = Some(msg);
        self
    }

    /// Absorb `other`'s actions; its follow-up message wins if set
    pub fn merge(&mut self, other: UpdateResult) {
        self.actions.extend(other.actions);
        if other.message.is_some() {
            self.message = other.message;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.message.is_none() && self.actions.is_empty()
    }
}
