//! smoothie-app - Widget state and orchestration for the smoothie assistant
//!
//! This crate implements the TEA (The Elm Architecture) pattern for the chat
//! widget: the keyboard-compensation state machine, the chat session, the
//! Engine that turns handler actions into timers and requests, configuration
//! loading and the chat API transport. Rendering is behind the [`Surface`]
//! trait so the browser shell and the native runner share all of it.

pub mod api;
pub mod assets;
pub mod config;
pub mod engine;
pub mod engine_event;
pub mod handler;
pub mod initial_view;
pub mod keyboard;
pub mod mailbox;
pub mod message;
#[cfg(not(target_arch = "wasm32"))]
pub mod runtime;
pub mod scroll;
pub mod session;
pub mod state;
pub mod surface;
pub mod test_utils;
pub mod timer;

// Re-export primary types
pub use api::{ChatClient, ChatTransport, LocalChatTransport};
pub use engine::Engine;
pub use engine_event::{EngineEvent, PhaseTransition};
pub use handler::{UpdateAction, UpdateResult};
pub use keyboard::{BlurTarget, KeyboardPhase, KeyboardState};
pub use mailbox::Mailbox;
pub use message::Message;
#[cfg(not(target_arch = "wasm32"))]
pub use runtime::{Runtime, TokioClock};
pub use session::{ChatSession, OutgoingChat, RequestId};
pub use state::AppState;
pub use surface::{Anchor, HeadlessSurface, ScrollBlock, Surface};
pub use timer::{Clock, ManualClock, Timer, TimerQueue};
