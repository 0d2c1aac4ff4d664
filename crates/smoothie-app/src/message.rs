//! Message types for the application (TEA pattern)

use smoothie_core::{ChatFailure, ChatReply, ViewportMetrics, ViewportSample};

use crate::keyboard::BlurTarget;
use crate::session::RequestId;
use crate::timer::Timer;

/// All possible messages/actions in the application
#[derive(Debug, Clone)]
pub enum Message {
    // ─────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────
    /// Widget attached to the page
    Mount {
        metrics: ViewportMetrics,
        is_ios: bool,
    },
    /// Widget detached; every timer and request is dropped
    Unmount,
    /// Window resized: reclassify the device
    Resized(ViewportMetrics),

    // ─────────────────────────────────────────────────────────
    // Keyboard compensation
    // ─────────────────────────────────────────────────────────
    /// Visual viewport (or window, without the API) changed size
    ViewportChanged(ViewportSample),
    InputFocused,
    InputBlurred {
        related: BlurTarget,
    },
    /// A first focus/blur cycle ended in `Restored`; return to idle
    KeyboardCycleComplete,

    /// A scheduled timer came due
    TimerFired(Timer),

    // ─────────────────────────────────────────────────────────
    // Chat
    // ─────────────────────────────────────────────────────────
    DraftChanged(String),
    /// Submit the current draft
    Send,
    /// Submit a suggested prompt
    SendPrompt(String),
    ChatCompleted {
        request: RequestId,
        outcome: Result<ChatReply, ChatFailure>,
    },
    /// A recommendation image finished loading
    ImageLoaded,
}
