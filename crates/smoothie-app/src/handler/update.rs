//! Main update function - handles state transitions (TEA pattern)

use crate::message::Message;
use crate::state::AppState;
use crate::surface::Surface;
use crate::timer::Timer;

use super::{chat, keyboard, lifecycle, UpdateResult};

/// Process a message and update state.
///
/// `surface` is the only way handlers touch the page. Returns an optional
/// follow-up message and the actions for the engine to perform.
pub fn update(state: &mut AppState, message: Message, surface: &mut dyn Surface) -> UpdateResult {
    match message {
        // ─────────────────────────────────────────────────────────
        // Lifecycle
        // ─────────────────────────────────────────────────────────
        Message::Mount { metrics, is_ios } => {
            lifecycle::handle_mount(state, metrics, is_ios, surface)
        }
        Message::Unmount => lifecycle::handle_unmount(state),
        Message::Resized(metrics) => lifecycle::handle_resized(state, metrics),

        // ─────────────────────────────────────────────────────────
        // Keyboard
        // ─────────────────────────────────────────────────────────
        Message::ViewportChanged(sample) => {
            keyboard::handle_viewport_changed(state, sample, surface)
        }
        Message::InputFocused => keyboard::handle_input_focused(state, surface),
        Message::InputBlurred { related } => keyboard::handle_input_blurred(state, related),
        Message::KeyboardCycleComplete => keyboard::handle_cycle_complete(state),

        Message::TimerFired(timer) => handle_timer(state, timer, surface),

        // ─────────────────────────────────────────────────────────
        // Chat
        // ─────────────────────────────────────────────────────────
        Message::DraftChanged(text) => {
            state.draft = text;
            UpdateResult::none()
        }
        Message::Send => {
            let text = state.draft.clone();
            chat::handle_send(state, &text, surface)
        }
        Message::SendPrompt(prompt) => chat::handle_send(state, &prompt, surface),
        Message::ChatCompleted { request, outcome } => {
            chat::handle_chat_completed(state, request, outcome, surface)
        }
        Message::ImageLoaded => chat::handle_image_loaded(state, surface),
    }
}

fn handle_timer(state: &mut AppState, timer: Timer, surface: &mut dyn Surface) -> UpdateResult {
    tracing::trace!("Timer fired: {:?}", timer);
    match timer {
        Timer::CaptureInitialView => lifecycle::handle_capture_initial_view(state, surface),
        Timer::MountScrollPoll => lifecycle::handle_mount_scroll_poll(state, surface),
        Timer::FocusSettleCheck => keyboard::handle_settle_check(state, surface),
        Timer::MarkFullKeyboardShown => keyboard::handle_mark_full_keyboard_shown(state),
        Timer::ReleaseFirstAppearance => keyboard::handle_release_first_appearance(state, surface),
        Timer::BlurRestore => keyboard::handle_blur_restore(state, surface),
        Timer::RestoreFineTune => keyboard::handle_restore_fine_tune(state, surface),
        Timer::SendRestore => chat::handle_send_restore(state, surface),
        Timer::ImageLoadRestore => chat::handle_image_load_restore(state, surface),
        Timer::ChatDeadline(id) => chat::handle_chat_deadline(state, id, surface),
    }
}
