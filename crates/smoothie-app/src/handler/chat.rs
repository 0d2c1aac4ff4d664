//! Chat handlers: send, completion, deadline and image loads

use smoothie_core::{ChatFailure, ChatReply};

use crate::scroll::scroll_to_top;
use crate::session::RequestId;
use crate::state::AppState;
use crate::surface::{Anchor, Surface};
use crate::timer::Timer;

use super::keyboard::{begin_blur, handle_blur_restore, restore_view};
use super::{UpdateAction, UpdateResult};

/// Submit `text`. Blank text is ignored and leaves the draft alone.
pub fn handle_send(state: &mut AppState, text: &str, surface: &mut dyn Surface) -> UpdateResult {
    let Some(outgoing) = state.session.submit(text) else {
        return UpdateResult::none();
    };
    state.draft.clear();

    let id = outgoing.id;
    let mut result = UpdateResult::action(UpdateAction::SendChat(outgoing)).with_action(
        UpdateAction::schedule(Timer::ChatDeadline(id), state.settings.api.timeout()),
    );

    surface.scroll_to_bottom(Anchor::ChatMessages);

    if state.is_mobile() {
        surface.blur(Anchor::ChatInput);
        result.push(UpdateAction::schedule_ms(
            Timer::SendRestore,
            state.settings.keyboard.send_restore_delay_ms,
        ));
    }
    result
}

/// Put the page back once the keyboard dismissed by a send has gone
pub fn handle_send_restore(state: &mut AppState, surface: &mut dyn Surface) -> UpdateResult {
    if state.keyboard.phase.is_focused() {
        if surface.has_focus(Anchor::ChatInput) {
            return UpdateResult::none();
        }
        // the blur went to the send button, so no blur transition happened
        tracing::debug!("Input lost focus through send, running blur restore");
        begin_blur(state);
        return handle_blur_restore(state, surface);
    }

    if state.keyboard.phase.is_idle_like() && !state.scroll_blocked() {
        return restore_view(state, surface);
    }
    UpdateResult::none()
}

pub fn handle_chat_completed(
    state: &mut AppState,
    request: RequestId,
    outcome: Result<ChatReply, ChatFailure>,
    surface: &mut dyn Surface,
) -> UpdateResult {
    if state.session.complete(request, outcome).is_none() {
        return UpdateResult::none();
    }
    surface.scroll_to_bottom(Anchor::ChatMessages);
    UpdateResult::action(UpdateAction::CancelTimer(Timer::ChatDeadline(request)))
}

pub fn handle_chat_deadline(
    state: &mut AppState,
    request: RequestId,
    surface: &mut dyn Surface,
) -> UpdateResult {
    if !state.session.expire(request) {
        return UpdateResult::none();
    }
    tracing::warn!(
        "Chat request {} timed out after {:?}",
        request,
        state.settings.api.timeout()
    );
    surface.scroll_to_bottom(Anchor::ChatMessages);
    UpdateResult::action(UpdateAction::AbortChat(request))
}

pub fn handle_image_loaded(state: &mut AppState, surface: &mut dyn Surface) -> UpdateResult {
    surface.scroll_to_bottom(Anchor::ChatMessages);
    if !state.is_mobile() {
        return UpdateResult::none();
    }

    if state.initial_view.is_captured() {
        return UpdateResult::action(UpdateAction::schedule_ms(
            Timer::ImageLoadRestore,
            state.settings.keyboard.image_restore_delay_ms,
        ));
    }
    if !state.scroll_blocked() {
        scroll_to_top(surface);
    }
    UpdateResult::none()
}

pub fn handle_image_load_restore(state: &mut AppState, surface: &mut dyn Surface) -> UpdateResult {
    if state.scroll_blocked() {
        return UpdateResult::none();
    }
    restore_view(state, surface)
}
