//! Keyboard-compensation handlers
//!
//! Drives [`KeyboardState`] through `Idle → FocusPending → FocusSettled →
//! BlurPending → Restored → Idle`. Focus, blur and viewport events are
//! ignored on desktop.
//!
//! [`KeyboardState`]: crate::keyboard::KeyboardState

use smoothie_core::ViewportSample;

use crate::keyboard::{BlurTarget, KeyboardPhase};
use crate::message::Message;
use crate::scroll::scroll_to_top;
use crate::state::AppState;
use crate::surface::{Anchor, ScrollBlock, Surface};
use crate::timer::Timer;

use super::{UpdateAction, UpdateResult};

/// Message pane height with the keyboard hidden, without the `calc()`
pub const PANE_BASE_HEIGHT: &str = "100dvh - 4rem - 80px";

pub(crate) fn pane_height(keyboard_height: f64) -> String {
    if keyboard_height > 0.0 {
        format!("calc({PANE_BASE_HEIGHT} - {keyboard_height:.0}px)")
    } else {
        format!("calc({PANE_BASE_HEIGHT})")
    }
}

fn px(value: f64) -> String {
    format!("{value:.0}px")
}

/// Shrink the message pane by the keyboard height
fn apply_pane(surface: &mut dyn Surface, keyboard_height: f64) {
    if !surface.set_style(Anchor::ChatMessages, "height", Some(&pane_height(keyboard_height))) {
        tracing::trace!("Chat messages pane not mounted, skipping height");
        return;
    }
    surface.set_style(Anchor::ChatMessages, "padding-bottom", Some(&px(keyboard_height)));
}

/// Pane back to its idle height, keyboard paddings removed
pub(crate) fn reset_pane(surface: &mut dyn Surface) {
    surface.set_style(Anchor::ChatMessages, "height", Some(&pane_height(0.0)));
    surface.set_style(Anchor::ChatMessages, "padding-bottom", None);
    surface.set_style(Anchor::MainContent, "padding-bottom", None);
}

// ─────────────────────────────────────────────────────────
// Focus
// ─────────────────────────────────────────────────────────

pub fn handle_input_focused(state: &mut AppState, surface: &mut dyn Surface) -> UpdateResult {
    if !state.is_mobile() || state.keyboard.phase.is_focused() {
        return UpdateResult::none();
    }

    let sample = surface.viewport();
    let keyboard = &mut state.keyboard;
    keyboard.baseline_inner_height = sample.inner_height;
    keyboard.record(&sample);
    keyboard.settle_attempts = 0;
    keyboard.restore_attempts = 0;
    keyboard.phase = KeyboardPhase::FocusPending;

    let delay = state.settings.keyboard.focus_settle_delay(state.is_ios);
    tracing::debug!("Input focused, settle check in {:?}", delay);

    UpdateResult::action(UpdateAction::CancelTimer(Timer::BlurRestore))
        .with_action(UpdateAction::CancelTimer(Timer::RestoreFineTune))
        .with_action(UpdateAction::schedule(Timer::FocusSettleCheck, delay))
}

pub fn handle_viewport_changed(
    state: &mut AppState,
    sample: ViewportSample,
    surface: &mut dyn Surface,
) -> UpdateResult {
    if !state.is_mobile() {
        return UpdateResult::none();
    }

    let skip = std::mem::take(&mut state.keyboard.skip_next_resize);
    let settings = &state.settings.keyboard;
    let keyboard = &mut state.keyboard;

    match keyboard.phase {
        KeyboardPhase::FocusPending => {
            if keyboard.keyboard_visible(&sample, settings) && keyboard.is_stable(&sample, settings) {
                let height = keyboard.measure(&sample);
                keyboard.record(&sample);
                return settle(state, height, surface);
            }
        }
        KeyboardPhase::FocusSettled => {
            if !keyboard.keyboard_visible(&sample, settings) {
                if keyboard.keyboard_height > 0.0 {
                    tracing::debug!("Keyboard hidden while focused, resetting pane");
                    reset_pane(surface);
                    keyboard.keyboard_height = 0.0;
                }
            } else {
                let height = keyboard.measure(&sample);
                if (height - keyboard.keyboard_height).abs() > settings.settle_threshold_px {
                    tracing::debug!(
                        "Keyboard height {:.0} -> {:.0}",
                        keyboard.keyboard_height,
                        height
                    );
                    apply_pane(surface, height);
                    keyboard.keyboard_height = height;
                }
            }
        }
        KeyboardPhase::Idle | KeyboardPhase::Restored => {
            if skip {
                tracing::trace!("Ignoring first viewport change after mount");
            } else if keyboard.is_dismissal(&sample, settings) {
                if keyboard.scroll_blocked() {
                    tracing::trace!("Viewport grew but scrolling is blocked");
                } else {
                    scroll_to_top(surface);
                }
            }
        }
        KeyboardPhase::BlurPending => {}
    }

    keyboard.record(&sample);
    UpdateResult::none()
}

pub fn handle_settle_check(state: &mut AppState, surface: &mut dyn Surface) -> UpdateResult {
    if state.keyboard.phase != KeyboardPhase::FocusPending {
        return UpdateResult::none();
    }

    let sample = surface.viewport();
    let settings = &state.settings.keyboard;
    let keyboard = &mut state.keyboard;

    if keyboard.keyboard_visible(&sample, settings) {
        let height = keyboard.measure(&sample);
        keyboard.record(&sample);
        return settle(state, height, surface);
    }

    keyboard.settle_attempts += 1;
    if keyboard.settle_attempts >= settings.settle_max_attempts {
        tracing::debug!(
            "Keyboard never appeared after {} checks, settling without compensation",
            keyboard.settle_attempts
        );
        return settle(state, 0.0, surface);
    }

    UpdateResult::action(UpdateAction::schedule_ms(
        Timer::FocusSettleCheck,
        settings.settle_poll_ms,
    ))
}

/// Enter `FocusSettled` with `keyboard_height` px of compensation
fn settle(state: &mut AppState, keyboard_height: f64, surface: &mut dyn Surface) -> UpdateResult {
    let settings = &state.settings.keyboard;
    let keyboard = &mut state.keyboard;

    keyboard.phase = KeyboardPhase::FocusSettled;
    keyboard.keyboard_height = keyboard_height;
    keyboard.settle_attempts = 0;

    let mut result = UpdateResult::action(UpdateAction::CancelTimer(Timer::FocusSettleCheck));

    if keyboard_height > 0.0 {
        apply_pane(surface, keyboard_height);

        if keyboard.is_first_keyboard_appearance && !keyboard.had_full_keyboard_shown {
            keyboard.is_first_keyboard_appearance = false;
            keyboard.first_appearance_blocking = true;

            let inner = surface.viewport().inner_height;
            let padding = keyboard_height.max(inner * settings.first_appearance_padding_ratio);
            tracing::debug!(
                "First keyboard appearance: {:.0}px keyboard, {:.0}px padding",
                keyboard_height,
                padding
            );
            surface.set_style(Anchor::MainContent, "padding-bottom", Some(&px(padding)));
            surface.force_reflow(Anchor::MainContent);

            result.push(UpdateAction::schedule_ms(
                Timer::MarkFullKeyboardShown,
                settings.mark_full_shown_ms,
            ));
        }
    }

    surface.scroll_into_view(Anchor::ChatInput, ScrollBlock::Center);
    surface.scroll_to_bottom(Anchor::ChatMessages);
    result
}

pub fn handle_mark_full_keyboard_shown(state: &mut AppState) -> UpdateResult {
    state.keyboard.had_full_keyboard_shown = true;
    UpdateResult::action(UpdateAction::schedule_ms(
        Timer::ReleaseFirstAppearance,
        state.settings.keyboard.release_first_appearance_ms,
    ))
}

pub fn handle_release_first_appearance(
    state: &mut AppState,
    surface: &mut dyn Surface,
) -> UpdateResult {
    state.keyboard.first_appearance_blocking = false;
    surface.set_style(Anchor::MainContent, "padding-bottom", None);
    surface.force_reflow(Anchor::MainContent);
    tracing::debug!("First keyboard appearance released");
    UpdateResult::none()
}

// ─────────────────────────────────────────────────────────
// Blur
// ─────────────────────────────────────────────────────────

pub fn handle_input_blurred(state: &mut AppState, related: BlurTarget) -> UpdateResult {
    if !state.is_mobile() || !state.keyboard.phase.is_focused() {
        return UpdateResult::none();
    }
    if related == BlurTarget::SendButton {
        tracing::debug!("Input blurred towards the send button, keeping layout");
        return UpdateResult::none();
    }

    begin_blur(state);
    UpdateResult::action(UpdateAction::CancelTimer(Timer::FocusSettleCheck)).with_action(
        UpdateAction::schedule_ms(Timer::BlurRestore, state.settings.keyboard.blur_restore_delay_ms),
    )
}

pub(crate) fn begin_blur(state: &mut AppState) {
    state.keyboard.phase = KeyboardPhase::BlurPending;
    state.keyboard.restore_attempts = 0;
}

/// Restore check. The first run resets the layout; later runs only
/// re-check whether the page came to rest.
pub fn handle_blur_restore(state: &mut AppState, surface: &mut dyn Surface) -> UpdateResult {
    if state.keyboard.phase != KeyboardPhase::BlurPending {
        return UpdateResult::none();
    }

    if state.keyboard.restore_attempts == 0 {
        reset_pane(surface);
        state.keyboard.keyboard_height = 0.0;

        if !state.keyboard.had_initial_focus {
            state.keyboard.had_initial_focus = true;
            tracing::debug!("First focus/blur cycle complete, not scrolling");
            return finish_restore(state);
        }
    }

    if state.scroll_blocked() {
        tracing::debug!("Restore skipped during first keyboard appearance");
        return finish_restore(state);
    }

    let mut result = restore_view(state, surface);
    if view_at_rest(state, surface) {
        result.merge(finish_restore(state));
        return result;
    }

    state.keyboard.restore_attempts += 1;
    let max_attempts = state.settings.keyboard.restore_attempts(state.is_ios);
    if state.keyboard.restore_attempts >= max_attempts {
        tracing::debug!("Page not at rest after {} restore attempts", max_attempts);
        result.merge(finish_restore(state));
        return result;
    }

    result.push(UpdateAction::schedule_ms(
        Timer::BlurRestore,
        state.settings.keyboard.restore_poll_ms,
    ));
    result
}

fn finish_restore(state: &mut AppState) -> UpdateResult {
    state.keyboard.phase = KeyboardPhase::Restored;
    state.keyboard.restore_attempts = 0;
    UpdateResult::message(Message::KeyboardCycleComplete)
}

pub fn handle_restore_fine_tune(state: &mut AppState, surface: &mut dyn Surface) -> UpdateResult {
    let blocked = state.scroll_blocked();
    let outcome = state.initial_view.restore(surface, blocked);
    tracing::trace!("Restore fine-tune: {:?}", outcome);
    UpdateResult::none()
}

pub fn handle_cycle_complete(state: &mut AppState) -> UpdateResult {
    if state.keyboard.phase == KeyboardPhase::Restored {
        state.keyboard.phase = KeyboardPhase::Idle;
    }
    UpdateResult::none()
}

// ─────────────────────────────────────────────────────────
// View restore helpers
// ─────────────────────────────────────────────────────────

/// Return the page to the captured initial view, or to the top when
/// nothing was captured. A scroll schedules one fine-tune retry.
pub(crate) fn restore_view(state: &AppState, surface: &mut dyn Surface) -> UpdateResult {
    use crate::initial_view::RestoreOutcome;

    let blocked = state.scroll_blocked();
    if !state.initial_view.is_captured() {
        if !blocked {
            scroll_to_top(surface);
        }
        return UpdateResult::none();
    }

    match state.initial_view.restore(surface, blocked) {
        RestoreOutcome::Scrolled(y) => {
            tracing::trace!("Restored initial view at {:.0}", y);
            UpdateResult::action(UpdateAction::schedule_ms(
                Timer::RestoreFineTune,
                state.settings.keyboard.restore_fine_tune_ms,
            ))
        }
        RestoreOutcome::NotCaptured => {
            // header gone since capture
            if !blocked {
                scroll_to_top(surface);
            }
            UpdateResult::none()
        }
        RestoreOutcome::Blocked | RestoreOutcome::AlreadyAtRest => UpdateResult::none(),
    }
}

fn view_at_rest(state: &AppState, surface: &dyn Surface) -> bool {
    if state.initial_view.is_captured() {
        state.initial_view.is_at_rest(surface)
    } else {
        surface.scroll_y() <= state.settings.keyboard.at_rest_tolerance_px
    }
}
