//! Mount/unmount and resize handlers

use smoothie_core::ViewportMetrics;

use crate::initial_view::InitialView;
use crate::keyboard::KeyboardState;
use crate::scroll::scroll_to_top;
use crate::state::AppState;
use crate::surface::Surface;
use crate::timer::Timer;

use super::{UpdateAction, UpdateResult};

/// Attach the widget: fresh keyboard state, delayed initial-view capture and
/// on mobile a forced scroll to the top plus a short polling safety net.
pub fn handle_mount(
    state: &mut AppState,
    metrics: ViewportMetrics,
    is_ios: bool,
    surface: &mut dyn Surface,
) -> UpdateResult {
    state.reclassify(metrics);
    state.is_ios = is_ios;
    state.mounted = true;
    state.keyboard = KeyboardState::new();
    state.initial_view = InitialView::new(state.settings.keyboard.at_rest_tolerance_px);

    let settings = &state.settings.keyboard;
    tracing::info!(
        "Mounted: {:?} {}x{}{}",
        state.device.class(),
        state.device.window_width,
        state.device.window_height,
        if is_ios { " (iOS)" } else { "" }
    );

    let mut result = UpdateResult::action(UpdateAction::schedule_ms(
        Timer::CaptureInitialView,
        settings.capture_delay_ms,
    ));

    if state.is_mobile() {
        scroll_to_top(surface);
        state.mount_poll_remaining = settings.mount_poll_count();
        if state.mount_poll_remaining > 0 {
            result.push(UpdateAction::schedule_ms(
                Timer::MountScrollPoll,
                settings.mount_poll_interval_ms,
            ));
        }
    } else {
        state.mount_poll_remaining = 0;
    }

    result
}

/// Detach: cancel every timer, abort in-flight requests, drop keyboard state
pub fn handle_unmount(state: &mut AppState) -> UpdateResult {
    state.mounted = false;
    state.keyboard = KeyboardState::new();
    state.mount_poll_remaining = 0;

    let mut result = UpdateResult::action(UpdateAction::CancelAllTimers);
    for id in state.session.abandon_pending() {
        result.push(UpdateAction::AbortChat(id));
    }
    tracing::info!("Unmounted, {} request(s) aborted", result.actions.len() - 1);
    result
}

pub fn handle_resized(state: &mut AppState, metrics: ViewportMetrics) -> UpdateResult {
    state.reclassify(metrics);
    UpdateResult::none()
}

pub fn handle_capture_initial_view(state: &mut AppState, surface: &mut dyn Surface) -> UpdateResult {
    if state.mounted {
        state.initial_view.capture(surface);
    }
    UpdateResult::none()
}

pub fn handle_mount_scroll_poll(state: &mut AppState, surface: &mut dyn Surface) -> UpdateResult {
    if !state.mounted || state.mount_poll_remaining == 0 {
        return UpdateResult::none();
    }
    state.mount_poll_remaining -= 1;

    if surface.scroll_y() > 0.0 && !state.scroll_blocked() {
        tracing::trace!("Mount poll: page at {:.0}, forcing top", surface.scroll_y());
        scroll_to_top(surface);
    }

    if state.mount_poll_remaining == 0 {
        return UpdateResult::none();
    }
    UpdateResult::action(UpdateAction::schedule_ms(
        Timer::MountScrollPoll,
        state.settings.keyboard.mount_poll_interval_ms,
    ))
}
