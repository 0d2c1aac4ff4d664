//! Engine - shared orchestration for the browser shell and native runners
//!
//! The Engine owns the TEA state, the rendering surface, the clock and the
//! timer queue. Frontends feed it messages and due timers; it hands back the
//! chat requests to send, the requests to abort and the domain events to
//! render. It performs no I/O of its own, so the same code runs in wasm and
//! under a paused tokio clock.

use std::time::Duration;

use smoothie_core::{DeviceClass, ViewportMetrics};

use crate::config::Settings;
use crate::engine_event::EngineEvent;
use crate::handler::{self, UpdateAction};
use crate::keyboard::KeyboardPhase;
use crate::message::Message;
use crate::session::{OutgoingChat, RequestId};
use crate::state::AppState;
use crate::surface::Surface;
use crate::timer::{Clock, ManualClock, Timer, TimerQueue};

/// Follow-up chains longer than this indicate a handler loop
const MAX_FOLLOW_UPS: usize = 32;

/// Lightweight snapshot of state for change detection.
///
/// Captured before message processing, compared after to detect
/// what changed and emit appropriate EngineEvents.
#[derive(Debug, Clone)]
struct StateSnapshot {
    message_count: usize,
    typing: bool,
    prompts_visible: bool,
    phase: KeyboardPhase,
    device: DeviceClass,
}

impl StateSnapshot {
    fn capture(state: &AppState) -> Self {
        Self {
            message_count: state.session.messages().len(),
            typing: state.session.is_typing(),
            prompts_visible: state.session.show_prompt_buttons(),
            phase: state.keyboard.phase,
            device: state.device.class(),
        }
    }
}

/// Orchestration engine for one mounted widget
pub struct Engine<S: Surface, C: Clock> {
    /// TEA application state (the Model)
    pub state: AppState,

    surface: S,

    clock: C,

    timers: TimerQueue,

    /// Requests waiting for the frontend to put them on the wire
    outbox: Vec<OutgoingChat>,

    /// In-flight requests the frontend should cancel
    aborted: Vec<RequestId>,

    events: Vec<EngineEvent>,
}

impl<S: Surface, C: Clock> Engine<S, C> {
    pub fn new(settings: Settings, surface: S, clock: C) -> Self {
        Self {
            state: AppState::new(settings),
            surface,
            clock,
            timers: TimerQueue::new(),
            outbox: Vec::new(),
            aborted: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    /// Attach to the page
    pub fn mount(&mut self, metrics: ViewportMetrics, is_ios: bool) {
        self.dispatch(Message::Mount { metrics, is_ios });
    }

    /// Process a message and its follow-ups through the TEA update cycle.
    ///
    /// Emits EngineEvents based on state changes detected by comparing
    /// before/after snapshots.
    pub fn dispatch(&mut self, msg: Message) {
        let pre = StateSnapshot::capture(&self.state);

        let mut next = Some(msg);
        let mut steps = 0;
        while let Some(msg) = next.take() {
            steps += 1;
            if steps > MAX_FOLLOW_UPS {
                tracing::error!("Follow-up chain exceeded {} messages, dropping", MAX_FOLLOW_UPS);
                break;
            }
            let result = handler::update(&mut self.state, msg, &mut self.surface);
            for action in result.actions {
                self.apply(action);
            }
            next = result.message;
        }

        let post = StateSnapshot::capture(&self.state);
        self.emit_events(&pre, &post);
    }

    /// Fire every timer due at the current clock time.
    ///
    /// Returns the number of timers fired.
    pub fn fire_due(&mut self) -> usize {
        let now = self.clock.now();
        let mut fired = 0;
        while let Some(timer) = self.timers.pop_due(now) {
            self.dispatch(Message::TimerFired(timer));
            fired += 1;
        }
        fired
    }

    /// Time until the next pending timer, zero if one is overdue
    pub fn next_deadline(&self) -> Option<Duration> {
        let now = self.clock.now();
        self.timers
            .next_deadline()
            .map(|due| due.saturating_sub(now))
    }

    pub fn is_idle(&self) -> bool {
        self.timers.is_empty() && self.outbox.is_empty() && !self.state.session.is_typing()
    }

    /// Requests to send, oldest first
    pub fn take_outgoing(&mut self) -> Vec<OutgoingChat> {
        std::mem::take(&mut self.outbox)
    }

    /// Requests to cancel
    pub fn take_aborted(&mut self) -> Vec<RequestId> {
        std::mem::take(&mut self.aborted)
    }

    /// Events since the last call, in order
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    fn apply(&mut self, action: UpdateAction) {
        match action {
            UpdateAction::ScheduleTimer { timer, after } => {
                self.timers.schedule(timer, self.clock.now(), after);
            }
            UpdateAction::CancelTimer(timer) => {
                self.timers.cancel(timer);
            }
            UpdateAction::CancelAllTimers => {
                self.timers.clear();
            }
            UpdateAction::SendChat(outgoing) => {
                self.outbox.push(outgoing);
            }
            UpdateAction::AbortChat(id) => {
                // never left the outbox, nothing to cancel on the wire
                if let Some(pos) = self.outbox.iter().position(|o| o.id == id) {
                    self.outbox.remove(pos);
                } else {
                    self.aborted.push(id);
                }
            }
        }
    }

    /// Emit EngineEvents based on state changes after processing.
    fn emit_events(&mut self, pre: &StateSnapshot, post: &StateSnapshot) {
        if post.device != pre.device {
            self.events.push(EngineEvent::DeviceChanged { class: post.device });
        }

        if pre.prompts_visible && !post.prompts_visible {
            self.events.push(EngineEvent::PromptsHidden);
        }

        let messages = self.state.session.messages();
        for index in pre.message_count..post.message_count {
            if let Some(message) = messages.get(index) {
                self.events.push(EngineEvent::MessageAppended {
                    index,
                    message: message.clone(),
                });
            }
        }

        if pre.typing != post.typing {
            self.events.push(EngineEvent::TypingChanged {
                typing: post.typing,
            });
        }

        if pre.phase != post.phase {
            tracing::debug!("Keyboard {} -> {}", pre.phase.name(), post.phase.name());
            self.events.push(EngineEvent::KeyboardPhaseChanged {
                old: pre.phase,
                new: post.phase,
            });
        }
    }
}

impl<S: Surface> Engine<S, ManualClock> {
    /// Advance the manual clock by `by`, firing each timer at its own due time
    pub fn advance(&mut self, by: Duration) -> usize {
        let target = self.clock.now() + by;
        let mut fired = 0;
        while let Some(due) = self.timers.next_deadline() {
            if due > target {
                break;
            }
            if due > self.clock.now() {
                self.clock.set(due);
            }
            fired += self.fire_due();
        }
        self.clock.set(target);
        fired
    }

    pub fn is_pending(&self, timer: Timer) -> bool {
        self.timers.is_pending(timer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeSurface;
    use smoothie_core::{ChatReply, Intent, Role};

    fn phone_engine() -> Engine<FakeSurface, ManualClock> {
        let mut engine = Engine::new(Settings::default(), FakeSurface::phone(), ManualClock::new());
        engine.mount(ViewportMetrics::new(390.0, 844.0), false);
        engine.take_events();
        engine
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_mount_schedules_capture_and_poll() {
        let mut engine = Engine::new(Settings::default(), FakeSurface::phone(), ManualClock::new());
        engine.mount(ViewportMetrics::new(390.0, 844.0), false);

        assert!(engine.state.mounted);
        assert!(engine.is_pending(Timer::CaptureInitialView));
        assert!(engine.is_pending(Timer::MountScrollPoll));
        assert!(engine
            .take_events()
            .iter()
            .any(|e| matches!(e, EngineEvent::DeviceChanged { class: DeviceClass::Mobile })));
    }

    #[test]
    fn test_mount_poll_stops_after_two_seconds() {
        let mut engine = phone_engine();
        engine.advance(ms(2_000));
        assert!(!engine.is_pending(Timer::MountScrollPoll));
        assert_eq!(engine.state.mount_poll_remaining, 0);
        assert!(engine.state.initial_view.is_captured());
    }

    #[test]
    fn test_send_round_trip_events() {
        let mut engine = phone_engine();
        engine.dispatch(Message::SendPrompt("mango please".into()));

        let outgoing = engine.take_outgoing();
        assert_eq!(outgoing.len(), 1);
        assert!(engine.is_pending(Timer::ChatDeadline(outgoing[0].id)));

        let events = engine.take_events();
        assert!(matches!(events[0], EngineEvent::PromptsHidden));
        assert!(matches!(
            &events[1],
            EngineEvent::MessageAppended { index: 1, message } if message.role == Role::User
        ));
        assert!(matches!(events[2], EngineEvent::TypingChanged { typing: true }));

        engine.dispatch(Message::ChatCompleted {
            request: outgoing[0].id,
            outcome: Ok(ChatReply {
                explanation: Some("Try Mango Tango.".into()),
                intent: Intent::GeneralChat,
                ..Default::default()
            }),
        });

        assert!(!engine.is_pending(Timer::ChatDeadline(outgoing[0].id)));
        let events = engine.take_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], EngineEvent::TypingChanged { typing: false }));
    }

    #[test]
    fn test_deadline_appends_one_timeout_and_aborts() {
        let mut engine = phone_engine();
        engine.dispatch(Message::SendPrompt("slow".into()));
        let id = engine.take_outgoing()[0].id;

        engine.advance(ms(15_000));

        assert_eq!(engine.take_aborted(), vec![id]);
        let last = engine.state.session.messages().last().unwrap();
        assert!(last.content.starts_with("Request timed out"));
        assert!(!engine.state.session.is_typing());

        // transport reports the abort afterwards; no second message
        let count = engine.state.session.messages().len();
        engine.dispatch(Message::ChatCompleted {
            request: id,
            outcome: Err(smoothie_core::ChatFailure::Timeout),
        });
        assert_eq!(engine.state.session.messages().len(), count);
    }

    #[test]
    fn test_unmount_drops_unsent_request_from_outbox() {
        let mut engine = phone_engine();
        engine.dispatch(Message::SendPrompt("hello".into()));
        engine.dispatch(Message::Unmount);

        assert!(engine.take_outgoing().is_empty());
        assert!(engine.take_aborted().is_empty());
        assert!(engine.timers().is_empty());
        assert!(engine.is_idle());
    }

    #[test]
    fn test_unmount_aborts_sent_request() {
        let mut engine = phone_engine();
        engine.dispatch(Message::SendPrompt("hello".into()));
        let sent = engine.take_outgoing();
        engine.dispatch(Message::Unmount);
        assert_eq!(engine.take_aborted(), vec![sent[0].id]);
    }

    #[test]
    fn test_advance_fires_rescheduled_timers_in_order() {
        let mut engine = phone_engine();
        // 10 mount polls over 2s plus the capture at 300ms
        assert_eq!(engine.advance(ms(2_000)), 11);
    }

    #[test]
    fn test_next_deadline_is_relative() {
        let mut engine = phone_engine();
        assert_eq!(engine.next_deadline(), Some(ms(200)));
        engine.advance(ms(150));
        assert_eq!(engine.next_deadline(), Some(ms(50)));
    }
}
