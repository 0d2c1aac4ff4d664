//! Native runtime: drives an [`Engine`] on tokio
//!
//! Chat requests run as abortable tasks; completions come back over a
//! channel and timers sleep on tokio's clock, so tests can run the whole
//! loop under `start_paused`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::{abortable, AbortHandle};
use smoothie_core::{ChatFailure, ChatReply};
use tokio::sync::mpsc;

use crate::api::ChatTransport;
use crate::config::Settings;
use crate::engine::Engine;
use crate::engine_event::EngineEvent;
use crate::message::Message;
use crate::session::{OutgoingChat, RequestId};
use crate::surface::Surface;
use crate::timer::Clock;

type Completion = (RequestId, Result<ChatReply, ChatFailure>);

/// Clock on tokio's (pausable) time source
#[derive(Debug, Clone)]
pub struct TokioClock {
    origin: tokio::time::Instant,
}

impl Default for TokioClock {
    fn default() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Clock for TokioClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

pub struct Runtime<S: Surface, T> {
    engine: Engine<S, TokioClock>,
    transport: Arc<T>,
    in_flight: HashMap<RequestId, AbortHandle>,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completion_rx: mpsc::UnboundedReceiver<Completion>,
}

impl<S, T> Runtime<S, T>
where
    S: Surface,
    T: ChatTransport + Send + Sync + 'static,
{
    pub fn new(settings: Settings, surface: S, transport: Arc<T>) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            engine: Engine::new(settings, surface, TokioClock::default()),
            transport,
            in_flight: HashMap::new(),
            completion_tx,
            completion_rx,
        }
    }

    pub fn engine(&self) -> &Engine<S, TokioClock> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine<S, TokioClock> {
        &mut self.engine
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Process `msg`, then start and cancel requests as the engine asks
    pub fn dispatch(&mut self, msg: Message) {
        self.engine.dispatch(msg);
        self.flush();
    }

    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        self.engine.take_events()
    }

    /// Nothing scheduled and nothing on the wire
    pub fn is_idle(&self) -> bool {
        self.engine.is_idle() && self.in_flight.is_empty()
    }

    /// Wait for the next completion or due timer and process it.
    ///
    /// Returns `false` without waiting when idle.
    pub async fn step(&mut self) -> bool {
        if self.is_idle() {
            return false;
        }

        let wait = self.engine.next_deadline();
        let sleep = async move {
            match wait {
                Some(delay) => tokio::time::sleep(delay).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            Some((request, outcome)) = self.completion_rx.recv() => {
                self.in_flight.remove(&request);
                self.dispatch(Message::ChatCompleted { request, outcome });
            }
            _ = sleep => {
                self.engine.fire_due();
                self.flush();
            }
        }
        true
    }

    /// Run until every timer has fired and every request has finished
    pub async fn run_until_idle(&mut self) {
        while self.step().await {}
    }

    fn flush(&mut self) {
        for id in self.engine.take_aborted() {
            if let Some(handle) = self.in_flight.remove(&id) {
                tracing::debug!("Aborting chat request {}", id);
                handle.abort();
            }
        }
        for outgoing in self.engine.take_outgoing() {
            self.spawn_request(outgoing);
        }
    }

    fn spawn_request(&mut self, outgoing: OutgoingChat) {
        let OutgoingChat { id, request } = outgoing;
        let transport = Arc::clone(&self.transport);
        let (task, handle) = abortable(async move { transport.send(&request).await });
        self.in_flight.insert(id, handle);

        let tx = self.completion_tx.clone();
        tokio::spawn(async move {
            match task.await {
                Ok(outcome) => {
                    if tx.send((id, outcome)).is_err() {
                        tracing::trace!("Runtime gone before request {} completed", id);
                    }
                }
                Err(_aborted) => tracing::trace!("Request {} aborted", id),
            }
        });
    }
}
