//! Browser driver: runs the engine on `setTimeout` and `fetch`
//!
//! The engine only says what should happen. This module arms one browser
//! timeout for the earliest pending timer, runs chat requests as abortable
//! local tasks and copies engine events into the view signals.
//!
//! DOM calls made by the engine can fire listeners synchronously (`blur()`
//! raises `blur`), so every message goes through a [`Mailbox`] and only
//! the caller holding the engine drains it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use futures_util::future::{abortable, AbortHandle};
use leptos::prelude::*;
use smoothie_app::config::{apply_env_overrides, Settings};
use smoothie_app::{
    ChatClient, Engine, EngineEvent, LocalChatTransport, Mailbox, Message, RequestId,
};
use smoothie_core::{ChatMessage, DeviceInfo};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

use crate::dom_surface::{BrowserClock, DomSurface};

/// Reactive copies of the state the view renders
#[derive(Clone, Copy)]
pub struct ViewSignals {
    pub messages: RwSignal<Vec<ChatMessage>>,
    pub typing: RwSignal<bool>,
    pub prompts_visible: RwSignal<bool>,
    pub device: RwSignal<DeviceInfo>,
    pub draft: RwSignal<String>,
}

impl ViewSignals {
    pub fn new() -> Self {
        Self {
            messages: RwSignal::new(vec![ChatMessage::welcome()]),
            typing: RwSignal::new(false),
            prompts_visible: RwSignal::new(true),
            device: RwSignal::new(DeviceInfo::default()),
            draft: RwSignal::new(String::new()),
        }
    }
}

impl Default for ViewSignals {
    fn default() -> Self {
        Self::new()
    }
}

/// Driver handle shared by listeners, timers and request tasks
#[derive(Clone)]
pub struct SharedDriver {
    cell: Rc<RefCell<WidgetDriver>>,
    mailbox: Mailbox,
}

impl SharedDriver {
    fn downgrade(&self) -> WeakDriver {
        WeakDriver {
            cell: Rc::downgrade(&self.cell),
            mailbox: self.mailbox.clone(),
        }
    }
}

/// Held by pending browser timeouts so a cleared one does not keep the driver alive
struct WeakDriver {
    cell: Weak<RefCell<WidgetDriver>>,
    mailbox: Mailbox,
}

impl WeakDriver {
    fn upgrade(&self) -> Option<SharedDriver> {
        Some(SharedDriver {
            cell: self.cell.upgrade()?,
            mailbox: self.mailbox.clone(),
        })
    }
}

pub struct WidgetDriver {
    engine: Engine<DomSurface, BrowserClock>,
    window: Window,
    client: Option<Rc<ChatClient>>,
    in_flight: HashMap<RequestId, AbortHandle>,
    timeout: Option<i32>,
    view: ViewSignals,
}

/// Settings baked in at build time, the browser counterpart of the
/// environment overrides the CLI reads at run time
pub fn build_settings() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings, |key| {
        match key {
            "SMOOTHIE_API_BASE" => option_env!("SMOOTHIE_API_BASE"),
            "VITE_API_BASE" => option_env!("VITE_API_BASE"),
            "SMOOTHIE_BUILD" => option_env!("SMOOTHIE_BUILD"),
            _ => None,
        }
        .map(str::to_string)
    });
    settings
}

impl WidgetDriver {
    pub fn new(settings: Settings, window: Window, surface: DomSurface, view: ViewSignals) -> SharedDriver {
        let client = match ChatClient::new(&settings.api.base_url) {
            Ok(client) => Some(Rc::new(client)),
            Err(e) => {
                tracing::error!("Chat disabled: {}", e);
                None
            }
        };
        let clock = BrowserClock::new(&window);
        let engine = Engine::new(settings, surface, clock);
        view.messages.set(engine.state.session.messages().to_vec());
        SharedDriver {
            cell: Rc::new(RefCell::new(Self {
                engine,
                window,
                client,
                in_flight: HashMap::new(),
                timeout: None,
                view,
            })),
            mailbox: Mailbox::new(),
        }
    }
}

/// Feed one message to the engine and carry out what it asks for.
///
/// Called from inside an engine update, this only queues the message.
pub fn dispatch(driver: &SharedDriver, msg: Message) {
    driver.mailbox.post(msg);
    drain(driver);
}

fn drain(driver: &SharedDriver) {
    while let Some(ran) = driver
        .mailbox
        .drain(&*driver.cell, |d, msg| d.engine.dispatch(msg))
    {
        if ran == 0 {
            return;
        }
        pump(driver);
    }
}

fn pump(driver: &SharedDriver) {
    let (events, aborted, outgoing, draft, view) = {
        let mut d = driver.cell.borrow_mut();
        let events = d.engine.take_events();
        let aborted = d.engine.take_aborted();
        let outgoing = d.engine.take_outgoing();
        let draft = d.engine.state.draft.clone();
        (events, aborted, outgoing, draft, d.view)
    };

    for event in events {
        apply_event(&view, event);
    }
    if view.draft.get_untracked() != draft {
        view.draft.set(draft);
    }

    {
        let mut d = driver.cell.borrow_mut();
        for id in aborted {
            if let Some(handle) = d.in_flight.remove(&id) {
                tracing::debug!("Aborting chat request {}", id);
                handle.abort();
            }
        }
    }

    for chat in outgoing {
        let Some(client) = driver.cell.borrow().client.clone() else {
            continue;
        };
        let id = chat.id;
        let request = chat.request;
        let (task, handle) = abortable(async move { client.send(&request).await });
        driver.cell.borrow_mut().in_flight.insert(id, handle);

        let driver = driver.clone();
        leptos::task::spawn_local(async move {
            if let Ok(outcome) = task.await {
                driver.cell.borrow_mut().in_flight.remove(&id);
                dispatch(&driver, Message::ChatCompleted { request: id, outcome });
            }
        });
    }

    rearm(driver);
}

fn apply_event(view: &ViewSignals, event: EngineEvent) {
    match event {
        EngineEvent::MessageAppended { message, .. } => {
            view.messages.update(|messages| messages.push(message));
        }
        EngineEvent::TypingChanged { typing } => view.typing.set(typing),
        EngineEvent::PromptsHidden => view.prompts_visible.set(false),
        EngineEvent::KeyboardPhaseChanged { old, new } => {
            tracing::trace!("keyboard {} -> {}", old.name(), new.name());
        }
        EngineEvent::DeviceChanged { .. } => {}
    }
}

/// Arm a single browser timeout for the earliest engine timer
fn rearm(driver: &SharedDriver) {
    let mut d = driver.cell.borrow_mut();
    if let Some(id) = d.timeout.take() {
        d.window.clear_timeout_with_handle(id);
    }
    // device info is cheap to copy and changes with resize
    let device = d.engine.state.device;
    if d.view.device.get_untracked() != device {
        d.view.device.set(device);
    }

    let Some(delay) = d.engine.next_deadline() else {
        return;
    };

    let weak = driver.downgrade();
    let cb = Closure::once(move || {
        if let Some(driver) = weak.upgrade() {
            fire(&driver);
        }
    });
    match d
        .window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            cb.as_ref().unchecked_ref(),
            delay.as_millis().min(i32::MAX as u128) as i32,
        ) {
        Ok(id) => d.timeout = Some(id),
        Err(e) => tracing::error!("setTimeout failed: {:?}", e),
    }
    cb.forget();
}

fn fire(driver: &SharedDriver) {
    {
        let Ok(mut d) = driver.cell.try_borrow_mut() else {
            tracing::warn!("Timer fired while the engine was busy");
            return;
        };
        d.timeout = None;
        d.engine.fire_due();
    }
    pump(driver);
    // listeners raised by timer handlers
    drain(driver);
}

/// Detach: drop timers and cancel requests
pub fn unmount(driver: &SharedDriver) {
    dispatch(driver, Message::Unmount);
    let Ok(mut d) = driver.cell.try_borrow_mut() else {
        return;
    };
    for (_, handle) in d.in_flight.drain() {
        handle.abort();
    }
    if let Some(id) = d.timeout.take() {
        d.window.clear_timeout_with_handle(id);
    }
}
