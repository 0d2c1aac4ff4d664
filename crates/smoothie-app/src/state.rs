//! Application state (Model in TEA pattern)

use smoothie_core::{
    classify, derive_styles, resolve_layout, DeviceInfo, LayoutTable, Style, StyledElement,
    ViewportMetrics,
};

use crate::config::{KeyboardSettings, Settings};
use crate::initial_view::InitialView;
use crate::keyboard::{KeyboardPhase, KeyboardState};
use crate::session::ChatSession;

/// Complete widget state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Current device classification, replaced on every resize
    pub device: DeviceInfo,

    pub is_ios: bool,

    pub mounted: bool,

    pub keyboard: KeyboardState,

    pub initial_view: InitialView,

    pub session: ChatSession,

    pub settings: Settings,

    /// Text in the chat input
    pub draft: String,

    /// Mount-time scroll polls still to run
    pub mount_poll_remaining: u32,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let session = ChatSession::new(settings.api.base_url.clone(), settings.build.mode);
        let initial_view = InitialView::new(settings.keyboard.at_rest_tolerance_px);
        Self {
            device: DeviceInfo::default(),
            is_ios: false,
            mounted: false,
            keyboard: KeyboardState::new(),
            initial_view,
            session,
            settings,
            draft: String::new(),
            mount_poll_remaining: 0,
        }
    }

    pub fn with_default_settings() -> Self {
        Self::new(Settings::default())
    }

    pub fn is_mobile(&self) -> bool {
        self.device.is_mobile
    }

    pub fn keyboard_settings(&self) -> &KeyboardSettings {
        &self.settings.keyboard
    }

    pub fn keyboard_phase(&self) -> KeyboardPhase {
        self.keyboard.phase
    }

    pub fn scroll_blocked(&self) -> bool {
        self.keyboard.scroll_blocked()
    }

    /// Reclassify from fresh metrics
    pub fn reclassify(&mut self, metrics: ViewportMetrics) {
        let device = classify(metrics);
        if device.class() != self.device.class() {
            tracing::debug!(
                "Device class {:?} -> {:?} at {}x{}",
                self.device.class(),
                device.class(),
                device.window_width,
                device.window_height
            );
        }
        self.device = device;
    }

    pub fn layout(&self) -> &'static LayoutTable {
        resolve_layout(&self.device)
    }

    pub fn style(&self, element: StyledElement) -> Style {
        derive_styles(element, self.layout(), &self.device)
    }

    /// Whether the send button accepts a click
    pub fn can_send(&self) -> bool {
        !self.draft.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smoothie_core::DeviceClass;

    #[test]
    fn test_new_state_defaults() {
        let state = AppState::with_default_settings();
        assert!(!state.mounted);
        assert!(!state.is_mobile());
        assert_eq!(state.keyboard_phase(), KeyboardPhase::Idle);
        assert_eq!(state.session.messages().len(), 1);
        assert!(!state.can_send());
    }

    #[test]
    fn test_reclassify_replaces_device() {
        let mut state = AppState::with_default_settings();
        state.reclassify(ViewportMetrics::new(360.0, 740.0));
        assert_eq!(state.device.class(), DeviceClass::VerySmallMobile);
        assert_eq!(state.layout().name(), "very-small-mobile");

        state.reclassify(ViewportMetrics::new(1440.0, 900.0));
        assert_eq!(state.device.class(), DeviceClass::Desktop);
    }

    #[test]
    fn test_send_button_follows_draft() {
        let mut state = AppState::with_default_settings();
        state.draft = "  ".into();
        assert!(!state.can_send());
        state.draft = "mango".into();
        assert!(state.can_send());
    }
}
