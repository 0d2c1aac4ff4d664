//! On-screen keyboard state
//!
//! One [`KeyboardState`] exists per mounted chat input. The transitions live in
//! `handler::keyboard`; this module holds the state and the pure detection
//! rules over viewport samples.

use smoothie_core::ViewportSample;

use crate::config::KeyboardSettings;

/// Phase of one focus/blur cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyboardPhase {
    /// Input unfocused, keyboard hidden
    #[default]
    Idle,
    /// Input focused, keyboard animating in, height unknown
    FocusPending,
    /// Keyboard height stable and compensated
    FocusSettled,
    /// Input blurred, keyboard animating out
    BlurPending,
    /// Layout and scroll back to their idle values
    Restored,
}

impl KeyboardPhase {
    pub fn is_focused(&self) -> bool {
        matches!(self, KeyboardPhase::FocusPending | KeyboardPhase::FocusSettled)
    }

    /// Keyboard gone and the cycle over (or never started)
    pub fn is_idle_like(&self) -> bool {
        matches!(self, KeyboardPhase::Idle | KeyboardPhase::Restored)
    }

    pub fn name(&self) -> &'static str {
        match self {
            KeyboardPhase::Idle => "idle",
            KeyboardPhase::FocusPending => "focus_pending",
            KeyboardPhase::FocusSettled => "focus_settled",
            KeyboardPhase::BlurPending => "blur_pending",
            KeyboardPhase::Restored => "restored",
        }
    }
}

/// Where focus went when the input blurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlurTarget {
    /// The send button; the user is mid-tap on send
    SendButton,
    Other,
    #[default]
    Nothing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyboardState {
    pub phase: KeyboardPhase,

    /// Set once the first focus/blur cycle has completed
    pub had_initial_focus: bool,

    /// Set once the keyboard reached its settled height the first time
    pub had_full_keyboard_shown: bool,

    /// True until the first settle of this input
    pub is_first_keyboard_appearance: bool,

    /// Scroll suppression between the first settle and its release
    pub first_appearance_blocking: bool,

    /// Visual height of the previous sample
    pub last_visual_viewport_height: Option<f64>,

    pub keyboard_height: f64,

    /// Window inner height when focus arrived
    pub baseline_inner_height: f64,

    pub settle_attempts: u32,
    pub restore_attempts: u32,

    /// Ignore the resize the browser fires right after mount
    pub skip_next_resize: bool,
}

impl Default for KeyboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyboardState {
    pub fn new() -> Self {
        Self {
            phase: KeyboardPhase::Idle,
            had_initial_focus: false,
            had_full_keyboard_shown: false,
            is_first_keyboard_appearance: true,
            first_appearance_blocking: false,
            last_visual_viewport_height: None,
            keyboard_height: 0.0,
            baseline_inner_height: 0.0,
            settle_attempts: 0,
            restore_attempts: 0,
            skip_next_resize: true,
        }
    }

    /// Whether automatic scroll-to-top and view restores are suppressed
    pub fn scroll_blocked(&self) -> bool {
        self.first_appearance_blocking
            || (self.phase.is_focused() && !self.had_full_keyboard_shown)
    }

    /// Whether `sample` shows an open keyboard.
    ///
    /// With the visual-viewport API this is the visual/inner ratio; without
    /// it, a drop of the inner height below the focus-time baseline.
    pub fn keyboard_visible(&self, sample: &ViewportSample, settings: &KeyboardSettings) -> bool {
        if sample.has_visual_viewport() {
            sample.height_ratio() < settings.keyboard_ratio
        } else {
            self.baseline_inner_height > 0.0
                && sample.inner_height < self.baseline_inner_height * settings.keyboard_ratio
        }
    }

    /// Keyboard height estimate from `sample`, never negative
    pub fn measure(&self, sample: &ViewportSample) -> f64 {
        let height = match sample.visual_height {
            Some(visual) => sample.inner_height - visual,
            None => self.baseline_inner_height - sample.inner_height,
        };
        height.max(0.0)
    }

    /// Whether the visual height changed by less than the settle threshold
    /// since the previous sample
    pub fn is_stable(&self, sample: &ViewportSample, settings: &KeyboardSettings) -> bool {
        self.last_visual_viewport_height
            .map(|last| (sample.effective_visual_height() - last).abs() < settings.settle_threshold_px)
            .unwrap_or(false)
    }

    /// Whether `sample` grew enough over the previous one to mean the
    /// keyboard closed
    pub fn is_dismissal(&self, sample: &ViewportSample, settings: &KeyboardSettings) -> bool {
        self.last_visual_viewport_height
            .map(|last| sample.effective_visual_height() > last * settings.dismiss_growth)
            .unwrap_or(false)
    }

    pub fn record(&mut self, sample: &ViewportSample) {
        self.last_visual_viewport_height = Some(sample.effective_visual_height());
    }
}
