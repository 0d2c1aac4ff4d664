//! Configuration types for the smoothie assistant
//!
//! Defines `Settings` and its sections, loaded from `.smoothie/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use smoothie_core::BuildMode;

/// Default chat API endpoint base
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Global application settings from `.smoothie/config.toml`
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub build: BuildSettings,

    #[serde(default)]
    pub keyboard: KeyboardSettings,

    #[serde(default)]
    pub assets: AssetSettings,
}

/// Chat API settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ApiSettings {
    /// Base URL; `/chat` is appended
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Client-side deadline for one chat round trip
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_base_url() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_timeout_ms() -> u64 {
    15_000
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct BuildSettings {
    #[serde(default)]
    pub mode: BuildMode,
}

/// Timing and threshold constants of the keyboard compensator
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct KeyboardSettings {
    /// visual/inner height ratio below which the keyboard counts as shown
    pub keyboard_ratio: f64,

    /// Growth factor of the visual height that counts as a dismissal
    pub dismiss_growth: f64,

    /// Max height delta (px) between samples for the keyboard to be settled
    pub settle_threshold_px: f64,

    pub focus_settle_delay_ms: u64,
    pub focus_settle_delay_ios_ms: u64,
    pub settle_poll_ms: u64,
    pub settle_max_attempts: u32,

    pub mark_full_shown_ms: u64,
    pub release_first_appearance_ms: u64,

    /// Temporary main-content padding on the first appearance, as a share
    /// of the window height
    pub first_appearance_padding_ratio: f64,

    pub blur_restore_delay_ms: u64,
    pub restore_poll_ms: u64,
    pub restore_max_attempts: u32,
    pub restore_max_attempts_ios: u32,
    pub restore_fine_tune_ms: u64,

    /// Header distance (px) from its captured position that still counts as at rest
    pub at_rest_tolerance_px: f64,

    pub capture_delay_ms: u64,
    pub mount_poll_interval_ms: u64,
    pub mount_poll_duration_ms: u64,
    pub send_restore_delay_ms: u64,
    pub image_restore_delay_ms: u64,
}

impl Default for KeyboardSettings {
    fn default() -> Self {
        Self {
            keyboard_ratio: 0.8,
            dismiss_growth: 1.1,
            settle_threshold_px: 8.0,
            focus_settle_delay_ms: 150,
            focus_settle_delay_ios_ms: 300,
            settle_poll_ms: 100,
            settle_max_attempts: 6,
            mark_full_shown_ms: 300,
            release_first_appearance_ms: 500,
            first_appearance_padding_ratio: 0.4,
            blur_restore_delay_ms: 150,
            restore_poll_ms: 200,
            restore_max_attempts: 3,
            restore_max_attempts_ios: 5,
            restore_fine_tune_ms: 50,
            at_rest_tolerance_px: 5.0,
            capture_delay_ms: 300,
            mount_poll_interval_ms: 200,
            mount_poll_duration_ms: 2_000,
            send_restore_delay_ms: 500,
            image_restore_delay_ms: 50,
        }
    }
}

impl KeyboardSettings {
    pub fn focus_settle_delay(&self, is_ios: bool) -> Duration {
        Duration::from_millis(if is_ios {
            self.focus_settle_delay_ios_ms
        } else {
            self.focus_settle_delay_ms
        })
    }

    pub fn restore_attempts(&self, is_ios: bool) -> u32 {
        if is_ios {
            self.restore_max_attempts_ios
        } else {
            self.restore_max_attempts
        }
    }

    /// Number of mount-time scroll polls
    pub fn mount_poll_count(&self) -> u32 {
        if self.mount_poll_interval_ms == 0 {
            return 0;
        }
        (self.mount_poll_duration_ms / self.mount_poll_interval_ms) as u32
    }
}

/// Build-time menu image staging
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AssetSettings {
    /// Candidate source directories, tried in order
    #[serde(default = "default_asset_sources")]
    pub sources: Vec<PathBuf>,

    #[serde(default = "default_asset_dest")]
    pub dest: PathBuf,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            sources: default_asset_sources(),
            dest: default_asset_dest(),
        }
    }
}

fn default_asset_sources() -> Vec<PathBuf> {
    vec![
        PathBuf::from("../data/MenuImages"),
        PathBuf::from("data/MenuImages"),
        PathBuf::from("../smoothie-api/data/MenuImages"),
    ]
}

fn default_asset_dest() -> PathBuf {
    PathBuf::from("public/images")
}
