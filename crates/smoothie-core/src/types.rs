//! Shared value types used by the layout, keyboard and chat layers

use serde::{Deserialize, Serialize};

/// Build flavour controlling image-path resolution and error verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    #[default]
    Development,
    Production,
}

impl BuildMode {
    pub fn is_production(&self) -> bool {
        matches!(self, BuildMode::Production)
    }

    /// Parse a user-supplied flag (`prod`, `production`, `dev`, `development`)
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" | "release" => Some(BuildMode::Production),
            "dev" | "development" | "debug" => Some(BuildMode::Development),
            _ => None,
        }
    }
}

impl std::fmt::Display for BuildMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildMode::Development => write!(f, "development"),
            BuildMode::Production => write!(f, "production"),
        }
    }
}

/// Bounding box of an element relative to the layout viewport (CSS pixels)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// One reading of the window and visual viewport heights.
///
/// `visual_height` is `None` when the browser has no visual-viewport API; the
/// keyboard detector then falls back to inner-height deltas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportSample {
    pub inner_height: f64,
    pub visual_height: Option<f64>,
}

impl ViewportSample {
    pub fn new(inner_height: f64, visual_height: Option<f64>) -> Self {
        Self {
            inner_height,
            visual_height,
        }
    }

    /// Visual height, or the inner height when the API is missing
    pub fn effective_visual_height(&self) -> f64 {
        self.visual_height.unwrap_or(self.inner_height)
    }

    /// `visual / inner`, `1.0` for a degenerate window
    pub fn height_ratio(&self) -> f64 {
        if self.inner_height <= 0.0 {
            return 1.0;
        }
        self.effective_visual_height() / self.inner_height
    }

    pub fn has_visual_viewport(&self) -> bool {
        self.visual_height.is_some()
    }
}
