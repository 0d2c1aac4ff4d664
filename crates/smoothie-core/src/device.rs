//! Device classification from viewport metrics
//!
//! The classifier mirrors the CSS media queries the widget is styled with:
//! `(max-width: 768px)` for mobile, `(max-width: 375px)` for very small phones,
//! and short landscape windows counting as mobile as well.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Standardized breakpoints (CSS pixels)
pub struct Breakpoints {
    pub very_small: f64,
    pub small: f64,
    pub medium: f64,
    pub large: f64,
    pub x_large: f64,
}

pub const BREAKPOINTS: Breakpoints = Breakpoints {
    very_small: 375.0,
    small: 480.0,
    medium: 768.0,
    large: 1024.0,
    x_large: 1280.0,
};

/// Raw window dimensions as reported by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportMetrics {
    pub width: f64,
    pub height: f64,
    /// `None` when the host does not expose a pixel ratio
    pub device_pixel_ratio: Option<f64>,
}

impl ViewportMetrics {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio: None,
        }
    }

    pub fn with_pixel_ratio(mut self, ratio: f64) -> Self {
        self.device_pixel_ratio = Some(ratio);
        self
    }
}

/// Derived device flags. Always rebuilt from fresh metrics, never patched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub is_mobile: bool,
    pub is_very_small_mobile: bool,
    pub is_landscape: bool,
    pub window_width: u32,
    pub window_height: u32,
    pub device_pixel_ratio: f64,
}

/// Which layout table a device maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Desktop,
    Mobile,
    VerySmallMobile,
}

impl DeviceInfo {
    pub fn class(&self) -> DeviceClass {
        if self.is_very_small_mobile {
            DeviceClass::VerySmallMobile
        } else if self.is_mobile {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }
}

impl Default for DeviceInfo {
    fn default() -> Self {
        classify(ViewportMetrics::new(1280.0, 800.0))
    }
}

/// Classify a viewport. Pure; no side effects.
pub fn classify(metrics: ViewportMetrics) -> DeviceInfo {
    let ViewportMetrics { width, height, .. } = metrics;
    let is_landscape = width > height;

    let is_mobile =
        width <= BREAKPOINTS.medium || (height <= BREAKPOINTS.small && is_landscape);
    let is_very_small_mobile =
        width <= BREAKPOINTS.very_small || (height <= BREAKPOINTS.very_small && is_landscape);

    let device_pixel_ratio = metrics
        .device_pixel_ratio
        .filter(|r| r.is_finite() && *r > 0.0)
        .unwrap_or(1.0);

    DeviceInfo {
        is_mobile,
        is_very_small_mobile,
        is_landscape,
        window_width: width.max(0.0).round() as u32,
        window_height: height.max(0.0).round() as u32,
        device_pixel_ratio,
    }
}

static IOS_USER_AGENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"iPad|iPhone|iPod").expect("static regex"));

/// Detect iOS Safari, including iPadOS which reports itself as `MacIntel`.
pub fn is_ios(user_agent: &str, platform: &str, max_touch_points: u32) -> bool {
    IOS_USER_AGENT.is_match(user_agent) || (platform == "MacIntel" && max_touch_points > 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(width: f64, height: f64) -> DeviceInfo {
        classify(ViewportMetrics::new(width, height))
    }

    #[test]
    fn test_very_small_portrait_phone() {
        let info = at(360.0, 740.0);
        assert!(info.is_very_small_mobile);
        assert!(info.is_mobile);
        assert!(!info.is_landscape);
        assert_eq!(info.class(), DeviceClass::VerySmallMobile);
    }

    #[test]
    fn test_boundary_375_is_very_small() {
        assert!(at(375.0, 812.0).is_very_small_mobile);
        assert!(!at(376.0, 812.0).is_very_small_mobile);
    }

    #[test]
    fn test_regular_phone_is_mobile_only() {
        let info = at(414.0, 896.0);
        assert!(info.is_mobile);
        assert!(!info.is_very_small_mobile);
        assert_eq!(info.class(), DeviceClass::Mobile);
    }

    #[test]
    fn test_boundary_768_is_mobile() {
        assert!(at(768.0, 1024.0).is_mobile);
        assert!(!at(769.0, 1024.0).is_mobile);
    }

    #[test]
    fn test_desktop() {
        let info = at(1440.0, 900.0);
        assert!(!info.is_mobile);
        assert!(!info.is_very_small_mobile);
        assert!(info.is_landscape);
        assert_eq!(info.class(), DeviceClass::Desktop);
    }

    #[test]
    fn test_short_landscape_counts_as_mobile() {
        let info = at(896.0, 414.0);
        assert!(info.is_mobile);
        assert!(!info.is_very_small_mobile);

        let tiny = at(667.0, 375.0);
        assert!(tiny.is_very_small_mobile);
    }

    #[test]
    fn test_short_portrait_is_not_landscape_case() {
        // height <= 480 but portrait: only width rules apply
        let info = at(1000.0, 1200.0);
        assert!(!info.is_mobile);
    }

    #[test]
    fn test_pixel_ratio_fallback() {
        assert_eq!(at(400.0, 800.0).device_pixel_ratio, 1.0);
        let retina = classify(ViewportMetrics::new(400.0, 800.0).with_pixel_ratio(3.0));
        assert_eq!(retina.device_pixel_ratio, 3.0);
        let bogus = classify(ViewportMetrics::new(400.0, 800.0).with_pixel_ratio(f64::NAN));
        assert_eq!(bogus.device_pixel_ratio, 1.0);
    }

    #[test]
    fn test_window_dimensions_are_copied() {
        let info = at(390.4, 844.6);
        assert_eq!(info.window_width, 390);
        assert_eq!(info.window_height, 845);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(at(390.0, 844.0)).unwrap();
        assert_eq!(json["isMobile"], true);
        assert_eq!(json["windowWidth"], 390);
    }

    #[test]
    fn test_is_ios_detection() {
        assert!(is_ios(
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)",
            "iPhone",
            5
        ));
        assert!(is_ios("Mozilla/5.0 (Macintosh)", "MacIntel", 5));
        assert!(!is_ios("Mozilla/5.0 (Macintosh)", "MacIntel", 0));
        assert!(!is_ios("Mozilla/5.0 (Linux; Android 14)", "Linux armv8l", 5));
    }
}
