//! [`Surface`] over the live document

use std::collections::HashMap;
use std::time::Duration;

use smoothie_app::{Anchor, Clock, ScrollBlock, Surface};
use smoothie_core::{is_ios, Rect, ViewportMetrics, ViewportSample};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, HtmlElement, Performance, ScrollIntoViewOptions, ScrollLogicalPosition, Window};

pub struct DomSurface {
    window: Window,
    anchors: HashMap<Anchor, HtmlElement>,
}

impl DomSurface {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            anchors: HashMap::new(),
        }
    }

    pub fn attach(&mut self, anchor: Anchor, element: HtmlElement) {
        self.anchors.insert(anchor, element);
    }

    /// The element, if it is still in the document
    fn element(&self, anchor: Anchor) -> Option<&HtmlElement> {
        self.anchors.get(&anchor).filter(|el| el.is_connected())
    }
}

/// Window inner height plus the visual viewport, when the browser has one
pub fn sample_viewport(window: &Window) -> ViewportSample {
    let visual_height = window.visual_viewport().map(|vv| vv.height());
    ViewportSample::new(px(window.inner_height()), visual_height)
}

pub fn window_metrics(window: &Window) -> ViewportMetrics {
    ViewportMetrics::new(px(window.inner_width()), px(window.inner_height()))
        .with_pixel_ratio(window.device_pixel_ratio())
}

pub fn detect_ios(window: &Window) -> bool {
    let navigator = window.navigator();
    is_ios(
        &navigator.user_agent().unwrap_or_default(),
        &navigator.platform().unwrap_or_default(),
        navigator.max_touch_points().max(0) as u32,
    )
}

fn px(value: Result<JsValue, JsValue>) -> f64 {
    value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
}

impl Surface for DomSurface {
    fn viewport(&self) -> ViewportSample {
        sample_viewport(&self.window)
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn scroll_to(&mut self, y: f64) {
        self.window.scroll_to_with_x_and_y(0.0, y);
    }

    fn reset_document_scroll(&mut self) {
        let Some(document) = self.window.document() else {
            return;
        };
        if let Some(root) = document.document_element() {
            root.set_scroll_top(0);
        }
        if let Some(body) = document.body() {
            body.set_scroll_top(0);
        }
    }

    fn scroll_to_top_next_frame(&mut self) {
        let window = self.window.clone();
        let cb = Closure::once(move || window.scroll_to_with_x_and_y(0.0, 0.0));
        if self
            .window
            .request_animation_frame(cb.as_ref().unchecked_ref())
            .is_err()
        {
            tracing::warn!("requestAnimationFrame unavailable");
        }
        cb.forget();
    }

    fn force_reflow(&mut self, anchor: Anchor) -> bool {
        let Some(el) = self.element(anchor) else {
            return false;
        };
        let style = el.style();
        let _ = style.set_property("display", "none");
        // reading a layout property flushes the pending style change
        let _ = el.offset_height();
        let _ = style.remove_property("display");
        true
    }

    fn rect(&self, anchor: Anchor) -> Option<Rect> {
        let r = self.element(anchor)?.get_bounding_client_rect();
        Some(Rect::new(r.top(), r.left(), r.width(), r.height()))
    }

    fn set_style(&mut self, anchor: Anchor, property: &str, value: Option<&str>) -> bool {
        let Some(el) = self.element(anchor) else {
            return false;
        };
        let style = el.style();
        match value {
            Some(value) => style.set_property(property, value).is_ok(),
            None => style.remove_property(property).is_ok(),
        }
    }

    fn scroll_into_view(&mut self, anchor: Anchor, block: ScrollBlock) -> bool {
        let Some(el) = self.element(anchor) else {
            return false;
        };
        let options = ScrollIntoViewOptions::new();
        options.set_block(match block {
            ScrollBlock::Start => ScrollLogicalPosition::Start,
            ScrollBlock::Center => ScrollLogicalPosition::Center,
            ScrollBlock::End => ScrollLogicalPosition::End,
            ScrollBlock::Nearest => ScrollLogicalPosition::Nearest,
        });
        el.scroll_into_view_with_scroll_into_view_options(&options);
        true
    }

    fn scroll_to_bottom(&mut self, anchor: Anchor) -> bool {
        let Some(el) = self.element(anchor) else {
            return false;
        };
        el.set_scroll_top(el.scroll_height());
        true
    }

    fn has_focus(&self, anchor: Anchor) -> bool {
        let Some(el) = self.element(anchor) else {
            return false;
        };
        let el: &Element = el.as_ref();
        self.window
            .document()
            .and_then(|d| d.active_element())
            .is_some_and(|active| &active == el)
    }

    fn blur(&mut self, anchor: Anchor) -> bool {
        self.element(anchor).is_some_and(|el| el.blur().is_ok())
    }
}

/// `performance.now()` relative to mount
pub struct BrowserClock {
    performance: Option<Performance>,
    origin: f64,
}

impl BrowserClock {
    pub fn new(window: &Window) -> Self {
        let performance = window.performance();
        let origin = performance.as_ref().map_or(0.0, |p| p.now());
        Self {
            performance,
            origin,
        }
    }
}

impl Clock for BrowserClock {
    fn now(&self) -> Duration {
        let now = self.performance.as_ref().map_or(self.origin, |p| p.now());
        Duration::from_secs_f64((now - self.origin).max(0.0) / 1000.0)
    }
}
