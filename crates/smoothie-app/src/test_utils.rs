//! Test utilities for driving the widget without a browser
//!
//! [`FakeSurface`] models a page with a scroll offset, a header at a fixed
//! document position and a window whose visual viewport can shrink like it
//! does when an on-screen keyboard opens.

use std::collections::{HashMap, HashSet};

use smoothie_core::{Rect, ViewportSample};

use crate::surface::{Anchor, ScrollBlock, Surface};

/// Recorded surface call
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    ScrollTo(f64),
    ResetDocumentScroll,
    ScrollToTopNextFrame,
    Reflow(Anchor),
    ScrollIntoView(Anchor, ScrollBlock),
    ScrollToBottom(Anchor),
    Blur(Anchor),
}

#[derive(Debug, Clone)]
pub struct FakeSurface {
    pub inner_height: f64,
    /// `None` simulates a browser without the visual-viewport API
    pub visual_height: Option<f64>,
    pub scroll_y: f64,
    /// Swallow page scroll writes, like iOS while the keyboard animates out
    pub ignore_scroll: bool,
    /// Header top in document coordinates
    pub header_doc_top: f64,
    pub focused: Option<Anchor>,
    pub missing: HashSet<Anchor>,
    pub styles: HashMap<(Anchor, String), String>,
    pub ops: Vec<SurfaceOp>,
}

impl FakeSurface {
    /// Portrait phone with the keyboard hidden
    pub fn phone() -> Self {
        Self::with_height(800.0)
    }

    pub fn with_height(inner_height: f64) -> Self {
        Self {
            inner_height,
            visual_height: Some(inner_height),
            scroll_y: 0.0,
            ignore_scroll: false,
            header_doc_top: 20.0,
            focused: None,
            missing: HashSet::new(),
            styles: HashMap::new(),
            ops: Vec::new(),
        }
    }

    /// Drop the visual viewport by `keyboard` px
    pub fn open_keyboard(&mut self, keyboard: f64) {
        self.visual_height = Some(self.inner_height - keyboard);
    }

    pub fn close_keyboard(&mut self) {
        self.visual_height = Some(self.inner_height);
    }

    pub fn without_element(mut self, anchor: Anchor) -> Self {
        self.missing.insert(anchor);
        self
    }

    pub fn style(&self, anchor: Anchor, property: &str) -> Option<&str> {
        self.styles
            .get(&(anchor, property.to_string()))
            .map(String::as_str)
    }

    /// Count of page-level scroll writes (`scroll_to` and frame-scheduled)
    pub fn page_scrolls(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, SurfaceOp::ScrollTo(_) | SurfaceOp::ScrollToTopNextFrame))
            .count()
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    fn exists(&self, anchor: Anchor) -> bool {
        !self.missing.contains(&anchor)
    }
}

impl Surface for FakeSurface {
    fn viewport(&self) -> ViewportSample {
        ViewportSample::new(self.inner_height, self.visual_height)
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn scroll_to(&mut self, y: f64) {
        if !self.ignore_scroll {
            self.scroll_y = y.max(0.0);
        }
        self.ops.push(SurfaceOp::ScrollTo(y));
    }

    fn reset_document_scroll(&mut self) {
        if !self.ignore_scroll {
            self.scroll_y = 0.0;
        }
        self.ops.push(SurfaceOp::ResetDocumentScroll);
    }

    fn scroll_to_top_next_frame(&mut self) {
        if !self.ignore_scroll {
            self.scroll_y = 0.0;
        }
        self.ops.push(SurfaceOp::ScrollToTopNextFrame);
    }

    fn force_reflow(&mut self, anchor: Anchor) -> bool {
        if !self.exists(anchor) {
            return false;
        }
        self.ops.push(SurfaceOp::Reflow(anchor));
        true
    }

    fn rect(&self, anchor: Anchor) -> Option<Rect> {
        if !self.exists(anchor) {
            return None;
        }
        match anchor {
            Anchor::Header => Some(Rect::new(
                self.header_doc_top - self.scroll_y,
                0.0,
                390.0,
                120.0,
            )),
            _ => Some(Rect::new(0.0, 0.0, 390.0, 100.0)),
        }
    }

    fn set_style(&mut self, anchor: Anchor, property: &str, value: Option<&str>) -> bool {
        if !self.exists(anchor) {
            return false;
        }
        let key = (anchor, property.to_string());
        match value {
            Some(v) => {
                self.styles.insert(key, v.to_string());
            }
            None => {
                self.styles.remove(&key);
            }
        }
        true
    }

    fn scroll_into_view(&mut self, anchor: Anchor, block: ScrollBlock) -> bool {
        if !self.exists(anchor) {
            return false;
        }
        self.ops.push(SurfaceOp::ScrollIntoView(anchor, block));
        true
    }

    fn scroll_to_bottom(&mut self, anchor: Anchor) -> bool {
        if !self.exists(anchor) {
            return false;
        }
        self.ops.push(SurfaceOp::ScrollToBottom(anchor));
        true
    }

    fn has_focus(&self, anchor: Anchor) -> bool {
        self.focused == Some(anchor)
    }

    fn blur(&mut self, anchor: Anchor) -> bool {
        if !self.exists(anchor) {
            return false;
        }
        if self.focused == Some(anchor) {
            self.focused = None;
        }
        self.ops.push(SurfaceOp::Blur(anchor));
        true
    }
}
