//! Rendering surface abstraction
//!
//! The keyboard compensator never queries the document. It talks to a
//! [`Surface`] holding direct references to the few elements it adjusts,
//! obtained once when the widget mounts. Every element operation reports
//! whether the element still existed; a missing element is not an error.

use smoothie_core::{Rect, ViewportSample};

/// Elements the compensator adjusts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// Outer page content receiving the first-appearance padding
    MainContent,
    /// Scrollable message pane
    ChatMessages,
    ChatInput,
    ChatContainer,
    /// Header used as the initial-view reference point
    Header,
}

/// `scrollIntoView` alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBlock {
    Start,
    Center,
    End,
    Nearest,
}

impl ScrollBlock {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrollBlock::Start => "start",
            ScrollBlock::Center => "center",
            ScrollBlock::End => "end",
            ScrollBlock::Nearest => "nearest",
        }
    }
}

/// Window and element operations needed by the widget
pub trait Surface {
    /// Current window inner height and visual-viewport height
    fn viewport(&self) -> ViewportSample;

    /// Vertical page scroll offset
    fn scroll_y(&self) -> f64;

    /// `window.scrollTo(0, y)`
    fn scroll_to(&mut self, y: f64);

    /// Zero the scroll offset of the document element and body directly
    fn reset_document_scroll(&mut self);

    /// `scrollTo(0, 0)` on the next animation frame
    fn scroll_to_top_next_frame(&mut self);

    /// Toggle a layout property and revert it to force a reflow
    fn force_reflow(&mut self, anchor: Anchor) -> bool;

    /// Bounding box relative to the layout viewport
    fn rect(&self, anchor: Anchor) -> Option<Rect>;

    /// Set an inline style property, or remove it when `value` is `None`
    fn set_style(&mut self, anchor: Anchor, property: &str, value: Option<&str>) -> bool;

    fn scroll_into_view(&mut self, anchor: Anchor, block: ScrollBlock) -> bool;

    /// Scroll an element's own content to its end
    fn scroll_to_bottom(&mut self, anchor: Anchor) -> bool;

    fn has_focus(&self, anchor: Anchor) -> bool;

    fn blur(&mut self, anchor: Anchor) -> bool;
}

/// Surface for runners without a document, such as the terminal chat.
///
/// It reports a fixed window and no elements, so every adjustment is skipped.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    inner_height: f64,
}

impl HeadlessSurface {
    pub fn new(inner_height: f64) -> Self {
        Self { inner_height }
    }
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new(800.0)
    }
}

impl Surface for HeadlessSurface {
    fn viewport(&self) -> ViewportSample {
        ViewportSample::new(self.inner_height, None)
    }

    fn scroll_y(&self) -> f64 {
        0.0
    }

    fn scroll_to(&mut self, _y: f64) {}

    fn reset_document_scroll(&mut self) {}

    fn scroll_to_top_next_frame(&mut self) {}

    fn force_reflow(&mut self, _anchor: Anchor) -> bool {
        false
    }

    fn rect(&self, _anchor: Anchor) -> Option<Rect> {
        None
    }

    fn set_style(&mut self, _anchor: Anchor, _property: &str, _value: Option<&str>) -> bool {
        false
    }

    fn scroll_into_view(&mut self, _anchor: Anchor, _block: ScrollBlock) -> bool {
        false
    }

    fn scroll_to_bottom(&mut self, _anchor: Anchor) -> bool {
        false
    }

    fn has_focus(&self, _anchor: Anchor) -> bool {
        false
    }

    fn blur(&mut self, _anchor: Anchor) -> bool {
        false
    }
}
