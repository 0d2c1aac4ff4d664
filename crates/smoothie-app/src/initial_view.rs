//! Initial-view snapshot
//!
//! Records where the header sat shortly after mount so the page can later be
//! scrolled back to exactly that view.

use smoothie_core::Rect;

use crate::surface::{Anchor, Surface};

/// Distance (px) from the captured header top that still counts as at rest
pub const AT_REST_TOLERANCE_PX: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialViewSnapshot {
    pub header_top: f64,
    pub header_rect: Rect,
    pub header_visible: bool,
}

/// What a restore attempt did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RestoreOutcome {
    /// No snapshot yet; nothing was scrolled
    NotCaptured,
    /// Scrolling is suppressed during the first keyboard appearance
    Blocked,
    /// Header already within tolerance; nothing was scrolled
    AlreadyAtRest,
    /// Scrolled to the given offset
    Scrolled(f64),
}

impl RestoreOutcome {
    /// Whether the page ends up at (or was already at) the captured view
    pub fn succeeded(&self) -> bool {
        matches!(self, RestoreOutcome::AlreadyAtRest | RestoreOutcome::Scrolled(_))
    }
}

#[derive(Debug, Clone, Default)]
pub struct InitialView {
    snapshot: Option<InitialViewSnapshot>,
    tolerance_px: f64,
}

impl InitialView {
    pub fn new(tolerance_px: f64) -> Self {
        Self {
            snapshot: None,
            tolerance_px,
        }
    }

    pub fn snapshot(&self) -> Option<&InitialViewSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn is_captured(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Record the header position once. Later calls keep the first snapshot.
    pub fn capture(&mut self, surface: &dyn Surface) -> bool {
        if self.snapshot.is_some() {
            return true;
        }
        let Some(rect) = surface.rect(Anchor::Header) else {
            tracing::debug!("Initial view: header not mounted, nothing captured");
            return false;
        };
        let inner_height = surface.viewport().inner_height;
        self.snapshot = Some(InitialViewSnapshot {
            header_top: rect.top,
            header_rect: rect,
            header_visible: rect.bottom() > 0.0 && rect.top < inner_height,
        });
        tracing::debug!("Initial view captured, header top {:.1}", rect.top);
        true
    }

    /// Scroll so the header returns to its captured position.
    ///
    /// The caller schedules one fine-tune retry when this returns
    /// [`RestoreOutcome::Scrolled`].
    pub fn restore(&self, surface: &mut dyn Surface, blocked: bool) -> RestoreOutcome {
        let Some(snapshot) = self.snapshot else {
            return RestoreOutcome::NotCaptured;
        };
        if blocked {
            tracing::trace!("Initial view restore blocked during first keyboard appearance");
            return RestoreOutcome::Blocked;
        }
        let Some(current) = surface.rect(Anchor::Header) else {
            return RestoreOutcome::NotCaptured;
        };

        let delta = current.top - snapshot.header_top;
        if delta.abs() <= self.tolerance_px {
            return RestoreOutcome::AlreadyAtRest;
        }

        let target = (surface.scroll_y() + delta).max(0.0);
        surface.scroll_to(target);
        RestoreOutcome::Scrolled(target)
    }

    /// Whether the header is within tolerance of its captured position
    pub fn is_at_rest(&self, surface: &dyn Surface) -> bool {
        match (self.snapshot, surface.rect(Anchor::Header)) {
            (Some(snapshot), Some(current)) => {
                (current.top - snapshot.header_top).abs() <= self.tolerance_px
            }
            _ => false,
        }
    }
}
