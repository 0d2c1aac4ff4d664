//! Page scroll-to-top

use crate::surface::{Anchor, Surface};

/// Return the page to the top.
///
/// No single technique works on every mobile engine, so all four always run:
/// `scrollTo`, a direct document/body reset, a reflow toggle on the chat
/// container, and a frame-scheduled `scrollTo`.
pub fn scroll_to_top(surface: &mut dyn Surface) {
    surface.scroll_to(0.0);
    surface.reset_document_scroll();
    if !surface.force_reflow(Anchor::ChatContainer) {
        tracing::trace!("scroll_to_top: chat container not mounted, skipping reflow");
    }
    surface.scroll_to_top_next_frame();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FakeSurface, SurfaceOp};

    #[test]
    fn test_all_four_techniques_run() {
        let mut surface = FakeSurface::phone();
        surface.scroll_y = 240.0;

        scroll_to_top(&mut surface);

        assert_eq!(surface.scroll_y, 0.0);
        assert_eq!(
            surface.ops,
            vec![
                SurfaceOp::ScrollTo(0.0),
                SurfaceOp::ResetDocumentScroll,
                SurfaceOp::Reflow(Anchor::ChatContainer),
                SurfaceOp::ScrollToTopNextFrame,
            ]
        );
    }

    #[test]
    fn test_missing_container_is_skipped() {
        let mut surface = FakeSurface::phone().without_element(Anchor::ChatContainer);
        surface.scroll_y = 100.0;

        scroll_to_top(&mut surface);

        assert_eq!(surface.scroll_y, 0.0);
        assert_eq!(surface.ops.len(), 3);
    }
}
