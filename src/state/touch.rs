// Touch gesture state for the sphere container.

/// Browsers replay a tap as mouseover/mouseenter shortly after touchend.
pub const EMULATED_MOUSE_WINDOW_MS: f64 = 800.0;

#[derive(Default, Debug, Clone)]
pub struct TouchState {
    pub dragging: bool,
    /// Marker index the current touch started on, if any.
    pub touched_index: Option<usize>,
    last_touch_end_ms: Option<f64>,
}

impl TouchState {
    pub fn begin(&mut self, touched_index: Option<usize>) {
        self.dragging = true;
        if touched_index.is_some() {
            self.touched_index = touched_index;
        }
    }

    /// Ends the gesture at `now_ms`, returning the marker that should lose selection.
    pub fn end(&mut self, now_ms: f64) -> Option<usize> {
        self.dragging = false;
        self.last_touch_end_ms = Some(now_ms);
        self.touched_index.take()
    }

    /// Mouse enter/leave count only when they cannot be a replayed tap.
    pub fn accepts_hover(&self, now_ms: f64) -> bool {
        if self.dragging {
            return false;
        }
        match self.last_touch_end_ms {
            Some(end) => now_ms - end > EMULATED_MOUSE_WINDOW_MS || now_ms < end,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_releases_the_touched_marker_once() {
        let mut t = TouchState::default();
        t.begin(Some(4));
        t.begin(None);
        assert!(t.dragging);
        assert_eq!(t.end(100.0), Some(4));
        assert!(!t.dragging);
        assert_eq!(t.end(120.0), None);
    }

    #[test]
    fn mouse_without_touch_is_hover() {
        let t = TouchState::default();
        assert!(t.accepts_hover(0.0));
        assert!(t.accepts_hover(1_000_000.0));
    }

    #[test]
    fn tap_does_not_reselect_through_emulated_mouseenter() {
        let mut t = TouchState::default();
        t.begin(Some(2));
        assert!(!t.accepts_hover(10.0));
        assert_eq!(t.end(50.0), Some(2));
        // replayed mouseenter right after the finger lifts
        assert!(!t.accepts_hover(60.0));
        assert!(!t.accepts_hover(50.0 + EMULATED_MOUSE_WINDOW_MS));
        assert!(t.accepts_hover(51.0 + EMULATED_MOUSE_WINDOW_MS));
    }
}
