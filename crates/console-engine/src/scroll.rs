//! Follow mode tracking
//!
//! New content must not fight a user who scrolled back to read history, so
//! "at bottom" and "follow" are tracked separately: scrolling away disables
//! follow, and only an explicit resume turns it back on.

/// Viewport follow state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollFollowController {
    at_bottom: bool,
    follow_enabled: bool,
}

impl Default for ScrollFollowController {
    fn default() -> Self {
        Self {
            at_bottom: true,
            follow_enabled: true,
        }
    }
}

impl ScrollFollowController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record where the viewport is after a user scroll.
    ///
    /// `distance_from_bottom <= threshold` counts as at bottom. Being away
    /// from the bottom disables follow; returning to it does not re-enable it.
    pub fn record_viewport_position(&mut self, distance_from_bottom: usize, threshold: usize) {
        self.at_bottom = distance_from_bottom <= threshold;
        if !self.at_bottom && self.follow_enabled {
            log::debug!(
                "Follow paused: viewport {} from bottom (threshold {})",
                distance_from_bottom,
                threshold
            );
            self.follow_enabled = false;
        }
    }

    /// Jump back to the newest line and follow again
    pub fn resume_follow(&mut self) {
        self.follow_enabled = true;
        self.at_bottom = true;
    }

    /// Whether new content should scroll the viewport to the newest line
    pub fn should_auto_scroll(&self) -> bool {
        self.follow_enabled
    }

    pub fn is_at_bottom(&self) -> bool {
        self.at_bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_following() {
        let scroll = ScrollFollowController::new();
        assert!(scroll.should_auto_scroll());
        assert!(scroll.is_at_bottom());
    }

    #[test]
    fn test_scroll_up_pauses_until_resume() {
        let mut scroll = ScrollFollowController::new();

        scroll.record_viewport_position(500, 50);
        assert!(!scroll.should_auto_scroll());
        assert!(!scroll.is_at_bottom());

        scroll.resume_follow();
        assert!(scroll.should_auto_scroll());
        assert!(scroll.is_at_bottom());
    }

    #[test]
    fn test_returning_to_bottom_does_not_resume() {
        let mut scroll = ScrollFollowController::new();
        scroll.record_viewport_position(10, 2);
        scroll.record_viewport_position(0, 2);

        assert!(scroll.is_at_bottom());
        assert!(!scroll.should_auto_scroll());
    }

    #[test]
    fn test_within_threshold_keeps_follow() {
        let mut scroll = ScrollFollowController::new();
        scroll.record_viewport_position(50, 50);

        assert!(scroll.is_at_bottom());
        assert!(scroll.should_auto_scroll());
    }
}
