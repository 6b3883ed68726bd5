//! Hover tooltip that only appears after the pointer has rested on a
//! control for a while.
//!
//! Time is passed in as a [`Duration`] since an arbitrary epoch (egui's
//! `input.time`, a test clock), so the machine never reads a wall clock.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipPhase {
    Idle,
    /// Pointer entered at `since`; waiting for the delay to elapse.
    Pending { since: Duration },
    Shown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayedTooltip {
    delay: Duration,
    phase: TooltipPhase,
    /// Pointer or focus is on the control. A click hides the tooltip but
    /// keeps this set, so it only re-arms after a leave.
    engaged: bool,
}

impl DelayedTooltip {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            phase: TooltipPhase::Idle,
            engaged: false,
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn phase(&self) -> TooltipPhase {
        self.phase
    }

    pub fn is_shown(&self) -> bool {
        self.phase == TooltipPhase::Shown
    }

    /// Pointer (or focus, or touch) entered the control. Re-entering while
    /// pending or shown keeps the current phase.
    pub fn enter(&mut self, now: Duration) {
        self.engaged = true;
        if self.phase == TooltipPhase::Idle {
            self.phase = TooltipPhase::Pending { since: now };
        }
    }

    pub fn leave(&mut self) {
        self.engaged = false;
        self.phase = TooltipPhase::Idle;
    }

    /// Activating the control hides the tooltip and cancels a pending one.
    pub fn click(&mut self) {
        self.phase = TooltipPhase::Idle;
    }

    /// Advance the clock. Returns `true` exactly when the tooltip becomes
    /// visible.
    pub fn tick(&mut self, now: Duration) -> bool {
        match self.phase {
            TooltipPhase::Pending { since } if now.saturating_sub(since) >= self.delay => {
                self.phase = TooltipPhase::Shown;
                true
            }
            _ => false,
        }
    }

    /// Time left until a pending tooltip shows, for scheduling a repaint.
    pub fn remaining(&self, now: Duration) -> Option<Duration> {
        match self.phase {
            TooltipPhase::Pending { since } => {
                Some(self.delay.saturating_sub(now.saturating_sub(since)))
            }
            _ => None,
        }
    }

    /// Feed the hover/focus state of one frame, then tick. Only the edge
    /// from inactive to active enters.
    pub fn update(&mut self, active: bool, now: Duration) -> bool {
        if !active {
            self.leave();
            return false;
        }
        if !self.engaged {
            self.enter(now);
        }
        self.tick(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn leave_before_delay_never_shows() {
        let mut t = DelayedTooltip::from_millis(500);
        t.enter(ms(0));
        assert!(!t.tick(ms(499)));
        t.leave();
        assert!(!t.tick(ms(10_000)));
        assert_eq!(t.phase(), TooltipPhase::Idle);
    }

    #[test]
    fn shows_exactly_once_until_leave() {
        let mut t = DelayedTooltip::from_millis(500);
        t.enter(ms(100));
        assert!(!t.tick(ms(599)));
        assert!(t.tick(ms(600)));
        assert!(!t.tick(ms(700)));
        assert!(t.is_shown());
        t.leave();
        t.enter(ms(1000));
        assert!(t.tick(ms(1500)));
    }

    #[test]
    fn click_cancels_pending() {
        let mut t = DelayedTooltip::from_millis(300);
        t.enter(ms(0));
        t.click();
        assert!(!t.tick(ms(1000)));
    }

    #[test]
    fn remaining_counts_down() {
        let mut t = DelayedTooltip::from_millis(500);
        assert_eq!(t.remaining(ms(0)), None);
        t.enter(ms(0));
        assert_eq!(t.remaining(ms(200)), Some(ms(300)));
        assert_eq!(t.remaining(ms(900)), Some(Duration::ZERO));
        t.tick(ms(900));
        assert_eq!(t.remaining(ms(900)), None);
    }

    #[test]
    fn reentering_does_not_restart_timer() {
        let mut t = DelayedTooltip::from_millis(500);
        t.enter(ms(0));
        t.enter(ms(400));
        assert!(t.tick(ms(500)));
    }

    #[test]
    fn update_follows_hover() {
        let mut t = DelayedTooltip::from_millis(100);
        assert!(!t.update(true, ms(0)));
        assert!(t.update(true, ms(100)));
        assert!(!t.update(false, ms(150)));
        assert!(!t.is_shown());
    }

    #[test]
    fn click_stays_hidden_while_hover_is_held() {
        let mut t = DelayedTooltip::from_millis(500);
        assert!(!t.update(true, ms(0)));
        assert!(t.update(true, ms(600)));
        t.click();
        assert!(!t.update(true, ms(610)));
        assert!(!t.update(true, ms(1200)));
        assert!(!t.update(true, ms(5000)));
        assert_eq!(t.phase(), TooltipPhase::Idle);

        // Leaving and coming back re-arms.
        assert!(!t.update(false, ms(5100)));
        assert!(!t.update(true, ms(5200)));
        assert!(t.update(true, ms(5700)));
    }
}
