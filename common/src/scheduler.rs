//! Dirty-flag redraw scheduler.
//!
//! Decouples the rate of incoming telemetry from the rate of redraws. The
//! model mirrors a display-refresh callback:
//!
//! 1. A value change calls [`RedrawScheduler::mark_dirty`], which sets the
//!    dirty flag and registers a frame request, unless one is already pending.
//!    At most one request exists at any time, so bursts never grow a queue.
//! 2. On each display refresh the loop calls [`RedrawScheduler::on_frame`].
//!    A pending request is consumed; if the throttle window since the last
//!    redraw has not elapsed the request is re-registered and the frame is
//!    deferred, otherwise the caller renders.
//! 3. After drawing, [`RedrawScheduler::complete`] clears the flag and stamps
//!    the redraw time.
//!
//! Operator input uses [`RedrawScheduler::mark_dirty_now`], which lets the
//! next refresh render even inside the throttle window.
//!
//! # Guarantee
//!
//! Eventual consistency, not per-update delivery: any number of changes
//! between two refreshes cost one redraw, and that redraw shows the latest
//! values no later than one throttle window after the last change.

use std::time::{Duration, Instant};

/// What the loop should do on this display refresh.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FrameDecision {
    /// Draw now, then call [`RedrawScheduler::complete`].
    Render,
    /// Still dirty but inside the throttle window; request re-registered.
    Deferred,
    /// Nothing owed.
    Idle,
}

/// Counters reported in the host's render statistics log.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct SchedulerStats {
    /// Frame requests registered.
    pub requests: u32,
    /// Changes that arrived while a request was already pending.
    pub coalesced: u32,
    /// Frames deferred by the throttle.
    pub deferrals: u32,
    /// Completed redraws.
    pub redraws: u32,
}

pub struct RedrawScheduler {
    interval: Duration,
    dirty: bool,
    pending: bool,
    bypass_throttle: bool,
    last_redraw: Option<Instant>,
    stats: SchedulerStats,
}

impl RedrawScheduler {
    /// Create a scheduler with the given throttle window.
    ///
    /// Starts dirty with a request pending so the first refresh draws.
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            dirty: true,
            pending: true,
            bypass_throttle: false,
            last_redraw: None,
            stats: SchedulerStats {
                requests: 1,
                coalesced: 0,
                deferrals: 0,
                redraws: 0,
            },
        }
    }

    #[inline]
    pub const fn interval(&self) -> Duration { self.interval }

    #[inline]
    pub const fn is_dirty(&self) -> bool { self.dirty }

    #[inline]
    pub const fn has_pending_request(&self) -> bool { self.pending }

    #[inline]
    pub const fn stats(&self) -> SchedulerStats { self.stats }

    /// Mark the surface stale and request a frame.
    ///
    /// Returns `true` if a new request was registered, `false` if the change
    /// was folded into an already pending one.
    pub fn mark_dirty(&mut self) -> bool {
        self.dirty = true;
        if self.pending {
            self.stats.coalesced = self.stats.coalesced.saturating_add(1);
            false
        } else {
            self.pending = true;
            self.stats.requests = self.stats.requests.saturating_add(1);
            true
        }
    }

    /// Like [`mark_dirty`](Self::mark_dirty), but the next refresh renders
    /// regardless of the throttle window.
    pub fn mark_dirty_now(&mut self) -> bool {
        self.bypass_throttle = true;
        self.mark_dirty()
    }

    /// Display refresh callback.
    pub fn on_frame(
        &mut self,
        now: Instant,
    ) -> FrameDecision {
        if !self.pending {
            return FrameDecision::Idle;
        }
        self.pending = false;

        if !self.dirty {
            return FrameDecision::Idle;
        }

        if !self.bypass_throttle
            && let Some(last) = self.last_redraw
            && now.saturating_duration_since(last) < self.interval
        {
            self.pending = true;
            self.stats.deferrals = self.stats.deferrals.saturating_add(1);
            return FrameDecision::Deferred;
        }

        FrameDecision::Render
    }

    /// Record a finished redraw.
    pub fn complete(
        &mut self,
        now: Instant,
    ) {
        self.dirty = false;
        self.bypass_throttle = false;
        self.last_redraw = Some(now);
        self.stats.redraws = self.stats.redraws.saturating_add(1);
    }

    /// Drop any pending request. Used on teardown so no frame fires after it.
    pub fn cancel(&mut self) {
        self.pending = false;
        self.bypass_throttle = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(16);

    fn ms(n: u64) -> Duration { Duration::from_millis(n) }

    #[test]
    fn test_first_frame_renders() {
        let mut s = RedrawScheduler::new(WINDOW);
        assert!(s.is_dirty());
        assert_eq!(s.on_frame(Instant::now()), FrameDecision::Render);
    }

    #[test]
    fn test_idle_when_clean() {
        let mut s = RedrawScheduler::new(WINDOW);
        let t0 = Instant::now();
        s.on_frame(t0);
        s.complete(t0);
        assert_eq!(s.on_frame(t0 + ms(100)), FrameDecision::Idle);
        assert!(!s.has_pending_request());
    }

    #[test]
    fn test_burst_coalesces_to_one_request() {
        let mut s = RedrawScheduler::new(WINDOW);
        let t0 = Instant::now();
        s.on_frame(t0);
        s.complete(t0);

        let before = s.stats();
        let mut registered = 0;
        for _ in 0..1000 {
            if s.mark_dirty() {
                registered += 1;
            }
        }
        assert_eq!(registered, 1, "only one request may be pending");
        assert_eq!(s.stats().coalesced - before.coalesced, 999);
    }

    #[test]
    fn test_throttle_defers_then_renders() {
        let mut s = RedrawScheduler::new(WINDOW);
        let t0 = Instant::now();
        s.on_frame(t0);
        s.complete(t0);

        s.mark_dirty();
        assert_eq!(s.on_frame(t0 + ms(5)), FrameDecision::Deferred);
        assert!(s.has_pending_request(), "deferred frame re-requests itself");
        assert_eq!(s.on_frame(t0 + ms(10)), FrameDecision::Deferred);
        assert_eq!(s.on_frame(t0 + ms(16)), FrameDecision::Render);
        s.complete(t0 + ms(16));
        assert_eq!(s.stats().redraws, 2);
        assert_eq!(s.stats().deferrals, 2);
    }

    #[test]
    fn test_bypass_renders_inside_window() {
        let mut s = RedrawScheduler::new(WINDOW);
        let t0 = Instant::now();
        s.on_frame(t0);
        s.complete(t0);

        s.mark_dirty_now();
        assert_eq!(s.on_frame(t0 + ms(1)), FrameDecision::Render);
        s.complete(t0 + ms(1));

        // Bypass is one-shot.
        s.mark_dirty();
        assert_eq!(s.on_frame(t0 + ms(2)), FrameDecision::Deferred);
    }

    #[test]
    fn test_cancel_drops_pending() {
        let mut s = RedrawScheduler::new(WINDOW);
        s.cancel();
        assert_eq!(s.on_frame(Instant::now()), FrameDecision::Idle);
    }
}
