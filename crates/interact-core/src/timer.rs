#![forbid(unsafe_code)]

//! Single-slot deferred collapse.
//!
//! A click on an already-marked node arms the timer. The first of three
//! things wins: the deadline passes (the host sees it through
//! [`CollapseTimer::poll`]), another pointer-down arrives, or a drag starts.
//! The losers are cancelled and discarded.
//!
//! # Invariants
//!
//! - At most one collapse is pending; arming replaces the previous one.
//! - Every arm gets a fresh [`CollapseHandle`]; a stale handle never cancels
//!   a newer collapse.
//! - A pending collapse fires at most once.
//!
//! # Example
//!
//! ```
//! use interact_core::timer::CollapseTimer;
//! use interact_dom::Document;
//! use web_time::{Duration, Instant};
//!
//! let mut doc = Document::new();
//! let node = doc.create_element("li");
//! let mut timer = CollapseTimer::new(Duration::from_millis(600));
//! let now = Instant::now();
//!
//! timer.arm(node, node, now);
//! assert!(timer.poll(now + Duration::from_millis(599)).is_none());
//! assert!(timer.poll(now + Duration::from_millis(600)).is_some());
//! assert!(!timer.is_armed());
//! ```

use interact_dom::NodeId;
use web_time::{Duration, Instant};

/// Identifies one arm of the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollapseHandle(u64);

/// A collapse waiting for its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingCollapse {
    pub handle: CollapseHandle,
    /// Marked node that stays marked when the collapse fires.
    pub keep: NodeId,
    /// Original pointer target; its focus scope bounds the collapse.
    pub origin: NodeId,
    pub deadline: Instant,
}

/// Single-slot cancellable timer driven by host-supplied time.
#[derive(Debug, Clone)]
pub struct CollapseTimer {
    delay: Duration,
    pending: Option<PendingCollapse>,
    next_generation: u64,
}

impl CollapseTimer {
    /// Create an idle timer.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            next_generation: 0,
        }
    }

    /// Configured delay.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm a collapse keeping `keep`, scoped by `origin`, due at
    /// `now + delay`. Replaces any pending collapse.
    pub fn arm(&mut self, keep: NodeId, origin: NodeId, now: Instant) -> CollapseHandle {
        let handle = CollapseHandle(self.next_generation);
        self.next_generation = self.next_generation.wrapping_add(1);
        self.pending = Some(PendingCollapse {
            handle,
            keep,
            origin,
            deadline: now + self.delay,
        });
        handle
    }

    /// Cancel whatever is pending.
    pub fn cancel(&mut self) -> Option<PendingCollapse> {
        self.pending.take()
    }

    /// Cancel only if `handle` is still the pending arm.
    pub fn cancel_handle(&mut self, handle: CollapseHandle) -> bool {
        if self.pending.is_some_and(|pending| pending.handle == handle) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Fire the pending collapse if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<PendingCollapse> {
        match self.pending {
            Some(pending) if now >= pending.deadline => self.pending.take(),
            _ => None,
        }
    }

    /// Whether a collapse is pending.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Deadline of the pending collapse.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|pending| pending.deadline)
    }

    /// The pending collapse, if any.
    #[must_use]
    pub fn pending(&self) -> Option<&PendingCollapse> {
        self.pending.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interact_dom::Document;

    fn nodes() -> (NodeId, NodeId) {
        let mut doc = Document::new();
        (doc.create_element("li"), doc.create_element("li"))
    }

    #[test]
    fn fires_once_at_deadline() {
        let (a, _) = nodes();
        let mut timer = CollapseTimer::new(Duration::from_millis(600));
        let now = Instant::now();
        let handle = timer.arm(a, a, now);

        assert_eq!(timer.deadline(), Some(now + Duration::from_millis(600)));
        assert!(timer.poll(now + Duration::from_millis(100)).is_none());
        let fired = timer.poll(now + Duration::from_secs(1)).expect("due");
        assert_eq!(fired.handle, handle);
        assert_eq!(fired.keep, a);
        assert!(timer.poll(now + Duration::from_secs(2)).is_none());
    }

    #[test]
    fn rearm_replaces_and_stale_handle_is_inert() {
        let (a, b) = nodes();
        let mut timer = CollapseTimer::new(Duration::from_millis(600));
        let now = Instant::now();
        let first = timer.arm(a, a, now);
        let second = timer.arm(b, b, now + Duration::from_millis(10));
        assert_ne!(first, second);

        assert!(!timer.cancel_handle(first));
        assert!(timer.is_armed());
        assert!(timer.cancel_handle(second));
        assert!(!timer.is_armed());
    }

    #[test]
    fn cancel_discards_pending() {
        let (a, _) = nodes();
        let mut timer = CollapseTimer::new(Duration::from_millis(600));
        let now = Instant::now();
        timer.arm(a, a, now);
        assert!(timer.cancel().is_some());
        assert!(timer.cancel().is_none());
        assert!(timer.poll(now + Duration::from_secs(5)).is_none());
    }
}
