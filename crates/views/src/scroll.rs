//! Background page scroll, as seen by an overlay.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Whatever owns the page scroll (a DOM body, a terminal pager, a test double).
pub trait ScrollControl {
    fn lock(&mut self);
    fn unlock(&mut self);
}

/// For hosts without a scrollable background.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoScroll;

impl ScrollControl for NoScroll {
    fn lock(&mut self) {}
    fn unlock(&mut self) {}
}

/// Counts lock/unlock calls; clones share the counters.
#[derive(Debug, Default, Clone)]
pub struct CountingScroll {
    locks: Arc<AtomicUsize>,
    unlocks: Arc<AtomicUsize>,
}

impl CountingScroll {
    pub fn locks(&self) -> usize { self.locks.load(Ordering::SeqCst) }

    pub fn unlocks(&self) -> usize { self.unlocks.load(Ordering::SeqCst) }

    pub fn is_locked(&self) -> bool { self.locks() > self.unlocks() }
}

impl ScrollControl for CountingScroll {
    fn lock(&mut self) {
        self.locks.fetch_add(1, Ordering::SeqCst);
    }

    fn unlock(&mut self) {
        self.unlocks.fetch_add(1, Ordering::SeqCst);
    }
}
