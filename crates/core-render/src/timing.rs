//! Render durations, kept process-wide so the event loop can report them at
//! shutdown without threading the engine through.

use std::sync::atomic::{AtomicU64, Ordering};

static LAST_RENDER_NS: AtomicU64 = AtomicU64::new(0);
static MAX_RENDER_NS: AtomicU64 = AtomicU64::new(0);
static TOTAL_RENDER_NS: AtomicU64 = AtomicU64::new(0);

pub fn record_render_ns(ns: u64) {
    LAST_RENDER_NS.store(ns, Ordering::Relaxed);
    MAX_RENDER_NS.fetch_max(ns, Ordering::Relaxed);
    TOTAL_RENDER_NS.fetch_add(ns, Ordering::Relaxed);
}

pub fn last_render_ns() -> u64 {
    LAST_RENDER_NS.load(Ordering::Relaxed)
}

/// Slowest render seen so far.
pub fn max_render_ns() -> u64 {
    MAX_RENDER_NS.load(Ordering::Relaxed)
}

pub fn total_render_ns() -> u64 {
    TOTAL_RENDER_NS.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_and_total_accumulate() {
        let total_before = total_render_ns();
        record_render_ns(5_000_000_000);
        record_render_ns(1_234);
        assert!(max_render_ns() >= 5_000_000_000);
        assert!(total_render_ns() >= total_before + 5_000_001_234);
    }
}
