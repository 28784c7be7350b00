//! Lightweight performance instrumentation.
//!
//! Timing scopes are free when disabled. When enabled (`--perf`) each scope
//! reports its elapsed time through `tracing` on drop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

static ENABLED: AtomicBool = AtomicBool::new(false);

#[derive(Debug)]
pub struct Scope {
    name: &'static str,
    start: Option<Instant>,
}

impl Scope {
    /// Milliseconds since the scope opened, `None` when timing is disabled.
    pub fn elapsed_ms(&self) -> Option<f64> {
        self.start
            .map(|start| start.elapsed().as_secs_f64() * 1000.0)
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        if let Some(elapsed_ms) = self.elapsed_ms() {
            tracing::info!(target: "apiref::perf", scope = self.name, elapsed_ms, "timing");
        }
    }
}

pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// Open a timing scope that reports when dropped.
pub fn scope(name: &'static str) -> Scope {
    Scope {
        name,
        start: is_enabled().then(Instant::now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_enabled_toggles_runtime_flag() {
        set_enabled(true);
        assert!(is_enabled());
        let timed = scope("test.enabled");
        assert!(timed.elapsed_ms().is_some());

        set_enabled(false);
        assert!(!is_enabled());
        let untimed = scope("test.disabled");
        assert!(untimed.elapsed_ms().is_none());
    }
}
