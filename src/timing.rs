use std::time::{Duration, Instant};

/// Logs the wall time of a scope when dropped.
pub struct ScopedTimer {
    label: String,
    start: Instant,
}

impl ScopedTimer {
    pub fn start(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        log::info!("{} took {:.2?}", self.label, self.elapsed());
    }
}

/// Runs `f` inside a [`ScopedTimer`].
pub fn report_time<T>(label: &str, f: impl FnOnce() -> T) -> T {
    let _timer = ScopedTimer::start(label);
    f()
}
