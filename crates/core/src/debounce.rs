//! Delay-then-commit policy for typed search input.
//!
//! Keystrokes update a transient value immediately so the input echoes,
//! but the value is only committed to the filter state once it has been
//! stable for the configured interval. An external change to the
//! committed value (e.g. "Clear All") overrides the transient value at
//! once and drops any pending commit.
//!
//! Time is passed in explicitly, which keeps the policy independent of
//! any timer or runtime.

use std::time::{Duration, Instant};

/// Quiet period before typed input is committed.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(800);

#[derive(Debug, Clone)]
pub struct Debouncer {
    interval: Duration,
    /// What the input shows right now.
    transient: String,
    /// Last value committed (or synced from outside).
    committed: String,
    /// When the transient value last changed, while a commit is pending.
    changed_at: Option<Instant>,
}

impl Debouncer {
    pub fn new(committed: impl Into<String>, interval: Duration) -> Self {
        let committed = committed.into();
        Self {
            interval,
            transient: committed.clone(),
            committed,
            changed_at: None,
        }
    }

    /// Record typed input. Returns the value to echo.
    pub fn input(&mut self, value: impl Into<String>, now: Instant) -> &str {
        self.transient = value.into();
        self.changed_at = (self.transient != self.committed).then_some(now);
        &self.transient
    }

    /// Commit the transient value if it has been stable long enough.
    ///
    /// Returns the newly committed value, at most once per change.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let changed_at = self.changed_at?;
        if now.saturating_duration_since(changed_at) < self.interval {
            return None;
        }
        self.changed_at = None;
        self.committed = self.transient.clone();
        Some(self.committed.clone())
    }

    /// Adopt a value that changed outside the input, discarding anything
    /// typed but not yet committed.
    pub fn sync_external(&mut self, value: impl Into<String>) {
        let value = value.into();
        self.transient = value.clone();
        self.committed = value;
        self.changed_at = None;
    }

    /// Instant at which the pending value becomes committable, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.changed_at.map(|t| t + self.interval)
    }

    /// What the input shows right now.
    pub fn transient(&self) -> &str {
        &self.transient
    }
}
