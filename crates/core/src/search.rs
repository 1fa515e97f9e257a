//! Search bounds and results shared by both minters.
//!
//! Bounds are checked between attempts, never inside one. A search that hits
//! any bound reports `SearchExhausted` exactly like a version 0 counter
//! overflow.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::digest::Digest;
use crate::error::ExhaustionReason;
use crate::params::DEFAULT_ATTEMPT_BUDGET;

/// A stamp that met its difficulty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Stamp text, exactly the bytes that were hashed
    pub stamp: String,
    /// Candidates hashed, including the winning one
    pub attempts: u64,
    pub digest: Digest,
}

/// Mask for how often the clock is read (every 1024 attempts)
const DEADLINE_CHECK_MASK: u64 = 0x3FF;

/// Attempt ceiling, deadline and cancellation flag for one search.
#[derive(Debug, Clone)]
pub struct SearchLimits {
    max_attempts: u64,
    deadline: Option<Instant>,
    cancel: Vec<Arc<AtomicBool>>,
}

impl SearchLimits {
    pub fn new() -> Self {
        Self {
            max_attempts: DEFAULT_ATTEMPT_BUDGET,
            deadline: None,
            cancel: Vec::new(),
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Stop when `cancel` is raised. Flags accumulate; any raised flag stops
    /// the search.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel.push(cancel);
        self
    }

    pub fn max_attempts(&self) -> u64 {
        self.max_attempts
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.iter().any(|flag| flag.load(Ordering::Relaxed))
    }

    /// Whether another attempt may start after `attempts` have completed.
    #[inline]
    pub fn check(&self, attempts: u64) -> Result<(), ExhaustionReason> {
        if attempts >= self.max_attempts {
            return Err(ExhaustionReason::AttemptBudget);
        }
        if self.is_cancelled() {
            return Err(ExhaustionReason::Cancelled);
        }
        if let Some(deadline) = self.deadline {
            if attempts & DEADLINE_CHECK_MASK == 0 && Instant::now() >= deadline {
                return Err(ExhaustionReason::Deadline);
            }
        }
        Ok(())
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempt_budget() {
        let limits = SearchLimits::new().with_max_attempts(3);
        assert!(limits.check(0).is_ok());
        assert!(limits.check(2).is_ok());
        assert_eq!(limits.check(3), Err(ExhaustionReason::AttemptBudget));
    }

    #[test]
    fn test_any_cancel_flag_stops() {
        let caller = Arc::new(AtomicBool::new(false));
        let siblings = Arc::new(AtomicBool::new(false));
        let limits = SearchLimits::new()
            .with_cancel(Arc::clone(&caller))
            .with_cancel(Arc::clone(&siblings));
        let clone = limits.clone();

        assert!(limits.check(1).is_ok());
        siblings.store(true, Ordering::SeqCst);
        assert_eq!(limits.check(1), Err(ExhaustionReason::Cancelled));
        assert_eq!(clone.check(1), Err(ExhaustionReason::Cancelled));
        assert!(!caller.load(Ordering::SeqCst));
    }

    #[test]
    fn test_expired_deadline() {
        let limits = SearchLimits::new().with_deadline(Instant::now());
        // The clock is only consulted on multiples of 1024.
        assert!(limits.check(1).is_ok());
        assert_eq!(limits.check(0), Err(ExhaustionReason::Deadline));
        assert_eq!(limits.check(2048), Err(ExhaustionReason::Deadline));
    }
}
