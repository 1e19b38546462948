//! Cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation signal.
///
/// Clones observe the same flag. The resolver polls it before every nested
/// parse and every nested resolve; nothing is pre-empted.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Whether a result covers everything or stopped at a cancellation point.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Completeness {
    #[default]
    Complete,
    Cancelled,
}

impl Completeness {
    /// Combined completeness of two parts of one result.
    #[inline]
    #[must_use]
    pub fn and(self, other: Completeness) -> Completeness {
        if self == Completeness::Cancelled || other == Completeness::Cancelled {
            Completeness::Cancelled
        } else {
            Completeness::Complete
        }
    }

    #[inline]
    pub fn is_complete(self) -> bool {
        self == Completeness::Complete
    }
}
