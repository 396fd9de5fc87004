use std::sync::atomic::{AtomicBool, Ordering};

/// Once-only start flag for the refresh task.
///
/// Hosts may run their initialization code more than once; only the first
/// [`try_claim`](Self::try_claim) succeeds.
#[derive(Debug, Default)]
pub struct StartGuard {
    claimed: AtomicBool,
}

/// Process-wide guard used by [`RefreshScheduler::start`](super::RefreshScheduler::start).
pub static PROCESS_GUARD: StartGuard = StartGuard::new();

impl StartGuard {
    /// Create an unclaimed guard.
    pub const fn new() -> Self {
        Self {
            claimed: AtomicBool::new(false),
        }
    }

    /// Claim the guard. Returns `true` for exactly one caller.
    pub fn try_claim(&self) -> bool {
        self.claimed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Returns `true` once the guard has been claimed.
    pub fn is_claimed(&self) -> bool {
        self.claimed.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn only_first_claim_succeeds() {
        let guard = StartGuard::new();
        assert!(!guard.is_claimed());
        assert!(guard.try_claim());
        assert!(!guard.try_claim());
        assert!(guard.is_claimed());
    }

    #[test]
    fn concurrent_claims_have_one_winner() {
        let guard = Arc::new(StartGuard::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let guard = Arc::clone(&guard);
                std::thread::spawn(move || guard.try_claim())
            })
            .collect();
        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap_or(false))
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }
}
