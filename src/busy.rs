use crate::error::AppError;
use std::sync::atomic::{AtomicBool, Ordering};

/// Disables a control while its request is in flight.
#[derive(Debug, Default)]
pub struct BusyFlag(AtomicBool);

/// Clears the flag when dropped
#[derive(Debug)]
pub struct BusyGuard<'a>(&'a AtomicBool);

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Fails with `AppError::Busy` if another request already holds the flag
    pub fn acquire(&self) -> Result<BusyGuard<'_>, AppError> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| BusyGuard(&self.0))
            .map_err(|_| AppError::Busy)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_is_rejected_until_release() {
        let flag = BusyFlag::new();
        let guard = flag.acquire().unwrap();
        assert!(flag.is_busy());
        assert!(matches!(flag.acquire(), Err(AppError::Busy)));
        drop(guard);
        assert!(!flag.is_busy());
        assert!(flag.acquire().is_ok());
    }
}
