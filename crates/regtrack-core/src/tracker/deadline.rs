//! Per-pass deadline checked before every store call.

use std::time::{Duration, Instant};

use crate::errors::{TrackerError, TrackerResult};

#[derive(Debug, Clone, Copy)]
pub struct PassDeadline {
    started: Instant,
    timeout: Option<Duration>,
}

impl PassDeadline {
    pub fn start(timeout: Option<Duration>) -> Self {
        Self {
            started: Instant::now(),
            timeout,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Err when the pass has run past its timeout. Unbounded passes never fail.
    pub fn check(&self, operation: &'static str) -> TrackerResult<()> {
        let elapsed = self.elapsed();
        match self.timeout {
            Some(timeout) if elapsed >= timeout => {
                Err(TrackerError::DeadlineExceeded { operation, elapsed })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_never_expires() {
        assert!(PassDeadline::start(None).check("list_current").is_ok());
    }

    #[test]
    fn test_zero_timeout_expires_immediately() {
        let err = PassDeadline::start(Some(Duration::ZERO))
            .check("open")
            .unwrap_err();
        assert!(matches!(err, TrackerError::DeadlineExceeded { operation: "open", .. }));
    }
}
