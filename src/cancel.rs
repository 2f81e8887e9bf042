//! Cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{Error, Result};

/// A cloneable flag checked between k-means iterations, agglomerative merges
/// and auto-search candidates.
///
/// All clones share one flag: cancelling any clone cancels them all.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Return `Err(Error::Cancelled)` once cancellation has been requested.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            tracing::debug!("cancellation observed");
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Check an optional token.
pub(crate) fn check(token: Option<&CancelToken>) -> Result<()> {
    token.map_or(Ok(()), CancelToken::check)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(token.check().is_ok());

        other.cancel();
        assert!(token.is_cancelled());
        assert_eq!(token.check(), Err(Error::Cancelled));
    }

    #[test]
    fn missing_token_never_cancels() {
        assert!(check(None).is_ok());
    }
}
