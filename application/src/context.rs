//! Cancellable call context.
//!
//! A [`CallContext`] carries a cancellation token and an optional deadline.
//! Children derived from it are cancelled whenever the parent is, and a
//! child deadline can only be earlier than the parent's.

use crate::ports::backend::BackendError;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Why a context finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoneReason {
    Cancelled,
    DeadlineExceeded,
}

impl From<DoneReason> for BackendError {
    fn from(reason: DoneReason) -> Self {
        match reason {
            DoneReason::Cancelled => BackendError::Cancelled,
            DoneReason::DeadlineExceeded => BackendError::Timeout,
        }
    }
}

/// Cancellation and deadline scope for one or more backend calls
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {
    /// Root context with no deadline
    pub fn new() -> Self {
        Self::default()
    }

    /// Root context driven by an existing token (e.g. one cancelled on Ctrl-C)
    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Bound this context by `timeout` from now, never extending an earlier deadline.
    ///
    /// A timeout too large to represent as an instant leaves the deadline unchanged.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    /// Bound this context by `deadline`, never extending an earlier deadline
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    /// Derived context sharing this deadline; cancelling it leaves the parent untouched
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Derived context additionally bounded by `timeout`
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        self.child().with_timeout(timeout)
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline (zero once it has passed)
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Completes when the context is cancelled or its deadline passes
    pub async fn done(&self) -> DoneReason {
        match self.deadline {
            Some(deadline) => tokio::select! {
                biased;
                _ = self.token.cancelled() => DoneReason::Cancelled,
                _ = tokio::time::sleep_until(deadline) => DoneReason::DeadlineExceeded,
            },
            None => {
                self.token.cancelled().await;
                DoneReason::Cancelled
            }
        }
    }

    /// Drive `fut` until it completes or this context is done.
    ///
    /// When the context finishes first, `fut` is dropped without being
    /// polled again.
    pub async fn run<T, F>(&self, fut: F) -> Result<T, BackendError>
    where
        F: Future<Output = Result<T, BackendError>>,
    {
        tokio::select! {
            biased;
            reason = self.done() => Err(reason.into()),
            result = fut => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_cancelled_with_parent() {
        let parent = CallContext::new();
        let child = parent.child();
        let grandchild = child.child();

        parent.cancel();
        assert!(child.is_cancelled());
        assert!(grandchild.is_cancelled());
    }

    #[test]
    fn test_cancelling_child_leaves_parent() {
        let parent = CallContext::new();
        let child = parent.child();

        child.cancel();
        assert!(child.is_cancelled());
        assert!(!parent.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_child_timeout_never_extends_parent_deadline() {
        let parent = CallContext::new().with_timeout(Duration::from_millis(50));
        let child = parent.child_with_timeout(Duration::from_secs(10));
        assert_eq!(child.deadline(), parent.deadline());

        let tighter = parent.child_with_timeout(Duration::from_millis(10));
        assert!(tighter.deadline() < parent.deadline());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unrepresentable_timeout_keeps_deadline() {
        let ctx = CallContext::new().with_timeout(Duration::MAX);
        assert_eq!(ctx.deadline(), None);

        let bounded = CallContext::new().with_timeout(Duration::from_millis(50));
        let child = bounded.child_with_timeout(Duration::MAX);
        assert_eq!(child.deadline(), bounded.deadline());
    }

    #[tokio::test(start_paused = true)]
    async fn test_remaining_saturates() {
        let ctx = CallContext::new().with_timeout(Duration::from_millis(20));
        assert_eq!(ctx.remaining(), Some(Duration::from_millis(20)));

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(ctx.remaining(), Some(Duration::ZERO));
        assert_eq!(CallContext::new().remaining(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_times_out() {
        let ctx = CallContext::new().with_timeout(Duration::from_millis(10));
        let result: Result<(), _> = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            })
            .await;
        assert_eq!(result, Err(BackendError::Timeout));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_observes_cancellation() {
        let ctx = CallContext::new();
        let canceller = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            canceller.cancel();
        });

        let result: Result<(), _> = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            })
            .await;
        assert_eq!(result, Err(BackendError::Cancelled));
    }

    #[tokio::test]
    async fn test_run_passes_result_through() {
        let ctx = CallContext::new();
        let result = ctx.run(async { Ok::<_, BackendError>("done") }).await;
        assert_eq!(result, Ok("done"));
    }

    #[tokio::test]
    async fn test_already_cancelled_context_skips_future() {
        let ctx = CallContext::new();
        ctx.cancel();
        let result = ctx
            .run(async { Err::<(), _>(BackendError::Other("polled".to_string())) })
            .await;
        assert_eq!(result, Err(BackendError::Cancelled));
    }
}
