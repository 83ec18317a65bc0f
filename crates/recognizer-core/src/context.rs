//! Per-call cancellation and deadline.
//!
//! Every backend operation takes a [`RequestContext`]. The call is abandoned
//! as soon as the token is cancelled or the deadline passes, whichever comes
//! first; the in-flight HTTP request is dropped with it.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// No deadline, never cancelled unless [`RequestContext::cancel`] is called.
    pub fn background() -> Self { Self::default() }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { token: CancellationToken::new(), deadline: Some(Instant::now() + timeout) }
    }

    /// Child context: cancelled with its parent, deadline never later than the parent's.
    pub fn child(&self, timeout: Option<Duration>) -> Self {
        let own = timeout.map(|t| Instant::now() + t);
        let deadline = match (self.deadline, own) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        Self { token: self.token.child_token(), deadline }
    }

    pub fn deadline(&self) -> Option<Instant> { self.deadline }

    pub fn token(&self) -> &CancellationToken { &self.token }

    pub fn cancel(&self) { self.token.cancel(); }

    pub fn is_cancelled(&self) -> bool { self.token.is_cancelled() }

    /// Drive `fut` to completion unless the context ends first.
    pub async fn run<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.token.is_cancelled() {
            return Err(Error::Cancelled);
        }
        if self.deadline.is_some_and(|d| d <= Instant::now()) {
            return Err(Error::DeadlineExceeded);
        }
        let expiry = async {
            match self.deadline {
                Some(d) => tokio::time::sleep_until(d).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(Error::Cancelled),
            _ = expiry => Err(Error::DeadlineExceeded),
            res = fut => res,
        }
    }
}
