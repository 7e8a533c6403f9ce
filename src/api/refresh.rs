//! Single-flight access token refresh
//!
//! The first request to hit a 401 becomes the leader and performs the
//! refresh. Requests that hit a 401 while that refresh is running become
//! followers: they park on a oneshot channel and are settled together when
//! the leader finishes.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::oneshot;

use super::error::ApiError;

/// New access token, or the shared reason the refresh failed.
pub type RefreshOutcome = Result<String, Arc<ApiError>>;

/// A follower waiting on the in-flight refresh.
struct PendingRequest {
    tx: oneshot::Sender<RefreshOutcome>,
}

#[derive(Default)]
struct RefreshState {
    is_refreshing: bool,
    waiters: VecDeque<PendingRequest>,
}

/// Per-client refresh state. Clones of one `ApiClient` share it; separately
/// built clients do not.
#[derive(Default)]
pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

/// What a caller that just saw a 401 must do next.
pub enum Ticket<'a> {
    /// No refresh was running; the caller now owns it.
    Leader(RefreshLease<'a>),
    /// A refresh is running; await the receiver for its result.
    Follower(oneshot::Receiver<RefreshOutcome>),
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RefreshState> {
        // State stays consistent across a panic: every mutation is a single
        // assignment or queue operation.
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Become leader, or queue up behind the current one.
    pub fn acquire(&self) -> Ticket<'_> {
        let mut state = self.lock();
        if state.is_refreshing {
            let (tx, rx) = oneshot::channel();
            state.waiters.push_back(PendingRequest { tx });
            tracing::debug!("Refresh in flight, queued ({} waiting)", state.waiters.len());
            Ticket::Follower(rx)
        } else {
            state.is_refreshing = true;
            Ticket::Leader(RefreshLease {
                coordinator: self,
                settled: false,
            })
        }
    }

    pub fn is_refreshing(&self) -> bool {
        self.lock().is_refreshing
    }

    pub fn waiting(&self) -> usize {
        self.lock().waiters.len()
    }

    /// Reset the flag and hand `outcome` to every waiter, oldest first.
    fn settle(&self, outcome: RefreshOutcome) {
        let waiters = {
            let mut state = self.lock();
            state.is_refreshing = false;
            std::mem::take(&mut state.waiters)
        };
        if !waiters.is_empty() {
            tracing::debug!("Releasing {} queued request(s)", waiters.len());
        }
        for waiter in waiters {
            // A dropped receiver means that caller went away; nothing to do.
            let _ = waiter.tx.send(outcome.clone());
        }
    }
}

/// Exclusive right to run the current refresh.
///
/// Must be settled with [`succeed`](Self::succeed) or [`fail`](Self::fail).
/// Dropping it unsettled releases all followers with
/// [`ApiError::RefreshAbandoned`].
pub struct RefreshLease<'a> {
    coordinator: &'a RefreshCoordinator,
    settled: bool,
}

impl RefreshLease<'_> {
    pub fn succeed(mut self, access: String) {
        self.settled = true;
        self.coordinator.settle(Ok(access));
    }

    pub fn fail(mut self, cause: Arc<ApiError>) {
        self.settled = true;
        self.coordinator.settle(Err(cause));
    }
}

impl Drop for RefreshLease<'_> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::warn!("Token refresh dropped before completion");
            self.coordinator
                .settle(Err(Arc::new(ApiError::RefreshAbandoned)));
        }
    }
}
