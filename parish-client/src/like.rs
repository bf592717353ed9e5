use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::{
    api::{LikeStatus, LikeTarget},
    guard::InFlight,
    Backend, Notifier,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ToggleOutcome {
    /// Another toggle was still in flight, nothing was sent
    Skipped,
    Updated(LikeStatus),
    Failed,
}

/// Like button state for a post or a comment.
///
/// The status only ever changes to what the server answered: nothing is
/// guessed locally, so failures have nothing to roll back.
#[derive(Debug)]
pub struct LikeToggle {
    target: LikeTarget,
    status: Mutex<LikeStatus>,
    in_flight: AtomicBool,
    celebrated: AtomicBool,
}

impl LikeToggle {
    pub fn new(target: LikeTarget) -> LikeToggle {
        LikeToggle::with_status(target, LikeStatus::default())
    }

    pub fn with_status(target: LikeTarget, status: LikeStatus) -> LikeToggle {
        LikeToggle {
            target,
            status: Mutex::new(status),
            in_flight: AtomicBool::new(false),
            celebrated: AtomicBool::new(false),
        }
    }

    pub fn status(&self) -> LikeStatus {
        *self.status.lock()
    }

    /// Take counters the server sent along with something else
    pub(crate) fn reseed(&self, status: LikeStatus) {
        *self.status.lock() = status;
    }

    pub fn is_like_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Best-effort refresh: on failure the current status is kept
    pub async fn load<B: ?Sized + Backend>(&self, backend: &B) {
        match backend.fetch_likes(&self.target).await {
            Ok(status) => *self.status.lock() = status,
            Err(err) => {
                tracing::debug!(like_target = ?self.target, ?err, "failed fetching like status")
            }
        }
    }

    pub async fn toggle<B, N>(&self, backend: &B, notifier: &N) -> ToggleOutcome
    where
        B: ?Sized + Backend,
        N: ?Sized + Notifier,
    {
        let _in_flight = match InFlight::acquire(&self.in_flight) {
            Some(f) => f,
            None => return ToggleOutcome::Skipped,
        };
        let before = self.status();
        match backend.set_liked(&self.target, !before.has_liked).await {
            Ok(after) => {
                *self.status.lock() = after;
                if self.target.is_post()
                    && !before.has_liked
                    && after.has_liked
                    && !self.celebrated.swap(true, Ordering::AcqRel)
                {
                    notifier.success("Thank you for liking this post!");
                }
                ToggleOutcome::Updated(after)
            }
            Err(err) => {
                err.log("updating like");
                notifier.error(&err.toast_message("Failed to update like"));
                ToggleOutcome::Failed
            }
        }
    }
}
