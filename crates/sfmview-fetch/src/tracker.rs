use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio_util::sync::CancellationToken;

/// Identity of a logical request: one reconstruction of one scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestKey {
    /// The scene id.
    pub scene_id: u64,
    /// Index of the reconstruction within the scene.
    pub reconstruction: u32,
}

impl RequestKey {
    /// Create a request key.
    pub fn new(scene_id: u64, reconstruction: u32) -> Self {
        Self {
            scene_id,
            reconstruction,
        }
    }
}

/// Handle of an in-flight request.
///
/// A ticket stays current until a newer request begins on the same tracker
/// or the tracker is torn down.
#[derive(Debug, Clone)]
pub struct RequestTicket {
    key: RequestKey,
    generation: u64,
    cancel: CancellationToken,
    latest: Arc<AtomicU64>,
}

impl RequestTicket {
    /// The request key.
    pub fn key(&self) -> RequestKey {
        self.key
    }

    /// Generation of the request, increasing with every new request.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Token cancelled when the request is superseded or torn down.
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Whether the results of the request may still be applied.
    pub fn is_current(&self) -> bool {
        !self.cancel.is_cancelled() && self.latest.load(Ordering::Acquire) == self.generation
    }

    /// Wait until the request is cancelled.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }
}

/// Hands out request tickets and cancels the superseded ones.
///
/// Only the latest ticket of a tracker is current. Dropping the tracker
/// cancels every ticket it handed out.
#[derive(Debug, Default)]
pub struct RequestTracker {
    root: CancellationToken,
    latest: Arc<AtomicU64>,
    current: Mutex<Option<CancellationToken>>,
}

impl RequestTracker {
    /// Create a tracker without any request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new request, cancelling the previous one.
    ///
    /// # Arguments
    ///
    /// * `key` - The requested reconstruction.
    ///
    /// # Returns
    ///
    /// The ticket of the new request. After [`RequestTracker::teardown`] the
    /// ticket is born cancelled.
    pub fn begin(&self, key: RequestKey) -> RequestTicket {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(previous) = current.take() {
            previous.cancel();
        }

        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        let cancel = self.root.child_token();
        *current = Some(cancel.clone());

        log::debug!(
            "request {generation} for scene {} reconstruction {}",
            key.scene_id,
            key.reconstruction
        );

        RequestTicket {
            key,
            generation,
            cancel,
            latest: self.latest.clone(),
        }
    }

    /// Generation of the latest request, 0 before the first one.
    pub fn latest_generation(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }

    /// Cancel every request, current and future.
    pub fn teardown(&self) {
        log::debug!("tearing down request tracker");
        self.root.cancel();
    }

    /// Whether the tracker was torn down.
    pub fn is_torn_down(&self) -> bool {
        self.root.is_cancelled()
    }
}

impl Drop for RequestTracker {
    fn drop(&mut self) {
        self.root.cancel();
    }
}
