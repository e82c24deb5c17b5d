// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shared sessions and background motion sync.
//!
//! Sampling a motion can be slow, so [`spawn_motion_sync`] runs the sampler on
//! Tokio's blocking pool and only then locks the session to insert the whole
//! batch in one step. A batch is dropped instead of applied when its
//! [`CancelToken`] fired or when the session was reset, restored or closed
//! while the sampler was running.

use crate::error::{check_time, Result, TimelineError};
use crate::session::Session;
use crate::sync::MotionSampler;
use crate::track::EntityKey;
use parking_lot::{Mutex, MutexGuard};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// A session guarded as one unit for multi-threaded hosts.
///
/// Timeline, groups and history sit behind a single lock so no reader ever
/// observes a half-applied change.
#[derive(Debug, Clone, Default)]
pub struct SharedSession {
    inner: Arc<Mutex<Session>>,
}

impl SharedSession {
    /// Wrap a session
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Lock the session for reading or mutation
    pub fn lock(&self) -> MutexGuard<'_, Session> {
        self.inner.lock()
    }

    /// Close the current project.
    ///
    /// Contents and history are dropped; pending background batches will be
    /// discarded.
    pub fn close(&self) {
        let mut session = self.inner.lock();
        session.reset();
        tracing::info!("Closed timeline session");
    }
}

/// Cooperative cancellation flag shared with a background job
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a new, untriggered token
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Why a background batch was not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// The job's token was cancelled
    Cancelled,
    /// The session was reset, restored or closed after the job started
    SessionChanged,
    /// The sampler panicked or the task was aborted
    SamplerFailed,
}

/// Result of a background motion sync
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionSyncOutcome {
    /// Keyframes inserted
    Applied(usize),
    /// Batch dropped without touching the session
    Discarded(DiscardReason),
}

/// Handle to a running background motion sync
#[derive(Debug)]
pub struct MotionSyncHandle {
    token: CancelToken,
    task: JoinHandle<Result<MotionSyncOutcome>>,
}

impl MotionSyncHandle {
    /// Token controlling this job
    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Wait for the job to finish
    pub async fn join(self) -> Result<MotionSyncOutcome> {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("Motion sync task failed: {e}");
                Ok(MotionSyncOutcome::Discarded(DiscardReason::SamplerFailed))
            }
        }
    }
}

/// Sample a motion in the background and apply it to `shared` as one batch.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_motion_sync<S>(
    shared: &SharedSession,
    entity: impl Into<EntityKey>,
    sampler: S,
    duration: f64,
) -> Result<MotionSyncHandle>
where
    S: MotionSampler + Send + 'static,
{
    check_time("motion duration", duration)?;
    let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
        TimelineError::InvalidArgument(format!("background motion sync needs a Tokio runtime: {e}"))
    })?;

    let entity = entity.into();
    let token = CancelToken::new();
    let epoch = shared.lock().epoch();
    let job_token = token.clone();
    let job_session = shared.clone();

    let task = runtime.spawn_blocking(move || {
        let samples = sampler.sample(duration);

        let mut session = job_session.lock();
        if job_token.is_cancelled() {
            tracing::warn!("Discarding cancelled motion batch for '{entity}'");
            return Ok(MotionSyncOutcome::Discarded(DiscardReason::Cancelled));
        }
        if session.epoch() != epoch {
            tracing::warn!("Discarding stale motion batch for '{entity}'");
            return Ok(MotionSyncOutcome::Discarded(DiscardReason::SessionChanged));
        }
        session
            .apply_motion_samples(entity, samples, duration)
            .map(MotionSyncOutcome::Applied)
    });

    Ok(MotionSyncHandle { token, task })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyframe::Payload;
    use crate::sync::LinearSampler;
    use std::sync::mpsc;

    /// Sampler that blocks until the test releases it
    fn gated_sampler() -> (mpsc::Sender<()>, impl MotionSampler + Send + 'static) {
        let (tx, rx) = mpsc::channel::<()>();
        let sampler = move |_: f64| -> Vec<Payload> {
            let _ = rx.recv();
            vec![Payload::Float(0.0), Payload::Float(1.0)]
        };
        (tx, sampler)
    }

    #[tokio::test]
    async fn test_background_sync_applies_batch() {
        let shared = SharedSession::default();
        let sampler = LinearSampler::new(Payload::Float(0.0), Payload::Float(10.0), 5);

        let handle = spawn_motion_sync(&shared, "Hero", sampler, 2.0).unwrap();
        assert_eq!(handle.join().await, Ok(MotionSyncOutcome::Applied(5)));

        let session = shared.lock();
        let times: Vec<_> = session.get_keyframes("Hero").iter().map(|k| k.timestamp).collect();
        assert_eq!(times, [0.0, 0.4, 0.8, 1.2, 1.6]);
        assert_eq!(session.history_stats().undo_count, 1);
    }

    #[tokio::test]
    async fn test_cancelled_batch_is_discarded() {
        let shared = SharedSession::default();
        let (release, sampler) = gated_sampler();

        let handle = spawn_motion_sync(&shared, "Hero", sampler, 1.0).unwrap();
        handle.cancel();
        release.send(()).unwrap();

        assert_eq!(
            handle.join().await,
            Ok(MotionSyncOutcome::Discarded(DiscardReason::Cancelled))
        );
        assert!(shared.lock().get_keyframes("Hero").is_empty());
        assert!(!shared.lock().can_undo());
    }

    #[tokio::test]
    async fn test_closed_session_discards_batch() {
        let shared = SharedSession::default();
        let (release, sampler) = gated_sampler();

        let handle = spawn_motion_sync(&shared, "Hero", sampler, 1.0).unwrap();
        shared.close();
        release.send(()).unwrap();

        assert_eq!(
            handle.join().await,
            Ok(MotionSyncOutcome::Discarded(DiscardReason::SessionChanged))
        );
        assert!(shared.lock().track("Hero").is_none());
    }

    #[test]
    fn test_requires_runtime_and_valid_duration() {
        let shared = SharedSession::default();
        let sampler = LinearSampler::new(Payload::Float(0.0), Payload::Float(1.0), 2);
        assert!(matches!(
            spawn_motion_sync(&shared, "Hero", sampler.clone(), -1.0),
            Err(TimelineError::InvalidArgument(_))
        ));
        assert!(spawn_motion_sync(&shared, "Hero", sampler, 1.0).is_err());
    }
}
