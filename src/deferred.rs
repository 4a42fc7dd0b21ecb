use std::any::Any;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Receives GPU-visible objects whose destruction must wait for in-flight work.
pub trait DeferredRelease: Send + Sync {
    /// Take ownership of `object` and drop it once the GPU no longer uses it.
    fn query_on_delete(&self, object: Box<dyn Any + Send>);
}

struct PendingDelete {
    fence: u64,
    object: Box<dyn Any + Send>,
}

struct DeletionQueueInner {
    /// Fence value that will be signalled when the current frame completes.
    frame_fence: u64,
    pending: VecDeque<PendingDelete>,
}

/// A retirement queue keyed by a completion fence.
///
/// Objects queued during a frame are tagged with that frame's fence value and
/// released once the device reports that value as completed.
pub struct DeletionQueue(Mutex<DeletionQueueInner>);

impl DeletionQueue {
    /// Create an empty queue. The first frame signals fence value 1.
    pub fn new() -> Self {
        DeletionQueue(Mutex::new(DeletionQueueInner {
            frame_fence: 1,
            pending: VecDeque::new(),
        }))
    }

    /// Close the current frame.
    ///
    /// Returns the fence value the caller must signal on its queue after
    /// submitting the frame's command lists.
    pub fn advance_frame(&self) -> u64 {
        let mut inner = self.lock();
        let fence = inner.frame_fence;
        inner.frame_fence += 1;
        fence
    }

    /// Drop every object whose fence value is at most `completed`.
    ///
    /// Returns the number of objects released.
    pub fn release_completed(&self, completed: u64) -> usize {
        // Drop outside the lock so object destructors may queue more work.
        let released: Vec<PendingDelete> = {
            let mut inner = self.lock();
            let mut released = Vec::new();
            while inner
                .pending
                .front()
                .is_some_and(|pending| pending.fence <= completed)
            {
                released.extend(inner.pending.pop_front());
            }
            released
        };

        if !released.is_empty() {
            tracing::debug!(count = released.len(), completed, "released deferred objects");
        }
        released.len()
    }

    /// Drop everything immediately. Only valid once the device is idle.
    pub fn flush(&self) -> usize {
        let released = std::mem::take(&mut self.lock().pending);
        released.len()
    }

    /// Number of objects waiting for their fence.
    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }

    /// The fence value objects queued now will wait for.
    pub fn frame_fence(&self) -> u64 {
        self.lock().frame_fence
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DeletionQueueInner> {
        // A panic while holding the lock cannot leave the queue half-updated.
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for DeletionQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl DeferredRelease for DeletionQueue {
    fn query_on_delete(&self, object: Box<dyn Any + Send>) {
        let mut inner = self.lock();
        let fence = inner.frame_fence;
        inner.pending.push_back(PendingDelete { fence, object });
        tracing::debug!(fence, pending = inner.pending.len(), "queued object for deferred release");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct DropFlag(Arc<std::sync::atomic::AtomicBool>);

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, std::sync::atomic::Ordering::SeqCst);
        }
    }

    fn flagged() -> (Arc<std::sync::atomic::AtomicBool>, Box<dyn Any + Send>) {
        let flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
        (flag.clone(), Box::new(DropFlag(flag)))
    }

    fn dropped(flag: &std::sync::atomic::AtomicBool) -> bool {
        flag.load(std::sync::atomic::Ordering::SeqCst)
    }

    #[test]
    fn objects_wait_for_their_frame_fence() {
        let queue = DeletionQueue::new();
        let (first, object) = flagged();
        queue.query_on_delete(object);
        let fence = queue.advance_frame();

        let (second, object) = flagged();
        queue.query_on_delete(object);
        let next_fence = queue.advance_frame();
        assert_eq!(next_fence, fence + 1);

        assert_eq!(queue.release_completed(fence - 1), 0);
        assert!(!dropped(&first));

        assert_eq!(queue.release_completed(fence), 1);
        assert!(dropped(&first));
        assert!(!dropped(&second));
        assert_eq!(queue.pending(), 1);

        assert_eq!(queue.release_completed(next_fence), 1);
        assert!(dropped(&second));
    }

    #[test]
    fn flush_releases_everything() {
        let queue = DeletionQueue::new();
        let (flag, object) = flagged();
        queue.query_on_delete(object);
        assert_eq!(queue.flush(), 1);
        assert!(dropped(&flag));
        assert_eq!(queue.pending(), 0);
    }
}
