//=========================================================================
// Transition Queue
//=========================================================================
//
// Queue for scene-switch requests.
//
// Scenes queue requests here during updates. The stage drains the queue
// at the tick boundary, after the active scene's update returns, so a
// scene is never torn down while its own update is on the stack.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::SceneKey;

//=== SceneRequest ========================================================

/// A scene-switch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneRequest<K: SceneKey> {
    /// Tear down the active scene and activate the keyed one.
    SwitchTo(K),
}

//=== TransitionQueue =====================================================

/// FIFO queue of pending scene requests.
pub struct TransitionQueue<K: SceneKey> {
    queue: Vec<SceneRequest<K>>,
}

impl<K: SceneKey> TransitionQueue<K> {
    /// Creates a new empty queue.
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Queues a request to be processed at the next tick boundary.
    pub fn push(&mut self, request: SceneRequest<K>) {
        self.queue.push(request);
    }

    /// Returns true if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of queued requests.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Clears all queued requests.
    pub fn clear(&mut self) {
        self.queue.clear()
    }

    /// Takes all requests from the queue, leaving it empty.
    pub fn take(&mut self) -> Vec<SceneRequest<K>> {
        std::mem::take(&mut self.queue)
    }
}

impl<K: SceneKey> Default for TransitionQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
    enum TestKey {
        A,
        B,
    }

    impl SceneKey for TestKey {}

    #[test]
    fn starts_empty() {
        let q: TransitionQueue<TestKey> = TransitionQueue::new();
        assert!(q.is_empty());
        assert_eq!(q.len(), 0);
    }

    #[test]
    fn take_drains_in_fifo_order() {
        let mut q = TransitionQueue::new();
        q.push(SceneRequest::SwitchTo(TestKey::A));
        q.push(SceneRequest::SwitchTo(TestKey::B));
        assert_eq!(q.len(), 2);

        let taken = q.take();
        assert_eq!(
            taken,
            vec![
                SceneRequest::SwitchTo(TestKey::A),
                SceneRequest::SwitchTo(TestKey::B),
            ]
        );
        assert!(q.is_empty());
    }

    #[test]
    fn clear_discards_requests() {
        let mut q = TransitionQueue::new();
        q.push(SceneRequest::SwitchTo(TestKey::A));
        q.clear();
        assert!(q.is_empty());
    }
}
