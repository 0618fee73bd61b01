//! The thread-safe event buffer between SDK threads and the consumer.

use crate::record::BridgeEvent;
use std::mem;
use std::sync::{Mutex, MutexGuard};

/// Ordered, unbounded FIFO of event records.
///
/// Any number of SDK threads may [`append`](Self::append) concurrently
/// while one consumer [`drain_all`](Self::drain_all)s; a single mutex
/// serializes them. Per-thread append order is preserved end to end;
/// order between different threads is whatever order the lock admits.
///
/// The buffer is unbounded on purpose: the append path runs inside the
/// SDK's callback contract and may neither fail nor block, so there is
/// no backpressure. If the consumer context is starved indefinitely the
/// buffer grows without limit — an accepted trade for a lossless,
/// non-blocking capture path.
#[derive(Debug, Default)]
pub struct EventQueue {
    records: Mutex<Vec<BridgeEvent>>,
}

impl EventQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record at the tail.
    ///
    /// O(1) amortized; holds the lock only for the push. Never fails.
    pub fn append(&self, record: BridgeEvent) {
        self.lock().push(record);
    }

    /// Detach and return the entire current contents, leaving the queue
    /// empty.
    ///
    /// Atomic with respect to [`append`](Self::append): every record
    /// lands in exactly one drain, never split across two, never lost.
    /// Draining an empty queue returns an empty batch without blocking.
    pub fn drain_all(&self) -> Vec<BridgeEvent> {
        mem::take(&mut *self.lock())
    }

    /// Number of records currently buffered.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing is currently buffered.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<BridgeEvent>> {
        // A poisoned lock means a panic elsewhere while the buffer was
        // held; the Vec itself is still structurally sound, and the
        // append path is not allowed to fail, so keep going with it.
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadbridge_core::DeviceHandle;
    use std::sync::Arc;

    fn data(device: u64, value: f64) -> BridgeEvent {
        BridgeEvent::Data {
            device: DeviceHandle::from_raw(device),
            channel: 0,
            value,
        }
    }

    #[test]
    fn test_append_then_drain_preserves_order() {
        let queue = EventQueue::new();
        queue.append(data(1, 0.0));
        queue.append(data(1, 1.0));
        queue.append(data(1, 2.0));

        let batch = queue.drain_all();
        let values: Vec<f64> = batch
            .iter()
            .map(|e| match e {
                BridgeEvent::Data { value, .. } => *value,
                _ => panic!("expected data records"),
            })
            .collect();
        assert_eq!(values, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_drain_leaves_queue_empty() {
        let queue = EventQueue::new();
        queue.append(data(1, 0.0));

        assert_eq!(queue.drain_all().len(), 1);
        assert!(queue.is_empty());
        assert!(queue.drain_all().is_empty());
    }

    #[test]
    fn test_drain_empty_queue_returns_empty() {
        let queue = EventQueue::new();
        assert!(queue.drain_all().is_empty());
    }

    #[test]
    fn test_append_after_drain_lands_in_next_batch() {
        let queue = EventQueue::new();
        queue.append(data(1, 0.0));
        let first = queue.drain_all();
        queue.append(data(1, 1.0));
        let second = queue.drain_all();

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn test_len_tracks_buffered_records() {
        let queue = EventQueue::new();
        assert_eq!(queue.len(), 0);
        queue.append(data(1, 0.0));
        queue.append(data(2, 0.0));
        assert_eq!(queue.len(), 2);
        queue.drain_all();
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_concurrent_appends_lose_nothing() {
        let queue = Arc::new(EventQueue::new());
        let threads: Vec<_> = (0..4u64)
            .map(|t| {
                let queue = Arc::clone(&queue);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        queue.append(data(t, i as f64));
                    }
                })
            })
            .collect();
        for thread in threads {
            thread.join().unwrap();
        }

        assert_eq!(queue.drain_all().len(), 400);
    }
}
