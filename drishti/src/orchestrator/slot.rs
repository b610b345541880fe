//! Per-kind result storage.
//!
//! A [`TaskHandle`] is the one-shot result cell of a single extraction
//! task. A [`FeatureSlot`] tracks, for one feature kind, the handle of the
//! latest submitted scan and the newest successfully completed result.

use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

use super::Freshness;
use crate::error::Result;

/// Result cell of one extraction task, tagged with its scan sequence number.
pub(crate) struct TaskHandle<T> {
    sequence: u64,
    result: Mutex<Option<Result<Arc<Vec<T>>>>>,
    ready: Condvar,
}

impl<T> TaskHandle<T> {
    pub(crate) fn new(sequence: u64) -> Self {
        Self {
            sequence,
            result: Mutex::new(None),
            ready: Condvar::new(),
        }
    }

    pub(crate) fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Store the result and wake every waiter. Later calls are ignored.
    pub(crate) fn complete(&self, result: Result<Arc<Vec<T>>>) {
        let mut slot = self.result.lock();
        if slot.is_none() {
            *slot = Some(result);
            self.ready.notify_all();
        }
    }

    /// Block until the task completes.
    pub(crate) fn wait(&self) -> Result<Arc<Vec<T>>> {
        let mut slot = self.result.lock();
        loop {
            if let Some(result) = slot.as_ref() {
                return result.clone();
            }
            self.ready.wait(&mut slot);
        }
    }
}

struct SlotState<T> {
    latest: Option<Arc<TaskHandle<T>>>,
    completed: Option<(u64, Arc<Vec<T>>)>,
}

/// Latest handle and newest completed result for one feature kind.
pub(crate) struct FeatureSlot<T> {
    state: Mutex<SlotState<T>>,
}

impl<T> FeatureSlot<T> {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(SlotState {
                latest: None,
                completed: None,
            }),
        }
    }

    /// Make `handle` the latest submission unless a newer one is present.
    pub(crate) fn submit(&self, handle: Arc<TaskHandle<T>>) {
        let mut state = self.state.lock();
        let newer = state
            .latest
            .as_ref()
            .is_none_or(|current| handle.sequence() > current.sequence());
        if newer {
            state.latest = Some(handle);
        }
    }

    /// Record a successful result unless a newer one is already stored.
    pub(crate) fn record(&self, sequence: u64, features: Arc<Vec<T>>) {
        let mut state = self.state.lock();
        let newer = state
            .completed
            .as_ref()
            .is_none_or(|(stored, _)| sequence > *stored);
        if newer {
            state.completed = Some((sequence, features));
        }
    }

    /// Sequence number of the newest completed result.
    pub(crate) fn completed_sequence(&self) -> Option<u64> {
        self.state.lock().completed.as_ref().map(|(seq, _)| *seq)
    }

    /// Handle of the latest submission.
    pub(crate) fn latest(&self) -> Option<Arc<TaskHandle<T>>> {
        self.state.lock().latest.clone()
    }

    /// Sequence of the latest submission when it is newer than `sequence`.
    pub(crate) fn superseded_by(&self, sequence: u64) -> Option<u64> {
        self.state
            .lock()
            .latest
            .as_ref()
            .map(|handle| handle.sequence())
            .filter(|&latest| latest > sequence)
    }

    /// Wait for the latest submission. When the awaited task fails and a
    /// newer one has been submitted meanwhile, wait for that one instead.
    pub(crate) fn wait_latest(&self) -> Option<Result<Arc<Vec<T>>>> {
        let mut handle = self.latest()?;
        loop {
            let result = handle.wait();
            match self.latest() {
                Some(newer) if result.is_err() && newer.sequence() > handle.sequence() => {
                    handle = newer;
                }
                _ => return Some(result),
            }
        }
    }

    /// Features according to `freshness`; empty when nothing was submitted
    /// or the awaited task failed.
    pub(crate) fn get(&self, freshness: Freshness) -> Arc<Vec<T>> {
        if freshness == Freshness::Available {
            if let Some((_, features)) = &self.state.lock().completed {
                return Arc::clone(features);
            }
        }

        // Wait without holding the slot lock so workers can record.
        match self.wait_latest() {
            Some(Ok(features)) => features,
            _ => Arc::new(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::extraction::FeatureKind;

    #[test]
    fn test_empty_slot() {
        let slot: FeatureSlot<u32> = FeatureSlot::new();
        assert!(slot.get(Freshness::Latest).is_empty());
        assert!(slot.get(Freshness::Available).is_empty());
    }

    #[test]
    fn test_latest_waits_for_handle() {
        let slot = FeatureSlot::new();
        let handle = Arc::new(TaskHandle::new(1));
        slot.submit(Arc::clone(&handle));

        let worker = {
            let handle = Arc::clone(&handle);
            std::thread::spawn(move || handle.complete(Ok(Arc::new(vec![7u32]))))
        };
        assert_eq!(*slot.get(Freshness::Latest), vec![7]);
        worker.join().unwrap();
    }

    #[test]
    fn test_failed_task_reads_empty() {
        let slot: FeatureSlot<u32> = FeatureSlot::new();
        let handle = Arc::new(TaskHandle::new(1));
        slot.submit(Arc::clone(&handle));
        handle.complete(Err(Error::ExtractionFailure {
            kind: FeatureKind::Lines,
            reason: "boom".into(),
        }));
        assert!(slot.get(Freshness::Latest).is_empty());
        assert!(handle.wait().is_err());
    }

    #[test]
    fn test_older_completion_does_not_overwrite() {
        let slot = FeatureSlot::new();
        slot.record(2, Arc::new(vec![2u32]));
        slot.record(1, Arc::new(vec![1u32]));
        assert_eq!(slot.completed_sequence(), Some(2));
        assert_eq!(*slot.get(Freshness::Available), vec![2]);
    }

    #[test]
    fn test_available_returns_completed_while_latest_pending() {
        let slot = FeatureSlot::new();
        slot.record(1, Arc::new(vec![1u32]));
        slot.submit(Arc::new(TaskHandle::new(2)));
        // The pending handle is never completed; Available must not block.
        assert_eq!(*slot.get(Freshness::Available), vec![1]);
        assert_eq!(slot.latest().map(|h| h.sequence()), Some(2));
    }

    #[test]
    fn test_superseded_by_newer_submission() {
        let slot: FeatureSlot<u32> = FeatureSlot::new();
        assert_eq!(slot.superseded_by(1), None);

        slot.submit(Arc::new(TaskHandle::new(1)));
        assert_eq!(slot.superseded_by(1), None);
        slot.submit(Arc::new(TaskHandle::new(3)));
        assert_eq!(slot.superseded_by(1), Some(3));
        assert_eq!(slot.superseded_by(3), None);
    }

    #[test]
    fn test_latest_moves_past_failed_older_task() {
        let slot = FeatureSlot::new();
        let first = Arc::new(TaskHandle::new(1));
        let second = Arc::new(TaskHandle::new(2));
        slot.submit(Arc::clone(&first));

        let reader = std::thread::scope(|s| {
            let reader = s.spawn(|| slot.get(Freshness::Latest));
            slot.submit(Arc::clone(&second));
            first.complete(Err(Error::ExtractionFailure {
                kind: FeatureKind::Lines,
                reason: "superseded by scan 2".into(),
            }));
            second.complete(Ok(Arc::new(vec![2u32])));
            reader.join().unwrap()
        });
        assert_eq!(*reader, vec![2]);
    }

    #[test]
    fn test_complete_only_once() {
        let handle = TaskHandle::new(1);
        handle.complete(Ok(Arc::new(vec![1u32])));
        handle.complete(Ok(Arc::new(vec![2u32])));
        assert_eq!(*handle.wait().unwrap(), vec![1]);
    }
}
