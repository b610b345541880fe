//! Fixed-size worker pool fed by a channel.

use std::thread::{self, JoinHandle};

use crossbeam_channel::{Sender, unbounded};
use log::{debug, info};

use crate::error::{Error, Result};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Worker threads pulling boxed jobs from a shared unbounded channel.
///
/// Dropping the pool closes the channel; workers finish the queued jobs
/// and are joined.
pub(crate) struct WorkerPool {
    sender: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `size` workers.
    pub(crate) fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::Configuration("orchestrator.workers"));
        }

        let (sender, receiver) = unbounded::<Job>();
        let mut workers = Vec::with_capacity(size);
        for id in 0..size {
            let receiver = receiver.clone();
            let handle = thread::Builder::new()
                .name(format!("drishti-worker-{}", id))
                .spawn(move || {
                    while let Ok(job) = receiver.recv() {
                        job();
                    }
                    debug!("Worker {} exiting", id);
                })
                .map_err(|e| Error::WorkerPool(format!("failed to spawn worker {}: {}", id, e)))?;
            workers.push(handle);
        }

        info!("Worker pool started with {} threads", size);
        Ok(Self {
            sender: Some(sender),
            workers,
        })
    }

    /// Number of worker threads.
    pub(crate) fn size(&self) -> usize {
        self.workers.len()
    }

    /// Queue a job. Returns `false` if the pool is shutting down.
    pub(crate) fn execute<F>(&self, job: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        match &self.sender {
            Some(sender) => sender.send(Box::new(job)).is_ok(),
            None => false,
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Closing the channel ends each worker's receive loop.
        self.sender = None;
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
        info!("Worker pool stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_runs_all_jobs_before_drop_returns() {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let pool = WorkerPool::new(3).unwrap();
            assert_eq!(pool.size(), 3);
            for _ in 0..50 {
                let counter = Arc::clone(&counter);
                assert!(pool.execute(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }));
            }
        }
        assert_eq!(counter.load(Ordering::SeqCst), 50);
    }

    #[test]
    fn test_zero_workers() {
        assert!(WorkerPool::new(0).is_err());
    }
}
