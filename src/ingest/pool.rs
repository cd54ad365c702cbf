//! Fixed-size worker pool
//!
//! Jobs go through an unbounded `crossbeam_channel` queue shared by all
//! workers. The pool only offers submission; callers that need to know when
//! work is done track it themselves (see `CompletionBarrier`).

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};
use thiserror::Error;
use tracing::{debug, error};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Errors that can occur when creating or using the pool
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("worker pool needs at least one thread")]
    NoWorkers,

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("worker pool is no longer accepting work")]
    Closed,
}

/// A fixed number of worker threads executing submitted jobs
pub struct WorkerPool {
    sender: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Start `size` worker threads
    pub fn new(size: usize) -> Result<Self, PoolError> {
        if size == 0 {
            return Err(PoolError::NoWorkers);
        }

        let (sender, receiver) = unbounded::<Job>();
        let mut workers = Vec::with_capacity(size);
        for worker_id in 0..size {
            let receiver = receiver.clone();
            let handle = thread::Builder::new()
                .name(format!("review-worker-{}", worker_id))
                .spawn(move || worker_loop(worker_id, receiver))?;
            workers.push(handle);
        }
        debug!("Started worker pool with {} threads", size);

        Ok(Self {
            sender: Some(sender),
            workers,
        })
    }

    /// Number of worker threads
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Queue a job for execution on some worker.
    ///
    /// On error the job is dropped without running.
    pub fn submit<F>(&self, job: F) -> Result<(), PoolError>
    where
        F: FnOnce() + Send + 'static,
    {
        let sender = self.sender.as_ref().ok_or(PoolError::Closed)?;
        sender.send(Box::new(job)).map_err(|_| PoolError::Closed)
    }

    /// Stop accepting work, let the workers drain the queue, and join them
    pub fn shutdown(mut self) {
        self.sender.take();
        for handle in self.workers.drain(..) {
            let name = handle.thread().name().unwrap_or("review-worker").to_string();
            if handle.join().is_err() {
                error!("Worker thread {} exited abnormally", name);
            }
        }
    }
}

impl Drop for WorkerPool {
    /// Closes the queue without joining; workers exit once it is drained.
    fn drop(&mut self) {
        self.sender.take();
    }
}

fn worker_loop(worker_id: usize, receiver: Receiver<Job>) {
    let mut executed = 0usize;
    while let Ok(job) = receiver.recv() {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
            error!(
                "Work unit panicked on worker {}: {}",
                worker_id,
                panic_message(payload.as_ref())
            );
        }
        executed += 1;
    }
    debug!("Worker {} finished after {} jobs", worker_id, executed);
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}
