//! Bounded fan-out/fan-in worker pool.
//!
//! A fixed number of workers pull jobs from one shared, bounded queue and
//! publish results to a shared results queue. Results are yielded in
//! completion order. The results stream ends only once every worker has
//! finished.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, warn};

/// 1-based identifier of a worker within its pool.
pub type WorkerId = usize;

/// A fixed-size pool of async workers.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
    capacity: usize,
}

impl WorkerPool {
    /// Create a pool of `workers` workers (at least one). Queues hold up to
    /// twice as many items as there are workers.
    pub fn new(workers: usize) -> Self {
        let workers = workers.max(1);
        Self {
            workers,
            capacity: workers * 2,
        }
    }

    /// Override the capacity of the job and result queues.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `handler` on every job and stream back the results.
    ///
    /// Each job is handed to exactly one worker and at most `workers`
    /// handlers run at once. Must be called from within a Tokio runtime.
    pub fn run<I, J, R, F, Fut>(&self, jobs: I, handler: F) -> ReceiverStream<R>
    where
        I: IntoIterator<Item = J>,
        I::IntoIter: Send + 'static,
        J: Send + 'static,
        R: Send + 'static,
        F: Fn(WorkerId, J) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
    {
        let (job_sender, job_receiver) = mpsc::channel(self.capacity);
        let (result_sender, result_receiver) = mpsc::channel(self.capacity);

        // Producer: dropping the sender closes the job queue.
        let jobs = jobs.into_iter();
        tokio::spawn(async move {
            for job in jobs {
                if job_sender.send(job).await.is_err() {
                    break;
                }
            }
        });

        let job_receiver = Arc::new(Mutex::new(job_receiver));
        let handler = Arc::new(handler);
        let mut workers = JoinSet::new();

        for id in 1..=self.workers {
            let jobs = Arc::clone(&job_receiver);
            let results = result_sender.clone();
            let handler = Arc::clone(&handler);

            workers.spawn(async move {
                loop {
                    let job = jobs.lock().await.recv().await;
                    let Some(job) = job else { break };

                    debug!(worker = id, "worker starting job");
                    let result = handler(id, job).await;
                    debug!(worker = id, "worker finished job");

                    if results.send(result).await.is_err() {
                        // consumer went away
                        break;
                    }
                }
            });
        }

        // Barrier: the results queue is closed only after all workers exit.
        tokio::spawn(async move {
            while let Some(joined) = workers.join_next().await {
                if let Err(e) = joined {
                    warn!(reason = %e, "worker terminated abnormally");
                }
            }
            drop(result_sender);
        });

        ReceiverStream::new(result_receiver)
    }
}
