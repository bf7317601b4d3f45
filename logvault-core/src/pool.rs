use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, OnceLock};

use rayon::prelude::*;

use crate::error::{ArchiveError, Result};

static GLOBAL: OnceLock<WorkerPool> = OnceLock::new();

fn default_workers() -> usize {
    num_cpus::get().saturating_sub(1).max(1)
}

/// Fixed-size pool of OS worker threads. One shared instance serves the
/// whole process; tests may build private pools instead.
pub struct WorkerPool {
    inner: rayon::ThreadPool,
    shut_down: AtomicBool,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Result<WorkerPool> {
        let inner = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .thread_name(|i| format!("logvault-worker-{i}"))
            .build()
            .map_err(|e| ArchiveError::Pool(e.to_string()))?;
        Ok(WorkerPool { inner, shut_down: AtomicBool::new(false) })
    }

    /// The process-wide pool, lazily created on first use with
    /// `max(1, hardware_concurrency - 1)` workers.
    pub fn global() -> &'static WorkerPool {
        GLOBAL.get_or_init(|| WorkerPool::new(default_workers()).expect("initialize worker pool"))
    }

    pub fn worker_count(&self) -> usize {
        self.inner.current_num_threads()
    }

    /// Enqueue one task and return a handle yielding its result.
    pub fn submit<T, F>(&self, task: F) -> Result<Task<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        if self.shut_down.load(Ordering::Acquire) {
            return Err(ArchiveError::PoolShutDown);
        }
        let (tx, rx) = mpsc::channel();
        self.inner.spawn(move || {
            let _ = tx.send(task());
        });
        Ok(Task { rx })
    }

    /// Run `task` over every item across all workers and block until done.
    /// No item ordering is preserved; the first task error is surfaced.
    pub fn parallel_for_each<T, F>(&self, items: &[T], task: F) -> Result<()>
    where
        T: Sync,
        F: Fn(&T) -> Result<()> + Send + Sync,
    {
        if self.shut_down.load(Ordering::Acquire) {
            return Err(ArchiveError::PoolShutDown);
        }
        self.inner.install(|| items.par_iter().try_for_each(|item| task(item)))
    }

    /// Refuse new work. Tasks already running finish normally.
    pub fn shutdown(&self) {
        self.shut_down.store(true, Ordering::Release);
    }
}

/// Completion handle for a submitted task.
pub struct Task<T> {
    rx: mpsc::Receiver<Result<T>>,
}

impl<T> Task<T> {
    /// Block until the task finishes and return its result.
    pub fn join(self) -> Result<T> {
        match self.rx.recv() {
            Ok(res) => res,
            Err(_) => Err(ArchiveError::Pool("task dropped before completing".into())),
        }
    }
}
