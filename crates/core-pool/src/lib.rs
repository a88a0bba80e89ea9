//! Fixed-size worker pool draining a bounded FIFO under a mutex/condvar
//! protocol. The pool is deliberately generic over the job type — it knows
//! nothing about ELF files or decoders; `core-decode` supplies boxed
//! closures that capture a worker's thread-local decoder state.

use core_collections::Fifo;
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use tracing::{debug, trace, warn};

pub type Job = Box<dyn FnOnce() + Send + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("pool is shutting down")]
    ShuttingDown,
    #[error("failed to spawn worker thread {index}")]
    SpawnFailed { index: usize },
}

struct State {
    queue: Fifo<Job>,
    queued: usize,
    active: usize,
    shutting_down: bool,
}

struct Inner {
    mutex: Mutex<State>,
    cv_has_work: Condvar,
    cv_idle: Condvar,
}

impl Inner {
    fn idle_now(state: &State) -> bool {
        state.queued == 0 && state.active == 0
    }
}

/// A fixed-size set of OS-thread workers pulling jobs from a shared,
/// mutex-guarded FIFO.
pub struct Pool {
    inner: Arc<Inner>,
    threads: Vec<JoinHandle<()>>,
}

impl Pool {
    /// Launches `n` workers (minimum 1). Rolls back (marks shutting down,
    /// wakes and joins already-spawned workers) if any `thread::Builder`
    /// spawn fails partway through.
    pub fn create(n: usize) -> Result<Self, PoolError> {
        let n = n.max(1);
        let inner = Arc::new(Inner {
            mutex: Mutex::new(State {
                queue: Fifo::create(),
                queued: 0,
                active: 0,
                shutting_down: false,
            }),
            cv_has_work: Condvar::new(),
            cv_idle: Condvar::new(),
        });

        let mut threads = Vec::with_capacity(n);
        for index in 0..n {
            let worker_inner = Arc::clone(&inner);
            let spawned = thread::Builder::new()
                .name(format!("rdis-worker-{index}"))
                .spawn(move || worker_loop(worker_inner));
            match spawned {
                Ok(handle) => threads.push(handle),
                Err(_) => {
                    warn!(target: "pool", index, "worker_spawn_failed_rolling_back");
                    {
                        let mut state = inner.mutex.lock().unwrap();
                        state.shutting_down = true;
                    }
                    inner.cv_has_work.notify_all();
                    for handle in threads {
                        let _ = handle.join();
                    }
                    return Err(PoolError::SpawnFailed { index });
                }
            }
        }

        debug!(target: "pool", workers = n, "pool_created");
        Ok(Self { inner, threads })
    }

    /// Enqueues `job`. Fails if the pool is shutting down; ownership of
    /// `job` passes to the pool on success.
    pub fn post<F>(&self, job: F) -> Result<(), PoolError>
    where
        F: FnOnce() + Send + 'static,
    {
        let mut state = self.inner.mutex.lock().unwrap();
        if state.shutting_down {
            return Err(PoolError::ShuttingDown);
        }
        state.queue.push(Box::new(job));
        state.queued += 1;
        drop(state);
        self.inner.cv_has_work.notify_one();
        Ok(())
    }

    /// Blocks until `queued == 0 && active == 0`. Does not terminate workers.
    pub fn drain(&self) {
        let state = self.inner.mutex.lock().unwrap();
        let _state = self
            .inner
            .cv_idle
            .wait_while(state, |s| !Inner::idle_now(s))
            .unwrap();
    }

    /// Idempotent: sets `shutting_down`, wakes every worker, joins them all.
    /// In-flight jobs run to completion; no new job is accepted afterward.
    pub fn shutdown(&mut self) {
        {
            let mut state = self.inner.mutex.lock().unwrap();
            if state.shutting_down {
                return;
            }
            state.shutting_down = true;
        }
        self.inner.cv_has_work.notify_all();
        for handle in self.threads.drain(..) {
            let _ = handle.join();
        }
        debug!(target: "pool", "pool_shutdown_complete");
    }

    pub fn queued(&self) -> usize {
        self.inner.mutex.lock().unwrap().queued
    }

    pub fn active(&self) -> usize {
        self.inner.mutex.lock().unwrap().active
    }

    pub fn is_idle(&self) -> bool {
        let state = self.inner.mutex.lock().unwrap();
        Inner::idle_now(&state)
    }
}

/// `shutdown()` followed by discarding any residual queued jobs without
/// invoking them — a leaked `arg` inside an unexecuted job is the caller's
/// fault, per spec.
impl Drop for Pool {
    fn drop(&mut self) {
        self.shutdown();
        let mut state = self.inner.mutex.lock().unwrap();
        while state.queue.pop().is_some() {
            state.queued = state.queued.saturating_sub(1);
        }
    }
}

fn worker_loop(inner: Arc<Inner>) {
    loop {
        let job = {
            let mut state = inner.mutex.lock().unwrap();
            state = inner
                .cv_has_work
                .wait_while(state, |s| !s.shutting_down && s.queue.is_empty())
                .unwrap();
            if state.shutting_down && state.queue.is_empty() {
                return;
            }
            let job = state.queue.pop();
            if job.is_some() {
                state.queued = state.queued.saturating_sub(1);
                state.active += 1;
            }
            job
        };

        let Some(job) = job else { continue };
        trace!(target: "pool", "job_start");
        job();
        trace!(target: "pool", "job_done");

        let mut state = inner.mutex.lock().unwrap();
        state.active -= 1;
        if Inner::idle_now(&state) {
            drop(state);
            inner.cv_idle.notify_all();
        }
    }
}
