/*
 * ==========================================================================
 * MUNI - Typed scripting with signals and watchers
 * ==========================================================================
 *
 * File:     tasks.rs
 * Purpose:  Background task runtime for reactive handlers
 *
 * Signal and watch handlers run as fire-and-forget OS threads. Every spawn
 * goes through `TaskSpawner`, which keeps the join handle so the host can
 * wait for outstanding handlers before the process exits.
 *
 * Handlers share the interpreter state with the thread that spawned them.
 * No ordering exists between sibling handlers or between a handler and the
 * statement that follows the spawning `emit`. This is the single place to
 * add synchronisation later without touching call sites. *
 * --------------------------------------------------------------------------
 * Author:   Sam Wilcox
 *
 * License:
 * This file is part of the MUNI programming language project.
 *
 * MUNI is dual-licensed under the terms of:
 *   - The MIT license
 *   - The Apache License, Version 2.0
 *
 * You may choose either license to govern your use of this software.
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under these licenses is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *
 * ==========================================================================
 */

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;
use tracing::{debug, error};

use crate::error::{MuniError, MuniResult};

/* ============================================================================
 * Task Spawner
 * ============================================================================
 */

/// A spawned handler thread and the label it was spawned under.
struct TaskEntry {
    label: String,
    handle: JoinHandle<()>,
}

/// Spawns handler threads and tracks them until joined.
#[derive(Clone)]
pub struct TaskSpawner {
    tasks: Arc<Mutex<Vec<TaskEntry>>>,
    /// Panics seen while reaping, reported by the next `wait_idle`.
    reaped_panics: Arc<AtomicUsize>,
    stack_size: usize,
}

impl TaskEntry {
    /// Joins the thread. True when it panicked.
    fn join(self) -> bool {
        if self.handle.join().is_err() {
            error!(task = %self.label, "handler thread panicked");
            return true;
        }
        false
    }
}

impl TaskSpawner {
    pub fn new(stack_size: usize) -> Self {
        Self {
            tasks: Arc::new(Mutex::new(Vec::new())),
            reaped_panics: Arc::new(AtomicUsize::new(0)),
            stack_size,
        }
    }

    /// Starts `job` on its own thread and returns immediately.
    pub fn spawn<F>(&self, label: impl Into<String>, job: F) -> MuniResult<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let label = label.into();
        let handle = thread::Builder::new()
            .name(label.clone())
            .stack_size(self.stack_size)
            .spawn(job)
            .map_err(|e| {
                MuniError::runtime_error(format!("failed to start handler '{}': {}", label, e))
            })?;

        debug!(task = %label, "spawned handler");
        let mut tasks = self.tasks.lock();
        self.reap(&mut tasks);
        tasks.push(TaskEntry { label, handle });
        Ok(())
    }

    /// Handlers that have not finished yet.
    pub fn pending(&self) -> usize {
        let mut tasks = self.tasks.lock();
        self.reap(&mut tasks);
        tasks.len()
    }

    /// Joins threads that already exited so long-running programs do not
    /// accumulate handles.
    fn reap(&self, tasks: &mut Vec<TaskEntry>) {
        let (finished, running): (Vec<_>, Vec<_>) = std::mem::take(tasks)
            .into_iter()
            .partition(|entry| entry.handle.is_finished());
        *tasks = running;

        let panicked = finished.into_iter().map(TaskEntry::join).filter(|p| *p).count();
        if panicked > 0 {
            self.reaped_panics.fetch_add(panicked, Ordering::SeqCst);
        }
    }

    /// Joins every tracked handler, including handlers spawned while
    /// waiting. Returns how many of them panicked.
    pub fn wait_idle(&self) -> usize {
        let mut panicked = 0;

        loop {
            let batch = std::mem::take(&mut *self.tasks.lock());
            if batch.is_empty() {
                break;
            }

            panicked += batch.into_iter().map(TaskEntry::join).filter(|p| *p).count();
        }

        panicked + self.reaped_panics.swap(0, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn waits_for_nested_spawns() {
        let spawner = TaskSpawner::new(256 * 1024);
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..4 {
            let inner = spawner.clone();
            let counter = counter.clone();
            spawner
                .spawn("outer", move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                    let counter = counter.clone();
                    inner
                        .spawn("inner", move || {
                            counter.fetch_add(1, Ordering::SeqCst);
                        })
                        .unwrap();
                })
                .unwrap();
        }

        assert_eq!(spawner.wait_idle(), 0);
        assert_eq!(counter.load(Ordering::SeqCst), 8);
        assert_eq!(spawner.pending(), 0);
    }

    #[test]
    fn panics_are_counted_not_propagated() {
        let spawner = TaskSpawner::new(256 * 1024);
        spawner.spawn("boom", || panic!("handler exploded")).unwrap();
        assert_eq!(spawner.wait_idle(), 1);
    }

    #[test]
    fn finished_handlers_are_reaped() {
        let spawner = TaskSpawner::new(256 * 1024);
        for _ in 0..50 {
            spawner.spawn("quick", || {}).unwrap();
        }

        let deadline = Instant::now() + Duration::from_secs(10);
        while spawner.pending() > 0 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(spawner.pending(), 0);
        assert_eq!(spawner.wait_idle(), 0);
    }

    #[test]
    fn reaped_panics_are_still_reported() {
        let spawner = TaskSpawner::new(256 * 1024);
        spawner.spawn("boom", || panic!("handler exploded")).unwrap();

        let deadline = Instant::now() + Duration::from_secs(10);
        while spawner.pending() > 0 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(spawner.pending(), 0);
        assert_eq!(spawner.wait_idle(), 1);
    }
}
