// src/scheduler.rs
//! Named periodic task runner.
//!
//! Each registration spawns one tokio task: the work function runs
//! immediately, then on every interval tick (fixed rate; ticks that land
//! while work is still running are skipped). Work errors are logged and
//! never cancel the schedule — a failing refresh must not take the process
//! down with it.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `work` to run now and then every `interval`.
    ///
    /// Re-registering an existing name cancels the prior schedule first, so
    /// a name never has two tickers. Must be called from within a tokio
    /// runtime; `interval` must be non-zero.
    pub fn schedule<F, Fut>(&self, name: &str, interval: Duration, work: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.cancel(name);

        let task_name = name.to_string();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                // First tick completes immediately, so the work runs once
                // right after registration.
                ticker.tick().await;
                if let Err(e) = work().await {
                    warn!(error = ?e, task = %task_name, "scheduled task failed");
                }
            }
        });

        info!(
            task = name,
            interval_secs = interval.as_secs(),
            "scheduled periodic task"
        );
        self.tasks
            .lock()
            .expect("scheduler mutex poisoned")
            .insert(name.to_string(), handle);
    }

    /// Stop a named schedule. Returns whether a registration existed.
    pub fn cancel(&self, name: &str) -> bool {
        let removed = self
            .tasks
            .lock()
            .expect("scheduler mutex poisoned")
            .remove(name);
        match removed {
            Some(handle) => {
                handle.abort();
                info!(task = name, "cancelled scheduled task");
                true
            }
            None => false,
        }
    }

    /// Stop every active schedule; used at process shutdown.
    pub fn cancel_all(&self) {
        let mut tasks = self.tasks.lock().expect("scheduler mutex poisoned");
        for (name, handle) in tasks.drain() {
            handle.abort();
            info!(task = %name, "cancelled scheduled task");
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
