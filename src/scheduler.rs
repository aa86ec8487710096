use crate::error::{Error, Result};
use futures::future::BoxFuture;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::IntervalStream;

/// A named callback run on a fixed period until stopped.
///
/// The first tick fires immediately. Each callback runs to completion before
/// the next tick is taken; ticks missed while a callback runs are delayed, not
/// bunched up. A stopped task never runs its callback again.
pub struct PeriodicTask {
    name: &'static str,
    stop_tx: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl PeriodicTask {
    pub fn spawn<F>(name: &'static str, period: Duration, mut callback: F) -> Self
    where
        F: FnMut() -> BoxFuture<'static, ()> + Send + 'static,
    {
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut ticks = IntervalStream::new(interval);
            log::debug!("Cadence '{}' started ({}ms)", name, period.as_millis());

            loop {
                tokio::select! {
                    biased;
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                    Some(_) = ticks.next() => {
                        if *stop_rx.borrow() {
                            break;
                        }
                        callback().await;
                    }
                }
            }

            log::debug!("Cadence '{}' stopped", name);
        });

        Self {
            name,
            stop_tx,
            handle: Some(handle),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` only for the call that actually stopped the task.
    pub fn stop(&self) -> bool {
        !self.stop_tx.send_replace(true)
    }

    pub fn is_stopped(&self) -> bool {
        *self.stop_tx.borrow()
    }

    /// Waits for the task loop to exit. Call after [`stop`](Self::stop).
    pub async fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                log::error!("Cadence '{}' ended abnormally: {}", self.name, e);
            }
        }
    }
}

/// The set of cadences driving one dashboard.
#[derive(Default)]
pub struct Scheduler {
    tasks: Vec<PeriodicTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a cadence. Names are start-once: a stopped cadence cannot be registered again.
    pub fn register<F>(&mut self, name: &'static str, period: Duration, callback: F) -> Result<()>
    where
        F: FnMut() -> BoxFuture<'static, ()> + Send + 'static,
    {
        if self.tasks.iter().any(|t| t.name() == name) {
            return Err(Error::CadenceExists(name.to_string()));
        }
        self.tasks.push(PeriodicTask::spawn(name, period, callback));
        Ok(())
    }

    pub fn stop(&self, name: &str) -> bool {
        self.tasks
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.stop())
            .unwrap_or(false)
    }

    /// Stops every running cadence, returning how many were still running.
    pub fn stop_all(&self) -> usize {
        self.tasks.iter().filter(|t| t.stop()).count()
    }

    pub fn is_running(&self, name: &str) -> bool {
        self.tasks.iter().any(|t| t.name() == name && !t.is_stopped())
    }

    pub async fn join_all(&mut self) {
        for task in &mut self.tasks {
            task.join().await;
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop_all();
    }
}
