//! Notification poll loop — periodic due-alarm evaluation and dispatch.
//!
//! Spawns a background thread that wakes once a minute, reads the
//! collection from the store, and fires the outbound send capability for
//! every due (medicine, alarm) pair. At most one dispatch per pair per
//! matching minute, tracked in process-local state; a restart may re-fire
//! an alarm whose minute is still current.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, Timelike};
use uuid::Uuid;

use crate::db::MedicineStore;
use crate::models::{ClockTime, Medicine, MedicineKind};
use crate::schedule::{is_due_now, LocalInstant};

use super::{notification_text, Notifier};

/// Sleep granularity for shutdown responsiveness (1 second).
const SLEEP_GRANULARITY_SECS: u64 = 1;

/// Current-time source. A trait so tests drive ticks with a fixed instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> LocalInstant;
}

/// Local wall clock, truncated to the minute.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> LocalInstant {
        let now = Local::now();
        let time = ClockTime::new(now.hour() as u8, now.minute() as u8)
            .expect("wall clock outside 24h range");
        LocalInstant::new(now.date_naive(), time)
    }
}

/// Evaluates every alarm against a reference instant and issues at most one
/// dispatch per (medicine, alarm, minute).
pub struct Dispatcher {
    store: Arc<dyn MedicineStore>,
    notifier: Arc<dyn Notifier>,
    /// Last dispatched minute per (medicine, alarm) pair. Ephemeral.
    dispatched: HashMap<(Uuid, Uuid), LocalInstant>,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn MedicineStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            notifier,
            dispatched: HashMap::new(),
        }
    }

    /// One evaluation pass. Returns the number of dispatches issued.
    ///
    /// A store read failure aborts this pass only; the caller's cadence is
    /// unaffected. A failing send never blocks the remaining pairs.
    pub fn tick(&mut self, now: LocalInstant) -> usize {
        let medicines = match self.store.load_all() {
            Ok(medicines) => medicines,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping tick: could not load medicines");
                return 0;
            }
        };

        let mut issued = 0;
        for mut medicine in medicines {
            let Some(destination) = medicine.notify_destination.clone() else {
                continue;
            };

            let mut fired: Vec<usize> = Vec::new();
            for (idx, alarm) in medicine.alarms.iter().enumerate() {
                if !is_due_now(&medicine, alarm, now) {
                    continue;
                }

                let key = (medicine.id, alarm.id);
                if self.dispatched.get(&key) == Some(&now) {
                    tracing::debug!(
                        medicine = %medicine.name,
                        minute = %now.time,
                        "Already dispatched for this minute"
                    );
                    continue;
                }
                self.dispatched.insert(key, now);

                self.dispatch(&destination, &medicine);
                issued += 1;
                fired.push(idx);
            }

            // A one-time alarm is spent after its first dispatch: disable it
            // and persist, so it cannot fire again on a later day.
            if !fired.is_empty() && matches!(medicine.kind, MedicineKind::OneTime) {
                for &idx in &fired {
                    medicine.alarms[idx].enabled = false;
                }
                if let Err(e) = self.store.upsert(&medicine) {
                    tracing::warn!(
                        error = %e,
                        medicine = %medicine.name,
                        "Failed to mark one-time alarm as spent"
                    );
                }
            }
        }
        issued
    }

    /// Issue one send without waiting on the transport; a hung or failing
    /// send cannot stall the tick loop. The outcome is logged from the
    /// sending thread.
    fn dispatch(&self, destination: &str, medicine: &Medicine) {
        let notifier = Arc::clone(&self.notifier);
        let destination = destination.to_string();
        let name = medicine.name.clone();
        let text = notification_text(medicine);

        std::thread::spawn(move || match notifier.send(&destination, &text) {
            Ok(()) => tracing::info!(medicine = %name, "Notification dispatched"),
            Err(e) => {
                tracing::warn!(error = %e, medicine = %name, "Notification dispatch failed")
            }
        });
    }
}

/// Handle for the background poll loop thread.
///
/// Supports graceful shutdown via `shutdown()` or automatic cleanup on
/// `Drop`; dropping joins the thread, so no recurring task outlives it.
pub struct PollHandle {
    shutdown: Arc<AtomicBool>,
    handle: Option<std::thread::JoinHandle<()>>,
}

impl PollHandle {
    /// Request graceful shutdown. A tick in progress completes, but no
    /// further ticks run.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.shutdown();
        if let Some(h) = self.handle.take() {
            let _ = h.join();
        }
    }
}

/// Start the poll loop on a separate thread.
pub fn start_polling(
    store: Arc<dyn MedicineStore>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    interval: Duration,
) -> PollHandle {
    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = shutdown.clone();

    let handle = std::thread::spawn(move || {
        tracing::info!(
            interval_secs = interval.as_secs(),
            "Notification poll loop started"
        );
        poll_loop(store, notifier, clock, interval, &flag);
    });

    PollHandle {
        shutdown,
        handle: Some(handle),
    }
}

fn poll_loop(
    store: Arc<dyn MedicineStore>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    interval: Duration,
    shutdown: &AtomicBool,
) {
    let mut dispatcher = Dispatcher::new(store, notifier);
    let steps = (interval.as_secs() / SLEEP_GRANULARITY_SECS).max(1);

    while !shutdown.load(Ordering::Relaxed) {
        // Sleep in small increments for responsive shutdown
        for _ in 0..steps {
            if shutdown.load(Ordering::Relaxed) {
                tracing::info!("Notification poll loop shutting down");
                return;
            }
            std::thread::sleep(Duration::from_secs(SLEEP_GRANULARITY_SECS));
        }

        dispatcher.tick(clock.now());
    }
    tracing::info!("Notification poll loop shutting down");
}
