//! Medicine service — the operation surface consumed by UI collaborators.
//!
//! Owns the shared store and the poll loop lifecycle. Reads that hit a
//! corrupt payload are reported and surfaced as an empty collection, so the
//! process keeps running; mutations fail loudly instead.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

use crate::config;
use crate::db::{MedicineStore, StorageError};
use crate::models::{Medicine, MedicineType, ValidationError};
use crate::notify::{self, Clock, Notifier, PollHandle, SystemClock};
use crate::queries::{self, AlarmEntry};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },
}

impl ServiceError {
    fn not_found(entity_type: &str, id: &Uuid) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }
}

/// Application service over the shared store: CRUD, derived views, and the
/// notification poll loop lifecycle.
pub struct MedicineService {
    store: Arc<dyn MedicineStore>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    poller: Mutex<Option<PollHandle>>,
}

impl MedicineService {
    pub fn new(store: Arc<dyn MedicineStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_clock(store, notifier, Arc::new(SystemClock))
    }

    /// Service with an injected time source (tests use a fixed clock).
    pub fn with_clock(
        store: Arc<dyn MedicineStore>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            notifier,
            clock,
            poller: Mutex::new(None),
        }
    }

    /// Full collection. An unreadable payload is reported and treated as
    /// empty; the caller never crashes over it.
    pub fn list_all(&self) -> Vec<Medicine> {
        match self.store.load_all() {
            Ok(medicines) => medicines,
            Err(e) => {
                tracing::error!(error = %e, "Medicine collection unreadable, treating as empty");
                Vec::new()
            }
        }
    }

    pub fn list_by_type(&self, kind: MedicineType) -> Vec<Medicine> {
        queries::by_type(&self.list_all(), kind)
    }

    /// Case-insensitive substring search over name and description.
    pub fn search(&self, query: &str) -> Vec<Medicine> {
        queries::search(&self.list_all(), query)
    }

    /// Medicines at or below `threshold` doses left
    /// (see [`config::LOW_STOCK_THRESHOLD`] for the usual value).
    pub fn list_low_stock(&self, threshold: u32) -> Vec<Medicine> {
        queries::low_stock(&self.list_all(), threshold)
    }

    /// Every alarm across the collection, sorted by time of day.
    pub fn alarms(&self) -> Vec<AlarmEntry> {
        queries::alarm_entries(&self.list_all())
    }

    /// Validate and persist a new medicine.
    pub fn create(&self, medicine: Medicine) -> Result<(), ServiceError> {
        medicine.validate()?;
        self.store.upsert(&medicine)?;
        tracing::info!(medicine = %medicine.name, "Medicine added");
        Ok(())
    }

    /// Replace an existing medicine. Unknown ids are an error.
    pub fn update(&self, medicine: Medicine) -> Result<(), ServiceError> {
        medicine.validate()?;
        let known = self
            .store
            .load_all()?
            .iter()
            .any(|m| m.id == medicine.id);
        if !known {
            return Err(ServiceError::not_found("medicine", &medicine.id));
        }
        self.store.upsert(&medicine)?;
        tracing::info!(medicine = %medicine.name, "Medicine updated");
        Ok(())
    }

    /// Delete by id. An absent id is a successful no-op.
    pub fn delete(&self, id: &Uuid) -> Result<(), ServiceError> {
        self.store.remove(id)?;
        tracing::info!(%id, "Medicine removed");
        Ok(())
    }

    /// Enable or disable one alarm.
    pub fn toggle_alarm(
        &self,
        medicine_id: &Uuid,
        alarm_id: &Uuid,
        enabled: bool,
    ) -> Result<(), ServiceError> {
        let mut medicine = self
            .store
            .load_all()?
            .into_iter()
            .find(|m| m.id == *medicine_id)
            .ok_or_else(|| ServiceError::not_found("medicine", medicine_id))?;

        let alarm = medicine
            .alarms
            .iter_mut()
            .find(|a| a.id == *alarm_id)
            .ok_or_else(|| ServiceError::not_found("alarm", alarm_id))?;
        alarm.enabled = enabled;

        self.store.upsert(&medicine)?;
        tracing::info!(alarm = %alarm_id, enabled, "Alarm toggled");
        Ok(())
    }

    /// Arm the notification poll loop. No-op when already armed.
    pub fn start_polling(&self) {
        if let Ok(mut poller) = self.poller.lock() {
            if poller.is_some() {
                tracing::debug!("Poll loop already armed");
                return;
            }
            *poller = Some(notify::start_polling(
                Arc::clone(&self.store),
                Arc::clone(&self.notifier),
                Arc::clone(&self.clock),
                Duration::from_secs(config::POLL_INTERVAL_SECS),
            ));
        }
    }

    /// Stop the poll loop and release its timer thread.
    /// Safe to call at any point, including when idle.
    pub fn stop_polling(&self) {
        if let Ok(mut poller) = self.poller.lock() {
            // Dropping the handle signals shutdown and joins the thread.
            poller.take();
        }
    }

    pub fn is_polling(&self) -> bool {
        self.poller.lock().map(|p| p.is_some()).unwrap_or(false)
    }
}

impl Drop for MedicineService {
    fn drop(&mut self) {
        self.stop_polling();
    }
}
