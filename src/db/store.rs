//! Durable keyed persistence for the medicine collection.
//!
//! The whole collection lives under a single well-known key as a JSON
//! payload, mirroring the original client's localStorage record. `save_all`
//! is a single-statement swap: a concurrent `load_all` observes the old or
//! the new collection, never a torn write. Every mutating operation is
//! durable before it returns.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::config;
use crate::models::Medicine;

use super::{open_database, open_memory_database, StorageError};

/// Store abstraction shared by UI-facing operations and the poll loop.
///
/// All mutation of the persisted collection goes through this interface;
/// concurrent writers get last-writer-wins semantics.
pub trait MedicineStore: Send + Sync {
    /// Full collection; empty when nothing has been saved yet.
    /// Fails with [`StorageError::Corrupt`] when the payload does not decode
    /// as valid medicine records.
    fn load_all(&self) -> Result<Vec<Medicine>, StorageError>;

    /// Replace the entire collection.
    fn save_all(&self, medicines: &[Medicine]) -> Result<(), StorageError>;

    /// Insert new or replace existing by id. Returns `true` when an
    /// existing record was replaced.
    fn upsert(&self, medicine: &Medicine) -> Result<bool, StorageError>;

    /// Delete by id; an absent id is a no-op, not an error.
    fn remove(&self, id: &Uuid) -> Result<(), StorageError>;
}

/// SQLite-backed [`MedicineStore`]: one key/value row holds the collection.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        Ok(Self {
            conn: Mutex::new(open_database(path)?),
        })
    }

    /// In-memory store, used by tests.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self {
            conn: Mutex::new(open_memory_database()?),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::Poisoned)
    }

    fn read_payload(conn: &Connection) -> Result<Vec<Medicine>, StorageError> {
        let payload: Option<String> = conn
            .query_row(
                "SELECT value FROM store WHERE key = ?1",
                params![config::MEDICINES_STORE_KEY],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            None => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw).map_err(|e| StorageError::Corrupt {
                reason: e.to_string(),
            }),
        }
    }

    fn write_payload(conn: &Connection, medicines: &[Medicine]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(medicines)?;
        conn.execute(
            "INSERT INTO store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![config::MEDICINES_STORE_KEY, raw],
        )?;
        Ok(())
    }
}

impl MedicineStore for SqliteStore {
    fn load_all(&self) -> Result<Vec<Medicine>, StorageError> {
        let conn = self.conn()?;
        Self::read_payload(&conn)
    }

    fn save_all(&self, medicines: &[Medicine]) -> Result<(), StorageError> {
        let conn = self.conn()?;
        Self::write_payload(&conn, medicines)
    }

    fn upsert(&self, medicine: &Medicine) -> Result<bool, StorageError> {
        // Read-modify-write under the connection lock.
        let conn = self.conn()?;
        let mut medicines = Self::read_payload(&conn)?;
        let replaced = match medicines.iter_mut().find(|m| m.id == medicine.id) {
            Some(slot) => {
                *slot = medicine.clone();
                true
            }
            None => {
                medicines.push(medicine.clone());
                false
            }
        };
        Self::write_payload(&conn, &medicines)?;
        Ok(replaced)
    }

    fn remove(&self, id: &Uuid) -> Result<(), StorageError> {
        let conn = self.conn()?;
        let mut medicines = Self::read_payload(&conn)?;
        medicines.retain(|m| m.id != *id);
        Self::write_payload(&conn, &medicines)
    }
}
