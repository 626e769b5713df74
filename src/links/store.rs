//! Key-value stores for linked users.
//!
//! A [`LinkStore`] keeps one [`LinkedUser`] per platform user id, with a
//! secondary lookup by leaderboard display name. Each operation is a single
//! row upsert, delete or read, and is atomic with respect to every other
//! operation on the same store.
//!
//! # File Format
//!
//! [`JsonFileLinkStore`] persists the whole table as one JSON document:
//!
//! ```json
//! {
//!   "schema_version": 1,
//!   "saved_at": "2024-01-15T12:00:00Z",
//!   "users": [{"user_id": "123", "display_name": "Zed", "linked_at": "..."}]
//! }
//! ```
//!
//! The document is rewritten atomically on every mutation (see `fsync.rs`),
//! and the in-memory table is only updated after the write succeeded.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::fsync::write_atomic;
use crate::types::UserId;

/// Current schema version. Increment when making breaking changes.
pub const SCHEMA_VERSION: u32 = 1;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Schema version mismatch.
    #[error("schema version mismatch: expected {expected}, got {got}")]
    SchemaMismatch { expected: u32, got: u32 },
}

/// A platform user linked to a leaderboard display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedUser {
    pub user_id: UserId,
    pub display_name: String,
    pub linked_at: DateTime<Utc>,
}

impl LinkedUser {
    pub fn new(user_id: UserId, display_name: impl Into<String>) -> Self {
        LinkedUser {
            user_id,
            display_name: display_name.into(),
            linked_at: Utc::now(),
        }
    }
}

/// Durable storage for linked users, keyed by user id.
pub trait LinkStore: Send + Sync {
    /// Inserts `user`, or overwrites the row with the same user id.
    fn upsert(&self, user: LinkedUser) -> Result<(), StoreError>;

    /// Deletes the row for `user_id`, returning it if it existed.
    fn delete(&self, user_id: UserId) -> Result<Option<LinkedUser>, StoreError>;

    /// Reads the row for `user_id`.
    fn get(&self, user_id: UserId) -> Result<Option<LinkedUser>, StoreError>;

    /// Reads the first row whose display name is exactly `name`.
    fn get_by_display_name(&self, name: &str) -> Result<Option<LinkedUser>, StoreError>;

    /// Reads every row, ordered by user id.
    fn all(&self) -> Result<Vec<LinkedUser>, StoreError>;
}

type Table = BTreeMap<UserId, LinkedUser>;

fn find_by_name(table: &Table, name: &str) -> Option<LinkedUser> {
    table.values().find(|u| u.display_name == name).cloned()
}

/// In-memory store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryLinkStore {
    table: Mutex<Table>,
}

impl MemoryLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = LinkedUser>) -> Self {
        let table = users.into_iter().map(|u| (u.user_id, u)).collect();
        MemoryLinkStore {
            table: Mutex::new(table),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LinkStore for MemoryLinkStore {
    fn upsert(&self, user: LinkedUser) -> Result<(), StoreError> {
        self.lock().insert(user.user_id, user);
        Ok(())
    }

    fn delete(&self, user_id: UserId) -> Result<Option<LinkedUser>, StoreError> {
        Ok(self.lock().remove(&user_id))
    }

    fn get(&self, user_id: UserId) -> Result<Option<LinkedUser>, StoreError> {
        Ok(self.lock().get(&user_id).cloned())
    }

    fn get_by_display_name(&self, name: &str) -> Result<Option<LinkedUser>, StoreError> {
        Ok(find_by_name(&self.lock(), name))
    }

    fn all(&self) -> Result<Vec<LinkedUser>, StoreError> {
        Ok(self.lock().values().cloned().collect())
    }
}

/// On-disk document written by [`JsonFileLinkStore`].
#[derive(Debug, Serialize, Deserialize)]
struct PersistedLinks {
    schema_version: u32,
    saved_at: DateTime<Utc>,
    users: Vec<LinkedUser>,
}

/// Store backed by a single JSON file, rewritten atomically on each mutation.
#[derive(Debug)]
pub struct JsonFileLinkStore {
    path: PathBuf,
    table: Mutex<Table>,
}

impl JsonFileLinkStore {
    /// Opens the store at `path`, starting empty if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, is malformed,
    /// or has an incompatible schema version.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let table = match load(&path) {
            Ok(users) => users.into_iter().map(|u| (u.user_id, u)).collect(),
            Err(StoreError::Io(e)) if e.kind() == io::ErrorKind::NotFound => Table::new(),
            Err(e) => return Err(e),
        };
        Ok(JsonFileLinkStore {
            path,
            table: Mutex::new(table),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `mutate` to a copy of the table, persists it, then commits.
    fn mutate<T>(&self, mutate: impl FnOnce(&mut Table) -> T) -> Result<T, StoreError> {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = table.clone();
        let result = mutate(&mut next);
        save(&self.path, &next)?;
        *table = next;
        Ok(result)
    }

    fn read<T>(&self, read: impl FnOnce(&Table) -> T) -> T {
        read(&self.table.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl LinkStore for JsonFileLinkStore {
    fn upsert(&self, user: LinkedUser) -> Result<(), StoreError> {
        self.mutate(|table| {
            table.insert(user.user_id, user);
        })
    }

    fn delete(&self, user_id: UserId) -> Result<Option<LinkedUser>, StoreError> {
        if self.read(|table| !table.contains_key(&user_id)) {
            return Ok(None);
        }
        self.mutate(|table| table.remove(&user_id))
    }

    fn get(&self, user_id: UserId) -> Result<Option<LinkedUser>, StoreError> {
        Ok(self.read(|table| table.get(&user_id).cloned()))
    }

    fn get_by_display_name(&self, name: &str) -> Result<Option<LinkedUser>, StoreError> {
        Ok(self.read(|table| find_by_name(table, name)))
    }

    fn all(&self) -> Result<Vec<LinkedUser>, StoreError> {
        Ok(self.read(|table| table.values().cloned().collect()))
    }
}

fn load(path: &Path) -> Result<Vec<LinkedUser>, StoreError> {
    let bytes = std::fs::read(path)?;
    let persisted: PersistedLinks = serde_json::from_slice(&bytes)?;
    if persisted.schema_version != SCHEMA_VERSION {
        return Err(StoreError::SchemaMismatch {
            expected: SCHEMA_VERSION,
            got: persisted.schema_version,
        });
    }
    Ok(persisted.users)
}

fn save(path: &Path, table: &Table) -> Result<(), StoreError> {
    let persisted = PersistedLinks {
        schema_version: SCHEMA_VERSION,
        saved_at: Utc::now(),
        users: table.values().cloned().collect(),
    };
    let bytes = serde_json::to_vec_pretty(&persisted)?;
    write_atomic(path, &bytes)?;
    Ok(())
}
