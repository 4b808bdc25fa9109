//! Persistent wizard state.
//!
//! A filing in progress is carried between commands in a small `SQLite`
//! database: a flat table of named [`Slot`]s plus a separate credentials
//! table for the access token. Slots have no TTL; they live until a new
//! filing starts or the user logs out.

pub mod migrations;
pub mod schema;
mod slots;

use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, trace};

use crate::error::{Error, Result};

pub use slots::Slot;

/// Credential row name.
const ACCESS_TOKEN: &str = "access_token";

/// Storage engine for wizard slots and the session credential.
#[derive(Debug)]
pub struct Store {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Store {
    /// Open or create a store at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening wizard store at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Wizard store opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get(&self, slot: Slot) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM slots WHERE name = ?1",
                [slot.key()],
                |row| row.get(0),
            )
            .optional()?;
        trace!(slot = %slot, present = value.is_some(), "Read slot");
        Ok(value)
    }

    /// Read a slot, treating an empty value the same as a missing one.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_present(&self, slot: Slot) -> Result<Option<String>> {
        Ok(self.get(slot)?.filter(|value| !value.is_empty()))
    }

    /// Check whether a slot holds a non-empty value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn is_present(&self, slot: Slot) -> Result<bool> {
        Ok(self.get_present(slot)?.is_some())
    }

    /// Write a slot, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn set(&self, slot: Slot, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO slots (name, value, updated_at) VALUES (?1, ?2, ?3)",
            params![slot.key(), value, Utc::now().to_rfc3339()],
        )?;
        trace!(slot = %slot, "Wrote slot");
        Ok(())
    }

    /// Remove a slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn remove(&self, slot: Slot) -> Result<()> {
        self.conn
            .execute("DELETE FROM slots WHERE name = ?1", [slot.key()])?;
        Ok(())
    }

    /// Read a JSON slot.
    ///
    /// An empty slot reads as `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails or the stored JSON
    /// does not match `T`.
    pub fn get_json<T: DeserializeOwned>(&self, slot: Slot) -> Result<Option<T>> {
        match self.get_present(slot)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Write a JSON slot.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the database operation fails.
    pub fn set_json<T: Serialize + ?Sized>(&self, slot: Slot, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.set(slot, &raw)
    }

    /// Clear every wizard slot. The credential is left alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn clear_wizard(&self) -> Result<()> {
        let removed = self.conn.execute("DELETE FROM slots", [])?;
        debug!(removed, "Cleared wizard slots");
        Ok(())
    }

    /// Read the stored access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn credential(&self) -> Result<Option<String>> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM credentials WHERE name = ?1",
                [ACCESS_TOKEN],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.filter(|token| !token.is_empty()))
    }

    /// Store the access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn set_credential(&self, token: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO credentials (name, value, updated_at) VALUES (?1, ?2, ?3)",
            params![ACCESS_TOKEN, token, Utc::now().to_rfc3339()],
        )?;
        debug!("Stored access token");
        Ok(())
    }

    /// Remove the access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn clear_credential(&self) -> Result<()> {
        self.conn
            .execute("DELETE FROM credentials WHERE name = ?1", [ACCESS_TOKEN])?;
        Ok(())
    }

    /// Clear every slot and the credential (logout).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn clear_all(&self) -> Result<()> {
        self.clear_wizard()?;
        self.clear_credential()
    }

    /// Report which slots currently hold a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn slot_status(&self) -> Result<Vec<(Slot, bool)>> {
        Slot::ALL
            .into_iter()
            .map(|slot| Ok((slot, self.is_present(slot)?)))
            .collect()
    }
}
