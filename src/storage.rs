//! Client-local key/value storage.
//!
//! Mirrors browser local storage: every value is a string and the whole store
//! is written back as a single JSON object after each mutation. Key layouts
//! are fixed so existing stored state stays readable.

use crate::errors::AppError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::Path};
use tokio::fs;
use tracing::error;

pub const CURRENT_USER_KEY: &str = "currentUser";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalStorage {
    entries: BTreeMap<String, String>,
}

impl LocalStorage {
    pub fn get_item(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set_item(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn remove_item(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// ISO calendar date, `YYYY-MM-DD`.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `medTaken_{email}_{date}`: the day's adherence object.
pub fn taken_key(email: &str, date: NaiveDate) -> String {
    format!("medTaken_{email}_{}", date_key(date))
}

/// `water_{email}_{date}`: millilitres logged for the day.
pub fn water_key(email: &str, date: NaiveDate) -> String {
    format!("water_{email}_{}", date_key(date))
}

/// `lastReset_{email}`: last date the rollover check saw.
pub fn last_reset_key(email: &str) -> String {
    format!("lastReset_{email}")
}

pub async fn load_storage(path: &Path) -> LocalStorage {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(storage) => storage,
            Err(err) => {
                error!("failed to parse storage file {}: {err}", path.display());
                LocalStorage::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => LocalStorage::default(),
        Err(err) => {
            error!("failed to read storage file {}: {err}", path.display());
            LocalStorage::default()
        }
    }
}

pub async fn persist_storage(path: &Path, storage: &LocalStorage) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(storage)?;
    fs::write(path, payload).await?;
    Ok(())
}
