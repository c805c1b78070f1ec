//! Per-user, per-day record of which doses were marked taken.
//!
//! Stored under `medTaken_{email}_{date}` as a JSON object keyed by
//! `{medication_id}_{time_label}`. Writes replace the whole object; the last
//! writer wins. Nothing here ever deletes a day.

use crate::schedule::slot_key;
use crate::storage::{taken_key, water_key, LocalStorage};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdherenceRecord {
    taken: BTreeMap<String, String>,
}

impl AdherenceRecord {
    pub fn get(&self, slot_key: &str) -> Option<&str> {
        self.taken.get(slot_key).map(String::as_str)
    }

    pub fn insert(&mut self, slot_key: impl Into<String>, taken_at: impl Into<String>) {
        self.taken.insert(slot_key.into(), taken_at.into());
    }

    pub fn len(&self) -> usize {
        self.taken.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }
}

pub fn load_day(store: &LocalStorage, email: &str, date: NaiveDate) -> AdherenceRecord {
    let key = taken_key(email, date);
    match store.get_item(&key) {
        Some(raw) => serde_json::from_str(raw).unwrap_or_else(|err| {
            warn!(key = %key, "ignoring unreadable adherence record: {err}");
            AdherenceRecord::default()
        }),
        None => AdherenceRecord::default(),
    }
}

pub fn save_day(
    store: &mut LocalStorage,
    email: &str,
    date: NaiveDate,
    record: &AdherenceRecord,
) -> Result<(), serde_json::Error> {
    store.set_item(taken_key(email, date), serde_json::to_string(record)?);
    Ok(())
}

pub fn is_taken(
    store: &LocalStorage,
    email: &str,
    date: NaiveDate,
    medication_id: &str,
    time_label: &str,
) -> Option<String> {
    load_day(store, email, date)
        .get(&slot_key(medication_id, time_label.trim()))
        .map(str::to_string)
}

/// Records `timestamp` for the slot and returns the updated day record.
pub fn mark_taken(
    store: &mut LocalStorage,
    email: &str,
    date: NaiveDate,
    medication_id: &str,
    time_label: &str,
    timestamp: &str,
) -> Result<AdherenceRecord, serde_json::Error> {
    let mut record = load_day(store, email, date);
    let key = slot_key(medication_id, time_label.trim());
    debug!(%key, %timestamp, "marking dose taken");
    record.insert(key, timestamp);
    save_day(store, email, date, &record)?;
    Ok(record)
}

/// Millilitres logged for the day; unreadable values count as zero.
pub fn water_for_day(store: &LocalStorage, email: &str, date: NaiveDate) -> u32 {
    store
        .get_item(&water_key(email, date))
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(0)
}

pub fn record_water(store: &mut LocalStorage, email: &str, date: NaiveDate, ml: u32) {
    store.set_item(water_key(email, date), ml.to_string());
}
