//! Expands medications into the day's dose slots.
//!
//! A slot is identified by `(medication id, trimmed time label)`. Slots are
//! recomputed from the medication list on every render and never stored, so
//! duplicate labels within one medication share a single adherence entry and
//! `duration` does not limit which days a medication appears on.

use crate::adherence::AdherenceRecord;
use crate::models::Medication;
use crate::progress::Progress;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DoseSlot {
    pub medication_id: String,
    pub medication_name: String,
    pub dosage: String,
    pub time_label: String,
}

impl DoseSlot {
    /// Inner adherence key, `{medication_id}_{time_label}`.
    pub fn key(&self) -> String {
        slot_key(&self.medication_id, &self.time_label)
    }
}

pub fn slot_key(medication_id: &str, time_label: &str) -> String {
    format!("{medication_id}_{time_label}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledDose {
    #[serde(flatten)]
    pub slot: DoseSlot,
    pub key: String,
    pub taken_at: Option<String>,
}

impl ScheduledDose {
    pub fn is_taken(&self) -> bool {
        self.taken_at.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleNotice {
    /// The user has no medications at all.
    NoMedications,
    /// Medications exist but none has a usable time label.
    NothingDue,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleView {
    pub date: String,
    pub doses: Vec<ScheduledDose>,
    pub progress: Progress,
    pub notice: Option<ScheduleNotice>,
}

/// Reply to marking a dose; `schedule` is absent when the medication list
/// could not be fetched.
#[derive(Debug, Clone, Serialize)]
pub struct TakenResponse {
    pub key: String,
    pub taken_at: String,
    pub schedule: Option<ScheduleView>,
}

/// Trimmed, non-empty labels of a frequency string, in order.
pub fn frequency_labels(frequency: &str) -> impl Iterator<Item = &str> {
    frequency
        .split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
}

pub fn derive_schedule(medications: &[Medication]) -> Vec<DoseSlot> {
    medications
        .iter()
        .flat_map(|med| {
            frequency_labels(&med.frequency).map(move |label| DoseSlot {
                medication_id: med.id.clone(),
                medication_name: med.name.clone(),
                dosage: med.dosage.clone(),
                time_label: label.to_string(),
            })
        })
        .collect()
}

pub fn annotate(slots: Vec<DoseSlot>, record: &AdherenceRecord) -> Vec<ScheduledDose> {
    slots
        .into_iter()
        .map(|slot| {
            let key = slot.key();
            let taken_at = record.get(&key).map(str::to_string);
            ScheduledDose {
                slot,
                key,
                taken_at,
            }
        })
        .collect()
}

pub fn build_view(date: &str, medications: &[Medication], record: &AdherenceRecord) -> ScheduleView {
    let doses = annotate(derive_schedule(medications), record);
    let notice = if medications.is_empty() {
        Some(ScheduleNotice::NoMedications)
    } else if doses.is_empty() {
        Some(ScheduleNotice::NothingDue)
    } else {
        None
    };

    ScheduleView {
        date: date.to_string(),
        progress: Progress::from_doses(&doses),
        doses,
        notice,
    }
}
