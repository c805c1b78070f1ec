use crate::backend::BackendClient;
use crate::errors::AppError;
use crate::models::Medication;
use crate::session::Session;
use crate::storage::{persist_storage, LocalStorage};
use chrono::NaiveDate;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

/// Medication list fetched for one user on one day.
#[derive(Debug, Clone)]
pub struct MedicationCache {
    pub email: String,
    pub date: NaiveDate,
    pub medications: Vec<Medication>,
}

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub store: Arc<Mutex<LocalStorage>>,
    pub session: Arc<Mutex<Option<Session>>>,
    pub medications: Arc<Mutex<Option<MedicationCache>>>,
    pub backend: BackendClient,
}

impl AppState {
    pub fn new(data_path: PathBuf, store: LocalStorage, backend: BackendClient) -> Self {
        let session = Session::restore(&store);
        Self {
            data_path,
            store: Arc::new(Mutex::new(store)),
            session: Arc::new(Mutex::new(session)),
            medications: Arc::new(Mutex::new(None)),
            backend,
        }
    }

    pub async fn current_session(&self) -> Option<Session> {
        self.session.lock().await.clone()
    }

    pub async fn require_session(&self) -> Result<Session, AppError> {
        self.current_session()
            .await
            .ok_or_else(|| AppError::unauthorized("Please log in first."))
    }

    pub async fn persist(&self, store: &LocalStorage) -> Result<(), AppError> {
        persist_storage(&self.data_path, store).await
    }

    pub async fn cached_medications(&self, email: &str, date: NaiveDate) -> Option<Vec<Medication>> {
        self.medications
            .lock()
            .await
            .as_ref()
            .filter(|cache| cache.email == email && cache.date == date)
            .map(|cache| cache.medications.clone())
    }

    pub async fn cache_medications(&self, email: &str, date: NaiveDate, medications: Vec<Medication>) {
        *self.medications.lock().await = Some(MedicationCache {
            email: email.to_string(),
            date,
            medications,
        });
    }

    pub async fn invalidate_medications(&self) {
        self.medications.lock().await.take();
    }
}
