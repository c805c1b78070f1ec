//! Periodic day-rollover check.
//!
//! Compares `lastReset_{email}` to the local date and, on a new day, records
//! the date and drops the cached medication list so the next schedule request
//! is rebuilt from fresh data against an empty adherence record.

use crate::errors::AppError;
use crate::state::AppState;
use crate::storage::{date_key, last_reset_key};
use chrono::{Local, NaiveDate};
use std::time::Duration;
use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tracing::{error, info};

/// Returns `true` when `today` is a new day for the signed-in user.
pub async fn check_rollover(state: &AppState, today: NaiveDate) -> Result<bool, AppError> {
    let Some(session) = state.current_session().await else {
        return Ok(false);
    };

    let key = last_reset_key(session.email());
    let today = date_key(today);
    {
        let mut store = state.store.lock().await;
        if store.get_item(&key) == Some(today.as_str()) {
            return Ok(false);
        }
        store.set_item(key, today.clone());
        state.persist(&store).await?;
    }

    state.invalidate_medications().await;
    info!(email = session.email(), date = %today, "day rolled over");
    Ok(true)
}

pub fn spawn(state: AppState, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            if let Err(err) = check_rollover(&state, Local::now().date_naive()).await {
                error!("day rollover check failed: {err}");
            }
        }
    })
}
