use crate::adherence;
use crate::dashboard::{self, BmiReading, CaloriePlan, WaterProgress};
use crate::errors::AppError;
use crate::models::{
    AddMedicationRequest, Appointment, AppointmentOptions, AppointmentRequest, BmiRequest,
    CaloriesRequest, ChatReply, ChatRequest, HealthRecord, HealthRecordRequest, LoginRequest,
    Medication, MessageResponse, NewMedication, ProfileRequest, ProfileUpdate, SessionResponse,
    SignupForm, SignupRequest, TakenRequest, TipResponse, WaterRequest,
};
use crate::schedule::{build_view, slot_key, ScheduleView, TakenResponse};
use crate::session::Session;
use crate::state::AppState;
use crate::storage::date_key;
use crate::ui::render_index;
use axum::{extract::State, response::Html, Json};
use chrono::{Local, NaiveDate};
use tracing::{info, warn};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let session = state.current_session().await;
    let today = today();
    Html(render_index(
        session.as_ref().map(|session| &session.user),
        &date_key(today),
        dashboard::tip_of_the_day(today),
    ))
}

pub async fn get_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let session = state.current_session().await;
    Json(SessionResponse {
        user: session.map(|session| session.user),
    })
}

pub async fn signup(
    State(state): State<AppState>,
    Json(form): Json<SignupForm>,
) -> Result<Json<MessageResponse>, AppError> {
    dashboard::validate_signup(&form)?;

    let request = SignupRequest {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        password: form.password,
    };
    let reply = state.backend.signup(&request).await?;
    Ok(Json(MessageResponse { msg: reply.msg }))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let email = payload.email.trim();
    if email.is_empty() || payload.password.is_empty() {
        return Err(AppError::bad_request("Enter email and password."));
    }
    if !dashboard::validate_email(email) {
        return Err(AppError::bad_request("Invalid email format."));
    }

    let user = state.backend.login(email, &payload.password).await?;
    let session = Session::new(user);
    {
        let mut store = state.store.lock().await;
        session.persist(&mut store)?;
        state.persist(&store).await?;
    }
    state.invalidate_medications().await;
    *state.session.lock().await = Some(session.clone());

    info!(email = session.email(), "signed in");
    Ok(Json(SessionResponse {
        user: Some(session.user),
    }))
}

pub async fn logout(State(state): State<AppState>) -> Result<Json<SessionResponse>, AppError> {
    let previous = state.session.lock().await.take();
    {
        let mut store = state.store.lock().await;
        Session::teardown(&mut store);
        state.persist(&store).await?;
    }
    state.invalidate_medications().await;

    if let Some(session) = previous {
        info!(email = session.email(), "signed out");
    }
    Ok(Json(SessionResponse { user: None }))
}

pub async fn get_medications(State(state): State<AppState>) -> Result<Json<Vec<Medication>>, AppError> {
    let session = state.require_session().await?;
    let medications = state.backend.medications(session.email()).await?;
    state
        .cache_medications(session.email(), today(), medications.clone())
        .await;
    Ok(Json(medications))
}

pub async fn add_medication(
    State(state): State<AppState>,
    Json(form): Json<NewMedication>,
) -> Result<Json<MessageResponse>, AppError> {
    let session = state.require_session().await?;
    let duration = dashboard::validate_medication(&form)?;

    let request = AddMedicationRequest {
        email: session.email().to_string(),
        name: form.name.trim().to_string(),
        dosage: form.dosage.trim().to_string(),
        frequency: form.frequency,
        duration,
    };
    let reply = state.backend.add_medication(&request).await?;
    state.invalidate_medications().await;
    Ok(Json(MessageResponse { msg: reply.msg }))
}

pub async fn get_schedule(State(state): State<AppState>) -> Result<Json<ScheduleView>, AppError> {
    let session = state.require_session().await?;
    let today = today();
    let medications = todays_medications(&state, &session, today).await?;
    Ok(Json(schedule_view(&state, &session, today, &medications).await))
}

pub async fn mark_dose_taken(
    State(state): State<AppState>,
    Json(payload): Json<TakenRequest>,
) -> Result<Json<TakenResponse>, AppError> {
    let session = state.require_session().await?;
    let time_label = payload.time_label.trim();
    if payload.medication_id.is_empty() || time_label.is_empty() {
        return Err(AppError::bad_request("medication_id and time_label are required"));
    }

    let today = today();
    let taken_at = Local::now().format("%H:%M").to_string();
    {
        let mut store = state.store.lock().await;
        adherence::mark_taken(
            &mut store,
            session.email(),
            today,
            &payload.medication_id,
            time_label,
            &taken_at,
        )?;
        state.persist(&store).await?;
    }

    // The dose is recorded even when the medication list cannot be refreshed.
    let schedule = match todays_medications(&state, &session, today).await {
        Ok(medications) => {
            let name = medications
                .iter()
                .find(|med| med.id == payload.medication_id)
                .map_or(payload.medication_id.as_str(), |med| med.name.as_str());
            info!(email = session.email(), medication = name, time = time_label, %taken_at, "dose taken");
            Some(schedule_view(&state, &session, today, &medications).await)
        }
        Err(err) => {
            info!(email = session.email(), medication = %payload.medication_id, time = time_label, %taken_at, "dose taken");
            warn!("schedule not refreshed after marking dose: {err}");
            None
        }
    };

    Ok(Json(TakenResponse {
        key: slot_key(&payload.medication_id, time_label),
        taken_at,
        schedule,
    }))
}

pub async fn get_water(State(state): State<AppState>) -> Result<Json<WaterProgress>, AppError> {
    let session = state.require_session().await?;
    let store = state.store.lock().await;
    let ml = adherence::water_for_day(&store, session.email(), today());
    Ok(Json(dashboard::water_progress(ml)))
}

pub async fn track_water(
    State(state): State<AppState>,
    Json(payload): Json<WaterRequest>,
) -> Result<Json<WaterProgress>, AppError> {
    let session = state.require_session().await?;
    let ml = dashboard::validate_water(payload.ml)?;

    let mut store = state.store.lock().await;
    adherence::record_water(&mut store, session.email(), today(), ml);
    state.persist(&store).await?;
    Ok(Json(dashboard::water_progress(ml)))
}

pub async fn calculate_bmi(Json(payload): Json<BmiRequest>) -> Result<Json<BmiReading>, AppError> {
    Ok(Json(dashboard::bmi(payload.height, payload.weight)?))
}

pub async fn calculate_calories(
    Json(payload): Json<CaloriesRequest>,
) -> Result<Json<CaloriePlan>, AppError> {
    Ok(Json(dashboard::daily_calories(
        payload.age,
        payload.gender.trim(),
        payload.goal.trim(),
    )?))
}

pub async fn appointment_options() -> Json<AppointmentOptions> {
    Json(AppointmentOptions {
        doctors: dashboard::DOCTORS,
        time_slots: dashboard::TIME_SLOTS,
    })
}

pub async fn get_appointments(State(state): State<AppState>) -> Result<Json<Vec<Appointment>>, AppError> {
    let session = state.require_session().await?;
    Ok(Json(state.backend.appointments(session.email()).await?))
}

pub async fn add_appointment(
    State(state): State<AppState>,
    Json(appointment): Json<Appointment>,
) -> Result<Json<MessageResponse>, AppError> {
    let session = state.require_session().await?;
    dashboard::validate_appointment(&appointment, today())?;

    let request = AppointmentRequest {
        email: session.email().to_string(),
        appointment,
    };
    let reply = state.backend.add_appointment(&request).await?;
    Ok(Json(MessageResponse { msg: reply.msg }))
}

pub async fn get_health_records(State(state): State<AppState>) -> Result<Json<HealthRecord>, AppError> {
    let session = state.require_session().await?;
    let record = state.backend.health_records(session.email()).await?;
    Ok(Json(record.unwrap_or_default()))
}

pub async fn save_health_records(
    State(state): State<AppState>,
    Json(record): Json<HealthRecord>,
) -> Result<Json<MessageResponse>, AppError> {
    let session = state.require_session().await?;
    let request = HealthRecordRequest {
        email: session.email().to_string(),
        record,
    };
    let reply = state.backend.save_health_records(&request).await?;
    Ok(Json(MessageResponse { msg: reply.msg }))
}

pub async fn save_profile(
    State(state): State<AppState>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<SessionResponse>, AppError> {
    let mut session = state.require_session().await?;
    let request = ProfileRequest {
        email: session.email().to_string(),
        name: update.name.trim().to_string(),
        age: update.age.trim().to_string(),
        bio: update.bio.trim().to_string(),
    };
    state.backend.save_profile(&request).await?;

    session.user.name = request.name;
    session.user.age = request.age;
    session.user.bio = request.bio;
    {
        let mut store = state.store.lock().await;
        session.persist(&mut store)?;
        state.persist(&store).await?;
    }
    *state.session.lock().await = Some(session.clone());

    Ok(Json(SessionResponse {
        user: Some(session.user),
    }))
}

pub async fn chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    let question = payload.question.trim();
    if question.is_empty() {
        return Err(AppError::bad_request("Ask a question first."));
    }
    let reply = state.backend.chat(question).await?;
    Ok(Json(ChatReply { reply }))
}

pub async fn get_tip() -> Json<TipResponse> {
    Json(TipResponse {
        tip: dashboard::tip_of_the_day(today()),
    })
}

async fn todays_medications(
    state: &AppState,
    session: &Session,
    today: NaiveDate,
) -> Result<Vec<Medication>, AppError> {
    if let Some(medications) = state.cached_medications(session.email(), today).await {
        return Ok(medications);
    }

    let medications = state.backend.medications(session.email()).await?;
    state
        .cache_medications(session.email(), today, medications.clone())
        .await;
    Ok(medications)
}

async fn schedule_view(
    state: &AppState,
    session: &Session,
    today: NaiveDate,
    medications: &[Medication],
) -> ScheduleView {
    let record = {
        let store = state.store.lock().await;
        adherence::load_day(&store, session.email(), today)
    };
    build_view(&date_key(today), medications, &record)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
