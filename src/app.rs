use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/session", get(handlers::get_session))
        .route("/api/signup", post(handlers::signup))
        .route("/api/login", post(handlers::login))
        .route("/api/logout", post(handlers::logout))
        .route(
            "/api/medications",
            get(handlers::get_medications).post(handlers::add_medication),
        )
        .route("/api/schedule", get(handlers::get_schedule))
        .route("/api/schedule/taken", post(handlers::mark_dose_taken))
        .route("/api/water", get(handlers::get_water).post(handlers::track_water))
        .route("/api/bmi", post(handlers::calculate_bmi))
        .route("/api/calories", post(handlers::calculate_calories))
        .route("/api/appointments/options", get(handlers::appointment_options))
        .route(
            "/api/appointments",
            get(handlers::get_appointments).post(handlers::add_appointment),
        )
        .route(
            "/api/health-records",
            get(handlers::get_health_records).post(handlers::save_health_records),
        )
        .route("/api/profile", post(handlers::save_profile))
        .route("/api/chat", post(handlers::chat))
        .route("/api/tip", get(handlers::get_tip))
        .with_state(state)
}
