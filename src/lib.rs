pub mod adherence;
pub mod app;
pub mod backend;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod progress;
pub mod rollover;
pub mod schedule;
pub mod session;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::{load_storage, persist_storage};
