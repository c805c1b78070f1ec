//! Client for the remote health backend.
//!
//! Every endpoint is a JSON `POST`. Replies are decoded whatever the HTTP
//! status; `{"status": "error"}` replies surface as bad requests carrying the
//! backend's message. Failed calls are not retried.

use crate::errors::AppError;
use crate::models::{
    AddMedicationRequest, Appointment, AppointmentRequest, ChatReply, ChatRequest, EmailRequest,
    HealthRecord, HealthRecordRequest, LoginReply, LoginRequest, Medication, ProfileRequest,
    SignupRequest, StatusReply, User,
};
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, error};

pub const SERVER_ERROR: &str = "Server error. Make sure the backend is running.";

#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, AppError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(AppError::internal)?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send<B>(&self, path: &str, body: &B) -> Result<Response, AppError>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "backend request");

        self.http.post(&url).json(body).send().await.map_err(|err| {
            error!(%url, "backend request failed: {err}");
            AppError::bad_gateway(SERVER_ERROR)
        })
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, AppError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.send(path, body).await?;
        response.json::<R>().await.map_err(|err| {
            error!(path, "backend reply could not be decoded: {err}");
            AppError::bad_gateway(SERVER_ERROR)
        })
    }

    async fn post_status<B>(&self, path: &str, body: &B) -> Result<StatusReply, AppError>
    where
        B: Serialize + ?Sized,
    {
        let reply: StatusReply = self.post(path, body).await?;
        if reply.is_error() {
            return Err(AppError::bad_request(reply.msg));
        }
        Ok(reply)
    }

    pub async fn signup(&self, request: &SignupRequest) -> Result<StatusReply, AppError> {
        self.post_status("/signup", request).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, AppError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let reply: LoginReply = self.post("/login", &request).await?;
        if reply.status == "error" {
            return Err(AppError::unauthorized(reply.msg));
        }
        reply
            .user
            .ok_or_else(|| AppError::bad_gateway("Login reply did not include a user."))
    }

    pub async fn medications(&self, email: &str) -> Result<Vec<Medication>, AppError> {
        self.post("/medication/get", &email_body(email)).await
    }

    pub async fn add_medication(&self, request: &AddMedicationRequest) -> Result<StatusReply, AppError> {
        self.post_status("/medication/add", request).await
    }

    pub async fn appointments(&self, email: &str) -> Result<Vec<Appointment>, AppError> {
        self.post("/appointment/get", &email_body(email)).await
    }

    pub async fn add_appointment(&self, request: &AppointmentRequest) -> Result<StatusReply, AppError> {
        self.post_status("/appointment/add", request).await
    }

    pub async fn health_records(&self, email: &str) -> Result<Option<HealthRecord>, AppError> {
        self.post("/health_records/get", &email_body(email)).await
    }

    pub async fn save_health_records(&self, request: &HealthRecordRequest) -> Result<StatusReply, AppError> {
        self.post_status("/health_records/save", request).await
    }

    /// The profile endpoint's reply carries nothing the client uses.
    pub async fn save_profile(&self, request: &ProfileRequest) -> Result<(), AppError> {
        self.send("/profile/save", request).await?;
        Ok(())
    }

    pub async fn chat(&self, question: &str) -> Result<String, AppError> {
        let request = ChatRequest {
            question: question.to_string(),
        };
        let reply: ChatReply = self.post("/chat", &request).await?;
        Ok(reply.reply)
    }
}

fn email_body(email: &str) -> EmailRequest {
    EmailRequest {
        email: email.to_string(),
    }
}
