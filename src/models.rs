use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Signed-in user as returned by the backend's `/login`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub age: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub bio: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    #[serde(deserialize_with = "lenient_text")]
    pub id: String,
    pub name: String,
    pub dosage: String,
    /// Comma-separated time labels, one dose per label per day.
    pub frequency: String,
    /// Regimen length in days. Informational only.
    #[serde(default, deserialize_with = "lenient_days")]
    pub duration: u32,
}

/// Generic `{status, msg}` reply used by most backend endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReply {
    pub status: String,
    #[serde(default)]
    pub msg: String,
}

impl StatusReply {
    pub fn is_error(&self) -> bool {
        self.status == "error"
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginReply {
    pub status: String,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

/// Medication form as submitted by the page; `duration` is raw input.
#[derive(Debug, Deserialize)]
pub struct NewMedication {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    #[serde(deserialize_with = "lenient_text")]
    pub duration: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddMedicationRequest {
    pub email: String,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub doctor: String,
    pub date: String,
    pub time: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AppointmentRequest {
    pub email: String,
    #[serde(flatten)]
    pub appointment: Appointment,
}

#[derive(Debug, Serialize)]
pub struct AppointmentOptions {
    pub doctors: &'static [&'static str],
    pub time_slots: &'static [&'static str],
}

/// Free-text health record; every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthRecord {
    #[serde(deserialize_with = "lenient_text")]
    pub blood_group: String,
    #[serde(deserialize_with = "lenient_text")]
    pub height: String,
    #[serde(deserialize_with = "lenient_text")]
    pub weight: String,
    #[serde(deserialize_with = "lenient_text")]
    pub emergency_name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub emergency_relation: String,
    #[serde(deserialize_with = "lenient_text")]
    pub emergency_phone: String,
    #[serde(deserialize_with = "lenient_text")]
    pub medical_conditions: String,
    #[serde(deserialize_with = "lenient_text")]
    pub allergies: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthRecordRequest {
    pub email: String,
    #[serde(flatten)]
    pub record: HealthRecord,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileUpdate {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub age: String,
    #[serde(default)]
    pub bio: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileRequest {
    pub email: String,
    pub name: String,
    pub age: String,
    pub bio: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub reply: String,
}

#[derive(Debug, Deserialize)]
pub struct TakenRequest {
    pub medication_id: String,
    pub time_label: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub msg: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub user: Option<User>,
}

#[derive(Debug, Deserialize)]
pub struct WaterRequest {
    pub ml: f64,
}

#[derive(Debug, Deserialize)]
pub struct BmiRequest {
    pub height: f64,
    pub weight: f64,
}

#[derive(Debug, Deserialize)]
pub struct CaloriesRequest {
    pub age: u32,
    pub gender: String,
    pub goal: String,
}

#[derive(Debug, Serialize)]
pub struct TipResponse {
    pub tip: &'static str,
}

/// Accepts a JSON string, number or null and yields its text form.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

fn lenient_days<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(number) => number
            .as_u64()
            .and_then(|days| u32::try_from(days).ok())
            .ok_or_else(|| de::Error::custom(format!("invalid duration {number}"))),
        Value::String(text) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid duration {text:?}"))),
        Value::Null => Ok(0),
        other => Err(de::Error::custom(format!(
            "expected duration in days, got {other}"
        ))),
    }
}
