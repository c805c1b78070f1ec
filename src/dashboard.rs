//! Dashboard calculators and form checks that need no backend.

use crate::errors::AppError;
use crate::models::{Appointment, NewMedication, SignupForm};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

pub const WATER_GOAL_ML: u32 = 3000;
pub const WATER_MAX_ML: f64 = 10_000.0;

const ALLOWED_EMAIL_DOMAINS: [&str; 5] = [
    "gmail.com",
    "outlook.com",
    "hotmail.com",
    "yahoo.com",
    "rediffmail.com",
];

pub const DOCTORS: &[&str] = &[
    "Dr. Meera Sharma",
    "Dr. Arjun Patel",
    "Dr. Priya Desai",
    "Dr. Rahul Joshi",
    "Dr. Neha Kumar",
];

pub const TIME_SLOTS: &[&str] = &[
    "09:00 AM", "10:00 AM", "11:00 AM", "12:00 PM", "02:00 PM", "03:00 PM", "04:00 PM", "05:00 PM",
];

const HEALTH_TIPS: &[&str] = &[
    "Drink 8 glasses of water daily.",
    "Take a 10-minute walk every day.",
    "Eat fruits and vegetables regularly.",
    "Sleep 7-8 hours for better health.",
    "Avoid screens before sleep.",
    "Practice meditation for 5 minutes daily.",
    "Exercise at least 30 minutes a day.",
    "Include protein in every meal.",
    "Get some sunlight exposure daily.",
    "Avoid processed foods and sugary drinks.",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BmiReading {
    pub bmi: f64,
    pub category: &'static str,
}

pub fn bmi(height_cm: f64, weight_kg: f64) -> Result<BmiReading, AppError> {
    if !(height_cm > 0.0 && weight_kg > 0.0) {
        return Err(AppError::bad_request("Enter valid values."));
    }

    let meters = height_cm / 100.0;
    let bmi = (weight_kg / (meters * meters) * 100.0).round() / 100.0;
    let category = if bmi < 18.5 {
        "Underweight"
    } else if bmi < 25.0 {
        "Normal weight"
    } else if bmi < 30.0 {
        "Overweight"
    } else {
        "Obese"
    };

    Ok(BmiReading { bmi, category })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaloriePlan {
    pub calories: i64,
    pub goal: &'static str,
}

pub fn daily_calories(age: u32, gender: &str, goal: &str) -> Result<CaloriePlan, AppError> {
    if gender.trim().is_empty() || goal.trim().is_empty() || age == 0 {
        return Err(AppError::bad_request("Please fill all fields."));
    }
    if !(10..=100).contains(&age) {
        return Err(AppError::bad_request("Please enter a valid age (10-100)."));
    }

    let age = i64::from(age);
    let base = match gender {
        "male" => 2500 - age * 5,
        "female" => 2000 - age * 4,
        other => return Err(AppError::bad_request(format!("Unknown gender {other:?}."))),
    };
    let (calories, goal) = match goal {
        "lose" => (base - 500, "Weight Loss"),
        "gain" => (base + 500, "Weight Gain"),
        "maintain" => (base, "Maintenance"),
        other => return Err(AppError::bad_request(format!("Unknown goal {other:?}."))),
    };

    Ok(CaloriePlan { calories, goal })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterLevel {
    Low,
    Medium,
    Good,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterProgress {
    pub ml: u32,
    pub percent: u8,
    pub level: WaterLevel,
}

/// Accepts any amount in 0-10000 ml and rounds it to whole millilitres.
pub fn validate_water(ml: f64) -> Result<u32, AppError> {
    if !(0.0..=WATER_MAX_ML).contains(&ml) {
        return Err(AppError::bad_request(
            "Please enter a valid water amount (0-10000 ml)",
        ));
    }
    Ok(ml.round() as u32)
}

pub fn water_progress(ml: u32) -> WaterProgress {
    let percent = (f64::from(ml) / f64::from(WATER_GOAL_ML) * 100.0).min(100.0);
    let level = if percent < 33.0 {
        WaterLevel::Low
    } else if percent < 66.0 {
        WaterLevel::Medium
    } else {
        WaterLevel::Good
    };

    WaterProgress {
        ml,
        percent: percent.round() as u8,
        level,
    }
}

pub fn validate_email(email: &str) -> bool {
    let parts: Vec<&str> = email.trim().split('@').collect();
    match parts.as_slice() {
        [_, domain] => ALLOWED_EMAIL_DOMAINS.contains(&domain.to_lowercase().as_str()),
        _ => false,
    }
}

pub fn validate_signup(form: &SignupForm) -> Result<(), AppError> {
    if form.name.trim().is_empty()
        || form.email.trim().is_empty()
        || form.password.is_empty()
        || form.confirm.is_empty()
    {
        return Err(AppError::bad_request("Fill all fields."));
    }
    if !validate_email(&form.email) {
        return Err(AppError::bad_request(
            "Use Gmail, Outlook, Yahoo, Hotmail, Rediffmail only.",
        ));
    }
    if form.password.chars().count() < 6 {
        return Err(AppError::bad_request(
            "Password must be at least 6 characters.",
        ));
    }
    if form.password != form.confirm {
        return Err(AppError::bad_request("Passwords do not match."));
    }
    Ok(())
}

/// Returns the duration in days once every field is present.
pub fn validate_medication(form: &NewMedication) -> Result<u32, AppError> {
    if form.name.trim().is_empty()
        || form.dosage.trim().is_empty()
        || form.frequency.trim().is_empty()
        || form.duration.trim().is_empty()
    {
        return Err(AppError::bad_request("Please fill all medication details."));
    }
    match form.duration.trim().parse::<u32>() {
        Ok(days) if days > 0 => Ok(days),
        _ => Err(AppError::bad_request("Duration must be a whole number of days.")),
    }
}

pub fn validate_appointment(appointment: &Appointment, today: NaiveDate) -> Result<(), AppError> {
    if appointment.doctor.trim().is_empty()
        || appointment.date.trim().is_empty()
        || appointment.time.trim().is_empty()
    {
        return Err(AppError::bad_request("Please fill all appointment details."));
    }
    let date = NaiveDate::parse_from_str(appointment.date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::bad_request("Appointment date must be YYYY-MM-DD."))?;
    if date < today {
        return Err(AppError::bad_request("Appointment date cannot be in the past."));
    }
    Ok(())
}

pub fn tip_of_the_day(date: NaiveDate) -> &'static str {
    HEALTH_TIPS[date.ordinal0() as usize % HEALTH_TIPS.len()]
}
