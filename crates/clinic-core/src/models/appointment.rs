use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::{Doctor, Gender, SlotStatus, Validate, require};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Visited,
    Canceled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Visited => write!(f, "visited"),
            AppointmentStatus::Canceled => write!(f, "canceled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentPatient {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: String,
    pub date_of_birth: String,
    pub gender: Gender,
}

/// Schedule day a booked slot belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub date: String,
    #[serde(rename = "startTime")]
    pub start_time: String,
    #[serde(rename = "totalSlot")]
    pub total_slot: u32,
    pub slot_duration_minutes: u32,
    #[serde(rename = "isActive")]
    pub is_active: bool,
}

/// The time slot an appointment occupies, with its schedule day populated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedSlot {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "startTime")]
    pub start_time: String,
    #[serde(rename = "endTime")]
    pub end_time: String,
    pub duration_minutes: u32,
    pub status: SlotStatus,
    pub schedule: ScheduleSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(rename = "_id")]
    pub id: String,
    pub patient: AppointmentPatient,
    pub doctor: Doctor,
    /// `None` once the slot has been deleted on the backend
    pub schedule: Option<BookedSlot>,
    pub status: AppointmentStatus,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl Appointment {
    pub fn slot_id(&self) -> Option<&str> {
        self.schedule.as_ref().map(|slot| slot.id.as_str())
    }
}

/// `GET /appointments/{scheduleId}` answers with either one appointment or an
/// array; callers always see an array.
pub fn normalize_appointment_list(value: Value) -> Value {
    match value {
        Value::Array(_) => value,
        Value::Null => Value::Array(Vec::new()),
        other => Value::Array(vec![other]),
    }
}

/// Payload for `POST /appointments`. `patient` is resolved from the bearer
/// token when omitted.
#[derive(Debug, Clone, Serialize)]
pub struct CreateAppointmentDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient: Option<String>,
    pub doctor: String,
    pub schedule: String,
    #[serde(rename = "scheduleSlot")]
    pub schedule_slot: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
}

impl CreateAppointmentDto {
    /// A new pending booking of `slot` in `schedule` with `doctor`.
    pub fn pending(
        doctor: impl Into<String>,
        schedule: impl Into<String>,
        slot: impl Into<String>,
    ) -> Self {
        Self {
            patient: None,
            doctor: doctor.into(),
            schedule: schedule.into(),
            schedule_slot: slot.into(),
            status: Some(AppointmentStatus::Pending),
        }
    }
}

impl Validate for CreateAppointmentDto {
    fn validate(&self) -> Result<()> {
        require("doctor", &self.doctor)?;
        require("schedule", &self.schedule)?;
        require("scheduleSlot", &self.schedule_slot)
    }
}
