use serde::{Deserialize, Serialize};

use super::{Validate, require};
use crate::error::{CoreError, Result};
use crate::time::{parse_date, parse_time_of_day};

/// A working day a doctor opened for booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorSchedule {
    #[serde(rename = "_id")]
    pub id: String,
    pub doctor: String,
    #[serde(rename = "startTime")]
    pub start_time: String,
    #[serde(rename = "totalSlot")]
    pub total_slot: u32,
    pub slot_duration_minutes: u32,
    #[serde(rename = "isActive")]
    pub is_active: bool,
    pub date: String,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Payload for `POST /doctor-schedules`. The backend fills `doctor` from the
/// bearer token when it is omitted.
#[derive(Debug, Clone, Serialize)]
pub struct CreateDoctorScheduleDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor: Option<String>,
    #[serde(rename = "startTime")]
    pub start_time: String,
    #[serde(rename = "totalSlot")]
    pub total_slot: u32,
    pub slot_duration_minutes: u32,
    #[serde(rename = "isActive", skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    pub date: String,
}

impl Validate for CreateDoctorScheduleDto {
    fn validate(&self) -> Result<()> {
        if self.total_slot == 0 {
            return Err(CoreError::invalid_field(
                "totalSlot",
                "must be greater than zero",
            ));
        }
        if self.slot_duration_minutes == 0 {
            return Err(CoreError::invalid_field(
                "slot_duration_minutes",
                "must be greater than zero",
            ));
        }
        if let Some(doctor) = &self.doctor {
            require("doctor", doctor)?;
        }
        parse_date(&self.date)?;
        parse_time_of_day(&self.start_time)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Available,
    Booked,
}

/// One bookable interval inside a schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    #[serde(rename = "_id")]
    pub id: String,
    pub schedule: String,
    #[serde(rename = "startTime")]
    pub start_time: String,
    #[serde(rename = "endTime")]
    pub end_time: String,
    pub duration_minutes: u32,
    pub status: SlotStatus,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(rename = "__v", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
}

impl TimeSlot {
    pub fn is_available(&self) -> bool {
        self.status == SlotStatus::Available
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dto() -> CreateDoctorScheduleDto {
        CreateDoctorScheduleDto {
            doctor: None,
            start_time: "09:00".into(),
            total_slot: 5,
            slot_duration_minutes: 30,
            is_active: Some(true),
            date: "2025-06-02".into(),
        }
    }

    #[test]
    fn test_create_schedule_wire_format() {
        let value = serde_json::to_value(dto()).unwrap();
        assert_eq!(
            value,
            json!({
                "startTime": "09:00",
                "totalSlot": 5,
                "slot_duration_minutes": 30,
                "isActive": true,
                "date": "2025-06-02"
            })
        );
    }

    #[test]
    fn test_create_schedule_validation() {
        assert!(dto().validate().is_ok());

        let mut zero_slots = dto();
        zero_slots.total_slot = 0;
        assert!(matches!(
            zero_slots.validate(),
            Err(CoreError::InvalidField { ref field, .. }) if field == "totalSlot"
        ));

        let mut bad_time = dto();
        bad_time.start_time = "9am".into();
        assert!(matches!(bad_time.validate(), Err(CoreError::InvalidTime(_))));

        let mut bad_date = dto();
        bad_date.date = "tomorrow".into();
        assert!(matches!(bad_date.validate(), Err(CoreError::InvalidDate(_))));
    }

    #[test]
    fn test_time_slot_status() {
        let slot: TimeSlot = serde_json::from_value(json!({
            "_id": "s1",
            "schedule": "sch1",
            "startTime": "09:00",
            "endTime": "09:30",
            "duration_minutes": 30,
            "status": "booked",
            "__v": 0
        }))
        .unwrap();
        assert!(!slot.is_available());
        assert_eq!(slot.version, Some(0));
    }
}
