//! Records mirroring the backend's JSON shapes.
//!
//! Field names follow the wire format (`_id`, `startTime`, `slot_duration_minutes`),
//! which mixes camelCase and snake_case, so renames are spelled out per field.

pub mod appointment;
pub mod auth;
pub mod doctor;
pub mod patient;
pub mod prescription;
pub mod schedule;

pub use appointment::{
    Appointment, AppointmentPatient, AppointmentStatus, BookedSlot, CreateAppointmentDto,
    ScheduleSummary,
};
pub use auth::{AuthResponse, LoginRequest, MeResponse, Role, User};
pub use doctor::{CreateDoctorDto, Doctor, UserSummary};
pub use patient::{CreatePatientDto, Gender, Patient, PatientUser};
pub use prescription::{CreatePrescriptionDto, Prescription};
pub use schedule::{CreateDoctorScheduleDto, DoctorSchedule, SlotStatus, TimeSlot};

use crate::error::{CoreError, Result};

/// Client-side checks run before a payload is sent to the backend.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub(crate) fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CoreError::missing_field(field));
    }
    Ok(())
}
