use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Cache tags. Queries provide them, mutations invalidate them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tag {
    Auth,
    Doctor,
    Patient,
    DoctorSchedule,
    /// Bookable time slots of a doctor's schedules
    Schedule,
    Appointment,
    Prescription,
}

impl Tag {
    pub const ALL: [Tag; 7] = [
        Tag::Auth,
        Tag::Doctor,
        Tag::Patient,
        Tag::DoctorSchedule,
        Tag::Schedule,
        Tag::Appointment,
        Tag::Prescription,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Auth => "Auth",
            Tag::Doctor => "Doctor",
            Tag::Patient => "Patient",
            Tag::DoctorSchedule => "DoctorSchedule",
            Tag::Schedule => "Schedule",
            Tag::Appointment => "Appointment",
            Tag::Prescription => "Prescription",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tag {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::UnknownTag(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_display_round_trips_through_from_str() {
        for tag in Tag::ALL {
            assert_eq!(tag.to_string().parse::<Tag>().unwrap(), tag);
        }
    }

    #[test]
    fn test_tag_parse_is_case_insensitive() {
        assert_eq!("appointment".parse::<Tag>().unwrap(), Tag::Appointment);
        assert_eq!("DOCTORSCHEDULE".parse::<Tag>().unwrap(), Tag::DoctorSchedule);
    }

    #[test]
    fn test_unknown_tag() {
        let err = "Invoice".parse::<Tag>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownTag(ref t) if t == "Invoice"));
    }
}
