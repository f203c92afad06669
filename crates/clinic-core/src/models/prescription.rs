use serde::{Deserialize, Serialize};

use super::{Validate, require};
use crate::error::Result;
use crate::time::parse_date;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prescription {
    #[serde(rename = "_id")]
    pub id: String,
    pub appointment: String,
    pub patient: String,
    pub doctor: String,
    pub description: String,
    #[serde(rename = "followUpDate", default, skip_serializing_if = "Option::is_none")]
    pub follow_up_date: Option<String>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePrescriptionDto {
    pub appointment: String,
    pub patient: String,
    pub doctor: String,
    pub description: String,
    #[serde(rename = "followUpDate", skip_serializing_if = "Option::is_none")]
    pub follow_up_date: Option<String>,
}

impl Validate for CreatePrescriptionDto {
    fn validate(&self) -> Result<()> {
        require("appointment", &self.appointment)?;
        require("patient", &self.patient)?;
        require("doctor", &self.doctor)?;
        require("description", &self.description)?;
        if let Some(date) = &self.follow_up_date {
            parse_date(date)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prescription_null_follow_up() {
        let p: Prescription = serde_json::from_value(json!({
            "_id": "rx1",
            "appointment": "a1",
            "patient": "p1",
            "doctor": "d1",
            "description": "Rest and fluids",
            "followUpDate": null,
            "createdAt": "2025-06-02T10:00:00.000Z",
            "updatedAt": "2025-06-02T10:00:00.000Z"
        }))
        .unwrap();
        assert!(p.follow_up_date.is_none());
    }

    #[test]
    fn test_create_prescription_requires_description() {
        let mut dto = CreatePrescriptionDto {
            appointment: "a1".into(),
            patient: "p1".into(),
            doctor: "d1".into(),
            description: " ".into(),
            follow_up_date: None,
        };
        assert!(dto.validate().is_err());

        dto.description = "Rest and fluids".into();
        dto.follow_up_date = Some("2025-07-01".into());
        assert!(dto.validate().is_ok());
    }
}
