use serde::{Deserialize, Serialize};

use super::{Validate, require};
use crate::error::Result;

/// Account fields embedded in doctor records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: UserSummary,
    pub specialization: String,
    pub license_number: String,
    #[serde(default)]
    pub address: String,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Registration payload for `POST /doctors`
#[derive(Debug, Clone, Serialize)]
pub struct CreateDoctorDto {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub specialization: String,
    pub license_number: String,
    pub address: String,
}

impl Validate for CreateDoctorDto {
    fn validate(&self) -> Result<()> {
        require("name", &self.name)?;
        require("email", &self.email)?;
        require("password", &self.password)?;
        require("specialization", &self.specialization)?;
        require("license_number", &self.license_number)
    }
}
