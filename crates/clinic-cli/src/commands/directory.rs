use anyhow::Result;
use clinic_client::ClinicClient;

use super::{or_dash, settled};
use crate::cli::OutputFormat;
use crate::output::print_records;

pub async fn doctors(client: &ClinicClient, format: OutputFormat) -> Result<()> {
    let doctors = settled(client.doctors().list().await?, "doctors")?.unwrap_or_default();
    print_records(
        &doctors,
        format,
        &["ID", "Name", "Specialization", "Email", "Phone"],
        |d| {
            vec![
                d.id.clone(),
                d.user.name.clone(),
                d.specialization.clone(),
                d.user.email.clone(),
                or_dash(Some(d.user.phone.as_str())),
            ]
        },
    )
}

pub async fn patients(client: &ClinicClient, format: OutputFormat) -> Result<()> {
    let patients = settled(client.patients().list().await?, "patients")?.unwrap_or_default();
    print_records(
        &patients,
        format,
        &["ID", "Name", "Email", "Born", "Gender"],
        |p| {
            vec![
                or_dash(p.id.as_deref()),
                p.user.name.clone(),
                p.user.email.clone(),
                p.date_of_birth.clone(),
                p.gender.to_string(),
            ]
        },
    )
}
