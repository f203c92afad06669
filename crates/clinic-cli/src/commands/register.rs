use anyhow::Result;
use clinic_client::ClinicClient;
use clinic_core::models::{CreateDoctorDto, CreatePatientDto};
use colored::Colorize;

use crate::cli::{OutputFormat, RegisterDoctorArgs, RegisterPatientArgs};
use crate::output::{print_json, print_success};

pub async fn patient(
    client: &ClinicClient,
    args: &RegisterPatientArgs,
    format: OutputFormat,
) -> Result<()> {
    let dto = CreatePatientDto {
        name: args.name.clone(),
        date_of_birth: args.date_of_birth.clone(),
        gender: args.gender,
        email: args.email.clone(),
        phone: args.phone.clone(),
        password: args.password.clone(),
    };
    let created = client.patients().register(&dto).await?;
    match format {
        OutputFormat::Json => print_json(&created)?,
        OutputFormat::Table => print_success(&format!(
            "Registered patient {}. Log in with: clinic login --email {}",
            args.name.cyan(),
            args.email
        )),
    }
    Ok(())
}

pub async fn doctor(
    client: &ClinicClient,
    args: &RegisterDoctorArgs,
    format: OutputFormat,
) -> Result<()> {
    let dto = CreateDoctorDto {
        name: args.name.clone(),
        email: args.email.clone(),
        phone: args.phone.clone(),
        password: args.password.clone(),
        specialization: args.specialization.clone(),
        license_number: args.license_number.clone(),
        address: args.address.clone(),
    };
    let created = client.doctors().register(&dto).await?;
    match format {
        OutputFormat::Json => print_json(&created)?,
        OutputFormat::Table => print_success(&format!(
            "Registered doctor {} ({})",
            args.name.cyan(),
            args.specialization
        )),
    }
    Ok(())
}
