use anyhow::Result;
use clinic_client::ClinicClient;
use clinic_core::models::{CreatePrescriptionDto, Prescription};

use super::{or_dash, settled};
use crate::cli::{CreatePrescriptionArgs, GetPrescriptionArgs, OutputFormat};
use crate::output::{print_fields, print_notice, print_success};

fn fields(p: &Prescription) -> Vec<(&'static str, String)> {
    vec![
        ("Id", p.id.clone()),
        ("Appointment", p.appointment.clone()),
        ("Patient", p.patient.clone()),
        ("Doctor", p.doctor.clone()),
        ("Description", p.description.clone()),
        ("Follow-up", or_dash(p.follow_up_date.as_deref())),
    ]
}

pub async fn get(
    client: &ClinicClient,
    args: &GetPrescriptionArgs,
    format: OutputFormat,
) -> Result<()> {
    let result = client
        .prescriptions()
        .by_appointment(Some(args.appointment.as_str()))
        .await?;
    match settled(result, "prescription")? {
        Some(prescription) => print_fields(&prescription, format, &fields(&prescription)),
        None => {
            print_notice(&format!(
                "No prescription for appointment {}",
                args.appointment
            ));
            Ok(())
        }
    }
}

pub async fn create(
    client: &ClinicClient,
    args: &CreatePrescriptionArgs,
    format: OutputFormat,
) -> Result<()> {
    let dto = CreatePrescriptionDto {
        appointment: args.appointment.clone(),
        patient: args.patient.clone(),
        doctor: args.doctor.clone(),
        description: args.description.clone(),
        follow_up_date: args.follow_up.clone(),
    };
    let created = client.prescriptions().create(&dto).await?;
    if matches!(format, OutputFormat::Table) {
        print_success(&format!("Prescription {} saved", created.id));
    }
    print_fields(&created, format, &fields(&created))
}
