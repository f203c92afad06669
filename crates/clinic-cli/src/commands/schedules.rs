use anyhow::Result;
use clinic_client::ClinicClient;
use clinic_core::models::{CreateDoctorScheduleDto, DoctorSchedule};

use super::settled;
use crate::cli::{CreateScheduleArgs, OutputFormat};
use crate::output::{print_json, print_records, print_success};

const HEADERS: [&str; 6] = ["ID", "Date", "Start", "Slots", "Minutes", "Active"];

fn row(s: &DoctorSchedule) -> Vec<String> {
    vec![
        s.id.clone(),
        s.date.clone(),
        s.start_time.clone(),
        s.total_slot.to_string(),
        s.slot_duration_minutes.to_string(),
        if s.is_active { "yes" } else { "no" }.to_string(),
    ]
}

pub async fn list(client: &ClinicClient, format: OutputFormat) -> Result<()> {
    let schedules =
        settled(client.schedules().my_schedules().await?, "schedules")?.unwrap_or_default();
    print_records(&schedules, format, &HEADERS, row)
}

pub async fn create(
    client: &ClinicClient,
    args: &CreateScheduleArgs,
    format: OutputFormat,
) -> Result<()> {
    let dto = CreateDoctorScheduleDto {
        doctor: None,
        start_time: args.start_time.clone(),
        total_slot: args.total_slots,
        slot_duration_minutes: args.duration,
        is_active: Some(!args.inactive),
        date: args.date.clone(),
    };
    let created = client.schedules().create(&dto).await?;
    match format {
        OutputFormat::Json => print_json(&created),
        OutputFormat::Table => {
            print_success(&format!(
                "Created schedule {} on {}",
                created.id, created.date
            ));
            print_records(std::slice::from_ref(&created), format, &HEADERS, row)
        }
    }
}
