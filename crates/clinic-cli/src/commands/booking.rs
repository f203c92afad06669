use anyhow::Result;
use clinic_client::ClinicClient;
use clinic_core::models::{Appointment, CreateAppointmentDto};
use colored::Colorize;

use super::{or_dash, settled};
use crate::cli::{AppointmentsArgs, BookArgs, OutputFormat, SlotsArgs};
use crate::output::{print_json, print_notice, print_records, print_success};

pub async fn slots(client: &ClinicClient, args: &SlotsArgs, format: OutputFormat) -> Result<()> {
    let result = client
        .slots()
        .available(args.doctor.as_deref(), args.date.as_deref())
        .await?;
    if result.is_uninitialized() {
        print_notice("Both --doctor and --date are needed to look up slots");
        return Ok(());
    }

    let mut slots = settled(result, "slots")?.unwrap_or_default();
    if args.available_only {
        slots.retain(|s| s.is_available());
    }
    print_records(
        &slots,
        format,
        &["ID", "Start", "End", "Minutes", "Status"],
        |s| {
            let status = if s.is_available() {
                "available".green().to_string()
            } else {
                "booked".red().to_string()
            };
            vec![
                s.id.clone(),
                s.start_time.clone(),
                s.end_time.clone(),
                s.duration_minutes.to_string(),
                status,
            ]
        },
    )
}

pub async fn book(client: &ClinicClient, args: &BookArgs, format: OutputFormat) -> Result<()> {
    let dto = CreateAppointmentDto::pending(&args.doctor, &args.schedule, &args.slot);
    let created = client.appointments().create(&dto).await?;
    match format {
        OutputFormat::Json => print_json(&created)?,
        OutputFormat::Table => {
            let id = created.get("_id").and_then(|v| v.as_str());
            print_success(&format!(
                "Booked slot {} (appointment {})",
                args.slot.cyan(),
                or_dash(id)
            ));
        }
    }
    Ok(())
}

pub async fn appointments(
    client: &ClinicClient,
    args: &AppointmentsArgs,
    format: OutputFormat,
) -> Result<()> {
    let result = match &args.schedule {
        Some(schedule) => {
            client
                .appointments()
                .by_schedule(Some(schedule.as_str()))
                .await?
        }
        None => client.appointments().mine().await?,
    };
    let appointments = settled(result, "appointments")?.unwrap_or_default();
    print_records(
        &appointments,
        format,
        &["ID", "Doctor", "Date", "Time", "Slot", "Status"],
        row,
    )
}

fn row(a: &Appointment) -> Vec<String> {
    let (date, time) = match &a.schedule {
        Some(slot) => (
            slot.schedule.date.clone(),
            format!("{}-{}", slot.start_time, slot.end_time),
        ),
        None => ("-".to_string(), "-".to_string()),
    };
    vec![
        a.id.clone(),
        a.doctor.user.name.clone(),
        date,
        time,
        or_dash(a.slot_id()),
        a.status.to_string(),
    ]
}
