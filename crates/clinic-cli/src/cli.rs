use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clinic_core::models::Gender;

#[derive(Parser)]
#[command(name = "clinic")]
#[command(about = "Clinic portal CLI: book appointments, manage schedules and prescriptions")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend base URL (overrides config and CLINIC_API_URL env var)
    #[arg(short, long, global = true, env = "CLINIC_API_URL")]
    pub api_url: Option<String>,

    /// Session profile name
    #[arg(short, long, global = true, env = "CLINIC_PROFILE")]
    pub profile: Option<String>,

    /// Config file (default: ~/.clinic/config.toml)
    #[arg(short, long, global = true, env = "CLINIC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Login and store the session
    Login(LoginArgs),
    /// Forget the stored session
    Logout,
    /// Show the logged-in account
    Whoami(WhoamiArgs),
    /// Create a patient or doctor account
    #[command(subcommand)]
    Register(RegisterCommands),
    /// List doctors
    Doctors,
    /// List patients
    Patients,
    /// Manage your schedules (doctors)
    #[command(subcommand)]
    Schedules(ScheduleCommands),
    /// Show a doctor's slots for a day
    Slots(SlotsArgs),
    /// Book a slot
    Book(BookArgs),
    /// List your appointments, or those of one schedule
    Appointments(AppointmentsArgs),
    /// Read or write prescriptions
    #[command(subcommand)]
    Prescriptions(PrescriptionCommands),
    /// Manage CLI configuration
    Config(ConfigArgs),
}

#[derive(clap::Args)]
pub struct LoginArgs {
    #[arg(short, long)]
    pub email: String,
    #[arg(long, env = "CLINIC_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(clap::Args)]
pub struct WhoamiArgs {
    /// Ask the backend instead of trusting the stored session
    #[arg(long)]
    pub verify: bool,
}

#[derive(Subcommand)]
pub enum RegisterCommands {
    /// Register as a patient
    Patient(RegisterPatientArgs),
    /// Register as a doctor
    Doctor(RegisterDoctorArgs),
}

#[derive(clap::Args)]
pub struct RegisterPatientArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long, env = "CLINIC_PASSWORD", hide_env_values = true)]
    pub password: String,
    /// Date of birth (YYYY-MM-DD)
    #[arg(long)]
    pub date_of_birth: String,
    #[arg(long, value_parser = parse_gender)]
    pub gender: Gender,
}

#[derive(clap::Args)]
pub struct RegisterDoctorArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long, env = "CLINIC_PASSWORD", hide_env_values = true)]
    pub password: String,
    #[arg(long)]
    pub specialization: String,
    #[arg(long)]
    pub license_number: String,
    #[arg(long, default_value = "")]
    pub address: String,
}

#[derive(Subcommand)]
pub enum ScheduleCommands {
    /// List your schedules
    List,
    /// Open a day for booking
    Create(CreateScheduleArgs),
}

#[derive(clap::Args)]
pub struct CreateScheduleArgs {
    /// Day (YYYY-MM-DD)
    #[arg(long)]
    pub date: String,
    /// First slot start (HH:MM)
    #[arg(long)]
    pub start_time: String,
    /// Number of slots
    #[arg(long)]
    pub total_slots: u32,
    /// Minutes per slot
    #[arg(long, default_value_t = 30)]
    pub duration: u32,
    /// Create the schedule closed for booking
    #[arg(long)]
    pub inactive: bool,
}

#[derive(clap::Args)]
pub struct SlotsArgs {
    #[arg(long)]
    pub doctor: Option<String>,
    /// Day (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,
    /// Hide booked slots
    #[arg(long)]
    pub available_only: bool,
}

#[derive(clap::Args)]
pub struct BookArgs {
    #[arg(long)]
    pub doctor: String,
    #[arg(long)]
    pub schedule: String,
    #[arg(long)]
    pub slot: String,
}

#[derive(clap::Args)]
pub struct AppointmentsArgs {
    /// Only appointments of this schedule slot
    #[arg(long)]
    pub schedule: Option<String>,
}

#[derive(Subcommand)]
pub enum PrescriptionCommands {
    /// Show the prescription of an appointment
    Get(GetPrescriptionArgs),
    /// Write a prescription (doctors)
    Create(CreatePrescriptionArgs),
}

#[derive(clap::Args)]
pub struct GetPrescriptionArgs {
    #[arg(long)]
    pub appointment: String,
}

#[derive(clap::Args)]
pub struct CreatePrescriptionArgs {
    #[arg(long)]
    pub appointment: String,
    #[arg(long)]
    pub patient: String,
    #[arg(long)]
    pub doctor: String,
    #[arg(long)]
    pub description: String,
    /// Follow-up day (YYYY-MM-DD)
    #[arg(long)]
    pub follow_up: Option<String>,
}

#[derive(clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Set a config value (e.g. api.base_url https://clinic.example.com)
    Set(ConfigSetArgs),
}

#[derive(clap::Args)]
pub struct ConfigSetArgs {
    /// Dotted key: api.base_url, api.timeout_secs, session.profile, session.storage_dir, logging.level
    pub key: String,
    pub value: String,
}

fn parse_gender(value: &str) -> Result<Gender, String> {
    match value.to_ascii_lowercase().as_str() {
        "male" => Ok(Gender::Male),
        "female" => Ok(Gender::Female),
        "other" => Ok(Gender::Other),
        other => Err(format!("unknown gender '{other}' (male, female, other)")),
    }
}
