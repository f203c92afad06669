mod cli;
mod commands;
mod config;
mod observability;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use clinic_client::ClinicClient;
use colored::Colorize;

use cli::{Cli, Commands, ConfigCommands, PrescriptionCommands, RegisterCommands, ScheduleCommands};
use output::print_error;

#[tokio::main]
async fn main() {
    if let Err(e) = dotenvy::dotenv() {
        // A missing .env is fine
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }

    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Commands::Config(args) => config_command(&cli, &args.command),
        command => client_command(&cli, command).await,
    }
}

fn config_command(cli: &Cli, command: &ConfigCommands) -> Result<()> {
    let path = config::config_path(cli.config.as_deref())?;
    match command {
        ConfigCommands::Show => {
            let cfg = config::resolve(cli)?;
            println!("{}: {}", "File".cyan(), path.display());
            println!("{}", toml::to_string_pretty(&cfg)?);
        }
        ConfigCommands::Set(set_args) => {
            let mut file_cfg = config::load_file(&path)?;
            config::set_value(&mut file_cfg, &set_args.key, &set_args.value)?;
            config::save_file(&path, &file_cfg)?;
            output::print_success(&format!("Set {} = {}", set_args.key, set_args.value));
        }
    }
    Ok(())
}

async fn client_command(cli: &Cli, command: &Commands) -> Result<()> {
    let cfg = config::resolve(cli).context("loading configuration")?;
    observability::init_tracing_with_level(&cfg.logging.level);

    let format = cli.format.unwrap_or_default();
    let profile = cfg.session.profile.clone();
    let client = ClinicClient::from_config(&cfg)?;
    tracing::debug!(base_url = %cfg.api.base_url, profile = %profile, "Client ready");

    match command {
        Commands::Login(args) => commands::auth::login(&client, args, &profile).await?,
        Commands::Logout => commands::auth::logout(&client).await?,
        Commands::Whoami(args) => commands::auth::whoami(&client, args, &profile, format).await?,
        Commands::Register(RegisterCommands::Patient(args)) => {
            commands::register::patient(&client, args, format).await?
        }
        Commands::Register(RegisterCommands::Doctor(args)) => {
            commands::register::doctor(&client, args, format).await?
        }
        Commands::Doctors => commands::directory::doctors(&client, format).await?,
        Commands::Patients => commands::directory::patients(&client, format).await?,
        Commands::Schedules(ScheduleCommands::List) => {
            commands::schedules::list(&client, format).await?
        }
        Commands::Schedules(ScheduleCommands::Create(args)) => {
            commands::schedules::create(&client, args, format).await?
        }
        Commands::Slots(args) => commands::booking::slots(&client, args, format).await?,
        Commands::Book(args) => commands::booking::book(&client, args, format).await?,
        Commands::Appointments(args) => {
            commands::booking::appointments(&client, args, format).await?
        }
        Commands::Prescriptions(PrescriptionCommands::Get(args)) => {
            commands::prescriptions::get(&client, args, format).await?
        }
        Commands::Prescriptions(PrescriptionCommands::Create(args)) => {
            commands::prescriptions::create(&client, args, format).await?
        }
        Commands::Config(args) => config_command(cli, &args.command)?,
    }

    Ok(())
}
