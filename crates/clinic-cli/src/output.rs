use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::OutputFormat;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print records as JSON or as a rounded table with one row per record
pub fn print_records<T: Serialize>(
    records: &[T],
    format: OutputFormat,
    headers: &[&str],
    row: impl Fn(&T) -> Vec<String>,
) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(records),
        OutputFormat::Table => {
            if records.is_empty() {
                println!("No records found.");
                return Ok(());
            }
            let mut builder = Builder::default();
            builder.push_record(headers.iter().copied());
            for record in records {
                builder.push_record(row(record));
            }
            let table = builder.build().with(Style::rounded()).to_string();
            println!("{table}");
            println!("Total: {}", records.len());
            Ok(())
        }
    }
}

/// Key/value view of a single record
pub fn print_fields<T: Serialize>(
    record: &T,
    format: OutputFormat,
    fields: &[(&str, String)],
) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(record),
        OutputFormat::Table => {
            for (name, value) in fields {
                println!("{}: {}", name.cyan(), value);
            }
            Ok(())
        }
    }
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_notice(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}
