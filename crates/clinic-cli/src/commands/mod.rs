pub mod auth;
pub mod booking;
pub mod directory;
pub mod prescriptions;
pub mod register;
pub mod schedules;

use anyhow::{Result, bail};
use clinic_client::QueryResult;

/// Data of a settled query; an error entry becomes a command failure.
fn settled<T>(result: QueryResult<T>, what: &str) -> Result<Option<T>> {
    match result.into_data() {
        Ok(data) => Ok(data),
        Err(message) => bail!("Failed to load {what}: {message}"),
    }
}

fn or_dash(value: Option<&str>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or("-").to_string()
}
