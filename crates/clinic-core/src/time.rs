//! Calendar helpers for the date and time strings the backend exchanges.

use time::macros::format_description;
use time::{Date, Time};

use crate::error::{CoreError, Result};

/// Parse a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(value: &str) -> Result<Date> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|e| CoreError::invalid_date(format!("'{value}' is not YYYY-MM-DD: {e}")))
}

/// Parse a time of day in `HH:MM` form.
pub fn parse_time_of_day(value: &str) -> Result<Time> {
    Time::parse(value.trim(), format_description!("[hour]:[minute]"))
        .map_err(|e| CoreError::invalid_time(format!("'{value}' is not HH:MM: {e}")))
}
