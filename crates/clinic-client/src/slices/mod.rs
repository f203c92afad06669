//! Typed operations of each backend resource.
//!
//! Every slice is a thin wrapper over the [`Store`]: queries are described by a
//! [`QueryDef`] and served through the cache, mutations by a [`MutationDef`]
//! that invalidates the tags it affects.

mod appointments;
mod auth;
mod doctors;
mod patients;
mod prescriptions;
mod schedules;
mod slots;

pub use appointments::AppointmentsApi;
pub use auth::AuthApi;
pub use doctors::DoctorsApi;
pub use patients::PatientsApi;
pub use prescriptions::PrescriptionsApi;
pub use schedules::SchedulesApi;
pub use slots::SlotsApi;

use clinic_core::Validate;
use serde::de::DeserializeOwned;

use crate::cache::QueryResult;
use crate::endpoint::{MutationDef, QueryDef};
use crate::error::Result;
use crate::store::Store;

/// Run a query, or report it skipped when its definition could not be built.
pub(crate) async fn run_query<T: DeserializeOwned>(
    store: &Store,
    def: Option<QueryDef>,
) -> Result<QueryResult<T>> {
    let Some(def) = def else {
        return Ok(QueryResult::skipped());
    };
    let entry = store.query(def).await?;
    QueryResult::from_entry(&entry)
}

/// Validate the payload locally, then send the mutation and decode its answer.
pub(crate) async fn run_mutation<T: DeserializeOwned>(
    store: &Store,
    payload: &dyn Validate,
    def: MutationDef,
) -> Result<T> {
    payload.validate()?;
    let value = store.mutate(def).await?;
    Ok(serde_json::from_value(value)?)
}

/// Treat a blank identifier the same as a missing one
pub(crate) fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
