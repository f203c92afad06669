use clinic_core::Tag;
use clinic_core::models::{Appointment, CreateAppointmentDto};
use clinic_core::models::appointment::normalize_appointment_list;
use serde_json::Value;

use super::{present, run_mutation, run_query};
use crate::cache::QueryResult;
use crate::endpoint::{MutationDef, QueryDef, resource_path};
use crate::error::Result;
use crate::store::Store;

#[derive(Clone)]
pub struct AppointmentsApi {
    store: Store,
}

impl AppointmentsApi {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Book a slot. Invalidates appointments and slot availability. The
    /// created record comes back unpopulated, hence untyped.
    pub async fn create(&self, dto: &CreateAppointmentDto) -> Result<Value> {
        let def = MutationDef::post("appointments", "create", "appointments", dto)?
            .invalidates(&[Tag::Appointment, Tag::Schedule])
            .authenticated();
        run_mutation(&self.store, dto, def).await
    }

    pub fn mine_query() -> QueryDef {
        QueryDef::new("appointments", "mine", "appointments/user")
            .provides(&[Tag::Appointment])
            .authenticated()
    }

    pub async fn mine(&self) -> Result<QueryResult<Vec<Appointment>>> {
        run_query(&self.store, Some(Self::mine_query())).await
    }

    pub fn by_schedule_query(schedule_id: Option<&str>) -> Option<QueryDef> {
        let schedule_id = present(schedule_id)?;
        Some(
            QueryDef::new(
                "appointments",
                "by_schedule",
                resource_path("appointments", schedule_id)?,
            )
            .path_arg("scheduleId", schedule_id)
            .provides(&[Tag::Appointment])
            .authenticated()
            .transform(normalize_appointment_list),
        )
    }

    /// Always a list, whatever cardinality the backend answers with
    pub async fn by_schedule(
        &self,
        schedule_id: Option<&str>,
    ) -> Result<QueryResult<Vec<Appointment>>> {
        run_query(&self.store, Self::by_schedule_query(schedule_id)).await
    }
}
