use clinic_core::Tag;
use clinic_core::models::TimeSlot;

use super::{present, run_query};
use crate::cache::QueryResult;
use crate::endpoint::{QueryDef, resource_path};
use crate::error::Result;
use crate::store::Store;

#[derive(Clone)]
pub struct SlotsApi {
    store: Store,
}

impl SlotsApi {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// `None` when either the doctor or the date is missing
    pub fn available_query(doctor_id: Option<&str>, date: Option<&str>) -> Option<QueryDef> {
        let doctor_id = present(doctor_id)?;
        let date = present(date)?;
        Some(
            QueryDef::new(
                "slots",
                "available",
                resource_path("doctor-schedules/available-slots", doctor_id)?,
            )
            .path_arg("doctorId", doctor_id)
            .query_arg("date", date)
            .provides(&[Tag::Schedule])
            .authenticated(),
        )
    }

    pub async fn available(
        &self,
        doctor_id: Option<&str>,
        date: Option<&str>,
    ) -> Result<QueryResult<Vec<TimeSlot>>> {
        run_query(&self.store, Self::available_query(doctor_id, date)).await
    }
}
