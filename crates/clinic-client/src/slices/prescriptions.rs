use clinic_core::Tag;
use clinic_core::models::{CreatePrescriptionDto, Prescription};

use super::{present, run_mutation, run_query};
use crate::cache::QueryResult;
use crate::endpoint::{MutationDef, QueryDef, resource_path};
use crate::error::Result;
use crate::store::Store;

#[derive(Clone)]
pub struct PrescriptionsApi {
    store: Store,
}

impl PrescriptionsApi {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn create(&self, dto: &CreatePrescriptionDto) -> Result<Prescription> {
        let def = MutationDef::post("prescriptions", "create", "prescriptions", dto)?
            .invalidates(&[Tag::Prescription, Tag::Appointment])
            .authenticated();
        run_mutation(&self.store, dto, def).await
    }

    pub fn by_appointment_query(appointment_id: Option<&str>) -> Option<QueryDef> {
        let appointment_id = present(appointment_id)?;
        Some(
            QueryDef::new(
                "prescriptions",
                "by_appointment",
                resource_path("prescriptions", appointment_id)?,
            )
            .path_arg("appointmentId", appointment_id)
            .provides(&[Tag::Prescription])
            .authenticated(),
        )
    }

    /// An appointment without a prescription settles with no data.
    pub async fn by_appointment(
        &self,
        appointment_id: Option<&str>,
    ) -> Result<QueryResult<Prescription>> {
        run_query(&self.store, Self::by_appointment_query(appointment_id)).await
    }
}
