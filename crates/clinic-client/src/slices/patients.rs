use clinic_core::Tag;
use clinic_core::models::{CreatePatientDto, Patient};
use serde_json::Value;

use super::{run_mutation, run_query};
use crate::cache::QueryResult;
use crate::endpoint::{MutationDef, QueryDef};
use crate::error::Result;
use crate::store::Store;

#[derive(Clone)]
pub struct PatientsApi {
    store: Store,
}

impl PatientsApi {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Self-registration; no token required. The backend's answer varies
    /// between deployments, so it is returned untyped.
    pub async fn register(&self, dto: &CreatePatientDto) -> Result<Value> {
        let def = MutationDef::post("patients", "register", "patients", dto)?
            .invalidates(&[Tag::Patient]);
        run_mutation(&self.store, dto, def).await
    }

    pub fn list_query() -> QueryDef {
        QueryDef::new("patients", "list", "patients").provides(&[Tag::Patient])
    }

    pub async fn list(&self) -> Result<QueryResult<Vec<Patient>>> {
        run_query(&self.store, Some(Self::list_query())).await
    }
}
