use clinic_core::Tag;
use clinic_core::models::{CreateDoctorDto, Doctor};
use serde_json::Value;

use super::{run_mutation, run_query};
use crate::cache::QueryResult;
use crate::endpoint::{MutationDef, QueryDef};
use crate::error::Result;
use crate::store::Store;

#[derive(Clone)]
pub struct DoctorsApi {
    store: Store,
}

impl DoctorsApi {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Doctor sign-up; no token required. Returned untyped like patient
    /// registration.
    pub async fn register(&self, dto: &CreateDoctorDto) -> Result<Value> {
        let def = MutationDef::post("doctors", "register", "doctors", dto)?
            .invalidates(&[Tag::Doctor]);
        run_mutation(&self.store, dto, def).await
    }

    pub fn list_query() -> QueryDef {
        QueryDef::new("doctors", "list", "doctors")
            .provides(&[Tag::Doctor])
            .authenticated()
    }

    pub async fn list(&self) -> Result<QueryResult<Vec<Doctor>>> {
        run_query(&self.store, Some(Self::list_query())).await
    }
}
