use clinic_core::Tag;
use clinic_core::models::{CreateDoctorScheduleDto, DoctorSchedule};

use super::{run_mutation, run_query};
use crate::cache::QueryResult;
use crate::endpoint::{MutationDef, QueryDef};
use crate::error::Result;
use crate::store::Store;

/// Working days of the logged-in doctor.
#[derive(Clone)]
pub struct SchedulesApi {
    store: Store,
}

impl SchedulesApi {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn my_schedules_query() -> QueryDef {
        QueryDef::new(
            "doctor_schedules",
            "my_schedules",
            "doctor-schedules/my-schedules",
        )
        .provides(&[Tag::DoctorSchedule])
        .authenticated()
    }

    pub async fn my_schedules(&self) -> Result<QueryResult<Vec<DoctorSchedule>>> {
        run_query(&self.store, Some(Self::my_schedules_query())).await
    }

    pub async fn create(&self, dto: &CreateDoctorScheduleDto) -> Result<DoctorSchedule> {
        let def = MutationDef::post("doctor_schedules", "create", "doctor-schedules", dto)?
            .invalidates(&[Tag::DoctorSchedule])
            .authenticated();
        run_mutation(&self.store, dto, def).await
    }
}
