use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::ApiClient;
use crate::session::{Session, SessionStore};
use crate::slices::{
    AppointmentsApi, AuthApi, DoctorsApi, PatientsApi, PrescriptionsApi, SchedulesApi, SlotsApi,
};
use crate::storage::{FileStorage, KeyValueStorage};
use crate::store::Store;

/// Entry point bundling the store with one handle per resource slice.
#[derive(Clone)]
pub struct ClinicClient {
    store: Store,
}

impl ClinicClient {
    /// Restore the persisted session from `storage` and start the store.
    pub fn new(api: ApiClient, storage: Arc<dyn KeyValueStorage>) -> Self {
        let session = SessionStore::restore(storage);
        Self {
            store: Store::spawn(api, session),
        }
    }

    /// Client for the configured backend with a file-backed session per profile
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let api = ApiClient::new(&config.api.base_url, config.timeout())?;
        let storage = FileStorage::for_profile(&config.storage_dir()?, &config.session.profile);
        tracing::debug!(
            base_url = api.base_url(),
            session_file = %storage.path().display(),
            "Creating clinic client"
        );
        Ok(Self::new(api, Arc::new(storage)))
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub async fn session(&self) -> Result<Session> {
        self.store.session().await
    }

    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.store.clone())
    }

    pub fn patients(&self) -> PatientsApi {
        PatientsApi::new(self.store.clone())
    }

    pub fn doctors(&self) -> DoctorsApi {
        DoctorsApi::new(self.store.clone())
    }

    pub fn schedules(&self) -> SchedulesApi {
        SchedulesApi::new(self.store.clone())
    }

    pub fn slots(&self) -> SlotsApi {
        SlotsApi::new(self.store.clone())
    }

    pub fn appointments(&self) -> AppointmentsApi {
        AppointmentsApi::new(self.store.clone())
    }

    pub fn prescriptions(&self) -> PrescriptionsApi {
        PrescriptionsApi::new(self.store.clone())
    }
}
