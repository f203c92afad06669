use clinic_core::Tag;
use clinic_core::models::{AuthResponse, LoginRequest, MeResponse, User};

use super::{run_mutation, run_query};
use crate::cache::QueryResult;
use crate::endpoint::{MutationDef, QueryDef};
use crate::error::Result;
use crate::store::{Action, AppState, Store};

#[derive(Clone)]
pub struct AuthApi {
    store: Store,
}

impl AuthApi {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Exchange credentials for a token and adopt the new session. A failed
    /// login leaves the current session untouched.
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        let def = MutationDef::post("auth", "login", "auth/login", request)?;
        let response: AuthResponse = run_mutation(&self.store, request, def).await?;

        self.store
            .dispatch(Action::SetCredentials {
                user: response.user.clone(),
                token: response.access_token.clone(),
            })
            .await?;
        tracing::info!(email = %response.user.email, "Logged in");
        Ok(response)
    }

    pub fn current_user_query() -> QueryDef {
        QueryDef::new("auth", "me", "auth/me")
            .provides(&[Tag::Auth])
            .authenticated()
    }

    pub async fn current_user(&self) -> Result<QueryResult<User>> {
        let result: QueryResult<MeResponse> =
            run_query(&self.store, Some(Self::current_user_query())).await?;
        Ok(result.map(MeResponse::into_user))
    }

    /// Local only: the session is forgotten and the cache purged.
    pub async fn logout(&self) -> Result<AppState> {
        self.store.dispatch(Action::Logout).await
    }
}
