use crate::api::ApiClient;
use crate::errors::ClientError;
use crate::models::{BearerCredential, Identity, LoginRequest, RegisterRequest};
use crate::session::SessionStore;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/",
        }
    }
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Holds the most recent navigation request until a view takes it.
#[derive(Debug, Default)]
pub struct PendingNavigation {
    route: Mutex<Option<Route>>,
}

impl PendingNavigation {
    pub fn take(&self) -> Option<Route> {
        self.route
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl Navigator for PendingNavigation {
    fn navigate(&self, route: Route) {
        *self.route.lock().unwrap_or_else(PoisonError::into_inner) = Some(route);
    }
}

/// Login, registration and logout. Owns the bearer credential's lifecycle.
#[derive(Clone)]
pub struct CredentialGateway {
    api: ApiClient,
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl CredentialGateway {
    pub fn new(session: Arc<SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            api: session.api().clone(),
            session,
            navigator,
        }
    }

    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<Identity, ClientError> {
        require_present(&[("email", email), ("username", username), ("password", password)])?;

        let identity: Identity = self
            .api
            .post(
                "/api/auth/register",
                &RegisterRequest {
                    email: email.trim(),
                    username: username.trim(),
                    password,
                },
            )
            .await?;
        info!(username = %identity.username, "account registered");
        Ok(identity)
    }

    /// Exchanges credentials for a bearer token, stores it and refreshes the session.
    /// A rejected login leaves every piece of state as it was.
    pub async fn login(&self, username: &str, password: &str) -> Result<Option<Identity>, ClientError> {
        require_present(&[("username", username), ("password", password)])?;

        let credential: BearerCredential = self
            .api
            .post(
                "/api/auth/login",
                &LoginRequest {
                    username: username.trim(),
                    password,
                },
            )
            .await?;

        if let Err(err) = self.api.storage().store_credential(&credential).await {
            error!("failed to persist credential, keeping it for this run only: {err}");
        }
        info!(username = username.trim(), "logged in");
        Ok(self.session.refresh_identity().await)
    }

    pub async fn logout(&self) {
        self.session.end_session().await;
        info!("logged out");
        self.navigator.navigate(Route::Login);
    }

    /// True while a credential is stored. The server may still reject it.
    pub async fn is_authenticated(&self) -> bool {
        self.api.storage().has_credential().await
    }

    pub async fn token(&self) -> Option<BearerCredential> {
        self.api.storage().load_credential().await
    }
}

fn require_present(fields: &[(&str, &str)]) -> Result<(), ClientError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ClientError::validation(format!("{} required", missing.join(", "))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presence_check_names_missing_fields() {
        let err = require_present(&[("username", " "), ("password", "")]).unwrap_err();
        assert_eq!(err.user_message(), "username, password required");
        assert!(require_present(&[("username", "alice")]).is_ok());
    }

    #[test]
    fn pending_navigation_is_taken_once() {
        let pending = PendingNavigation::default();
        pending.navigate(Route::Login);
        assert_eq!(pending.take(), Some(Route::Login));
        assert_eq!(pending.take(), None);
        assert_eq!(Route::Login.path(), "/login");
    }
}
