use crate::api::ApiClient;
use crate::models::Identity;
use crate::signal::{Signal, Subscription};
use tracing::{debug, error, info, warn};

pub const ME_PATH: &str = "/api/auth/me";

pub struct SessionStore {
    api: ApiClient,
    identity: Signal<Option<Identity>>,
}

impl SessionStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            identity: Signal::new(None),
        }
    }

    /// Without a credential this publishes `None` and makes no request. A 401/403
    /// erases the credential; other failures keep the current identity. A response for
    /// a credential that changed while the request was pending is dropped.
    pub async fn refresh_identity(&self) -> Option<Identity> {
        let Some(sent) = self.api.storage().load_credential().await else {
            self.identity.publish(None);
            return None;
        };

        let result = self.api.get::<Identity>(ME_PATH).await;
        if self.api.storage().load_credential().await.as_ref() != Some(&sent) {
            debug!("credential changed during identity lookup, dropping response");
            return self.current_identity();
        }

        match result {
            Ok(identity) => {
                info!(user_id = identity.id, username = %identity.username, "session identity loaded");
                self.identity.publish(Some(identity.clone()));
                Some(identity)
            }
            Err(err) if err.is_auth() => {
                warn!(error = %err, "credential rejected, ending session");
                self.end_session().await;
                None
            }
            Err(err) => {
                error!(error = %err, "failed to load current identity, keeping session");
                self.current_identity()
            }
        }
    }

    pub fn current_identity(&self) -> Option<Identity> {
        self.identity.get()
    }

    pub fn subscribe(&self) -> Subscription<Option<Identity>> {
        self.identity.subscribe()
    }

    /// Erases the credential and publishes `None`. The in-memory credential is dropped
    /// even if the storage file cannot be rewritten.
    pub(crate) async fn end_session(&self) {
        if let Err(err) = self.api.storage().erase_credential().await {
            error!("failed to erase stored credential: {err}");
        }
        self.identity.publish(None);
    }

    pub(crate) fn api(&self) -> &ApiClient {
        &self.api
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("identity", &self.identity)
            .finish()
    }
}

