use crate::domain::models::*;
use crate::domain::traits::{DocumentStore, IdentityProvider};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Register, sign-in and sign-out against the identity provider, plus the
/// profile write that follows a successful registration.
pub struct AuthGateway {
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn DocumentStore>,
    session: Mutex<Option<AuthSession>>,
}

impl AuthGateway {
    pub fn new(identity: Arc<dyn IdentityProvider>, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            identity,
            store,
            session: Mutex::new(None),
        }
    }

    /// Creates the account, then writes exactly one profile document keyed by
    /// the new uid. A failed profile write is reported as
    /// [`AppError::ProfileWrite`]; the account and its session are kept.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> AppResult<UserProfile> {
        let session = self.identity.register(email, password).await.map_err(|e| {
            log::warn!("Sign-up failed: {}", e);
            e
        })?;

        let profile = UserProfile::local(session.uid.clone(), name.to_string(), email.to_string());
        let id_token = session.id_token.clone();
        *self.session.lock().await = Some(session);

        match self
            .store
            .insert_document(USERS_COLLECTION, &profile.to_fields(), &id_token)
            .await
        {
            Ok(doc) => {
                log::info!("Created profile document {} for {}", doc.id, profile.uid);
                Ok(profile)
            }
            Err(e) => {
                log::error!("Account {} created but profile write failed: {}", profile.uid, e);
                Err(AppError::ProfileWrite {
                    uid: profile.uid,
                    reason: e.to_string(),
                })
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let session = self.identity.sign_in(email, password).await.map_err(|e| {
            log::warn!("Sign-in failed: {}", e);
            e
        })?;
        *self.session.lock().await = Some(session.clone());
        log::info!("Signed in as {}", session.uid);
        Ok(session)
    }

    /// Sign-out is local to the client; it cannot fail.
    pub async fn logout(&self) {
        if let Some(previous) = self.session.lock().await.take() {
            log::info!("Signed out {}", previous.uid);
        }
    }

    pub async fn restore_session(&self, session: AuthSession) {
        *self.session.lock().await = Some(session);
    }

    pub async fn current_session(&self) -> Option<AuthSession> {
        self.session.lock().await.clone()
    }

    pub async fn is_signed_in(&self) -> bool {
        self.session.lock().await.is_some()
    }
}
