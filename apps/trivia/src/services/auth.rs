//! Email/password identity.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;
use regex::Regex;
use tracing::{debug, info, warn};
use unicode_normalization::UnicodeNormalization;

use crate::docstore::DocumentStore;
use crate::domain::{UserId, UserProfile};
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};
use crate::logging::pii::Redacted;
use crate::repos::profiles;

const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap()
});

/// Session-scoped identity for one client.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Signed-in user, if any.
    fn current_user(&self) -> Option<UserId>;

    /// Register a new account, create its profile, and sign it in.
    async fn sign_up(&self, email: &str, password: &str) -> Result<UserId, DomainError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<UserId, DomainError>;

    fn sign_out(&self);
}

struct Credential {
    user_id: UserId,
    salt: [u8; 32],
    hash: blake3::Hash,
}

impl Credential {
    fn new(user_id: UserId, password: &str) -> Self {
        let salt: [u8; 32] = rand::random();
        Self {
            user_id,
            salt,
            hash: blake3::keyed_hash(&salt, password.as_bytes()),
        }
    }

    fn verify(&self, password: &str) -> bool {
        // `blake3::Hash` equality is constant-time.
        blake3::keyed_hash(&self.salt, password.as_bytes()) == self.hash
    }
}

/// Case- and width-insensitive key for an email address.
fn normalize_email(email: &str) -> String {
    email.trim().nfkc().collect::<String>().to_lowercase()
}

/// Display name derived from the email local part.
fn display_name_for(email: &str) -> Option<String> {
    email
        .split_once('@')
        .map(|(local, _)| local.to_string())
        .filter(|local| !local.is_empty())
}

/// Process-local accounts. Profiles go to the shared document store.
pub struct InMemoryAuth {
    store: Arc<dyn DocumentStore>,
    credentials: DashMap<String, Credential>,
    current: RwLock<Option<UserId>>,
}

impl InMemoryAuth {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            credentials: DashMap::new(),
            current: RwLock::new(None),
        }
    }
}

#[async_trait]
impl AuthProvider for InMemoryAuth {
    fn current_user(&self) -> Option<UserId> {
        self.current.read().clone()
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<UserId, DomainError> {
        let email = normalize_email(email);
        if !EMAIL_SHAPE.is_match(&email) {
            return Err(DomainError::validation(
                ValidationKind::InvalidEmail,
                format!("'{}' is not an email address", Redacted(&email)),
            ));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::validation(
                ValidationKind::WeakPassword,
                format!("password must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }

        let user_id = uuid::Uuid::new_v4().to_string();
        match self.credentials.entry(email.clone()) {
            Entry::Occupied(_) => {
                debug!(email = %Redacted(&email), "Sign-up for registered email");
                return Err(DomainError::conflict(
                    ConflictKind::EmailTaken,
                    "an account with this email already exists",
                ));
            }
            Entry::Vacant(slot) => {
                slot.insert(Credential::new(user_id.clone(), password));
            }
        }

        let profile = UserProfile {
            display_name: display_name_for(&email),
            ..UserProfile::new(user_id.clone())
        };
        if let Err(e) = profiles::create_profile(self.store.as_ref(), &profile).await {
            // Without a profile the account is unusable; let the email be reused.
            self.credentials.remove(&email);
            warn!(email = %Redacted(&email), error = %e, "Profile creation failed during sign-up");
            return Err(e);
        }

        *self.current.write() = Some(user_id.clone());
        info!(user_id = %user_id, email = %Redacted(&email), "User signed up");
        Ok(user_id)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<UserId, DomainError> {
        let email = normalize_email(email);
        let user_id = self
            .credentials
            .get(&email)
            .filter(|credential| credential.verify(password))
            .map(|credential| credential.user_id.clone());

        let Some(user_id) = user_id else {
            warn!(email = %Redacted(&email), "Sign-in rejected");
            return Err(DomainError::validation(
                ValidationKind::InvalidCredentials,
                "email or password is incorrect",
            ));
        };

        *self.current.write() = Some(user_id.clone());
        info!(user_id = %user_id, email = %Redacted(&email), "User signed in");
        Ok(user_id)
    }

    fn sign_out(&self) {
        if let Some(user_id) = self.current.write().take() {
            info!(user_id = %user_id, "User signed out");
        }
    }
}
