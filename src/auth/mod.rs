//! Password sign-in and bearer-token sessions.
//!
//! Resolution happens once per request at the API boundary and yields an
//! explicit [`Identity`] capability that the workflow layer receives; no
//! operation inspects ambient auth state. Tokens live in an in-process map
//! for the life of the server and carry no expiry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use leadline_core::Database;
use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::workflow::Identity;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid login credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// An issued session: the bearer token plus the identity it resolves to.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub token: String,
    pub user: Identity,
}

#[derive(Clone)]
pub struct SessionManager {
    db: Database,
    tokens: Arc<Mutex<HashMap<String, Identity>>>,
}

impl SessionManager {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            tokens: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Verify credentials and issue a bearer token.
    pub fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let user = self
            .db
            .get_user_by_email(email)?
            .ok_or(AuthError::InvalidCredentials)?;
        if !verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        let identity = Identity {
            user_id: user.id,
            email: user.email,
        };
        let token = Uuid::new_v4().to_string();
        self.lock().insert(token.clone(), identity.clone());
        tracing::info!(email = %identity.email, "consultant signed in");
        Ok(Session {
            token,
            user: identity,
        })
    }

    /// The session guard: resolve a bearer token to an identity, or None
    /// when the token is absent from the map.
    pub fn resolve(&self, token: &str) -> Option<Identity> {
        self.lock().get(token).cloned()
    }

    /// Revoke a token. Idempotent; unknown tokens are ignored.
    pub fn sign_out(&self, token: &str) {
        self.lock().remove(token);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Identity>> {
        self.tokens.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Salted SHA-256, stored as `salt$hex`.
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!("{salt}${}", digest(&salt, password))
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, hash)) => digest(salt, password) == hash,
        None => false,
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager_with_user(email: &str, password: &str) -> SessionManager {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();
        db.create_user(email, &hash_password(password)).unwrap();
        SessionManager::new(db)
    }

    #[test]
    fn password_hashes_verify_and_are_salted() {
        let a = hash_password("s3cret");
        let b = hash_password("s3cret");
        assert_ne!(a, b);
        assert!(verify_password("s3cret", &a));
        assert!(!verify_password("wrong", &a));
    }

    #[test]
    fn sign_in_resolves_until_sign_out() {
        let mgr = manager_with_user("ann@example.com", "pw");
        let session = mgr.sign_in("ann@example.com", "pw").unwrap();
        let identity = mgr.resolve(&session.token).unwrap();
        assert_eq!(identity.email, "ann@example.com");

        mgr.sign_out(&session.token);
        assert!(mgr.resolve(&session.token).is_none());
        // Repeated sign-out is fine.
        mgr.sign_out(&session.token);
    }

    #[test]
    fn bad_credentials_are_rejected() {
        let mgr = manager_with_user("ann@example.com", "pw");
        assert!(matches!(
            mgr.sign_in("ann@example.com", "nope"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            mgr.sign_in("ghost@example.com", "pw"),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
