//! Identity provider seam.
//!
//! The site only needs four things from an identity provider: create an account, exchange
//! credentials for a session token, revoke a token, and resolve a token to a user. The
//! [`IdentityProvider`] trait captures that; [`LocalIdentityProvider`] implements it on top of
//! the document store so the site runs without a hosted provider.

use crate::constants::{CREDENTIALS_COLLECTION, SESSION_TTL_HOURS, USERS_COLLECTION};
use crate::error::{NewsError, NewsResult};
use crate::repositories::helpers::{allocate_document_id, from_document, new_id, to_document};
use crate::repositories::users::UserRepository;
use crate::store::DocumentStore;
use crate::validation::validate_password;
use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use chrono::{DateTime, Duration, Utc};
use newsdesk_types::EmailAddress;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// An authenticated identity as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityUser {
    pub uid: String,
    pub email: String,
}

/// A signed-in session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: IdentityUser,
}

pub trait IdentityProvider: Send + Sync {
    /// Creates an account and signs it in.
    fn sign_up(&self, email: &EmailAddress, password: &str) -> NewsResult<Session>;

    fn sign_in(&self, email: &EmailAddress, password: &str) -> NewsResult<Session>;

    /// Revokes `token`. Unknown tokens are ignored.
    fn sign_out(&self, token: &str) -> NewsResult<()>;

    /// Resolves a session token.
    ///
    /// # Errors
    ///
    /// Returns `NewsError::Unauthenticated` for unknown or revoked tokens.
    fn verify(&self, token: &str) -> NewsResult<IdentityUser>;
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Credential {
    uid: String,
    email: String,
    password_hash: String,
}

/// Email/password identity provider backed by the document store.
///
/// Credentials are keyed by a SHA-256 digest of the lower-cased email and hold an Argon2id
/// PHC hash. Sessions are opaque tokens held in memory, so a restart signs everyone out.
/// A token stops verifying once it is older than the session TTL.
pub struct LocalIdentityProvider {
    store: Arc<dyn DocumentStore>,
    users: UserRepository,
    session_ttl: Duration,
    sessions: RwLock<HashMap<String, SessionEntry>>,
}

struct SessionEntry {
    user: IdentityUser,
    issued_at: DateTime<Utc>,
}

impl SessionEntry {
    fn is_live(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now < self.issued_at + ttl
    }
}

impl LocalIdentityProvider {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_session_ttl(store, Duration::hours(SESSION_TTL_HOURS))
    }

    pub fn with_session_ttl(store: Arc<dyn DocumentStore>, session_ttl: Duration) -> Self {
        Self {
            users: UserRepository::new(store.clone()),
            store,
            session_ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    fn credential_key(email: &EmailAddress) -> String {
        hex::encode(Sha256::digest(email.normalised().as_bytes()))
    }

    fn load_credential(&self, email: &EmailAddress) -> NewsResult<Option<Credential>> {
        self.store
            .get(CREDENTIALS_COLLECTION, &Self::credential_key(email))?
            .map(from_document::<Credential>)
            .transpose()
    }

    /// Issues a token for `user`, dropping expired sessions first.
    fn open_session(&self, user: IdentityUser) -> Session {
        let token = new_id();
        let now = Utc::now();
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        sessions.retain(|_, entry| entry.is_live(now, self.session_ttl));
        sessions.insert(
            token.clone(),
            SessionEntry {
                user: user.clone(),
                issued_at: now,
            },
        );
        Session { token, user }
    }
}

impl IdentityProvider for LocalIdentityProvider {
    fn sign_up(&self, email: &EmailAddress, password: &str) -> NewsResult<Session> {
        validate_password(password)?;

        if self.load_credential(email)?.is_some() {
            return Err(NewsError::EmailTaken(email.to_string()));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| NewsError::PasswordHash(e.to_string()))?
            .to_string();

        let uid = allocate_document_id(self.store.as_ref(), USERS_COLLECTION, new_id)?;
        let credential = Credential {
            uid: uid.clone(),
            email: email.to_string(),
            password_hash,
        };
        self.store.put(
            CREDENTIALS_COLLECTION,
            &Self::credential_key(email),
            &to_document(&credential)?,
        )?;
        self.users.get_or_create(&uid, email.as_str())?;

        tracing::info!("registered user {}", uid);
        Ok(self.open_session(IdentityUser {
            uid,
            email: email.to_string(),
        }))
    }

    fn sign_in(&self, email: &EmailAddress, password: &str) -> NewsResult<Session> {
        let credential = self
            .load_credential(email)?
            .ok_or(NewsError::InvalidCredentials)?;

        let parsed = PasswordHash::new(&credential.password_hash)
            .map_err(|e| NewsError::PasswordHash(e.to_string()))?;
        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_err()
        {
            tracing::warn!("failed sign-in for user {}", credential.uid);
            return Err(NewsError::InvalidCredentials);
        }

        Ok(self.open_session(IdentityUser {
            uid: credential.uid,
            email: credential.email,
        }))
    }

    fn sign_out(&self, token: &str) -> NewsResult<()> {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        sessions.remove(token);
        Ok(())
    }

    fn verify(&self, token: &str) -> NewsResult<IdentityUser> {
        let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        sessions
            .get(token)
            .filter(|entry| entry.is_live(Utc::now(), self.session_ttl))
            .map(|entry| entry.user.clone())
            .ok_or(NewsError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FileDocumentStore;
    use tempfile::TempDir;

    fn provider(temp_dir: &TempDir) -> (Arc<dyn DocumentStore>, LocalIdentityProvider) {
        let store: Arc<dyn DocumentStore> = Arc::new(FileDocumentStore::new(temp_dir.path()));
        (store.clone(), LocalIdentityProvider::new(store))
    }

    fn email(s: &str) -> EmailAddress {
        EmailAddress::parse(s).unwrap()
    }

    #[test]
    fn test_sign_up_creates_session_and_profile() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let (store, identity) = provider(&temp_dir);

        let session = identity
            .sign_up(&email("reader@example.com"), "secret-pw")
            .expect("sign up should succeed");

        assert_eq!(identity.verify(&session.token).unwrap(), session.user);

        let profile = UserRepository::new(store)
            .get(&session.user.uid)
            .unwrap()
            .expect("profile should exist");
        assert_eq!(profile.email, "reader@example.com");
        assert!(!profile.is_admin);
    }

    #[test]
    fn test_password_is_not_stored_in_plain_text() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let (store, identity) = provider(&temp_dir);

        identity
            .sign_up(&email("reader@example.com"), "secret-pw")
            .unwrap();

        let docs = store.list(CREDENTIALS_COLLECTION).unwrap();
        assert_eq!(docs.len(), 1);
        let hash = docs[0].1["passwordHash"].as_str().unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("secret-pw"));
    }

    #[test]
    fn test_sign_up_rejects_duplicate_email_case_insensitively() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let (_, identity) = provider(&temp_dir);

        identity
            .sign_up(&email("reader@example.com"), "secret-pw")
            .unwrap();
        let err = identity
            .sign_up(&email("Reader@Example.com"), "another-pw")
            .unwrap_err();
        assert!(matches!(err, NewsError::EmailTaken(_)));
    }

    #[test]
    fn test_sign_up_rejects_short_password() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let (_, identity) = provider(&temp_dir);

        let err = identity.sign_up(&email("a@example.com"), "123").unwrap_err();
        assert!(matches!(err, NewsError::InvalidInput(_)));
    }

    #[test]
    fn test_sign_in_checks_password() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let (_, identity) = provider(&temp_dir);

        let registered = identity
            .sign_up(&email("a@example.com"), "secret-pw")
            .unwrap();

        let session = identity
            .sign_in(&email("A@example.com"), "secret-pw")
            .expect("sign in should succeed");
        assert_eq!(session.user.uid, registered.user.uid);
        assert_ne!(session.token, registered.token);

        assert!(matches!(
            identity.sign_in(&email("a@example.com"), "wrong-pw"),
            Err(NewsError::InvalidCredentials)
        ));
        assert!(matches!(
            identity.sign_in(&email("nobody@example.com"), "secret-pw"),
            Err(NewsError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_expired_token_is_rejected_and_pruned() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store: Arc<dyn DocumentStore> = Arc::new(FileDocumentStore::new(temp_dir.path()));
        let identity = LocalIdentityProvider::with_session_ttl(store, Duration::zero());

        let first = identity
            .sign_up(&email("a@example.com"), "secret-pw")
            .unwrap();
        assert!(matches!(
            identity.verify(&first.token),
            Err(NewsError::Unauthenticated)
        ));

        for _ in 0..10 {
            identity.sign_in(&email("a@example.com"), "secret-pw").unwrap();
        }
        let live = identity.sessions.read().unwrap().len();
        assert_eq!(live, 1);
    }

    #[test]
    fn test_repeated_sign_in_keeps_live_sessions() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let (_, identity) = provider(&temp_dir);

        let first = identity
            .sign_up(&email("a@example.com"), "secret-pw")
            .unwrap();
        let second = identity
            .sign_in(&email("a@example.com"), "secret-pw")
            .unwrap();

        assert!(identity.verify(&first.token).is_ok());
        assert!(identity.verify(&second.token).is_ok());
    }

    #[test]
    fn test_sign_out_revokes_token() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let (_, identity) = provider(&temp_dir);

        let session = identity
            .sign_up(&email("a@example.com"), "secret-pw")
            .unwrap();
        identity.sign_out(&session.token).unwrap();

        assert!(matches!(
            identity.verify(&session.token),
            Err(NewsError::Unauthenticated)
        ));
        identity
            .sign_out("never-issued")
            .expect("unknown tokens are ignored");
    }
}
