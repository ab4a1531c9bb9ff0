//! User profiles.
//!
//! A profile carries the admin flag. Identity (credentials, sessions) is the identity
//! provider's business; this collection only maps a uid to its profile.

use crate::constants::USERS_COLLECTION;
use crate::error::{NewsError, NewsResult};
use crate::models::UserProfile;
use crate::repositories::helpers::{decode_all, from_document, to_document};
use crate::store::DocumentStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn DocumentStore>,
}

impl UserRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn get(&self, uid: &str) -> NewsResult<Option<UserProfile>> {
        self.store
            .get(USERS_COLLECTION, uid)?
            .map(from_document::<UserProfile>)
            .transpose()
    }

    pub fn put(&self, profile: &UserProfile) -> NewsResult<()> {
        self.store
            .put(USERS_COLLECTION, &profile.uid, &to_document(profile)?)
    }

    /// Returns the stored profile, creating a non-admin one on first sight.
    pub fn get_or_create(&self, uid: &str, email: &str) -> NewsResult<UserProfile> {
        if let Some(profile) = self.get(uid)? {
            return Ok(profile);
        }

        let profile = UserProfile {
            uid: uid.to_owned(),
            email: email.to_owned(),
            is_admin: false,
        };
        self.put(&profile)?;
        tracing::info!("created profile for user {}", uid);
        Ok(profile)
    }

    /// Grants or revokes admin rights.
    ///
    /// # Errors
    ///
    /// Returns `NewsError::NotFound` if no profile exists for `uid`.
    pub fn set_admin(&self, uid: &str, is_admin: bool) -> NewsResult<UserProfile> {
        let mut profile = self
            .get(uid)?
            .ok_or_else(|| NewsError::NotFound(format!("user '{}'", uid)))?;
        profile.is_admin = is_admin;
        self.put(&profile)?;
        tracing::info!("user {} admin={}", uid, is_admin);
        Ok(profile)
    }

    /// All profiles ordered by email.
    pub fn list(&self) -> NewsResult<Vec<UserProfile>> {
        let mut profiles: Vec<UserProfile> =
            decode_all(USERS_COLLECTION, self.store.list(USERS_COLLECTION)?);
        profiles.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(profiles)
    }
}
