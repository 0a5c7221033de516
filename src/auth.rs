//! Registration and credential checks, independent of HTTP.

use log::{info, warn};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AuthError, StoreError};
use crate::hash::PasswordHasher;
use crate::models::UserId;
use crate::store::CredentialStore;

/// Fields absent from the submitted form deserialize as empty strings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterParams {
    pub username: String,
    pub password: String,
    pub confirmation: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginParams {
    pub username: String,
    pub password: String,
}

impl RegisterParams {
    /// Every check runs and the last failure is the one reported, so an
    /// empty password outranks a mismatch, which outranks an empty username.
    pub fn validate(&self) -> Result<(), AuthError> {
        let mut error = None;
        if self.username.is_empty() {
            error = Some(AuthError::MissingUsername);
        }
        if self.password != self.confirmation {
            error = Some(AuthError::PasswordMismatch);
        }
        if self.password.is_empty() {
            error = Some(AuthError::MissingPassword);
        }

        match error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl LoginParams {
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.username.is_empty() {
            Err(AuthError::MissingUsername)
        } else if self.password.is_empty() {
            Err(AuthError::MissingPassword)
        } else {
            Ok(())
        }
    }
}

/// Handle on the credential store and the password hasher, shared by all
/// workers as application data.
#[derive(Clone)]
pub struct AuthFlow {
    store: Arc<dyn CredentialStore>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AuthFlow {
    pub fn new(store: Arc<dyn CredentialStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        AuthFlow { store, hasher }
    }

    pub fn register(&self, params: &RegisterParams) -> Result<UserId, AuthError> {
        params.validate()?;

        let digest = self.hasher.hash(&params.password)?;
        match self.store.create_user(&params.username, &digest) {
            Ok(id) => {
                info!("registered user {} ({})", params.username, id);
                Ok(id)
            }
            Err(StoreError::DuplicateUsername) => {
                warn!("registration for taken username {}", params.username);
                Err(AuthError::UsernameTaken)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Returns the id of the user the credentials belong to. An unknown
    /// username and a wrong password are the same error.
    pub fn authenticate(&self, params: &LoginParams) -> Result<UserId, AuthError> {
        params.validate()?;

        match self.store.find_user_by_username(&params.username)? {
            Some(user) if self.hasher.verify(&user.password_hash, &params.password) => {
                Ok(user.user_id())
            }
            Some(_) => {
                warn!("wrong password for {}", params.username);
                Err(AuthError::InvalidCredentials)
            }
            None => {
                warn!("login for unknown user {}", params.username);
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}
