//! Login and sign-up against the account store.

use serde::{Deserialize, Serialize};

use super::{require, AppointmentView, FlowError};
use crate::models::Role;
use crate::store::{AccountStore, AppointmentStore};

/// What the user typed on the login or sign-up screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub role: Role,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            role,
        }
    }

    fn check_present(&self) -> Result<(), FlowError> {
        require("username", &self.username)?;
        require("password", &self.password)
    }
}

/// A user who passed the login check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub username: String,
    pub role: Role,
}

impl AuthenticatedUser {
    /// Hand control to the appointment screen for this user's role.
    pub fn enter<'s>(&self, store: &'s AppointmentStore) -> Result<AppointmentView<'s>, FlowError> {
        AppointmentView::open(store, self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    AwaitingCredentials,
    Authenticated(AuthenticatedUser),
    /// Last login attempt failed; the message is what the user was shown.
    Rejected(String),
}

/// Credential entry screen state machine.
pub struct AuthFlow<'a> {
    accounts: &'a AccountStore,
    state: AuthState,
}

impl<'a> AuthFlow<'a> {
    pub fn new(accounts: &'a AccountStore) -> Self {
        Self {
            accounts,
            state: AuthState::AwaitingCredentials,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Validate credentials against the account store, scoped to the
    /// presented role.
    pub fn login(&mut self, credentials: &Credentials) -> Result<AuthenticatedUser, FlowError> {
        match self.check_login(credentials) {
            Ok(user) => {
                tracing::info!(username = %user.username, role = %user.role, "Login succeeded");
                self.state = AuthState::Authenticated(user.clone());
                Ok(user)
            }
            Err(e) => {
                tracing::info!(username = %credentials.username, role = %credentials.role, "Login rejected: {e}");
                self.state = AuthState::Rejected(e.to_string());
                Err(e)
            }
        }
    }

    fn check_login(&self, credentials: &Credentials) -> Result<AuthenticatedUser, FlowError> {
        credentials.check_present()?;

        let account = self
            .accounts
            .find_account(&credentials.username, credentials.role)?
            .ok_or(FlowError::UnknownUsername)?;

        if account.password != credentials.password {
            return Err(FlowError::WrongPassword);
        }

        Ok(AuthenticatedUser {
            username: account.username,
            role: account.role,
        })
    }

    /// Create an account. Success or failure, the user lands back on the
    /// credential entry screen.
    pub fn sign_up(&mut self, credentials: &Credentials) -> Result<(), FlowError> {
        self.state = AuthState::AwaitingCredentials;
        credentials.check_present()?;
        self.accounts
            .create_account(&credentials.username, &credentials.password, credentials.role)
    }

    /// Back to the entry state, e.g. after the user dismisses a notice.
    pub fn reset(&mut self) {
        self.state = AuthState::AwaitingCredentials;
    }
}
