use std::fmt::{Debug, Formatter};

use crate::{AppResult, NonEmptyString};

/// Signed-in session handed explicitly to every call that talks to the
/// authorization service.
///
/// A context is created when an administrator signs in and dropped on sign-out;
/// nothing reads the token from ambient storage.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionContext {
    access_token: NonEmptyString,
    user_id: String,
}

impl SessionContext {
    /// Creates a session from the bearer token and signed-in user id.
    pub fn new(access_token: impl Into<String>, user_id: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            access_token: NonEmptyString::new(access_token)?,
            user_id: user_id.into(),
        })
    }

    /// Returns the bearer token sent to the authorization service.
    #[must_use]
    pub fn access_token(&self) -> &str {
        self.access_token.as_str()
    }

    /// Returns the signed-in user id.
    #[must_use]
    pub fn user_id(&self) -> &str {
        self.user_id.as_str()
    }
}

impl Debug for SessionContext {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("SessionContext")
            .field("access_token", &"<redacted>")
            .field("user_id", &self.user_id)
            .finish()
    }
}
