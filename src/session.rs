use crate::Config;
use serde::{Deserialize, Serialize};

/// The signed-in user, as established by the identity provider.
///
/// A `Session` is built once at startup and handed to whatever needs the current user; nothing
/// reads the user from global state.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    user_id: Option<String>,
}

impl Session {
    /// A session for `user_id`. An empty id is treated as signed out.
    pub fn new(user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        Self {
            user_id: (!user_id.trim().is_empty()).then_some(user_id),
        }
    }

    /// A session with nobody signed in.
    pub fn signed_out() -> Self {
        Self::default()
    }

    /// Builds the session from the stored configuration. `user_override` (from the command line or
    /// environment) takes precedence over the stored user.
    pub fn from_config(config: &Config, user_override: Option<&str>) -> Self {
        match user_override.or(config.user_id()) {
            Some(user_id) => Self::new(user_id),
            None => Self::signed_out(),
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user_id.is_some()
    }
}
