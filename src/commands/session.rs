//! `expense login` and `expense logout`.
//!
//! Signing in happens with the identity provider; these commands only remember (or forget) the
//! user id it issued so later commands act on that user's transactions.

use crate::commands::Out;
use crate::{Config, Error, ErrorType, Result, Session};
use anyhow::anyhow;
use tracing::debug;

/// Stores `user_id` as the signed-in user.
pub async fn login(mut config: Config, user_id: &str) -> Result<Out<Session>> {
    let session = Session::new(user_id);
    let Some(user_id) = session.user_id() else {
        return Err(Error::new(
            ErrorType::Validation,
            anyhow!("The user id must not be empty"),
        ));
    };
    config.set_user_id(Some(user_id.to_string()));
    config.save().await?;
    debug!("Saved the signed-in user to {}", config.config_path().display());
    Ok(Out::new(format!("Signed in as {user_id}"), session.clone()))
}

/// Forgets the signed-in user. Signing out when nobody is signed in is not an error.
pub async fn logout(mut config: Config) -> Result<Out<()>> {
    let message = match config.user_id() {
        Some(user_id) => format!("Signed out {user_id}"),
        None => "Nobody was signed in".to_string(),
    };
    config.set_user_id(None);
    config.save().await?;
    Ok(message.into())
}
