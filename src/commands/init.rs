use crate::commands::Out;
use crate::{Config, Result};
use std::path::Path;

/// Creates the data directory and an initial `config.json` file using `api_url` along with
/// default settings.
///
/// # Arguments
/// - `expense_home` - The directory that will be the root of data directory, e.g.
///   `$HOME/expense`
/// - `api_url` - The base URL of the transaction service, e.g. `https://example.com/api`
/// - `user_id` - The signed-in user, if it is already known.
///
/// # Errors
/// - Returns an error if the URL is invalid or if any file operations fail.
pub async fn init(expense_home: &Path, api_url: &str, user_id: Option<&str>) -> Result<Out<()>> {
    let config = Config::create(expense_home, api_url, user_id).await?;
    let message = match config.user_id() {
        Some(user_id) => format!(
            "Successfully created the expense directory and config, signed in as {user_id}"
        ),
        None => "Successfully created the expense directory and config".to_string(),
    };
    Ok(message.into())
}
