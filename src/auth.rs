//! Turning identity-provider errors into messages people can act on.
//!
//! Signing in and signing up are handled by a hosted identity provider. When it refuses a request
//! it answers with a list of errors, each with a machine-readable `code`. Only the first error is
//! shown. Known codes get a specific message; anything else falls back to the provider's own short
//! message, or to a generic one.

use serde::{Deserialize, Serialize};

const GENERIC: &str = "An error occurred. Please try again.";
const PASSWORD_INCORRECT: &str = "Password is incorrect. Please try again.";
const IDENTIFIER_NOT_FOUND: &str = "Email address not found. Please try again.";
const EMAIL_FORMAT_INVALID: &str = "Invalid email address format. Please try again.";
const EMAIL_IN_USE: &str = "Email already in use. Please try another.";
const USERNAME_TOO_SHORT: &str = "Username must be at least 3 characters long. Please try again.";
const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters long. Please try again.";
const CODE_INCORRECT: &str = "Invalid verification code. Please try again.";

/// A single error entry from the identity provider.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderError {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub short_message: Option<String>,
}

/// The body of an identity-provider error response: `{"errors": [...]}`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderErrors {
    #[serde(default)]
    pub errors: Vec<ProviderError>,
}

impl ProviderErrors {
    pub fn first(&self) -> Option<&ProviderError> {
        self.errors.first()
    }

    fn code(&self) -> Option<&str> {
        self.first().map(|e| e.code.as_str())
    }

    /// The provider's short message, or the generic fallback.
    fn fallback(&self) -> String {
        self.first()
            .and_then(|e| e.short_message.as_deref())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(GENERIC)
            .to_string()
    }
}

/// The message to show when signing in fails.
pub fn sign_in_message(errors: &ProviderErrors) -> String {
    match errors.code() {
        Some("form_password_incorrect") => PASSWORD_INCORRECT.to_string(),
        Some("form_identifier_not_found") => IDENTIFIER_NOT_FOUND.to_string(),
        Some("form_param_format_invalid") => EMAIL_FORMAT_INVALID.to_string(),
        _ => errors.fallback(),
    }
}

/// The message to show when signing up fails.
pub fn sign_up_message(errors: &ProviderErrors) -> String {
    match errors.code() {
        Some("form_identifier_exists") => EMAIL_IN_USE.to_string(),
        Some("form_username_invalid_length") => USERNAME_TOO_SHORT.to_string(),
        Some("form_param_format_invalid") => EMAIL_FORMAT_INVALID.to_string(),
        Some("form_password_length_too_short") => PASSWORD_TOO_SHORT.to_string(),
        _ => errors.fallback(),
    }
}

/// What to do after the e-mail verification step fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyOutcome {
    /// The address was already verified, carry on as if verification succeeded.
    AlreadyVerified,
    /// Stay on the verification screen and show the message.
    Retry(String),
}

/// Interprets a failed e-mail verification. Unlike sign-in and sign-up, unknown errors always get
/// the generic message.
pub fn verify_outcome(errors: &ProviderErrors) -> VerifyOutcome {
    match errors.code() {
        Some("verification_already_verified") => VerifyOutcome::AlreadyVerified,
        Some("form_code_incorrect") => VerifyOutcome::Retry(CODE_INCORRECT.to_string()),
        _ => VerifyOutcome::Retry(GENERIC.to_string()),
    }
}

/// The sign-up form. It can only be submitted once every field has something in it.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpForm {
    pub username: String,
    pub email_address: String,
    pub password: String,
}

impl SignUpForm {
    pub fn can_submit(&self) -> bool {
        !self.username.is_empty() && !self.email_address.is_empty() && !self.password.is_empty()
    }
}
