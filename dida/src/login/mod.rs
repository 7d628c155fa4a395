//! Sign-in: form validation, the login request, and what follows it.

pub mod rules;

use crate::api::{AuthApi, HttpError};
use crate::goto::Goto;
use crate::token::TokenStore;

/// Errors from [`sign_in`].
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    /// A form field failed validation; carries the rule's message.
    #[error("{0}")]
    Invalid(&'static str),

    /// The backend rejected the request.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// No saved token and no credentials to sign in with.
    #[error("not signed in: username and password are required")]
    MissingCredentials,
}

/// Validates the credentials against the form rules.
///
/// # Errors
///
/// Returns [`LoginError::Invalid`] with the first failing message.
pub fn validate_credentials(username: &str, password: &str) -> Result<(), LoginError> {
    rules::validate(&rules::create_username_rule(), username, password)
        .and_then(|()| rules::validate(&rules::create_password_rule(), password, password))
        .map_err(LoginError::Invalid)
}

/// Validates, logs in, stores the token and goes to the task page.
///
/// # Errors
///
/// Returns [`LoginError::Invalid`] before any request when a field is
/// invalid, or [`LoginError::Http`] when the login request fails.
pub async fn sign_in<A: AuthApi>(
    api: &A,
    token: &TokenStore,
    goto: &Goto,
    username: &str,
    password: &str,
) -> Result<(), LoginError> {
    validate_credentials(username, password)?;
    let issued = api.fetch_login(username, password).await?;
    token.set_token(issued);
    tracing::info!(username, "signed in");
    goto.goto_task();
    Ok(())
}

/// Opens a session at startup.
///
/// Credentials, when both are given, always sign in afresh and replace any
/// saved token. Without them a saved token is reused as is.
///
/// # Errors
///
/// Returns [`LoginError::MissingCredentials`] when there is neither a
/// token nor credentials, otherwise whatever [`sign_in`] returns.
pub async fn start_session<A: AuthApi>(
    api: &A,
    token: &TokenStore,
    goto: &Goto,
    username: Option<&str>,
    password: Option<&str>,
) -> Result<(), LoginError> {
    match (username, password) {
        (Some(username), Some(password)) => {
            sign_in(api, token, goto, username, password).await
        }
        _ if token.has_token() => {
            tracing::debug!("reusing saved token");
            goto.goto_task();
            Ok(())
        }
        _ => Err(LoginError::MissingCredentials),
    }
}

/// Drops the token and returns to the login page.
pub fn sign_out(token: &TokenStore, goto: &Goto) {
    token.clean_token();
    tracing::info!("signed out");
    goto.goto_login();
}
