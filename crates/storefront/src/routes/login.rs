//! Customer login.

use std::fmt;

use axum::{
    Json,
    extract::State,
    http::{HeaderValue, header::SET_COOKIE},
    response::{IntoResponse, Response},
};
use bc_storefront_core::LoginCredentials;
use serde::Deserialize;
use tracing::instrument;

use super::extract::{Data, JsonBody};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Login form.
#[derive(Default, Deserialize)]
pub struct LoginBody {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl fmt::Debug for LoginBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginBody")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Log the shopper in and hand the storefront session cookies to the browser.
#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginBody>,
) -> Result<Response> {
    let credentials = LoginCredentials::new(body.email, body.password).map_err(|e| {
        tracing::debug!(error = %e, "Incomplete login");
        AppError::BadRequest("Invalid request".to_string())
    })?;

    // Rejected credentials surface as a 401 with the `invalid_credentials` code
    let session = state.storefront().login(&credentials).await?;
    add_breadcrumb("auth", "Customer logged in", None);

    let mut response = Json(Data { data: None::<()> }).into_response();
    for cookie in &session.set_cookies {
        match HeaderValue::from_str(cookie) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => tracing::warn!(error = %e, "Dropping session cookie"),
        }
    }

    Ok(response)
}
