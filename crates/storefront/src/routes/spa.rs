//! Single-page app shell.
//!
//! The browser client routes on its own, so a deep link such as
//! `/product/blue-mug` must load the same `index.html` as `/`. Paths in
//! [`CLIENT_ROUTES`] get the shell; anything else is looked up as a static
//! asset and finally answered with a JSON 404.

use axum::{
    extract::{Request, State},
    http::Method,
    response::{IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

use crate::error::AppError;
use crate::state::AppState;

/// A route handled by the browser client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientRoute {
    /// Path pattern; `:name` segments match any single segment.
    pub pattern: &'static str,
    /// Whether longer paths are rejected.
    pub exact: bool,
}

const fn exact(pattern: &'static str) -> ClientRoute {
    ClientRoute {
        pattern,
        exact: true,
    }
}

const fn prefix(pattern: &'static str) -> ClientRoute {
    ClientRoute {
        pattern,
        exact: false,
    }
}

/// Routes of the browser client.
pub const CLIENT_ROUTES: &[ClientRoute] = &[
    exact("/"),
    exact("/category/:slug"),
    prefix("/product/:slug"),
    prefix("/cart"),
    prefix("/profile"),
    prefix("/orders"),
    exact("/order/:slug"),
    prefix("/addresses"),
    exact("/address/:slug"),
    prefix("/wishlists"),
    exact("/wishlist/:slug"),
];

impl ClientRoute {
    /// Whether `path` is handled by this route.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let mut wanted = segments(self.pattern);
        let mut actual = segments(path);

        loop {
            match (wanted.next(), actual.next()) {
                (None, None) => return true,
                (None, Some(_)) => return !self.exact,
                (Some(_), None) => return false,
                (Some(pattern), Some(segment)) => {
                    if !pattern.starts_with(':') && pattern != segment {
                        return false;
                    }
                }
            }
        }
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

/// Whether `path` belongs to the browser client.
#[must_use]
pub fn is_client_route(path: &str) -> bool {
    CLIENT_ROUTES.iter().any(|route| route.matches(path))
}

/// Fallback for every path no API route claimed.
pub async fn fallback(State(state): State<AppState>, request: Request) -> Response {
    let Some(dir) = state.config().static_dir.clone() else {
        return not_found();
    };
    if request.method() != Method::GET && request.method() != Method::HEAD {
        return not_found();
    }

    if is_client_route(request.uri().path()) {
        return match ServeFile::new(dir.join("index.html")).oneshot(request).await {
            Ok(response) => response.into_response(),
            Err(never) => match never {},
        };
    }

    match ServeDir::new(dir).oneshot(request).await {
        Ok(response) if response.status().is_success() || response.status().is_redirection() => {
            response.into_response()
        }
        Ok(_) => not_found(),
        Err(never) => match never {},
    }
}

fn not_found() -> Response {
    AppError::NotFound("Not found".to_string()).into_response()
}
