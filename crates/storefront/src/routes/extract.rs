//! Request extractors and the success envelope shared by the API routes.

use axum::{
    Json,
    body::Bytes,
    extract::{FromRequest, Request},
    http::{HeaderMap, header::COOKIE},
};
use cookie::Cookie;
use serde::{Serialize, de::DeserializeOwned};

use crate::error::AppError;

/// Successful response body: `{"data": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Data<T> {
    pub data: T,
}

/// Wrap a payload in the `data` envelope.
pub const fn data<T>(data: T) -> Json<Data<T>> {
    Json(Data { data })
}

/// JSON request body that answers malformed input with the error envelope.
///
/// An empty body deserializes as `T::default()`, so handlers can report
/// which field is missing instead of failing on the body as a whole.
#[derive(Debug, Clone, Default)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }

        serde_json::from_slice(&bytes)
            .map(Self)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected request body");
                AppError::BadRequest("Invalid request".to_string())
            })
    }
}

/// Value of a request cookie, if present.
pub fn request_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| Cookie::split_parse(header.to_string()))
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Payload {
        name: Option<String>,
    }

    async fn extract(body: &str) -> Result<Payload, AppError> {
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(body.to_string()))
            .unwrap();
        JsonBody::<Payload>::from_request(request, &())
            .await
            .map(|JsonBody(payload)| payload)
    }

    #[tokio::test]
    async fn test_empty_body_is_default() {
        assert_eq!(extract("").await.unwrap(), Payload::default());
    }

    #[tokio::test]
    async fn test_json_body() {
        assert_eq!(
            extract(r#"{"name": "mug"}"#).await.unwrap().name.as_deref(),
            Some("mug")
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        assert!(matches!(
            extract("{not json").await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_request_cookie() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, "theme=dark; SHOP_TOKEN=abc".parse().unwrap());
        headers.append(COOKIE, "bc_cartId=".parse().unwrap());

        assert_eq!(request_cookie(&headers, "SHOP_TOKEN").as_deref(), Some("abc"));
        assert_eq!(request_cookie(&headers, "bc_cartId"), None);
        assert_eq!(request_cookie(&headers, "missing"), None);
    }
}
