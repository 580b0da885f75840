//! Request body extraction.

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::errors::ApiError;

/// JSON request body.
///
/// Unlike `axum::Json` this does not require a `Content-Type` header, an
/// empty body deserializes as `{}`, and every failure is a 400 with the
/// message `Invalid JSON`.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| ApiError::bad_request("Invalid JSON"))?;
        parse_body(&bytes).map(JsonBody)
    }
}

/// Parse a JSON body, treating a blank body as an empty object.
pub fn parse_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        bytes
    };
    serde_json::from_slice(body).map_err(|_| ApiError::bad_request("Invalid JSON"))
}
