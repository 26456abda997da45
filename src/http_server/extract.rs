use axum::{
    extract::{FromRequestParts, Path as AxumPath},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

use crate::http_server::pages::Page;

/// Path parameters that fail to parse are a missing page, not a bad request.
pub struct Path<T>(pub T);

impl<T, S> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AxumPath(t) = AxumPath::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                tracing::debug!("Invalid URL path {}: {}", parts.uri, e);
                (StatusCode::NOT_FOUND, Page::not_found()).into_response()
            })?;
        Ok(Self(t))
    }
}
