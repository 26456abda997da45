use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::http_server::pages::Page;
use crate::services::ServiceError;

/// A failed read, turned into the 404 or 500 page.
#[derive(Debug)]
pub struct AppError(ServiceError);

impl<E> From<E> for AppError
where
    E: Into<ServiceError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

// Tell axum how to convert `AppError` into a response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self.0 {
            ServiceError::NotFound { entity, id } => {
                tracing::debug!("{} {} not found", entity, id);
                (StatusCode::NOT_FOUND, Page::not_found()).into_response()
            }
            err => {
                tracing::error!("Request failed: {err:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, Page::server_error()).into_response()
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Page::not_found()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DbErr;

    #[test]
    fn test_not_found_maps_to_404() {
        let response = AppError::from(ServiceError::not_found("venue", 1)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_store_errors_map_to_500() {
        let response = AppError::from(DbErr::Custom("disk full".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response =
            AppError::from(ServiceError::ConstraintViolation("duplicate".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
