//! HTTP error mapping - Turns [`crate::errors::Error`] into a status code and JSON body.
//!
//! Missing records are 404, client mistakes 400. Everything else is logged and answered
//! with a generic 500 so database details never reach the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, warn};

use crate::errors::Error;

/// Handler error; renders as `{"error": <code>, "message": <text>}`.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl<E> From<E> for ApiError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Status code and machine-readable code for an error.
#[must_use]
pub const fn classify(err: &Error) -> (StatusCode, &'static str) {
    match err {
        Error::SupplierNotFound { .. }
        | Error::ProductNotFound { .. }
        | Error::TransactionNotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
        Error::DuplicateEmail { .. } | Error::DuplicateSku { .. } => {
            (StatusCode::BAD_REQUEST, "unique_violation")
        }
        Error::UnknownSupplier { .. } => (StatusCode::BAD_REQUEST, "unknown_supplier"),
        Error::InsufficientStock { .. } => (StatusCode::BAD_REQUEST, "insufficient_stock"),
        Error::InvalidQuantity { .. } | Error::InvalidPrice { .. } | Error::Validation { .. } => {
            (StatusCode::BAD_REQUEST, "validation_error")
        }
        Error::Database(_) | Error::Config { .. } | Error::Io(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
        }
    }
}

/// Builds a JSON error response.
pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = classify(&self.0);
        if status.is_server_error() {
            error!(error = ?self.0, "Request failed");
            return json_error(status, code, "internal server error");
        }
        if status != StatusCode::NOT_FOUND {
            warn!(error = %self.0, "Request rejected");
        }
        json_error(status, code, self.0.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DbErr;

    #[test]
    fn test_classify_domain_errors() {
        assert_eq!(
            classify(&Error::ProductNotFound { id: 1 }).0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            classify(&Error::InsufficientStock {
                product_id: 1,
                available: 0,
                requested: 1
            }),
            (StatusCode::BAD_REQUEST, "insufficient_stock")
        );
        assert_eq!(
            classify(&Error::DuplicateEmail {
                email: "a@b.c".into()
            })
            .0,
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_storage_errors_hide_details() {
        let response =
            ApiError(Error::Database(DbErr::Custom("disk on fire".into()))).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_bind_failure_is_internal_error() {
        let err = Error::from(std::io::Error::new(
            std::io::ErrorKind::AddrInUse,
            "address already in use",
        ));
        assert_eq!(
            classify(&err),
            (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
        );
    }
}
