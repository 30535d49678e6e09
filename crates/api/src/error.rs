//! API Error Responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use feature_engine::FeatureError;
use flight_validator::{ErrorDetail, ValidationError};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Failures surfaced to HTTP callers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("malformed request: {0}")]
    Malformed(String),
    #[error("{} invalid field(s)", .0.len())]
    Validation(Vec<ValidationError>),
    #[error("feature preparation failed: {0}")]
    Feature(#[from] FeatureError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: Vec<ErrorDetail>,
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Malformed(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Feature(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn details(&self) -> Vec<ErrorDetail> {
        match self {
            ApiError::Validation(errors) => errors.iter().map(ValidationError::detail).collect(),
            other => vec![ErrorDetail {
                loc: vec!["body".to_string()],
                msg: other.to_string(),
            }],
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Prediction failed: {}", self);
        } else {
            warn!("Rejected prediction request: {}", self);
        }
        (status, Json(ErrorBody { detail: self.details() })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::Malformed("eof".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Validation(vec![ValidationError::EmptyBatch]).status(),
            StatusCode::BAD_REQUEST
        );
        let feature = FeatureError::Dataset("bad".into());
        assert_eq!(ApiError::from(feature).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_details() {
        let err = ApiError::Validation(vec![ValidationError::UnknownAirline {
            index: 0,
            value: "Aerolineas Chilenas".into(),
        }]);
        let details = err.details();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].loc, vec!["flights", "0", "OPERA"]);
    }
}
