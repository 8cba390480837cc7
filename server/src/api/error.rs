use super::{ErrorResponse, ValidationErrorResponse};
use crate::serializer::ValidationError;
use crate::store::StoreError;
use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Everything a handler can fail with, mapped to a status and JSON body.
#[derive(Debug)]
pub enum ApiError {
    Validation(ValidationError),
    Json(JsonRejection),
    Path(PathRejection),
    Query(QueryRejection),
    BadRequest(String),
    Store(StoreError),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Json(rejection)
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Path(rejection)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Query(rejection)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

fn error_body(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(err) => (
                StatusCode::BAD_REQUEST,
                Json(ValidationErrorResponse {
                    error: "Validation failed".to_string(),
                    fields: err.fields,
                }),
            )
                .into_response(),
            ApiError::Json(rejection) => error_body(rejection.status(), rejection.body_text()),
            ApiError::Path(rejection) => error_body(rejection.status(), rejection.body_text()),
            ApiError::Query(rejection) => error_body(rejection.status(), rejection.body_text()),
            ApiError::BadRequest(message) => error_body(StatusCode::BAD_REQUEST, message),
            ApiError::Store(err @ (StoreError::RecipeNotFound | StoreError::IngredientNotFound)) => {
                error_body(StatusCode::NOT_FOUND, err.to_string())
            }
            ApiError::Store(err) => {
                tracing::error!(error = %err, "Store operation failed");
                error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}
