use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError, web};
use derive_more::Display;
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use tracing::error;

/// Field-level validation failures, accumulated across all fields so the
/// caller sees every violation in one round trip.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Bails out with a 400 when any violation was recorded.
    pub fn into_result(self) -> Result<(), ApiError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self))
        }
    }
}

#[derive(Debug, Display)]
pub enum ApiError {
    #[display(fmt = "Validation failed")]
    Validation(ValidationErrors),
    #[display(fmt = "{}", _0)]
    NotFound(String),
    #[display(fmt = "Method Not Allowed")]
    MethodNotAllowed,
    #[display(fmt = "Internal Server Error")]
    Database(sqlx::Error),
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Database(e)
    }
}

/// Fixed human-readable message per HTTP status class, applied to errors the
/// framework raises before a handler runs.
pub fn status_message(status: StatusCode) -> &'static str {
    match status.as_u16() {
        400 => "Bad Request - Invalid data provided",
        401 => "Unauthorized - Authentication required",
        403 => "Forbidden - You do not have permission to perform this action",
        404 => "Not Found - The requested resource does not exist",
        405 => "Method Not Allowed",
        409 => "Conflict - Resource already exists",
        500 => "Internal Server Error",
        _ => "An error occurred",
    }
}

fn envelope(status: StatusCode, message: &str, details: serde_json::Value) -> HttpResponse {
    HttpResponse::build(status).json(json!({
        "success": false,
        "error": {
            "status_code": status.as_u16(),
            "message": message,
            "details": details,
        }
    }))
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let details = match self {
            ApiError::Validation(errors) => json!(errors),
            ApiError::Database(e) => {
                error!(error = %e, "Database operation failed");
                json!({})
            }
            _ => json!({}),
        };
        envelope(status, &self.to_string(), details)
    }
}

/// Catch-all for requests matching no route.
pub async fn not_found_handler() -> HttpResponse {
    envelope(
        StatusCode::NOT_FOUND,
        status_message(StatusCode::NOT_FOUND),
        json!({}),
    )
}

/// Default service attached to every resource: known path, unmatched method.
pub async fn method_not_allowed_handler() -> HttpResponse {
    envelope(
        StatusCode::METHOD_NOT_ALLOWED,
        status_message(StatusCode::METHOD_NOT_ALLOWED),
        json!({}),
    )
}

fn extractor_error(status: StatusCode, detail: String) -> actix_web::Error {
    let response = envelope(status, status_message(status), json!({ "error": &detail }));
    actix_web::error::InternalError::from_response(detail, response).into()
}

/// Rewrites malformed JSON bodies into the uniform envelope.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    extractor_error(StatusCode::BAD_REQUEST, err.to_string())
}

/// Rewrites unparseable query strings into the uniform envelope.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    extractor_error(StatusCode::BAD_REQUEST, err.to_string())
}

/// Non-numeric path ids never match a stored record, so they surface as 404.
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    extractor_error(StatusCode::NOT_FOUND, err.to_string())
}

/// Registers the extractor error handlers on the service config.
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler));
}
