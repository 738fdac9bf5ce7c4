//! Common error types used across all Bloglist services

use thiserror::Error;

/// Common service error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<ServiceError> for crate::problemdetails::Problem {
    fn from(error: ServiceError) -> Self {
        use crate::error_builder::{bad_request, internal_server_error, not_found};

        match error {
            ServiceError::NotFound { resource } => not_found()
                .detail(format!("{} was not found", resource))
                .build(),
            ServiceError::Validation { message } => bad_request()
                .title("Validation Error")
                .detail(message)
                .build(),
            ServiceError::Database(message) => {
                tracing::error!("Database error: {}", message);
                internal_server_error().build()
            }
            ServiceError::Configuration { message } => {
                tracing::error!("Configuration error: {}", message);
                internal_server_error().build()
            }
            ServiceError::Internal(err) => {
                tracing::error!("Internal error: {:#}", err);
                internal_server_error().build()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problemdetails::Problem;
    use axum::http::StatusCode;

    #[test]
    fn test_service_error_maps_to_problem_status() {
        let problem: Problem = ServiceError::NotFound {
            resource: "Blog 3".to_string(),
        }
        .into();
        assert_eq!(problem.status_code, StatusCode::NOT_FOUND);
        assert_eq!(problem.body["detail"], "Blog 3 was not found");

        let problem: Problem = ServiceError::Validation {
            message: "title is required".to_string(),
        }
        .into();
        assert_eq!(problem.status_code, StatusCode::BAD_REQUEST);

        let problem: Problem = ServiceError::Database("locked".to_string()).into();
        assert_eq!(problem.status_code, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
