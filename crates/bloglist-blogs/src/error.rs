//! Error types for the blog service

use bloglist_core::error_builder::{bad_request, forbidden, internal_server_error, not_found};
use bloglist_core::problemdetails::Problem;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum BlogError {
    #[error("Database error: {reason}")]
    Database { reason: String },

    #[error("Blog not found: {0}")]
    NotFound(i32),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("only the creator can delete blog {0}")]
    Forbidden(i32),
}

impl From<sea_orm::DbErr> for BlogError {
    fn from(error: sea_orm::DbErr) -> Self {
        BlogError::Database {
            reason: error.to_string(),
        }
    }
}

impl From<BlogError> for Problem {
    fn from(error: BlogError) -> Self {
        match error {
            BlogError::Database { reason } => {
                error!("Database error: {}", reason);
                internal_server_error().build()
            }

            BlogError::NotFound(id) => not_found()
                .title("Blog Not Found")
                .detail(format!("Blog {} does not exist", id))
                .value("blog_id", id)
                .build(),

            BlogError::Validation(msg) => bad_request()
                .title("Validation Error")
                .detail(msg.clone())
                .value("error", msg)
                .build(),

            BlogError::Forbidden(id) => forbidden()
                .detail(format!("Only the creator can delete blog {}", id))
                .value("error", "only the creator can delete a blog")
                .build(),
        }
    }
}
