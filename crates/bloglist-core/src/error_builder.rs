//! Prebuilt problem responses shared by every plugin
//!
//! Each [`ProblemKind`] fixes the status, the problem `type` URL, a default
//! title and the machine-readable `error_code`. Callers refine the title and
//! detail and attach extra members such as `error`.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use serde::Serialize;
use serde_json::Value;

use crate::problemdetails::{self, Problem};

const PROBLEM_BASE_URL: &str = "https://bloglist.dev/probs";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    Internal,
}

impl ProblemKind {
    pub fn status(self) -> StatusCode {
        match self {
            ProblemKind::BadRequest => StatusCode::BAD_REQUEST,
            ProblemKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ProblemKind::Forbidden => StatusCode::FORBIDDEN,
            ProblemKind::NotFound => StatusCode::NOT_FOUND,
            ProblemKind::Conflict => StatusCode::CONFLICT,
            ProblemKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn slug(self) -> &'static str {
        match self {
            ProblemKind::BadRequest => "bad-request",
            ProblemKind::Unauthorized => "unauthorized",
            ProblemKind::Forbidden => "forbidden",
            ProblemKind::NotFound => "not-found",
            ProblemKind::Conflict => "conflict",
            ProblemKind::Internal => "internal-server-error",
        }
    }

    fn default_title(self) -> &'static str {
        match self {
            ProblemKind::BadRequest => "Bad Request",
            ProblemKind::Unauthorized => "Unauthorized",
            ProblemKind::Forbidden => "Forbidden",
            ProblemKind::NotFound => "Resource Not Found",
            ProblemKind::Conflict => "Conflict",
            ProblemKind::Internal => "Internal Server Error",
        }
    }

    fn default_detail(self) -> Option<&'static str> {
        match self {
            ProblemKind::Unauthorized => Some("Authentication is required to access this resource"),
            ProblemKind::Internal => {
                Some("An unexpected error occurred while processing your request")
            }
            _ => None,
        }
    }

    fn error_code(self) -> &'static str {
        match self {
            ProblemKind::BadRequest => "BAD_REQUEST",
            ProblemKind::Unauthorized => "UNAUTHORIZED",
            ProblemKind::Forbidden => "FORBIDDEN",
            ProblemKind::NotFound => "NOT_FOUND",
            ProblemKind::Conflict => "CONFLICT",
            ProblemKind::Internal => "INTERNAL_SERVER_ERROR",
        }
    }
}

pub struct ErrorBuilder {
    kind: ProblemKind,
    title: Option<String>,
    detail: Option<String>,
    values: BTreeMap<String, Value>,
}

impl ErrorBuilder {
    pub fn new(kind: ProblemKind) -> Self {
        Self {
            kind,
            title: None,
            detail: None,
            values: BTreeMap::new(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Extra problem member; values that fail to serialize are skipped
    pub fn value<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(value) = serde_json::to_value(value) {
            self.values.insert(key.to_string(), value);
        }
        self
    }

    pub fn build(self) -> Problem {
        let kind = self.kind;
        let mut problem = problemdetails::new(kind.status())
            .with_type(format!("{}/{}", PROBLEM_BASE_URL, kind.slug()))
            .with_title(self.title.unwrap_or_else(|| kind.default_title().to_string()))
            .with_value("error_code", kind.error_code())
            .with_value("timestamp", chrono::Utc::now().to_rfc3339());

        if let Some(detail) = self.detail.or(kind.default_detail().map(str::to_string)) {
            problem = problem.with_detail(detail);
        }
        for (key, value) in self.values {
            problem = problem.with_value(&key, value);
        }

        problem
    }
}

pub fn internal_server_error() -> ErrorBuilder {
    ErrorBuilder::new(ProblemKind::Internal)
}

pub fn not_found() -> ErrorBuilder {
    ErrorBuilder::new(ProblemKind::NotFound)
}

pub fn unauthorized() -> ErrorBuilder {
    ErrorBuilder::new(ProblemKind::Unauthorized)
}

pub fn bad_request() -> ErrorBuilder {
    ErrorBuilder::new(ProblemKind::BadRequest)
}

pub fn forbidden() -> ErrorBuilder {
    ErrorBuilder::new(ProblemKind::Forbidden)
}

pub fn conflict() -> ErrorBuilder {
    ErrorBuilder::new(ProblemKind::Conflict)
}
