use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use bloglist_core::error_builder::unauthorized;
use bloglist_core::problemdetails::Problem;
use bloglist_entities::users;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Message clients receive when a bearer token is missing or not valid
pub const INVALID_TOKEN: &str = "invalid token";

// Simplified user schema for OpenAPI documentation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserSchema {
    pub id: i32,
    pub username: String,
    pub name: String,
}

/// The authenticated caller of a request, inserted by [`crate::AuthMiddleware`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    pub user: users::Model,
}

impl AuthContext {
    pub fn new_session(user: users::Model) -> Self {
        Self { user }
    }

    pub fn user_id(&self) -> i32 {
        self.user.id
    }

    pub fn username(&self) -> &str {
        &self.user.username
    }
}

/// Problem returned for requests without a usable bearer token
pub fn invalid_token_problem() -> Problem {
    unauthorized()
        .detail("token missing or invalid")
        .value("error", INVALID_TOKEN)
        .build()
}

/// Extractor for handlers that need an authenticated user.
/// Rejects with a 401 problem when the request carries no valid session token.
pub struct RequireAuth(pub AuthContext);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(RequireAuth)
            .ok_or_else(invalid_token_problem)
    }
}
