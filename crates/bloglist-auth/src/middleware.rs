//! Bearer-token authentication middleware

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::extract::Request;
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use bloglist_core::error_builder::internal_server_error;
use bloglist_core::plugin::{BloglistMiddleware, MiddlewarePriority};
use bloglist_core::RequestMetadata;
use tracing::{debug, error};

use crate::auth_service::{AuthError, AuthService};
use crate::context::AuthContext;

/// Returns the token of an `Authorization: Bearer <token>` header.
/// The scheme is matched case-insensitively.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

/// Resolves the caller's session and stores [`AuthContext`] and
/// [`RequestMetadata`] in the request extensions. Missing or unknown tokens
/// pass through unauthenticated and handlers decide through
/// [`crate::RequireAuth`]. A session lookup that fails outright ends the
/// request with a 500 problem.
pub struct AuthMiddleware {
    auth_service: Arc<AuthService>,
}

impl AuthMiddleware {
    pub fn new(auth_service: Arc<AuthService>) -> Self {
        Self { auth_service }
    }

    async fn authenticate(&self, mut req: Request, next: Next) -> Response {
        let metadata = RequestMetadata::from_headers(req.headers());

        let auth_context = match extract_bearer_token(req.headers()) {
            Some(token) => match self.auth_service.verify_session(token).await {
                Ok(user) => Some(AuthContext::new_session(user)),
                Err(AuthError::InvalidToken) => {
                    debug!("Rejected bearer token from {}", metadata.ip_address);
                    None
                }
                Err(e) => {
                    error!("Failed to verify session: {}", e);
                    return internal_server_error().build().into_response();
                }
            },
            None => None,
        };

        req.extensions_mut().insert(metadata);
        if let Some(auth_context) = auth_context {
            req.extensions_mut().insert(auth_context.user.clone());
            req.extensions_mut().insert(auth_context);
        }

        next.run(req).await
    }
}

impl BloglistMiddleware for AuthMiddleware {
    fn name(&self) -> &'static str {
        "auth_middleware"
    }

    fn plugin_name(&self) -> &'static str {
        "auth"
    }

    fn priority(&self) -> MiddlewarePriority {
        MiddlewarePriority::Security
    }

    fn execute<'a>(
        &'a self,
        req: Request,
        next: Next,
    ) -> Pin<Box<dyn Future<Output = Result<Response, StatusCode>> + Send + 'a>> {
        Box::pin(async move { Ok(self.authenticate(req, next).await) })
    }
}
