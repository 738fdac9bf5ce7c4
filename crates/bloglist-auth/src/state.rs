use crate::{auth_service::AuthService, user_service::UserService};
use std::sync::Arc;

/// Application state containing the authentication services for Axum
#[derive(Clone)]
pub struct AuthState {
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
}

impl AuthState {
    pub fn new(auth_service: Arc<AuthService>, user_service: Arc<UserService>) -> Self {
        Self {
            auth_service,
            user_service,
        }
    }
}
