mod auth_service;
pub mod context;
pub mod handlers;
mod middleware;
mod plugin;
pub mod state;
pub mod types;
mod user_service;

pub use context::*;
pub use middleware::{extract_bearer_token, AuthMiddleware};
pub use state::*;

pub use plugin::AuthPlugin;

pub use auth_service::{hash_password, AuthError, AuthService, SESSION_TTL_DAYS};
pub use user_service::{UserService, UserServiceError, UserWithBlogs, MIN_CREDENTIAL_LENGTH};
