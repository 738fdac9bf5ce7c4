use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use bloglist_core::error_builder::{bad_request, conflict, internal_server_error, not_found};
use bloglist_core::problemdetails::Problem;
use bloglist_core::RequestMetadata;
use tracing::{error, info, warn};
use utoipa::OpenApi;

use crate::auth_service::AuthError;
use crate::context::{invalid_token_problem, RequireAuth};
use crate::state::AuthState;
use crate::types::{
    CreateUserRequest, LoginRequest, LoginResponse, LogoutResponse, UserBlog, UserResponse,
};
use crate::user_service::{UserServiceError, UserWithBlogs};

impl From<AuthError> for Problem {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => bloglist_core::error_builder::unauthorized()
                .title("Invalid Credentials")
                .detail("invalid username or password")
                .value("error", "invalid username or password")
                .build(),
            AuthError::InvalidToken => invalid_token_problem(),
            AuthError::Database { reason } => {
                error!("Database error: {}", reason);
                internal_server_error().build()
            }
            AuthError::PasswordHash(msg) => {
                error!("Password hashing error: {}", msg);
                internal_server_error().build()
            }
        }
    }
}

impl From<UserServiceError> for Problem {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::NotFound(msg) => not_found()
                .title("User Not Found")
                .detail(msg)
                .build(),
            UserServiceError::Validation(msg) => bad_request()
                .title("Validation Error")
                .detail(msg.clone())
                .value("error", msg)
                .build(),
            UserServiceError::UsernameTaken(username) => conflict()
                .title("Username Taken")
                .detail(format!("username '{}' is already taken", username))
                .value("error", "expected `username` to be unique")
                .build(),
            UserServiceError::Database { reason } => {
                error!("Database error: {}", reason);
                internal_server_error().build()
            }
            UserServiceError::Internal(msg) => {
                error!("Internal error: {}", msg);
                internal_server_error().build()
            }
        }
    }
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Malformed request body"),
        (status = 401, description = "Invalid username or password"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<Arc<AuthState>>,
    Extension(metadata): Extension<RequestMetadata>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, Problem> {
    let Json(request) = payload?;

    let user = match state
        .auth_service
        .login(&request.username, &request.password)
        .await
    {
        Ok(user) => user,
        Err(e) => {
            warn!(
                "Failed login for '{}' from {}",
                request.username, metadata.ip_address
            );
            return Err(e.into());
        }
    };

    let token = state.auth_service.create_session(user.id).await?;
    info!("User {} logged in from {}", user.id, metadata.ip_address);

    Ok(Json(LoginResponse {
        token,
        username: user.username,
        name: user.name,
    }))
}

#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 200, description = "Successfully logged out", body = LogoutResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Authentication"
)]
pub async fn logout(
    State(state): State<Arc<AuthState>>,
    RequireAuth(auth): RequireAuth,
) -> Result<impl IntoResponse, Problem> {
    let sessions_ended = state.auth_service.logout(auth.user_id()).await?;
    info!("User {} logged out", auth.user_id());

    Ok(Json(LogoutResponse {
        status: "success".to_string(),
        sessions_ended,
    }))
}

#[utoipa::path(
    tag = "Users",
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = UserResponse),
        (status = 400, description = "Username or password too short"),
        (status = 409, description = "Username already taken"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_user(
    State(state): State<Arc<AuthState>>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, Problem> {
    let Json(request) = payload?;
    info!("Creating new user with username: {}", request.username);

    let user = state
        .user_service
        .create_user(&request.username, &request.name, &request.password)
        .await?;

    let response = UserResponse::from(UserWithBlogs {
        user,
        blogs: Vec::new(),
    });
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    tag = "Users",
    get,
    path = "/users",
    responses(
        (status = 200, description = "All users with the blogs they created", body = Vec<UserResponse>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_users(
    State(state): State<Arc<AuthState>>,
) -> Result<impl IntoResponse, Problem> {
    let users = state.user_service.list_users().await?;
    let response: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(response))
}

#[utoipa::path(
    tag = "Users",
    get,
    path = "/users/{user_id}",
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "The user with their blogs", body = UserResponse),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_user(
    State(state): State<Arc<AuthState>>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<impl IntoResponse, Problem> {
    let Path(user_id) = path?;
    let user = state.user_service.get_user(user_id).await?;
    Ok(Json(UserResponse::from(user)))
}

#[derive(OpenApi)]
#[openapi(
    paths(login, logout, create_user, list_users, get_user),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            LogoutResponse,
            CreateUserRequest,
            UserResponse,
            UserBlog
        )
    ),
    info(
        title = "Authentication & Users API",
        description = "Login, logout and user registration.",
        version = "1.0.0"
    ),
    tags(
        (name = "Authentication", description = "Session token endpoints"),
        (name = "Users", description = "User management endpoints")
    )
)]
pub struct AuthApiDoc;

pub fn configure_routes() -> Router<Arc<AuthState>> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/users", get(list_users).post(create_user))
        .route("/users/{user_id}", get(get_user))
}
