use bloglist_entities::{blogs, users};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::auth_service::{hash_password, AuthError};

/// Minimum length of usernames and passwords
pub const MIN_CREDENTIAL_LENGTH: usize = 3;

#[derive(Error, Debug)]
pub enum UserServiceError {
    #[error("Database error: {reason}")]
    Database { reason: String },

    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("username must be unique: {0}")]
    UsernameTaken(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for UserServiceError {
    fn from(error: sea_orm::DbErr) -> Self {
        if let Some(SqlErr::UniqueConstraintViolation(detail)) = error.sql_err() {
            return UserServiceError::UsernameTaken(detail);
        }
        match error {
            sea_orm::DbErr::RecordNotFound(msg) => UserServiceError::NotFound(msg),
            _ => UserServiceError::Database {
                reason: error.to_string(),
            },
        }
    }
}

impl From<AuthError> for UserServiceError {
    fn from(error: AuthError) -> Self {
        UserServiceError::Internal(error.to_string())
    }
}

/// A user together with the blogs they created
#[derive(Debug, Clone)]
pub struct UserWithBlogs {
    pub user: users::Model,
    pub blogs: Vec<blogs::Model>,
}

pub struct UserService {
    db: Arc<DatabaseConnection>,
}

impl UserService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn create_user(
        &self,
        username: &str,
        name: &str,
        password: &str,
    ) -> Result<users::Model, UserServiceError> {
        let username = username.trim();
        if username.chars().count() < MIN_CREDENTIAL_LENGTH {
            return Err(UserServiceError::Validation(format!(
                "username must be at least {} characters long",
                MIN_CREDENTIAL_LENGTH
            )));
        }
        if password.chars().count() < MIN_CREDENTIAL_LENGTH {
            return Err(UserServiceError::Validation(format!(
                "password must be at least {} characters long",
                MIN_CREDENTIAL_LENGTH
            )));
        }

        let existing = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await?;
        if existing.is_some() {
            return Err(UserServiceError::UsernameTaken(username.to_string()));
        }

        let new_user = users::ActiveModel {
            username: Set(username.to_string()),
            name: Set(name.to_string()),
            password_hash: Set(hash_password(password)?),
            ..Default::default()
        };

        let user = new_user.insert(self.db.as_ref()).await?;
        info!("Created new user with id: {}", user.id);

        Ok(user)
    }

    pub async fn get_user(&self, user_id: i32) -> Result<UserWithBlogs, UserServiceError> {
        let user = users::Entity::find_by_id(user_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| UserServiceError::NotFound(format!("User {} not found", user_id)))?;

        let blogs = blogs::Entity::find()
            .filter(blogs::Column::UserId.eq(user.id))
            .order_by_asc(blogs::Column::Id)
            .all(self.db.as_ref())
            .await?;

        Ok(UserWithBlogs { user, blogs })
    }

    pub async fn list_users(&self) -> Result<Vec<UserWithBlogs>, UserServiceError> {
        let rows = users::Entity::find()
            .find_with_related(blogs::Entity)
            .order_by_asc(users::Column::Id)
            .order_by_asc(blogs::Column::Id)
            .all(self.db.as_ref())
            .await?;

        Ok(rows
            .into_iter()
            .map(|(user, blogs)| UserWithBlogs { user, blogs })
            .collect())
    }
}
