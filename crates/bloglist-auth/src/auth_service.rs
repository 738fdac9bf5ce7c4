use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use bloglist_entities::{sessions, users};
use chrono::{Duration, Utc};
use rand::Rng;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, warn};

pub const SESSION_TTL_DAYS: i64 = 7;
const SESSION_TOKEN_LENGTH: usize = 64;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Database error: {reason}")]
    Database { reason: String },
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("invalid token")]
    InvalidToken,
    #[error("Password hashing error: {0}")]
    PasswordHash(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(error: sea_orm::DbErr) -> Self {
        AuthError::Database {
            reason: error.to_string(),
        }
    }
}

/// Hashes a password with Argon2 and a random salt, returning the PHC string
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

pub struct AuthService {
    db: Arc<DatabaseConnection>,
}

impl AuthService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Checks a username/password pair. Unknown users and wrong passwords
    /// both yield [`AuthError::InvalidCredentials`].
    /// Usernames are compared after trimming, as they are stored
    pub async fn login(&self, username: &str, password: &str) -> Result<users::Model, AuthError> {
        let username = username.trim();
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| {
                warn!("Login attempt for unknown username: {}", username);
                AuthError::InvalidCredentials
            })?;

        let parsed_hash = PasswordHash::new(&user.password_hash).map_err(|e| {
            error!("Failed to parse Argon2 hash for user {}: {}", user.id, e);
            AuthError::InvalidCredentials
        })?;

        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_err()
        {
            warn!("Invalid password attempt for user {}", user.id);
            return Err(AuthError::InvalidCredentials);
        }

        debug!("Successful login for user {}", user.id);
        Ok(user)
    }

    pub async fn create_session(&self, user_id: i32) -> Result<String, AuthError> {
        let session_token = generate_session_token();
        let expires_at = Utc::now() + Duration::days(SESSION_TTL_DAYS);

        let new_session = sessions::ActiveModel {
            user_id: Set(user_id),
            session_token: Set(session_token.clone()),
            expires_at: Set(expires_at),
            ..Default::default()
        };

        new_session.insert(self.db.as_ref()).await?;

        Ok(session_token)
    }

    /// Resolves a bearer token to its user. Missing and expired sessions are both invalid.
    pub async fn verify_session(&self, session_token: &str) -> Result<users::Model, AuthError> {
        let session = sessions::Entity::find()
            .filter(sessions::Column::SessionToken.eq(session_token))
            .one(self.db.as_ref())
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if session.is_expired(Utc::now()) {
            debug!("Session {} for user {} has expired", session.id, session.user_id);
            return Err(AuthError::InvalidToken);
        }

        users::Entity::find_by_id(session.user_id)
            .one(self.db.as_ref())
            .await?
            .ok_or(AuthError::InvalidToken)
    }

    /// Ends every session of the user
    pub async fn logout(&self, user_id: i32) -> Result<u64, AuthError> {
        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await?;

        debug!("Deleted {} sessions for user {}", result.rows_affected, user_id);
        Ok(result.rows_affected)
    }
}

fn generate_session_token() -> String {
    let mut rng = rand::thread_rng();
    (0..SESSION_TOKEN_LENGTH)
        .map(|_| rng.sample(rand::distributions::Alphanumeric) as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloglist_database::test_utils::TestDatabase;

    async fn setup_test_env() -> (TestDatabase, AuthService) {
        let db = TestDatabase::with_migrations().await.unwrap();
        let auth_service = AuthService::new(db.db.clone());
        (db, auth_service)
    }

    async fn create_test_user(
        db: &Arc<DatabaseConnection>,
        username: &str,
        password: &str,
    ) -> users::Model {
        let user = users::ActiveModel {
            username: Set(username.to_string()),
            name: Set(format!("Test User {}", username)),
            password_hash: Set(hash_password(password).unwrap()),
            ..Default::default()
        };
        user.insert(db.as_ref()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_session() {
        let (db, auth_service) = setup_test_env().await;
        let user = create_test_user(&db.db, "root", "sekret").await;

        let session_token = auth_service.create_session(user.id).await.unwrap();
        assert_eq!(session_token.len(), 64);
        assert!(session_token.chars().all(|c| c.is_ascii_alphanumeric()));

        let session = sessions::Entity::find()
            .filter(sessions::Column::SessionToken.eq(&session_token))
            .one(db.db.as_ref())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(session.user_id, user.id);
        assert!(session.expires_at > Utc::now() + Duration::days(6));
    }

    #[tokio::test]
    async fn test_verify_session_valid() {
        let (db, auth_service) = setup_test_env().await;
        let user = create_test_user(&db.db, "root", "sekret").await;
        let token = auth_service.create_session(user.id).await.unwrap();

        let verified = auth_service.verify_session(&token).await.unwrap();
        assert_eq!(verified.id, user.id);
    }

    #[tokio::test]
    async fn test_verify_session_invalid() {
        let (_db, auth_service) = setup_test_env().await;

        let result = auth_service.verify_session("not-a-token").await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_verify_session_expired() {
        let (db, auth_service) = setup_test_env().await;
        let user = create_test_user(&db.db, "root", "sekret").await;

        sessions::ActiveModel {
            user_id: Set(user.id),
            session_token: Set("expired".to_string()),
            expires_at: Set(Utc::now() - Duration::minutes(1)),
            ..Default::default()
        }
        .insert(db.db.as_ref())
        .await
        .unwrap();

        let result = auth_service.verify_session("expired").await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_logout_removes_sessions() {
        let (db, auth_service) = setup_test_env().await;
        let user = create_test_user(&db.db, "root", "sekret").await;
        let first = auth_service.create_session(user.id).await.unwrap();
        auth_service.create_session(user.id).await.unwrap();

        let removed = auth_service.logout(user.id).await.unwrap();
        assert_eq!(removed, 2);
        assert!(auth_service.verify_session(&first).await.is_err());
    }

    #[tokio::test]
    async fn test_login_success() {
        let (db, auth_service) = setup_test_env().await;
        create_test_user(&db.db, "mluukkai", "salainen").await;

        let user = auth_service.login("mluukkai", "salainen").await.unwrap();
        assert_eq!(user.username, "mluukkai");
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let (db, auth_service) = setup_test_env().await;
        create_test_user(&db.db, "mluukkai", "salainen").await;

        let result = auth_service.login("mluukkai", "wrong").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_nonexistent_user() {
        let (_db, auth_service) = setup_test_env().await;

        let result = auth_service.login("nobody", "salainen").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn test_hash_password_is_salted_argon2() {
        let first = hash_password("salainen").unwrap();
        let second = hash_password("salainen").unwrap();

        assert!(first.starts_with("$argon2"));
        assert_ne!(first, second);
    }
}
