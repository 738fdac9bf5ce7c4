use bloglist_entities::blogs;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::user_service::UserWithBlogs;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Bearer token for the `Authorization` header
    pub token: String,
    pub username: String,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub username: String,
    #[serde(default)]
    pub name: String,
    pub password: String,
}

/// Blog as listed under its creator
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserBlog {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: i64,
}

impl From<blogs::Model> for UserBlog {
    fn from(blog: blogs::Model) -> Self {
        Self {
            id: blog.id,
            title: blog.title,
            author: blog.author,
            url: blog.url,
            likes: blog.likes,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub name: String,
    pub blogs: Vec<UserBlog>,
}

impl From<UserWithBlogs> for UserResponse {
    fn from(value: UserWithBlogs) -> Self {
        Self {
            id: value.user.id,
            username: value.user.username,
            name: value.user.name,
            blogs: value.blogs.into_iter().map(UserBlog::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LogoutResponse {
    pub status: String,
    pub sessions_ended: u64,
}
