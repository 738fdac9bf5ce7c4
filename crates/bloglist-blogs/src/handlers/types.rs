use std::sync::Arc;

use bloglist_auth::UserSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::services::{BlogService, BlogWithCreator, CreateBlog, UpdateBlog};

pub struct BlogsAppState {
    pub blog_service: Arc<BlogService>,
}

impl BlogsAppState {
    pub fn new(blog_service: Arc<BlogService>) -> Self {
        Self { blog_service }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BlogResponse {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: i64,
    /// Creator of the blog, if any
    pub user: Option<UserSchema>,
}

impl From<BlogWithCreator> for BlogResponse {
    fn from(value: BlogWithCreator) -> Self {
        Self {
            id: value.blog.id,
            title: value.blog.title,
            author: value.blog.author,
            url: value.blog.url,
            likes: value.blog.likes,
            user: value.user.map(|user| UserSchema {
                id: user.id,
                username: user.username,
                name: user.name,
            }),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateBlogRequest {
    #[schema(example = "Go To Statement Considered Harmful")]
    pub title: Option<String>,
    #[schema(example = "Edsger W. Dijkstra")]
    pub author: Option<String>,
    #[schema(example = "https://homepages.cwi.nl/~storm/teaching/reader/Dijkstra68.pdf")]
    pub url: Option<String>,
    /// Defaults to 0
    pub likes: Option<i64>,
}

impl From<CreateBlogRequest> for CreateBlog {
    fn from(request: CreateBlogRequest) -> Self {
        Self {
            title: request.title,
            author: request.author,
            url: request.url,
            likes: request.likes,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

impl From<UpdateBlogRequest> for UpdateBlog {
    fn from(request: UpdateBlogRequest) -> Self {
        Self {
            title: request.title,
            author: request.author,
            url: request.url,
            likes: request.likes,
        }
    }
}
