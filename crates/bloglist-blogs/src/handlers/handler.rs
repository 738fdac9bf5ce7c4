use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use bloglist_auth::{RequireAuth, UserSchema};
use bloglist_core::problemdetails::Problem;
use tracing::info;
use utoipa::OpenApi;

use super::types::*;
use crate::list_helper::{
    summarize, AuthorBlogs, AuthorLikes, BlogRecord, BlogSummary, FavoriteBlog,
};

#[derive(OpenApi)]
#[openapi(
    paths(list_blogs, blog_stats, get_blog, create_blog, update_blog, delete_blog),
    components(
        schemas(
            BlogResponse,
            CreateBlogRequest,
            UpdateBlogRequest,
            UserSchema,
            BlogRecord,
            BlogSummary,
            FavoriteBlog,
            AuthorBlogs,
            AuthorLikes,
        )
    ),
    info(
        title = "Blogs API",
        description = "Blog listing and statistics.",
        version = "1.0.0"
    ),
    tags(
        (name = "Blogs", description = "Blog CRUD operations"),
        (name = "Stats", description = "Statistics over all stored blogs")
    )
)]
pub struct BlogsApiDoc;

pub fn configure_routes() -> Router<Arc<BlogsAppState>> {
    Router::new()
        .route("/blogs", get(list_blogs).post(create_blog))
        .route("/blogs/stats", get(blog_stats))
        .route(
            "/blogs/{id}",
            get(get_blog).put(update_blog).delete(delete_blog),
        )
}

#[utoipa::path(
    tag = "Blogs",
    get,
    path = "/blogs",
    responses(
        (status = 200, description = "All blogs with their creator", body = Vec<BlogResponse>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_blogs(
    State(state): State<Arc<BlogsAppState>>,
) -> Result<impl IntoResponse, Problem> {
    let blogs = state.blog_service.list_blogs().await?;
    let response: Vec<BlogResponse> = blogs.into_iter().map(BlogResponse::from).collect();
    Ok(Json(response))
}

#[utoipa::path(
    tag = "Stats",
    get,
    path = "/blogs/stats",
    responses(
        (status = 200, description = "Aggregated statistics", body = BlogSummary),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn blog_stats(
    State(state): State<Arc<BlogsAppState>>,
) -> Result<impl IntoResponse, Problem> {
    let records = state.blog_service.records().await?;
    Ok(Json(summarize(&records)))
}

#[utoipa::path(
    tag = "Blogs",
    get,
    path = "/blogs/{id}",
    params(
        ("id" = i32, Path, description = "Blog ID")
    ),
    responses(
        (status = 200, description = "The blog", body = BlogResponse),
        (status = 400, description = "Invalid blog id"),
        (status = 404, description = "Blog not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_blog(
    State(state): State<Arc<BlogsAppState>>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<impl IntoResponse, Problem> {
    let Path(id) = path?;
    let blog = state.blog_service.get_blog(id).await?;
    Ok(Json(BlogResponse::from(blog)))
}

#[utoipa::path(
    tag = "Blogs",
    post,
    path = "/blogs",
    request_body = CreateBlogRequest,
    responses(
        (status = 201, description = "Blog created", body = BlogResponse),
        (status = 400, description = "Missing title or url, or negative likes"),
        (status = 401, description = "Token missing or invalid"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_blog(
    RequireAuth(auth): RequireAuth,
    State(state): State<Arc<BlogsAppState>>,
    payload: Result<Json<CreateBlogRequest>, JsonRejection>,
) -> Result<impl IntoResponse, Problem> {
    let Json(request) = payload?;

    let blog = state
        .blog_service
        .create_blog(auth.user_id(), request.into())
        .await?;
    info!("{} added blog '{}'", auth.username(), blog.blog.title);

    Ok((StatusCode::CREATED, Json(BlogResponse::from(blog))))
}

#[utoipa::path(
    tag = "Blogs",
    put,
    path = "/blogs/{id}",
    params(
        ("id" = i32, Path, description = "Blog ID")
    ),
    request_body = UpdateBlogRequest,
    responses(
        (status = 200, description = "Blog updated", body = BlogResponse),
        (status = 400, description = "Blank title or url, or negative likes"),
        (status = 404, description = "Blog not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_blog(
    State(state): State<Arc<BlogsAppState>>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateBlogRequest>, JsonRejection>,
) -> Result<impl IntoResponse, Problem> {
    let Path(id) = path?;
    let Json(request) = payload?;
    let blog = state.blog_service.update_blog(id, request.into()).await?;
    Ok(Json(BlogResponse::from(blog)))
}

#[utoipa::path(
    tag = "Blogs",
    delete,
    path = "/blogs/{id}",
    params(
        ("id" = i32, Path, description = "Blog ID")
    ),
    responses(
        (status = 204, description = "Blog deleted"),
        (status = 401, description = "Token missing or invalid"),
        (status = 403, description = "Caller did not create the blog"),
        (status = 404, description = "Blog not found"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_blog(
    RequireAuth(auth): RequireAuth,
    State(state): State<Arc<BlogsAppState>>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<impl IntoResponse, Problem> {
    let Path(id) = path?;
    state.blog_service.delete_blog(auth.user_id(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
