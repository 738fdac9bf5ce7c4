use std::sync::Arc;

use bloglist_entities::{blogs, users};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryOrder, Set,
};
use tracing::{debug, info};

use crate::error::BlogError;
use crate::list_helper::BlogRecord;

/// Input for a new blog. Every field is optional so that a missing field
/// surfaces as a validation error instead of a deserialization failure.
#[derive(Debug, Clone, Default)]
pub struct CreateBlog {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

/// Partial update; `None` leaves the stored value unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateBlog {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct BlogWithCreator {
    pub blog: blogs::Model,
    pub user: Option<users::Model>,
}

pub struct BlogService {
    db: Arc<DatabaseConnection>,
}

fn required_text(field: &str, value: Option<String>) -> Result<String, BlogError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(BlogError::Validation(format!("`{}` is required", field))),
    }
}

fn non_blank(field: &str, value: String) -> Result<String, BlogError> {
    if value.trim().is_empty() {
        return Err(BlogError::Validation(format!("`{}` must not be blank", field)));
    }
    Ok(value)
}

fn checked_likes(likes: i64) -> Result<i64, BlogError> {
    if likes < 0 {
        return Err(BlogError::Validation(
            "`likes` must not be negative".to_string(),
        ));
    }
    Ok(likes)
}

impl BlogService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn list_blogs(&self) -> Result<Vec<BlogWithCreator>, BlogError> {
        let rows = blogs::Entity::find()
            .find_also_related(users::Entity)
            .order_by_asc(blogs::Column::Id)
            .all(self.db.as_ref())
            .await?;

        Ok(rows
            .into_iter()
            .map(|(blog, user)| BlogWithCreator { blog, user })
            .collect())
    }

    pub async fn get_blog(&self, id: i32) -> Result<BlogWithCreator, BlogError> {
        let (blog, user) = blogs::Entity::find_by_id(id)
            .find_also_related(users::Entity)
            .one(self.db.as_ref())
            .await?
            .ok_or(BlogError::NotFound(id))?;

        Ok(BlogWithCreator { blog, user })
    }

    pub async fn create_blog(
        &self,
        user_id: i32,
        input: CreateBlog,
    ) -> Result<BlogWithCreator, BlogError> {
        let title = required_text("title", input.title)?;
        let url = required_text("url", input.url)?;
        let likes = checked_likes(input.likes.unwrap_or(0))?;

        let blog = blogs::ActiveModel {
            title: Set(title),
            author: Set(input.author.unwrap_or_default()),
            url: Set(url),
            likes: Set(likes),
            user_id: Set(Some(user_id)),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;

        info!("User {} created blog {}", user_id, blog.id);
        self.get_blog(blog.id).await
    }

    pub async fn update_blog(
        &self,
        id: i32,
        input: UpdateBlog,
    ) -> Result<BlogWithCreator, BlogError> {
        let existing = blogs::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(BlogError::NotFound(id))?;

        let mut blog: blogs::ActiveModel = existing.into();
        if let Some(title) = input.title {
            blog.title = Set(non_blank("title", title)?);
        }
        if let Some(url) = input.url {
            blog.url = Set(non_blank("url", url)?);
        }
        if let Some(author) = input.author {
            blog.author = Set(author);
        }
        if let Some(likes) = input.likes {
            blog.likes = Set(checked_likes(likes)?);
        }

        let updated = blog.update(self.db.as_ref()).await?;
        debug!("Updated blog {}", updated.id);
        self.get_blog(updated.id).await
    }

    /// Only the user who created a blog may delete it
    pub async fn delete_blog(&self, user_id: i32, id: i32) -> Result<(), BlogError> {
        let blog = blogs::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(BlogError::NotFound(id))?;

        if blog.user_id != Some(user_id) {
            return Err(BlogError::Forbidden(id));
        }

        blog.delete(self.db.as_ref()).await?;
        info!("User {} deleted blog {}", user_id, id);
        Ok(())
    }

    /// Every stored blog as input for [`crate::list_helper`]
    pub async fn records(&self) -> Result<Vec<BlogRecord>, BlogError> {
        let blogs = blogs::Entity::find()
            .order_by_asc(blogs::Column::Id)
            .all(self.db.as_ref())
            .await?;

        Ok(blogs.iter().map(BlogRecord::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloglist_database::test_utils::TestDatabase;

    async fn setup_test_env() -> (TestDatabase, BlogService) {
        let db = TestDatabase::with_migrations().await.unwrap();
        let service = BlogService::new(db.connection());
        (db, service)
    }

    async fn create_user(db: &TestDatabase, username: &str) -> users::Model {
        users::ActiveModel {
            username: Set(username.to_string()),
            name: Set(format!("{} name", username)),
            password_hash: Set("not-a-real-hash".to_string()),
            ..Default::default()
        }
        .insert(db.db.as_ref())
        .await
        .unwrap()
    }

    fn new_blog(title: &str, likes: Option<i64>) -> CreateBlog {
        CreateBlog {
            title: Some(title.to_string()),
            author: Some("Edsger W. Dijkstra".to_string()),
            url: Some(format!("https://example.com/{}", title)),
            likes,
        }
    }

    #[tokio::test]
    async fn test_create_blog_defaults_likes_to_zero() {
        let (db, service) = setup_test_env().await;
        let user = create_user(&db, "root").await;

        let created = service
            .create_blog(user.id, new_blog("no-likes", None))
            .await
            .unwrap();

        assert_eq!(created.blog.likes, 0);
        assert_eq!(created.blog.user_id, Some(user.id));
        assert_eq!(created.user.map(|u| u.username), Some("root".to_string()));
    }

    #[tokio::test]
    async fn test_create_blog_requires_title_and_url() {
        let (db, service) = setup_test_env().await;
        let user = create_user(&db, "root").await;

        let missing_title = CreateBlog {
            title: None,
            ..new_blog("x", None)
        };
        assert!(matches!(
            service.create_blog(user.id, missing_title).await,
            Err(BlogError::Validation(_))
        ));

        let blank_url = CreateBlog {
            url: Some("   ".to_string()),
            ..new_blog("x", None)
        };
        assert!(matches!(
            service.create_blog(user.id, blank_url).await,
            Err(BlogError::Validation(_))
        ));

        assert!(service.list_blogs().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_blog_rejects_negative_likes() {
        let (db, service) = setup_test_env().await;
        let user = create_user(&db, "root").await;

        let result = service.create_blog(user.id, new_blog("neg", Some(-1))).await;
        assert!(matches!(result, Err(BlogError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_blogs_in_id_order_with_creator() {
        let (db, service) = setup_test_env().await;
        let user = create_user(&db, "root").await;

        service.create_blog(user.id, new_blog("first", Some(1))).await.unwrap();
        service.create_blog(user.id, new_blog("second", Some(2))).await.unwrap();

        let blogs = service.list_blogs().await.unwrap();
        let titles: Vec<&str> = blogs.iter().map(|b| b.blog.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second"]);
        assert!(blogs.iter().all(|b| b.user.as_ref().map(|u| u.id) == Some(user.id)));
    }

    #[tokio::test]
    async fn test_update_blog_applies_partial_changes() {
        let (db, service) = setup_test_env().await;
        let user = create_user(&db, "root").await;
        let created = service
            .create_blog(user.id, new_blog("update-me", Some(3)))
            .await
            .unwrap();

        let updated = service
            .update_blog(
                created.blog.id,
                UpdateBlog {
                    likes: Some(4),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.blog.likes, 4);
        assert_eq!(updated.blog.title, "update-me");

        let blank = service
            .update_blog(
                created.blog.id,
                UpdateBlog {
                    title: Some(String::new()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(blank, Err(BlogError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_missing_blog_is_not_found() {
        let (_db, service) = setup_test_env().await;
        let result = service.update_blog(999, UpdateBlog::default()).await;
        assert!(matches!(result, Err(BlogError::NotFound(999))));
    }

    #[tokio::test]
    async fn test_delete_blog_only_by_creator() {
        let (db, service) = setup_test_env().await;
        let owner = create_user(&db, "owner").await;
        let other = create_user(&db, "other").await;
        let created = service
            .create_blog(owner.id, new_blog("mine", None))
            .await
            .unwrap();

        let result = service.delete_blog(other.id, created.blog.id).await;
        assert!(matches!(result, Err(BlogError::Forbidden(_))));

        service.delete_blog(owner.id, created.blog.id).await.unwrap();
        assert!(matches!(
            service.get_blog(created.blog.id).await,
            Err(BlogError::NotFound(_))
        ));
        assert!(matches!(
            service.delete_blog(owner.id, created.blog.id).await,
            Err(BlogError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_records_feed_the_aggregator() {
        let (db, service) = setup_test_env().await;
        let user = create_user(&db, "root").await;
        service.create_blog(user.id, new_blog("a", Some(5))).await.unwrap();
        service.create_blog(user.id, new_blog("b", Some(9))).await.unwrap();

        let records = service.records().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(crate::list_helper::total_likes(&records), 14);
    }
}
