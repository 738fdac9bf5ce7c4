//! Summary statistics over a list of blogs.
//!
//! Every function takes a borrowed slice and returns a freshly built value;
//! none of them allocate shared state, so they are safe to call from any
//! number of tasks at once. An empty slice is valid input: the maximum
//! selecting functions return `None` for it.
//!
//! Ties are broken by input order. [`favorite_blog`] keeps the first record
//! with the highest like count. [`most_blogs`] and [`most_likes`] keep the
//! author whose first blog appears earliest among the tied authors.

use std::collections::HashMap;

use bloglist_entities::blogs;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A blog as seen by the aggregation functions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BlogRecord {
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: u64,
}

impl BlogRecord {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        url: impl Into<String>,
        likes: u64,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            url: url.into(),
            likes,
        }
    }
}

impl From<&blogs::Model> for BlogRecord {
    fn from(blog: &blogs::Model) -> Self {
        Self {
            title: blog.title.clone(),
            author: blog.author.clone(),
            url: blog.url.clone(),
            // Stored likes are never negative; clamp rather than wrap if one is
            likes: u64::try_from(blog.likes).unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FavoriteBlog {
    pub title: String,
    pub author: String,
    pub likes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthorBlogs {
    pub author: String,
    pub blogs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthorLikes {
    pub author: String,
    pub likes: u64,
}

/// All statistics for one list of blogs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BlogSummary {
    pub blog_count: u64,
    pub total_likes: u64,
    pub favorite_blog: Option<FavoriteBlog>,
    pub most_blogs: Option<AuthorBlogs>,
    pub most_likes: Option<AuthorLikes>,
}

/// Sanity check that always returns 1
pub fn constant_probe(_blogs: &[BlogRecord]) -> u32 {
    1
}

/// Sum of likes over all blogs, saturating at `u64::MAX`
pub fn total_likes(blogs: &[BlogRecord]) -> u64 {
    blogs
        .iter()
        .fold(0u64, |sum, blog| sum.saturating_add(blog.likes))
}

/// The blog with the most likes; the earliest one wins a tie
pub fn favorite_blog(blogs: &[BlogRecord]) -> Option<FavoriteBlog> {
    let mut iter = blogs.iter();
    let first = iter.next()?;

    let favorite = iter.fold(first, |best, current| {
        if current.likes > best.likes {
            current
        } else {
            best
        }
    });

    Some(FavoriteBlog {
        title: favorite.title.clone(),
        author: favorite.author.clone(),
        likes: favorite.likes,
    })
}

/// The author with the most blogs
pub fn most_blogs(blogs: &[BlogRecord]) -> Option<AuthorBlogs> {
    let (author, count) = max_by_author(blogs, |_| 1)?;
    Some(AuthorBlogs {
        author: author.to_string(),
        blogs: count,
    })
}

/// The author whose blogs have the most likes in total
pub fn most_likes(blogs: &[BlogRecord]) -> Option<AuthorLikes> {
    let (author, likes) = max_by_author(blogs, |blog| blog.likes)?;
    Some(AuthorLikes {
        author: author.to_string(),
        likes,
    })
}

pub fn summarize(blogs: &[BlogRecord]) -> BlogSummary {
    BlogSummary {
        blog_count: blogs.len() as u64,
        total_likes: total_likes(blogs),
        favorite_blog: favorite_blog(blogs),
        most_blogs: most_blogs(blogs),
        most_likes: most_likes(blogs),
    }
}

/// Groups by exact author string, sums `weight` per group and returns the
/// largest group. Groups are kept in first-appearance order and only a
/// strictly greater total replaces the current maximum.
fn max_by_author<F>(blogs: &[BlogRecord], weight: F) -> Option<(&str, u64)>
where
    F: Fn(&BlogRecord) -> u64,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, u64)> = Vec::new();

    for blog in blogs {
        let author = blog.author.as_str();
        match index.get(author) {
            Some(&i) => groups[i].1 = groups[i].1.saturating_add(weight(blog)),
            None => {
                index.insert(author, groups.len());
                groups.push((author, weight(blog)));
            }
        }
    }

    let mut iter = groups.into_iter();
    let first = iter.next()?;
    Some(iter.fold(first, |best, current| {
        if current.1 > best.1 {
            current
        } else {
            best
        }
    }))
}
