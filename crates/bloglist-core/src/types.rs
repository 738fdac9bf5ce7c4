//! Shared datetime aliases

use chrono::{DateTime, Utc};

/// Database DateTime type used across all Bloglist crates
///
/// Every `created_at`, `updated_at` and `expires_at` column maps to this type.
pub type DBDateTime = DateTime<Utc>;

/// UTC DateTime used in API responses
///
/// Serializes as RFC 3339. When exposed through utoipa, annotate the field with
/// `#[schema(value_type = String, format = DateTime)]`.
pub type UtcDateTime = DateTime<Utc>;
