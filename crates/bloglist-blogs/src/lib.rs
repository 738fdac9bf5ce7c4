//! bloglist-blogs: blog storage, blog endpoints and list statistics
//!
//! [`list_helper`] holds the pure aggregation functions. The rest of the crate
//! persists blogs through sea-orm and exposes them over HTTP as a plugin.

pub mod error;
pub mod handlers;
pub mod list_helper;
pub mod plugin;
pub mod services;

pub use error::BlogError;
pub use list_helper::BlogRecord;
pub use plugin::BlogsPlugin;
pub use services::BlogService;
