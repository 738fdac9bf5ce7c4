//! HTTP handlers for blog operations

mod handler;
mod types;

pub use handler::*;
pub use types::*;
