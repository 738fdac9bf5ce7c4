//! Blogs plugin: blog storage, blog routes and statistics

use std::sync::Arc;

use bloglist_core::plugin::{
    BloglistPlugin, PluginContext, PluginError, PluginFuture, PluginRoutes,
    ServiceRegistrationContext,
};
use utoipa::openapi::OpenApi;
use utoipa::OpenApi as OpenApiTrait;

use crate::handlers::{configure_routes, BlogsApiDoc, BlogsAppState};
use crate::services::BlogService;

/// Requires a `sea_orm::DatabaseConnection` in the service registry.
/// Authentication comes from the auth plugin's middleware, so register
/// [`bloglist_auth::AuthPlugin`] alongside this one.
pub struct BlogsPlugin;

impl BlogsPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BlogsPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl BloglistPlugin for BlogsPlugin {
    fn name(&self) -> &'static str {
        "blogs"
    }

    fn register_services<'a>(&'a self, context: &'a ServiceRegistrationContext) -> PluginFuture<'a> {
        Box::pin(async move {
            let db = context.require_service::<sea_orm::DatabaseConnection>()?;

            let blog_service = Arc::new(BlogService::new(db));
            context.register_service(blog_service.clone());
            context.register_service(Arc::new(BlogsAppState::new(blog_service)));

            tracing::debug!("Blogs plugin services registered successfully");
            Ok(())
        })
    }

    fn configure_routes(&self, context: &PluginContext) -> Result<Option<PluginRoutes>, PluginError> {
        let state = context.require_service::<BlogsAppState>()?;
        Ok(Some(PluginRoutes::new(configure_routes().with_state(state))))
    }

    fn openapi_schema(&self) -> Option<OpenApi> {
        Some(<BlogsApiDoc as OpenApiTrait>::openapi())
    }
}
