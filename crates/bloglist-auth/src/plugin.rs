//! Auth plugin: session authentication, the bearer-token middleware and user routes

use std::sync::Arc;

use bloglist_core::plugin::{
    BloglistPlugin, PluginContext, PluginError, PluginFuture, PluginMiddlewareCollection,
    PluginRoutes, ServiceRegistrationContext,
};
use utoipa::openapi::OpenApi;
use utoipa::OpenApi as OpenApiTrait;

use crate::{
    auth_service::AuthService, handlers, middleware::AuthMiddleware, state::AuthState,
    user_service::UserService,
};

/// Requires a `sea_orm::DatabaseConnection` in the service registry.
/// Registers [`AuthService`], [`UserService`] and [`AuthState`].
pub struct AuthPlugin;

impl AuthPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AuthPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl BloglistPlugin for AuthPlugin {
    fn name(&self) -> &'static str {
        "auth"
    }

    fn register_services<'a>(&'a self, context: &'a ServiceRegistrationContext) -> PluginFuture<'a> {
        Box::pin(async move {
            let db = context.require_service::<sea_orm::DatabaseConnection>()?;

            let auth_service = Arc::new(AuthService::new(db.clone()));
            context.register_service(auth_service.clone());

            let user_service = Arc::new(UserService::new(db));
            context.register_service(user_service.clone());

            context.register_service(Arc::new(AuthState::new(auth_service, user_service)));

            tracing::debug!("Auth plugin services registered successfully");
            Ok(())
        })
    }

    fn configure_routes(&self, context: &PluginContext) -> Result<Option<PluginRoutes>, PluginError> {
        let auth_state = context.require_service::<AuthState>()?;
        let router = handlers::configure_routes().with_state(auth_state);
        Ok(Some(PluginRoutes::new(router)))
    }

    fn openapi_schema(&self) -> Option<OpenApi> {
        Some(<handlers::AuthApiDoc as OpenApiTrait>::openapi())
    }

    fn configure_middleware(
        &self,
        context: &PluginContext,
    ) -> Result<Option<PluginMiddlewareCollection>, PluginError> {
        let auth_service = context.require_service::<AuthService>()?;

        let mut middleware_collection = PluginMiddlewareCollection::new();
        middleware_collection.add_bloglist_middleware(Arc::new(AuthMiddleware::new(auth_service)));

        Ok(Some(middleware_collection))
    }
}
