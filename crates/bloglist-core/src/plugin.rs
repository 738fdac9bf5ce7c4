//! Plugin system for modular service registration and route configuration
//!
//! Plugins register services into a shared, type-keyed registry, contribute
//! routers and middleware, and describe their endpoints with OpenAPI. The
//! [`PluginManager`] initializes them in registration order and assembles the
//! final application.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use axum::extract::Request;
use axum::response::Response;
use axum::{middleware::Next, Router};
use thiserror::Error;
use tracing::debug;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::openapi::{ComponentsBuilder, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::openapi::merge_openapi_schemas;

// Re-export for plugin implementations
pub use axum;
pub use utoipa;

/// Path under which every plugin router is nested
pub const API_PREFIX: &str = "/api";
/// Path of the Swagger UI
pub const SWAGGER_UI_PATH: &str = "/swagger-ui";
/// Path of the generated OpenAPI document
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Middleware execution priority. Lower values run first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MiddlewarePriority {
    /// Authentication and request metadata
    Security,
    Business,
}

impl MiddlewarePriority {
    pub fn value(&self) -> u16 {
        match self {
            MiddlewarePriority::Security => 0,
            MiddlewarePriority::Business => 400,
        }
    }
}

pub type MiddlewareFuture =
    Pin<Box<dyn Future<Output = Result<Response, axum::http::StatusCode>> + Send>>;

/// Type alias for middleware handler function
pub type MiddlewareHandler = Arc<dyn Fn(Request, Next) -> MiddlewareFuture + Send + Sync>;

/// Plugin middleware definition
pub struct PluginMiddleware {
    pub name: String,
    pub plugin_name: String,
    pub priority: MiddlewarePriority,
    pub handler: MiddlewareHandler,
}

impl std::fmt::Debug for PluginMiddleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginMiddleware")
            .field("name", &self.name)
            .field("plugin_name", &self.plugin_name)
            .field("priority", &self.priority)
            .field("handler", &"<function>")
            .finish()
    }
}

/// Trait for middleware objects that hold their own services
pub trait BloglistMiddleware: Send + Sync {
    fn name(&self) -> &'static str;

    fn plugin_name(&self) -> &'static str;

    fn priority(&self) -> MiddlewarePriority {
        MiddlewarePriority::Business
    }

    fn execute<'a>(
        &'a self,
        req: Request,
        next: Next,
    ) -> Pin<Box<dyn Future<Output = Result<Response, axum::http::StatusCode>> + Send + 'a>>;
}

impl From<Arc<dyn BloglistMiddleware>> for PluginMiddleware {
    fn from(middleware: Arc<dyn BloglistMiddleware>) -> Self {
        let name = middleware.name().to_string();
        let plugin_name = middleware.plugin_name().to_string();
        let priority = middleware.priority();

        let handler: MiddlewareHandler = Arc::new(move |req: Request, next: Next| -> MiddlewareFuture {
            let middleware = middleware.clone();
            Box::pin(async move { middleware.execute(req, next).await })
        });

        PluginMiddleware {
            name,
            plugin_name,
            priority,
            handler,
        }
    }
}

/// Collection of middleware from a plugin
#[derive(Default)]
pub struct PluginMiddlewareCollection {
    pub middleware: Vec<PluginMiddleware>,
}

impl PluginMiddlewareCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_bloglist_middleware(&mut self, middleware: Arc<dyn BloglistMiddleware>) {
        self.middleware.push(middleware.into());
    }
}

/// Errors that can occur during plugin operations
#[derive(Error, Debug)]
pub enum PluginError {
    #[error("Plugin registration failed for '{plugin_name}': {error}")]
    PluginRegistrationFailed { plugin_name: String, error: String },

    #[error("Service '{service_type}' is required but not registered")]
    ServiceNotFound { service_type: String },
}

pub type PluginFuture<'a> = Pin<Box<dyn Future<Output = Result<(), PluginError>> + Send + 'a>>;

/// Core plugin trait that defines the plugin interface
pub trait BloglistPlugin: Send + Sync {
    /// Unique identifier for this plugin
    fn name(&self) -> &'static str;

    /// Register services that this plugin provides
    ///
    /// Use `context.require_service::<T>()` to get dependencies and
    /// `context.register_service(service)` to provide services for later plugins.
    fn register_services<'a>(&'a self, context: &'a ServiceRegistrationContext)
        -> PluginFuture<'a>;

    /// HTTP routes of this plugin, nested under `/api`
    fn configure_routes(&self, _context: &PluginContext) -> Result<Option<PluginRoutes>, PluginError> {
        Ok(None)
    }

    fn openapi_schema(&self) -> Option<OpenApi> {
        None
    }

    /// Middleware applied to the whole `/api` router
    fn configure_middleware(
        &self,
        _context: &PluginContext,
    ) -> Result<Option<PluginMiddlewareCollection>, PluginError> {
        Ok(None)
    }
}

/// Route configuration returned by plugins
pub struct PluginRoutes {
    pub router: Router,
}

impl PluginRoutes {
    pub fn new(router: Router) -> Self {
        Self { router }
    }
}

/// Type-safe service registry for dependency injection
#[derive(Default)]
pub struct ServiceRegistry {
    services: Mutex<HashMap<TypeId, Box<dyn Any + Send + Sync>>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: Send + Sync + 'static + ?Sized>(&self, service: Arc<T>) {
        debug!("Registering service: {}", std::any::type_name::<T>());
        self.services
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(TypeId::of::<T>(), Box::new(service));
    }

    pub fn get<T: Send + Sync + 'static + ?Sized>(&self) -> Option<Arc<T>> {
        self.services
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&TypeId::of::<T>())
            .and_then(|any| any.downcast_ref::<Arc<T>>())
            .cloned()
    }

    /// Fails with [`PluginError::ServiceNotFound`] when nothing of type `T` was registered
    pub fn require<T: Send + Sync + 'static + ?Sized>(&self) -> Result<Arc<T>, PluginError> {
        self.get::<T>().ok_or_else(|| PluginError::ServiceNotFound {
            service_type: std::any::type_name::<T>().to_string(),
        })
    }
}

/// Read-only context handed to plugins while the application is built
pub struct PluginContext {
    service_registry: Arc<ServiceRegistry>,
}

impl PluginContext {
    pub fn new(service_registry: Arc<ServiceRegistry>) -> Self {
        Self { service_registry }
    }

    pub fn require_service<T: Send + Sync + 'static + ?Sized>(&self) -> Result<Arc<T>, PluginError> {
        self.service_registry.require::<T>()
    }
}

/// Context used during plugin initialization; allows registration
#[derive(Default)]
pub struct ServiceRegistrationContext {
    service_registry: Arc<ServiceRegistry>,
}

impl ServiceRegistrationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_service<T: Send + Sync + 'static + ?Sized>(&self, service: Arc<T>) {
        self.service_registry.register(service);
    }

    pub fn require_service<T: Send + Sync + 'static + ?Sized>(&self) -> Result<Arc<T>, PluginError> {
        self.service_registry.require::<T>()
    }

    pub fn create_plugin_context(&self) -> PluginContext {
        PluginContext::new(self.service_registry.clone())
    }
}

/// Registers plugins, initializes them and builds the application router
#[derive(Default)]
pub struct PluginManager {
    plugins: Vec<Box<dyn BloglistPlugin>>,
    context: ServiceRegistrationContext,
}

impl PluginManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin. Plugins providing services must come before their consumers.
    pub fn register_plugin(&mut self, plugin: Box<dyn BloglistPlugin>) {
        debug!("Registering plugin: {}", plugin.name());
        self.plugins.push(plugin);
    }

    pub async fn initialize_plugins(&mut self) -> Result<(), PluginError> {
        debug!("Initializing {} plugins", self.plugins.len());

        for plugin in &self.plugins {
            plugin.register_services(&self.context).await.map_err(|e| {
                PluginError::PluginRegistrationFailed {
                    plugin_name: plugin.name().to_string(),
                    error: e.to_string(),
                }
            })?;

            debug!("Successfully initialized plugin: {}", plugin.name());
        }

        Ok(())
    }

    /// Build the application: plugin routes under `/api` plus Swagger UI
    pub fn build_application(&self) -> Result<Router, PluginError> {
        debug!("Building application with {} plugins", self.plugins.len());

        let plugin_context = self.context.create_plugin_context();
        let mut api_router = Router::new();

        for plugin in &self.plugins {
            if let Some(plugin_routes) = plugin.configure_routes(&plugin_context)? {
                debug!("Adding routes for plugin: {}", plugin.name());
                api_router = api_router.merge(plugin_routes.router);
            }
        }

        let middleware = self.collect_middleware(&plugin_context)?;
        api_router = apply_middleware_to_router(api_router, middleware);

        let openapi = self.get_unified_openapi();
        let docs_router = SwaggerUi::new(SWAGGER_UI_PATH).url(OPENAPI_JSON_PATH, openapi);

        Ok(Router::new().nest(API_PREFIX, api_router).merge(docs_router))
    }

    /// The OpenAPI document combining every plugin's schema
    pub fn get_unified_openapi(&self) -> OpenApi {
        use utoipa::openapi::{InfoBuilder, OpenApiBuilder, ServerBuilder};

        let base = OpenApiBuilder::new()
            .info(
                InfoBuilder::new()
                    .title("Bloglist")
                    .description(Some("Blog listing API with user accounts and statistics"))
                    .version(env!("CARGO_PKG_VERSION"))
                    .build(),
            )
            .servers(Some(vec![ServerBuilder::new()
                .url(API_PREFIX)
                .description(Some("Base path for all API endpoints"))
                .build()]))
            .components(Some(
                ComponentsBuilder::new()
                    .security_scheme("bearer_auth", bearer_auth_scheme())
                    .build(),
            ))
            .build();

        let schemas = self
            .plugins
            .iter()
            .filter_map(|plugin| plugin.openapi_schema())
            .collect();

        merge_openapi_schemas(base, schemas)
    }

    /// Access to the registration context, used to register core services
    /// such as the database connection before plugins are initialized
    pub fn service_context(&self) -> &ServiceRegistrationContext {
        &self.context
    }

    fn collect_middleware(
        &self,
        plugin_context: &PluginContext,
    ) -> Result<Vec<PluginMiddleware>, PluginError> {
        let mut all_middleware = Vec::new();

        for plugin in &self.plugins {
            if let Some(collection) = plugin.configure_middleware(plugin_context)? {
                debug!("Collecting middleware from plugin: {}", plugin.name());
                all_middleware.extend(collection.middleware);
            }
        }

        all_middleware.sort_by_key(|mw| mw.priority.value());
        Ok(all_middleware)
    }
}

fn bearer_auth_scheme() -> SecurityScheme {
    let mut http_scheme = Http::new(HttpAuthScheme::Bearer);
    http_scheme.description =
        Some("Session token returned by `POST /api/login`. Use format: `Bearer <token>`.".to_string());
    SecurityScheme::Http(http_scheme)
}

/// Layers are applied innermost first, so iterate from the lowest priority
/// (highest value) to leave the highest priority outermost.
fn apply_middleware_to_router(mut router: Router, middleware: Vec<PluginMiddleware>) -> Router {
    for mw in middleware.into_iter().rev() {
        debug!(
            "Applying middleware: {} from plugin: {}",
            mw.name, mw.plugin_name
        );

        let handler = mw.handler;
        router = router.layer(axum::middleware::from_fn(move |req: Request, next: Next| {
            let handler = handler.clone();
            async move { handler(req, next).await }
        }));
    }

    router
}
