use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::get,
    Router,
};
use database::{CategoryRepository, ProductRepository};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    timeout::{RequestBodyTimeoutLayer, ResponseBodyTimeoutLayer, TimeoutLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;
pub mod response;
pub mod server;
pub mod services;

pub use crate::server::{serve, ConnectionLimits};
use crate::services::{CategoryService, ProductService};

/// Time allowed for a client to deliver the request body.
pub const READ_TIMEOUT: Duration = Duration::from_secs(10);
/// Time allowed to produce and stream the response.
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub products: ProductService,
    pub categories: CategoryService,
}

impl AppState {
    /// Wires the service layer on top of the given repositories.
    pub fn new(
        products: Arc<dyn ProductRepository>,
        categories: Arc<dyn CategoryRepository>,
    ) -> Self {
        Self {
            products: ProductService::new(products),
            categories: CategoryService::new(categories),
        }
    }
}

/// Builds the application router with every route and middleware layer.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/api/product",
            get(handlers::products::list)
                .post(handlers::products::create)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/product/:id",
            get(handlers::products::get)
                .put(handlers::products::update)
                .delete(handlers::products::delete)
                .fallback(handlers::products::item_fallback),
        )
        .route(
            "/api/category",
            get(handlers::categories::list)
                .post(handlers::categories::create)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/category/:id",
            get(handlers::categories::get)
                .put(handlers::categories::update)
                .delete(handlers::categories::delete)
                .fallback(handlers::categories::item_fallback),
        )
        .fallback(handlers::not_found)
        .with_state(Arc::new(state))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(WRITE_TIMEOUT))
        .layer(middleware::map_response(response::envelope_bare_errors))
        .layer(ResponseBodyTimeoutLayer::new(WRITE_TIMEOUT))
        .layer(RequestBodyTimeoutLayer::new(READ_TIMEOUT))
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// Binds `addr` and serves the API until Ctrl-C or SIGTERM.
///
/// In-flight requests are allowed to finish before this returns.
pub async fn run_server(addr: SocketAddr, state: AppState) -> Result<(), std::io::Error> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server listening on http://{}", listener.local_addr()?);

    serve(listener, app, ConnectionLimits::default(), server::shutdown_signal()).await;

    tracing::info!("Web server stopped gracefully.");
    Ok(())
}
