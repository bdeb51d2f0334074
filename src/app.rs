use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use crate::config::{AppConfig, Environment, SecurityConfig};
use crate::database::{self, HealthCheck, Repositories};
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::{tenant_gate, AuthState};
use crate::services::{CategoryService, ExpenseService};

/// Shared handler state, cloned per request
#[derive(Clone)]
pub struct AppState {
    pub categories: CategoryService,
    pub expenses: ExpenseService,
    pub health: Arc<dyn HealthCheck>,
}

impl AppState {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            categories: CategoryService::new(repos),
            expenses: ExpenseService::new(repos),
            health: repos.health.clone(),
        }
    }
}

/// Full application router. The tenant gate wraps every route, the fallback
/// included, so unknown paths outside the allow-list are rejected with 401.
pub fn router(state: AppState, auth: AuthState, config: &AppConfig) -> Router {
    let mut app = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        // Protected
        .merge(category_routes())
        .merge(expense_routes())
        .fallback(not_found)
        .layer(from_fn_with_state(auth, tenant_gate))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .with_state(state);

    if config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    if config.security.enable_cors {
        app = app.layer(cors_layer(config.environment, &config.security));
    }

    app
}

fn category_routes() -> Router<AppState> {
    use protected::categories;

    Router::new()
        .route("/api/categorias", get(categories::list).post(categories::create))
        .route(
            "/api/categorias/:id",
            get(categories::get)
                .put(categories::update)
                .delete(categories::delete),
        )
}

fn expense_routes() -> Router<AppState> {
    use protected::expenses;

    Router::new()
        .route("/api/gastos", get(expenses::list).post(expenses::create))
        .route(
            "/api/gastos/categoria/:categoria_id",
            get(expenses::list_by_category),
        )
        .route(
            "/api/gastos/:id",
            get(expenses::get)
                .put(expenses::update)
                .delete(expenses::delete),
        )
}

async fn not_found() -> ApiError {
    ApiError::not_found("Resource not found")
}

/// A panicking handler still answers with the standard error body
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    };
    error!("Request handler panicked: {}", detail);
    ApiError::internal_server_error("An error occurred while processing your request").into_response()
}

fn cors_layer(environment: Environment, security: &SecurityConfig) -> CorsLayer {
    if environment == Environment::Development {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
            Method::PATCH,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// Open storage, bind the port and serve until Ctrl-C
pub async fn serve(config: &AppConfig) -> anyhow::Result<()> {
    let repos = database::connect(&config.database).await?;
    let state = AppState::new(&repos);
    let auth = AuthState::from_config(&config.security);
    let app = router(state, auth, config);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(
        "Gastos API listening on http://{} ({:?}, {} storage)",
        bind_addr,
        config.environment,
        repos.health.backend()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}
