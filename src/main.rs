mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::{Config, StorageBackend, StorageConfig};
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::auth::{routes as auth_routes, AuthProvider, AuthService};
use crate::features::auth::{HttpAuthProvider, LocalAuthProvider};
use crate::features::categories::routes as categories_routes;
use crate::features::reports::{routes as reports_routes, ReportService, ReportStore};
use crate::features::users::{routes as users_routes, ProfileCache, ProfileService};
use crate::modules::storage::{
    BlobStore, FileBlobStore, MemoryBlobStore, PgBlobStore, TimeoutBlobStore,
};
use axum::extract::DefaultBodyLimit;
use axum::{middleware::from_fn, Router};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

/// Open the configured blob store engine, bounded by the storage timeout
async fn open_blob_store(config: &StorageConfig) -> anyhow::Result<Arc<dyn BlobStore>> {
    let engine: Arc<dyn BlobStore> = match config.backend {
        StorageBackend::File => {
            let store = FileBlobStore::open(config.data_dir.clone())
                .await
                .map_err(|e| anyhow::anyhow!("Failed to open data directory: {}", e))?;
            tracing::info!("File blob store at {}", store.root().display());
            Arc::new(store)
        }
        StorageBackend::Postgres => {
            let db_config = config
                .database
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("Postgres backend selected without DATABASE_URL"))?;

            let pool = database::create_pool(db_config).await?;
            tracing::info!("Database connection pool created");

            tracing::info!("Running database migrations...");
            database::run_migrations(&pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
            tracing::info!("Database migrations completed successfully");

            Arc::new(PgBlobStore::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Memory blob store selected; nothing survives a restart");
            Arc::new(MemoryBlobStore::new())
        }
    };

    Ok(Arc::new(TimeoutBlobStore::new(engine, config.timeout)))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "System info: tokio_worker_threads={}, pid={}",
        worker_threads,
        std::process::id()
    );
    tracing::info!("Configuration loaded successfully");

    let blobs = open_blob_store(&config.storage).await?;

    // Stores restore their state before the server accepts requests
    let report_store = ReportStore::load(Arc::clone(&blobs)).await;
    let profile_cache = ProfileCache::load(Arc::clone(&blobs)).await;
    tracing::info!(
        "Restored {} reports and {} profiles",
        report_store.all().len(),
        profile_cache.profiles().len()
    );

    let report_service = Arc::new(ReportService::new(report_store));
    let profile_service = Arc::new(ProfileService::new(profile_cache));
    tracing::info!("Report and profile services initialized");

    let auth_provider: Arc<dyn AuthProvider> =
        match HttpAuthProvider::from_config(&config.auth_provider)? {
            Some(provider) => {
                tracing::info!("Using external identity provider");
                Arc::new(provider)
            }
            None => {
                tracing::warn!("AUTH_PROVIDER_URL not set; issuing local development tokens");
                Arc::new(LocalAuthProvider)
            }
        };
    let auth_service = Arc::new(AuthService::new(
        auth_provider,
        Arc::clone(&profile_service),
    ));

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Routes acting on behalf of the active profile
    let protected_routes = Router::new()
        .merge(reports_routes::routes(Arc::clone(&report_service)))
        .route_layer(axum::middleware::from_fn_with_state(
            Arc::clone(&profile_service),
            middleware::active_profile_middleware,
        ));

    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    let public_routes = Router::new()
        .merge(auth_routes::routes(auth_service))
        .merge(users_routes::routes(Arc::clone(&profile_service)))
        .merge(categories_routes::routes());

    let app = Router::new()
        .merge(swagger)
        .merge(protected_routes)
        .merge(public_routes)
        .merge(health_route)
        // Photos travel inline as base64
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    socket.set_nodelay(true)?;

    let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
    socket.set_tcp_keepalive(&keepalive)?;

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    axum::serve(listener, app).await?;

    Ok(())
}
