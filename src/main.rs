use accesstech::{
    api::{build_router, AppState},
    auth::AuthService,
    config::Config,
    notifications::OtpMailer,
    search::SearchEngine,
    state::{
        InMemoryAuditSink, InMemoryCatalogStore, InMemoryReviewStore, InMemoryUserStore,
        KeyValueCache, NoopCache, RedisCache,
    },
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration before tracing so the configured level can seed
    // the filter
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::process::exit(1);
    });

    // Initialize tracing; RUST_LOG still wins when set
    let default_filter = format!(
        "accesstech={level},tower_http={level}",
        level = config.observability.log_level
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting accesstech backend v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the result cache; degrade to no-op when redis is down
    let cache: Arc<dyn KeyValueCache> = if config.cache.enabled {
        match &config.cache.redis_url {
            Some(url) => match RedisCache::new(url, &config.cache.key_prefix).await {
                Ok(redis) => {
                    tracing::info!("Result cache initialized");
                    Arc::new(redis)
                }
                Err(e) => {
                    tracing::warn!("Cache backend unavailable: {}", e);
                    tracing::warn!("Continuing with caching disabled");
                    Arc::new(NoopCache::new())
                }
            },
            None => {
                tracing::warn!("Cache enabled but no redis_url configured, caching disabled");
                Arc::new(NoopCache::new())
            }
        }
    } else {
        tracing::info!("Result cache disabled in configuration");
        Arc::new(NoopCache::new())
    };

    // Initialize stores
    let catalog = Arc::new(InMemoryCatalogStore::new());
    let reviews = Arc::new(InMemoryReviewStore::new());
    let users = Arc::new(InMemoryUserStore::new());
    let audit = Arc::new(InMemoryAuditSink::new());
    tracing::info!("Stores initialized");

    // Initialize the OTP mailer
    let mailer = if config.email.enabled {
        match OtpMailer::from_config(&config.email) {
            Ok(mailer) => {
                tracing::info!("OTP mailer initialized");
                Some(Arc::new(mailer))
            }
            Err(e) => {
                tracing::warn!("OTP mailer initialization failed: {}", e);
                tracing::warn!("Continuing without email delivery");
                None
            }
        }
    } else {
        tracing::info!("Email delivery disabled in configuration");
        None
    };

    // Assemble services
    let search = Arc::new(SearchEngine::new(
        catalog.clone(),
        reviews.clone(),
        cache.clone(),
        audit.clone(),
    ));
    let auth = Arc::new(AuthService::new(
        users.clone(),
        cache.clone(),
        mailer,
        &config.auth,
    ));

    let app_state = AppState::new(catalog, reviews, users, search, auth);
    let app = build_router(app_state);

    // Start HTTP server
    let http_addr = format!("{}:{}", config.server.host, config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_addr).await?;

    tracing::info!("HTTP API server listening on http://{}", http_addr);
    tracing::info!("   Health check: http://{}/health", http_addr);
    tracing::info!("   Search: http://{}/v1/search?query=...", http_addr);

    let http_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(http_listener, app).await {
            tracing::error!("HTTP server error: {}", e);
        }
    });

    tokio::select! {
        _ = http_handle => {
            tracing::warn!("HTTP server stopped");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    tracing::info!("Shutting down gracefully...");
    Ok(())
}
