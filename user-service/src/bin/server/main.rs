use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tonic::transport::Server;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use user_service::config::Config;
use user_service::domain::authentication::service::AuthService;
use user_service::domain::user::service::UserService;
use user_service::inbound::grpc::AuthGrpcService;
use user_service::inbound::http::router::create_router;
use user_service::inbound::http::router::AppState;
use user_service::inbound::http::router::HttpSettings;
use user_service::outbound::repositories::PostgresUserRepository;
use user_service::proto::auth_service_server::AuthServiceServer;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "user_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "user-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        grpc_port = config.server.grpc_port,
        request_timeout_secs = config.server.request_timeout_secs,
        jwt_key_id = %config.jwt.key_id,
        retired_keys = config.jwt.retired_keys.len(),
        allowed_origins = ?config.cors.allowed_origins,
        "Configuration loaded"
    );

    let key_ring = config.jwt.key_ring()?;
    let authenticator = Arc::new(Authenticator::new(key_ring, config.jwt.lifetimes()));

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool));
    let user_service = Arc::new(UserService::new(
        Arc::clone(&user_repository),
        Arc::clone(&authenticator),
    ));
    let auth_service = Arc::new(AuthService::new(user_repository, authenticator));

    let shutdown = CancellationToken::new();
    tokio::spawn(cancel_on_signal(shutdown.clone()));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        AppState {
            user_service,
            auth_service: auth_service.clone(),
            shutdown: shutdown.clone(),
        },
        &HttpSettings {
            request_timeout: Duration::from_secs(config.server.request_timeout_secs),
            allowed_origins: config.cors.allowed_origins.clone(),
        },
    );
    let http_shutdown = shutdown.clone();
    let http_server = tokio::spawn(supervise(
        "http",
        async move {
            axum::serve(http_listener, http_application)
                .with_graceful_shutdown(http_shutdown.cancelled_owned())
                .await
        },
        shutdown.clone(),
    ));

    let grpc_address = format!("0.0.0.0:{}", config.server.grpc_port).parse()?;
    let grpc_service = AuthGrpcService::new(auth_service);
    tracing::info!(
        address = %grpc_address,
        port = config.server.grpc_port,
        protocol = "grpc",
        "gRpc server listening"
    );

    let grpc_shutdown = shutdown.clone();
    let grpc_server = tokio::spawn(supervise(
        "grpc",
        async move {
            Server::builder()
                .add_service(AuthServiceServer::new(grpc_service))
                .serve_with_shutdown(grpc_address, grpc_shutdown.cancelled_owned())
                .await
        },
        shutdown.clone(),
    ));

    let (http_result, grpc_result) = tokio::join!(http_server, grpc_server);
    tracing::info!("Servers exited");

    http_result??;
    grpc_result??;

    Ok(())
}

/// Run one server to completion; a failure cancels `shutdown` so the other
/// server drains and exits too.
async fn supervise<F, E>(
    protocol: &'static str,
    server: F,
    shutdown: CancellationToken,
) -> Result<(), anyhow::Error>
where
    F: Future<Output = Result<(), E>>,
    E: Into<anyhow::Error>,
{
    let result: Result<(), anyhow::Error> = server.await.map_err(Into::into);

    if let Err(e) = &result {
        tracing::error!(error = %e, protocol, "Server error, shutting down");
        shutdown.cancel();
    }

    result
}

/// Cancel `shutdown` on Ctrl+C or SIGTERM.
async fn cancel_on_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, starting graceful shutdown");
        },
    }

    shutdown.cancel();
}
