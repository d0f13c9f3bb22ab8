//! Academy Hub server binary.

use std::error::Error;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal::{self, ctrl_c};
use tracing_subscriber::EnvFilter;

use academy_hub::adapters::auth::{BaasAuthConfig, BaasIdentityClient, BaasJwtValidator};
use academy_hub::adapters::http::{build_router, AppState, HttpSettings};
use academy_hub::adapters::postgres::{
    self, PostgresClassTypeRepository, PostgresDashboardReader, PostgresGymRepository,
    PostgresLocationRepository, PostgresPaymentHistoryRepository, PostgresPlanRepository,
    PostgresProfileRepository, PostgresSubscriptionRepository, PostgresWebhookEventRepository,
};
use academy_hub::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use academy_hub::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    tracing::info!(
        environment = ?config.server.environment,
        database = %config.database.redacted_url(),
        "Starting academy-hub"
    );

    let pool = postgres::connect(&config.database).await?;

    let identity = BaasIdentityClient::new(
        BaasAuthConfig::new(&config.auth.baas_url, config.auth.anon_key())
            .with_timeout(config.auth.request_timeout()),
    )?;
    let session_validator =
        BaasJwtValidator::new(&config.auth.jwt_secret(), config.auth.jwt_audience.clone());

    let mut stripe = StripeConfig::new(config.payment.api_key());
    if let Some(base_url) = &config.payment.stripe_api_base_url {
        stripe = stripe.with_base_url(base_url.clone());
    }
    let payment_provider = StripePaymentAdapter::new(stripe)?;

    let state = AppState {
        profiles: Arc::new(PostgresProfileRepository::new(pool.clone())),
        locations: Arc::new(PostgresLocationRepository::new(pool.clone())),
        gyms: Arc::new(PostgresGymRepository::new(pool.clone())),
        class_types: Arc::new(PostgresClassTypeRepository::new(pool.clone())),
        plans: Arc::new(PostgresPlanRepository::new(pool.clone())),
        subscriptions: Arc::new(PostgresSubscriptionRepository::new(pool.clone())),
        payments: Arc::new(PostgresPaymentHistoryRepository::new(pool.clone())),
        webhook_events: Arc::new(PostgresWebhookEventRepository::new(pool.clone())),
        dashboard: Arc::new(PostgresDashboardReader::new(pool.clone())),
        session_validator: Arc::new(session_validator),
        identity: Arc::new(identity),
        payment_provider: Arc::new(payment_provider),
        settings: Arc::new(HttpSettings::from_config(&config)),
    };

    let app = build_router(state, &config.server);

    let address = config.server.socket_addr()?;
    let listener = TcpListener::bind(address).await?;
    tracing::info!(%address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Server stopped");
    Ok(())
}

/// JSON logs in production, human-readable otherwise. `RUST_LOG` overrides
/// the configured level.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.is_production() {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
