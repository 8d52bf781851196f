//! Payment callback service entry point.
//!
//! Loads configuration, connects to PostgreSQL, wires the adapters into the
//! callback router and serves it until shutdown.

use std::sync::Arc;

use axum::Router;
use secrecy::Secret;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use payment_callback::adapters::http::{callback_router, CallbackAppState};
use payment_callback::adapters::{
    HttpMaterialDelivery, PostgresConsultationRepository, PostgresPaymentLedger,
    PostgresSubscriptionRepository, TelegramNotifier,
};
use payment_callback::config::{AppConfig, RobokassaConfig};
use payment_callback::domain::payment::{
    CallbackError, MerchantSignatures, SignatureAlgorithm, SignatureVerifier,
};
use payment_callback::ports::Destination;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    tracing::info!(
        environment = ?config.server.environment,
        database = %config.database.redacted_url(),
        "Starting payment callback service"
    );

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .idle_timeout(config.database.idle_timeout())
        .max_lifetime(config.database.max_lifetime())
        .connect(&config.database.url)
        .await?;

    if config.telegram.bot_token.is_none() {
        tracing::warn!("Telegram bot token not set; consultation notifications will fail");
    }
    if config.materials.delivery_url().is_none() {
        tracing::warn!("Materials backend not set; material deliveries will fail");
    }

    let state = CallbackAppState {
        payment_ledger: Arc::new(PostgresPaymentLedger::new(pool.clone())),
        subscription_repository: Arc::new(PostgresSubscriptionRepository::new(pool.clone())),
        consultation_repository: Arc::new(PostgresConsultationRepository::new(pool)),
        notifier: Arc::new(TelegramNotifier::from_config(&config.telegram)?),
        material_delivery: Arc::new(HttpMaterialDelivery::from_config(&config.materials)?),
        signatures: Arc::new(merchant_signatures(&config.robokassa)?),
        operator_chat: config.telegram.operator_chat().map(Destination::new),
    };

    let app: Router = callback_router()
        .with_state(state)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// JSON logs in production, human-readable otherwise. `RUST_LOG` overrides
/// the configured level.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn merchant_signatures(config: &RobokassaConfig) -> Result<MerchantSignatures, CallbackError> {
    let algorithm: SignatureAlgorithm = config.signature_algorithm.parse()?;
    let verifier = |is_test: bool| {
        let secret = config
            .password2_for(is_test)
            .map(|password| Secret::new(password.to_string()));
        SignatureVerifier::new(secret, algorithm)
    };

    if config.password2_for(false).is_none() {
        tracing::warn!("Production merchant password not set; live callbacks will be rejected");
    }

    Ok(MerchantSignatures::new(verifier(false), verifier(true)))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
