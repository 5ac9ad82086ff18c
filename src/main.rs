use portfolio_alerts::alerts::{ AlertEvaluator, CooldownGuard };
use portfolio_alerts::db::{
    SeaOrmAlertRepository,
    SeaOrmCountersStore,
    SeaOrmNotificationRepository,
    SeaOrmSnapshotRepository,
};
use portfolio_alerts::notifications::NotificationDispatcher;
use portfolio_alerts::providers::EmailSender;
use portfolio_alerts::scheduler::AlertJob;
use portfolio_alerts::services::{ MetricsService, PriceService, ResendEmailService };
use portfolio_alerts::{ AppError, Config, Result };
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use tower_http::{ cors::CorsLayer, trace::TraceLayer };
use tracing_subscriber::{ layer::SubscriberExt, util::SubscriberInitExt };

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber
        ::registry()
        .with(
            tracing_subscriber::EnvFilter
                ::try_from_default_env()
                .unwrap_or_else(|_| "portfolio_alerts=debug,tower_http=debug".into())
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| AppError::Config(e.to_string()))?;

    let cooldown = CooldownGuard::new(config.cooldown_minutes)?;
    tracing::info!("Starting portfolio-alerts (cooldown: {} min)", cooldown.window().num_minutes());

    // Initialize database connection
    let db = sea_orm::Database::connect(&config.database_url).await?;
    tracing::info!("Database connected successfully");

    migration::Migrator::up(&db, None).await?;
    tracing::info!("Migrations completed successfully");

    // Collaborators
    let price_service = Arc::new(PriceService::new(config.price_api_base.clone())?);

    let email_sender: Option<Arc<dyn EmailSender>> = match &config.resend_api_key {
        Some(api_key) => {
            let service = ResendEmailService::new(
                api_key.clone(),
                config.notification_email_from.clone()
            )?;
            Some(Arc::new(service) as Arc<dyn EmailSender>)
        }
        None => {
            tracing::warn!("RESEND_API_KEY not set, alert emails are disabled");
            None
        }
    };

    if email_sender.is_some() && config.notification_email_to.is_empty() {
        tracing::warn!("NOTIFICATION_EMAIL_TO not set, alert emails have no recipient");
    }

    let dispatcher = Arc::new(
        NotificationDispatcher::new(
            Arc::new(SeaOrmNotificationRepository::new(db.clone())),
            email_sender,
            config.notification_email_to.clone()
        )
    );

    let evaluator = Arc::new(
        AlertEvaluator::new(
            Arc::new(SeaOrmAlertRepository::new(db.clone())),
            Arc::new(SeaOrmSnapshotRepository::new(db.clone())),
            price_service,
            dispatcher,
            cooldown
        )
    );

    let metrics_service = Arc::new(MetricsService::new(Arc::new(SeaOrmCountersStore::new(db))));

    // Shared by the interval loop and the HTTP trigger so their runs are serialized.
    let alert_job = Arc::new(AlertJob::new(evaluator, metrics_service.clone()));

    if let Some(secs) = config.check_interval_secs {
        tracing::info!("In-process alert scheduler running every {}s", secs);
        tokio::spawn(alert_job.clone().start(tokio::time::Duration::from_secs(secs)));
    }

    if config.cron_secret.is_none() {
        tracing::warn!("CRON_SECRET not set, the alert trigger endpoint will refuse all requests");
    }

    let app_state = portfolio_alerts::api::AppState::new(
        alert_job,
        metrics_service,
        config.cron_secret.clone()
    );

    // Build application router
    let app = portfolio_alerts::api::router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = format!("{}:{}", config.server_host, config.server_port);
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener
        ::bind(&addr).await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    axum::serve(listener, app).await.map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(())
}
