use skybooker::api::routes::create_routes;
use skybooker::config::{AppConfig, DatabaseConfig, EmailConfig};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env()?;
    let db_config = DatabaseConfig::from_env()?;

    let pool = db_config.create_pool().await?;
    sqlx::migrate!().run(&pool).await?;

    let email_config = EmailConfig::from_env();
    if email_config.is_none() {
        info!("SMTP credentials not configured, confirmation emails will be simulated");
    }

    let app = create_routes(pool, email_config);

    let listener = TcpListener::bind(config.server_address()).await?;
    info!("SkyBooker server starting on http://{}", config.server_address());
    info!("Health check available at http://{}/health", config.server_address());

    axum::serve(listener, app).await?;

    Ok(())
}
