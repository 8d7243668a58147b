//! iam-auth service entry point

use std::sync::Arc;

use iam_auth::bootstrap::{
    AuthModule, Collaborators, connect_redis, geo_resolver, init_telemetry, shutdown_signal,
};
use iam_auth::shared::infrastructure::persistence::InMemoryDirectories;
use tracing::info;
use warden_config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load("config")?;
    init_telemetry(&config.telemetry)?;
    let _metrics = warden_telemetry::init_metrics()?;

    info!(
        app_name = %config.app_name,
        app_env = %config.app_env,
        "Starting"
    );

    let cache = Arc::new(connect_redis(&config.redis).await?);
    // Directory records are owned by other components and served from memory here.
    let directories = InMemoryDirectories::new();
    let collaborators =
        Collaborators::in_memory(cache, &directories).with_geo(geo_resolver(&config.geo)?);

    let module = AuthModule::build(&config, collaborators);
    info!("iam-auth ready");

    shutdown_signal().await;
    module.shutdown().await;
    info!("iam-auth stopped");
    Ok(())
}
