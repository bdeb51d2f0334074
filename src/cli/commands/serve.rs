use crate::app;
use crate::config::config;

pub async fn handle(port: Option<u16>) -> anyhow::Result<()> {
    let mut config = config().clone();
    if let Some(port) = port {
        config.server.port = port;
    }

    config.validate()?;
    if crate::is_development!() {
        tracing::warn!("Running with development profile");
    }

    app::serve(&config).await
}
