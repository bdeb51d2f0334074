use crate::cli::{utils::output_success, OutputFormat};
use crate::config::config;
use crate::database::manager;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let database = &config().database;
    let pool = manager::connect_pool(database).await?;
    manager::migrate(&pool).await?;
    output_success(output_format, "Migrations applied", None)
}
