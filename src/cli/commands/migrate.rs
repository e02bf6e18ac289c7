use anyhow::Context;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::DatabaseManager;

pub async fn handle(config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let manager = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    manager.migrate().await.context("failed to apply schema")?;
    manager.close().await;

    match output_format {
        OutputFormat::Json => println!("{}", json!({ "migrated": true })),
        OutputFormat::Text => println!("Schema is up to date"),
    }
    Ok(())
}
