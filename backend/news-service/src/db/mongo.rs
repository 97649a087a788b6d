//! MongoDB client construction
//!
//! One `Client` is created at startup and shared by every request; the driver
//! keeps its own connection pool. `shutdown` must be awaited before exit so
//! pooled connections are closed cleanly.

use crate::error::{AppError, Result};
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::Client;
use std::time::Duration;
use tracing::{debug, error, info};

/// Connection settings for the MongoDB client
#[derive(Clone)]
pub struct MongoSettings {
    pub uri: String,
    pub app_name: String,
    pub max_pool_size: u32,
    /// Used for TCP connect, server selection and the startup ping
    pub connect_timeout: Duration,
}

impl MongoSettings {
    pub fn from_config(config: &crate::Config) -> Self {
        Self {
            uri: config.mongodb_uri.clone(),
            app_name: "news-service".to_string(),
            max_pool_size: config.mongodb_max_pool_size,
            connect_timeout: config.connect_timeout(),
        }
    }
}

/// Create a client and verify the deployment answers a `ping`.
pub async fn connect(settings: &MongoSettings) -> Result<Client> {
    debug!(
        app_name = %settings.app_name,
        max_pool_size = settings.max_pool_size,
        connect_timeout_ms = settings.connect_timeout.as_millis() as u64,
        "Creating MongoDB client"
    );

    let mut options = ClientOptions::parse(&settings.uri).await?;
    options.app_name = Some(settings.app_name.clone());
    options.max_pool_size = Some(settings.max_pool_size);
    options.connect_timeout = Some(settings.connect_timeout);
    options.server_selection_timeout = Some(settings.connect_timeout);

    let client = Client::with_options(options)?;

    match tokio::time::timeout(
        settings.connect_timeout,
        client.database("admin").run_command(doc! { "ping": 1 }),
    )
    .await
    {
        Ok(Ok(_)) => {
            info!("MongoDB client created and verified successfully");
            Ok(client)
        }
        Ok(Err(e)) => {
            error!(error = %e, "MongoDB connection verification failed");
            Err(AppError::from(e))
        }
        Err(_) => {
            error!(
                timeout_ms = settings.connect_timeout.as_millis() as u64,
                "MongoDB connection verification timeout"
            );
            Err(AppError::Timeout("ping"))
        }
    }
}
