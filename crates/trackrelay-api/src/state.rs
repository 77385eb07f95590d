//! Shared application state.

use std::sync::Arc;

use anyhow::{Context, Result};
use trackrelay_forward::DataStoreClient;

use crate::Config;

/// Read-only state shared by all request handlers.
///
/// Nothing here is mutated after startup; the forwarding client is
/// internally pooled and cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Loaded service configuration.
    pub config: Arc<Config>,
    /// Client for the data-store row-insertion API.
    pub forwarder: DataStoreClient,
}

impl AppState {
    /// Builds application state from a validated configuration.
    ///
    /// # Errors
    ///
    /// Fails when the outbound HTTP client cannot be constructed.
    pub fn new(config: Config) -> Result<Self> {
        let forwarder = DataStoreClient::new(config.to_client_config())
            .context("Failed to build data-store client")?;

        Ok(Self { config: Arc::new(config), forwarder })
    }
}
