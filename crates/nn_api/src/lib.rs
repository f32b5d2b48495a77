use std::sync::Arc;

use nn_core::{NewsApi, Result};
use tracing::info;

pub mod backends;
pub mod config;

pub use backends::*;
pub use config::{ApiConfig, BackendKind, API_URL_ENV, DEFAULT_BASE_URL};

/// Build the backend selected by `config`.
pub async fn create_api(config: &ApiConfig) -> Result<Arc<dyn NewsApi>> {
    match config.backend {
        BackendKind::Http => {
            let api = HttpNewsApi::new(config)?;
            info!("🌐 Using archive at {}", api.base_url());
            Ok(Arc::new(api))
        }
        BackendKind::Memory => {
            info!("💾 Using the in-memory sample archive");
            Ok(Arc::new(InMemoryNewsApi::with_sample_archive().await))
        }
    }
}

pub mod prelude {
    pub use super::{create_api, ApiConfig, BackendKind};
    pub use nn_core::{NewsApi, Result, Error};
}
