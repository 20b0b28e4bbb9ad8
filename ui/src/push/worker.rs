//! Service worker registration at app start.
//!
//! Push subscriptions hang off the page's service worker registration, and
//! browsers only offer installation to pages controlled by one. The app
//! registers the configured script once; `ready_registration` resolves after.

use tracing::{info, warn};

use super::host::PushHost;
use crate::services::config::PwaConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerStatus {
    Registered,
    /// The platform has no service worker or Push API; nothing was attempted
    Unsupported,
    Failed(String),
}

/// Register `config.service_worker_path` if the host can hold push subscriptions.
pub async fn register_worker(host: &dyn PushHost, config: &PwaConfig) -> WorkerStatus {
    if !host.supports_push() {
        info!("Skipping service worker registration: push not supported");
        return WorkerStatus::Unsupported;
    }

    match host.register_worker(&config.service_worker_path).await {
        Ok(()) => {
            info!("Service worker {} registered", config.service_worker_path);
            WorkerStatus::Registered
        }
        Err(e) => {
            warn!("Service worker {} failed to register: {}", config.service_worker_path, e);
            WorkerStatus::Failed(e)
        }
    }
}
