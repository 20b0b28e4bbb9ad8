//! Host seams for the platform push service.

use async_trait::async_trait;
use serde_json::Value;

/// Options passed to `pushManager.subscribe`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushSubscriptionOptions {
    pub user_visible_only: bool,
    /// Decoded VAPID public key
    pub application_server_key: Vec<u8>,
}

/// An active background-service (service worker) registration.
#[async_trait(?Send)]
pub trait PushRegistration {
    /// Request a push subscription and return its `toJSON()` form.
    async fn subscribe(&self, options: &PushSubscriptionOptions) -> Result<Value, String>;
}

/// Host abstraction over the browser's service worker and push APIs.
#[async_trait(?Send)]
pub trait PushHost {
    /// Whether the platform can hold push subscriptions at all.
    fn supports_push(&self) -> bool;

    /// Register the service worker script at `script_path` for the page scope.
    async fn register_worker(&self, script_path: &str) -> Result<(), String>;

    /// Wait until the active registration is ready.
    async fn ready_registration(&self) -> Result<Box<dyn PushRegistration>, String>;
}

/// Host without push support, for targets without a browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedPushHost;

#[async_trait(?Send)]
impl PushHost for UnsupportedPushHost {
    fn supports_push(&self) -> bool {
        false
    }

    async fn register_worker(&self, _script_path: &str) -> Result<(), String> {
        Err("no service worker support on this target".to_string())
    }

    async fn ready_registration(&self) -> Result<Box<dyn PushRegistration>, String> {
        Err("no service worker registration on this target".to_string())
    }
}
