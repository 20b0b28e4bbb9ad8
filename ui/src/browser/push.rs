use async_trait::async_trait;
use js_sys::{Function, Object, Reflect, Uint8Array};
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{window, PushSubscriptionOptionsInit, ServiceWorkerRegistration};

use super::js_error_text;
use crate::push::{PushHost, PushRegistration, PushSubscriptionOptions};
use crate::{console_debug, console_info};

/// Service worker and Push API host.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserPushHost;

#[async_trait(?Send)]
impl PushHost for BrowserPushHost {
    fn supports_push(&self) -> bool {
        let Some(window) = window() else {
            return false;
        };
        let has_service_worker =
            Reflect::has(&window.navigator(), &"serviceWorker".into()).unwrap_or(false);
        let has_push_manager = Reflect::has(&window, &"PushManager".into()).unwrap_or(false);

        console_debug!(
            "Push capability: serviceWorker={} PushManager={}",
            has_service_worker,
            has_push_manager
        );
        has_service_worker && has_push_manager
    }

    async fn register_worker(&self, script_path: &str) -> Result<(), String> {
        let window = window().ok_or("No window object")?;
        let promise = window.navigator().service_worker().register(script_path);

        let registration: ServiceWorkerRegistration = JsFuture::from(promise)
            .await
            .map_err(|e| js_error_text(&e))?
            .dyn_into()
            .map_err(|_| "serviceWorker.register did not resolve to a registration")?;

        console_info!(
            "Service worker {} registered (scope {})",
            script_path,
            registration.scope()
        );
        Ok(())
    }

    async fn ready_registration(&self) -> Result<Box<dyn PushRegistration>, String> {
        let window = window().ok_or("No window object")?;
        let container = window.navigator().service_worker();

        // `ready` never settles for a page without a registration, so check first.
        let existing = JsFuture::from(container.get_registration())
            .await
            .map_err(|e| js_error_text(&e))?;
        if existing.is_undefined() {
            return Err("no service worker is registered for this page".to_string());
        }

        let ready = container
            .ready()
            .map_err(|e| format!("serviceWorker.ready unavailable: {}", js_error_text(&e)))?;

        let registration: ServiceWorkerRegistration = JsFuture::from(ready)
            .await
            .map_err(|e| js_error_text(&e))?
            .dyn_into()
            .map_err(|_| "serviceWorker.ready did not resolve to a registration")?;

        console_info!("Service worker registration ready (scope {})", registration.scope());
        Ok(Box::new(BrowserRegistration::new(registration)))
    }
}

/// Wraps a page-supplied registration, for callers that already hold one.
pub struct BrowserRegistration {
    registration: ServiceWorkerRegistration,
}

impl BrowserRegistration {
    pub fn new(registration: ServiceWorkerRegistration) -> Self {
        Self { registration }
    }
}

#[async_trait(?Send)]
impl PushRegistration for BrowserRegistration {
    async fn subscribe(&self, options: &PushSubscriptionOptions) -> Result<Value, String> {
        let push_manager = self
            .registration
            .push_manager()
            .map_err(|e| js_error_text(&e))?;

        let init = Object::new();
        Reflect::set(&init, &"userVisibleOnly".into(), &options.user_visible_only.into())
            .map_err(|e| js_error_text(&e))?;
        let key = Uint8Array::from(options.application_server_key.as_slice());
        Reflect::set(&init, &"applicationServerKey".into(), &key)
            .map_err(|e| js_error_text(&e))?;

        let promise = push_manager
            .subscribe_with_options(init.unchecked_ref::<PushSubscriptionOptionsInit>())
            .map_err(|e| js_error_text(&e))?;
        let subscription = JsFuture::from(promise)
            .await
            .map_err(|e| js_error_text(&e))?;

        let to_json: Function = Reflect::get(&subscription, &"toJSON".into())
            .map_err(|e| js_error_text(&e))?
            .dyn_into()
            .map_err(|_| "PushSubscription.toJSON is not a function".to_string())?;
        let json = to_json.call0(&subscription).map_err(|e| js_error_text(&e))?;

        serde_wasm_bindgen::from_value(json)
            .map_err(|e| format!("Failed to read subscription JSON: {}", e))
    }
}
