//! Browser Adapters (wasm32 only)
//!
//! Host implementations over `web-sys`:
//!
//! - **environment**: navigator and display-mode signals
//! - **install**: `beforeinstallprompt` capture and the deferred prompt
//! - **push**: service worker readiness and `pushManager.subscribe`
//! - **cookies**: `document.cookie` and the page-origin transport

pub mod cookies;
pub mod environment;
pub mod install;
pub mod push;

pub use cookies::{page_origin, page_transport, DocumentCookies};
pub use environment::BrowserEnvironment;
pub use install::BrowserInstallHost;
pub use push::{BrowserPushHost, BrowserRegistration};

use wasm_bindgen::prelude::*;

/// Render a thrown JS value as `Name: message` where possible.
pub(crate) fn js_error_text(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return format!("{}: {}", String::from(error.name()), String::from(error.message()));
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
