use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{window, HtmlDocument};

use super::js_error_text;
use crate::console_warn;
use crate::push::{CookieSource, HttpTransport};
use crate::services::config::PwaConfig;

/// Reads `document.cookie` on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentCookies;

impl CookieSource for DocumentCookies {
    fn cookie_string(&self) -> String {
        let Some(document) = window()
            .and_then(|w| w.document())
            .and_then(|d| d.dyn_into::<HtmlDocument>().ok())
        else {
            return String::new();
        };

        document.cookie().unwrap_or_else(|e| {
            console_warn!("document.cookie unreadable: {}", js_error_text(&e));
            String::new()
        })
    }
}

/// `location.origin` of the current page, empty if unavailable.
pub fn page_origin() -> String {
    window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default()
}

/// Transport posting to the page's own origin with its cookies.
pub fn page_transport(config: &PwaConfig) -> HttpTransport {
    HttpTransport::new(
        page_origin(),
        Rc::new(DocumentCookies),
        config.endpoints.csrf_cookie_name.clone(),
    )
}
