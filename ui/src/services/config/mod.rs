//! Endpoint and message configuration for the install and push flows.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::warn;

const DEFAULT_SERVICE_WORKER_PATH: &str = "/serviceworker.js";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PwaConfig {
    pub endpoints: EndpointConfig,
    pub messages: MessageCatalog,
    /// Service worker script registered for the page scope at startup
    pub service_worker_path: String,
}

/// Where subscriptions are submitted and how the authenticated request is credentialed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Endpoint for subscriptions bound to a signed-in account
    pub authenticated_path: String,
    /// Endpoint for anonymous, school-scoped subscriptions
    pub anonymous_path: String,
    /// Cookie holding the CSRF token
    pub csrf_cookie_name: String,
    /// Header the CSRF token is sent in
    pub csrf_header: String,
}

/// Every string the components show to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageCatalog {
    pub unsupported_ios: String,
    pub unsupported_macos: String,
    pub unsupported_android: String,
    pub unsupported_windows: String,
    pub android_opera_guidance: String,
    pub install_accepted: String,
    pub install_dismissed: String,
    pub install_button: String,
    pub push_button: String,
    pub push_not_supported: String,
    /// Prepended to the platform/network error text
    pub push_failed_prefix: String,
    pub identified_success: String,
    pub anonymous_success: String,
    /// Shown when the anonymous endpoint refuses without giving a reason
    pub anonymous_fallback_error: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            authenticated_path: "/webpush/save_information/".to_string(),
            anonymous_path: "/notifications/save-anon-subscription/".to_string(),
            csrf_cookie_name: "csrftoken".to_string(),
            csrf_header: "X-CSRFToken".to_string(),
        }
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self {
            unsupported_ios: "The browser you are using on iOS is not supported. Use Safari to install the web app.".to_string(),
            unsupported_macos: "The browser you are using on Mac is not supported. Use Safari to install the web app.".to_string(),
            unsupported_android: "The browser you are using on Android is not supported. Use Chrome to install the web app.".to_string(),
            unsupported_windows: "The browser you are using on Windows is not supported. Use Chrome to install the web app.".to_string(),
            android_opera_guidance: "To add this web app in Opera, open the browser menu and choose 'Add to Home screen'.".to_string(),
            install_accepted: "App installed!".to_string(),
            install_dismissed: "Installation cancelled.".to_string(),
            install_button: "Install app".to_string(),
            push_button: "Enable notifications".to_string(),
            push_not_supported: "Push notifications are not supported by your browser.".to_string(),
            push_failed_prefix: "Unable to enable push notifications: ".to_string(),
            identified_success: "Push notifications enabled!".to_string(),
            anonymous_success: "Anonymous push notifications enabled!".to_string(),
            anonymous_fallback_error: "Error during anonymous registration.".to_string(),
        }
    }
}

impl MessageCatalog {
    /// The Italian texts the school menu site ships with.
    pub fn italian() -> Self {
        Self {
            unsupported_ios: "Il browser che stai usando su iOS non è supportato. Usa Safari per installare la web app.".to_string(),
            unsupported_macos: "Il browser che stai usando su Mac non è supportato. Usa Safari per installare la web app.".to_string(),
            unsupported_android: "Il browser che stai usando su Android non è supportato. Usa Chrome per installare la web app.".to_string(),
            unsupported_windows: "Il browser che stai usando su Windows non è supportato. Usa Chrome per installare la web app.".to_string(),
            android_opera_guidance: "Per aggiungere questa web app su Opera, apri il menu e scegli 'Aggiungi a schermata Home'.".to_string(),
            install_accepted: "App installata!".to_string(),
            install_dismissed: "Installazione annullata.".to_string(),
            install_button: "Installa l'app".to_string(),
            push_button: "Abilita notifiche".to_string(),
            push_not_supported: "Push notifications are not supported by your browser.".to_string(),
            push_failed_prefix: "Impossibile abilitare le notifiche push: ".to_string(),
            identified_success: "Notifiche push abilitate!".to_string(),
            anonymous_success: "Notifiche push anonime abilitate!".to_string(),
            anonymous_fallback_error: "Errore durante la registrazione anonima.".to_string(),
        }
    }
}

impl Default for PwaConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PwaConfig {
    pub fn new() -> Self {
        Self {
            endpoints: EndpointConfig::default(),
            messages: MessageCatalog::default(),
            service_worker_path: DEFAULT_SERVICE_WORKER_PATH.to_string(),
        }
    }

    /// Default endpoints with the Italian message catalog
    pub fn italian() -> Self {
        Self {
            messages: MessageCatalog::italian(),
            ..Self::new()
        }
    }

    /// Parse a JSON override. Missing fields keep their English defaults.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| format!("Invalid configuration JSON: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        for (field, path) in [
            ("authenticated_path", &self.endpoints.authenticated_path),
            ("anonymous_path", &self.endpoints.anonymous_path),
            ("service_worker_path", &self.service_worker_path),
        ] {
            if path.is_empty() {
                return Err(format!("{} must not be empty", field));
            }
            if !path.starts_with('/') {
                return Err(format!("{} must start with '/', got {}", field, path));
            }
        }

        if self.endpoints.csrf_cookie_name.is_empty() {
            return Err("csrf_cookie_name must not be empty".to_string());
        }

        if self.endpoints.csrf_header.is_empty() {
            return Err("csrf_header must not be empty".to_string());
        }

        Ok(())
    }
}

static GLOBAL_CONFIG: OnceLock<PwaConfig> = OnceLock::new();

/// Get the global configuration, initialized with the defaults on first access
pub fn get_global_config() -> PwaConfig {
    GLOBAL_CONFIG
        .get_or_init(|| {
            let config = PwaConfig::new();
            if let Err(e) = config.validate() {
                warn!("Invalid configuration: {}", e);
            }
            config
        })
        .clone()
}

/// Install a configuration before first use. Returns false if one was already set
/// or the given one does not validate.
pub fn init_global_config(config: PwaConfig) -> bool {
    if let Err(e) = config.validate() {
        warn!("Rejecting invalid configuration: {}", e);
        return false;
    }
    GLOBAL_CONFIG.set(config).is_ok()
}
