use async_trait::async_trait;
use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{window, Event};

use super::js_error_text;
use crate::install::{DeferredPrompt, EligibilityEvent, EligibilityListener, InstallHost, InstallOutcome};
use crate::services::errors::InstallError;
use crate::{console_error, console_info, console_warn};

const ELIGIBILITY_EVENT: &str = "beforeinstallprompt";

/// Listens for `beforeinstallprompt` on the window.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserInstallHost;

impl InstallHost for BrowserInstallHost {
    fn on_install_eligible(&self, mut listener: EligibilityListener) {
        let Some(window) = window() else {
            console_warn!("No window object, install prompt will never be offered");
            return;
        };

        let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            console_info!("Received {}", ELIGIBILITY_EVENT);
            listener(Box::new(BrowserEligibilityEvent { event }));
        });

        if let Err(e) =
            window.add_event_listener_with_callback(ELIGIBILITY_EVENT, callback.as_ref().unchecked_ref())
        {
            console_error!("Failed to listen for {}: {}", ELIGIBILITY_EVENT, js_error_text(&e));
            return;
        }

        // The listener lives as long as the page.
        callback.forget();
    }
}

struct BrowserEligibilityEvent {
    event: Event,
}

impl EligibilityEvent for BrowserEligibilityEvent {
    fn prevent_default(&self) {
        self.event.prevent_default();
    }

    fn into_prompt(self: Box<Self>) -> Box<dyn DeferredPrompt> {
        Box::new(BrowserDeferredPrompt { event: self.event })
    }
}

/// The `BeforeInstallPromptEvent`, driven reflectively since web-sys has no binding for it.
struct BrowserDeferredPrompt {
    event: Event,
}

#[async_trait(?Send)]
impl DeferredPrompt for BrowserDeferredPrompt {
    fn prompt(&self) -> Result<(), InstallError> {
        let prompt: Function = Reflect::get(&self.event, &"prompt".into())
            .map_err(|e| InstallError::PromptFailed(js_error_text(&e)))?
            .dyn_into()
            .map_err(|_| InstallError::PromptFailed("prompt is not a function".to_string()))?;

        // prompt() returns a promise, but its rejection is reported again through userChoice.
        prompt
            .call0(&self.event)
            .map_err(|e| InstallError::PromptFailed(js_error_text(&e)))?;
        Ok(())
    }

    async fn user_choice(&self) -> Result<InstallOutcome, InstallError> {
        let choice: Promise = Reflect::get(&self.event, &"userChoice".into())
            .map_err(|e| InstallError::ChoiceUnavailable(js_error_text(&e)))?
            .dyn_into()
            .map_err(|_| InstallError::ChoiceUnavailable("userChoice is not a promise".to_string()))?;

        let result = JsFuture::from(choice)
            .await
            .map_err(|e| InstallError::ChoiceUnavailable(js_error_text(&e)))?;

        let outcome = Reflect::get(&result, &"outcome".into())
            .ok()
            .and_then(|value| value.as_string())
            .unwrap_or_default();
        Ok(InstallOutcome::from_outcome(&outcome))
    }
}
