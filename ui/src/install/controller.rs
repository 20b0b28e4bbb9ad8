//! Install Prompt Controller
//!
//! Owns the deferred install prompt captured from the host and the install
//! guidance shown to the user. State machine:
//!
//! ```text
//! NoHandle --eligibility event--> HandleCaptured --show_prompt()--> Prompted
//!    ^                                                                  |
//!    +------------------- Accepted / Dismissed -------------------------+
//! ```
//!
//! A handle is taken out of the controller the moment it is prompted, so it
//! can never be prompted twice; a new eligibility event is needed for the next.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info, warn};

use super::host::{DeferredPrompt, EligibilityEvent, InstallHost, InstallOutcome};
use crate::platform::{detect, evaluate, Detection, EnvironmentSource, PlatformIdentity, SupportStatus};
use crate::services::config::MessageCatalog;

/// Everything the install card renders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallPromptState {
    pub is_standalone: bool,
    /// True while a captured handle is waiting to be prompted
    pub can_prompt: bool,
    pub identity: Option<PlatformIdentity>,
    pub support: Option<SupportStatus>,
    pub unsupported_message: String,
    pub install_message: String,
}

impl InstallPromptState {
    pub fn os_name(&self) -> &'static str {
        self.identity.map(|i| i.os.name()).unwrap_or("")
    }

    pub fn browser_name(&self) -> &'static str {
        self.identity.map(|i| i.browser.name()).unwrap_or("")
    }
}

struct Inner {
    state: InstallPromptState,
    handle: Option<Box<dyn DeferredPrompt>>,
    prompting: bool,
}

type StateListener = Rc<dyn Fn(&InstallPromptState)>;

#[derive(Clone)]
pub struct InstallPromptController {
    inner: Rc<RefCell<Inner>>,
    environment: Rc<dyn EnvironmentSource>,
    messages: Rc<MessageCatalog>,
    listener: Option<StateListener>,
}

impl InstallPromptController {
    pub fn new(environment: Rc<dyn EnvironmentSource>, messages: MessageCatalog) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                state: InstallPromptState::default(),
                handle: None,
                prompting: false,
            })),
            environment,
            messages: Rc::new(messages),
            listener: None,
        }
    }

    /// Call `listener` with a fresh snapshot after every state change.
    pub fn with_listener(mut self, listener: impl Fn(&InstallPromptState) + 'static) -> Self {
        self.listener = Some(Rc::new(listener));
        self
    }

    /// Start listening for install eligibility on `host`.
    pub fn attach(&self, host: &dyn InstallHost) {
        let controller = self.clone();
        host.on_install_eligible(Box::new(move |event| controller.capture(event)));
    }

    pub fn state(&self) -> InstallPromptState {
        self.inner.borrow().state.clone()
    }

    pub fn can_prompt(&self) -> bool {
        self.inner.borrow().state.can_prompt
    }

    /// Re-read the environment, re-detect the platform and refresh the guidance.
    pub fn check_standalone(&self) -> Detection {
        let signals = self.environment.read_signals();
        let detection = detect(&signals);
        let verdict = evaluate(detection.identity, &self.messages);

        {
            let mut inner = self.inner.borrow_mut();
            let state = &mut inner.state;
            state.is_standalone = detection.is_standalone;
            state.identity = Some(detection.identity);
            state.support = Some(verdict.status);
            state.unsupported_message = verdict.unsupported_message;
            if !verdict.install_message.is_empty() {
                state.install_message = verdict.install_message;
            }
        }

        self.notify();
        detection
    }

    /// Handle an eligibility event: suppress the browser default and keep the handle.
    pub fn capture(&self, event: Box<dyn EligibilityEvent>) {
        event.prevent_default();
        let prompt = event.into_prompt();

        {
            let mut inner = self.inner.borrow_mut();
            if inner.handle.is_some() {
                debug!("Replacing previously captured install prompt");
            }
            inner.handle = Some(prompt);
            inner.state.can_prompt = !inner.prompting;
        }

        info!("Install prompt captured");
        self.notify();
    }

    /// Show the captured prompt and wait for the user's choice.
    ///
    /// Returns `None` without touching any state when no handle is captured or
    /// a prompt is already waiting for its outcome.
    pub async fn show_prompt(&self) -> Option<InstallOutcome> {
        let handle = {
            let mut inner = self.inner.borrow_mut();
            if inner.prompting {
                debug!("Install prompt already showing");
                return None;
            }
            let handle = inner.handle.take()?;
            inner.prompting = true;
            inner.state.can_prompt = false;
            handle
        };
        self.notify();

        let outcome = Self::run_prompt(handle.as_ref()).await;
        drop(handle);

        match outcome {
            InstallOutcome::Accepted => {
                info!("Install prompt accepted");
                self.inner.borrow_mut().state.install_message = self.messages.install_accepted.clone();
                self.check_standalone();
            }
            InstallOutcome::Dismissed => {
                info!("Install prompt dismissed");
                self.inner.borrow_mut().state.install_message =
                    self.messages.install_dismissed.clone();
            }
        }

        {
            let mut inner = self.inner.borrow_mut();
            inner.prompting = false;
            inner.state.can_prompt = inner.handle.is_some();
        }
        self.notify();

        Some(outcome)
    }

    async fn run_prompt(handle: &dyn DeferredPrompt) -> InstallOutcome {
        if let Err(e) = handle.prompt() {
            warn!("Install prompt failed to show: {}", e);
            return InstallOutcome::Dismissed;
        }

        handle.user_choice().await.unwrap_or_else(|e| {
            warn!("Install choice unavailable: {}", e);
            InstallOutcome::Dismissed
        })
    }

    fn notify(&self) {
        if let Some(listener) = &self.listener {
            let snapshot = self.state();
            listener(&snapshot);
        }
    }
}
