//! Host seams for the deferred install prompt.
//!
//! The browser emits `beforeinstallprompt` when the page becomes installable.
//! These traits describe that event and the prompt handle it carries so the
//! controller can be driven by the real browser or by a test double.

use async_trait::async_trait;

use crate::services::errors::InstallError;

/// The user's answer to the native install dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Accepted,
    Dismissed,
}

impl InstallOutcome {
    /// Parse the `outcome` field of a `userChoice` result. Anything other than
    /// "accepted" counts as dismissed.
    pub fn from_outcome(outcome: &str) -> Self {
        if outcome == "accepted" {
            InstallOutcome::Accepted
        } else {
            InstallOutcome::Dismissed
        }
    }
}

/// A captured, single-use install prompt.
#[async_trait(?Send)]
pub trait DeferredPrompt {
    /// Show the native install dialog.
    fn prompt(&self) -> Result<(), InstallError>;

    /// Wait for the user to accept or dismiss the dialog.
    async fn user_choice(&self) -> Result<InstallOutcome, InstallError>;
}

/// One install-eligibility notification from the host.
pub trait EligibilityEvent {
    /// Suppress the browser's own install affordance.
    fn prevent_default(&self);

    /// Take the prompt handle out of the event.
    fn into_prompt(self: Box<Self>) -> Box<dyn DeferredPrompt>;
}

pub type EligibilityListener = Box<dyn FnMut(Box<dyn EligibilityEvent>)>;

/// Host abstraction over "subscribe to the install-eligibility event".
pub trait InstallHost {
    fn on_install_eligible(&self, listener: EligibilityListener);
}

/// Host that never becomes installable, for targets without a browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopInstallHost;

impl InstallHost for NoopInstallHost {
    fn on_install_eligible(&self, _listener: EligibilityListener) {}
}
