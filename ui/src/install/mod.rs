//! Web app installation: host seams for the deferred prompt and the controller
//! that owns it.

pub mod controller;
pub mod host;

pub use controller::{InstallPromptController, InstallPromptState};
pub use host::{
    DeferredPrompt, EligibilityEvent, EligibilityListener, InstallHost, InstallOutcome,
    NoopInstallHost,
};
