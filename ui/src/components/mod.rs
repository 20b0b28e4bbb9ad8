//! User Interface Components
//!
//! - **install_prompt**: install guidance card with the deferred install button
//! - **push_notifications**: push subscription card for either identity
//!
//! Hosts come from [`crate::hosts`], so both render on every target.

pub mod install_prompt;
pub mod push_notifications;

pub use install_prompt::{use_install_prompt_provider, InstallPrompt, InstallPromptContext};
pub use push_notifications::{use_push_worker, PushNotifications, PushNotificationsProps};
