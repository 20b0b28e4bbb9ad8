//! Progressive web app support shared by the site's pages: install guidance
//! with the deferred install prompt, and web push subscription.

pub mod components;
pub mod hosts;
pub mod install;
pub mod platform;
pub mod push;
pub mod services;
pub mod utils;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod browser;

#[cfg(test)]
pub(crate) mod testing;


pub use components::{
    use_install_prompt_provider, use_push_worker, InstallPrompt, PushNotifications,
};
