use dioxus::prelude::*;

use crate::hosts;
use crate::install::{InstallPromptController, InstallPromptState};
use crate::services::config::get_global_config;

/// App-wide install prompt: one controller attached to the host once, and the
/// signal its listener writes. Both live in the scope that provides them.
#[derive(Clone)]
pub struct InstallPromptContext {
    pub controller: InstallPromptController,
    pub state: Signal<InstallPromptState>,
}

/// Create the install controller, attach it to the host and provide it to
/// every descendant `InstallPrompt`. Call once, near the root of the app.
///
/// The host fires its eligibility event once per page load, so cards mounted
/// after client-side navigation must share this controller to see it.
pub fn use_install_prompt_provider() -> InstallPromptContext {
    let controller = use_hook(|| {
        let controller =
            InstallPromptController::new(hosts::environment(), get_global_config().messages);
        controller.check_standalone();
        controller
    });
    let state = use_signal(|| controller.state());

    use_context_provider(move || {
        // Attached after the first snapshot so the listener never writes during render.
        let controller = controller.with_listener(move |snapshot: &InstallPromptState| {
            let mut state = state;
            state.set(snapshot.clone());
        });
        controller.attach(hosts::install_host().as_ref());
        InstallPromptContext { controller, state }
    })
}

/// Install card: browser guidance plus the install button once the browser
/// offers a prompt. Renders nothing inside the installed app.
///
/// Needs [`use_install_prompt_provider`] in an ancestor.
#[component]
pub fn InstallPrompt() -> Element {
    let InstallPromptContext { controller, state } = use_context::<InstallPromptContext>();
    let label = use_hook(|| get_global_config().messages.install_button);

    let current = state();
    if current.is_standalone {
        return rsx! {};
    }

    rsx! {
        div {
            class: "pwa-install",
            "data-os": current.os_name(),
            "data-browser": current.browser_name(),

            if !current.unsupported_message.is_empty() {
                p { class: "pwa-install-unsupported", "{current.unsupported_message}" }
            }

            if !current.install_message.is_empty() {
                p { class: "pwa-install-message", "{current.install_message}" }
            }

            if current.can_prompt {
                button {
                    class: "pwa-install-button",
                    onclick: move |_| {
                        let controller = controller.clone();
                        spawn(async move {
                            controller.show_prompt().await;
                        });
                    },
                    "{label}"
                }
            }
        }
    }
}
