use std::rc::Rc;

use dioxus::prelude::*;

use crate::hosts;
use crate::push::{
    register_worker, PushSubscriptionManager, SubscriptionIdentity, SubscriptionPhase,
    SubscriptionRequest, SubscriptionState,
};
use crate::services::config::get_global_config;

/// Register the configured service worker once, when the calling scope mounts.
///
/// Push subscriptions wait on the worker's registration; call this near the
/// root of the app.
pub fn use_push_worker() {
    use_hook(|| {
        spawn(async {
            let config = get_global_config();
            register_worker(hosts::push_host().as_ref(), &config).await;
        });
    });
}

#[derive(Props, PartialEq, Clone)]
pub struct PushNotificationsProps {
    /// base64url VAPID public key of the push server
    pub vapid_key: String,
    pub identity: SubscriptionIdentity,
}

/// Push subscription card. One button drives the shared subscription flow for
/// either a signed-in account or an anonymous school visitor.
#[component]
pub fn PushNotifications(props: PushNotificationsProps) -> Element {
    let state = use_signal(SubscriptionState::default);
    let label = use_hook(|| get_global_config().messages.push_button);

    let manager = use_hook(move || {
        let config = get_global_config();
        let manager = PushSubscriptionManager::new(
            hosts::push_host(),
            hosts::transport(&config),
            config,
        )
        .with_listener(move |snapshot: &SubscriptionState| {
            let mut state = state;
            state.set(snapshot.clone());
        });
        Rc::new(manager)
    });

    let current = state();
    let pending = current.phase == SubscriptionPhase::Pending;
    let vapid_key = props.vapid_key.clone();
    let identity = props.identity;

    rsx! {
        div {
            class: "pwa-push",
            "data-identity": identity.label(),

            if !current.enabled && current.can_retry() {
                button {
                    class: "pwa-push-button",
                    disabled: pending,
                    onclick: move |_| {
                        let manager = manager.clone();
                        let request = SubscriptionRequest {
                            vapid_key: vapid_key.clone(),
                            identity,
                        };
                        spawn(async move {
                            manager.subscribe(request).await;
                        });
                    },
                    "{label}"
                }
            }

            if !current.success_message.is_empty() {
                p { class: "pwa-push-success", "{current.success_message}" }
            }

            if !current.error_message.is_empty() {
                p { class: "pwa-push-error", "{current.error_message}" }
            }
        }
    }
}
