use dioxus::logger::tracing::warn;
use dioxus::prelude::*;
use pwa_ui::push::SubscriptionIdentity;
use pwa_ui::services::config::{init_global_config, PwaConfig};
use pwa_ui::{use_install_prompt_provider, use_push_worker, InstallPrompt, PushNotifications};

const MAIN_CSS: Asset = asset!("/assets/main.css");

// Public half of the push server's VAPID key pair, supplied at build time.
const VAPID_PUBLIC_KEY: &str = match option_env!("VAPID_PUBLIC_KEY") {
    Some(key) => key,
    None => "",
};

fn main() {
    dioxus::launch(App);
}

/// `PWA_CONFIG_JSON` at build time overrides the config; the menu site
/// otherwise ships in Italian.
fn site_config() -> PwaConfig {
    match option_env!("PWA_CONFIG_JSON").map(PwaConfig::from_json) {
        Some(Ok(config)) => config,
        Some(Err(e)) => {
            warn!("Ignoring PWA_CONFIG_JSON: {}", e);
            PwaConfig::italian()
        }
        None => PwaConfig::italian(),
    }
}

#[component]
fn App() -> Element {
    // Before any child reads the global config.
    use_hook(|| {
        if !init_global_config(site_config()) {
            warn!("PWA configuration was already initialized");
        }
    });
    // One install controller and one worker registration for the whole app,
    // shared by the cards every route mounts.
    use_install_prompt_provider();
    use_push_worker();

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        // Served from `public/` at the site root, like the worker script.
        document::Link { rel: "manifest", href: "/manifest.webmanifest" }

        Router::<Route> {}
    }
}

#[derive(Clone, Routable, Debug, PartialEq)]
enum Route {
    #[route("/")]
    Home {},
    #[route("/notifications/account/:user_id")]
    AccountNotifications { user_id: u64 },
    #[route("/notifications/school/:school_id")]
    SchoolNotifications { school_id: u64 },
}

#[component]
fn Home() -> Element {
    rsx! {
        main {
            InstallPrompt {}
        }
    }
}

#[component]
fn AccountNotifications(user_id: u64) -> Element {
    rsx! {
        main {
            InstallPrompt {}
            PushNotifications {
                vapid_key: VAPID_PUBLIC_KEY.to_string(),
                identity: SubscriptionIdentity::Identified { user_id },
            }
        }
    }
}

#[component]
fn SchoolNotifications(school_id: u64) -> Element {
    rsx! {
        main {
            InstallPrompt {}
            PushNotifications {
                vapid_key: VAPID_PUBLIC_KEY.to_string(),
                identity: SubscriptionIdentity::Anonymous { school_id },
            }
        }
    }
}
