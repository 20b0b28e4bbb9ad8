//! Host selection for the components.
//!
//! On wasm32 with the `web` feature the browser adapters are used; every other
//! target gets inert hosts, so the components still render (without push
//! support or an install prompt) under server-side rendering and native tests.

use std::rc::Rc;

use crate::install::InstallHost;
use crate::platform::EnvironmentSource;
use crate::push::{PushHost, SubscriptionTransport};
use crate::services::config::PwaConfig;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
mod imp {
    use super::*;
    use crate::browser::{
        page_transport, BrowserEnvironment, BrowserInstallHost, BrowserPushHost,
    };

    pub fn environment() -> Rc<dyn EnvironmentSource> {
        Rc::new(BrowserEnvironment)
    }

    pub fn install_host() -> Box<dyn InstallHost> {
        Box::new(BrowserInstallHost)
    }

    pub fn push_host() -> Rc<dyn PushHost> {
        Rc::new(BrowserPushHost)
    }

    pub fn transport(config: &PwaConfig) -> Rc<dyn SubscriptionTransport> {
        Rc::new(page_transport(config))
    }
}

#[cfg(not(all(feature = "web", target_arch = "wasm32")))]
mod imp {
    use super::*;
    use crate::install::NoopInstallHost;
    use crate::platform::{EnvironmentSignals, StaticEnvironment};
    use crate::push::{HttpTransport, StaticCookies, UnsupportedPushHost};

    const LOCAL_ORIGIN: &str = "http://localhost";

    pub fn environment() -> Rc<dyn EnvironmentSource> {
        Rc::new(StaticEnvironment::new(EnvironmentSignals::default()))
    }

    pub fn install_host() -> Box<dyn InstallHost> {
        Box::new(NoopInstallHost)
    }

    pub fn push_host() -> Rc<dyn PushHost> {
        Rc::new(UnsupportedPushHost)
    }

    pub fn transport(config: &PwaConfig) -> Rc<dyn SubscriptionTransport> {
        Rc::new(HttpTransport::new(
            LOCAL_ORIGIN,
            Rc::new(StaticCookies::default()),
            config.endpoints.csrf_cookie_name.clone(),
        ))
    }
}

pub use imp::{environment, install_host, push_host, transport};
