//! Install support policy: which OS/browser pairs can install the web app.

use super::detector::{Browser, OperatingSystem, PlatformIdentity};
use crate::services::config::MessageCatalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportStatus {
    /// The browser offers installation itself
    Supported,
    /// Installable, but only through a manual browser-menu step
    Guided,
    /// The user has to switch browser
    Unsupported,
}

/// At most one of the two messages is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportVerdict {
    pub status: SupportStatus,
    pub unsupported_message: String,
    pub install_message: String,
}

impl SupportVerdict {
    fn supported() -> Self {
        Self {
            status: SupportStatus::Supported,
            unsupported_message: String::new(),
            install_message: String::new(),
        }
    }

    fn guided(message: &str) -> Self {
        Self {
            status: SupportStatus::Guided,
            unsupported_message: String::new(),
            install_message: message.to_string(),
        }
    }

    fn unsupported(message: &str) -> Self {
        Self {
            status: SupportStatus::Unsupported,
            unsupported_message: message.to_string(),
            install_message: String::new(),
        }
    }

    pub fn is_supported(&self) -> bool {
        self.status == SupportStatus::Supported
    }
}

/// Map a detected identity to its verdict. Total over every OS/browser pair.
pub fn evaluate(identity: PlatformIdentity, messages: &MessageCatalog) -> SupportVerdict {
    use Browser::*;
    use OperatingSystem::*;

    match (identity.os, identity.browser) {
        (Ios, Safari) => SupportVerdict::supported(),
        (Ios, _) => SupportVerdict::unsupported(&messages.unsupported_ios),

        (MacOs, Safari | Chrome | Vivaldi) => SupportVerdict::supported(),
        (MacOs, _) => SupportVerdict::unsupported(&messages.unsupported_macos),

        (Android, Chrome) => SupportVerdict::supported(),
        (Android, Opera) => SupportVerdict::guided(&messages.android_opera_guidance),
        (Android, _) => SupportVerdict::unsupported(&messages.unsupported_android),

        (Windows, Edge | Chrome) => SupportVerdict::supported(),
        (Windows, _) => SupportVerdict::unsupported(&messages.unsupported_windows),

        (OperatingSystem::Other, _) => SupportVerdict::supported(),
    }
}
