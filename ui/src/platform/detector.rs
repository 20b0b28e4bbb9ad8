//! Platform Detection
//!
//! Maps an [`EnvironmentSignals`] snapshot to the operating system and browser
//! the page is running in. Matching is done on the lower-cased user agent and
//! platform strings against ordered rule tables: the first rule that matches
//! wins, so the order of [`OS_RULES`] and [`BROWSER_RULES`] is the tie-break.

use tracing::debug;

use super::signals::EnvironmentSignals;

/// Operating systems the install guidance distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatingSystem {
    Ios,
    Android,
    Windows,
    MacOs,
    Other,
}

impl OperatingSystem {
    pub const ALL: [OperatingSystem; 5] = [
        OperatingSystem::Ios,
        OperatingSystem::Android,
        OperatingSystem::Windows,
        OperatingSystem::MacOs,
        OperatingSystem::Other,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            OperatingSystem::Ios => "iOS",
            OperatingSystem::Android => "Android",
            OperatingSystem::Windows => "Windows",
            OperatingSystem::MacOs => "MacOS",
            OperatingSystem::Other => "Other",
        }
    }
}

/// Browsers the install guidance distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Browser {
    Safari,
    Chrome,
    Firefox,
    Edge,
    Opera,
    Vivaldi,
    Brave,
    Other,
}

impl Browser {
    pub const ALL: [Browser; 8] = [
        Browser::Safari,
        Browser::Chrome,
        Browser::Firefox,
        Browser::Edge,
        Browser::Opera,
        Browser::Vivaldi,
        Browser::Brave,
        Browser::Other,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Browser::Safari => "Safari",
            Browser::Chrome => "Chrome",
            Browser::Firefox => "Firefox",
            Browser::Edge => "Edge",
            Browser::Opera => "Opera",
            Browser::Vivaldi => "Vivaldi",
            Browser::Brave => "Brave",
            Browser::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlatformIdentity {
    pub os: OperatingSystem,
    pub browser: Browser,
}

/// Result of one detection pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub identity: PlatformIdentity,
    pub is_standalone: bool,
}

/// How an OS rule decides whether it applies
#[derive(Debug, Clone, Copy)]
pub enum OsMatcher {
    /// Any of these substrings in the lower-cased user agent
    UserAgent(&'static [&'static str]),
    /// Mac identifiers in `navigator.platform`, including touch-capable "MacIntel"
    MacPlatform,
}

/// Mac identifiers looked for in the lower-cased platform string
const MAC_PLATFORM_IDS: &[&str] = &["macintosh", "macintel", "macppc", "mac68k", "macos"];

pub const OS_RULES: &[(OperatingSystem, OsMatcher)] = &[
    (OperatingSystem::Ios, OsMatcher::UserAgent(&["iphone", "ipad", "ipod"])),
    (OperatingSystem::Android, OsMatcher::UserAgent(&["android"])),
    (OperatingSystem::Windows, OsMatcher::UserAgent(&["windows"])),
    (OperatingSystem::MacOs, OsMatcher::MacPlatform),
];

// Chrome precedes Safari: every Chromium UA also carries "safari".
pub const BROWSER_RULES: &[(Browser, &[&str])] = &[
    (Browser::Opera, &["opr", "opera"]),
    (Browser::Vivaldi, &["vivaldi"]),
    (Browser::Chrome, &["crios", "chrome"]),
    (Browser::Firefox, &["fxios", "firefox"]),
    (Browser::Edge, &["edgios", "edg"]),
    (Browser::Safari, &["safari"]),
    (Browser::Brave, &["brave"]),
];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

fn is_mac_platform(signals: &EnvironmentSignals) -> bool {
    let touch_mac = signals.platform == "MacIntel" && signals.max_touch_points > 1;
    touch_mac || contains_any(&signals.platform.to_lowercase(), MAC_PLATFORM_IDS)
}

impl OsMatcher {
    fn matches(&self, user_agent: &str, signals: &EnvironmentSignals) -> bool {
        match self {
            OsMatcher::UserAgent(needles) => contains_any(user_agent, needles),
            OsMatcher::MacPlatform => is_mac_platform(signals),
        }
    }
}

/// Classify the operating system; first matching rule in [`OS_RULES`] wins.
pub fn detect_os(signals: &EnvironmentSignals) -> OperatingSystem {
    let user_agent = signals.user_agent.to_lowercase();
    OS_RULES
        .iter()
        .find(|(_, matcher)| matcher.matches(&user_agent, signals))
        .map(|(os, _)| *os)
        .unwrap_or(OperatingSystem::Other)
}

/// Classify the browser; first matching rule in [`BROWSER_RULES`] wins.
pub fn detect_browser(user_agent: &str) -> Browser {
    let user_agent = user_agent.to_lowercase();
    BROWSER_RULES
        .iter()
        .find(|(_, needles)| contains_any(&user_agent, needles))
        .map(|(browser, _)| *browser)
        .unwrap_or(Browser::Other)
}

/// Run a full detection pass over a signal snapshot. Pure: same input, same output.
pub fn detect(signals: &EnvironmentSignals) -> Detection {
    let identity = PlatformIdentity {
        os: detect_os(signals),
        browser: detect_browser(&signals.user_agent),
    };
    let is_standalone = signals.is_standalone();

    debug!(
        user_agent = %signals.user_agent,
        platform = %signals.platform,
        max_touch_points = signals.max_touch_points,
        os = identity.os.name(),
        browser = identity.browser.name(),
        is_standalone,
        "platform detected"
    );

    Detection {
        identity,
        is_standalone,
    }
}
