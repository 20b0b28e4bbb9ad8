//! Read-only snapshot of the browser environment used for detection.

/// Environment values captured once per detection pass.
///
/// Nothing here is cached between passes: the display mode changes when the
/// app is installed while the page is open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentSignals {
    /// `navigator.userAgent`, as reported
    pub user_agent: String,
    /// `navigator.platform`, as reported
    pub platform: String,
    /// `navigator.maxTouchPoints`
    pub max_touch_points: u32,
    /// `matchMedia('(display-mode: standalone)').matches`
    pub standalone_display: bool,
    /// iOS-only `navigator.standalone === true`
    pub legacy_standalone: bool,
}

impl EnvironmentSignals {
    pub fn new(user_agent: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            platform: platform.into(),
            ..Self::default()
        }
    }

    pub fn with_touch_points(mut self, max_touch_points: u32) -> Self {
        self.max_touch_points = max_touch_points;
        self
    }

    pub fn with_standalone_display(mut self, standalone: bool) -> Self {
        self.standalone_display = standalone;
        self
    }

    pub fn with_legacy_standalone(mut self, standalone: bool) -> Self {
        self.legacy_standalone = standalone;
        self
    }

    /// True when the page runs without browser chrome, i.e. as an installed app.
    pub fn is_standalone(&self) -> bool {
        self.standalone_display || self.legacy_standalone
    }
}

/// Host abstraction over "read the current environment".
pub trait EnvironmentSource {
    fn read_signals(&self) -> EnvironmentSignals;
}

/// Fixed environment, for non-browser targets and for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticEnvironment {
    signals: EnvironmentSignals,
}

impl StaticEnvironment {
    pub fn new(signals: EnvironmentSignals) -> Self {
        Self { signals }
    }
}

impl EnvironmentSource for StaticEnvironment {
    fn read_signals(&self) -> EnvironmentSignals {
        self.signals.clone()
    }
}
