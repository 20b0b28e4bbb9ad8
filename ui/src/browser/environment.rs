use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use web_sys::window;

use crate::platform::{EnvironmentSignals, EnvironmentSource};
use crate::{console_debug, console_warn};

const STANDALONE_QUERY: &str = "(display-mode: standalone)";

/// Reads the live navigator and display mode on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserEnvironment;

impl EnvironmentSource for BrowserEnvironment {
    fn read_signals(&self) -> EnvironmentSignals {
        let Some(window) = window() else {
            console_warn!("No window object, reporting an empty environment");
            return EnvironmentSignals::default();
        };
        let navigator = window.navigator();

        // maxTouchPoints and the iOS-only `standalone` flag are read reflectively;
        // the latter is missing from web-sys entirely.
        let max_touch_points = Reflect::get(&navigator, &"maxTouchPoints".into())
            .ok()
            .and_then(|value| value.as_f64())
            .map(|points| points.max(0.0) as u32)
            .unwrap_or(0);
        let legacy_standalone = Reflect::get(&navigator, &"standalone".into())
            .ok()
            .and_then(|value| value.as_bool())
            .unwrap_or(false);

        let standalone_display = match window.match_media(STANDALONE_QUERY) {
            Ok(Some(query)) => query.matches(),
            Ok(None) => false,
            Err(e) => {
                console_warn!("matchMedia failed: {}", crate::browser::js_error_text(&e));
                false
            }
        };

        let signals = EnvironmentSignals::new(
            navigator.user_agent().unwrap_or_default(),
            navigator.platform().unwrap_or_default(),
        )
        .with_touch_points(max_touch_points)
        .with_standalone_display(standalone_display)
        .with_legacy_standalone(legacy_standalone);

        console_debug!(
            "Environment: platform={} touch_points={} standalone={}",
            signals.platform,
            signals.max_touch_points,
            signals.is_standalone()
        );
        signals
    }
}
