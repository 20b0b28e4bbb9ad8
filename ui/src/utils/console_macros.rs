/// Console logging for the browser adapters.
///
/// Each line is prefixed with the page clock and formatted on the Rust side so
/// only plain strings cross into JS. Only usable on wasm32; code that also runs
/// natively logs through `tracing`.
#[doc(hidden)]
#[macro_export]
macro_rules! __pwa_console {
    ($level:ident, $tag:literal, $($arg:tt)+) => {
        gloo_console::$level!(format!(
            "[{}] [pwa:{}] {}",
            js_sys::Date::now(),
            $tag,
            format!($($arg)+)
        ))
    };
}

#[macro_export]
macro_rules! console_info {
    ($($arg:tt)+) => {
        $crate::__pwa_console!(info, "info", $($arg)+)
    };
}

#[macro_export]
macro_rules! console_log {
    ($($arg:tt)+) => {
        $crate::__pwa_console!(log, "log", $($arg)+)
    };
}

#[macro_export]
macro_rules! console_warn {
    ($($arg:tt)+) => {
        $crate::__pwa_console!(warn, "warn", $($arg)+)
    };
}

#[macro_export]
macro_rules! console_error {
    ($($arg:tt)+) => {
        $crate::__pwa_console!(error, "error", $($arg)+)
    };
}

#[macro_export]
macro_rules! console_debug {
    ($($arg:tt)+) => {
        $crate::__pwa_console!(debug, "debug", $($arg)+)
    };
}
