//! Console logging.
//!
//! In the browser these go to `console.*`; on native targets (tests, non-web
//! hosts) they fall back to stdout/stderr.

pub fn console_log(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&msg.into());

    #[cfg(not(target_arch = "wasm32"))]
    println!("{}", msg);
}

pub fn console_warn(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&msg.into());

    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("[warn] {}", msg);
}

pub fn console_error(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::error_1(&msg.into());

    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("[error] {}", msg);
}

/// `format!`-style wrapper around [`console_log`].
#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        $crate::log::console_log(&format!($($arg)*))
    };
}

/// `format!`-style wrapper around [`console_warn`].
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::log::console_warn(&format!($($arg)*))
    };
}

/// `format!`-style wrapper around [`console_error`].
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::log::console_error(&format!($($arg)*))
    };
}
