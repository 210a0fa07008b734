//! Crate-local logging macros.
//!
//! Thin wrappers over [`tracing`] so that library crates emit events
//! without caring how the binary formats them. The CLI installs a
//! formatter that renders these as `[+]`/`[*]`/`[-]` status lines.

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::tracing::info!($($arg)*)
    };
}

/// Success is rendered the same as `info!`; it exists so call sites
/// read as what they announce.
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::tracing::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::tracing::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::tracing::error!($($arg)*)
    };
}
