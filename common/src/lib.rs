pub mod config;
pub mod error;
pub mod logging;
pub mod network;

// Macro support; the logging macros expand to `$crate::tracing::...`
// so callers need no tracing dependency of their own.
pub use tracing;
