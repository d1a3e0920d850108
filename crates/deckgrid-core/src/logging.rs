#![forbid(unsafe_code)]

//! Structured logging facade.
//!
//! Thin re-export of `tracing` behind the `tracing` feature so call sites
//! stay terse and the dependency stays optional. With `tracing-json`,
//! [`init_json`] installs a production-ready JSON subscriber filtered by
//! `RUST_LOG`.

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Install a JSON subscriber honoring the `RUST_LOG` env filter.
///
/// Intended for embedding applications that want machine-readable layout
/// diagnostics; call once at startup. Panics if a global subscriber is
/// already set, like `tracing_subscriber`'s own `init`.
#[cfg(feature = "tracing-json")]
pub fn init_json() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
}
