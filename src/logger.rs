pub use tracing::{debug, error, info, instrument, trace, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
};

/// Installs the global subscriber at `info`, or whatever `RUST_LOG` asks for.
pub fn init() {
    init_with_default("info");
}

/// Like [`init`] with a caller-chosen fallback filter. Span close events,
/// which carry stage durations, are printed only when debug output is on.
pub fn init_with_default(default_filter: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let is_debug = env_filter.to_string().contains("debug") || env_filter.to_string().contains("trace");

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_timer(fmt::time::uptime())
        .with_span_events(if is_debug { FmtSpan::CLOSE } else { FmtSpan::NONE });

    // a second call, e.g. from tests, keeps the first subscriber
    let _ = tracing_subscriber::registry().with(env_filter).with(fmt_layer).try_init();
}
