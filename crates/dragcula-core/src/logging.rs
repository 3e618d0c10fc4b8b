//! Logging bootstrap for binaries and test harnesses.

/// Install a fmt subscriber honoring `RUST_LOG`, defaulting to `debug` for
/// the dragcula crates and `info` elsewhere.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("info,dragcula=debug,dragcula_tabs=debug")
            }),
        )
        .init();
}
