//! Logger setup for the binary.

use env_logger::Env;

/// Installs `env_logger` on stderr with a `warn` default, overridable
/// through `RUST_LOG`. Calling it twice is harmless.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
