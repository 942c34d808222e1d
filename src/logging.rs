use env_logger::Env;

/// Installs an `env_logger` logger reading `RUST_LOG`, `info` by default.
///
/// Does nothing if a logger is already installed.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}
