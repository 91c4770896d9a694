use env_logger::Env;

/// Install the global logger. `RUST_LOG` wins over `default_filter`.
/// Calling it twice is harmless.
pub fn init(default_filter: &str) {
  let result = env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
    .format_timestamp_secs()
    .try_init();
  if result.is_err() {
    log::debug!("Logger already initialized");
  }
}
