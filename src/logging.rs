/// Install `env_logger` as the `log` backend.
///
/// `RUST_LOG` wins over `default_filter`. Calling this more than once is
/// harmless; only the first call installs a logger.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging(default_filter: &str) {
    let env = env_logger::Env::default().default_filter_or(default_filter);
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("Logger already initialised");
    }
}

#[cfg(target_arch = "wasm32")]
pub fn init_logging(_default_filter: &str) {}
