//! Logging initialization for binaries and tools

/// Initialize the logging system with an explicit filter string (e.g. `"voxel_lights=debug"`)
///
/// `RUST_LOG` still takes precedence when it is set. Calling this more than once is harmless;
/// later calls leave the first logger in place.
pub fn init_with_filter(filter: &str) {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(filter);
    if let Ok(env_filter) = std::env::var("RUST_LOG") {
        builder.parse_filters(&env_filter);
    }
    if builder.try_init().is_err() {
        log::debug!("Logger already initialized, keeping existing configuration");
    }
}
