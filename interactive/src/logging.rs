use std::sync::Once;

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// `filter` uses the `env_logger` syntax. Without it `RUST_LOG` is read, falling
/// back to `info`.
pub fn init_logging(filter: Option<&str>) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = filter {
            builder.parse_filters(filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        builder.write_style(env_logger::WriteStyle::Auto);
        builder.init();

        log::debug!("logging initialized");
    });
}
