use std::sync::Once;

use log::LevelFilter;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "glint_engine=debug,winit=warn") and takes precedence over `RUST_LOG`.
/// Without either, `default_level` applies to everything except the
/// windowing crates, which are held at `warn`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub default_level: LevelFilter,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            default_level: LevelFilter::Info,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

const NOISY_MODULES: [&str; 3] = ["winit", "glutin", "glutin_winit"];

static INIT: Once = Once::new();

/// Installs the global logger once; later calls are ignored.
///
/// Another logger installed by the host (a test harness, for instance) wins
/// silently.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match config.env_filter.or_else(|| std::env::var("RUST_LOG").ok()) {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                builder.filter_level(config.default_level);
                for module in NOISY_MODULES {
                    builder.filter_module(module, LevelFilter::Warn);
                }
            }
        }

        builder.write_style(config.write_style);

        if builder.try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}
