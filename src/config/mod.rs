use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub mod settings;
pub mod validation;

pub use settings::{GitRepos, GrafanaConfig, SyncConfig, ZabbixConfig};
pub use validation::ConfigurationValidator;

const DEFAULT_FILTER: &str = "monsync=info,reqwest=warn,hyper=warn";

/// Initialize logging with structured output.
///
/// `RUST_LOG` wins; otherwise `level` applies to this crate, falling back to `info`.
pub fn init_logging(level: Option<&str>) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| match level {
        Some(level) => EnvFilter::try_new(format!("monsync={},reqwest=warn,hyper=warn", level)),
        None => EnvFilter::try_new(DEFAULT_FILTER),
    })?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_names(false)
                .with_file(true)
                .with_line_number(true)
                .with_level(true)
                .compact(),
        )
        .try_init()?;

    tracing::debug!("Structured logging initialized");
    Ok(())
}

/// Initialize logging for testing with reduced verbosity
pub fn init_test_logging() -> anyhow::Result<()> {
    let env_filter = EnvFilter::new("monsync=debug");

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_test_writer().compact())
        .try_init()
        .or_else(|_| Ok(())) // Ignore if already initialized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_initialization() {
        // Test should not panic
        let _ = init_logging(Some("debug"));
    }

    #[test]
    fn test_test_logging_is_reentrant() {
        assert!(init_test_logging().is_ok());
        assert!(init_test_logging().is_ok());
    }
}
