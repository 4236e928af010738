use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// hyper 的連線層日誌太吵，只留警告
const DEFAULT_DIRECTIVES: &str = "portfolio_backend=info,warp=info,hyper=warn";
const VERBOSE_DIRECTIVES: &str = "portfolio_backend=debug,warp=debug,hyper=warn,info";

/// Fallback filter used when `RUST_LOG` is not set.
pub fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_DIRECTIVES
    } else {
        DEFAULT_DIRECTIVES
    }
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

/// Compact console output. Verbose mode also shows the target module,
/// which tells `warp::filters::trace` request spans apart from our own events.
pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(fmt::layer().with_target(verbose).compact())
        .init();
}

/// One JSON object per line, event fields at the top level so the hosting
/// platform can index `email`, `status` and friends directly.
pub fn init_json_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            fmt::layer()
                .json()
                .flatten_event(true)
                .with_current_span(verbose)
                .with_span_list(false),
        )
        .init();
}

pub fn init_logger(verbose: bool, json: bool) {
    if json {
        init_json_logger(verbose);
    } else {
        init_cli_logger(verbose);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_parse() {
        for verbose in [false, true] {
            let directives = default_directives(verbose);
            assert!(EnvFilter::try_new(directives).is_ok(), "{directives}");
        }
    }

    #[test]
    fn test_verbose_raises_crate_level_only() {
        assert!(default_directives(false).contains("portfolio_backend=info"));
        assert!(default_directives(true).contains("portfolio_backend=debug"));
        assert!(default_directives(true).contains("hyper=warn"));
    }
}
