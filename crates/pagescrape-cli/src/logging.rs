//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use pagescrape_core::config::LoggingConfig;

/// Build the filter: `RUST_LOG` wins, then `-v`, then the configured level.
pub fn build_filter(logging: Option<&LoggingConfig>, verbose: bool) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let level = if verbose {
        "debug"
    } else {
        logging.and_then(|l| l.level.as_deref()).unwrap_or("info")
    };

    let mut filter = EnvFilter::new(level);
    for directive in logging.map(|l| l.filters.as_slice()).unwrap_or_default() {
        match directive.parse() {
            Ok(d) => filter = filter.add_directive(d),
            Err(e) => eprintln!("Ignoring log filter '{directive}': {e}"),
        }
    }
    filter
}

/// Install the global subscriber.
pub fn init(logging: Option<&LoggingConfig>, verbose: bool) {
    let filter = build_filter(logging, verbose);
    let json = logging.is_some_and(|l| l.format == "json");
    let stdout = logging.is_some_and(|l| l.output == "stdout");

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match (json, stdout) {
        (true, true) => builder.json().with_writer(std::io::stdout).init(),
        (true, false) => builder.json().with_writer(std::io::stderr).init(),
        (false, true) => builder.with_writer(std::io::stdout).init(),
        (false, false) => builder.with_writer(std::io::stderr).init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_with_directives() {
        let logging = LoggingConfig {
            format: "plain".into(),
            level: Some("warn".into()),
            filters: vec!["pagescrape_browser=debug".into(), "not a directive=".into()],
            output: "stderr".into(),
        };
        // Bad directives are skipped, not fatal.
        let filter = build_filter(Some(&logging), false);
        if std::env::var("RUST_LOG").is_err() {
            let rendered = filter.to_string();
            assert!(rendered.contains("pagescrape_browser=debug"), "{rendered}");
            assert!(rendered.contains("warn"), "{rendered}");
        }
    }

    #[test]
    fn test_verbose_is_debug() {
        if std::env::var("RUST_LOG").is_err() {
            let filter = build_filter(None, true);
            assert!(filter.to_string().contains("debug"));
        }
    }
}
