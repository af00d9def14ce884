use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log targets owned by this package: the library and the `inventory` binary.
const TARGETS: [&str; 2] = ["inventory_manager", "inventory"];

fn default_directives(verbose: bool, level: Option<&str>) -> String {
    let level = match (verbose, level) {
        (true, _) => "debug",
        (false, Some(level)) => level,
        (false, None) => "info",
    };
    let mut directives: Vec<String> = TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect();
    if verbose {
        directives.push("info".to_string());
    }
    directives.join(",")
}

fn default_filter(verbose: bool, level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose, level)))
}

pub fn init_cli_logger(verbose: bool, level: Option<&str>) {
    tracing_subscriber::registry()
        .with(default_filter(verbose, level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

pub fn init_json_logger(verbose: bool, level: Option<&str>) {
    tracing_subscriber::registry()
        .with(default_filter(verbose, level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_cover_binary_target() {
        assert_eq!(
            default_directives(false, None),
            "inventory_manager=info,inventory=info"
        );
        assert_eq!(
            default_directives(false, Some("warn")),
            "inventory_manager=warn,inventory=warn"
        );
        assert_eq!(
            default_directives(true, Some("warn")),
            "inventory_manager=debug,inventory=debug,info"
        );
    }
}
