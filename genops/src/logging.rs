//! Diagnostic tracing for the `genops` binary.
//!
//! Stdout belongs to the calling agent: it carries exactly one tool result
//! (or a spec listing, roster or prompt) and nothing else, so a host can pass
//! it straight back to the model. Tracing goes to stderr, where the host may
//! log or discard it without touching the result.
//!
//! Nothing in the library installs a subscriber; embedding hosts bring their
//! own.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset or unparsable: only fallbacks,
/// rejected calls, timeouts and truncation show up.
pub const DEFAULT_DIRECTIVE: &str = "warn";

/// Install the stderr subscriber for `genops`.
///
/// ```bash
/// RUST_LOG=genops=debug genops call run_tests --input '{"repo_path": "out"}'
/// ```
pub fn init() {
    tracing_subscriber::registry()
        .with(filter_from(std::env::var("RUST_LOG").ok().as_deref()))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

/// Parse a `RUST_LOG`-style directive, falling back to [`DEFAULT_DIRECTIVE`].
fn filter_from(directive: Option<&str>) -> EnvFilter {
    directive
        .filter(|value| !value.trim().is_empty())
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(directive: &str) -> String {
        EnvFilter::new(directive).to_string()
    }

    #[test]
    fn unset_or_blank_directive_uses_default() {
        assert_eq!(filter_from(None).to_string(), rendered(DEFAULT_DIRECTIVE));
        assert_eq!(filter_from(Some("  ")).to_string(), rendered(DEFAULT_DIRECTIVE));
    }

    #[test]
    fn valid_directive_is_kept() {
        assert_eq!(
            filter_from(Some("genops=debug")).to_string(),
            rendered("genops=debug")
        );
    }

    #[test]
    fn malformed_directive_falls_back() {
        assert_eq!(
            filter_from(Some("genops=notalevel")).to_string(),
            rendered(DEFAULT_DIRECTIVE)
        );
    }
}
