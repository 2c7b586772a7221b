use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::Environment;

/// Install the global tracing subscriber.
///
/// `Local` logs human-readable lines at debug, `Prod` logs JSON at info.
/// `RUST_LOG` overrides the level in both cases. Output goes to stderr so
/// stdout stays free for command results.
pub fn init(environment: Environment) {
    let default_filter = match environment {
        Environment::Local => "credential_store=debug,sqlx=warn",
        Environment::Prod => "credential_store=info,sqlx=warn",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let registry = tracing_subscriber::registry().with(filter);
    match environment {
        Environment::Local => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        Environment::Prod => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}
