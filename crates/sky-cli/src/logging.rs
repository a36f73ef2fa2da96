use std::sync::Once;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("sky=debug,sky_units=debug,sky_cosmo=debug,sky_fits=debug")
        } else {
            EnvFilter::new("sky=info,sky_units=info,sky_cosmo=info,sky_fits=info")
        }
    })
}

/// Installs the global subscriber once; logs go to stderr so command output
/// on stdout stays machine readable.
pub fn init(verbose: bool, json: bool) {
    INIT.call_once(|| {
        let registry = tracing_subscriber::registry().with(env_filter(verbose));
        if json {
            registry
                .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
                .init();
        } else {
            registry
                .with(
                    fmt::layer()
                        .compact()
                        .with_target(verbose)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    });
}
