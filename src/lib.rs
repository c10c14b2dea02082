//! strokecore - blend-mode compositing and brush dynamics for a painting app
//!
//! `blend` composites a layer over a backdrop pixel by pixel; `dynamics`
//! turns pen input into the factors that drive each brush dab.

pub mod blend;
pub mod core;
pub mod dynamics;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the default tracing subscriber.
///
/// The filter comes from `RUST_LOG` and falls back to `strokecore=debug`.
/// Calling this again after a subscriber is set does nothing.
pub fn init_logging() {
    let result = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "strokecore=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if result.is_ok() {
        tracing::info!("strokecore logging initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice() {
        init_logging();
        init_logging();
    }
}
