//! Pointer Trackers - small adapters around pointer input events.
//!
//! Each tracker attaches listeners to a [`input::Surface`], keeps a little
//! derived state (position, pressed buttons, recent clicks, velocity, drag
//! session, smoothed cursor) and reports it to user-supplied observers.

pub mod config;
pub mod error;
pub mod input;
pub mod replay;
pub mod smoothing;
pub mod trackers;

pub use config::TrackersConfig;
pub use error::{TrackerError, TrackerResult};
pub use trackers::{Tracker, TrackerKind};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the tracing subscriber. Later calls are ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pointer_trackers=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
