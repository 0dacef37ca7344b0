//! Optional Tracy hookup.
//!
//! With the `tracy` feature the phase spans opened by `tick()` and by graph
//! construction are forwarded to Tracy, and every finished day emits a
//! secondary frame mark. Without the feature both functions compile to
//! nothing.

/// Install a Tracy layer that records spans at `level` and above.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
#[cfg(feature = "tracy")]
pub fn init_tracy(level: tracing::Level) {
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::prelude::*;

    tracing_subscriber::registry()
        .with(tracing_tracy::TracyLayer::default())
        .with(LevelFilter::from_level(level))
        .init();
}

#[cfg(not(feature = "tracy"))]
pub fn init_tracy(_level: tracing::Level) {}

/// Frame boundary after each simulated day.
#[cfg(feature = "tracy")]
#[inline]
pub(crate) fn frame_mark_tick() {
    tracy_client::secondary_frame_mark!("day");
}

#[cfg(not(feature = "tracy"))]
#[inline]
pub(crate) fn frame_mark_tick() {}
