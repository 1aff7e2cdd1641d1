//! Error taxonomy
//!
//! The surfaced error set is deliberately narrow. Only faults that would
//! corrupt visible layout if ignored (non-finite keyframe values) fail
//! fast; registration against a missing target is logged and dropped, and
//! a repeated teardown is a no-op, so neither appears here.

use thiserror::Error;

/// Errors surfaced synchronously to callers of the animation layer
#[derive(Debug, Error)]
pub enum DriftError {
    /// A keyframe carried a non-finite numeric value. Animating toward
    /// NaN or infinity would corrupt on-screen layout, so this is rejected
    /// at timeline-build time.
    #[error("invalid keyframe: {property} has non-finite value {value}")]
    InvalidKeyframe {
        property: &'static str,
        value: f32,
    },

    /// A timeline was built with no entries
    #[error("timeline has no entries")]
    EmptyTimeline,
}
