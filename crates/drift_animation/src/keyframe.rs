//! Keyframe specs
//!
//! A [`KeyframeSpec`] is the from/to description a single timeline entry
//! animates through: one or more visual properties, each with a start and
//! end value, plus the easing curve for the transition. Specs are
//! immutable once built into a timeline.

use crate::easing::Easing;
use drift_core::{DriftError, TargetProps, VisualProperty};
use smallvec::SmallVec;

/// One animated property with its start and end values
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropertyTrack {
    pub property: VisualProperty,
    pub from: f32,
    pub to: f32,
}

/// A from/to keyframe description over one or more properties
///
/// Built with chained property methods, mirroring how the source wrote
/// its tweens:
///
/// ```
/// use drift_animation::{Easing, KeyframeSpec};
///
/// let spec = KeyframeSpec::new()
///     .y(50.0, 0.0)
///     .opacity(0.0, 1.0)
///     .ease(Easing::PowerOut);
/// assert!(spec.validate().is_ok());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyframeSpec {
    tracks: SmallVec<[PropertyTrack; 4]>,
    easing: Easing,
}

impl KeyframeSpec {
    pub fn new() -> Self {
        Self::default()
    }

    fn track(mut self, property: VisualProperty, from: f32, to: f32) -> Self {
        self.tracks.push(PropertyTrack { property, from, to });
        self
    }

    /// Animate horizontal offset
    pub fn x(self, from: f32, to: f32) -> Self {
        self.track(VisualProperty::X, from, to)
    }

    /// Animate vertical offset
    pub fn y(self, from: f32, to: f32) -> Self {
        self.track(VisualProperty::Y, from, to)
    }

    /// Animate uniform scale
    pub fn scale(self, from: f32, to: f32) -> Self {
        self.track(VisualProperty::Scale, from, to)
    }

    /// Animate rotation (degrees)
    pub fn rotation(self, from: f32, to: f32) -> Self {
        self.track(VisualProperty::Rotation, from, to)
    }

    /// Animate opacity
    pub fn opacity(self, from: f32, to: f32) -> Self {
        self.track(VisualProperty::Opacity, from, to)
    }

    /// Set the easing curve for the whole spec
    pub fn ease(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn tracks(&self) -> &[PropertyTrack] {
        &self.tracks
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Reject non-finite values before they can reach visible layout
    pub fn validate(&self) -> Result<(), DriftError> {
        for track in &self.tracks {
            for value in [track.from, track.to] {
                if !value.is_finite() {
                    return Err(DriftError::InvalidKeyframe {
                        property: track.property.name(),
                        value,
                    });
                }
            }
        }
        Ok(())
    }

    /// Write the eased value at progress `t` into `props`
    ///
    /// `t` outside `[0, 1]` clamps to the from/to endpoint, which is what
    /// holds an entry at its start state before its offset is reached.
    pub fn apply(&self, t: f32, props: &mut TargetProps) {
        let eased = self.easing.apply(t);
        for track in &self.tracks {
            props.set(track.property, track.from + (track.to - track.from) * eased);
        }
    }
}
