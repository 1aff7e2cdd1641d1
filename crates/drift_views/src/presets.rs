//! Animation presets
//!
//! The entrance sequences the sections actually use, with the timings
//! carried over from the original compositions: the hero plays its
//! heading for a full second with the subheading and CTA overlapping its
//! tail, and tag clouds pop in with a back-out overshoot at a 100 ms
//! stagger.

use drift_animation::{
    expand_stagger, Easing, KeyframeSpec, Position, Timeline, TimelineBuilder,
};
use drift_core::{DriftError, TargetId};
use serde::{Deserialize, Serialize};

/// A named entrance sequence over a section's targets
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub enum AnimationPreset {
    /// Heading, subheading, and CTA in an overlapping cascade
    HeroEntrance,
    /// Everything rises and fades in together
    FadeUp { duration_ms: f32 },
    /// Targets pop in one by one with overshoot
    StaggerPop { per_item_delay_ms: f32 },
    /// Targets slide in from the left
    SlideInLeft { distance: f32 },
}

impl AnimationPreset {
    /// Build the preset's timeline over `targets` (caller order matters:
    /// for the hero it is heading, subheading, CTA)
    pub fn build_timeline(&self, targets: &[TargetId]) -> Result<Timeline, DriftError> {
        if targets.is_empty() {
            return Err(DriftError::EmptyTimeline);
        }

        match *self {
            AnimationPreset::HeroEntrance => {
                // Heading 1000ms, subheading overlapping its last 500ms,
                // CTA overlapping the subheading's last 400ms.
                let steps: [(f32, Position, f32); 3] = [
                    (50.0, Position::At(0.0), 1000.0),
                    (30.0, Position::After(-500.0), 800.0),
                    (20.0, Position::After(-400.0), 600.0),
                ];
                let mut builder = TimelineBuilder::new();
                for (&target, &(rise, position, duration)) in targets.iter().zip(steps.iter()) {
                    builder = builder.entry(
                        target,
                        KeyframeSpec::new()
                            .y(rise, 0.0)
                            .opacity(0.0, 1.0)
                            .ease(Easing::PowerOut),
                        position,
                        duration,
                    );
                }
                builder.build()
            }
            AnimationPreset::FadeUp { duration_ms } => {
                let mut builder = TimelineBuilder::new();
                for &target in targets {
                    builder = builder.entry(
                        target,
                        KeyframeSpec::new()
                            .y(40.0, 0.0)
                            .opacity(0.0, 1.0)
                            .ease(Easing::PowerOut),
                        Position::At(0.0),
                        duration_ms,
                    );
                }
                builder.build()
            }
            AnimationPreset::StaggerPop { per_item_delay_ms } => {
                let spec = KeyframeSpec::new()
                    .scale(0.0, 1.0)
                    .opacity(0.0, 1.0)
                    .ease(Easing::BackOut);
                TimelineBuilder::new()
                    .entries(expand_stagger(targets, &spec, per_item_delay_ms, 500.0))
                    .build()
            }
            AnimationPreset::SlideInLeft { distance } => {
                let mut builder = TimelineBuilder::new();
                for &target in targets {
                    builder = builder.entry(
                        target,
                        KeyframeSpec::new()
                            .x(-distance, 0.0)
                            .opacity(0.0, 1.0)
                            .ease(Easing::PowerOut),
                        Position::At(0.0),
                        800.0,
                    );
                }
                builder.build()
            }
        }
    }
}
