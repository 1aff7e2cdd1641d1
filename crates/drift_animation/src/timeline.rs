//! Composed animation timelines
//!
//! A [`Timeline`] is an ordered sequence of entries, each pairing a target
//! with a [`KeyframeSpec`], an offset within the timeline, and a duration.
//! Entries may be positioned absolutely or relative to the previous
//! entry's end; a negative relative position starts an entry before the
//! previous one finishes, producing perceptual overlap.
//!
//! Playback is time-based and symmetric: `play` advances toward the end,
//! `reverse` flips direction from the current time, and `kill` cancels
//! immediately, rolling visual state back to either the initial or final
//! keyframe. A killed timeline is terminal; further control calls are
//! no-ops.

use crate::keyframe::KeyframeSpec;
use drift_core::{DriftError, TargetId, TargetRegistry};
use smallvec::SmallVec;

/// Where a new entry starts within the timeline
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Position {
    /// Absolute offset from the timeline start, in milliseconds
    At(f32),
    /// Relative to the previous entry's end, in milliseconds.
    /// Negative values overlap the previous entry (`After(-400.0)` starts
    /// 400 ms before it finishes). Resolved starts clamp at 0.
    After(f32),
}

/// One scheduled keyframe application within a timeline
#[derive(Clone, Debug)]
pub struct TimelineEntry {
    pub target: TargetId,
    pub spec: KeyframeSpec,
    /// Absolute start offset within the timeline, in milliseconds
    pub offset_ms: f32,
    pub duration_ms: f32,
    /// Set once the first missing-target warning for this entry has fired
    warned: bool,
}

impl TimelineEntry {
    pub fn new(target: TargetId, spec: KeyframeSpec, offset_ms: f32, duration_ms: f32) -> Self {
        Self {
            target,
            spec,
            offset_ms,
            duration_ms,
            warned: false,
        }
    }

    fn end_ms(&self) -> f32 {
        self.offset_ms + self.duration_ms
    }
}

/// Playback direction
#[derive(Clone, Copy, Debug, PartialEq)]
enum Direction {
    Forward,
    Reverse,
}

/// Builder for composed timelines
///
/// ```
/// use drift_animation::{Easing, KeyframeSpec, Position, TimelineBuilder};
/// use drift_core::{Rect, TargetRegistry};
///
/// let mut registry = TargetRegistry::new();
/// let heading = registry.create(Rect::new(0.0, 100.0, 400.0, 60.0));
/// let cta = registry.create(Rect::new(0.0, 200.0, 120.0, 40.0));
///
/// let timeline = TimelineBuilder::new()
///     .entry(
///         heading,
///         KeyframeSpec::new().y(50.0, 0.0).opacity(0.0, 1.0),
///         Position::At(0.0),
///         1000.0,
///     )
///     .entry(
///         cta,
///         KeyframeSpec::new().y(20.0, 0.0).opacity(0.0, 1.0),
///         Position::After(-400.0), // overlap the heading's tail
///         600.0,
///     )
///     .build()
///     .unwrap();
/// assert_eq!(timeline.duration_ms(), 1200.0);
/// ```
#[derive(Default)]
pub struct TimelineBuilder {
    entries: SmallVec<[TimelineEntry; 8]>,
}

impl TimelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Insertion order defines the default sequencing
    /// and, within a timeline, which entry wins overlapping property
    /// writes (later entries apply last).
    pub fn entry(
        mut self,
        target: TargetId,
        spec: KeyframeSpec,
        position: Position,
        duration_ms: f32,
    ) -> Self {
        let offset_ms = match position {
            Position::At(ms) => ms,
            Position::After(rel) => {
                let prev_end = self.entries.last().map(|e| e.end_ms()).unwrap_or(0.0);
                (prev_end + rel).max(0.0)
            }
        };
        self.entries
            .push(TimelineEntry::new(target, spec, offset_ms, duration_ms));
        self
    }

    /// Append pre-expanded entries (e.g. from the stagger expander)
    pub fn entries(mut self, entries: impl IntoIterator<Item = TimelineEntry>) -> Self {
        self.entries.extend(entries);
        self
    }

    /// Validate every spec and offset and produce the timeline
    pub fn build(self) -> Result<Timeline, DriftError> {
        if self.entries.is_empty() {
            return Err(DriftError::EmptyTimeline);
        }
        for entry in &self.entries {
            entry.spec.validate()?;
            for (name, value) in [("offset", entry.offset_ms), ("duration", entry.duration_ms)] {
                if !value.is_finite() || value < 0.0 {
                    return Err(DriftError::InvalidKeyframe {
                        property: name,
                        value,
                    });
                }
            }
        }

        let duration_ms = self
            .entries
            .iter()
            .map(TimelineEntry::end_ms)
            .fold(0.0, f32::max);

        Ok(Timeline {
            entries: self.entries,
            duration_ms,
            current_time: 0.0,
            direction: Direction::Forward,
            playing: false,
            killed: false,
            start_seq: 0,
        })
    }
}

/// What visual state a killed timeline rolls back to
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KillMode {
    /// Snap every entry to its initial keyframe
    ToStart,
    /// Snap every entry to its final keyframe
    ToEnd,
}

/// An ordered, composed animation sequence over one or more targets
pub struct Timeline {
    entries: SmallVec<[TimelineEntry; 8]>,
    duration_ms: f32,
    current_time: f32,
    direction: Direction,
    playing: bool,
    killed: bool,
    /// Monotonic sequence stamped by the scheduler on start/play, used to
    /// order property writes across timelines (last started wins)
    start_seq: u64,
}

impl Timeline {
    /// Total duration: `max(entry.offset + entry.duration)` over entries
    pub fn duration_ms(&self) -> f32 {
        self.duration_ms
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_killed(&self) -> bool {
        self.killed
    }

    /// Overall progress, 0.0 to 1.0
    pub fn progress(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (self.current_time / self.duration_ms).clamp(0.0, 1.0)
    }

    pub(crate) fn start_seq(&self) -> u64 {
        self.start_seq
    }

    pub(crate) fn set_start_seq(&mut self, seq: u64) {
        self.start_seq = seq;
    }

    /// Reset to time zero and begin playing forward, applying every
    /// entry's initial keyframe immediately (elements about to animate in
    /// must not flash their resting state first).
    pub fn start(&mut self, registry: &mut TargetRegistry) {
        if self.killed {
            return;
        }
        self.current_time = 0.0;
        self.direction = Direction::Forward;
        self.playing = true;
        self.apply(registry);
    }

    /// Resume playing forward from the current time
    pub fn play(&mut self) {
        if self.killed {
            return;
        }
        self.direction = Direction::Forward;
        self.playing = self.current_time < self.duration_ms;
    }

    /// Flip direction and play back toward time zero
    pub fn reverse(&mut self) {
        if self.killed {
            return;
        }
        self.direction = Direction::Reverse;
        self.playing = self.current_time > 0.0;
    }

    /// Pause without losing the current time
    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Jump to an absolute time and apply the resulting state
    pub fn seek(&mut self, time_ms: f32, registry: &mut TargetRegistry) {
        if self.killed {
            return;
        }
        self.current_time = time_ms.clamp(0.0, self.duration_ms);
        self.apply(registry);
    }

    /// Jump to a progress fraction (0.0 to 1.0); the scrub policy drives
    /// this on every scroll event
    pub fn seek_progress(&mut self, progress: f32, registry: &mut TargetRegistry) {
        self.seek(progress.clamp(0.0, 1.0) * self.duration_ms, registry);
    }

    /// Cancel immediately and roll visual state back to a defined end
    ///
    /// Idempotent: killing an already-killed timeline is a no-op and the
    /// visual state after two calls equals the state after one.
    pub fn kill(&mut self, mode: KillMode, registry: &mut TargetRegistry) {
        if self.killed {
            return;
        }
        self.killed = true;
        self.playing = false;
        self.current_time = match mode {
            KillMode::ToStart => 0.0,
            KillMode::ToEnd => self.duration_ms,
        };
        self.apply_internal(registry);
    }

    /// Advance by a frame delta and apply the resulting state
    pub fn tick(&mut self, dt_ms: f32, registry: &mut TargetRegistry) {
        if !self.playing {
            return;
        }

        match self.direction {
            Direction::Forward => {
                self.current_time += dt_ms;
                if self.current_time >= self.duration_ms {
                    self.current_time = self.duration_ms;
                    self.playing = false;
                }
            }
            Direction::Reverse => {
                self.current_time -= dt_ms;
                if self.current_time <= 0.0 {
                    self.current_time = 0.0;
                    self.playing = false;
                }
            }
        }

        self.apply(registry);
    }

    /// Apply every entry's value at the current time, in entry order
    fn apply(&mut self, registry: &mut TargetRegistry) {
        if self.killed {
            return;
        }
        self.apply_internal(registry);
    }

    fn apply_internal(&mut self, registry: &mut TargetRegistry) {
        let time = self.current_time;
        for entry in &mut self.entries {
            let Some(props) = registry.props_mut(entry.target) else {
                // Views may unmount mid-sequence; a vanished target is
                // skipped, not fatal.
                if !entry.warned {
                    entry.warned = true;
                    tracing::warn!(
                        offset_ms = entry.offset_ms,
                        "timeline entry references a destroyed target, skipping"
                    );
                }
                continue;
            };

            let local_t = if entry.duration_ms <= 0.0 {
                if time >= entry.offset_ms {
                    1.0
                } else {
                    0.0
                }
            } else {
                (time - entry.offset_ms) / entry.duration_ms
            };
            entry.spec.apply(local_t, props);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use drift_core::Rect;

    fn registry_with(n: usize) -> (TargetRegistry, Vec<TargetId>) {
        let mut registry = TargetRegistry::new();
        let ids = (0..n)
            .map(|i| registry.create(Rect::new(0.0, i as f32 * 100.0, 200.0, 80.0)))
            .collect();
        (registry, ids)
    }

    fn fade() -> KeyframeSpec {
        KeyframeSpec::new()
            .opacity(0.0, 1.0)
            .y(50.0, 0.0)
            .ease(Easing::Linear)
    }

    #[test]
    fn test_duration_is_max_end_regardless_of_order() {
        let (_, ids) = registry_with(3);

        let forward = TimelineBuilder::new()
            .entry(ids[0], fade(), Position::At(0.0), 1000.0)
            .entry(ids[1], fade(), Position::At(500.0), 800.0)
            .entry(ids[2], fade(), Position::At(200.0), 300.0)
            .build()
            .unwrap();

        let shuffled = TimelineBuilder::new()
            .entry(ids[2], fade(), Position::At(200.0), 300.0)
            .entry(ids[1], fade(), Position::At(500.0), 800.0)
            .entry(ids[0], fade(), Position::At(0.0), 1000.0)
            .build()
            .unwrap();

        assert_eq!(forward.duration_ms(), 1300.0);
        assert_eq!(shuffled.duration_ms(), 1300.0);
    }

    #[test]
    fn test_relative_overlap_positions() {
        let (_, ids) = registry_with(3);

        // Heading 1000ms, subheading overlaps by 500ms, CTA by 400ms -
        // the hero sequence shape.
        let timeline = TimelineBuilder::new()
            .entry(ids[0], fade(), Position::At(0.0), 1000.0)
            .entry(ids[1], fade(), Position::After(-500.0), 800.0)
            .entry(ids[2], fade(), Position::After(-400.0), 600.0)
            .build()
            .unwrap();

        assert_eq!(timeline.entries[0].offset_ms, 0.0);
        assert_eq!(timeline.entries[1].offset_ms, 500.0);
        assert_eq!(timeline.entries[2].offset_ms, 900.0);
        assert_eq!(timeline.duration_ms(), 1500.0);
    }

    #[test]
    fn test_relative_position_clamps_at_zero() {
        let (_, ids) = registry_with(1);
        let timeline = TimelineBuilder::new()
            .entry(ids[0], fade(), Position::After(-250.0), 100.0)
            .build()
            .unwrap();
        assert_eq!(timeline.entries[0].offset_ms, 0.0);
    }

    #[test]
    fn test_build_rejects_non_finite_spec() {
        let (_, ids) = registry_with(1);
        let result = TimelineBuilder::new()
            .entry(
                ids[0],
                KeyframeSpec::new().opacity(0.0, f32::NAN),
                Position::At(0.0),
                100.0,
            )
            .build();
        assert!(matches!(result, Err(DriftError::InvalidKeyframe { .. })));
    }

    #[test]
    fn test_build_rejects_empty() {
        assert!(matches!(
            TimelineBuilder::new().build(),
            Err(DriftError::EmptyTimeline)
        ));
    }

    #[test]
    fn test_start_applies_initial_keyframes() {
        let (mut registry, ids) = registry_with(2);
        let mut timeline = TimelineBuilder::new()
            .entry(ids[0], fade(), Position::At(0.0), 1000.0)
            .entry(ids[1], fade(), Position::At(500.0), 500.0)
            .build()
            .unwrap();

        timeline.start(&mut registry);

        // Both entries sit at their from state, including the one whose
        // offset has not been reached yet.
        assert_eq!(registry.props(ids[0]).unwrap().opacity, 0.0);
        assert_eq!(registry.props(ids[1]).unwrap().opacity, 0.0);
        assert_eq!(registry.props(ids[1]).unwrap().y, 50.0);
    }

    #[test]
    fn test_tick_reaches_end_state_and_stops() {
        let (mut registry, ids) = registry_with(1);
        let mut timeline = TimelineBuilder::new()
            .entry(ids[0], fade(), Position::At(0.0), 1000.0)
            .build()
            .unwrap();

        timeline.start(&mut registry);
        for _ in 0..70 {
            timeline.tick(16.0, &mut registry);
        }

        assert!(!timeline.is_playing());
        assert_eq!(timeline.progress(), 1.0);
        let props = registry.props(ids[0]).unwrap();
        assert_eq!(props.opacity, 1.0);
        assert_eq!(props.y, 0.0);
    }

    #[test]
    fn test_reverse_returns_to_initial_state() {
        let (mut registry, ids) = registry_with(1);
        let mut timeline = TimelineBuilder::new()
            .entry(ids[0], fade(), Position::At(0.0), 500.0)
            .build()
            .unwrap();

        timeline.start(&mut registry);
        for _ in 0..40 {
            timeline.tick(16.0, &mut registry);
        }
        assert_eq!(registry.props(ids[0]).unwrap().opacity, 1.0);

        timeline.reverse();
        for _ in 0..40 {
            timeline.tick(16.0, &mut registry);
        }
        assert!(!timeline.is_playing());
        assert_eq!(registry.props(ids[0]).unwrap().opacity, 0.0);
        assert_eq!(registry.props(ids[0]).unwrap().y, 50.0);
    }

    #[test]
    fn test_kill_is_idempotent() {
        let (mut registry, ids) = registry_with(1);
        let mut timeline = TimelineBuilder::new()
            .entry(ids[0], fade(), Position::At(0.0), 1000.0)
            .build()
            .unwrap();

        timeline.start(&mut registry);
        timeline.tick(100.0, &mut registry);

        timeline.kill(KillMode::ToEnd, &mut registry);
        let after_once = registry.props(ids[0]).unwrap();
        assert_eq!(after_once.opacity, 1.0);
        assert!(!timeline.is_playing());

        // Second kill (even with the other mode) is a no-op
        timeline.kill(KillMode::ToStart, &mut registry);
        assert_eq!(registry.props(ids[0]).unwrap(), after_once);

        // Terminal: no further playback
        timeline.play();
        timeline.tick(16.0, &mut registry);
        assert!(!timeline.is_playing());
        assert_eq!(registry.props(ids[0]).unwrap(), after_once);
    }

    #[test]
    fn test_destroyed_target_is_skipped() {
        let (mut registry, ids) = registry_with(2);
        let mut timeline = TimelineBuilder::new()
            .entry(ids[0], fade(), Position::At(0.0), 500.0)
            .entry(ids[1], fade(), Position::At(0.0), 500.0)
            .build()
            .unwrap();

        timeline.start(&mut registry);
        registry.remove(ids[0]);

        // Ticking past the removal must not panic and must keep driving
        // the surviving entry.
        for _ in 0..40 {
            timeline.tick(16.0, &mut registry);
        }
        assert_eq!(registry.props(ids[1]).unwrap().opacity, 1.0);
    }

    #[test]
    fn test_seek_progress_scrubs() {
        let (mut registry, ids) = registry_with(1);
        let mut timeline = TimelineBuilder::new()
            .entry(
                ids[0],
                KeyframeSpec::new().opacity(0.0, 1.0).ease(Easing::Linear),
                Position::At(0.0),
                1000.0,
            )
            .build()
            .unwrap();

        timeline.seek_progress(0.25, &mut registry);
        assert!((registry.props(ids[0]).unwrap().opacity - 0.25).abs() < 1e-4);

        timeline.seek_progress(2.0, &mut registry);
        assert_eq!(registry.props(ids[0]).unwrap().opacity, 1.0);
    }
}
