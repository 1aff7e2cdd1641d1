//! Stagger expansion
//!
//! Fans a single keyframe spec out over a homogeneous collection of
//! sibling targets (cards, tags, nav items) with a linearly increasing
//! per-item delay. Caller order is preserved; it is what gives the
//! left-to-right / top-to-bottom stagger feel.

use crate::keyframe::KeyframeSpec;
use crate::timeline::TimelineEntry;
use drift_core::TargetId;

/// Expand `targets` into timeline entries where entry *i* starts at
/// `i * per_item_delay_ms`
pub fn expand_stagger(
    targets: &[TargetId],
    spec: &KeyframeSpec,
    per_item_delay_ms: f32,
    duration_ms: f32,
) -> Vec<TimelineEntry> {
    targets
        .iter()
        .enumerate()
        .map(|(i, &target)| {
            TimelineEntry::new(
                target,
                spec.clone(),
                i as f32 * per_item_delay_ms,
                duration_ms,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::timeline::TimelineBuilder;
    use drift_core::{Rect, TargetRegistry};

    fn pop() -> KeyframeSpec {
        KeyframeSpec::new()
            .scale(0.0, 1.0)
            .opacity(0.0, 1.0)
            .ease(Easing::BackOut)
    }

    #[test]
    fn test_offsets_increase_linearly_in_order() {
        let mut registry = TargetRegistry::new();
        let targets: Vec<_> = (0..3)
            .map(|i| registry.create(Rect::new(i as f32 * 60.0, 400.0, 50.0, 20.0)))
            .collect();

        let entries = expand_stagger(&targets, &pop(), 100.0, 500.0);

        assert_eq!(entries.len(), 3);
        for (i, entry) in entries.iter().enumerate() {
            assert_eq!(entry.offset_ms, i as f32 * 100.0);
            assert_eq!(entry.duration_ms, 500.0);
            assert_eq!(entry.target, targets[i]);
        }
    }

    #[test]
    fn test_staggered_timeline_duration() {
        let mut registry = TargetRegistry::new();
        let targets: Vec<_> = (0..5)
            .map(|i| registry.create(Rect::new(i as f32 * 60.0, 400.0, 50.0, 20.0)))
            .collect();

        let timeline = TimelineBuilder::new()
            .entries(expand_stagger(&targets, &pop(), 100.0, 500.0))
            .build()
            .unwrap();

        // Last entry starts at 4 * 100 and runs for 500
        assert_eq!(timeline.duration_ms(), 900.0);
    }

    #[test]
    fn test_empty_target_list_expands_to_nothing() {
        let entries = expand_stagger(&[], &pop(), 100.0, 500.0);
        assert!(entries.is_empty());
    }
}
