//! Viewport observation
//!
//! Detects when a target's bounding box crosses a threshold line in the
//! viewport and reports edge-triggered enter/exit events. A target is
//! "in view" once its top edge, in viewport coordinates, sits at or above
//! the line `threshold * viewport.height` - the same convention as the
//! source's `start: "top 80%"` triggers.
//!
//! Events are deduplicated: a subscription never reports the same state
//! twice in a row, no matter how many scroll events arrive.

use drift_core::{TargetId, TargetRegistry};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

/// Visible viewport metrics in logical pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

new_key_type! {
    /// Handle to an active observation
    pub struct SubscriptionId;
}

/// An edge-triggered visibility change
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObserverEvent {
    pub subscription: SubscriptionId,
    /// true on crossing into view, false on crossing back out
    pub entered: bool,
}

struct Subscription {
    target: TargetId,
    /// Fraction of viewport height defining the trigger line
    threshold: f32,
    /// Last reported state; None until the first evaluation
    last_in_view: Option<bool>,
}

/// Tracks threshold subscriptions and reports crossings
pub struct ViewportObserver {
    viewport: Viewport,
    subscriptions: SlotMap<SubscriptionId, Subscription>,
}

impl ViewportObserver {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            subscriptions: SlotMap::with_key(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Update viewport metrics (resize). The next evaluation re-reports
    /// any subscription whose state changed under the new height.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Begin observing `target` against a threshold line
    pub fn observe(&mut self, target: TargetId, threshold: f32) -> SubscriptionId {
        self.subscriptions.insert(Subscription {
            target,
            threshold,
            last_in_view: None,
        })
    }

    /// Stop observing. Symmetrical cleanup for `observe`; calling it for
    /// an already-released subscription is a no-op.
    pub fn unobserve(&mut self, id: SubscriptionId) {
        self.subscriptions.remove(id);
    }

    pub fn is_observing(&self, id: SubscriptionId) -> bool {
        self.subscriptions.contains_key(id)
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// The target behind a subscription, if still subscribed
    pub fn target_of(&self, id: SubscriptionId) -> Option<TargetId> {
        self.subscriptions.get(id).map(|s| s.target)
    }

    /// Evaluate every subscription against the current scroll offset
    ///
    /// Returns one event per subscription whose in-view state changed.
    /// Subscriptions whose target no longer resolves produce nothing
    /// here; the runtime retires their bindings separately.
    pub fn evaluate(
        &mut self,
        scroll_y: f32,
        registry: &TargetRegistry,
    ) -> SmallVec<[ObserverEvent; 4]> {
        let mut events = SmallVec::new();
        let viewport_height = self.viewport.height;

        for (id, sub) in self.subscriptions.iter_mut() {
            let Some(rect) = registry.rect(sub.target) else {
                continue;
            };

            let top_in_viewport = rect.top() - scroll_y;
            let in_view = top_in_viewport <= sub.threshold * viewport_height;

            let changed = match sub.last_in_view {
                None => in_view, // initial state is only worth reporting when visible
                Some(previous) => previous != in_view,
            };
            sub.last_in_view = Some(in_view);

            if changed {
                events.push(ObserverEvent {
                    subscription: id,
                    entered: in_view,
                });
            }
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drift_core::Rect;

    fn setup() -> (ViewportObserver, TargetRegistry, TargetId) {
        let mut registry = TargetRegistry::new();
        // Element 1200px down the document
        let target = registry.create(Rect::new(0.0, 1200.0, 400.0, 100.0));
        let observer = ViewportObserver::new(Viewport::new(1280.0, 800.0));
        (observer, registry, target)
    }

    #[test]
    fn test_enter_fires_once_at_threshold() {
        let (mut observer, registry, target) = setup();
        let sub = observer.observe(target, 0.8);

        // Threshold line sits at 0.8 * 800 = 640px; the element top hits
        // it once scroll_y reaches 1200 - 640 = 560.
        assert!(observer.evaluate(0.0, &registry).is_empty());
        assert!(observer.evaluate(559.0, &registry).is_empty());

        let events = observer.evaluate(560.0, &registry);
        assert_eq!(
            events.as_slice(),
            &[ObserverEvent {
                subscription: sub,
                entered: true
            }]
        );

        // Deeper scrolling reports nothing new
        assert!(observer.evaluate(900.0, &registry).is_empty());
    }

    #[test]
    fn test_exit_fires_on_crossing_back_out() {
        let (mut observer, registry, target) = setup();
        let sub = observer.observe(target, 0.8);

        observer.evaluate(700.0, &registry);
        let events = observer.evaluate(100.0, &registry);
        assert_eq!(
            events.as_slice(),
            &[ObserverEvent {
                subscription: sub,
                entered: false
            }]
        );

        // Repeated exit-side scrolls stay silent
        assert!(observer.evaluate(50.0, &registry).is_empty());
    }

    #[test]
    fn test_initially_visible_target_reports_entered() {
        let mut registry = TargetRegistry::new();
        let target = registry.create(Rect::new(0.0, 100.0, 400.0, 100.0));
        let mut observer = ViewportObserver::new(Viewport::new(1280.0, 800.0));
        let sub = observer.observe(target, 0.8);

        // Above the fold: first evaluation reports it as entered
        let events = observer.evaluate(0.0, &registry);
        assert_eq!(
            events.as_slice(),
            &[ObserverEvent {
                subscription: sub,
                entered: true
            }]
        );
    }

    #[test]
    fn test_unobserve_is_idempotent_and_silences_events() {
        let (mut observer, registry, target) = setup();
        let sub = observer.observe(target, 0.8);

        observer.unobserve(sub);
        observer.unobserve(sub); // second release is a no-op

        assert!(!observer.is_observing(sub));
        assert!(observer.evaluate(700.0, &registry).is_empty());
    }

    #[test]
    fn test_resize_moves_the_threshold_line() {
        let (mut observer, registry, target) = setup();
        observer.observe(target, 0.8);

        // Not in view under the original height
        assert!(observer.evaluate(500.0, &registry).is_empty());

        // A taller viewport pushes the line below the element top
        observer.set_viewport(Viewport::new(1280.0, 1000.0));
        let events = observer.evaluate(500.0, &registry);
        assert_eq!(events.len(), 1);
        assert!(events[0].entered);
    }

    #[test]
    fn test_destroyed_target_produces_no_events() {
        let (mut observer, mut registry, target) = setup();
        observer.observe(target, 0.8);
        registry.remove(target);
        assert!(observer.evaluate(700.0, &registry).is_empty());
    }
}
