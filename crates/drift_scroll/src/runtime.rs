//! Scroll binding runtime
//!
//! The [`ScrollRuntime`] is the lifecycle owner for everything a view
//! registers: it hosts the viewport observer, routes crossing events into
//! each binding's trigger state machine, maps scrub bindings to timeline
//! progress on every scroll event, and tears a view's bindings down in
//! one call at unmount.
//!
//! Teardown is the contract that matters most here: after
//! [`ScrollRuntime::release_all`] no scroll event can reach a timeline
//! the view registered, every observer subscription is released, and any
//! in-flight timeline is killed to its final keyframe so content is never
//! left half-hidden after navigation.

use crate::trigger::{scrub_progress, ActivationPolicy, TriggerAction, TriggerBinder, TriggerState};
use crate::viewport::{SubscriptionId, Viewport, ViewportObserver};
use drift_animation::{
    expand_stagger, KeyframeSpec, KillMode, Position, SchedulerHandle, Timeline, TimelineBuilder,
    TimelineHandle,
};
use drift_core::{DriftError, SharedTargetRegistry, TargetId};
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Handle to a mounted view's binding set
    pub struct ViewId;
    /// Handle to a scroll binding
    pub struct BindingId;
}

/// Scroll trigger configuration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollOptions {
    /// Enter line as a fraction of viewport height (0.8 = the source's
    /// `"top 80%"`)
    pub threshold: f32,
    /// End line for scrub mapping, as a fraction of viewport height
    pub end_threshold: f32,
    pub policy: ActivationPolicy,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self {
            threshold: 0.8,
            end_threshold: 0.0,
            policy: ActivationPolicy::PlayOnce,
        }
    }
}

impl ScrollOptions {
    /// Fire once when the target top reaches `threshold` of viewport height
    pub fn once(threshold: f32) -> Self {
        Self {
            threshold,
            ..Default::default()
        }
    }

    /// Play on entry, reverse on exit
    pub fn toggle(threshold: f32) -> Self {
        Self {
            threshold,
            policy: ActivationPolicy::PlayReverseOnReEntry,
            ..Default::default()
        }
    }

    /// Scrub timeline progress between the enter and end lines
    pub fn scrub(threshold: f32, end_threshold: f32) -> Self {
        Self {
            threshold,
            end_threshold,
            policy: ActivationPolicy::ScrubWithScrollPosition,
        }
    }
}

struct Binding {
    view: ViewId,
    timeline: TimelineHandle,
    trigger_target: TargetId,
    /// None for manual (pointer-driven) bindings, which never observe
    /// the viewport
    subscription: Option<SubscriptionId>,
    binder: TriggerBinder,
    threshold: f32,
    end_threshold: f32,
}

/// Owns scroll bindings and their per-view lifecycle
pub struct ScrollRuntime {
    scheduler: SchedulerHandle,
    registry: SharedTargetRegistry,
    observer: ViewportObserver,
    bindings: SlotMap<BindingId, Binding>,
    views: SlotMap<ViewId, ()>,
    by_view: FxHashMap<ViewId, Vec<BindingId>>,
    by_subscription: FxHashMap<SubscriptionId, BindingId>,
    last_scroll_y: f32,
}

impl ScrollRuntime {
    pub fn new(
        scheduler: SchedulerHandle,
        registry: SharedTargetRegistry,
        viewport: Viewport,
    ) -> Self {
        Self {
            scheduler,
            registry,
            observer: ViewportObserver::new(viewport),
            bindings: SlotMap::with_key(),
            views: SlotMap::with_key(),
            by_view: FxHashMap::default(),
            by_subscription: FxHashMap::default(),
            last_scroll_y: 0.0,
        }
    }

    /// Register a view about to mount bindings
    pub fn create_view(&mut self) -> ViewId {
        self.views.insert(())
    }

    /// The target registry this runtime reads rects from
    pub fn registry(&self) -> &SharedTargetRegistry {
        &self.registry
    }

    /// Bind a pre-built timeline to a scroll trigger
    ///
    /// Returns None (after a warning) when the trigger target no longer
    /// resolves; the view renders unanimated, which is the recovery the
    /// caller wants.
    pub fn bind_scroll_animation(
        &mut self,
        view: ViewId,
        timeline: Timeline,
        trigger_target: TargetId,
        options: ScrollOptions,
    ) -> Option<BindingId> {
        if !self.views.contains_key(view) {
            tracing::warn!("bind_scroll_animation on an unknown view, dropping registration");
            return None;
        }
        if !self.registry.lock().unwrap().contains(trigger_target) {
            tracing::warn!("scroll binding references a missing target, dropping registration");
            return None;
        }

        let timeline = TimelineHandle::new(self.scheduler.clone(), timeline);
        let subscription = self.observer.observe(trigger_target, options.threshold);
        let mut binder = TriggerBinder::new(options.policy);
        binder.arm();

        let id = self.bindings.insert(Binding {
            view,
            timeline,
            trigger_target,
            subscription: Some(subscription),
            binder,
            threshold: options.threshold,
            end_threshold: options.end_threshold,
        });
        self.by_view.entry(view).or_default().push(id);
        self.by_subscription.insert(subscription, id);
        Some(id)
    }

    /// Bind a timeline under a view without observing the viewport
    ///
    /// For pointer-driven effects (a CTA's hover scale) that are driven
    /// through [`ScrollRuntime::play`] and [`ScrollRuntime::reverse`] but
    /// must still be released together with the view's scroll bindings.
    pub fn bind_manual(
        &mut self,
        view: ViewId,
        timeline: Timeline,
        target: TargetId,
    ) -> Option<BindingId> {
        if !self.views.contains_key(view) {
            tracing::warn!("bind_manual on an unknown view, dropping registration");
            return None;
        }
        if !self.registry.lock().unwrap().contains(target) {
            tracing::warn!("manual binding references a missing target, dropping registration");
            return None;
        }

        let timeline = TimelineHandle::new(self.scheduler.clone(), timeline);
        let id = self.bindings.insert(Binding {
            view,
            timeline,
            trigger_target: target,
            subscription: None,
            binder: TriggerBinder::new(ActivationPolicy::PlayOnce),
            threshold: 0.0,
            end_threshold: 0.0,
        });
        self.by_view.entry(view).or_default().push(id);
        Some(id)
    }

    /// Bind one keyframe spec applied to every target simultaneously
    pub fn bind_entrance(
        &mut self,
        view: ViewId,
        targets: &[TargetId],
        spec: KeyframeSpec,
        duration_ms: f32,
        options: ScrollOptions,
    ) -> Result<Option<BindingId>, DriftError> {
        let live = self.retain_live(targets);
        let Some(&trigger) = live.first() else {
            return Ok(None);
        };

        let mut builder = TimelineBuilder::new();
        for &target in &live {
            builder = builder.entry(target, spec.clone(), Position::At(0.0), duration_ms);
        }
        let timeline = builder.build()?;
        Ok(self.bind_scroll_animation(view, timeline, trigger, options))
    }

    /// Bind one keyframe spec staggered across sibling targets
    pub fn bind_staggered(
        &mut self,
        view: ViewId,
        targets: &[TargetId],
        spec: KeyframeSpec,
        duration_ms: f32,
        per_item_delay_ms: f32,
        options: ScrollOptions,
    ) -> Result<Option<BindingId>, DriftError> {
        let live = self.retain_live(targets);
        let Some(&trigger) = live.first() else {
            return Ok(None);
        };

        let timeline = TimelineBuilder::new()
            .entries(expand_stagger(&live, &spec, per_item_delay_ms, duration_ms))
            .build()?;
        Ok(self.bind_scroll_animation(view, timeline, trigger, options))
    }

    fn retain_live(&self, targets: &[TargetId]) -> Vec<TargetId> {
        let registry = self.registry.lock().unwrap();
        let mut live = Vec::with_capacity(targets.len());
        for &target in targets {
            if registry.contains(target) {
                live.push(target);
            } else {
                tracing::warn!("scroll binding references a missing target, skipping it");
            }
        }
        live
    }

    /// Feed a scroll event through every binding
    pub fn handle_scroll(&mut self, scroll_y: f32) {
        self.last_scroll_y = scroll_y;

        // Retire bindings whose trigger target vanished, then collect
        // crossing events, all under one registry borrow.
        let mut retired: SmallVec<[BindingId; 4]> = SmallVec::new();
        let events = {
            let registry = self.registry.lock().unwrap();
            for (id, binding) in self.bindings.iter_mut() {
                if !binding.binder.is_terminal() && !registry.contains(binding.trigger_target) {
                    binding.binder.retire();
                    retired.push(id);
                }
            }
            self.observer.evaluate(scroll_y, &registry)
        };

        for id in retired {
            if let Some(binding) = self.bindings.get(id) {
                tracing::debug!("trigger target removed, retiring binding");
                if let Some(subscription) = binding.subscription {
                    self.by_subscription.remove(&subscription);
                    self.observer.unobserve(subscription);
                }
            }
        }

        for event in events {
            let Some(&binding_id) = self.by_subscription.get(&event.subscription) else {
                continue;
            };
            let Some(binding) = self.bindings.get_mut(binding_id) else {
                continue;
            };
            let action = if event.entered {
                binding.binder.on_enter()
            } else {
                binding.binder.on_exit()
            };
            match action {
                TriggerAction::Start => binding.timeline.start(),
                TriggerAction::Play => binding.timeline.play(),
                TriggerAction::Reverse => binding.timeline.reverse(),
                TriggerAction::None => {}
            }
        }

        // Scrub bindings track scroll position continuously, not just on
        // crossings.
        let viewport_height = self.observer.viewport().height;
        let scrubs: SmallVec<[(BindingId, f32); 4]> = {
            let registry = self.registry.lock().unwrap();
            self.bindings
                .iter()
                .filter(|(_, b)| b.binder.scrubs())
                .filter_map(|(id, b)| {
                    registry.rect(b.trigger_target).map(|rect| {
                        let progress = scrub_progress(
                            rect.top(),
                            scroll_y,
                            viewport_height,
                            b.threshold,
                            b.end_threshold,
                        );
                        (id, progress)
                    })
                })
                .collect()
        };
        for (id, progress) in scrubs {
            if let Some(binding) = self.bindings.get(id) {
                binding.timeline.seek_progress(progress);
            }
        }
    }

    /// Update viewport metrics and re-evaluate at the last scroll offset
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.observer.set_viewport(viewport);
        self.handle_scroll(self.last_scroll_y);
    }

    /// Manually play a binding's timeline (pointer-enter and similar)
    pub fn play(&self, binding: BindingId) {
        if let Some(b) = self.bindings.get(binding) {
            b.timeline.play();
        }
    }

    /// Manually reverse a binding's timeline (pointer-leave)
    pub fn reverse(&self, binding: BindingId) {
        if let Some(b) = self.bindings.get(binding) {
            b.timeline.reverse();
        }
    }

    /// Release every binding registered under `view`
    ///
    /// Kills in-flight timelines to their final keyframe, releases every
    /// observer subscription, and forgets the view. Calling it again for
    /// the same view is a no-op, tolerating defensive cleanup in callers.
    pub fn release_all(&mut self, view: ViewId) {
        self.views.remove(view);
        let Some(ids) = self.by_view.remove(&view) else {
            tracing::debug!("release_all for a view with no bindings, nothing to do");
            return;
        };

        tracing::debug!(bindings = ids.len(), "releasing view bindings");
        for id in ids {
            if let Some(binding) = self.bindings.remove(id) {
                if let Some(subscription) = binding.subscription {
                    self.observer.unobserve(subscription);
                    self.by_subscription.remove(&subscription);
                }
                binding.timeline.kill(KillMode::ToEnd);
                // Dropping the handle removes the timeline from the
                // scheduler.
            }
        }
    }

    /// Trigger state of a binding, if it still exists
    pub fn binding_state(&self, binding: BindingId) -> Option<TriggerState> {
        self.bindings.get(binding).map(|b| b.binder.state())
    }

    /// Number of bindings currently registered under `view`
    pub fn view_binding_count(&self, view: ViewId) -> usize {
        self.by_view.get(&view).map(Vec::len).unwrap_or(0)
    }

    /// Number of live observer subscriptions
    pub fn subscription_count(&self) -> usize {
        self.observer.subscription_count()
    }

    /// Which view owns a binding
    pub fn owner_of(&self, binding: BindingId) -> Option<ViewId> {
        self.bindings.get(binding).map(|b| b.view)
    }
}
