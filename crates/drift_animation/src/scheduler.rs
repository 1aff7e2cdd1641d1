//! Animation scheduler
//!
//! Owns every registered timeline and advances them each frame. The
//! embedding calls [`AnimationScheduler::tick`] from its per-frame
//! callback; nothing here spawns threads or blocks, matching the
//! single-threaded, event-loop-cooperative model the scroll layer
//! assumes.
//!
//! Timelines register through wrapper types ([`TimelineHandle`]) or the
//! weak [`SchedulerHandle`], and are removed when their wrapper drops.
//!
//! # Write ordering
//!
//! Two timelines may animate the same property of one target (a
//! hover-triggered and a scroll-triggered timeline both touching scale).
//! The scheduler stamps a monotonic sequence on every start/play and
//! applies timelines in ascending stamp order each tick, so the
//! later-started timeline's writes win until it completes or is killed.

use crate::timeline::{KillMode, Timeline};
use drift_core::{shared_registry, SharedTargetRegistry};
use slotmap::{new_key_type, SlotMap};
use std::sync::{Arc, Mutex, OnceLock, Weak};

// ============================================================================
// Global Scheduler State
// ============================================================================

/// Process-wide scheduler, configured at most once
static GLOBAL_SCHEDULER: OnceLock<AnimationScheduler> = OnceLock::new();

/// Initialize the process-wide scheduler if it has not been initialized
/// yet, and return a handle to it.
///
/// Idempotent by design: call sites scattered across view code may all
/// invoke this defensively; only the first call constructs the scheduler.
pub fn ensure_initialized() -> SchedulerHandle {
    GLOBAL_SCHEDULER
        .get_or_init(|| AnimationScheduler::new(shared_registry()))
        .handle()
}

/// Get a handle to the global scheduler (returns None if never initialized)
pub fn try_get_scheduler() -> Option<SchedulerHandle> {
    GLOBAL_SCHEDULER.get().map(|s| s.handle())
}

/// Check whether the global scheduler has been initialized
pub fn is_initialized() -> bool {
    GLOBAL_SCHEDULER.get().is_some()
}

new_key_type! {
    /// Handle to a registered timeline
    pub struct TimelineId;
}

/// Internal state of the animation scheduler
struct SchedulerInner {
    timelines: SlotMap<TimelineId, Timeline>,
    registry: SharedTargetRegistry,
    /// Monotonic stamp source for last-writer-wins ordering
    start_counter: u64,
}

/// The animation scheduler that ticks all registered timelines
///
/// Typically one per application, shared via [`SchedulerHandle`].
pub struct AnimationScheduler {
    inner: Arc<Mutex<SchedulerInner>>,
}

impl AnimationScheduler {
    pub fn new(registry: SharedTargetRegistry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SchedulerInner {
                timelines: SlotMap::with_key(),
                registry,
                start_counter: 0,
            })),
        }
    }

    /// Get a weak handle for passing to components
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// The target registry this scheduler writes to
    pub fn registry(&self) -> SharedTargetRegistry {
        Arc::clone(&self.inner.lock().unwrap().registry)
    }

    /// Advance all playing timelines by a frame delta
    ///
    /// Returns true if any timeline is still playing (needs another tick).
    pub fn tick(&self, dt_ms: f32) -> bool {
        let mut inner = self.inner.lock().unwrap();
        let registry = Arc::clone(&inner.registry);

        // Apply in start order so the most recently started timeline's
        // property writes land last.
        let mut order: Vec<(u64, TimelineId)> = inner
            .timelines
            .iter()
            .map(|(id, t)| (t.start_seq(), id))
            .collect();
        order.sort_unstable();

        let mut registry = registry.lock().unwrap();
        for (_, id) in order {
            if let Some(timeline) = inner.timelines.get_mut(id) {
                timeline.tick(dt_ms, &mut registry);
            }
        }

        inner.timelines.iter().any(|(_, t)| t.is_playing())
    }

    /// Check if any timeline is still playing
    pub fn has_active_animations(&self) -> bool {
        self.inner
            .lock()
            .unwrap()
            .timelines
            .iter()
            .any(|(_, t)| t.is_playing())
    }

    /// Number of registered timelines
    pub fn timeline_count(&self) -> usize {
        self.inner.lock().unwrap().timelines.len()
    }
}

impl Clone for AnimationScheduler {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// A weak handle to the animation scheduler
///
/// Passed to components that register timelines. It won't keep the
/// scheduler alive; every operation no-ops safely after the scheduler
/// drops.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<Mutex<SchedulerInner>>,
}

impl SchedulerHandle {
    /// Register a timeline and return its ID
    pub fn register_timeline(&self, timeline: Timeline) -> Option<TimelineId> {
        self.inner
            .upgrade()
            .map(|inner| inner.lock().unwrap().timelines.insert(timeline))
    }

    /// Remove a timeline
    pub fn remove_timeline(&self, id: TimelineId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.lock().unwrap().timelines.remove(id);
        }
    }

    /// The target registry behind this scheduler
    pub fn registry(&self) -> Option<SharedTargetRegistry> {
        self.inner
            .upgrade()
            .map(|inner| Arc::clone(&inner.lock().unwrap().registry))
    }

    fn with_timeline_and_registry<F, R>(&self, id: TimelineId, f: F) -> Option<R>
    where
        F: FnOnce(&mut Timeline, &mut drift_core::TargetRegistry, &mut u64) -> R,
    {
        self.inner.upgrade().and_then(|inner| {
            let mut guard = inner.lock().unwrap();
            let registry = Arc::clone(&guard.registry);
            let mut registry = registry.lock().unwrap();
            let SchedulerInner {
                timelines,
                start_counter,
                ..
            } = &mut *guard;
            timelines
                .get_mut(id)
                .map(|timeline| f(timeline, &mut registry, start_counter))
        })
    }

    /// Restart a timeline from time zero, applying initial keyframes
    pub fn start_timeline(&self, id: TimelineId) {
        self.with_timeline_and_registry(id, |timeline, registry, counter| {
            *counter += 1;
            timeline.set_start_seq(*counter);
            timeline.start(registry);
        });
    }

    /// Resume a timeline forward from its current time
    pub fn play_timeline(&self, id: TimelineId) {
        self.with_timeline_and_registry(id, |timeline, _, counter| {
            *counter += 1;
            timeline.set_start_seq(*counter);
            timeline.play();
        });
    }

    /// Reverse a timeline from its current time
    pub fn reverse_timeline(&self, id: TimelineId) {
        self.with_timeline_and_registry(id, |timeline, _, counter| {
            *counter += 1;
            timeline.set_start_seq(*counter);
            timeline.reverse();
        });
    }

    /// Scrub a timeline to a progress fraction, applying immediately
    pub fn seek_timeline_progress(&self, id: TimelineId, progress: f32) {
        self.with_timeline_and_registry(id, |timeline, registry, _| {
            timeline.seek_progress(progress, registry);
        });
    }

    /// Kill a timeline, rolling back to the given end state. Idempotent.
    pub fn kill_timeline(&self, id: TimelineId, mode: KillMode) {
        self.with_timeline_and_registry(id, |timeline, registry, _| {
            timeline.kill(mode, registry);
        });
    }

    /// Check if a timeline is playing
    pub fn is_timeline_playing(&self, id: TimelineId) -> bool {
        self.inner
            .upgrade()
            .and_then(|inner| {
                inner
                    .lock()
                    .unwrap()
                    .timelines
                    .get(id)
                    .map(|t| t.is_playing())
            })
            .unwrap_or(false)
    }

    /// Get a timeline's overall progress (0.0 to 1.0)
    pub fn timeline_progress(&self, id: TimelineId) -> Option<f32> {
        self.inner.upgrade().and_then(|inner| {
            inner
                .lock()
                .unwrap()
                .timelines
                .get(id)
                .map(|t| t.progress())
        })
    }

    /// Apply a function to a timeline if it exists
    pub fn with_timeline<F, R>(&self, id: TimelineId, f: F) -> Option<R>
    where
        F: FnOnce(&mut Timeline) -> R,
    {
        self.inner.upgrade().and_then(|inner| {
            inner
                .lock()
                .unwrap()
                .timelines
                .get_mut(id)
                .map(|timeline| f(timeline))
        })
    }

    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

// ============================================================================
// Timeline Handle
// ============================================================================

/// An owning handle to a registered timeline
///
/// Registers the timeline on construction and removes it when dropped, so
/// a timeline can never outlive the component that created it.
pub struct TimelineHandle {
    handle: SchedulerHandle,
    id: Option<TimelineId>,
}

impl TimelineHandle {
    /// Register `timeline` with the scheduler behind `handle`
    pub fn new(handle: SchedulerHandle, timeline: Timeline) -> Self {
        let id = handle.register_timeline(timeline);
        Self { handle, id }
    }

    pub fn id(&self) -> Option<TimelineId> {
        self.id
    }

    /// Restart from time zero, applying initial keyframes immediately
    pub fn start(&self) {
        if let Some(id) = self.id {
            self.handle.start_timeline(id);
        }
    }

    /// Resume forward from the current time
    pub fn play(&self) {
        if let Some(id) = self.id {
            self.handle.play_timeline(id);
        }
    }

    /// Reverse from the current time
    pub fn reverse(&self) {
        if let Some(id) = self.id {
            self.handle.reverse_timeline(id);
        }
    }

    /// Scrub to a progress fraction
    pub fn seek_progress(&self, progress: f32) {
        if let Some(id) = self.id {
            self.handle.seek_timeline_progress(id, progress);
        }
    }

    /// Cancel immediately, rolling back to the given end state
    pub fn kill(&self, mode: KillMode) {
        if let Some(id) = self.id {
            self.handle.kill_timeline(id, mode);
        }
    }

    pub fn is_playing(&self) -> bool {
        self.id
            .map(|id| self.handle.is_timeline_playing(id))
            .unwrap_or(false)
    }

    pub fn progress(&self) -> f32 {
        self.id
            .and_then(|id| self.handle.timeline_progress(id))
            .unwrap_or(0.0)
    }
}

impl Drop for TimelineHandle {
    fn drop(&mut self) {
        if let Some(id) = self.id {
            self.handle.remove_timeline(id);
        }
    }
}
