//! Drift Animation Engine
//!
//! Keyframe specs, composed timelines, and the tick-driven scheduler.
//!
//! # Features
//!
//! - **Keyframe Specs**: from/to pairs over position, scale, rotation, and
//!   opacity with an easing curve, validated at build time
//! - **Timelines**: ordered entries with absolute or relative offsets;
//!   negative relative offsets overlap the previous entry
//! - **Stagger Expansion**: one spec fanned out over sibling targets with
//!   linearly increasing delay
//! - **Scheduler**: single registry of running timelines, advanced by an
//!   explicit per-frame tick; later-started timelines win property writes
//! - **Idempotent global init**: `ensure_initialized()` may be called
//!   defensively from anywhere and configures the process-wide scheduler
//!   at most once
//!
//! Playback is cooperative: nothing here blocks or spawns threads. The
//! embedding drives [`AnimationScheduler::tick`] from its frame callback.

pub mod easing;
pub mod keyframe;
pub mod scheduler;
pub mod stagger;
pub mod timeline;

pub use easing::Easing;
pub use keyframe::KeyframeSpec;
pub use scheduler::{
    ensure_initialized, is_initialized, try_get_scheduler, AnimationScheduler, SchedulerHandle,
    TimelineHandle,
};
pub use stagger::expand_stagger;
pub use timeline::{KillMode, Position, Timeline, TimelineBuilder, TimelineEntry};
