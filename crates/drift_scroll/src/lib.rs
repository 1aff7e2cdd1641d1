//! Drift Scroll Layer
//!
//! Binds timelines to scroll position: the viewport observer detects
//! threshold crossings, the trigger binder decides what a crossing means
//! under its activation policy, and the [`ScrollRuntime`] owns every
//! binding a view registers and guarantees release at unmount.
//!
//! # Flow
//!
//! A view mounts, registers bindings via
//! [`ScrollRuntime::bind_scroll_animation`] (or the entrance/stagger
//! helpers), and the embedding forwards scroll events to
//! [`ScrollRuntime::handle_scroll`]. Threshold crossings advance the
//! trigger state machine, which starts, resumes, or reverses the bound
//! timeline; scrub bindings map scroll position straight to timeline
//! progress instead. [`ScrollRuntime::release_all`] at unmount kills any
//! in-flight timeline to its end state and drops every subscription, so
//! nothing a view registered can outlive it.

pub mod runtime;
pub mod trigger;
pub mod viewport;

pub use runtime::{BindingId, ScrollOptions, ScrollRuntime, ViewId};
pub use trigger::{ActivationPolicy, TriggerAction, TriggerBinder, TriggerState};
pub use viewport::{ObserverEvent, SubscriptionId, Viewport, ViewportObserver};
