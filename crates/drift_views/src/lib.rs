//! Drift View Layer
//!
//! The thin presentation surface over the animation and scroll crates:
//!
//! - **Section**: one parameterized view (background style, copy, CTA,
//!   animation preset) standing in for the per-page section variants it
//!   replaces
//! - **Presets**: the entrance sequences the sections actually use, with
//!   the original timings
//! - **Motion Settings**: TOML-backed defaults (trigger threshold,
//!   stagger increment, reduced-motion switch)
//!
//! A section creates its targets and scroll bindings at mount and
//! releases all of them at unmount; nothing it registers can outlive it.

pub mod presets;
pub mod section;
pub mod settings;

pub use presets::AnimationPreset;
pub use section::{BackgroundStyle, CtaConfig, Section, SectionConfig};
pub use settings::MotionSettings;
