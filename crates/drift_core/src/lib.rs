//! Drift Core
//!
//! Foundational primitives shared by the Drift animation stack:
//!
//! - **Geometry**: points, sizes, and rects for layout and viewport math
//! - **Animation Targets**: opaque generational handles to renderable
//!   elements, with their layout rects and mutable visual properties
//! - **Errors**: the narrow error taxonomy surfaced at timeline-build time
//!
//! Targets are created by a view at mount and removed at unmount; every
//! other component holds `TargetId` handles and resolves them through the
//! [`TargetRegistry`], so a target that outlived its view simply stops
//! resolving instead of dangling.

pub mod error;
pub mod geometry;
pub mod target;

pub use error::DriftError;
pub use geometry::{Point, Rect, Size};
pub use target::{
    shared_registry, SharedTargetRegistry, TargetId, TargetProps, TargetRegistry, VisualProperty,
};
