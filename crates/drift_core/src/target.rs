//! Animation targets
//!
//! An [`TargetId`] is an opaque generational handle to a renderable
//! element. The [`TargetRegistry`] owns the per-target state: the layout
//! rect (document coordinates, used for viewport threshold math) and the
//! mutable visual properties that timelines write.
//!
//! Targets are created during a view's mount and removed at unmount.
//! Generational keys mean a handle held past removal resolves to `None`
//! rather than aliasing a later target.

use slotmap::{new_key_type, SlotMap};
use std::sync::{Arc, Mutex};

new_key_type! {
    /// Handle to a registered animation target
    pub struct TargetId;
}

/// The animatable visual properties of a target
///
/// `x`/`y` are offsets from the layout position, so the resting state is
/// all-zero offsets with scale and opacity at 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetProps {
    /// Horizontal offset from layout position
    pub x: f32,
    /// Vertical offset from layout position
    pub y: f32,
    /// Uniform scale factor
    pub scale: f32,
    /// Rotation in degrees
    pub rotation: f32,
    /// Opacity (0.0 = transparent, 1.0 = opaque)
    pub opacity: f32,
}

impl Default for TargetProps {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            rotation: 0.0,
            opacity: 1.0,
        }
    }
}

impl TargetProps {
    /// Read a property by name
    pub fn get(&self, property: VisualProperty) -> f32 {
        match property {
            VisualProperty::X => self.x,
            VisualProperty::Y => self.y,
            VisualProperty::Scale => self.scale,
            VisualProperty::Rotation => self.rotation,
            VisualProperty::Opacity => self.opacity,
        }
    }

    /// Write a property by name
    pub fn set(&mut self, property: VisualProperty, value: f32) {
        match property {
            VisualProperty::X => self.x = value,
            VisualProperty::Y => self.y = value,
            VisualProperty::Scale => self.scale = value,
            VisualProperty::Rotation => self.rotation = value,
            VisualProperty::Opacity => self.opacity = value,
        }
    }
}

/// The set of properties a keyframe can animate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VisualProperty {
    X,
    Y,
    Scale,
    Rotation,
    Opacity,
}

impl VisualProperty {
    pub fn name(&self) -> &'static str {
        match self {
            VisualProperty::X => "x",
            VisualProperty::Y => "y",
            VisualProperty::Scale => "scale",
            VisualProperty::Rotation => "rotation",
            VisualProperty::Opacity => "opacity",
        }
    }
}

struct TargetState {
    rect: crate::Rect,
    props: TargetProps,
}

/// Registry of live animation targets
///
/// Owned behind [`SharedTargetRegistry`] and consulted by both the
/// animation scheduler (property writes) and the scroll layer (rect
/// reads).
#[derive(Default)]
pub struct TargetRegistry {
    targets: SlotMap<TargetId, TargetState>,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a target with its layout rect, at resting visual state
    pub fn create(&mut self, rect: crate::Rect) -> TargetId {
        self.targets.insert(TargetState {
            rect,
            props: TargetProps::default(),
        })
    }

    /// Remove a target. Handles held elsewhere stop resolving.
    pub fn remove(&mut self, id: TargetId) {
        self.targets.remove(id);
    }

    /// Whether the handle still resolves to a live target
    pub fn contains(&self, id: TargetId) -> bool {
        self.targets.contains_key(id)
    }

    /// Layout rect in document coordinates
    pub fn rect(&self, id: TargetId) -> Option<crate::Rect> {
        self.targets.get(id).map(|t| t.rect)
    }

    /// Update the layout rect (e.g. after a relayout)
    pub fn set_rect(&mut self, id: TargetId, rect: crate::Rect) {
        if let Some(target) = self.targets.get_mut(id) {
            target.rect = rect;
        }
    }

    /// Current visual properties
    pub fn props(&self, id: TargetId) -> Option<TargetProps> {
        self.targets.get(id).map(|t| t.props)
    }

    /// Mutable access to visual properties
    pub fn props_mut(&mut self, id: TargetId) -> Option<&mut TargetProps> {
        self.targets.get_mut(id).map(|t| &mut t.props)
    }

    /// Number of live targets
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Shared registry handle
///
/// Everything runs on one logical thread; the mutex exists so the
/// scheduler and scroll layer can share the registry, not for parallelism.
pub type SharedTargetRegistry = Arc<Mutex<TargetRegistry>>;

/// Create an empty shared registry
pub fn shared_registry() -> SharedTargetRegistry {
    Arc::new(Mutex::new(TargetRegistry::new()))
}
