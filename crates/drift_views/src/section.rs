//! The parameterized section view
//!
//! One [`Section`] type covers every page section variant: hero, skills
//! cloud, project showcase, contact. A config picks the background
//! style, copy, CTA, and entrance preset; mounting creates the targets
//! and scroll bindings, unmounting releases every one of them. A section
//! never leaks a binding past its own lifetime.

use crate::presets::AnimationPreset;
use crate::settings::MotionSettings;
use drift_animation::{Easing, KeyframeSpec, Position, TimelineBuilder};
use drift_core::{DriftError, Rect, TargetId};
use drift_scroll::{ActivationPolicy, BindingId, ScrollOptions, ScrollRuntime, ViewId};

/// How the section paints behind its content
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackgroundStyle {
    /// Flat fill, no scroll reaction
    #[default]
    Solid,
    /// Gradient that drifts upward as the section scrolls through
    GradientShift,
    /// Particle field that rotates slowly with scroll position
    Starfield,
}

/// Call-to-action button copy and destination
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CtaConfig {
    pub label: String,
    /// Anchor the button scrolls to when activated
    pub target_anchor: String,
}

/// Everything that varies between section instances
#[derive(Clone, Debug)]
pub struct SectionConfig {
    pub name: String,
    pub background: BackgroundStyle,
    pub heading: String,
    pub body: String,
    pub cta: Option<CtaConfig>,
    /// Sibling labels animated as a group (skill tags, project cards)
    pub items: Vec<String>,
    pub preset: AnimationPreset,
    /// Per-section override; None falls back to the site default
    pub threshold: Option<f32>,
    pub policy: ActivationPolicy,
}

impl SectionConfig {
    pub fn new(name: impl Into<String>, heading: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            background: BackgroundStyle::Solid,
            heading: heading.into(),
            body: String::new(),
            cta: None,
            items: Vec::new(),
            preset: AnimationPreset::FadeUp { duration_ms: 600.0 },
            threshold: None,
            policy: ActivationPolicy::PlayOnce,
        }
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn cta(mut self, label: impl Into<String>, target_anchor: impl Into<String>) -> Self {
        self.cta = Some(CtaConfig {
            label: label.into(),
            target_anchor: target_anchor.into(),
        });
        self
    }

    pub fn items(mut self, items: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.items = items.into_iter().map(Into::into).collect();
        self
    }

    pub fn background(mut self, background: BackgroundStyle) -> Self {
        self.background = background;
        self
    }

    pub fn preset(mut self, preset: AnimationPreset) -> Self {
        self.preset = preset;
        self
    }

    pub fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn policy(mut self, policy: ActivationPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// A mounted (or mountable) page section
///
/// Holds the target ids and binding ids it registered so
/// [`Section::unmount`] can release exactly what [`Section::mount`]
/// created.
pub struct Section {
    config: SectionConfig,
    mounted: bool,
    view: Option<ViewId>,
    background_target: Option<TargetId>,
    heading_target: Option<TargetId>,
    body_target: Option<TargetId>,
    cta_target: Option<TargetId>,
    item_targets: Vec<TargetId>,
    hover_binding: Option<BindingId>,
}

// Fixed layout metrics; real geometry comes from the host's layout pass
// via TargetRegistry::set_rect.
const SECTION_WIDTH: f32 = 1280.0;
const SECTION_HEIGHT: f32 = 800.0;
const CONTENT_X: f32 = 64.0;

impl Section {
    pub fn new(config: SectionConfig) -> Self {
        Self {
            config,
            mounted: false,
            view: None,
            background_target: None,
            heading_target: None,
            body_target: None,
            cta_target: None,
            item_targets: Vec::new(),
            hover_binding: None,
        }
    }

    pub fn config(&self) -> &SectionConfig {
        &self.config
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn view(&self) -> Option<ViewId> {
        self.view
    }

    pub fn heading_target(&self) -> Option<TargetId> {
        self.heading_target
    }

    pub fn item_targets(&self) -> &[TargetId] {
        &self.item_targets
    }

    /// Create this section's targets and register its scroll bindings
    ///
    /// `origin_y` is the section's top edge in document coordinates.
    /// With `reduced_motion` set the targets are created in their resting
    /// state and no bindings are registered at all. Mounting twice is a
    /// no-op.
    pub fn mount(
        &mut self,
        runtime: &mut ScrollRuntime,
        origin_y: f32,
        settings: &MotionSettings,
    ) -> Result<(), DriftError> {
        if self.mounted {
            tracing::debug!(section = %self.config.name, "mount on a mounted section, ignoring");
            return Ok(());
        }

        self.create_targets(runtime, origin_y);
        self.mounted = true;

        if settings.reduced_motion {
            tracing::debug!(
                section = %self.config.name,
                "reduced motion, section mounts in its end state"
            );
            return Ok(());
        }

        let view = runtime.create_view();
        self.view = Some(view);
        let threshold = self.config.threshold.unwrap_or(settings.default_threshold);
        let options = ScrollOptions {
            threshold,
            end_threshold: 0.0,
            policy: self.config.policy,
        };

        self.bind_entrance(runtime, view, options)?;

        // Items not covered by the entrance preset pop in as a group.
        if !self.item_targets.is_empty()
            && !matches!(self.config.preset, AnimationPreset::StaggerPop { .. })
        {
            let spec = KeyframeSpec::new()
                .scale(0.0, 1.0)
                .opacity(0.0, 1.0)
                .ease(Easing::BackOut);
            let _ = runtime.bind_staggered(
                view,
                &self.item_targets,
                spec,
                500.0,
                settings.stagger_ms,
                ScrollOptions::once(threshold),
            )?;
        }

        self.bind_background(runtime, view)?;
        self.bind_cta_hover(runtime, view)?;

        tracing::debug!(
            section = %self.config.name,
            bindings = runtime.view_binding_count(view),
            "section mounted"
        );
        Ok(())
    }

    /// Release every binding and target this section registered
    ///
    /// Safe to call on an unmounted section.
    pub fn unmount(&mut self, runtime: &mut ScrollRuntime) {
        if !self.mounted {
            return;
        }
        if let Some(view) = self.view.take() {
            runtime.release_all(view);
        }

        let mut registry = runtime.registry().lock().unwrap();
        for target in self
            .background_target
            .take()
            .into_iter()
            .chain(self.heading_target.take())
            .chain(self.body_target.take())
            .chain(self.cta_target.take())
            .chain(self.item_targets.drain(..))
        {
            registry.remove(target);
        }
        drop(registry);

        self.hover_binding = None;
        self.mounted = false;
        tracing::debug!(section = %self.config.name, "section unmounted");
    }

    /// Pointer entered the CTA
    pub fn hover_enter(&self, runtime: &ScrollRuntime) {
        if let Some(binding) = self.hover_binding {
            runtime.play(binding);
        }
    }

    /// Pointer left the CTA
    pub fn hover_leave(&self, runtime: &ScrollRuntime) {
        if let Some(binding) = self.hover_binding {
            runtime.reverse(binding);
        }
    }

    fn create_targets(&mut self, runtime: &ScrollRuntime, origin_y: f32) {
        let mut registry = runtime.registry().lock().unwrap();

        self.background_target = Some(registry.create(Rect::new(
            0.0,
            origin_y,
            SECTION_WIDTH,
            SECTION_HEIGHT,
        )));
        self.heading_target =
            Some(registry.create(Rect::new(CONTENT_X, origin_y + 120.0, 800.0, 64.0)));
        if !self.config.body.is_empty() {
            self.body_target =
                Some(registry.create(Rect::new(CONTENT_X, origin_y + 208.0, 640.0, 96.0)));
        }
        if self.config.cta.is_some() {
            self.cta_target =
                Some(registry.create(Rect::new(CONTENT_X, origin_y + 336.0, 180.0, 48.0)));
        }
        self.item_targets = self
            .config
            .items
            .iter()
            .enumerate()
            .map(|(i, _)| {
                registry.create(Rect::new(
                    CONTENT_X + i as f32 * 136.0,
                    origin_y + 440.0,
                    120.0,
                    36.0,
                ))
            })
            .collect();
    }

    fn bind_entrance(
        &self,
        runtime: &mut ScrollRuntime,
        view: ViewId,
        options: ScrollOptions,
    ) -> Result<(), DriftError> {
        // Stagger presets run over the item group, everything else over
        // the text column.
        let targets: Vec<TargetId> =
            if matches!(self.config.preset, AnimationPreset::StaggerPop { .. })
                && !self.item_targets.is_empty()
            {
                self.item_targets.clone()
            } else {
                self.heading_target
                    .into_iter()
                    .chain(self.body_target)
                    .chain(self.cta_target)
                    .collect()
            };
        let Some(&trigger) = targets.first() else {
            return Ok(());
        };

        let timeline = self.config.preset.build_timeline(&targets)?;
        let _ = runtime.bind_scroll_animation(view, timeline, trigger, options);
        Ok(())
    }

    fn bind_background(&self, runtime: &mut ScrollRuntime, view: ViewId) -> Result<(), DriftError> {
        let Some(background) = self.background_target else {
            return Ok(());
        };
        let spec = match self.config.background {
            BackgroundStyle::Solid => return Ok(()),
            // Parallax drift over the section's pass through the viewport
            BackgroundStyle::GradientShift => {
                KeyframeSpec::new().y(0.0, -120.0).ease(Easing::Linear)
            }
            BackgroundStyle::Starfield => {
                KeyframeSpec::new().rotation(0.0, 30.0).ease(Easing::Linear)
            }
        };
        let timeline = TimelineBuilder::new()
            .entry(background, spec, Position::At(0.0), 1000.0)
            .build()?;
        let _ =
            runtime.bind_scroll_animation(view, timeline, background, ScrollOptions::scrub(1.0, 0.0));
        Ok(())
    }

    fn bind_cta_hover(&mut self, runtime: &mut ScrollRuntime, view: ViewId) -> Result<(), DriftError> {
        let Some(cta) = self.cta_target else {
            return Ok(());
        };
        let timeline = TimelineBuilder::new()
            .entry(
                cta,
                KeyframeSpec::new().scale(1.0, 1.05).ease(Easing::PowerOut),
                Position::At(0.0),
                200.0,
            )
            .build()?;
        self.hover_binding = runtime.bind_manual(view, timeline, cta);
        Ok(())
    }
}
