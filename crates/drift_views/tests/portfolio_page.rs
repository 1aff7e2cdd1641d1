//! Full-page flow over the whole stack: sections mount, the user scrolls
//! the document end to end and back, and everything lands in a defined
//! state with nothing leaked after unmount.

use drift_animation::AnimationScheduler;
use drift_core::shared_registry;
use drift_scroll::{ActivationPolicy, ScrollRuntime, Viewport};
use drift_views::{AnimationPreset, BackgroundStyle, MotionSettings, Section, SectionConfig};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::DEBUG.into()),
        )
        .with_test_writer()
        .try_init();
}

fn page() -> (AnimationScheduler, ScrollRuntime, Vec<Section>) {
    let registry = shared_registry();
    let scheduler = AnimationScheduler::new(registry.clone());
    let runtime = ScrollRuntime::new(scheduler.handle(), registry, Viewport::new(1280.0, 800.0));

    let sections = vec![
        Section::new(
            SectionConfig::new("hero", "Building things that move")
                .body("Scroll-driven interfaces, shipped.")
                .cta("See projects", "projects")
                .background(BackgroundStyle::GradientShift)
                .preset(AnimationPreset::HeroEntrance),
        ),
        Section::new(
            SectionConfig::new("skills", "Skills")
                .items(["Rust", "WGSL", "TOML", "CI", "Figma"])
                .preset(AnimationPreset::StaggerPop {
                    per_item_delay_ms: 100.0,
                }),
        ),
        Section::new(
            SectionConfig::new("projects", "Selected work")
                .body("Case studies.")
                .preset(AnimationPreset::SlideInLeft { distance: 200.0 })
                .policy(ActivationPolicy::PlayReverseOnReEntry),
        ),
        Section::new(
            SectionConfig::new("contact", "Get in touch")
                .body("Email or carrier pigeon.")
                .preset(AnimationPreset::FadeUp { duration_ms: 600.0 }),
        ),
    ];

    (scheduler, runtime, sections)
}

fn settle(scheduler: &AnimationScheduler) {
    // Frame-sized steps until nothing is playing
    for _ in 0..400 {
        if !scheduler.tick(16.0) {
            break;
        }
    }
    assert!(!scheduler.has_active_animations());
}

#[test]
fn scrolling_the_page_end_to_end_settles_every_section() {
    init_tracing();
    let (scheduler, mut runtime, mut sections) = page();
    let settings = MotionSettings::default();
    for (i, section) in sections.iter_mut().enumerate() {
        section
            .mount(&mut runtime, i as f32 * 1000.0, &settings)
            .unwrap();
    }

    let props = |target| {
        scheduler
            .registry()
            .lock()
            .unwrap()
            .props(target)
            .unwrap()
    };

    // The hero is above the fold; the first scroll event fires it.
    runtime.handle_scroll(0.0);
    settle(&scheduler);
    let hero_heading = sections[0].heading_target().unwrap();
    assert_eq!(props(hero_heading).opacity, 1.0);
    assert_eq!(props(hero_heading).y, 0.0);

    // Scroll down through the skills cloud (items at y 1440, line at
    // 640): every tag pops to full scale.
    runtime.handle_scroll(900.0);
    settle(&scheduler);
    for &item in sections[1].item_targets() {
        assert_eq!(props(item).scale, 1.0);
        assert_eq!(props(item).opacity, 1.0);
    }

    // Projects section enters (heading at y 2120, fires past 1480).
    runtime.handle_scroll(1600.0);
    settle(&scheduler);
    let projects_heading = sections[2].heading_target().unwrap();
    assert_eq!(props(projects_heading).x, 0.0);
    assert_eq!(props(projects_heading).opacity, 1.0);

    // Scrolling back above it reverses the toggle section to its hidden
    // state; the play-once sections do not move.
    runtime.handle_scroll(0.0);
    settle(&scheduler);
    assert_eq!(props(projects_heading).x, -200.0);
    assert_eq!(props(projects_heading).opacity, 0.0);
    assert_eq!(props(hero_heading).opacity, 1.0);
    for &item in sections[1].item_targets() {
        assert_eq!(props(item).scale, 1.0);
    }

    // Re-entering resumes forward to exactly the entered state.
    runtime.handle_scroll(1600.0);
    settle(&scheduler);
    assert_eq!(props(projects_heading).x, 0.0);
    assert_eq!(props(projects_heading).opacity, 1.0);

    // All the way down: the contact section fades in.
    runtime.handle_scroll(2600.0);
    settle(&scheduler);
    let contact_heading = sections[3].heading_target().unwrap();
    assert_eq!(props(contact_heading).opacity, 1.0);
    assert_eq!(props(contact_heading).y, 0.0);
}

#[test]
fn unmounting_the_page_leaks_nothing() {
    init_tracing();
    let (scheduler, mut runtime, mut sections) = page();
    let settings = MotionSettings::default();
    for (i, section) in sections.iter_mut().enumerate() {
        section
            .mount(&mut runtime, i as f32 * 1000.0, &settings)
            .unwrap();
    }

    // Tear down mid-animation
    runtime.handle_scroll(900.0);
    scheduler.tick(50.0);
    for section in &mut sections {
        section.unmount(&mut runtime);
    }

    assert_eq!(runtime.subscription_count(), 0);
    assert_eq!(scheduler.timeline_count(), 0);
    assert_eq!(runtime.registry().lock().unwrap().len(), 0);

    // Later scroll traffic is inert
    runtime.handle_scroll(2000.0);
    assert!(!scheduler.tick(16.0));
}

#[test]
fn reduced_motion_renders_the_whole_page_statically() {
    init_tracing();
    let (scheduler, mut runtime, mut sections) = page();
    let settings = MotionSettings {
        reduced_motion: true,
        ..Default::default()
    };
    for (i, section) in sections.iter_mut().enumerate() {
        section
            .mount(&mut runtime, i as f32 * 1000.0, &settings)
            .unwrap();
    }

    assert_eq!(runtime.subscription_count(), 0);
    runtime.handle_scroll(1600.0);
    assert!(!scheduler.tick(16.0));

    // Everything already sits at its resting (end) state
    for section in &sections {
        let heading = section.heading_target().unwrap();
        let props = scheduler
            .registry()
            .lock()
            .unwrap()
            .props(heading)
            .unwrap();
        assert_eq!(props.opacity, 1.0);
        assert_eq!(props.y, 0.0);
    }
}
