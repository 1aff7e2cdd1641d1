//! Trigger binding state machine
//!
//! Decides what a viewport crossing means for a bound timeline. The
//! machine runs `Unarmed -> Armed -> Fired -> Terminal`, with
//! `PlayReverseOnReEntry` looping `Fired` back to `Armed` on exit so the
//! binding can fire again. Scrub bindings never hold a discrete fired
//! state; scroll position maps continuously to timeline progress while
//! armed.

/// Replay rule for a scroll binding
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivationPolicy {
    /// Fire once, then ignore all further crossings
    PlayOnce,
    /// Play on entry, reverse on exit, re-fire on re-entry
    PlayReverseOnReEntry,
    /// Map scroll position continuously to timeline progress
    ScrubWithScrollPosition,
}

/// Lifecycle state of a trigger binding
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerState {
    /// Created but not yet registered with the observer
    Unarmed,
    /// Watching for a threshold crossing
    Armed,
    /// Crossing consumed, timeline running (or run)
    Fired,
    /// No further transitions; subscription can be released
    Terminal,
}

/// What the runtime should do with the bound timeline
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerAction {
    None,
    /// Restart from time zero, applying initial keyframes
    Start,
    /// Resume forward from the current time (re-entry after a partial
    /// or full reverse)
    Play,
    /// Reverse toward the initial state
    Reverse,
}

/// Per-binding trigger state machine
#[derive(Debug)]
pub struct TriggerBinder {
    policy: ActivationPolicy,
    state: TriggerState,
    fired_once: bool,
}

impl TriggerBinder {
    pub fn new(policy: ActivationPolicy) -> Self {
        Self {
            policy,
            state: TriggerState::Unarmed,
            fired_once: false,
        }
    }

    pub fn policy(&self) -> ActivationPolicy {
        self.policy
    }

    pub fn state(&self) -> TriggerState {
        self.state
    }

    /// Observer registration complete; start watching
    pub fn arm(&mut self) {
        if self.state == TriggerState::Unarmed {
            self.state = TriggerState::Armed;
        }
    }

    /// The bound target crossed into view
    pub fn on_enter(&mut self) -> TriggerAction {
        if self.state != TriggerState::Armed {
            return TriggerAction::None;
        }
        match self.policy {
            ActivationPolicy::PlayOnce => {
                // Fired is instantaneous here; the binding is done.
                self.state = TriggerState::Terminal;
                self.fired_once = true;
                TriggerAction::Start
            }
            ActivationPolicy::PlayReverseOnReEntry => {
                self.state = TriggerState::Fired;
                let action = if self.fired_once {
                    TriggerAction::Play
                } else {
                    TriggerAction::Start
                };
                self.fired_once = true;
                action
            }
            ActivationPolicy::ScrubWithScrollPosition => TriggerAction::None,
        }
    }

    /// The bound target crossed back out of view
    pub fn on_exit(&mut self) -> TriggerAction {
        match (self.state, self.policy) {
            (TriggerState::Fired, ActivationPolicy::PlayReverseOnReEntry) => {
                // Resettable hop: reverse and re-arm for the next entry.
                self.state = TriggerState::Armed;
                TriggerAction::Reverse
            }
            _ => TriggerAction::None,
        }
    }

    /// The bound target was removed before (or after) any transition.
    /// Not an error: the binding retires quietly.
    pub fn retire(&mut self) {
        self.state = TriggerState::Terminal;
    }

    pub fn is_terminal(&self) -> bool {
        self.state == TriggerState::Terminal
    }

    /// Whether scrub mapping should run for this binding
    pub fn scrubs(&self) -> bool {
        self.policy == ActivationPolicy::ScrubWithScrollPosition
            && self.state == TriggerState::Armed
    }
}

/// Map a target's viewport position to scrub progress
///
/// Progress is 0 when the target top sits on the enter line
/// (`threshold * viewport_height`) and 1 when it reaches the end line
/// (`end_threshold * viewport_height`), clamped on both sides.
pub fn scrub_progress(
    target_top: f32,
    scroll_y: f32,
    viewport_height: f32,
    threshold: f32,
    end_threshold: f32,
) -> f32 {
    let top_in_viewport = target_top - scroll_y;
    let enter_line = threshold * viewport_height;
    let end_line = end_threshold * viewport_height;
    let span = enter_line - end_line;
    if span.abs() < f32::EPSILON {
        return if top_in_viewport <= end_line { 1.0 } else { 0.0 };
    }
    ((enter_line - top_in_viewport) / span).clamp(0.0, 1.0)
}
