//! Global progress indicator for in-flight backend requests.
//!
//! A process-wide signal store tracks whether any request is outstanding plus
//! an optional completion percentage, and a top-of-viewport bar animates off
//! it. The store is fed by the request layer's hooks (see `api::RequestHooks`)
//! and knows nothing about individual requests.

use dioxus::core::Task;
use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;

/// The indeterminate animation creeps toward this and holds there until the
/// in-flight window closes.
const INDETERMINATE_CEILING: f64 = 90.0;
/// Fraction of the remaining distance covered per indeterminate tick.
const DAMPING: f64 = 0.15;
/// Indeterminate tick interval, milliseconds.
const TICK_MS: u32 = 200;
/// How long the bar lingers at 100% before hiding, milliseconds.
const SETTLE_MS: u32 = 400;

// ─────────────────────────────────────────────────────────────────────────────
// Progress Signal Store
// ─────────────────────────────────────────────────────────────────────────────

/// Shared progress state.
///
/// `value`, when present, is an externally supplied completion percentage in
/// `[0, 100]` and switches the bar to determinate mode.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProgressState {
    pub active: bool,
    pub value: Option<f64>,
}

/// Process-wide progress store.
///
/// Single source of truth for "is work happening". Writers call
/// `set_active`/`set_value`; subscribers read the signal and are notified
/// synchronously on every write. The store does not count requests — collapsing
/// overlapping producers into one start/end pair is `api::RequestTracker`'s job.
///
/// Each instance is independent, so tests and nested shells can construct
/// their own instead of sharing ambient state.
#[derive(Clone, Copy)]
pub struct ProgressManager {
    state: Signal<ProgressState>,
}

impl ProgressManager {
    pub fn new() -> Self {
        Self {
            state: Signal::new(ProgressState::default()),
        }
    }

    /// Mark work as started or finished.
    pub fn set_active(&mut self, active: bool) {
        self.state.write().active = active;
    }

    /// Set or clear the determinate completion hint. Callers pass values
    /// already in `[0, 100]`; when several producers report concurrently the
    /// last write wins — there is deliberately no arbitration.
    pub fn set_value(&mut self, value: Option<f64>) {
        self.state.write().value = value;
    }

    /// Current state (subscribes when called from reactive scopes).
    pub fn state(&self) -> ProgressState {
        *self.state.read()
    }
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Initialize the progress store at the app root.
pub fn use_progress_provider() -> ProgressManager {
    use_context_provider(ProgressManager::new)
}

/// Get the progress store from context.
pub fn use_progress() -> ProgressManager {
    use_context::<ProgressManager>()
}

// ─────────────────────────────────────────────────────────────────────────────
// Animation Model
// ─────────────────────────────────────────────────────────────────────────────

/// Self-driven trajectory for indeterminate mode, kept separate from the
/// component so the math is testable without timers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarAnimation {
    current: f64,
}

impl BarAnimation {
    pub fn new() -> Self {
        Self { current: 0.0 }
    }

    /// Advance one tick: cover `DAMPING` of the remaining distance to the
    /// ceiling. The approach is monotonic and never overshoots, modelling
    /// "unknown remaining work slows apparent progress".
    pub fn tick(&mut self) -> f64 {
        if self.current < INDETERMINATE_CEILING {
            let next = self.current + (INDETERMINATE_CEILING - self.current) * DAMPING;
            self.current = next.min(INDETERMINATE_CEILING);
        }
        self.current
    }

    pub fn current(&self) -> f64 {
        self.current
    }
}

impl Default for BarAnimation {
    fn default() -> Self {
        Self::new()
    }
}

/// Width shown in determinate mode: the supplied value, kept in range.
fn determinate_width(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// What the renderer does in reaction to a store change.
#[derive(Debug, Clone, Copy, PartialEq)]
enum BarTransition {
    /// Inactive with no deactivation edge: leave the bar alone.
    Idle,
    /// Pin the width to a reported completion percentage.
    Determinate(f64),
    /// Start (or restart) the self-driven creep from zero.
    Indeterminate,
    /// Snap to 100% and hide after the settle delay.
    Complete,
}

/// Decide the renderer's next move from the previous activity flag and the
/// new store state. The completion sweep keys on the true→false edge of
/// `active`, so a request that finishes before the first indeterminate tick
/// still sweeps to 100% instead of vanishing.
fn transition(was_active: bool, state: ProgressState) -> BarTransition {
    if state.active {
        match state.value {
            Some(v) => BarTransition::Determinate(determinate_width(v)),
            None => BarTransition::Indeterminate,
        }
    } else if was_active {
        BarTransition::Complete
    } else {
        BarTransition::Idle
    }
}

/// The bar disappears only when idle with nothing left to sweep; during the
/// completion settle it is inactive but still visible at 100%.
fn is_hidden(active: bool, width: f64) -> bool {
    !active && width == 0.0
}

// ─────────────────────────────────────────────────────────────────────────────
// Renderer
// ─────────────────────────────────────────────────────────────────────────────

/// Fixed top-of-viewport progress bar driven by the progress store.
///
/// Indeterminate runs creep toward 90%; a supplied value pins the width to it;
/// deactivation snaps to 100% and hides after a short settle delay. The
/// running timer task is cancelled on every mode change, so a stale tick can
/// never reset a newer run.
#[component]
pub fn GlobalProgressBar() -> Element {
    let mut progress = use_progress();
    let mut current = use_signal(|| 0.0f64);
    let mut timer: Signal<Option<Task>> = use_signal(|| None);
    let mut was_active = use_signal(|| false);

    use_effect(move || {
        let state = progress.state();
        let prev = *was_active.peek();
        was_active.set(state.active);

        let next = transition(prev, state);
        if next == BarTransition::Idle {
            // Inactive and no edge: the only task that can be live here is a
            // pending settle, and it must run to completion to hide the bar.
            return;
        }

        // Whatever was scheduled belongs to a superseded mode.
        if let Some(task) = timer.write().take() {
            task.cancel();
        }

        match next {
            BarTransition::Idle => {}
            BarTransition::Determinate(width) => current.set(width),
            BarTransition::Complete => {
                current.set(100.0);
                let task = spawn(async move {
                    TimeoutFuture::new(SETTLE_MS).await;
                    current.set(0.0);
                });
                timer.set(Some(task));
            }
            BarTransition::Indeterminate => {
                current.set(0.0);
                let task = spawn(async move {
                    let mut anim = BarAnimation::new();
                    loop {
                        TimeoutFuture::new(TICK_MS).await;
                        current.set(anim.tick());
                    }
                });
                timer.set(Some(task));
            }
        }
    });

    // The indicator has no persistence: tear down cleanly with the tree.
    use_drop(move || {
        if let Some(task) = timer.write().take() {
            task.cancel();
        }
        progress.set_active(false);
        progress.set_value(None);
    });

    let state = progress.state();
    let width = current();
    if is_hidden(state.active, width) {
        return rsx! {};
    }

    rsx! {
        div { class: "global-progress",
            div { class: "global-progress-fill", style: "width: {width}%" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indeterminate_strictly_increases_below_ceiling() {
        let mut anim = BarAnimation::new();
        let mut prev = anim.current();
        for _ in 0..50 {
            let next = anim.tick();
            assert!(next > prev, "trajectory must be strictly increasing");
            assert!(next < INDETERMINATE_CEILING, "must never reach the ceiling");
            prev = next;
        }
    }

    #[test]
    fn test_indeterminate_first_steps() {
        let mut anim = BarAnimation::new();
        assert!((anim.tick() - 13.5).abs() < 1e-9);
        assert!((anim.tick() - 24.975).abs() < 1e-9);
    }

    #[test]
    fn test_tick_at_ceiling_holds() {
        let mut anim = BarAnimation {
            current: INDETERMINATE_CEILING,
        };
        assert_eq!(anim.tick(), INDETERMINATE_CEILING);
        assert_eq!(anim.tick(), INDETERMINATE_CEILING);
    }

    #[test]
    fn test_progress_state_default_is_idle() {
        let state = ProgressState::default();
        assert!(!state.active);
        assert!(state.value.is_none());
    }

    #[test]
    fn test_determinate_width_is_value_in_range() {
        assert_eq!(determinate_width(42.0), 42.0);
        assert_eq!(determinate_width(-3.0), 0.0);
        assert_eq!(determinate_width(250.0), 100.0);
    }

    #[test]
    fn test_transition_modes_while_active() {
        let indeterminate = ProgressState {
            active: true,
            value: None,
        };
        assert_eq!(transition(false, indeterminate), BarTransition::Indeterminate);
        let determinate = ProgressState {
            active: true,
            value: Some(250.0),
        };
        assert_eq!(transition(true, determinate), BarTransition::Determinate(100.0));
    }

    #[test]
    fn test_deactivation_edge_always_sweeps() {
        // The sweep keys on the edge, not on how far the bar had crept.
        let finished = ProgressState {
            active: false,
            value: None,
        };
        assert_eq!(transition(true, finished), BarTransition::Complete);
    }

    #[test]
    fn test_idle_without_prior_activity_stays_put() {
        assert_eq!(
            transition(false, ProgressState::default()),
            BarTransition::Idle
        );
    }

    #[test]
    fn test_sub_tick_request_still_completes() {
        // Start and finish before any indeterminate tick ran: the bar must
        // enter the creep, sweep to 100% on the edge, then settle to idle.
        let started = ProgressState {
            active: true,
            value: None,
        };
        let finished = ProgressState {
            active: false,
            value: None,
        };
        assert_eq!(transition(false, started), BarTransition::Indeterminate);
        assert_eq!(transition(started.active, finished), BarTransition::Complete);
        assert_eq!(transition(finished.active, finished), BarTransition::Idle);
    }

    #[test]
    fn test_visibility_rule() {
        assert!(is_hidden(false, 0.0), "idle bar renders nothing");
        assert!(!is_hidden(true, 0.0), "active bar shows even before first tick");
        assert!(!is_hidden(false, 100.0), "completion sweep stays visible");
    }
}
