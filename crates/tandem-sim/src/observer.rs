//! Simulation observer trait for progress reporting and data collection.

use tandem_core::Tick;
use tandem_robot::Robot;
use tandem_world::World;

use crate::TickReport;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — score printer
///
/// ```rust,ignore
/// struct ScorePrinter;
///
/// impl SimObserver for ScorePrinter {
///     fn on_tick_end(&mut self, report: &TickReport, _world: &World) {
///         if report.delivered > 0 {
///             println!("{}: {} unit(s) delivered", report.tick, report.delivered);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before the deliver phase.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called after the execute phase and the invariant checks, with the
    /// world as the tick left it.
    fn on_tick_end(&mut self, _report: &TickReport, _world: &World) {}

    /// Called at snapshot intervals (every `config.output_interval_ticks`
    /// ticks) with read-only access to the whole arena.
    fn on_snapshot(&mut self, _tick: Tick, _world: &World, _robots: &[Robot]) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick, _world: &World) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
