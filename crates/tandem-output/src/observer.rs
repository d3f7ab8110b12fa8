//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use tandem_core::{Team, Tick};
use tandem_robot::Robot;
use tandem_sim::{SimObserver, TickReport};
use tandem_world::World;

use crate::row::{RobotSnapshotRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes robot snapshots and tick summaries to any
/// [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, report: &TickReport, world: &World) {
        let row = TickSummaryRow {
            tick:           report.tick.0,
            red_credits:    world.credits(Team::Red),
            blue_credits:   world.credits(Team::Blue),
            gold_remaining: world.total_gold(),
            faults:         report.faults.len(),
            messages:       report.sent,
        };
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, _world: &World, robots: &[Robot]) {
        let rows: Vec<RobotSnapshotRow> = robots
            .iter()
            .map(|r| RobotSnapshotRow {
                tick:     tick.0,
                agent_id: r.id().0,
                team:     r.team().label(),
                x:        r.pos().x,
                y:        r.pos().y,
                facing:   r.facing().letter(),
                carrying: r.carrying(),
                partner:  r.partner().unwrap_or_default().0,
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick, _world: &World) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
