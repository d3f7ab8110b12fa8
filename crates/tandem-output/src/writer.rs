//! The `OutputWriter` trait implemented by backend writers.

use crate::{OutputResult, RobotSnapshotRow, TickSummaryRow};

/// Sink for snapshot and summary rows.
///
/// All methods are infallible from the observer's perspective; errors are
/// stored internally and retrieved with
/// [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write a batch of robot snapshots.
    fn write_snapshots(&mut self, rows: &[RobotSnapshotRow]) -> OutputResult<()>;

    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
