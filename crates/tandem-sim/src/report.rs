//! Per-tick outcome summary.

use tandem_comms::DeliveryReport;
use tandem_core::Tick;
use tandem_robot::Fault;

/// What happened during one call to [`Sim::step`][crate::Sim::step].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick:       Tick,
    /// Every fault raised this tick, in the order it was observed.
    pub faults:     Vec<Fault>,
    /// Partnerships formed.
    pub pairings:   usize,
    /// Gold units lifted.
    pub pickups:    usize,
    /// Per-robot deposit contributions credited.
    pub deposits:   usize,
    /// Whole units completed (both halves deposited).
    pub delivered:  usize,
    /// Units put back on a tile after a carrying pair separated.
    pub drops:      usize,
    /// Messages handed to the post office.
    pub sent:       usize,
    /// Per-recipient copies dropped as duplicates.
    pub suppressed: usize,
    pub delivery:   DeliveryReport,
}

impl TickReport {
    pub fn new(tick: Tick) -> Self {
        Self { tick, ..Self::default() }
    }

    /// Number of faults of the given kind (see [`Fault::kind`]).
    pub fn count(&self, kind: &str) -> usize {
        self.faults.iter().filter(|f| f.kind() == kind).count()
    }

    pub fn has_invariant_violation(&self) -> bool {
        self.count("invariant_violation") > 0
    }
}
