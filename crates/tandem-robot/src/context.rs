//! Read-only tick state shared by every robot callback, and the effects a
//! callback hands back to the driver.

use tandem_comms::Outgoing;
use tandem_core::{AgentId, ArenaConfig, Direction, Position, Team, Tick};
use tandem_world::World;
use tracing::warn;

use crate::Fault;

// ── RobotView ─────────────────────────────────────────────────────────────────

/// What any robot can observe about another robot by looking at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RobotView {
    pub id:       AgentId,
    pub team:     Team,
    pub pos:      Position,
    pub facing:   Direction,
    /// Has a partner link (pairs are visibly joined).
    pub paired:   bool,
    pub carrying: bool,
}

// ── TickContext ───────────────────────────────────────────────────────────────

/// A read-only snapshot passed to the sense, plan and read phases.
///
/// Built once per phase by the driver.  `views[i]` describes `AgentId(i)`.
pub struct TickContext<'a> {
    pub now:    Tick,
    pub config: &'a ArenaConfig,
    pub world:  &'a World,
    pub views:  &'a [RobotView],
}

impl<'a> TickContext<'a> {
    #[inline]
    pub fn new(now: Tick, config: &'a ArenaConfig, world: &'a World, views: &'a [RobotView]) -> Self {
        Self { now, config, world, views }
    }

    #[inline]
    pub fn view(&self, agent: AgentId) -> Option<&RobotView> {
        self.views.get(agent.index())
    }
}

// ── Effects ───────────────────────────────────────────────────────────────────

/// Messages to send and faults to report, produced by one robot callback.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Effects {
    pub outgoing: Vec<Outgoing>,
    pub faults:   Vec<Fault>,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn send(&mut self, out: Outgoing) {
        self.outgoing.push(out);
    }

    /// Record a fault and log it.
    pub fn fault(&mut self, fault: Fault) {
        warn!(agent = %fault.agent(), kind = fault.kind(), "{fault}");
        self.faults.push(fault);
    }

    pub fn extend(&mut self, other: Effects) {
        self.outgoing.extend(other.outgoing);
        self.faults.extend(other.faults);
    }

    pub fn is_empty(&self) -> bool {
        self.outgoing.is_empty() && self.faults.is_empty()
    }
}

impl From<Vec<Outgoing>> for Effects {
    fn from(outgoing: Vec<Outgoing>) -> Self {
        Self { outgoing, faults: Vec::new() }
    }
}
