//! The single action a robot commits to each tick.

use tandem_comms::PlanStep;
use tandem_core::{AgentId, Rotation};

/// What a robot will do in this tick's execute phase.
///
/// Produced by the plan phase, possibly revised by the read phase, and
/// consumed by the driver.  A joint action (pickup) executed on behalf of
/// both partners resets the partner's decision to `Stay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Decision {
    #[default]
    Stay,
    /// One step along the current facing.
    Forward,
    Turn(Rotation),
    /// Take one gold unit together with the partner.
    PickUp,
    /// Hand the carried unit in at the team base.
    Deposit,
    /// Link with the given offerer as partners.
    PairUp(AgentId),
    /// Dissolve the partnership without carrying anything.
    Unpair,
    /// Partner lost while carrying: put the unit back on this tile.
    Drop,
}

impl From<PlanStep> for Decision {
    fn from(step: PlanStep) -> Self {
        match step {
            PlanStep::Forward        => Decision::Forward,
            PlanStep::Turn(rotation) => Decision::Turn(rotation),
            PlanStep::Deposit        => Decision::Deposit,
        }
    }
}
