//! Synchronized transit: a carrying pair walks to its base in lockstep.
//!
//! Both partners first turn towards the base and tell each other their
//! facing.  Once both face the same way the lower id proposes a plan with an
//! activation tick; after the ack no more messages flow and each side simply
//! executes `plan[now - activation]`.

use tandem_comms::{Envelope, Outgoing, PartnerMsg, PlanStep};
use tandem_core::{AgentId, Direction, Tick};
use tracing::{debug, warn};

use crate::{Decision, Effects, Fault, Robot, TickContext, navigation};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitState {
    #[default]
    Idle,
    /// Proposer sent the plan and awaits the ack.
    Proposed { activation: Tick, plan: Vec<PlanStep> },
    /// Both sides hold the plan; `cursor` is the next step to execute.
    Committed { activation: Tick, plan: Vec<PlanStep>, cursor: usize },
}

impl TransitState {
    pub fn activation(&self) -> Option<Tick> {
        match self {
            TransitState::Idle => None,
            TransitState::Proposed { activation, .. } | TransitState::Committed { activation, .. } => Some(*activation),
        }
    }
}

impl Robot {
    /// Facing that points this robot at its base, `None` when on it.
    pub fn desired_facing(&self) -> Option<Direction> {
        Direction::towards(self.pos, self.deposit)
    }

    /// Plan step for a carrying robot.
    pub(crate) fn plan_transit(&mut self, ctx: &TickContext<'_>, fx: &mut Effects) -> Decision {
        let now = ctx.now;
        let Some(partner) = self.partner else {
            fx.fault(Fault::InvariantViolation {
                agent:  self.id,
                pos:    self.pos,
                detail: "carrying without a partner",
            });
            return Decision::Stay;
        };

        if !self.memory.get(self.pos).is_some_and(|s| s.contains(partner)) {
            warn!(agent = %self.id, partner = %partner, pos = %self.pos, "partner lost while carrying; dropping");
            return Decision::Drop;
        }

        let mut expired = None;
        let mut exhausted = false;
        match &mut self.transit {
            TransitState::Committed { activation, plan, cursor } => {
                if now < *activation {
                    return Decision::Stay;
                }
                let step = now.since(*activation) as usize;
                if let Some(action) = plan.get(step).copied() {
                    *cursor = step + 1;
                    return action.into();
                }
                exhausted = true;
            }
            TransitState::Proposed { activation, .. } => {
                if now >= *activation {
                    expired = Some(*activation);
                }
            }
            TransitState::Idle => {}
        }
        if exhausted {
            self.transit = TransitState::Idle;
            if self.pos == self.deposit {
                return Decision::Deposit;
            }
        }
        if let Some(deadline) = expired {
            fx.fault(Fault::Timeout { agent: self.id, what: "transit proposal", deadline });
            self.transit = TransitState::Idle;
        }

        if self.announced_facing != Some(self.facing) {
            fx.send(Outgoing::partner(partner, PartnerMsg::Facing(self.facing)));
            self.announced_facing = Some(self.facing);
        }

        let desired = self.desired_facing();
        if let Some(rotation) = desired.and_then(|d| self.facing.rotation_towards(d)) {
            return Decision::Turn(rotation);
        }
        let partner_aligned = desired.is_none_or(|d| self.partner_facing.is_some_and(|(f, _)| f == d));
        if self.id < partner && partner_aligned && self.transit == TransitState::Idle {
            let activation = now + ctx.config.sync_delay_ticks;
            let plan = navigation::transit_plan(self.pos, self.facing, self.deposit);
            debug!(agent = %self.id, partner = %partner, activation = %activation, steps = plan.len(), "proposing transit");
            fx.send(Outgoing::partner(partner, PartnerMsg::MoveSyncRequest { activation, plan: plan.clone() }));
            self.transit = TransitState::Proposed { activation, plan };
        }
        Decision::Stay
    }

    pub(crate) fn read_move_sync_request(
        &mut self,
        ctx:        &TickContext<'_>,
        partner:    AgentId,
        envelope:   &Envelope<PartnerMsg>,
        activation: Tick,
        plan:       Vec<PlanStep>,
        fx:         &mut Effects,
    ) {
        let aligned = self.desired_facing().is_none_or(|d| d == self.facing);
        if !self.carrying || self.id < partner || activation <= ctx.now || !aligned {
            fx.fault(Fault::StaleMessage { agent: self.id, sender: envelope.sender, what: "move-sync request" });
            return;
        }
        debug!(agent = %self.id, partner = %partner, activation = %activation, steps = plan.len(), "transit committed");
        fx.send(Outgoing::partner(partner, PartnerMsg::MoveSyncAck(activation)));
        self.transit = TransitState::Committed { activation, plan, cursor: 0 };
    }

    pub(crate) fn read_move_sync_ack(&mut self, ctx: &TickContext<'_>, envelope: &Envelope<PartnerMsg>, t: Tick, fx: &mut Effects) {
        let proposed = match &mut self.transit {
            TransitState::Proposed { activation, plan } if *activation == t && t > ctx.now => {
                Some(std::mem::take(plan))
            }
            _ => None,
        };
        match proposed {
            Some(plan) => {
                debug!(agent = %self.id, activation = %t, "transit committed");
                self.transit = TransitState::Committed { activation: t, plan, cursor: 0 };
            }
            None => fx.fault(Fault::StaleMessage { agent: self.id, sender: envelope.sender, what: "move-sync ack" }),
        }
    }

    // ── Driver hooks ──────────────────────────────────────────────────────

    /// This robot handed in its half of the unit.
    pub fn on_deposited(&mut self) {
        self.carrying = false;
        self.deposited = true;
        self.transit = TransitState::Idle;
    }

    /// The unit went back onto the tile.
    pub fn on_dropped(&mut self) {
        self.carrying = false;
        self.transit = TransitState::Idle;
    }
}
