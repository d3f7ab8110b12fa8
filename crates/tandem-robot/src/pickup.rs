//! Synchronized pickup: a two-phase agreement on the tick at which both
//! partners lift the gold.
//!
//! ```text
//! proposer (lower id)                 acceptor (higher id)
//!   Idle ── PickupRequest(t) ───────►   Idle
//!   Proposed(t)                ◄──────  PickupAck(t); Accepted(t)
//!   Confirmed(t)
//!   ── at t both commit PickUp ──
//! ```
//!
//! A `t` that passes before the ack arrives resets the proposer, which may
//! propose again; the acceptor's lone `PickUp` then fails as a desync.

use tandem_comms::{Envelope, Mailbox, Outgoing, PartnerMsg, TeamMsg};
use tandem_core::{AgentId, Tick};
use tracing::debug;

use crate::{Decision, Effects, Fault, PairingState, Robot, TickContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PickupState {
    #[default]
    Idle,
    /// Proposer sent `PickupRequest(t)` and awaits the ack.
    Proposed(Tick),
    /// Acceptor acknowledged `t`.
    Accepted(Tick),
    /// Proposer read the ack for `t`.
    Confirmed(Tick),
}

impl PickupState {
    pub fn target(self) -> Option<Tick> {
        match self {
            PickupState::Idle => None,
            PickupState::Proposed(t) | PickupState::Accepted(t) | PickupState::Confirmed(t) => Some(t),
        }
    }
}

impl Robot {
    /// Plan step for a paired, empty-handed robot.
    pub(crate) fn plan_paired(
        &mut self,
        ctx:     &TickContext<'_>,
        partner: AgentId,
        team:    &Mailbox<TeamMsg>,
        fx:      &mut Effects,
    ) -> Decision {
        let now = ctx.now;

        // Our half is delivered; the partner's deposit completes the unit.
        if self.deposited {
            return Decision::Stay;
        }
        // The offerer waits for the seeker's ack before negotiating.
        if self.pairing != PairingState::Paired {
            return Decision::Stay;
        }

        let here = self.memory.get(self.pos);
        let partner_here = here.is_some_and(|s| s.contains(partner));
        let gold_here = here.is_some_and(|s| s.has_loose_gold());
        if !partner_here || !gold_here {
            debug!(agent = %self.id, partner = %partner, partner_here, gold_here, "pickup no longer possible; unpairing");
            return Decision::Unpair;
        }
        // Two pairs formed on one tile before either lock landed: the pair
        // with the lower seeker id keeps it.
        let ours = self.id.min(partner);
        let outranked = team.actionable().iter().any(|e| {
            e.body == TeamMsg::Lock(self.pos) && e.sender < ours
        });
        if outranked {
            debug!(agent = %self.id, pos = %self.pos, "tile claimed by another pair; unpairing");
            return Decision::Unpair;
        }

        match self.pickup {
            PickupState::Idle => {
                if self.id < partner {
                    let t = now + ctx.config.sync_delay_ticks;
                    debug!(agent = %self.id, partner = %partner, t_sync = %t, "proposing pickup");
                    fx.send(Outgoing::partner(partner, PartnerMsg::PickupRequest(t)));
                    self.pickup = PickupState::Proposed(t);
                }
                Decision::Stay
            }
            PickupState::Proposed(t) => {
                if now >= t {
                    fx.fault(Fault::Timeout { agent: self.id, what: "pickup proposal", deadline: t });
                    self.pickup = PickupState::Idle;
                }
                Decision::Stay
            }
            PickupState::Accepted(t) | PickupState::Confirmed(t) => {
                if now == t {
                    Decision::PickUp
                } else if now > t {
                    fx.fault(Fault::Timeout { agent: self.id, what: "pickup", deadline: t });
                    self.pickup = PickupState::Idle;
                    Decision::Stay
                } else {
                    Decision::Stay
                }
            }
        }
    }

    pub(crate) fn read_pickup_request(&mut self, ctx: &TickContext<'_>, partner: AgentId, envelope: &Envelope<PartnerMsg>, t: Tick, fx: &mut Effects) {
        if self.carrying || self.id < partner || t <= ctx.now {
            fx.fault(Fault::StaleMessage { agent: self.id, sender: envelope.sender, what: "pickup request" });
            return;
        }
        debug!(agent = %self.id, partner = %partner, t_sync = %t, "accepting pickup");
        fx.send(Outgoing::partner(partner, PartnerMsg::PickupAck(t)));
        self.pickup = PickupState::Accepted(t);
    }

    pub(crate) fn read_pickup_ack(&mut self, ctx: &TickContext<'_>, envelope: &Envelope<PartnerMsg>, t: Tick, fx: &mut Effects) {
        if self.pickup == PickupState::Proposed(t) && t > ctx.now {
            debug!(agent = %self.id, t_sync = %t, "pickup confirmed");
            self.pickup = PickupState::Confirmed(t);
        } else {
            fx.fault(Fault::StaleMessage { agent: self.id, sender: envelope.sender, what: "pickup ack" });
        }
    }

    // ── Driver hooks ──────────────────────────────────────────────────────

    /// Both partners lifted the unit.  The lock holder releases the tile.
    pub fn on_picked_up(&mut self) -> Vec<Outgoing> {
        self.carrying = true;
        self.pickup = PickupState::Idle;
        self.announced_facing = None;
        self.partner_facing = None;
        self.release_lock()
    }

    /// The joint pickup did not happen this tick; negotiate again.
    pub fn on_pickup_failed(&mut self) {
        self.pickup = PickupState::Idle;
    }
}
