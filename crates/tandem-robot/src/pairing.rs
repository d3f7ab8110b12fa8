//! Pairing: two unpaired teammates on a gold tile become partners.
//!
//! ```text
//! Idle ──(lowest id of two)──► SeekingHelp ──(PairRequest read)──► Paired
//!   └───(other id of two)────► OfferingHelp ──(PairAck read)─────► Paired
//! ```
//!
//! Both negotiating states fall back to `Idle` as soon as the other robot
//! is no longer seen on the tile.  A robot alone on gold stays put in `Idle`
//! until a teammate arrives or its wait runs out.
//!
//! The seeker commits `PairUp(offerer)`; the driver links both robots in the
//! execute phase and the seeker then broadcasts `Lock(pos)`.

use tandem_comms::{Envelope, Mailbox, Outgoing, TeamMsg};
use tandem_core::{AgentId, GridBounds, Position, Tick};
use tracing::debug;

use crate::{Decision, Effects, Fault, Robot, TickContext, navigation};

/// One robot's in-flight pairing negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PairingState {
    #[default]
    Idle,
    /// Lowest id on the tile; waiting for a `PairRequest`.
    SeekingHelp { since: Tick },
    /// Sent a `PairRequest` to `seeker`; waiting for its `PairAck`.
    OfferingHelp { seeker: AgentId, since: Tick },
    Paired,
}

impl PairingState {
    /// Tick the current negotiation started, if one is in flight.
    pub fn since(&self) -> Option<Tick> {
        match *self {
            PairingState::SeekingHelp { since } | PairingState::OfferingHelp { since, .. } => Some(since),
            PairingState::Idle | PairingState::Paired => None,
        }
    }
}

impl Robot {
    /// Plan step for an unpaired robot standing on unlocked gold.
    ///
    /// `contenders` are the unpaired same-team robots on the tile, self
    /// included, in ascending id order.
    pub(crate) fn plan_pairing(&mut self, ctx: &TickContext<'_>, contenders: &[AgentId], fx: &mut Effects) -> Decision {
        let now = ctx.now;
        let timeout = ctx.config.pairing_timeout_ticks;
        let bounds = ctx.world.bounds();

        if contenders.len() > 2 {
            fx.fault(Fault::InvariantViolation {
                agent:  self.id,
                pos:    self.pos,
                detail: "more than two unpaired teammates contest one gold tile",
            });
            self.pairing = PairingState::Idle;
            self.alone_since = None;
            if contenders.last() == Some(&self.id) {
                self.shun(self.pos, now + timeout);
                return navigation::divert(self.pos, self.facing, bounds);
            }
            return Decision::Stay;
        }

        if contenders.len() < 2 {
            return self.wait_alone(now, timeout, bounds, fx);
        }
        self.alone_since = None;

        let seeker = contenders[0];
        if seeker == self.id {
            match self.pairing {
                PairingState::SeekingHelp { since } if now.since(since) > timeout => {
                    fx.fault(Fault::Timeout { agent: self.id, what: "help request", deadline: since + timeout });
                    self.pairing = PairingState::Idle;
                    self.shun(self.pos, now + timeout);
                    return navigation::divert(self.pos, self.facing, bounds);
                }
                PairingState::SeekingHelp { .. } => {}
                _ => {
                    debug!(agent = %self.id, pos = %self.pos, "seeking help");
                    self.pairing = PairingState::SeekingHelp { since: now };
                }
            }
            return Decision::Stay;
        }

        match self.pairing {
            PairingState::OfferingHelp { seeker: s, since } if s == seeker => {
                if now.since(since) > timeout {
                    fx.fault(Fault::Timeout { agent: self.id, what: "help offer", deadline: since + timeout });
                    self.pairing = PairingState::Idle;
                }
            }
            _ => {
                debug!(agent = %self.id, seeker = %seeker, pos = %self.pos, "offering help");
                fx.send(Outgoing::direct(seeker, TeamMsg::PairRequest));
                self.pairing = PairingState::OfferingHelp { seeker, since: now };
            }
        }
        Decision::Stay
    }

    /// No unpaired teammate on the tile: drop any negotiation in flight and
    /// wait, at most `timeout` ticks, for one to show up.
    fn wait_alone(&mut self, now: Tick, timeout: u64, bounds: GridBounds, fx: &mut Effects) -> Decision {
        if self.pairing != PairingState::Idle {
            debug!(agent = %self.id, state = ?self.pairing, pos = %self.pos, "prospective partner left; pairing reset");
            self.pairing = PairingState::Idle;
        }
        let since = *self.alone_since.get_or_insert(now);
        if now.since(since) > timeout {
            fx.fault(Fault::Timeout { agent: self.id, what: "wait for help", deadline: since + timeout });
            self.alone_since = None;
            self.shun(self.pos, now + timeout);
            return navigation::divert(self.pos, self.facing, bounds);
        }
        Decision::Stay
    }

    /// Consume pairing handshake messages from the team channel.
    pub(crate) fn read_pairing(&mut self, mailbox: &mut Mailbox<TeamMsg>, fx: &mut Effects) {
        let handshake = mailbox.take_all(|e| matches!(e.body, TeamMsg::PairRequest | TeamMsg::PairAck));
        for envelope in handshake {
            match envelope.body {
                TeamMsg::PairRequest => self.read_pair_request(&envelope, fx),
                TeamMsg::PairAck     => self.read_pair_ack(&envelope, fx),
                TeamMsg::Lock(_) | TeamMsg::Unlock(_) => {}
            }
        }
    }

    fn read_pair_request(&mut self, envelope: &Envelope<TeamMsg>, fx: &mut Effects) {
        let offerer = envelope.sender;
        let accept = self.partner.is_none()
            && matches!(self.pairing, PairingState::SeekingHelp { .. })
            && matches!(self.decision, Decision::Stay)
            && self.sees_unpaired_teammate_here(offerer);
        if !accept {
            fx.fault(Fault::StaleMessage { agent: self.id, sender: offerer, what: "pair request" });
            return;
        }
        debug!(agent = %self.id, offerer = %offerer, pos = %self.pos, "accepting help");
        fx.send(Outgoing::direct(offerer, TeamMsg::PairAck));
        self.pairing = PairingState::Paired;
        self.decision = Decision::PairUp(offerer);
    }

    fn read_pair_ack(&mut self, envelope: &Envelope<TeamMsg>, fx: &mut Effects) {
        let seeker = envelope.sender;
        // The link is authoritative: an older offer to someone else may have
        // been the one that was accepted.
        match self.pairing {
            PairingState::OfferingHelp { .. } if self.partner == Some(seeker) => {
                debug!(agent = %self.id, partner = %seeker, "paired");
                self.pairing = PairingState::Paired;
            }
            _ => fx.fault(Fault::StaleMessage { agent: self.id, sender: seeker, what: "pair ack" }),
        }
    }

    /// `true` if `other` was seen on this robot's cell, unpaired and on the
    /// same team, during this tick's sensing.
    fn sees_unpaired_teammate_here(&self, other: AgentId) -> bool {
        self.memory
            .get(self.pos)
            .is_some_and(|s| s.unpaired(self.team).any(|id| id == other))
    }

    // ── Driver hooks ──────────────────────────────────────────────────────

    /// The driver linked this robot to `partner`.  The seeker side (already
    /// `Paired`) claims the tile with a lock broadcast.
    pub fn on_linked(&mut self, partner: AgentId) -> Vec<Outgoing> {
        self.partner = Some(partner);
        self.target = None;
        if self.pairing != PairingState::Paired {
            return Vec::new();
        }
        self.held_lock = Some(self.pos);
        debug!(agent = %self.id, pos = %self.pos, "lock broadcast");
        vec![Outgoing::broadcast(TeamMsg::Lock(self.pos))]
    }

    /// A `PairUp` could not be executed; start over.
    pub fn on_link_failed(&mut self) {
        self.pairing = PairingState::Idle;
    }

    /// Keep away from `pos` until `until`.
    pub(crate) fn shun(&mut self, pos: Position, until: Tick) {
        self.shunned.insert(pos, until);
        if self.target == Some(pos) {
            self.target = None;
        }
    }
}
