//! Message variants and envelopes.
//!
//! Each channel has its own closed variant set, so every reader matches
//! exhaustively and a partner-only message can never be broadcast by
//! accident.

use tandem_core::{AgentId, Direction, MessageId, Position, Rotation, Tick};

// ── Channel payloads ──────────────────────────────────────────────────────────

/// Team-channel traffic.  `Lock`/`Unlock` go to every teammate; the pairing
/// handshake is addressed to one teammate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TeamMsg {
    /// Offerer → seeker: "I will help you carry the gold here."
    PairRequest,
    /// Seeker → offerer: "Accepted; we are partners."
    PairAck,
    /// The sending pair claims the gold at this tile.
    Lock(Position),
    /// The claim on this tile is released.
    Unlock(Position),
}

/// One step of an agreed transit plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlanStep {
    Forward,
    Turn(Rotation),
    Deposit,
}

/// Partner-private traffic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PartnerMsg {
    /// Proposer → acceptor: pick up together at the given tick.
    PickupRequest(Tick),
    /// Acceptor → proposer: agreed to pick up at the given tick.
    PickupAck(Tick),
    /// "My facing is now this."
    Facing(Direction),
    /// Proposer → acceptor: execute `plan[i]` at `activation + i`.
    MoveSyncRequest { activation: Tick, plan: Vec<PlanStep> },
    /// Acceptor → proposer: adopted the plan starting at the given tick.
    MoveSyncAck(Tick),
}

// ── Addressing ────────────────────────────────────────────────────────────────

/// Intended receiver of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Recipient {
    /// Every teammate of the sender except the sender itself.
    Team,
    /// One specific robot.
    Agent(AgentId),
}

/// A message a robot wants sent, collected during the plan, read and execute
/// phases and handed to the post office by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outgoing {
    Team { to: Recipient, body: TeamMsg },
    Partner { to: AgentId, body: PartnerMsg },
}

impl Outgoing {
    pub fn broadcast(body: TeamMsg) -> Self {
        Outgoing::Team { to: Recipient::Team, body }
    }

    pub fn direct(to: AgentId, body: TeamMsg) -> Self {
        Outgoing::Team { to: Recipient::Agent(to), body }
    }

    pub fn partner(to: AgentId, body: PartnerMsg) -> Self {
        Outgoing::Partner { to, body }
    }
}

// ── Envelope ──────────────────────────────────────────────────────────────────

/// One recipient's copy of a sent message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope<M> {
    /// Shared by all copies of the same send.
    pub id:           MessageId,
    pub sender:       AgentId,
    pub recipient:    Recipient,
    pub sent_at:      Tick,
    /// Deliver steps left before the message becomes actionable.
    pub countdown:    u32,
    /// Tick at which the countdown reached zero.  `None` while pending.
    pub delivered_at: Option<Tick>,
    pub body:         M,
}

impl<M: PartialEq> Envelope<M> {
    /// Same variant, same payload, same sender — the duplicate-suppression key.
    #[inline]
    pub fn is_equivalent(&self, sender: AgentId, body: &M) -> bool {
        self.sender == sender && self.body == *body
    }
}
