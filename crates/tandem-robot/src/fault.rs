//! Runtime protocol faults.
//!
//! None of these is fatal: the affected robot (or pair) resets the protocol
//! axis involved and the tick carries on.  The driver collects them into the
//! tick report.

use tandem_core::{AgentId, Position, Tick};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    /// A world or protocol invariant would have been broken; the action was
    /// aborted instead.
    #[error("{agent} at {pos}: invariant violation: {detail}")]
    InvariantViolation {
        agent:  AgentId,
        pos:    Position,
        detail: &'static str,
    },

    /// The partner's committed decision did not match ours.
    #[error("{agent} out of step with {partner}: {detail}")]
    ProtocolDesync {
        agent:   AgentId,
        partner: AgentId,
        detail:  &'static str,
    },

    /// A message arrived after it stopped being relevant and was dropped.
    #[error("{agent}: stale {what} from {sender} discarded")]
    StaleMessage {
        agent:  AgentId,
        sender: AgentId,
        what:   &'static str,
    },

    /// A negotiation's target tick passed before it was confirmed.
    #[error("{agent}: {what} timed out at {deadline}")]
    Timeout {
        agent:    AgentId,
        what:     &'static str,
        deadline: Tick,
    },
}

impl Fault {
    /// The robot that observed the fault.
    pub fn agent(&self) -> AgentId {
        match self {
            Fault::InvariantViolation { agent, .. }
            | Fault::ProtocolDesync { agent, .. }
            | Fault::StaleMessage { agent, .. }
            | Fault::Timeout { agent, .. } => *agent,
        }
    }

    /// Short machine-friendly label, used in CSV output and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Fault::InvariantViolation { .. } => "invariant_violation",
            Fault::ProtocolDesync { .. }     => "protocol_desync",
            Fault::StaleMessage { .. }       => "stale_message",
            Fault::Timeout { .. }            => "timeout",
        }
    }
}
