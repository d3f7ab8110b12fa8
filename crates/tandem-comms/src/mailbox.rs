//! Per-robot mailboxes.
//!
//! A `Mailbox<M>` holds one channel's envelopes in two queues:
//!
//! - **pending**: counting down, invisible to the owner;
//! - **actionable**: visible, in the order they became actionable, until the
//!   owning protocol consumes them or the retention window purges them.
//!
//! Duplicate suppression compares `(sender, body)` against both queues, so a
//! robot that re-sends the same request every tick keeps exactly one copy in
//! flight per recipient.

use std::collections::BTreeSet;

use tandem_core::{AgentId, Position, Tick};

use crate::{Envelope, PartnerMsg, TeamMsg};

// ── Mailbox ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Mailbox<M> {
    pending:    Vec<Envelope<M>>,
    actionable: Vec<Envelope<M>>,
}

impl<M> Default for Mailbox<M> {
    fn default() -> Self {
        Self { pending: Vec::new(), actionable: Vec::new() }
    }
}

impl<M: PartialEq> Mailbox<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` if an equivalent envelope is already pending or actionable.
    pub fn contains_equivalent(&self, sender: AgentId, body: &M) -> bool {
        self.pending
            .iter()
            .chain(self.actionable.iter())
            .any(|e| e.is_equivalent(sender, body))
    }

    /// File a freshly sent envelope.  Returns `false` (and drops it) when an
    /// equivalent one is already held.
    pub fn file(&mut self, mut envelope: Envelope<M>) -> bool {
        if self.contains_equivalent(envelope.sender, &envelope.body) {
            return false;
        }
        if envelope.countdown == 0 {
            envelope.delivered_at = Some(envelope.sent_at);
            self.actionable.push(envelope);
        } else {
            self.pending.push(envelope);
        }
        true
    }

    /// Advance every pending countdown by one tick and promote those that
    /// reach zero.  Returns the number promoted.
    pub fn deliver(&mut self, now: Tick) -> usize {
        let mut promoted = 0;
        let pending = std::mem::take(&mut self.pending);
        for mut envelope in pending {
            envelope.countdown = envelope.countdown.saturating_sub(1);
            if envelope.countdown == 0 {
                envelope.delivered_at = Some(now);
                self.actionable.push(envelope);
                promoted += 1;
            } else {
                self.pending.push(envelope);
            }
        }
        promoted
    }

    /// Drop actionable envelopes that became actionable more than `retention`
    /// ticks before `now`.  Returns the number dropped.
    pub fn purge_expired(&mut self, now: Tick, retention: u64) -> usize {
        let before = self.actionable.len();
        self.actionable.retain(|e| match e.delivered_at {
            Some(at) => now.since(at) <= retention,
            None     => true,
        });
        before - self.actionable.len()
    }

    // ── Reading ───────────────────────────────────────────────────────────

    pub fn actionable(&self) -> &[Envelope<M>] {
        &self.actionable
    }

    pub fn pending(&self) -> &[Envelope<M>] {
        &self.pending
    }

    /// Remove and return every actionable envelope matching `pred`, oldest
    /// first.
    pub fn take_all(&mut self, mut pred: impl FnMut(&Envelope<M>) -> bool) -> Vec<Envelope<M>> {
        let (taken, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.actionable).into_iter().partition(|e| pred(e));
        self.actionable = kept;
        taken
    }

    /// Drop everything, pending included.  Returns the number dropped.
    pub fn clear(&mut self) -> usize {
        let n = self.pending.len() + self.actionable.len();
        self.pending.clear();
        self.actionable.clear();
        n
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.actionable.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len() + self.actionable.len()
    }
}

// ── Lock bookkeeping (team channel) ───────────────────────────────────────────

impl Mailbox<TeamMsg> {
    /// Cancel each actionable `Unlock(p)` against an actionable `Lock(p)`
    /// from the same sender, sent no later than it.  Returns the number of
    /// pairs removed.
    ///
    /// An `Unlock` with no matching `Lock` yet is kept: its `Lock` may still
    /// be pending with a longer countdown.
    pub fn annihilate_locks(&mut self) -> usize {
        let mut pairs = 0;
        loop {
            let found = self.actionable.iter().enumerate().find_map(|(ui, u)| {
                let TeamMsg::Unlock(pos) = u.body else { return None };
                self.actionable
                    .iter()
                    .position(|l| l.body == TeamMsg::Lock(pos) && l.sender == u.sender && l.sent_at <= u.sent_at)
                    .map(|li| (li, ui))
            });
            let Some((li, ui)) = found else { break };
            // Remove the higher index first so the lower stays valid.
            let (hi, lo) = if li > ui { (li, ui) } else { (ui, li) };
            self.actionable.remove(hi);
            self.actionable.remove(lo);
            pairs += 1;
        }
        pairs
    }

    /// Tiles currently claimed by an actionable `Lock` from anyone not in
    /// `ignore`.
    pub fn locked_positions(&self, ignore: &[AgentId]) -> BTreeSet<Position> {
        self.actionable
            .iter()
            .filter(|e| !ignore.contains(&e.sender))
            .filter_map(|e| match e.body {
                TeamMsg::Lock(pos) => Some(pos),
                _                  => None,
            })
            .collect()
    }
}

// ── Inbox ─────────────────────────────────────────────────────────────────────

/// Both channels of one robot.
#[derive(Debug, Clone, Default)]
pub struct Inbox {
    pub team:    Mailbox<TeamMsg>,
    pub partner: Mailbox<PartnerMsg>,
}

impl Inbox {
    pub fn new() -> Self {
        Self::default()
    }
}
