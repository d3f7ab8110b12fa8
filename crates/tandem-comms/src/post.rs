//! The post office: fans sends out to recipient mailboxes and runs the
//! per-tick delivery step.

use tracing::{debug, trace};

use tandem_core::{AgentId, AgentRng, CommsConfig, MessageId, Team, Tick};

use crate::{Envelope, Inbox, Outgoing, PartnerMsg, Recipient, TeamMsg};

// ── Stats ─────────────────────────────────────────────────────────────────────

/// Running totals since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostStats {
    /// Sends accepted (one per `send_*` call, however many recipients).
    pub sent:        u64,
    /// Per-recipient copies filed.
    pub filed:       u64,
    /// Per-recipient copies dropped as duplicates.
    pub suppressed:  u64,
    /// Copies promoted from pending to actionable.
    pub promoted:    u64,
    /// Lock/unlock pairs cancelled.
    pub annihilated: u64,
    /// Actionable copies dropped by the retention window.
    pub purged:      u64,
}

/// What one `deliver` call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub promoted:    usize,
    pub annihilated: usize,
    pub purged:      usize,
}

// ── PostOffice ────────────────────────────────────────────────────────────────

/// Owns every robot's `Inbox`, indexed by `AgentId`.
///
/// Teams are fixed at construction: the roster of a team is the list of its
/// robots in creation order, which is also the fan-out order of a broadcast.
#[derive(Debug, Clone)]
pub struct PostOffice {
    config:  CommsConfig,
    inboxes: Vec<Inbox>,
    teams:   Vec<Team>,
    rosters: [Vec<AgentId>; 2],
    next_id: u64,
    stats:   PostStats,
}

impl PostOffice {
    /// `teams[i]` is the team of `AgentId(i)`.
    pub fn new(config: CommsConfig, teams: Vec<Team>) -> Self {
        let mut rosters: [Vec<AgentId>; 2] = [Vec::new(), Vec::new()];
        for (i, team) in teams.iter().enumerate() {
            rosters[team.index()].push(AgentId(i as u32));
        }
        Self {
            config,
            inboxes: vec![Inbox::new(); teams.len()],
            teams,
            rosters,
            next_id: 0,
            stats: PostStats::default(),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &CommsConfig {
        &self.config
    }

    pub fn stats(&self) -> PostStats {
        self.stats
    }

    pub fn roster(&self, team: Team) -> &[AgentId] {
        &self.rosters[team.index()]
    }

    pub fn team_of(&self, agent: AgentId) -> Option<Team> {
        self.teams.get(agent.index()).copied()
    }

    pub fn inbox(&self, agent: AgentId) -> Option<&Inbox> {
        self.inboxes.get(agent.index())
    }

    pub fn inbox_mut(&mut self, agent: AgentId) -> Option<&mut Inbox> {
        self.inboxes.get_mut(agent.index())
    }

    // ── Sending ───────────────────────────────────────────────────────────

    /// Dispatch one robot intent.  Returns `None` if nothing was filed.
    pub fn dispatch(&mut self, now: Tick, sender: AgentId, out: Outgoing, rng: &mut AgentRng) -> Option<MessageId> {
        match out {
            Outgoing::Team { to, body }    => self.send_team(now, sender, to, body, rng),
            Outgoing::Partner { to, body } => self.send_partner(now, sender, to, body, rng),
        }
    }

    /// Send on the team channel.  A broadcast reaches every teammate but the
    /// sender; a directed send only reaches a teammate.
    ///
    /// One latency is drawn per send from the sender's RNG and copied onto
    /// each recipient's envelope.
    pub fn send_team(
        &mut self,
        now:       Tick,
        sender:    AgentId,
        recipient: Recipient,
        body:      TeamMsg,
        rng:       &mut AgentRng,
    ) -> Option<MessageId> {
        let team = self.team_of(sender)?;
        let targets: Vec<AgentId> = match recipient {
            Recipient::Team => self.rosters[team.index()]
                .iter()
                .copied()
                .filter(|&id| id != sender)
                .collect(),
            Recipient::Agent(to) if to != sender && self.team_of(to) == Some(team) => vec![to],
            Recipient::Agent(to) => {
                debug!(sender = %sender, to = %to, ?body, "team message to non-teammate dropped");
                return None;
            }
        };
        let countdown = self.draw_latency(rng);
        let id = self.allocate_id();
        self.stats.sent += 1;
        for to in targets {
            let envelope = Envelope {
                id,
                sender,
                recipient,
                sent_at: now,
                countdown,
                delivered_at: None,
                body,
            };
            let filed = self.inboxes[to.index()].team.file(envelope);
            self.record_filing(filed, sender, to);
        }
        trace!(sender = %sender, ?recipient, ?body, countdown, "team message sent");
        Some(id)
    }

    /// Send on the partner channel to `to` only.
    pub fn send_partner(
        &mut self,
        now:    Tick,
        sender: AgentId,
        to:     AgentId,
        body:   PartnerMsg,
        rng:    &mut AgentRng,
    ) -> Option<MessageId> {
        if to == sender || to.index() >= self.inboxes.len() {
            debug!(sender = %sender, to = %to, ?body, "partner message without a valid partner dropped");
            return None;
        }
        let countdown = self.draw_latency(rng);
        let id = self.allocate_id();
        self.stats.sent += 1;
        trace!(sender = %sender, to = %to, ?body, countdown, "partner message sent");
        let envelope = Envelope {
            id,
            sender,
            recipient: Recipient::Agent(to),
            sent_at: now,
            countdown,
            delivered_at: None,
            body,
        };
        let filed = self.inboxes[to.index()].partner.file(envelope);
        self.record_filing(filed, sender, to);
        Some(id)
    }

    // ── Delivery ──────────────────────────────────────────────────────────

    /// The deliver phase: count down, promote, cancel lock pairs, purge.
    pub fn deliver(&mut self, now: Tick) -> DeliveryReport {
        let retention = self.config.retention_ticks;
        let mut report = DeliveryReport::default();
        for inbox in &mut self.inboxes {
            report.promoted += inbox.team.deliver(now);
            report.promoted += inbox.partner.deliver(now);
            report.annihilated += inbox.team.annihilate_locks();
            report.purged += inbox.team.purge_expired(now, retention);
            report.purged += inbox.partner.purge_expired(now, retention);
        }
        self.stats.promoted += report.promoted as u64;
        self.stats.annihilated += report.annihilated as u64;
        self.stats.purged += report.purged as u64;
        report
    }

    /// Forget everything on `agent`'s partner channel, in flight included.
    /// Used when a partnership dissolves so stale traffic cannot leak into
    /// the next one.
    pub fn clear_partner_channel(&mut self, agent: AgentId) -> usize {
        self.inboxes
            .get_mut(agent.index())
            .map(|inbox| inbox.partner.clear())
            .unwrap_or(0)
    }

    /// Total envelopes held across all mailboxes.
    pub fn in_flight(&self) -> usize {
        self.inboxes.iter().map(|i| i.team.len() + i.partner.len()).sum()
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn draw_latency(&self, rng: &mut AgentRng) -> u32 {
        rng.gen_range(self.config.min_delay_ticks..=self.config.max_delay_ticks)
    }

    fn allocate_id(&mut self) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        id
    }

    fn record_filing(&mut self, filed: bool, sender: AgentId, to: AgentId) {
        if filed {
            self.stats.filed += 1;
        } else {
            self.stats.suppressed += 1;
            trace!(sender = %sender, to = %to, "duplicate suppressed");
        }
    }
}
