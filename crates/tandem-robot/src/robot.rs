//! The `Robot` agent: physical state, protocol state, and the per-phase
//! entry points the driver calls.

use std::collections::BTreeMap;

use tandem_comms::{Inbox, Mailbox, Outgoing, PartnerMsg, TeamMsg};
use tandem_core::{AgentId, AgentRng, Direction, Position, Rotation, Team, Tick};
use tracing::debug;

use crate::{
    Decision, Effects, Fault, PairingState, PickupState, RobotView, TickContext, TileMemory,
    TransitState, navigation,
};

/// One autonomous robot.
///
/// Physical state (`pos`, `facing`, `carrying`, `partner`) changes only
/// through the driver hooks during the execute phase; protocol state changes
/// only in `plan` and `read`.
#[derive(Debug, Clone)]
pub struct Robot {
    pub(crate) id:       AgentId,
    pub(crate) team:     Team,
    pub(crate) pos:      Position,
    pub(crate) facing:   Direction,
    pub(crate) carrying: bool,
    pub(crate) partner:  Option<AgentId>,
    /// This robot's team base.
    pub(crate) deposit:  Position,
    pub(crate) decision: Decision,

    // ── Protocol axes ─────────────────────────────────────────────────────
    pub(crate) pairing: PairingState,
    pub(crate) pickup:  PickupState,
    pub(crate) transit: TransitState,

    // ── Private knowledge ─────────────────────────────────────────────────
    pub(crate) memory:           TileMemory,
    pub(crate) target:           Option<Position>,
    pub(crate) held_lock:        Option<Position>,
    pub(crate) announced_facing: Option<Direction>,
    /// Partner's latest announced facing and when it was sent.
    pub(crate) partner_facing:   Option<(Direction, Tick)>,
    /// Standing alone on claimable gold since this tick.
    pub(crate) alone_since:      Option<Tick>,
    /// Delivered our half; waiting for the partner's.
    pub(crate) deposited:        bool,
    /// Tiles to stay away from, until the given tick.
    pub(crate) shunned:          BTreeMap<Position, Tick>,
}

impl Robot {
    pub fn new(id: AgentId, team: Team, pos: Position, facing: Direction, deposit: Position) -> Self {
        Self {
            id,
            team,
            pos,
            facing,
            carrying: false,
            partner: None,
            deposit,
            decision: Decision::Stay,
            pairing: PairingState::Idle,
            pickup: PickupState::Idle,
            transit: TransitState::Idle,
            memory: TileMemory::new(),
            target: None,
            held_lock: None,
            announced_facing: None,
            partner_facing: None,
            alone_since: None,
            deposited: false,
            shunned: BTreeMap::new(),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline] pub fn id(&self) -> AgentId { self.id }
    #[inline] pub fn team(&self) -> Team { self.team }
    #[inline] pub fn pos(&self) -> Position { self.pos }
    #[inline] pub fn facing(&self) -> Direction { self.facing }
    #[inline] pub fn carrying(&self) -> bool { self.carrying }
    #[inline] pub fn partner(&self) -> Option<AgentId> { self.partner }
    #[inline] pub fn deposit(&self) -> Position { self.deposit }
    #[inline] pub fn decision(&self) -> Decision { self.decision }
    #[inline] pub fn pairing(&self) -> PairingState { self.pairing }
    #[inline] pub fn pickup(&self) -> PickupState { self.pickup }
    #[inline] pub fn transit(&self) -> &TransitState { &self.transit }
    #[inline] pub fn memory(&self) -> &TileMemory { &self.memory }
    #[inline] pub fn target(&self) -> Option<Position> { self.target }
    #[inline] pub fn held_lock(&self) -> Option<Position> { self.held_lock }

    /// What other robots see when they look at this one.
    pub fn view(&self) -> RobotView {
        RobotView {
            id:       self.id,
            team:     self.team,
            pos:      self.pos,
            facing:   self.facing,
            paired:   self.partner.is_some(),
            carrying: self.carrying,
        }
    }

    // ── Phase 2: sense ────────────────────────────────────────────────────

    pub fn sense(&mut self, ctx: &TickContext<'_>) {
        self.memory.observe(ctx, self.pos, self.facing);
    }

    // ── Phase 3: plan ─────────────────────────────────────────────────────

    /// Advance whichever protocol axis applies and commit this tick's
    /// decision.  Lock tokens are only peeked at here, never consumed.
    pub fn plan(&mut self, ctx: &TickContext<'_>, inbox: &Inbox, rng: &mut AgentRng) -> Effects {
        let mut fx = Effects::new();
        let now = ctx.now;
        self.shunned.retain(|_, until| *until > now);

        let decision = match self.partner {
            _ if self.carrying => self.plan_transit(ctx, &mut fx),
            Some(partner)      => self.plan_paired(ctx, partner, &inbox.team, &mut fx),
            None               => self.plan_unpaired(ctx, &inbox.team, rng, &mut fx),
        };
        self.decision = decision;
        fx
    }

    fn plan_unpaired(
        &mut self,
        ctx:   &TickContext<'_>,
        team:  &Mailbox<TeamMsg>,
        rng:   &mut AgentRng,
        fx:    &mut Effects,
    ) -> Decision {
        let bounds = ctx.world.bounds();
        let locked = team.locked_positions(&[self.id]);

        if let Some(here) = self.memory.get(self.pos) {
            let claimable = here.has_loose_gold()
                && !locked.contains(&self.pos)
                && !self.shunned.contains_key(&self.pos);
            if claimable {
                let mut contenders: Vec<AgentId> = here.unpaired(self.team).collect();
                if !contenders.contains(&self.id) {
                    contenders.push(self.id);
                    contenders.sort();
                }
                return self.plan_pairing(ctx, &contenders, fx);
            }
            if here.has_loose_gold() && locked.contains(&self.pos) {
                debug!(agent = %self.id, pos = %self.pos, "tile locked by another pair; diverting");
            }
        }

        if self.pairing != PairingState::Idle {
            debug!(agent = %self.id, state = ?self.pairing, "left the gold tile; pairing reset");
            self.pairing = PairingState::Idle;
        }
        self.alone_since = None;

        if let Some(t) = self.target {
            let still_good = !locked.contains(&t)
                && !self.shunned.contains_key(&t)
                && self.memory.get(t).is_some_and(|s| s.has_loose_gold());
            if !still_good {
                debug!(agent = %self.id, target = %t, "target dropped");
                self.target = None;
            }
        }
        if self.target.is_none() {
            self.target = self
                .memory
                .nearest_gold(self.pos, |p| locked.contains(&p) || self.shunned.contains_key(&p) || p == self.pos);
        }

        match self.target {
            Some(t) => navigation::step_towards(self.pos, self.facing, t, bounds),
            None    => navigation::wander(self.pos, self.facing, bounds, ctx.config.wander_turn_probability, rng),
        }
    }

    // ── Phase 4: read ─────────────────────────────────────────────────────

    /// Consume newly actionable messages relevant to the current protocol
    /// state.  May revise this tick's decision (an accepted pair request
    /// turns `Stay` into `PairUp`).
    pub fn read(&mut self, ctx: &TickContext<'_>, inbox: &mut Inbox) -> Effects {
        let mut fx = Effects::new();
        self.read_pairing(&mut inbox.team, &mut fx);
        self.read_partner(ctx, &mut inbox.partner, &mut fx);
        fx
    }

    fn read_partner(&mut self, ctx: &TickContext<'_>, mailbox: &mut Mailbox<PartnerMsg>, fx: &mut Effects) {
        let partner = self.partner;
        for envelope in mailbox.take_all(|e| Some(e.sender) != partner) {
            fx.fault(Fault::StaleMessage { agent: self.id, sender: envelope.sender, what: "partner message" });
        }
        let Some(partner) = partner else { return };
        // Pickup traffic stays queued until the handshake has completed.
        if self.pairing != PairingState::Paired {
            return;
        }

        for envelope in mailbox.take_all(|_| true) {
            match envelope.body.clone() {
                PartnerMsg::PickupRequest(t) => self.read_pickup_request(ctx, partner, &envelope, t, fx),
                PartnerMsg::PickupAck(t) => self.read_pickup_ack(ctx, &envelope, t, fx),
                PartnerMsg::Facing(dir) => {
                    // Announcements may overtake each other in flight.
                    if self.partner_facing.is_none_or(|(_, at)| envelope.sent_at >= at) {
                        self.partner_facing = Some((dir, envelope.sent_at));
                    }
                }
                PartnerMsg::MoveSyncRequest { activation, plan } => {
                    self.read_move_sync_request(ctx, partner, &envelope, activation, plan, fx)
                }
                PartnerMsg::MoveSyncAck(t) => self.read_move_sync_ack(ctx, &envelope, t, fx),
            }
        }
    }

    // ── Phase 5: driver hooks ─────────────────────────────────────────────

    pub fn on_moved(&mut self, to: Position) {
        self.pos = to;
    }

    pub fn on_turned(&mut self, rotation: Rotation) {
        self.facing = self.facing.rotated(rotation);
    }

    /// Mark this tick's decision as already executed on our behalf.
    pub fn consume_decision(&mut self) {
        self.decision = Decision::Stay;
    }

    /// Forget the partnership and every protocol in flight.  Returns the
    /// unlock broadcast if this robot still held a lock.
    pub fn dissolve(&mut self) -> Vec<Outgoing> {
        debug!(agent = %self.id, partner = ?self.partner, "partnership dissolved");
        self.partner = None;
        self.pairing = PairingState::Idle;
        self.pickup = PickupState::Idle;
        self.transit = TransitState::Idle;
        self.announced_facing = None;
        self.partner_facing = None;
        self.alone_since = None;
        self.deposited = false;
        self.target = None;
        self.release_lock()
    }

    pub(crate) fn release_lock(&mut self) -> Vec<Outgoing> {
        match self.held_lock.take() {
            Some(pos) => {
                debug!(agent = %self.id, pos = %pos, "unlock broadcast");
                vec![Outgoing::broadcast(TeamMsg::Unlock(pos))]
            }
            None => Vec::new(),
        }
    }
}
