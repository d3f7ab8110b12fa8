//! Phase 5: apply one robot's decision to the world.
//!
//! Joint actions are executed once, by whichever partner comes first in id
//! order; the other partner's matching decision is consumed so it does not
//! run twice.

use tandem_core::AgentId;
use tandem_robot::{Decision, Effects, Fault};
use tandem_world::WorldError;
use tracing::{debug, info, warn};

use crate::{Sim, SimResult, TickReport};

/// Effects keyed by the robot that produced them.
type Tagged = Vec<(AgentId, Effects)>;

impl Sim {
    pub(crate) fn execute(&mut self, i: usize, report: &mut TickReport) -> SimResult<Tagged> {
        let robot = &self.robots[i];
        let id = robot.id();
        match robot.decision() {
            Decision::Stay => Ok(Vec::new()),
            Decision::Forward => {
                self.execute_forward(i)?;
                Ok(Vec::new())
            }
            Decision::Turn(rotation) => {
                self.robots[i].on_turned(rotation);
                Ok(Vec::new())
            }
            Decision::PairUp(offerer) => Ok(self.execute_pair_up(i, offerer, report)),
            Decision::PickUp => self.execute_pickup(i, report),
            Decision::Deposit => Ok(self.execute_deposit(i, report)),
            Decision::Unpair => {
                debug!(agent = %id, "unpairing");
                Ok(self.robots[i].partner().map(|p| self.dissolve_pair(id, p)).unwrap_or_default())
            }
            Decision::Drop => self.execute_drop(i, report),
        }
    }

    fn execute_forward(&mut self, i: usize) -> SimResult<()> {
        let robot = &self.robots[i];
        let (id, from) = (robot.id(), robot.pos());
        let to = from.step(robot.facing());
        match self.world.move_occupant(id, from, to) {
            Ok(dest) => {
                self.robots[i].on_moved(dest);
                Ok(())
            }
            Err(WorldError::OutOfBounds(_)) => {
                debug!(agent = %id, pos = %from, "blocked by the edge");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn execute_pair_up(&mut self, i: usize, offerer: AgentId, report: &mut TickReport) -> Tagged {
        let seeker = &self.robots[i];
        let id = seeker.id();
        let available = self.robots.get(offerer.index()).is_some_and(|o| {
            o.id() != id
                && o.team() == seeker.team()
                && o.pos() == seeker.pos()
                && o.partner().is_none()
                && !o.carrying()
        }) && seeker.partner().is_none();

        let mut fx = Effects::new();
        if !available {
            fx.fault(Fault::ProtocolDesync { agent: id, partner: offerer, detail: "pair-up partner unavailable" });
            self.robots[i].on_link_failed();
            return vec![(id, fx)];
        }

        self.post.clear_partner_channel(id);
        self.post.clear_partner_channel(offerer);
        fx.extend(self.robots[i].on_linked(offerer).into());
        let offerer_fx: Effects = self.robots[offerer.index()].on_linked(id).into();
        report.pairings += 1;
        info!(seeker = %id, offerer = %offerer, pos = %self.robots[i].pos(), "pair formed");
        vec![(id, fx), (offerer, offerer_fx)]
    }

    fn execute_pickup(&mut self, i: usize, report: &mut TickReport) -> SimResult<Tagged> {
        let robot = &self.robots[i];
        let (id, pos, team) = (robot.id(), robot.pos(), robot.team());
        let mut fx = Effects::new();

        let Some(partner) = robot.partner() else {
            fx.fault(Fault::InvariantViolation { agent: id, pos, detail: "pickup without a partner" });
            self.robots[i].on_pickup_failed();
            return Ok(vec![(id, fx)]);
        };
        let p = partner.index();

        if self.world.gold_at(pos) == 0 {
            fx.fault(Fault::InvariantViolation { agent: id, pos, detail: "no gold left to pick up" });
            self.robots[p].consume_decision();
            let mut tagged = vec![(id, fx)];
            tagged.extend(self.dissolve_pair(id, partner));
            return Ok(tagged);
        }

        let same_team: Vec<AgentId> = self
            .world
            .occupants(pos)
            .filter(|o| self.robots.get(o.index()).is_some_and(|r| r.team() == team))
            .collect();
        let exactly_pair = same_team.len() == 2 && same_team.contains(&id) && same_team.contains(&partner);
        let partner_ready = self.robots[p].decision() == Decision::PickUp && self.robots[p].pos() == pos;

        if !exactly_pair || !partner_ready {
            let detail = if exactly_pair { "partner did not commit to the pickup" } else { "tile not held by the pair alone" };
            fx.fault(Fault::ProtocolDesync { agent: id, partner, detail });
            let mut partner_fx = Effects::new();
            partner_fx.fault(Fault::ProtocolDesync { agent: partner, partner: id, detail });
            self.robots[i].on_pickup_failed();
            self.robots[p].on_pickup_failed();
            if self.robots[p].decision() == Decision::PickUp {
                self.robots[p].consume_decision();
            }
            return Ok(vec![(id, fx), (partner, partner_fx)]);
        }

        self.world.remove_gold(pos)?;
        let own: Effects = self.robots[i].on_picked_up().into();
        let theirs: Effects = self.robots[p].on_picked_up().into();
        self.robots[p].consume_decision();
        report.pickups += 1;
        info!(agent = %id, partner = %partner, pos = %pos, "gold picked up");
        Ok(vec![(id, own), (partner, theirs)])
    }

    fn execute_deposit(&mut self, i: usize, report: &mut TickReport) -> Tagged {
        let robot = &self.robots[i];
        let (id, pos, team) = (robot.id(), robot.pos(), robot.team());
        if !robot.carrying() || self.world.deposit_owner(pos) != Some(team) {
            let mut fx = Effects::new();
            fx.fault(Fault::InvariantViolation { agent: id, pos, detail: "deposit away from own base or empty-handed" });
            return vec![(id, fx)];
        }

        self.robots[i].on_deposited();
        self.world.credit(team);
        report.deposits += 1;
        debug!(agent = %id, team = %team, "half unit deposited");

        match self.robots[i].partner() {
            Some(partner) if !self.robots[partner.index()].carrying() => {
                report.delivered += 1;
                info!(agent = %id, partner = %partner, team = %team, "unit delivered");
                self.dissolve_pair(id, partner)
            }
            _ => Vec::new(),
        }
    }

    fn execute_drop(&mut self, i: usize, report: &mut TickReport) -> SimResult<Tagged> {
        let robot = &self.robots[i];
        let (id, pos) = (robot.id(), robot.pos());
        // Already handled by the partner's drop earlier this tick.
        let Some(partner) = robot.partner() else { return Ok(Vec::new()) };
        if !robot.carrying() {
            return Ok(Vec::new());
        }

        let mut tagged = Vec::new();
        if self.robots[partner.index()].carrying() {
            self.world.add_gold(pos, 1)?;
            self.robots[partner.index()].on_dropped();
            report.drops += 1;
            warn!(agent = %id, partner = %partner, pos = %pos, "unit dropped");
        } else {
            let mut fx = Effects::new();
            fx.fault(Fault::InvariantViolation { agent: id, pos, detail: "partner no longer holds the other half" });
            tagged.push((id, fx));
        }
        self.robots[i].on_dropped();
        tagged.extend(self.dissolve_pair(id, partner));
        Ok(tagged)
    }

    /// Unlink `a` and `b` (if `b` still points back at `a`), reset both
    /// robots' protocols and clear their private channels.
    pub(crate) fn dissolve_pair(&mut self, a: AgentId, b: AgentId) -> Tagged {
        let mut tagged = vec![(a, self.robots[a.index()].dissolve().into())];
        self.post.clear_partner_channel(a);
        if self.robots.get(b.index()).is_some_and(|r| r.partner() == Some(a)) {
            tagged.push((b, self.robots[b.index()].dissolve().into()));
            self.post.clear_partner_channel(b);
        }
        tagged
    }
}
