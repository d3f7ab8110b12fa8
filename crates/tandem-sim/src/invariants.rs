//! End-of-tick consistency checks.
//!
//! Violations are reported as faults, never as errors: the run continues
//! and the offending partnership is taken apart so the arena can recover.

use tandem_core::{AgentId, Position};
use tandem_robot::{Effects, Fault};
use tracing::error;

use crate::{Sim, TickReport};

impl Sim {
    pub(crate) fn check_invariants(&mut self, report: &mut TickReport) -> Vec<(AgentId, Effects)> {
        let mut tagged = Vec::new();

        // ── Partner symmetry ──────────────────────────────────────────────
        for i in 0..self.robots.len() {
            let robot = &self.robots[i];
            let (id, pos) = (robot.id(), robot.pos());
            let Some(partner) = robot.partner() else { continue };
            let reciprocated = self.robots.get(partner.index()).is_some_and(|p| p.partner() == Some(id));
            if !reciprocated {
                let mut fx = Effects::new();
                fx.fault(Fault::InvariantViolation { agent: id, pos, detail: "partner link not reciprocated" });
                fx.extend(self.robots[i].dissolve().into());
                self.post.clear_partner_channel(id);
                tagged.push((id, fx));
            }
        }

        // ── Carrying needs a partner ──────────────────────────────────────
        for robot in &self.robots {
            if robot.carrying() && robot.partner().is_none() {
                let mut fx = Effects::new();
                fx.fault(Fault::InvariantViolation {
                    agent:  robot.id(),
                    pos:    robot.pos(),
                    detail: "carrying without a partner",
                });
                tagged.push((robot.id(), fx));
            }
        }

        // ── Occupancy ─────────────────────────────────────────────────────
        let mut occupied = 0usize;
        for robot in &self.robots {
            if self.world.occupants(robot.pos()).any(|o| o == robot.id()) {
                occupied += 1;
            } else {
                let mut fx = Effects::new();
                fx.fault(Fault::InvariantViolation {
                    agent:  robot.id(),
                    pos:    robot.pos(),
                    detail: "robot missing from its tile",
                });
                tagged.push((robot.id(), fx));
            }
        }
        let listed: usize = self.world.tiles().map(|(_, t)| t.occupants.len()).sum();
        if listed != occupied {
            let mut fx = Effects::new();
            fx.fault(Fault::InvariantViolation {
                agent:  AgentId::INVALID,
                pos:    Position::default(),
                detail: "stray tile occupant",
            });
            tagged.push((AgentId::INVALID, fx));
        }

        // ── Gold conservation (in half units) ─────────────────────────────
        let carrying = self.robots.iter().filter(|r| r.carrying()).count() as u64;
        let halves = 2 * self.world.total_gold() + carrying + self.world.total_credits();
        if halves != 2 * self.initial_gold {
            error!(
                tick = %report.tick,
                expected = 2 * self.initial_gold,
                found = halves,
                "gold not conserved"
            );
            let mut fx = Effects::new();
            fx.fault(Fault::InvariantViolation {
                agent:  AgentId::INVALID,
                pos:    Position::default(),
                detail: "gold not conserved",
            });
            tagged.push((AgentId::INVALID, fx));
        }

        tagged
    }
}
