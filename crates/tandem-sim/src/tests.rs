//! Integration tests for tandem-sim.

use tandem_core::{AgentId, ArenaConfig, CommsConfig, Direction, GridConfig, Position, Team, Tick};
use tandem_robot::{Fault, PairingState, PickupState};
use tandem_world::{World, WorldError};

use crate::{NoopObserver, Sim, SimBuilder, SimError, SimObserver, TickReport};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn small_config() -> ArenaConfig {
    ArenaConfig {
        grid: GridConfig { width: 5, height: 5, wrap: false },
        robots_per_team: 0,
        gold_units: 0,
        ..ArenaConfig::default()
    }
}

const GOLD: Position = Position { x: 2, y: 2 };

/// Two red robots either side of one gold unit at (2, 2); red base at (0, 0).
fn scenario() -> Sim {
    SimBuilder::new(small_config())
        .robot(Team::Red, Position::new(2, 1), Direction::South)
        .robot(Team::Red, Position::new(2, 3), Direction::North)
        .gold(GOLD, 1)
        .build()
        .unwrap()
}

/// Step until `done` holds (checked after every tick) or `max` ticks pass.
/// Consistency is asserted after every tick.
fn run_until(sim: &mut Sim, max: u64, done: impl Fn(&Sim) -> bool) -> Vec<TickReport> {
    let mut reports = Vec::new();
    for _ in 0..max {
        reports.push(sim.step().unwrap());
        assert_consistent(sim);
        if done(sim) {
            break;
        }
    }
    reports
}

fn assert_consistent(sim: &Sim) {
    let world: &World = sim.world();
    let carrying = sim.robots().iter().filter(|r| r.carrying()).count() as u64;
    assert_eq!(
        2 * world.total_gold() + carrying + world.total_credits(),
        2 * sim.initial_gold(),
        "gold not conserved at {}",
        sim.now()
    );
    for r in sim.robots() {
        if let Some(p) = r.partner() {
            assert_eq!(sim.robot(p).unwrap().partner(), Some(r.id()), "asymmetric link at {}", sim.now());
        }
        if r.carrying() {
            let p = r.partner().expect("carrying robot has a partner");
            assert!(sim.robot(p).unwrap().carrying(), "half-carried unit at {}", sim.now());
        }
        assert!(world.occupants(r.pos()).any(|o| o == r.id()));
    }
}

fn both_carrying(sim: &Sim) -> bool {
    sim.robots().iter().all(|r| r.carrying())
}

// ── SimBuilder ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn default_arena_is_populated() {
        let sim = SimBuilder::new(ArenaConfig::default()).build().unwrap();
        assert_eq!(sim.robots().len(), 20);
        assert_eq!(sim.initial_gold(), 50);
        assert_eq!(sim.world().total_gold(), 50);

        let first_red = sim.robot(AgentId(0)).unwrap();
        assert_eq!(first_red.team(), Team::Red);
        assert_eq!(first_red.pos(), Position::new(1, 0));
        assert_eq!(first_red.facing(), Direction::South);

        let first_blue = sim.robot(AgentId(10)).unwrap();
        assert_eq!(first_blue.team(), Team::Blue);
        assert_eq!(first_blue.pos(), Position::new(18, 19));
        assert_eq!(first_blue.facing(), Direction::North);
    }

    #[test]
    fn no_gold_scattered_on_bases() {
        let sim = SimBuilder::new(ArenaConfig { gold_units: 400, ..ArenaConfig::default() })
            .build()
            .unwrap();
        assert_eq!(sim.world().gold_at(Position::new(0, 0)), 0);
        assert_eq!(sim.world().gold_at(Position::new(19, 19)), 0);
        assert_eq!(sim.world().total_gold(), 400);
    }

    #[test]
    fn explicit_robots_follow_default_ones() {
        let sim = SimBuilder::new(ArenaConfig { robots_per_team: 2, ..small_config() })
            .robot(Team::Blue, Position::new(2, 2), Direction::East)
            .build()
            .unwrap();
        assert_eq!(sim.robots().len(), 5);
        assert_eq!(sim.robot(AgentId(4)).unwrap().pos(), Position::new(2, 2));
        assert!(sim.world().occupants(Position::new(2, 2)).any(|o| o == AgentId(4)));
    }

    #[test]
    fn robot_outside_the_grid_errors() {
        let result = SimBuilder::new(small_config())
            .robot(Team::Red, Position::new(9, 9), Direction::North)
            .build();
        assert!(matches!(result, Err(SimError::World(WorldError::OutOfBounds(_)))));
    }

    #[test]
    fn invalid_config_errors() {
        let config = ArenaConfig { grid: GridConfig { width: 1, height: 1, wrap: false }, ..small_config() };
        assert!(matches!(SimBuilder::new(config).build(), Err(SimError::Config(_))));
    }
}

// ── Run loop ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;

    #[test]
    fn run_advances_clock() {
        let mut sim = scenario();
        sim.run(5, &mut NoopObserver).unwrap();
        assert_eq!(sim.now(), Tick(5));
        sim.run(3, &mut NoopObserver).unwrap();
        assert_eq!(sim.now(), Tick(8));
    }

    #[test]
    fn run_to_end_stops_at_total_ticks() {
        let mut sim = SimBuilder::new(ArenaConfig { total_ticks: 20, ..small_config() }).build().unwrap();
        sim.run_to_end(&mut NoopObserver).unwrap();
        assert_eq!(sim.now(), Tick(20));
    }

    /// Observer that counts hook calls.
    #[derive(Default)]
    struct Counter {
        starts:    usize,
        ends:      usize,
        snapshots: Vec<Tick>,
        finished:  usize,
    }
    impl SimObserver for Counter {
        fn on_tick_start(&mut self, _t: Tick) { self.starts += 1; }
        fn on_tick_end(&mut self, _r: &TickReport, _w: &World) { self.ends += 1; }
        fn on_snapshot(&mut self, t: Tick, _w: &World, _r: &[tandem_robot::Robot]) { self.snapshots.push(t); }
        fn on_sim_end(&mut self, _t: Tick, _w: &World) { self.finished += 1; }
    }

    #[test]
    fn observer_called_correct_number_of_times() {
        let mut sim = SimBuilder::new(ArenaConfig { output_interval_ticks: 5, ..small_config() })
            .build()
            .unwrap();
        let mut obs = Counter::default();
        sim.run(12, &mut obs).unwrap();
        assert_eq!(obs.starts, 12);
        assert_eq!(obs.ends, 12);
        assert_eq!(obs.snapshots, vec![Tick(0), Tick(5), Tick(10)]);
        assert_eq!(obs.finished, 1);
    }

    #[test]
    fn same_seed_same_run() {
        let config = ArenaConfig { total_ticks: 150, ..ArenaConfig::default() };
        let mut a = SimBuilder::new(config.clone()).build().unwrap();
        let mut b = SimBuilder::new(config).build().unwrap();
        for _ in 0..150 {
            assert_eq!(a.step().unwrap(), b.step().unwrap());
        }
        let placed = |s: &Sim| s.robots().iter().map(|r| (r.pos(), r.facing(), r.carrying())).collect::<Vec<_>>();
        assert_eq!(placed(&a), placed(&b));
        assert_eq!(a.world().total_credits(), b.world().total_credits());
    }

    #[test]
    fn default_run_stays_consistent() {
        let mut sim = SimBuilder::new(ArenaConfig::default()).build().unwrap();
        let reports = run_until(&mut sim, 400, |_| false);
        assert_eq!(reports.len(), 400);
        assert!(reports.iter().all(|r| r.faults.iter().all(|f| !f.to_string().contains("not conserved"))));
    }
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scenario_tests {
    use super::*;

    #[test]
    fn pairing_then_pickup() {
        let mut sim = scenario();
        // Both step onto the gold, then handshake within the message delay.
        for _ in 0..8 {
            sim.step().unwrap();
            assert_consistent(&sim);
        }
        for r in sim.robots() {
            assert_eq!(r.pos(), GOLD);
            assert_eq!(r.pairing(), PairingState::Paired);
            assert!(r.partner().is_some());
            assert!(!r.carrying());
        }
        assert_eq!(sim.robot(AgentId(0)).unwrap().held_lock(), Some(GOLD));

        let reports = run_until(&mut sim, 40, both_carrying);
        assert!(both_carrying(&sim));
        assert_eq!(sim.world().gold_at(GOLD), 0);
        assert_eq!(reports.iter().map(|r| r.pickups).sum::<usize>(), 1);
        // The joint pickup happens on the agreed tick.
        let last = reports.last().unwrap();
        assert_eq!(last.pickups, 1);
        assert_eq!(last.count("protocol_desync"), 0);
    }

    #[test]
    fn transit_then_deposit() {
        let mut sim = scenario();
        run_until(&mut sim, 40, both_carrying);
        assert!(both_carrying(&sim));

        let reports = run_until(&mut sim, 80, |s| s.world().delivered(Team::Red) == 1);
        let base = sim.config.base_of(Team::Red);
        for r in sim.robots() {
            assert_eq!(r.pos(), base);
            assert!(!r.carrying());
            assert_eq!(r.partner(), None);
        }
        assert_eq!(sim.world().score(Team::Red), 1.0);
        assert_eq!(sim.world().score(Team::Blue), 0.0);
        assert_eq!(reports.iter().map(|r| r.deposits).sum::<usize>(), 2);
        assert_eq!(reports.iter().map(|r| r.delivered).sum::<usize>(), 1);
        assert_eq!(sim.gold_in_transit(), 0);
    }

    #[test]
    fn lock_released_after_pickup() {
        let mut sim = scenario();
        run_until(&mut sim, 40, both_carrying);
        // Let the unlock arrive and annihilate the lock.
        for _ in 0..4 {
            sim.step().unwrap();
        }
        for r in sim.robots() {
            assert_eq!(r.held_lock(), None);
            let inbox = sim.post().inbox(r.id()).unwrap();
            assert!(!inbox.team.locked_positions(&[]).contains(&GOLD));
        }
    }

    #[test]
    fn three_on_one_tile_aborts_pairing() {
        let mut sim = SimBuilder::new(small_config())
            .robot(Team::Red, GOLD, Direction::North)
            .robot(Team::Red, GOLD, Direction::North)
            .robot(Team::Red, GOLD, Direction::North)
            .gold(GOLD, 1)
            .build()
            .unwrap();

        let first = sim.step().unwrap();
        assert!(first.has_invariant_violation());
        assert_eq!(first.pickups, 0);
        assert_eq!(first.pairings, 0);
        assert!(sim.robots().iter().all(|r| r.pairing() == PairingState::Idle));
        // The highest id gives way.
        assert_ne!(sim.robot(AgentId(2)).unwrap().pos(), GOLD);

        let reports = run_until(&mut sim, 300, |s| s.world().gold_at(GOLD) == 0);
        assert_eq!(sim.world().gold_at(GOLD), 0);
        assert_eq!(reports.iter().map(|r| r.pickups).sum::<usize>(), 1);
    }

    #[test]
    fn vanished_gold_dissolves_the_pair() {
        let mut sim = scenario();
        run_until(&mut sim, 20, |s| s.robots().iter().all(|r| r.pairing() == PairingState::Paired));
        assert!(sim.robots().iter().all(|r| r.partner().is_some()));

        // Someone else took it.
        sim.world.remove_gold(GOLD).unwrap();
        sim.initial_gold = 0;

        sim.step().unwrap();
        assert_consistent(&sim);
        for r in sim.robots() {
            assert_eq!(r.partner(), None);
            assert_eq!(r.held_lock(), None);
        }
    }

    #[test]
    fn one_sided_pickup_is_a_desync() {
        // Acks land after the agreed tick, so only the acceptor commits.
        let config = ArenaConfig {
            comms: CommsConfig { min_delay_ticks: 2, max_delay_ticks: 2, ..CommsConfig::default() },
            sync_delay_ticks: 3,
            ..small_config()
        };
        let mut sim = SimBuilder::new(config)
            .robot(Team::Red, Position::new(2, 1), Direction::South)
            .robot(Team::Red, Position::new(2, 3), Direction::North)
            .gold(GOLD, 1)
            .build()
            .unwrap();

        let mut desync = None;
        for _ in 0..40 {
            let report = sim.step().unwrap();
            assert_consistent(&sim);
            assert_eq!(report.pickups, 0);
            let one_sided = report.faults.iter().any(|f| {
                matches!(f, Fault::ProtocolDesync { detail: "partner did not commit to the pickup", .. })
            });
            if one_sided {
                desync = Some(report);
                break;
            }
        }
        let report = desync.expect("acceptor commits alone within 40 ticks");
        assert_eq!(report.count("protocol_desync"), 2);
        assert_eq!(sim.world().gold_at(GOLD), 1);
        for r in sim.robots() {
            assert!(!r.carrying());
            assert!(r.partner().is_some());
            assert_eq!(r.pickup(), PickupState::Idle);
        }
    }

    #[test]
    fn pickup_is_all_or_nothing_under_short_sync_delay() {
        let config = ArenaConfig {
            sync_delay_ticks: 4,
            seed: 3,
            ..ArenaConfig::default()
        };
        let mut sim = SimBuilder::new(config).build().unwrap();
        for _ in 0..300 {
            let before: Vec<bool> = sim.robots().iter().map(|r| r.carrying()).collect();
            let gold_before = sim.world().total_gold();
            let report = sim.step().unwrap();
            assert_consistent(&sim);
            let lifted = sim
                .robots()
                .iter()
                .zip(&before)
                .filter(|(r, was)| r.carrying() && !**was)
                .count();
            assert_eq!(lifted, 2 * report.pickups);
            assert_eq!(gold_before + report.drops as u64 - sim.world().total_gold(), report.pickups as u64);
        }
    }

    #[test]
    fn separated_carriers_drop_the_unit() {
        let mut sim = scenario();
        run_until(&mut sim, 40, both_carrying);

        // Shove the higher id off the tile.
        let off = Position::new(3, 2);
        sim.world.move_occupant(AgentId(1), GOLD, off).unwrap();
        sim.robots[1].on_moved(off);

        let report = sim.step().unwrap();
        assert_consistent(&sim);
        assert_eq!(report.drops, 1);
        assert_eq!(sim.world().gold_at(GOLD), 1);
        for r in sim.robots() {
            assert!(!r.carrying());
            assert_eq!(r.partner(), None);
        }
    }
}
