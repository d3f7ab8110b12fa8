//! Fluent builder for constructing a [`Sim`].

use tandem_comms::PostOffice;
use tandem_core::{ArenaConfig, Direction, IdAllocator, Position, SimClock, SimRng, Team};
use tandem_robot::{AgentRngs, Robot};
use tandem_world::{World, WorldError};
use tracing::info;

use crate::{Sim, SimResult};

/// Fluent builder for [`Sim`].
///
/// Without explicit setup the arena is populated the default way:
/// `robots_per_team` robots per team lined up along their base row facing
/// into the grid, and `gold_units` gold scattered uniformly over non-base
/// tiles (stacking allowed).  Robots and gold added through the builder come
/// on top of that; set `robots_per_team` / `gold_units` to zero for a fully
/// hand-made arena.
///
/// Ids are handed out by an [`IdAllocator`] in creation order: default red
/// robots, default blue robots, then explicit robots in call order.
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config)
///     .robot(Team::Red, Position::new(2, 1), Direction::South)
///     .robot(Team::Red, Position::new(2, 3), Direction::North)
///     .gold(Position::new(2, 2), 1)
///     .build()?;
/// sim.run(100, &mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config: ArenaConfig,
    robots: Vec<(Team, Position, Direction)>,
    gold:   Vec<(Position, u32)>,
}

impl SimBuilder {
    pub fn new(config: ArenaConfig) -> Self {
        Self { config, robots: Vec::new(), gold: Vec::new() }
    }

    /// Add one robot.
    pub fn robot(mut self, team: Team, pos: Position, facing: Direction) -> Self {
        self.robots.push((team, pos, facing));
        self
    }

    /// Put `units` gold on `pos`.
    pub fn gold(mut self, pos: Position, units: u32) -> Self {
        self.gold.push((pos, units));
        self
    }

    /// Validate the configuration, populate the world and return a
    /// ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim> {
        self.config.validate()?;
        let config = self.config;
        let bounds = config.bounds();
        let bases = [config.base_of(Team::Red), config.base_of(Team::Blue)];
        let mut world = World::new(bounds, bases)?;
        let mut sim_rng = SimRng::new(config.seed);

        // ── Robots ────────────────────────────────────────────────────────
        let mut placements = default_placement(&config);
        placements.extend(self.robots);

        let mut ids = IdAllocator::new();
        let mut robots = Vec::with_capacity(placements.len());
        for (team, pos, facing) in placements {
            let id = ids.allocate();
            let pos = world.resolve(pos).ok_or(WorldError::OutOfBounds(pos))?;
            world.add_occupant(pos, id)?;
            robots.push(Robot::new(id, team, pos, facing, config.base_of(team)));
        }

        // ── Gold ──────────────────────────────────────────────────────────
        for (pos, units) in self.gold {
            world.add_gold(pos, units)?;
        }
        let free: Vec<Position> = world
            .tiles()
            .filter(|(_, t)| !t.is_deposit())
            .map(|(p, _)| p)
            .collect();
        if !free.is_empty() {
            for _ in 0..config.gold_units {
                let pos = free[sim_rng.gen_range(0..free.len())];
                world.add_gold(pos, 1)?;
            }
        }

        let teams: Vec<Team> = robots.iter().map(Robot::team).collect();
        let initial_gold = world.total_gold();
        info!(
            robots = ids.allocated(),
            gold = initial_gold,
            width = bounds.width,
            height = bounds.height,
            "arena built"
        );

        Ok(Sim {
            clock:  SimClock::new(),
            rngs:   AgentRngs::new(robots.len(), config.seed),
            post:   PostOffice::new(config.comms.clone(), teams),
            config,
            world,
            robots,
            initial_gold,
        })
    }
}

/// Red lines up along the top row from the left, facing south; blue along
/// the bottom row from the right, facing north.  Base corners stay free.
fn default_placement(config: &ArenaConfig) -> Vec<(Team, Position, Direction)> {
    let n = config.robots_per_team as i32;
    let w = config.grid.width as i32;
    let h = config.grid.height as i32;
    let red = (0..n).map(|i| (Team::Red, Position::new(1 + i, 0), Direction::South));
    let blue = (0..n).map(|i| (Team::Blue, Position::new(w - 2 - i, h - 1), Direction::North));
    red.chain(blue).collect()
}
