//! Unit tests for tandem-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, IdAllocator, MessageId};

    #[test]
    fn index_roundtrip() {
        let id = AgentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgentId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(AgentId::INVALID.0, u32::MAX);
        assert_eq!(MessageId::INVALID.0, u64::MAX);
        assert_eq!(AgentId::default(), AgentId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
    }

    #[test]
    fn allocator_is_dense_and_reproducible() {
        let mut a = IdAllocator::new();
        let mut b = IdAllocator::new();
        let first: Vec<AgentId> = (0..4).map(|_| a.allocate()).collect();
        let second: Vec<AgentId> = (0..4).map(|_| b.allocate()).collect();
        assert_eq!(first, vec![AgentId(0), AgentId(1), AgentId(2), AgentId(3)]);
        assert_eq!(first, second);
        assert_eq!(a.allocated(), 4);
    }
}

#[cfg(test)]
mod grid {
    use crate::{Direction, GridBounds, Position, Rotation};

    #[test]
    fn rotation_cycles() {
        let mut d = Direction::North;
        for _ in 0..4 {
            d = d.clockwise();
        }
        assert_eq!(d, Direction::North);
        assert_eq!(Direction::North.counter_clockwise(), Direction::West);
        assert_eq!(Direction::West.rotated(Rotation::Clockwise), Direction::North);
    }

    #[test]
    fn step_uses_screen_coordinates() {
        let p = Position::new(2, 2);
        assert_eq!(p.step(Direction::North), Position::new(2, 1));
        assert_eq!(p.step(Direction::East), Position::new(3, 2));
        assert_eq!(p.step(Direction::South), Position::new(2, 3));
        assert_eq!(p.step(Direction::West), Position::new(1, 2));
    }

    #[test]
    fn rotate_offset_matches_step_vectors() {
        // The "straight ahead" offset lands on the facing's own step vector.
        for d in Direction::ALL {
            assert_eq!(d.rotate_offset((0, -1)), d.delta(), "facing {d}");
        }
        // Front-left (-1, -1) for north.
        assert_eq!(Direction::East.rotate_offset((-1, -1)), (1, -1));
        assert_eq!(Direction::South.rotate_offset((-1, -1)), (1, 1));
    }

    #[test]
    fn rotation_towards_picks_shortest_turn() {
        assert_eq!(Direction::North.rotation_towards(Direction::North), None);
        assert_eq!(Direction::North.rotation_towards(Direction::East), Some(Rotation::Clockwise));
        assert_eq!(Direction::North.rotation_towards(Direction::West), Some(Rotation::CounterClockwise));
        assert_eq!(Direction::North.rotation_towards(Direction::South), Some(Rotation::Clockwise));
    }

    #[test]
    fn towards_prefers_larger_axis_then_x() {
        let from = Position::new(2, 2);
        assert_eq!(Direction::towards(from, from), None);
        assert_eq!(Direction::towards(from, Position::new(0, 0)), Some(Direction::West));
        assert_eq!(Direction::towards(from, Position::new(1, 4)), Some(Direction::South));
        assert_eq!(Direction::towards(from, Position::new(5, 3)), Some(Direction::East));
        assert_eq!(Direction::towards(from, Position::new(2, 0)), Some(Direction::North));
    }

    #[test]
    fn bounded_resolve_rejects_outside() {
        let b = GridBounds::new(5, 5, false);
        assert_eq!(b.resolve(Position::new(4, 4)), Some(Position::new(4, 4)));
        assert_eq!(b.resolve(Position::new(5, 0)), None);
        assert_eq!(b.resolve(Position::new(0, -1)), None);
    }

    #[test]
    fn wrapped_resolve_folds_coordinates() {
        let b = GridBounds::new(5, 4, true);
        assert_eq!(b.resolve(Position::new(-1, 0)), Some(Position::new(4, 0)));
        assert_eq!(b.resolve(Position::new(5, 4)), Some(Position::new(0, 0)));
    }

    #[test]
    fn index_and_position_agree() {
        let b = GridBounds::new(5, 5, false);
        for i in 0..b.cell_count() {
            assert_eq!(b.index(b.position_of(i)), Some(i));
        }
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, Tick};

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(Tick(15) - Tick(10), 5u64);
        assert_eq!(Tick(3).since(Tick(10)), 0);
    }

    #[test]
    fn clock_advances() {
        let mut clock = SimClock::new();
        clock.advance();
        clock.advance();
        assert_eq!(clock.current_tick, Tick(2));
        assert_eq!(clock.to_string(), "T2");
    }
}

#[cfg(test)]
mod rng {
    use crate::{AgentId, AgentRng, SimRng};

    #[test]
    fn agent_rng_is_deterministic() {
        let mut a = AgentRng::new(7, AgentId(3));
        let mut b = AgentRng::new(7, AgentId(3));
        let xs: Vec<u32> = (0..16).map(|_| a.gen_range(1..=3)).collect();
        let ys: Vec<u32> = (0..16).map(|_| b.gen_range(1..=3)).collect();
        assert_eq!(xs, ys);
        assert!(xs.iter().all(|&x| (1..=3).contains(&x)));
    }

    #[test]
    fn agents_get_distinct_streams() {
        let mut a = AgentRng::new(7, AgentId(0));
        let mut b = AgentRng::new(7, AgentId(1));
        let xs: Vec<u64> = (0..8).map(|_| a.gen_range(0..u64::MAX)).collect();
        let ys: Vec<u64> = (0..8).map(|_| b.gen_range(0..u64::MAX)).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn sim_rng_is_deterministic() {
        let mut a = SimRng::new(99);
        let mut b = SimRng::new(99);
        assert_eq!(a.gen_range(0..1000u32), b.gen_range(0..1000u32));
    }

    #[test]
    fn out_of_range_probability_is_clamped() {
        let mut r = AgentRng::new(3, AgentId(2));
        assert!(r.gen_bool(1.5));
        assert!(!r.gen_bool(-0.5));
    }
}

#[cfg(test)]
mod config {
    use crate::{ArenaConfig, Position, Team};

    #[test]
    fn default_is_valid() {
        ArenaConfig::default().validate().unwrap();
    }

    #[test]
    fn zero_min_delay_rejected() {
        let mut c = ArenaConfig::default();
        c.comms.min_delay_ticks = 0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn inverted_delay_range_rejected() {
        let mut c = ArenaConfig::default();
        c.comms.min_delay_ticks = 4;
        c.comms.max_delay_ticks = 2;
        assert!(c.validate().is_err());
    }

    #[test]
    fn too_many_robots_rejected() {
        let mut c = ArenaConfig::default();
        c.robots_per_team = 20;
        assert!(c.validate().is_err());
    }

    #[test]
    fn bases_at_opposite_corners() {
        let c = ArenaConfig::default();
        assert_eq!(c.base_of(Team::Red), Position::new(0, 0));
        assert_eq!(c.base_of(Team::Blue), Position::new(19, 19));
        assert_eq!(c.reliable_sync_delay(), 7);
    }
}
