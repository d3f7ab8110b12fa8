//! Unit tests for tandem-world.

use tandem_core::{AgentId, GridBounds, Position, Team};

use crate::{World, WorldError};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn five_by_five() -> World {
    World::new(
        GridBounds::new(5, 5, false),
        [Position::new(0, 0), Position::new(4, 4)],
    )
    .unwrap()
}

// ── Construction ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod construction {
    use super::*;

    #[test]
    fn bases_are_marked() {
        let w = five_by_five();
        assert_eq!(w.deposit_owner(Position::new(0, 0)), Some(Team::Red));
        assert_eq!(w.deposit_owner(Position::new(4, 4)), Some(Team::Blue));
        assert!(!w.is_deposit(Position::new(2, 2)));
        assert_eq!(w.deposit_of(Team::Blue), Position::new(4, 4));
    }

    #[test]
    fn base_outside_grid_errors() {
        let result = World::new(
            GridBounds::new(3, 3, false),
            [Position::new(0, 0), Position::new(5, 5)],
        );
        assert_eq!(result.err(), Some(WorldError::OutOfBounds(Position::new(5, 5))));
    }

    #[test]
    fn tiles_iterates_every_cell() {
        let w = five_by_five();
        assert_eq!(w.tiles().count(), 25);
    }
}

// ── Gold ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod gold {
    use super::*;

    #[test]
    fn add_and_remove() {
        let mut w = five_by_five();
        let p = Position::new(2, 2);
        w.add_gold(p, 2).unwrap();
        assert_eq!(w.gold_at(p), 2);
        w.remove_gold(p).unwrap();
        assert_eq!(w.gold_at(p), 1);
        assert_eq!(w.total_gold(), 1);
    }

    #[test]
    fn remove_from_empty_tile_errors_and_stays_zero() {
        let mut w = five_by_five();
        let p = Position::new(1, 3);
        assert_eq!(w.remove_gold(p), Err(WorldError::NoGold(p)));
        assert_eq!(w.gold_at(p), 0);
    }

    #[test]
    fn out_of_bounds_gold_errors() {
        let mut w = five_by_five();
        assert!(w.add_gold(Position::new(9, 0), 1).is_err());
        assert_eq!(w.gold_at(Position::new(9, 0)), 0);
    }
}

// ── Occupancy ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod occupancy {
    use super::*;

    #[test]
    fn add_move_remove() {
        let mut w = five_by_five();
        let a = AgentId(0);
        w.add_occupant(Position::new(1, 1), a).unwrap();
        let dest = w.move_occupant(a, Position::new(1, 1), Position::new(1, 2)).unwrap();
        assert_eq!(dest, Position::new(1, 2));
        assert_eq!(w.occupants(Position::new(1, 1)).count(), 0);
        assert_eq!(w.occupants(Position::new(1, 2)).collect::<Vec<_>>(), vec![a]);
        w.remove_occupant(dest, a).unwrap();
        assert_eq!(w.occupants(dest).count(), 0);
    }

    #[test]
    fn duplicate_add_errors() {
        let mut w = five_by_five();
        let p = Position::new(3, 3);
        w.add_occupant(p, AgentId(1)).unwrap();
        assert_eq!(
            w.add_occupant(p, AgentId(1)),
            Err(WorldError::AlreadyOccupying { agent: AgentId(1), pos: p })
        );
    }

    #[test]
    fn missing_remove_errors() {
        let mut w = five_by_five();
        let p = Position::new(3, 3);
        assert_eq!(
            w.remove_occupant(p, AgentId(4)),
            Err(WorldError::NotOccupying { agent: AgentId(4), pos: p })
        );
    }

    #[test]
    fn move_off_bounded_edge_leaves_state_untouched() {
        let mut w = five_by_five();
        let a = AgentId(2);
        w.add_occupant(Position::new(0, 2), a).unwrap();
        assert!(w.move_occupant(a, Position::new(0, 2), Position::new(-1, 2)).is_err());
        assert_eq!(w.occupants(Position::new(0, 2)).collect::<Vec<_>>(), vec![a]);
    }

    #[test]
    fn move_wraps_on_toroidal_grid() {
        let mut w = World::new(
            GridBounds::new(5, 5, true),
            [Position::new(0, 0), Position::new(4, 4)],
        )
        .unwrap();
        let a = AgentId(0);
        w.add_occupant(Position::new(0, 2), a).unwrap();
        let dest = w.move_occupant(a, Position::new(0, 2), Position::new(-1, 2)).unwrap();
        assert_eq!(dest, Position::new(4, 2));
    }

    #[test]
    fn occupants_iterate_in_id_order() {
        let mut w = five_by_five();
        let p = Position::new(2, 2);
        for id in [5, 1, 3] {
            w.add_occupant(p, AgentId(id)).unwrap();
        }
        assert_eq!(
            w.occupants(p).collect::<Vec<_>>(),
            vec![AgentId(1), AgentId(3), AgentId(5)]
        );
    }
}

// ── Scores ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scores {
    use super::*;

    #[test]
    fn two_credits_make_a_point() {
        let mut w = five_by_five();
        w.credit(Team::Red);
        assert_eq!(w.score(Team::Red), 0.5);
        w.credit(Team::Red);
        assert_eq!(w.credits(Team::Red), 2);
        assert_eq!(w.score(Team::Red), 1.0);
        assert_eq!(w.score(Team::Blue), 0.0);
        assert_eq!(w.total_credits(), 2);
    }
}
