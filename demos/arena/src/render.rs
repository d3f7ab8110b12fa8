//! Plain-text view of the arena.
//!
//! ```text
//! R . . 2 .      R / B   empty base of red / blue
//! . r . . .      r / b   robot(s) of that team, empty-handed
//! . . @ . .      @       a carrying pair
//! . 1 . . b      1-9, +  gold units on the tile
//! . . . . B      .       nothing
//! ```

use std::fmt::Write;

use tandem_core::Team;
use tandem_robot::Robot;
use tandem_world::World;

/// One character per tile, rows top to bottom.
pub fn render(world: &World, robots: &[Robot]) -> String {
    let bounds = world.bounds();
    let mut out = String::with_capacity(bounds.cell_count() * 2 + 64);
    for index in 0..bounds.cell_count() {
        let pos = bounds.position_of(index);
        if pos.x > 0 {
            out.push(' ');
        }
        out.push(glyph(world, robots, pos));
        if pos.x as u32 == bounds.width - 1 {
            out.push('\n');
        }
    }
    let _ = writeln!(
        out,
        "score  red {:.1}  blue {:.1}  |  gold left {}",
        world.score(Team::Red),
        world.score(Team::Blue),
        world.total_gold(),
    );
    out
}

fn glyph(world: &World, robots: &[Robot], pos: tandem_core::Position) -> char {
    let mut here = world.occupants(pos).filter_map(|id| robots.get(id.index()));
    if let Some(first) = here.next() {
        if first.carrying() {
            return '@';
        }
        return team_char(first.team()).to_ascii_lowercase();
    }
    if let Some(team) = world.deposit_owner(pos) {
        return team_char(team);
    }
    match world.gold_at(pos) {
        0 => '.',
        n @ 1..=9 => char::from_digit(n, 10).unwrap_or('+'),
        _ => '+',
    }
}

fn team_char(team: Team) -> char {
    match team {
        Team::Red  => 'R',
        Team::Blue => 'B',
    }
}
