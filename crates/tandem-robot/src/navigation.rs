//! Movement primitives: heading for a tile, wandering, and the deterministic
//! transit plan a carrying pair follows to its base.

use tandem_comms::PlanStep;
use tandem_core::{AgentRng, Direction, GridBounds, Position, Rotation};

use crate::Decision;

/// `true` if one step along `facing` would leave a bounded grid.
#[inline]
pub fn blocked(pos: Position, facing: Direction, bounds: GridBounds) -> bool {
    bounds.resolve(pos.step(facing)).is_none()
}

/// One tick of progress towards `target`: turn to face it, then advance.
pub fn step_towards(pos: Position, facing: Direction, target: Position, bounds: GridBounds) -> Decision {
    let Some(desired) = Direction::towards(pos, target) else {
        return Decision::Stay;
    };
    match facing.rotation_towards(desired) {
        Some(rotation) => Decision::Turn(rotation),
        None if blocked(pos, facing, bounds) => Decision::Turn(Rotation::Clockwise),
        None => Decision::Forward,
    }
}

/// Leave the current tile: forward if possible, otherwise turn.
pub fn divert(pos: Position, facing: Direction, bounds: GridBounds) -> Decision {
    if blocked(pos, facing, bounds) {
        Decision::Turn(Rotation::Clockwise)
    } else {
        Decision::Forward
    }
}

/// Random exploration: turn with probability `turn_probability`, otherwise
/// advance; walls force a clockwise turn.
pub fn wander(
    pos:              Position,
    facing:           Direction,
    bounds:           GridBounds,
    turn_probability: f64,
    rng:              &mut AgentRng,
) -> Decision {
    if rng.gen_bool(turn_probability) {
        let rotation = if rng.gen_bool(0.5) { Rotation::Clockwise } else { Rotation::CounterClockwise };
        return Decision::Turn(rotation);
    }
    divert(pos, facing, bounds)
}

/// The lockstep route from `pos` (facing `facing`) to `deposit`: resolve the
/// x axis completely, then the y axis, turning the shortest way before each
/// leg, and finish with `Deposit`.
///
/// Pure: both partners computing it from the same inputs get the same list.
pub fn transit_plan(pos: Position, facing: Direction, deposit: Position) -> Vec<PlanStep> {
    let mut plan = Vec::new();
    let mut facing = facing;

    let dx = deposit.x - pos.x;
    if dx != 0 {
        let leg = if dx > 0 { Direction::East } else { Direction::West };
        turn_to(&mut facing, leg, &mut plan);
        plan.extend(std::iter::repeat_n(PlanStep::Forward, dx.unsigned_abs() as usize));
    }

    let dy = deposit.y - pos.y;
    if dy != 0 {
        let leg = if dy > 0 { Direction::South } else { Direction::North };
        turn_to(&mut facing, leg, &mut plan);
        plan.extend(std::iter::repeat_n(PlanStep::Forward, dy.unsigned_abs() as usize));
    }

    plan.push(PlanStep::Deposit);
    plan
}

fn turn_to(facing: &mut Direction, target: Direction, plan: &mut Vec<PlanStep>) {
    while let Some(rotation) = facing.rotation_towards(target) {
        plan.push(PlanStep::Turn(rotation));
        *facing = facing.rotated(rotation);
    }
}
