//! Grid step rules - greedy single-cell moves between integer positions.

use crate::components::{Action, Position};

/// The single axis-aligned move that most reduces the distance from `from` to `to`.
///
/// The horizontal axis wins only when its delta is strictly larger; otherwise
/// the move is vertical, and a zero vertical delta counts as "down".
pub fn move_towards(from: &Position, to: &Position) -> Action {
    // widened so cells at opposite ends of the grid cannot overflow
    let dx = i64::from(to.x) - i64::from(from.x);
    let dy = i64::from(to.y) - i64::from(from.y);
    if dx.abs() > dy.abs() {
        if dx > 0 {
            Action::MoveRight
        } else {
            Action::MoveLeft
        }
    } else if dy < 0 {
        Action::MoveUp
    } else {
        Action::MoveDown
    }
}

/// Mirror a move (left/right, up/down). Non-move actions are returned unchanged.
pub fn inverse_move(action: Action) -> Action {
    match action {
        Action::MoveLeft => Action::MoveRight,
        Action::MoveRight => Action::MoveLeft,
        Action::MoveUp => Action::MoveDown,
        Action::MoveDown => Action::MoveUp,
        other => other,
    }
}

/// Cell reached by applying `action` at `pos`. Moves off the edge of the
/// `i32` grid stay on the edge cell.
pub fn step(pos: Position, action: Action) -> Position {
    let (dx, dy) = action.delta();
    pos.offset(dx, dy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_extreme_coordinates_do_not_overflow() {
        let west = Position::new(i32::MIN, 0);
        let east = Position::new(i32::MAX, 0);
        assert_eq!(move_towards(&west, &east), Action::MoveRight);
        assert_eq!(move_towards(&east, &west), Action::MoveLeft);
        assert_eq!(step(east, Action::MoveRight), east);
        assert_eq!(step(Position::new(0, i32::MIN), Action::MoveUp), Position::new(0, i32::MIN));
        assert!(west.distance(&east).is_finite());
    }

    #[test]
    fn test_move_towards_prefers_larger_axis() {
        let origin = Position::new(0, 0);
        assert_eq!(move_towards(&origin, &Position::new(3, 1)), Action::MoveRight);
        assert_eq!(move_towards(&origin, &Position::new(1, 3)), Action::MoveDown);
        assert_eq!(move_towards(&origin, &Position::new(-4, 2)), Action::MoveLeft);
        assert_eq!(move_towards(&origin, &Position::new(1, -3)), Action::MoveUp);
    }

    #[test]
    fn test_move_towards_ties_go_vertical() {
        let origin = Position::new(0, 0);
        assert_eq!(move_towards(&origin, &Position::new(2, 2)), Action::MoveDown);
        assert_eq!(move_towards(&origin, &Position::new(2, -2)), Action::MoveUp);
        // same cell counts as "down"
        assert_eq!(move_towards(&origin, &origin), Action::MoveDown);
    }

    #[test]
    fn test_step() {
        let p = Position::new(2, 2);
        assert_eq!(step(p, Action::MoveLeft), Position::new(1, 2));
        assert_eq!(step(p, Action::MoveUp), Position::new(2, 1));
        assert_eq!(step(p, Action::Attack), p);
    }

    proptest! {
        #[test]
        fn inverse_is_an_involution(x in -50i32..50, y in -50i32..50) {
            let towards = move_towards(&Position::new(0, 0), &Position::new(x, y));
            prop_assert!(towards.is_move());
            prop_assert_ne!(inverse_move(towards), towards);
            prop_assert_eq!(inverse_move(inverse_move(towards)), towards);
        }

        #[test]
        fn step_towards_never_increases_distance(x in -50i32..50, y in -50i32..50) {
            let from = Position::new(0, 0);
            let to = Position::new(x, y);
            prop_assume!(from != to);
            let next = step(from, move_towards(&from, &to));
            prop_assert!(next.distance_squared(&to) < from.distance_squared(&to));
        }
    }
}
