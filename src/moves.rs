// Legal move generation
//
// A move is legal if it stays on the board and does not land on any cell
// currently covered by a snake, tails included. Tails that would retreat
// this turn are still treated as blocked.

use crate::state::{BoardState, PlayerIndex};
use crate::types::Direction;

/// Legal directions for `player`, in `Direction::all()` order.
/// Empty when the player is not on the board.
pub fn legal_moves(board: &BoardState, player: PlayerIndex) -> Vec<Direction> {
    let snake = match board.snakes.get(&player) {
        Some(snake) => snake,
        None => return Vec::new(),
    };

    Direction::all()
        .iter()
        .copied()
        .filter(|direction| {
            let next = direction.apply(&snake.head);
            board.contains(next) && !board.is_occupied(next)
        })
        .collect()
}
