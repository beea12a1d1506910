// Engine-side state model
//
// The wire types in `types` mirror the JSON API. The search works on these
// value types instead: every search node owns its own `BoardState`, so
// siblings never share bodies or food lists.

use std::collections::{BTreeMap, VecDeque};

use crate::types::{Battlesnake, Board, Coord};

/// Stable engine-side identifier of a snake for the lifetime of one decision
pub type PlayerIndex = usize;

/// Index of the snake we are choosing a move for
pub const CONTROLLED: PlayerIndex = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnakeState {
    pub head: Coord,
    /// Head first, tail last. `body[0] == head` between moves.
    pub body: VecDeque<Coord>,
    pub health: i32,
    pub length: i32,
}

impl SnakeState {
    pub fn from_wire(snake: &Battlesnake) -> Self {
        SnakeState {
            head: snake.head,
            body: snake.body.iter().copied().collect(),
            health: snake.health,
            length: snake.length,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    pub width: i32,
    pub height: i32,
    pub food: Vec<Coord>,
    /// Alive snakes only. Eliminated players are removed, never re-indexed.
    pub snakes: BTreeMap<PlayerIndex, SnakeState>,
}

impl BoardState {
    /// Builds the root state from a turn snapshot, with `you` as player 0 and
    /// the remaining snakes following in wire order.
    pub fn from_snapshot(board: &Board, you: &Battlesnake) -> Self {
        let mut snakes = BTreeMap::new();
        snakes.insert(CONTROLLED, SnakeState::from_wire(you));

        for snake in board.snakes.iter().filter(|s| s.id != you.id) {
            let index = snakes.len();
            snakes.insert(index, SnakeState::from_wire(snake));
        }

        BoardState {
            width: board.width,
            height: board.height,
            food: board.food.clone(),
            snakes,
        }
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.x >= 0 && coord.y >= 0 && coord.x < self.width && coord.y < self.height
    }

    /// True when any segment of any snake, head to tail inclusive, sits on `coord`
    pub fn is_occupied(&self, coord: Coord) -> bool {
        self.snakes
            .values()
            .any(|snake| snake.body.iter().any(|segment| *segment == coord))
    }

    pub fn is_alive(&self, player: PlayerIndex) -> bool {
        self.snakes
            .get(&player)
            .map_or(false, |snake| snake.health > 0)
    }

    /// Player to act after `player`: the next alive index, wrapping to the
    /// lowest one. The flag is set when the round wrapped.
    pub fn next_player(&self, player: PlayerIndex) -> (PlayerIndex, bool) {
        if let Some((&next, _)) = self.snakes.range(player + 1..).next() {
            return (next, false);
        }
        let first = self.snakes.keys().next().copied().unwrap_or(CONTROLLED);
        (first, true)
    }
}
