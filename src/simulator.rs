// Move simulation: (state, player, direction) -> successor state
//
// Inputs are never mutated. Every call clones the board once and applies
// the moves to the copy.

use std::collections::BTreeSet;

use log::trace;

use crate::config::GameRulesConfig;
use crate::state::{BoardState, PlayerIndex, SnakeState};
use crate::types::{Coord, Direction};

/// Applies one player's move and resolves eliminations
pub fn apply_move(
    board: &BoardState,
    player: PlayerIndex,
    direction: Direction,
    rules: &GameRulesConfig,
) -> BoardState {
    apply_moves(board, &[(player, direction)], rules)
}

/// Applies several moves as if made at the same instant, then resolves
/// eliminations once. Moves for players no longer on the board are ignored.
pub fn apply_moves(
    board: &BoardState,
    moves: &[(PlayerIndex, Direction)],
    rules: &GameRulesConfig,
) -> BoardState {
    let mut next = board.clone();

    {
        let BoardState { snakes, food, .. } = &mut next;
        for &(player, direction) in moves {
            if let Some(snake) = snakes.get_mut(&player) {
                advance_snake(snake, food, direction, rules);
            }
        }
    }

    for player in eliminated_players(&next) {
        trace!("player {} eliminated", player);
        next.snakes.remove(&player);
    }

    next
}

fn advance_snake(
    snake: &mut SnakeState,
    food: &mut Vec<Coord>,
    direction: Direction,
    rules: &GameRulesConfig,
) {
    let new_head = direction.apply(&snake.head);
    snake.head = new_head;
    snake.body.push_front(new_head);
    snake.body.pop_back();

    if let Some(index) = food.iter().position(|f| *f == new_head) {
        food.remove(index);
        if let Some(&tail) = snake.body.back() {
            snake.body.push_back(tail);
        }
        snake.health = rules.health_on_food;
        snake.length += 1;
    } else {
        snake.health = (snake.health - rules.health_loss_per_turn).max(0);
    }
}

/// Players that starved or lost a head-to-head collision.
///
/// On a shared head cell the strictly shorter snake loses; equal lengths
/// eliminate both. A snake is never compared with itself.
pub fn eliminated_players(board: &BoardState) -> BTreeSet<PlayerIndex> {
    let mut eliminated = BTreeSet::new();

    for (&index, snake) in &board.snakes {
        if snake.health <= 0 {
            eliminated.insert(index);
        }

        let lost_collision = board.snakes.iter().any(|(&other_index, other)| {
            other_index != index && other.head == snake.head && snake.length <= other.length
        });
        if lost_collision {
            eliminated.insert(index);
        }
    }

    eliminated
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, VecDeque};

    use crate::config::Config;

    fn rules() -> GameRulesConfig {
        Config::default_hardcoded().game_rules
    }

    fn snake(body: &[(i32, i32)], health: i32) -> SnakeState {
        let body: VecDeque<Coord> = body.iter().map(|&(x, y)| Coord { x, y }).collect();
        SnakeState {
            head: body[0],
            length: body.len() as i32,
            body,
            health,
        }
    }

    fn board(width: i32, height: i32, food: &[(i32, i32)], snakes: Vec<SnakeState>) -> BoardState {
        BoardState {
            width,
            height,
            food: food.iter().map(|&(x, y)| Coord { x, y }).collect(),
            snakes: snakes.into_iter().enumerate().collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn test_eating_food_grows_and_heals() {
        let start = board(5, 5, &[(2, 1)], vec![snake(&[(2, 0), (1, 0), (0, 0)], 90)]);

        let next = apply_move(&start, 0, Direction::Up, &rules());
        let you = &next.snakes[&0];

        assert_eq!(you.head, Coord { x: 2, y: 1 });
        assert_eq!(
            you.body,
            vec![
                Coord { x: 2, y: 1 },
                Coord { x: 2, y: 0 },
                Coord { x: 1, y: 0 },
                Coord { x: 1, y: 0 },
            ]
        );
        assert_eq!(you.health, 100);
        assert_eq!(you.length, 4);
        assert!(next.food.is_empty());
    }

    #[test]
    fn test_eating_removes_only_the_eaten_food() {
        let start = board(
            5,
            5,
            &[(4, 4), (2, 1), (0, 4)],
            vec![snake(&[(2, 0), (1, 0), (0, 0)], 90)],
        );

        let next = apply_move(&start, 0, Direction::Up, &rules());

        assert_eq!(next.food, vec![Coord { x: 4, y: 4 }, Coord { x: 0, y: 4 }]);
    }

    #[test]
    fn test_plain_move_costs_one_health() {
        let start = board(5, 5, &[(4, 4)], vec![snake(&[(2, 0), (1, 0), (0, 0)], 90)]);

        let next = apply_move(&start, 0, Direction::Right, &rules());
        let you = &next.snakes[&0];

        assert_eq!(you.head, Coord { x: 3, y: 0 });
        assert_eq!(you.body[0], you.head);
        assert_eq!(you.body.len(), 3);
        assert_eq!(you.length, 3);
        assert_eq!(you.health, 89);
        assert_eq!(next.food.len(), 1);
    }

    #[test]
    fn test_input_board_is_untouched() {
        let start = board(5, 5, &[(2, 1)], vec![snake(&[(2, 0), (1, 0), (0, 0)], 90)]);
        let before = start.clone();

        let _ = apply_move(&start, 0, Direction::Up, &rules());

        assert_eq!(start, before);
    }

    #[test]
    fn test_starving_snake_is_removed() {
        let start = board(5, 5, &[], vec![snake(&[(2, 2), (2, 1)], 1)]);

        let next = apply_move(&start, 0, Direction::Up, &rules());

        assert!(next.snakes.is_empty());
    }

    #[test]
    fn test_single_snake_never_collides_with_itself() {
        let start = board(5, 5, &[], vec![snake(&[(2, 2), (2, 1)], 50)]);

        let next = apply_move(&start, 0, Direction::Up, &rules());

        assert!(next.snakes.contains_key(&0));
    }

    #[test]
    fn test_equal_head_to_head_eliminates_both() {
        let start = board(
            5,
            5,
            &[],
            vec![
                snake(&[(1, 2), (0, 2), (0, 1)], 80),
                snake(&[(3, 2), (4, 2), (4, 1)], 80),
            ],
        );

        let next = apply_moves(&start, &[(0, Direction::Right), (1, Direction::Left)], &rules());

        assert!(next.snakes.is_empty());
    }

    #[test]
    fn test_shorter_snake_loses_head_to_head() {
        let start = board(
            5,
            5,
            &[],
            vec![
                snake(&[(1, 2), (0, 2), (0, 1), (0, 0)], 80),
                snake(&[(3, 2), (4, 2), (4, 1)], 80),
            ],
        );

        let next = apply_moves(&start, &[(0, Direction::Right), (1, Direction::Left)], &rules());

        assert!(next.snakes.contains_key(&0));
        assert!(!next.snakes.contains_key(&1));
    }

    #[test]
    fn test_moves_for_missing_players_are_ignored() {
        let start = board(5, 5, &[], vec![snake(&[(2, 2), (2, 1)], 50)]);

        let next = apply_moves(&start, &[(0, Direction::Up), (3, Direction::Left)], &rules());

        assert_eq!(next.snakes.len(), 1);
        assert_eq!(next.snakes[&0].head, Coord { x: 2, y: 3 });
    }
}
