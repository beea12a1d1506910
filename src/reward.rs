// Static evaluation of a single search node
//
// Reward per player: `score_eliminated` if the player is gone, otherwise
// rounds survived since the root times `survival_weight` plus length gained
// since the root times `growth_weight`. With a negative sentinel and
// non-negative weights, any elimination ranks below any survival.

use crate::config::ScoresConfig;
use crate::state::BoardState;

#[derive(Debug, Clone)]
pub struct RewardModel {
    score_eliminated: i32,
    survival_weight: i32,
    growth_weight: i32,
    root_turn: i32,
    root_lengths: Vec<i32>,
}

impl RewardModel {
    /// Captures the root turn and every player's starting length
    pub fn new(scores: &ScoresConfig, root: &BoardState, root_turn: i32) -> Self {
        let players = root.snakes.keys().next_back().map_or(0, |&last| last + 1);
        let root_lengths = (0..players)
            .map(|player| root.snakes.get(&player).map_or(0, |s| s.length))
            .collect();

        RewardModel {
            score_eliminated: scores.score_eliminated,
            survival_weight: scores.survival_weight,
            growth_weight: scores.growth_weight,
            root_turn,
            root_lengths,
        }
    }

    pub fn num_players(&self) -> usize {
        self.root_lengths.len()
    }

    /// Reward vector indexed by player
    pub fn evaluate(&self, board: &BoardState, turn: i32) -> Vec<i32> {
        let survived = (turn - self.root_turn).max(0);

        self.root_lengths
            .iter()
            .enumerate()
            .map(|(player, &root_length)| {
                if !board.is_alive(player) {
                    return self.score_eliminated;
                }
                let gained = (board.snakes[&player].length - root_length).max(0);
                survived * self.survival_weight + gained * self.growth_weight
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, VecDeque};

    use crate::config::Config;
    use crate::state::SnakeState;
    use crate::types::Coord;

    fn single(length: i32, health: i32) -> BoardState {
        let body: VecDeque<Coord> = (0..length).map(|x| Coord { x, y: 0 }).collect();
        let mut snakes = BTreeMap::new();
        snakes.insert(
            0,
            SnakeState {
                head: body[0],
                body,
                health,
                length,
            },
        );
        BoardState {
            width: 11,
            height: 11,
            food: vec![],
            snakes,
        }
    }

    #[test]
    fn test_reward_counts_rounds_survived() {
        let scores = Config::default_hardcoded().scores;
        let root = single(3, 90);
        let model = RewardModel::new(&scores, &root, 10);

        assert_eq!(model.evaluate(&root, 10), vec![0]);
        assert_eq!(model.evaluate(&root, 13), vec![3 * scores.survival_weight]);
    }

    #[test]
    fn test_growth_adds_to_reward() {
        let scores = Config::default_hardcoded().scores;
        let root = single(3, 90);
        let model = RewardModel::new(&scores, &root, 0);

        let grown = single(5, 100);
        assert_eq!(
            model.evaluate(&grown, 1),
            vec![scores.survival_weight + 2 * scores.growth_weight]
        );
    }

    #[test]
    fn test_elimination_ranks_below_everything() {
        let scores = Config::default_hardcoded().scores;
        let root = single(3, 90);
        let model = RewardModel::new(&scores, &root, 0);

        let starved = single(3, 0);
        let dead = model.evaluate(&starved, 50)[0];
        let alive = model.evaluate(&root, 0)[0];

        assert_eq!(dead, scores.score_eliminated);
        assert!(dead < alive);
    }

    #[test]
    fn test_removed_player_gets_sentinel() {
        let scores = Config::default_hardcoded().scores;
        let root = single(3, 90);
        let model = RewardModel::new(&scores, &root, 0);

        let empty = BoardState {
            snakes: BTreeMap::new(),
            ..root.clone()
        };
        assert_eq!(model.evaluate(&empty, 4), vec![scores.score_eliminated]);
        assert_eq!(model.num_players(), 1);
    }
}
