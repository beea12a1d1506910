// Backward induction and move selection
//
// Rewards are propagated from the leaves to the root with one of two value
// rules, chosen by the caller:
// - MaxN: the acting player picks the child that is best for itself and the
//   node inherits that child's whole reward vector.
// - Paranoid: we maximize our own component, every other player minimizes it.
// Ties go to the later-enumerated child under both rules.

use std::time::Instant;

use log::{debug, info};

use crate::config::{Config, ValueRule};
use crate::reward::RewardModel;
use crate::state::{BoardState, CONTROLLED};
use crate::tree::{BuildStats, NodeId, SearchLimits, SearchTree, TreeBuilder, ROOT};
use crate::types::{Battlesnake, Board, Direction};

/// Move played when the root has no legal move
pub const FALLBACK_MOVE: Direction = Direction::Up;

pub const NO_VALID_MOVES: &str = "no valid moves";

/// One turn's answer: a direction plus a free-text annotation for logs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub direction: Direction,
    pub annotation: String,
}

/// Result of a full decision call
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub decision: Decision,
    pub stats: BuildStats,
}

impl ValueRule {
    /// Whether `candidate` replaces `best` as the preferred child of a node
    /// whose acting player is `player`. `>=` lets later children win ties.
    fn prefers(&self, player: usize, candidate: &[i32], best: &[i32]) -> bool {
        match self {
            ValueRule::MaxN => candidate[player] >= best[player],
            ValueRule::Paranoid if player == CONTROLLED => candidate[CONTROLLED] >= best[CONTROLLED],
            ValueRule::Paranoid => candidate[CONTROLLED] <= best[CONTROLLED],
        }
    }

    /// Rewards backed up into node `id` from its children
    fn backup(&self, tree: &SearchTree, id: NodeId) -> Vec<i32> {
        let node = tree.node(id);
        let mut best: Option<&[i32]> = None;

        for child in tree.children(id) {
            let candidate = child.rewards.as_slice();
            best = match best {
                Some(current) if !self.prefers(node.player, candidate, current) => Some(current),
                _ => Some(candidate),
            };
        }

        best.map_or_else(|| node.evaluation.clone(), |rewards| rewards.to_vec())
    }
}

/// Post-order reward propagation over the whole tree.
///
/// Leaves, including nodes cut off by the deadline, take their own static
/// evaluation. Running this twice on the same tree gives the same result.
pub fn propagate(tree: &mut SearchTree, rule: ValueRule) {
    for id in (0..tree.len()).rev() {
        let rewards = if tree.node(id).is_leaf() {
            tree.node(id).evaluation.clone()
        } else {
            rule.backup(tree, id)
        };
        tree.node_mut(id).rewards = rewards;
    }
}

/// Picks the root child with the best propagated reward for us
pub fn select_move(tree: &SearchTree) -> Decision {
    let mut best: Option<(Direction, i32)> = None;

    for child in tree.children(ROOT) {
        let reward = child.rewards[CONTROLLED];
        let direction = match child.direction {
            Some(direction) => direction,
            None => continue,
        };
        match best {
            Some((_, current)) if reward < current => {}
            _ => best = Some((direction, reward)),
        }
    }

    match best {
        Some((direction, reward)) => Decision {
            direction,
            annotation: format!("reward {}", reward),
        },
        None => Decision {
            direction: FALLBACK_MOVE,
            annotation: NO_VALID_MOVES.to_string(),
        },
    }
}

/// Builds, evaluates and searches a tree for one turn snapshot
pub fn decide(board: &Board, you: &Battlesnake, turn: i32, config: &Config) -> SearchOutcome {
    let start = Instant::now();
    let root = BoardState::from_snapshot(board, you);
    let rewards = RewardModel::new(&config.scores, &root, turn);
    let builder = TreeBuilder::new(SearchLimits::from_config(config), &config.game_rules, &rewards);

    let (mut tree, stats) = builder.build(root, turn);
    propagate(&mut tree, config.search.value_rule);
    let mut decision = select_move(&tree);

    if !tree.root().is_leaf() {
        decision.annotation = format!("{} depth {}", decision.annotation, stats.max_depth);
    }

    debug!(
        "root rewards {:?} over {} players",
        tree.root().rewards,
        rewards.num_players()
    );
    info!(
        "Turn {}: {} ({}; {:?}, {} nodes, {}ms)",
        turn,
        decision.direction,
        decision.annotation,
        config.search.value_rule,
        stats.nodes,
        start.elapsed().as_millis()
    );

    SearchOutcome { decision, stats }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::tree::SearchNode;

    fn empty_board() -> BoardState {
        BoardState {
            width: 5,
            height: 5,
            food: vec![],
            snakes: BTreeMap::new(),
        }
    }

    fn node(player: usize, direction: Option<Direction>, evaluation: Vec<i32>) -> SearchNode {
        SearchNode {
            player,
            turn: 0,
            board: empty_board(),
            direction,
            rewards: evaluation.clone(),
            evaluation,
            children: Vec::new(),
        }
    }

    /// Root (player 0) -> three children where player 1 acts -> two leaves each.
    fn two_player_tree() -> SearchTree {
        let mut tree = SearchTree::new(node(0, None, vec![0, 0]));
        let leaves = [
            (Direction::Up, [[5, 1], [2, 9]]),
            (Direction::Left, [[4, 3], [6, 2]]),
            (Direction::Right, [[3, 0], [7, 0]]),
        ];
        for (direction, outcomes) in leaves.iter() {
            let mid = tree.push_child(ROOT, node(1, Some(*direction), vec![0, 0]));
            for outcome in outcomes.iter() {
                tree.push_child(mid, node(0, Some(Direction::Down), outcome.to_vec()));
            }
        }
        tree
    }

    #[test]
    fn test_maxn_lets_each_player_maximize_itself() {
        let mut tree = two_player_tree();
        propagate(&mut tree, ValueRule::MaxN);

        // Player 1 picks [2,9], [4,3] and the later of the [.,0] tie, [7,0].
        let backed: Vec<_> = tree.children(ROOT).map(|c| c.rewards.clone()).collect();
        assert_eq!(backed, vec![vec![2, 9], vec![4, 3], vec![7, 0]]);
        assert_eq!(tree.root().rewards, vec![7, 0]);
        assert_eq!(select_move(&tree).direction, Direction::Right);
    }

    #[test]
    fn test_paranoid_assumes_opponents_minimize_us() {
        let mut tree = two_player_tree();
        propagate(&mut tree, ValueRule::Paranoid);

        let ours: Vec<_> = tree.children(ROOT).map(|c| c.rewards[0]).collect();
        assert_eq!(ours, vec![2, 4, 3]);
        assert_eq!(tree.root().rewards[0], 4);
        assert_eq!(select_move(&tree).direction, Direction::Left);
    }

    #[test]
    fn test_ties_prefer_later_children() {
        let mut tree = SearchTree::new(node(0, None, vec![0]));
        tree.push_child(ROOT, node(0, Some(Direction::Up), vec![10]));
        tree.push_child(ROOT, node(0, Some(Direction::Down), vec![10]));
        tree.push_child(ROOT, node(0, Some(Direction::Left), vec![3]));

        propagate(&mut tree, ValueRule::MaxN);

        assert_eq!(select_move(&tree).direction, Direction::Down);
    }

    #[test]
    fn test_paranoid_opponent_ties_prefer_later_children() {
        let mut tree = SearchTree::new(node(0, None, vec![0, 0]));
        let mid = tree.push_child(ROOT, node(1, Some(Direction::Up), vec![0, 0]));
        tree.push_child(mid, node(0, Some(Direction::Up), vec![3, 1]));
        tree.push_child(mid, node(0, Some(Direction::Left), vec![3, 5]));
        tree.push_child(mid, node(0, Some(Direction::Right), vec![8, 0]));

        propagate(&mut tree, ValueRule::Paranoid);

        // Player 1 minimizes our component; of the two 3s the later one wins.
        assert_eq!(tree.node(mid).rewards, vec![3, 5]);
        assert_eq!(tree.root().rewards, vec![3, 5]);
    }

    #[test]
    fn test_cutoff_leaves_keep_their_evaluation() {
        let mut tree = SearchTree::new(node(0, None, vec![0]));
        let cut = tree.push_child(ROOT, node(0, Some(Direction::Up), vec![20]));
        tree.node_mut(cut).rewards = vec![999];

        propagate(&mut tree, ValueRule::MaxN);

        assert_eq!(tree.node(cut).rewards, vec![20]);
        assert_eq!(tree.root().rewards, vec![20]);
    }

    #[test]
    fn test_propagation_is_repeatable() {
        let mut tree = two_player_tree();
        propagate(&mut tree, ValueRule::MaxN);
        let first: Vec<_> = (0..tree.len()).map(|id| tree.node(id).rewards.clone()).collect();
        let first_move = select_move(&tree);

        propagate(&mut tree, ValueRule::MaxN);
        let second: Vec<_> = (0..tree.len()).map(|id| tree.node(id).rewards.clone()).collect();

        assert_eq!(first, second);
        assert_eq!(first_move, select_move(&tree));
    }

    #[test]
    fn test_childless_root_falls_back() {
        let mut tree = SearchTree::new(node(0, None, vec![-1]));
        propagate(&mut tree, ValueRule::Paranoid);

        let decision = select_move(&tree);
        assert_eq!(decision.direction, FALLBACK_MOVE);
        assert_eq!(decision.annotation, NO_VALID_MOVES);
    }
}
