// Breadth-first game tree construction under a wall-clock deadline
//
// Nodes live in an arena (`Vec<SearchNode>`) and refer to their children by
// index. A child is always pushed after its parent, so walking the arena
// from the back visits every child before its parent.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use log::debug;

use crate::config::{Config, GameRulesConfig};
use crate::moves::legal_moves;
use crate::reward::RewardModel;
use crate::simulator::apply_move;
use crate::state::{BoardState, PlayerIndex, CONTROLLED};
use crate::types::Direction;

pub type NodeId = usize;

pub const ROOT: NodeId = 0;

#[derive(Debug, Clone)]
pub struct SearchNode {
    /// Player whose move is expanded from this node
    pub player: PlayerIndex,
    pub turn: i32,
    pub board: BoardState,
    /// Edge from the parent, `None` at the root
    pub direction: Option<Direction>,
    /// Static evaluation, fixed at creation
    pub evaluation: Vec<i32>,
    /// Backed-up rewards, filled by backward induction
    pub rewards: Vec<i32>,
    pub children: Vec<NodeId>,
}

impl SearchNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena-backed search tree
#[derive(Debug, Clone)]
pub struct SearchTree {
    nodes: Vec<SearchNode>,
}

impl SearchTree {
    pub fn new(root: SearchNode) -> Self {
        SearchTree { nodes: vec![root] }
    }

    /// Appends `child` under `parent` and returns its id
    pub fn push_child(&mut self, parent: NodeId, child: SearchNode) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(child);
        self.nodes[parent].children.push(id);
        id
    }

    pub fn root(&self) -> &SearchNode {
        &self.nodes[ROOT]
    }

    pub fn node(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id]
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &SearchNode> + '_ {
        self.nodes[id].children.iter().map(move |&child| &self.nodes[child])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Terminal when we are eliminated or the acting player cannot move
pub fn is_terminal(node: &SearchNode) -> bool {
    !node.board.is_alive(CONTROLLED) || legal_moves(&node.board, node.player).is_empty()
}

/// Why the builder stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Frontier emptied: every reachable node is terminal or expanded
    Exhausted,
    Deadline,
    NodeLimit,
    DepthLimit,
}

#[derive(Debug, Clone)]
pub struct BuildStats {
    pub nodes: usize,
    pub expanded: usize,
    /// Largest `turn - root.turn` among dequeued nodes
    pub max_depth: i32,
    pub elapsed: Duration,
    pub stop: StopReason,
}

/// Limits for one build
#[derive(Debug, Clone)]
pub struct SearchLimits {
    pub deadline: Duration,
    pub check_interval: usize,
    pub max_nodes: usize,
    pub max_depth: i32,
}

impl SearchLimits {
    pub fn from_config(config: &Config) -> Self {
        SearchLimits {
            deadline: config.timing.deadline(),
            check_interval: config.timing.deadline_check_interval.max(1),
            max_nodes: config.search.max_nodes,
            max_depth: config.search.max_depth,
        }
    }
}

pub struct TreeBuilder<'a> {
    limits: SearchLimits,
    rules: &'a GameRulesConfig,
    rewards: &'a RewardModel,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(limits: SearchLimits, rules: &'a GameRulesConfig, rewards: &'a RewardModel) -> Self {
        TreeBuilder {
            limits,
            rules,
            rewards,
        }
    }

    /// Root node for a snapshot; player 0 moves first
    pub fn root(&self, board: BoardState, turn: i32) -> SearchNode {
        let evaluation = self.rewards.evaluate(&board, turn);
        SearchNode {
            player: CONTROLLED,
            turn,
            board,
            direction: None,
            rewards: evaluation.clone(),
            evaluation,
            children: Vec::new(),
        }
    }

    /// Expands the tree breadth-first until the frontier empties, the
    /// deadline passes, or a safety ceiling is hit. The clock is read once
    /// every `check_interval` dequeues. The root's children are always
    /// generated, even past the deadline or the node ceiling.
    pub fn build(&self, board: BoardState, turn: i32) -> (SearchTree, BuildStats) {
        let start = Instant::now();
        let mut tree = SearchTree::new(self.root(board, turn));
        let mut frontier = VecDeque::new();
        frontier.push_back(ROOT);

        let mut dequeued = 0usize;
        let mut expanded = 0usize;
        let mut max_depth = 0;
        let mut stop = StopReason::Exhausted;

        while let Some(id) = frontier.pop_front() {
            dequeued += 1;
            let depth = tree.node(id).turn - turn;

            // The root is always expanded so a legal move exists whenever one is possible.
            if id != ROOT {
                if dequeued % self.limits.check_interval == 0 && start.elapsed() > self.limits.deadline {
                    stop = StopReason::Deadline;
                    break;
                }
                if depth > self.limits.max_depth {
                    stop = StopReason::DepthLimit;
                    break;
                }
                if tree.len() >= self.limits.max_nodes {
                    stop = StopReason::NodeLimit;
                    break;
                }
            }
            max_depth = max_depth.max(depth);

            let children = self.expand(tree.node(id));
            if !children.is_empty() {
                expanded += 1;
            }
            for child in children {
                let child_id = tree.push_child(id, child);
                frontier.push_back(child_id);
            }
        }

        let stats = BuildStats {
            nodes: tree.len(),
            expanded,
            max_depth,
            elapsed: start.elapsed(),
            stop,
        };
        debug!(
            "tree built: {} nodes, {} expanded, depth {}, frontier {}, {:?} after {}ms",
            stats.nodes,
            stats.expanded,
            stats.max_depth,
            frontier.len(),
            stats.stop,
            stats.elapsed.as_millis()
        );

        (tree, stats)
    }

    /// Children of `node`, one per legal move of its acting player.
    /// Terminal nodes produce none.
    pub fn expand(&self, node: &SearchNode) -> Vec<SearchNode> {
        if !node.board.is_alive(CONTROLLED) {
            return Vec::new();
        }

        legal_moves(&node.board, node.player)
            .into_iter()
            .map(|direction| self.child(node, direction))
            .collect()
    }

    fn child(&self, parent: &SearchNode, direction: Direction) -> SearchNode {
        let board = apply_move(&parent.board, parent.player, direction, self.rules);
        let (player, wrapped) = board.next_player(parent.player);
        let turn = if wrapped { parent.turn + 1 } else { parent.turn };
        let evaluation = self.rewards.evaluate(&board, turn);

        SearchNode {
            player,
            turn,
            board,
            direction: Some(direction),
            rewards: evaluation.clone(),
            evaluation,
            children: Vec::new(),
        }
    }
}
