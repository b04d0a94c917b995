//! Game abstraction consumed by the solver.
//!
//! A [`Game`] bundles the immutable tree with its information-set index.
//! The index is the non-owning lookup that maps each (actor, information
//! key) pair to the tree nodes sharing that key; it is what lets the solver
//! aggregate per-node regret into per-information-set decisions and lets
//! the best-response evaluator pick one action per information set instead
//! of one per node.
//!
//! [`Game::from_tree`] validates the imperfect-information invariant: every
//! node in an information set must offer the same ordered legal action set.
//! A game violating it would silently corrupt regret aggregation, so it is
//! rejected up front.

use rustc_hash::FxHashMap;
use std::fmt;

use crate::cfr::tree::{Actor, GameTree, InfoKey, NodeId};

/// Errors raised by game validation and by profile/evaluator lookups.
#[derive(Debug, Clone, PartialEq)]
pub enum GameError {
    /// The tree has no nodes.
    EmptyTree,
    /// Two nodes share an information key but offer different action sets.
    ActionSetMismatch {
        /// Actor owning the conflicting information set.
        player: Actor,
        /// The shared information key.
        key: InfoKey,
    },
    /// A profile has no entry for a reachable information set.
    UndefinedStrategy {
        /// Actor whose strategy entry is missing.
        player: Actor,
        /// The information key with no entry.
        key: InfoKey,
    },
    /// No information set exists for the given actor and key.
    UnknownInfoSet {
        /// The actor looked up.
        player: Actor,
        /// The key looked up.
        key: InfoKey,
    },
    /// A supplied probability vector has the wrong number of actions.
    WrongActionCount {
        /// The information key being written.
        key: InfoKey,
        /// Number of actions the information set offers.
        expected: usize,
        /// Number of probabilities supplied.
        got: usize,
    },
    /// A supplied probability vector does not sum to 1.
    NotADistribution {
        /// The information key being written.
        key: InfoKey,
        /// The actual sum of the supplied probabilities.
        sum: f64,
    },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::EmptyTree => write!(f, "game tree has no nodes"),
            GameError::ActionSetMismatch { player, key } => write!(
                f,
                "nodes sharing information key {} for {} offer different action sets",
                key, player
            ),
            GameError::UndefinedStrategy { player, key } => write!(
                f,
                "profile has no strategy for {} at information key {}",
                player, key
            ),
            GameError::UnknownInfoSet { player, key } => {
                write!(f, "no information set for {} at key {}", player, key)
            }
            GameError::WrongActionCount { key, expected, got } => write!(
                f,
                "information key {} has {} actions but {} probabilities were supplied",
                key, expected, got
            ),
            GameError::NotADistribution { key, sum } => write!(
                f,
                "probabilities for information key {} sum to {}, expected 1",
                key, sum
            ),
        }
    }
}

impl std::error::Error for GameError {}

/// The set of tree nodes an actor cannot distinguish between.
///
/// Holds the canonical ordered action list (identical at every member node)
/// and the member node handles. Strategies and regret aggregation are
/// defined against this action order.
#[derive(Debug, Clone)]
pub struct InfoSet {
    actions: Vec<String>,
    nodes: Vec<NodeId>,
}

impl InfoSet {
    /// Ordered legal actions at every node of this set.
    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    /// Tree nodes sharing this information key.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }
}

/// Per-actor mapping from information key to [`InfoSet`].
///
/// Built once alongside the tree; the chance actor gets entries too (they
/// seed the profile's fixed chance distribution and are skipped by the
/// strategy updater). Terminal nodes are not indexed.
#[derive(Debug, Clone)]
pub struct InfoSetIndex {
    num_players: usize,
    // One map per actor slot; chance occupies the trailing slot.
    sets: Vec<FxHashMap<InfoKey, InfoSet>>,
}

impl InfoSetIndex {
    fn build(tree: &GameTree) -> Result<Self, GameError> {
        let num_players = tree.num_players();
        let mut sets: Vec<FxHashMap<InfoKey, InfoSet>> =
            vec![FxHashMap::default(); num_players + 1];

        for id in tree.node_ids() {
            let node = tree.node(id);
            if node.is_terminal() {
                continue;
            }
            let actions: Vec<String> = node
                .children()
                .iter()
                .map(|(action, _)| action.clone())
                .collect();
            let slot = node.player().slot(num_players);
            match sets[slot].get_mut(node.info()) {
                Some(set) => {
                    if set.actions != actions {
                        return Err(GameError::ActionSetMismatch {
                            player: node.player(),
                            key: node.info().clone(),
                        });
                    }
                    set.nodes.push(id);
                }
                None => {
                    sets[slot].insert(
                        node.info().clone(),
                        InfoSet {
                            actions,
                            nodes: vec![id],
                        },
                    );
                }
            }
        }

        Ok(Self { num_players, sets })
    }

    /// All information sets owned by `actor`.
    pub fn sets(&self, actor: Actor) -> &FxHashMap<InfoKey, InfoSet> {
        &self.sets[actor.slot(self.num_players)]
    }

    /// Look up one information set.
    pub fn get(&self, actor: Actor, key: &InfoKey) -> Option<&InfoSet> {
        self.sets(actor).get(key)
    }

    /// Total number of information sets owned by competing players
    /// (chance sets excluded).
    pub fn num_info_sets(&self) -> usize {
        self.sets[..self.num_players].iter().map(|m| m.len()).sum()
    }
}

/// A fully built and validated game: tree plus information-set index.
#[derive(Debug, Clone)]
pub struct Game {
    pub(crate) tree: GameTree,
    pub(crate) index: InfoSetIndex,
}

impl Game {
    /// Validate a tree and build its information-set index.
    ///
    /// Fails if the tree is empty or if any information set offers
    /// inconsistent action sets across its nodes.
    pub fn from_tree(tree: GameTree) -> Result<Self, GameError> {
        if tree.is_empty() {
            return Err(GameError::EmptyTree);
        }
        let index = InfoSetIndex::build(&tree)?;
        Ok(Self { tree, index })
    }

    /// The underlying tree.
    pub fn tree(&self) -> &GameTree {
        &self.tree
    }

    /// The information-set index.
    pub fn index(&self) -> &InfoSetIndex {
        &self.index
    }

    /// Number of competing players (chance excluded).
    pub fn num_players(&self) -> usize {
        self.tree.num_players()
    }

    /// Handle to the root node.
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_deal_tree() -> GameTree {
        // Chance root with two deals; player 0 cannot tell them apart.
        let mut tree = GameTree::new(2);
        let root = tree.add_root(Actor::Chance, InfoKey::root());
        for deal in ["h", "t"] {
            let node = tree.add_child(root, deal, Actor::Player(0), InfoKey::new("?", vec![]));
            tree.add_terminal(node, "a", 1.0);
            tree.add_terminal(node, "b", -1.0);
        }
        tree
    }

    #[test]
    fn test_index_groups_nodes_by_key() {
        let game = Game::from_tree(two_deal_tree()).unwrap();

        // Both deal children share player 0's information set.
        let set = game
            .index()
            .get(Actor::Player(0), &InfoKey::new("?", vec![]))
            .unwrap();
        assert_eq!(set.nodes().len(), 2);
        assert_eq!(set.actions(), ["a".to_string(), "b".to_string()]);

        // One chance set at the root, one player-0 set, nothing for player 1.
        assert_eq!(game.index().sets(Actor::Chance).len(), 1);
        assert_eq!(game.index().num_info_sets(), 1);
        assert!(game.index().sets(Actor::Player(1)).is_empty());
    }

    #[test]
    fn test_rejects_empty_tree() {
        assert_eq!(
            Game::from_tree(GameTree::new(2)).unwrap_err(),
            GameError::EmptyTree
        );
    }

    #[test]
    fn test_rejects_inconsistent_action_sets() {
        let mut tree = GameTree::new(2);
        let root = tree.add_root(Actor::Chance, InfoKey::root());
        let first = tree.add_child(root, "h", Actor::Player(0), InfoKey::new("?", vec![]));
        tree.add_terminal(first, "a", 1.0);
        let second = tree.add_child(root, "t", Actor::Player(0), InfoKey::new("?", vec![]));
        tree.add_terminal(second, "b", 1.0);

        match Game::from_tree(tree) {
            Err(GameError::ActionSetMismatch { player, .. }) => {
                assert_eq!(player, Actor::Player(0));
            }
            other => panic!("expected ActionSetMismatch, got {:?}", other),
        }
    }
}
