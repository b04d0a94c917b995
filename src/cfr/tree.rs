//! Game tree representation for the CFR solver.
//!
//! The tree is built once before training and never changes structurally.
//! Nodes live in an arena (`Vec<Node>`) and refer to each other through
//! `NodeId` handles, so information sets can index into the tree without
//! creating ownership cycles. Each node carries the mutable accumulators
//! that CFR writes every iteration: reach probabilities, expected utility,
//! counterfactual value, cumulative regret and average-strategy sums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An actor in the game: one of the competing players, or nature.
///
/// The chance actor owns nodes where random events happen (e.g. card deals).
/// Its "strategy" is the game's fixed chance distribution and is never
/// updated by regret matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Actor {
    /// A competing player, indexed from 0.
    Player(usize),
    /// The distinguished chance actor (nature).
    Chance,
}

impl Actor {
    /// Whether this actor is the chance actor.
    pub fn is_chance(self) -> bool {
        matches!(self, Actor::Chance)
    }

    /// Slot for this actor in per-actor reach vectors and profile tables.
    ///
    /// Players occupy `0..num_players`; chance takes the trailing slot.
    pub(crate) fn slot(self, num_players: usize) -> usize {
        match self {
            Actor::Player(p) => p,
            Actor::Chance => num_players,
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Actor::Player(p) => write!(f, "player {}", p),
            Actor::Chance => write!(f, "chance"),
        }
    }
}

/// Information key: what the acting player knows at a decision point.
///
/// Combines the player's private signal with the public action history since
/// the start of the game. Two nodes with equal keys for the same player are
/// indistinguishable to that player and must offer the same legal actions.
/// Chance events are not part of the public history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InfoKey {
    signal: String,
    history: Vec<String>,
}

impl InfoKey {
    /// Create a key from a private signal and a public action history.
    pub fn new(signal: impl Into<String>, history: Vec<String>) -> Self {
        Self {
            signal: signal.into(),
            history,
        }
    }

    /// The key for the root of the game, before any signal or action.
    pub fn root() -> Self {
        Self::default()
    }

    /// The private signal component.
    pub fn signal(&self) -> &str {
        &self.signal
    }

    /// The public action history component.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Dash-joined history, `"-"` when empty. Used for display and export.
    pub fn history_label(&self) -> String {
        if self.history.is_empty() {
            "-".to_string()
        } else {
            self.history.join("-")
        }
    }
}

impl fmt::Display for InfoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.signal, self.history_label())
    }
}

/// Handle to a node in a [`GameTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// One point in the game tree.
///
/// Structural fields (`player`, `terminal`, `payoff`, `children`, `info`)
/// are fixed at construction. The remaining fields are overwritten or
/// accumulated by the solver every training iteration; `cfr`, `pi_i_sum`
/// and `pi_sigma_sum` are running sums across all iterations and are never
/// reset mid-run.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) player: Actor,
    pub(crate) terminal: bool,
    /// Player-0-relative utility at terminals; player 1's utility is its
    /// negation.
    pub(crate) payoff: f64,
    /// Ordered action -> child edges, exclusively owned by this node.
    pub(crate) children: Vec<(String, NodeId)>,
    pub(crate) info: InfoKey,

    // Per-iteration reach probabilities.
    pub(crate) pi: f64,
    pub(crate) pi_i: f64,
    pub(crate) pi_mi: f64,

    // Per-iteration values.
    pub(crate) eu: f64,
    pub(crate) cv: f64,

    // Running accumulators, parallel to `children`.
    pub(crate) cfr: Vec<f64>,
    pub(crate) pi_i_sum: f64,
    pub(crate) pi_sigma_sum: Vec<f64>,
}

impl Node {
    fn new(player: Actor, terminal: bool, payoff: f64, info: InfoKey) -> Self {
        Self {
            player,
            terminal,
            payoff,
            children: Vec::new(),
            info,
            pi: 0.0,
            pi_i: 0.0,
            pi_mi: 0.0,
            eu: payoff,
            cv: 0.0,
            cfr: Vec::new(),
            pi_i_sum: 0.0,
            pi_sigma_sum: Vec::new(),
        }
    }

    /// The actor who acts at this node.
    pub fn player(&self) -> Actor {
        self.player
    }

    /// Whether this node ends the game.
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Player-0-relative terminal payoff (0 for internal nodes).
    pub fn payoff(&self) -> f64 {
        self.payoff
    }

    /// Ordered action -> child edges.
    pub fn children(&self) -> &[(String, NodeId)] {
        &self.children
    }

    /// Information key of the acting player at this node.
    pub fn info(&self) -> &InfoKey {
        &self.info
    }

    /// Joint probability of reaching this exact node.
    pub fn pi(&self) -> f64 {
        self.pi
    }

    /// The acting player's own contribution to the reach of this node.
    pub fn pi_i(&self) -> f64 {
        self.pi_i
    }

    /// Reach contribution of everyone else, chance included.
    pub fn pi_mi(&self) -> f64 {
        self.pi_mi
    }

    /// Expected utility below this node under the current profile.
    pub fn eu(&self) -> f64 {
        self.eu
    }

    /// Counterfactual value: `pi_mi * eu`.
    pub fn cv(&self) -> f64 {
        self.cv
    }

    /// Cumulative counterfactual regret per action, parallel to `children`.
    pub fn cfr(&self) -> &[f64] {
        &self.cfr
    }

    /// Average-strategy denominator accumulator.
    pub fn pi_i_sum(&self) -> f64 {
        self.pi_i_sum
    }

    /// Average-strategy numerator accumulators, parallel to `children`.
    pub fn pi_sigma_sum(&self) -> &[f64] {
        &self.pi_sigma_sum
    }

    fn reset_accumulators(&mut self) {
        self.pi = 0.0;
        self.pi_i = 0.0;
        self.pi_mi = 0.0;
        self.eu = if self.terminal { self.payoff } else { 0.0 };
        self.cv = 0.0;
        self.cfr.iter_mut().for_each(|r| *r = 0.0);
        self.pi_i_sum = 0.0;
        self.pi_sigma_sum.iter_mut().for_each(|s| *s = 0.0);
    }
}

/// An immutable-structure game tree with per-node CFR accumulators.
///
/// Build the tree top-down with [`GameTree::add_root`],
/// [`GameTree::add_child`] and [`GameTree::add_terminal`], then hand it to
/// [`Game::from_tree`](crate::cfr::game::Game::from_tree) which validates it
/// and builds the information-set index.
#[derive(Debug, Clone)]
pub struct GameTree {
    num_players: usize,
    nodes: Vec<Node>,
}

impl GameTree {
    /// Create an empty tree for a game with `num_players` competing players
    /// (the chance actor is implicit and not counted).
    pub fn new(num_players: usize) -> Self {
        Self {
            num_players,
            nodes: Vec::new(),
        }
    }

    /// Number of competing players (chance excluded).
    pub fn num_players(&self) -> usize {
        self.num_players
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes yet.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Handle to the root node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Borrow a node.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Iterate over all node handles in creation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Add the root node. Must be the first node added.
    pub fn add_root(&mut self, player: Actor, info: InfoKey) -> NodeId {
        assert!(self.nodes.is_empty(), "root must be the first node");
        self.nodes.push(Node::new(player, false, 0.0, info));
        NodeId(0)
    }

    /// Add an internal decision/chance node reached from `parent` by
    /// `action`.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        action: &str,
        player: Actor,
        info: InfoKey,
    ) -> NodeId {
        self.attach(parent, action, Node::new(player, false, 0.0, info))
    }

    /// Add a terminal node reached from `parent` by `action`, carrying the
    /// player-0-relative `payoff`.
    pub fn add_terminal(&mut self, parent: NodeId, action: &str, payoff: f64) -> NodeId {
        self.attach(
            parent,
            action,
            Node::new(Actor::Chance, true, payoff, InfoKey::root()),
        )
    }

    fn attach(&mut self, parent: NodeId, action: &str, node: Node) -> NodeId {
        debug_assert!(
            !self.nodes[parent.0].terminal,
            "cannot attach a child to a terminal node"
        );
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        let parent = &mut self.nodes[parent.0];
        parent.children.push((action.to_string(), id));
        parent.cfr.push(0.0);
        parent.pi_sigma_sum.push(0.0);
        id
    }

    /// Zero every per-iteration field and running accumulator.
    ///
    /// Called once at solver construction; accumulators are never reset
    /// mid-run.
    pub(crate) fn reset_accumulators(&mut self) {
        for node in &mut self.nodes {
            node.reset_accumulators();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_links_children_in_order() {
        let mut tree = GameTree::new(2);
        let root = tree.add_root(Actor::Player(0), InfoKey::new("x", vec![]));
        let a = tree.add_child(
            root,
            "left",
            Actor::Player(1),
            InfoKey::new("y", vec!["left".into()]),
        );
        let b = tree.add_terminal(root, "right", -1.5);

        let children = tree.node(root).children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0], ("left".to_string(), a));
        assert_eq!(children[1], ("right".to_string(), b));

        // Accumulators are sized with the children.
        assert_eq!(tree.node(root).cfr().len(), 2);
        assert_eq!(tree.node(root).pi_sigma_sum().len(), 2);

        assert!(tree.node(b).is_terminal());
        assert_eq!(tree.node(b).payoff(), -1.5);
        assert_eq!(tree.node(b).eu(), -1.5);
    }

    #[test]
    fn test_actor_slots() {
        assert_eq!(Actor::Player(0).slot(2), 0);
        assert_eq!(Actor::Player(1).slot(2), 1);
        assert_eq!(Actor::Chance.slot(2), 2);
        assert!(Actor::Chance.is_chance());
        assert!(!Actor::Player(0).is_chance());
    }

    #[test]
    fn test_info_key_labels() {
        let root = InfoKey::root();
        assert_eq!(root.history_label(), "-");

        let key = InfoKey::new("2", vec!["check".into(), "bet".into()]);
        assert_eq!(key.signal(), "2");
        assert_eq!(key.history_label(), "check-bet");
        assert_eq!(key.to_string(), "2|check-bet");
    }
}
