//! Strategy export utilities.
//!
//! Converts a strategy profile into a human-readable table for inspection,
//! grouped by private signal first and public history second. This is a
//! presentation concern layered on top of the solver, not part of it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::cfr::game::Game;
use crate::cfr::profile::StrategyProfile;
use crate::cfr::tree::Actor;

/// A strategy profile grouped for inspection:
/// private signal -> dash-joined history (`"-"` when empty) -> action ->
/// probability.
///
/// `BTreeMap` keeps the serialized output in a stable, readable order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyTable {
    /// The grouped probabilities.
    pub strategies: BTreeMap<String, BTreeMap<String, BTreeMap<String, f64>>>,
}

impl StrategyTable {
    /// Build a table from every competing player's entries in `profile`.
    ///
    /// Chance entries are omitted: they are the game's fixed distribution,
    /// not a learned strategy.
    pub fn from_profile(game: &Game, profile: &StrategyProfile) -> Self {
        let mut strategies: BTreeMap<String, BTreeMap<String, BTreeMap<String, f64>>> =
            BTreeMap::new();

        for p in 0..game.num_players() {
            let actor = Actor::Player(p);
            for (key, probs) in profile.entries(actor) {
                let Some(set) = game.index().get(actor, key) else {
                    continue;
                };
                let by_action = strategies
                    .entry(key.signal().to_string())
                    .or_default()
                    .entry(key.history_label())
                    .or_default();
                for (action, &prob) in set.actions().iter().zip(probs.iter()) {
                    by_action.insert(action.clone(), prob);
                }
            }
        }

        Self { strategies }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfr::tree::{GameTree, InfoKey};

    #[test]
    fn test_table_groups_by_signal_then_history() {
        let mut tree = GameTree::new(2);
        let root = tree.add_root(Actor::Chance, InfoKey::root());
        for deal in ["h", "t"] {
            let node = tree.add_child(root, deal, Actor::Player(0), InfoKey::new("?", vec![]));
            tree.add_terminal(node, "a", 1.0);
            tree.add_terminal(node, "b", -1.0);
        }
        let game = Game::from_tree(tree).unwrap();
        let profile = StrategyProfile::uniform(&game);

        let table = StrategyTable::from_profile(&game, &profile);
        let entry = &table.strategies["?"]["-"];
        assert_eq!(entry["a"], 0.5);
        assert_eq!(entry["b"], 0.5);

        // Chance is not exported.
        assert!(!table.strategies.contains_key(""));
    }
}
