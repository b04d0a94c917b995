//! Strategy profiles: actor -> information key -> action probabilities.
//!
//! Two profiles exist during training: the *current* profile, rewritten
//! every iteration by regret matching, and the *average* profile, the
//! reach-weighted time average that CFR theory drives toward equilibrium.
//! The chance actor has its own entries holding the game's fixed chance
//! distribution; the updater never touches them.
//!
//! Probability vectors are stored parallel to the information set's
//! canonical action order from the [`InfoSetIndex`](crate::cfr::game::InfoSetIndex).

use rustc_hash::FxHashMap;

use crate::cfr::game::{Game, GameError};
use crate::cfr::tree::{Actor, InfoKey};

const DISTRIBUTION_TOLERANCE: f64 = 1e-9;

/// A complete strategy profile over every information set of a game.
#[derive(Debug, Clone)]
pub struct StrategyProfile {
    num_players: usize,
    // One table per actor slot; chance occupies the trailing slot.
    tables: Vec<FxHashMap<InfoKey, Vec<f64>>>,
}

impl StrategyProfile {
    /// Build a profile assigning the uniform distribution to every
    /// information set, the chance actor's included.
    ///
    /// Games whose chance events are not uniform over each chance node's
    /// actions should overwrite the chance entries with
    /// [`StrategyProfile::set_probs`] before training.
    pub fn uniform(game: &Game) -> Self {
        let num_players = game.num_players();
        let mut tables: Vec<FxHashMap<InfoKey, Vec<f64>>> =
            vec![FxHashMap::default(); num_players + 1];

        for slot in 0..=num_players {
            let actor = if slot == num_players {
                Actor::Chance
            } else {
                Actor::Player(slot)
            };
            for (key, set) in game.index().sets(actor) {
                let n = set.actions().len();
                tables[slot].insert(key.clone(), vec![1.0 / n as f64; n]);
            }
        }

        Self {
            num_players,
            tables,
        }
    }

    /// Number of competing players (chance excluded).
    pub fn num_players(&self) -> usize {
        self.num_players
    }

    /// Action probabilities for one information set, in the set's canonical
    /// action order. `None` if the profile has no entry.
    pub fn probs(&self, actor: Actor, key: &InfoKey) -> Option<&[f64]> {
        self.tables[actor.slot(self.num_players)]
            .get(key)
            .map(Vec::as_slice)
    }

    pub(crate) fn probs_mut(&mut self, actor: Actor, key: &InfoKey) -> Option<&mut Vec<f64>> {
        self.tables[actor.slot(self.num_players)].get_mut(key)
    }

    /// All entries of one actor's table.
    pub fn entries(&self, actor: Actor) -> &FxHashMap<InfoKey, Vec<f64>> {
        &self.tables[actor.slot(self.num_players)]
    }

    /// Overwrite one information set's distribution.
    ///
    /// Validates that the information set exists in the game, that the
    /// vector matches its action count, and that it sums to 1. Used to
    /// pre-populate non-uniform chance distributions and to install
    /// hand-coded profiles for evaluation.
    pub fn set_probs(
        &mut self,
        game: &Game,
        actor: Actor,
        key: &InfoKey,
        probs: Vec<f64>,
    ) -> Result<(), GameError> {
        let set = game
            .index()
            .get(actor, key)
            .ok_or_else(|| GameError::UnknownInfoSet {
                player: actor,
                key: key.clone(),
            })?;
        if probs.len() != set.actions().len() {
            return Err(GameError::WrongActionCount {
                key: key.clone(),
                expected: set.actions().len(),
                got: probs.len(),
            });
        }
        let sum: f64 = probs.iter().sum();
        if (sum - 1.0).abs() > DISTRIBUTION_TOLERANCE {
            return Err(GameError::NotADistribution {
                key: key.clone(),
                sum,
            });
        }
        self.tables[actor.slot(self.num_players)].insert(key.clone(), probs);
        Ok(())
    }
}
