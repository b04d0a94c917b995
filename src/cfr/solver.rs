//! Vanilla CFR solver: full-tree traversal, no sampling.
//!
//! One training iteration runs three strictly ordered phases over the tree:
//!
//! 1. **Reach propagation** (top-down): assigns every node its joint reach
//!    `pi`, the acting player's own reach `pi_i`, and everyone else's reach
//!    `pi_mi` under the current profile.
//! 2. **Value & regret accumulation** (post-order): computes expected
//!    utility and counterfactual value per node, accumulates per-action
//!    counterfactual regret and the average-strategy sums.
//! 3. **Strategy update**: per information set, aggregates the accumulated
//!    regret across all member nodes and regret-matches a new current
//!    strategy; folds the accumulated reach-weighted sums into the average
//!    strategy.
//!
//! The phases must not interleave: the accumulator reads the reaches the
//! propagator wrote, and the updater reads the sums the accumulator wrote.
//! CFR theory guarantees the *average* profile converges to a Nash
//! equilibrium; the current profile need not converge pointwise.

use std::time::Instant;

use crate::cfr::best_response;
use crate::cfr::config::{CfrConfig, CfrStats, ConfigError};
use crate::cfr::game::{Game, GameError};
use crate::cfr::profile::StrategyProfile;
use crate::cfr::tree::{Actor, GameTree, InfoKey, NodeId};

/// The vanilla CFR solver.
///
/// Owns the game, the current and average strategy profiles, and the
/// per-node accumulators embedded in the tree. Both profiles start uniform;
/// the average profile is the near-equilibrium result of training.
///
/// # Example
/// ```ignore
/// use tree_cfr::cfr::{CfrConfig, CfrSolver};
///
/// let mut solver = CfrSolver::new(game, CfrConfig::default())?;
/// solver.train(10_000);
/// let strategy = solver.average_profile();
/// println!("exploitability: {}", solver.exploitability());
/// ```
pub struct CfrSolver {
    game: Game,
    config: CfrConfig,
    current: StrategyProfile,
    average: StrategyProfile,
    iteration: u64,
    stats: CfrStats,
}

impl CfrSolver {
    /// Create a solver for the given game.
    ///
    /// Validates the configuration, resets every per-node accumulator and
    /// seeds both profiles uniform over each information set's actions,
    /// the chance actor's included.
    pub fn new(mut game: Game, config: CfrConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        game.tree.reset_accumulators();
        let current = StrategyProfile::uniform(&game);
        let average = current.clone();
        Ok(Self {
            game,
            config,
            current,
            average,
            iteration: 0,
            stats: CfrStats::new(),
        })
    }

    /// Overwrite the chance actor's distribution at one information set in
    /// both profiles.
    ///
    /// Call before training for games whose chance events are not uniform
    /// over each chance node's actions.
    pub fn set_chance_probs(&mut self, key: &InfoKey, probs: Vec<f64>) -> Result<(), GameError> {
        self.current
            .set_probs(&self.game, Actor::Chance, key, probs.clone())?;
        self.average.set_probs(&self.game, Actor::Chance, key, probs)
    }

    /// Run a single CFR iteration: propagate reach, accumulate values and
    /// regret, update strategies.
    pub fn run_iteration(&mut self) {
        self.iteration += 1;
        let actors = self.game.num_players() + 1;
        let root = self.game.tree.root();

        propagate_reach(
            &mut self.game.tree,
            &self.current,
            root,
            vec![1.0; actors],
            vec![1.0; actors],
        );
        accumulate_values(&mut self.game.tree, &self.current, root);
        update_strategies(&self.game, &mut self.current, &mut self.average);
    }

    /// Train for a fixed number of iterations.
    ///
    /// Records exploitability of the average profile on the configured
    /// schedule. Returns the updated statistics.
    pub fn train(&mut self, iterations: u64) -> &CfrStats {
        let start_time = Instant::now();

        for _ in 0..iterations {
            self.run_iteration();
            self.maybe_record_exploitability();
        }

        self.finish_stats(start_time);
        &self.stats
    }

    /// Train with a callback for progress tracking.
    ///
    /// # Arguments
    /// * `iterations` - Number of iterations to run
    /// * `callback_interval` - How often to call the callback (clamped to
    ///   at least 1)
    /// * `callback` - Function called every `callback_interval` iterations
    pub fn train_with_callback<F>(
        &mut self,
        iterations: u64,
        callback_interval: u64,
        mut callback: F,
    ) -> &CfrStats
    where
        F: FnMut(&CfrStats),
    {
        let callback_interval = callback_interval.max(1);
        let start_time = Instant::now();

        for i in 0..iterations {
            self.run_iteration();
            self.maybe_record_exploitability();

            if (i + 1) % callback_interval == 0 {
                self.finish_stats(start_time);
                callback(&self.stats);
            }
        }

        self.finish_stats(start_time);
        &self.stats
    }

    // The constructor rejects a zero interval, so the modulus is safe.
    fn maybe_record_exploitability(&mut self) {
        if let Some(interval) = self.config.exploitability_interval {
            if self.iteration % interval == 0 {
                let exploitability = self.exploitability();
                self.stats
                    .record_exploitability(self.iteration, exploitability);
            }
        }
    }

    fn finish_stats(&mut self, start_time: Instant) {
        self.stats.iterations = self.iteration;
        self.stats.info_sets = self.game.index().num_info_sets();
        self.stats.elapsed_seconds = start_time.elapsed().as_secs_f64();
        self.stats.update_rate();
    }

    /// Exploitability of the current average profile.
    pub fn exploitability(&self) -> f64 {
        best_response::exploitability(&self.game, &self.average)
            .expect("average profile covers every information set of its own game")
    }

    /// The current (regret-matched) strategy profile.
    pub fn current_profile(&self) -> &StrategyProfile {
        &self.current
    }

    /// The average strategy profile - the near-equilibrium result.
    pub fn average_profile(&self) -> &StrategyProfile {
        &self.average
    }

    /// The game being solved.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// The solver configuration.
    pub fn config(&self) -> &CfrConfig {
        &self.config
    }

    /// The current iteration count.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Current statistics.
    pub fn stats(&self) -> &CfrStats {
        &self.stats
    }
}

/// Top-down reach propagation.
///
/// `pi_i[s]` is actor s's own contribution to the reach of this node;
/// `pi_mi[s]` is everyone else's, chance included. At a node owned by P,
/// the probability of the action taken multiplies into P's own-reach slot
/// and into every other actor's opponent-reach slot. Chance owns the
/// trailing slot, so its deal probabilities always land in both players'
/// `pi_mi`.
fn propagate_reach(
    tree: &mut GameTree,
    profile: &StrategyProfile,
    id: NodeId,
    pi_i: Vec<f64>,
    pi_mi: Vec<f64>,
) {
    let num_players = tree.num_players();
    let slot = tree.node(id).player().slot(num_players);
    {
        let node = tree.node_mut(id);
        node.pi_i = pi_i[slot];
        node.pi_mi = pi_mi[slot];
        node.pi = pi_i[slot] * pi_mi[slot];
    }

    let node = tree.node(id);
    if node.is_terminal() {
        return;
    }
    let player = node.player();
    let key = node.info().clone();
    let children: Vec<NodeId> = node.children().iter().map(|(_, child)| *child).collect();
    let probs = profile
        .probs(player, &key)
        .expect("profile seeded for every information set")
        .to_vec();

    for (a, child) in children.into_iter().enumerate() {
        let mut next_i = pi_i.clone();
        let mut next_mi = pi_mi.clone();
        for actor in 0..next_i.len() {
            if actor == slot {
                next_i[actor] *= probs[a];
            } else {
                next_mi[actor] *= probs[a];
            }
        }
        propagate_reach(tree, profile, child, next_i, next_mi);
    }
}

/// Post-order value and regret accumulation. Returns the node's expected
/// utility (player-0-relative) under the current profile.
///
/// The instantaneous counterfactual regret of action A is
/// `pi_mi * eu(child(A)) - cv`, sign-flipped for player 1 because stored
/// utilities are player-0-relative. Regret and the average-strategy sums
/// are running accumulators across all iterations.
fn accumulate_values(tree: &mut GameTree, profile: &StrategyProfile, id: NodeId) -> f64 {
    let node = tree.node(id);
    if node.is_terminal() {
        return node.payoff();
    }
    let player = node.player();
    let key = node.info().clone();
    let pi_i = node.pi_i;
    let pi_mi = node.pi_mi;
    let children: Vec<NodeId> = node.children().iter().map(|(_, child)| *child).collect();
    let probs = profile
        .probs(player, &key)
        .expect("profile seeded for every information set")
        .to_vec();

    tree.node_mut(id).pi_i_sum += pi_i;

    let mut eu = 0.0;
    let mut child_eus = Vec::with_capacity(children.len());
    for (a, &child) in children.iter().enumerate() {
        tree.node_mut(id).pi_sigma_sum[a] += pi_i * probs[a];
        let child_eu = accumulate_values(tree, profile, child);
        child_eus.push(child_eu);
        eu += probs[a] * child_eu;
    }

    let cv = pi_mi * eu;
    let node = tree.node_mut(id);
    node.eu = eu;
    node.cv = cv;
    for (a, &child_eu) in child_eus.iter().enumerate() {
        let regret = pi_mi * child_eu - cv;
        node.cfr[a] += if player == Actor::Player(1) {
            -regret
        } else {
            regret
        };
    }

    eu
}

/// Per-information-set strategy update.
///
/// Aggregates regret and the average-strategy sums across every node of the
/// set, then regret-matches the current strategy (uniform fallback when no
/// action has positive aggregate regret). The average entry is left
/// unchanged while the set's aggregate `pi_i_sum` is still zero, i.e. the
/// set has never been reached under the profiles played so far.
fn update_strategies(game: &Game, current: &mut StrategyProfile, average: &mut StrategyProfile) {
    let tree = game.tree();
    for p in 0..game.num_players() {
        let actor = Actor::Player(p);
        for (key, set) in game.index().sets(actor) {
            let n = set.actions().len();
            let mut regret = vec![0.0; n];
            let mut numerator = vec![0.0; n];
            let mut denominator = 0.0;

            for &id in set.nodes() {
                let node = tree.node(id);
                denominator += node.pi_i_sum;
                for a in 0..n {
                    regret[a] += node.cfr[a];
                    numerator[a] += node.pi_sigma_sum[a];
                }
            }

            // Only positive aggregate regret drives the policy.
            for r in regret.iter_mut() {
                if *r < 0.0 {
                    *r = 0.0;
                }
            }
            let regret_sum: f64 = regret.iter().sum();

            let probs = current
                .probs_mut(actor, key)
                .expect("current profile seeded for every information set");
            if regret_sum > 0.0 {
                for a in 0..n {
                    probs[a] = regret[a] / regret_sum;
                }
            } else {
                for a in 0..n {
                    probs[a] = 1.0 / n as f64;
                }
            }

            if denominator > 0.0 {
                let avg = average
                    .probs_mut(actor, key)
                    .expect("average profile seeded for every information set");
                for a in 0..n {
                    avg[a] = numerator[a] / denominator;
                }
            }
        }
    }
}
