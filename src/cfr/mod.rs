//! Counterfactual Regret Minimization over an explicit game tree.
//!
//! This module implements vanilla CFR for two-player zero-sum
//! imperfect-information games: full tree traversal, no sampling.
//!
//! # Overview
//!
//! Each training iteration:
//! 1. Propagates reach probabilities through the tree under the current
//!    strategy profile.
//! 2. Computes counterfactual values and accumulates per-action regret and
//!    average-strategy sums, bottom-up.
//! 3. Regret-matches a new current strategy per information set and folds
//!    the sums into the average strategy.
//!
//! The *average* strategy profile converges to a Nash equilibrium; its
//! distance from equilibrium can be measured at any point with the
//! best-response [`exploitability`] evaluator.
//!
//! # Usage
//!
//! 1. Build a [`GameTree`] with the builder methods and wrap it in a
//!    [`Game`] (this validates the information-set invariant).
//! 2. Create a [`CfrSolver`] and call `train()`.
//! 3. Read the result with `average_profile()` and `exploitability()`.
//!
//! # References
//!
//! - Zinkevich, M., et al. "Regret Minimization in Games with Incomplete
//!   Information" (2007)

pub mod best_response;
pub mod config;
pub mod game;
pub mod output;
pub mod profile;
pub mod solver;
pub mod tree;

// Re-export main types for convenient access
pub use best_response::{best_response_value, exploitability};
pub use config::{CfrConfig, CfrStats, ConfigError, ExploitabilityPoint};
pub use game::{Game, GameError, InfoSet, InfoSetIndex};
pub use output::StrategyTable;
pub use profile::StrategyProfile;
pub use solver::CfrSolver;
pub use tree::{Actor, GameTree, InfoKey, Node, NodeId};
