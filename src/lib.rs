//! # tree-cfr
//!
//! Vanilla Counterfactual Regret Minimization (CFR) for two-player
//! zero-sum imperfect-information extensive-form games, with an
//! exploitability evaluator for measuring distance from equilibrium.
//!
//! ## Features
//!
//! - **Explicit game trees**: build the full tree once, then iterate over
//!   it; per-node accumulators live in the tree itself.
//! - **Information-set aware**: strategies, regret aggregation and best
//!   responses are all defined per information set, never per node.
//! - **Exploitability**: best-response evaluation against any fixed
//!   profile, constrained to one decision per information set.
//! - **Validation games**: Kuhn poker with its known analytic equilibrium.
//!
//! ## Quick Start
//!
//! ```
//! use tree_cfr::cfr::{CfrConfig, CfrSolver};
//! use tree_cfr::games::kuhn::KuhnPoker;
//!
//! let mut solver = CfrSolver::new(KuhnPoker::game(), CfrConfig::default()).unwrap();
//! solver.train(1_000);
//! assert!(solver.exploitability() < 0.1);
//! ```
//!
//! ## Modules
//!
//! - [`cfr`]: the solving engine (tree, profiles, solver, evaluator)
//! - [`games`]: game implementations for validation

#![warn(missing_docs)]

/// CFR (Counterfactual Regret Minimization) solver module.
///
/// This is the core module containing the tree-based CFR algorithm.
pub mod cfr;

/// Game implementations module.
///
/// Contains games with known equilibria for testing and validation.
pub mod games;

// Re-export commonly used types at crate root for convenience
pub use cfr::{Actor, CfrConfig, CfrSolver, CfrStats, Game, GameTree, InfoKey, StrategyProfile};
