//! Game implementations for the CFR solver.
//!
//! Games here serve two purposes:
//!
//! 1. **Validation**: games with known Nash equilibria (like Kuhn poker)
//!    verify that the solver and the exploitability evaluator are correct.
//! 2. **Examples**: demonstrate how to build a [`GameTree`](crate::cfr::GameTree)
//!    for a new game.
//!
//! To add a new game, build its tree top-down with the `GameTree` builder
//! (chance nodes for random events, one information key per decision
//! point) and wrap it in a [`Game`](crate::cfr::Game).

pub mod kuhn;
