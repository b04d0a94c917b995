//! Exploitability: information-set-constrained best response.
//!
//! Given a fixed strategy profile (normally the trained average profile),
//! the evaluator computes the value a best-responding opponent extracts
//! against it. The opponent cannot distinguish nodes inside one of its
//! information sets, so the best action is chosen once per set: for each
//! candidate action the recursive values of every member node's child are
//! aggregated, weighted by the member's fixed-profile opponent-side reach,
//! and the aggregate is maximized for player 0 or minimized for player 1
//! (all values are player-0-relative).
//!
//! Total exploitability is `br(0) - br(1)` from the root: 0 at an exact
//! Nash equilibrium, positive otherwise, and trending to 0 as CFR training
//! progresses.

use crate::cfr::game::{Game, GameError};
use crate::cfr::profile::StrategyProfile;
use crate::cfr::tree::{Actor, InfoKey, NodeId};

/// Total exploitability of `profile`: the sum of what each player gains by
/// best-responding while the other side stays fixed.
///
/// Fails with [`GameError::UndefinedStrategy`] if `profile` lacks an entry
/// for a reachable information set - a fatal configuration error when
/// evaluating externally supplied profiles.
pub fn exploitability(game: &Game, profile: &StrategyProfile) -> Result<f64, GameError> {
    Ok(best_response_value(game, profile, 0)? - best_response_value(game, profile, 1)?)
}

/// Best-response value (player-0-relative, from the root) when `opponent`
/// best-responds and everyone else, chance included, follows `profile`.
pub fn best_response_value(
    game: &Game,
    profile: &StrategyProfile,
    opponent: usize,
) -> Result<f64, GameError> {
    let reach = opponent_reach(game, profile)?;
    node_value(game, profile, &reach, opponent, game.root())
}

/// Per-node opponent-side reach under `profile`: for each node, the product
/// of every *other* actor's action probabilities along the path from the
/// root, from the perspective of the node's owner. This is the weight the
/// best response uses to aggregate values across an information set.
fn opponent_reach(game: &Game, profile: &StrategyProfile) -> Result<Vec<f64>, GameError> {
    let mut reach = vec![0.0; game.tree().len()];
    let actors = game.num_players() + 1;
    descend(game, profile, &mut reach, game.root(), vec![1.0; actors])?;
    Ok(reach)
}

fn descend(
    game: &Game,
    profile: &StrategyProfile,
    reach: &mut [f64],
    id: NodeId,
    pi_mi: Vec<f64>,
) -> Result<(), GameError> {
    let num_players = game.num_players();
    let node = game.tree().node(id);
    let slot = node.player().slot(num_players);
    reach[id.index()] = pi_mi[slot];

    if node.is_terminal() {
        return Ok(());
    }
    let probs = lookup(profile, node.player(), node.info(), node.children().len())?;
    for (a, &(_, child)) in node.children().iter().enumerate() {
        let mut next = pi_mi.clone();
        for actor in 0..next.len() {
            if actor != slot {
                next[actor] *= probs[a];
            }
        }
        descend(game, profile, reach, child, next)?;
    }
    Ok(())
}

fn node_value(
    game: &Game,
    profile: &StrategyProfile,
    reach: &[f64],
    opponent: usize,
    id: NodeId,
) -> Result<f64, GameError> {
    let node = game.tree().node(id);
    if node.is_terminal() {
        return Ok(node.payoff());
    }

    if node.player() == Actor::Player(opponent) {
        // Best-response decision point. The action is chosen once per
        // information set, optimizing the reach-weighted aggregate over
        // every member node; the return value is this node's own child
        // value under that action.
        let set = game
            .index()
            .get(node.player(), node.info())
            .expect("every decision node is indexed at construction");

        let mut best_aggregate = if opponent == 0 {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        let mut best_own = 0.0;

        for a in 0..node.children().len() {
            let mut aggregate = 0.0;
            let mut own = 0.0;
            for &member in set.nodes() {
                let (_, child) = game.tree().node(member).children()[a];
                let value = node_value(game, profile, reach, opponent, child)?;
                if member == id {
                    own = value;
                }
                aggregate += reach[member.index()] * value;
            }
            let improves = if opponent == 0 {
                aggregate > best_aggregate
            } else {
                aggregate < best_aggregate
            };
            if improves {
                best_aggregate = aggregate;
                best_own = own;
            }
        }
        Ok(best_own)
    } else {
        // Fixed side (the other player, or chance): follow the profile.
        let probs = lookup(profile, node.player(), node.info(), node.children().len())?;
        let mut eu = 0.0;
        for (a, &(_, child)) in node.children().iter().enumerate() {
            eu += probs[a] * node_value(game, profile, reach, opponent, child)?;
        }
        Ok(eu)
    }
}

fn lookup<'a>(
    profile: &'a StrategyProfile,
    actor: Actor,
    key: &InfoKey,
    num_actions: usize,
) -> Result<&'a [f64], GameError> {
    let probs = profile
        .probs(actor, key)
        .ok_or_else(|| GameError::UndefinedStrategy {
            player: actor,
            key: key.clone(),
        })?;
    if probs.len() != num_actions {
        return Err(GameError::WrongActionCount {
            key: key.clone(),
            expected: num_actions,
            got: probs.len(),
        });
    }
    Ok(probs)
}
