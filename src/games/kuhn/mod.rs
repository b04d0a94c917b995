//! Kuhn poker for CFR validation.
//!
//! Kuhn poker is a simplified poker game used to validate CFR
//! implementations because it has a known, mathematically proven Nash
//! equilibrium.
//!
//! ## Game Rules
//!
//! - 3 cards: Jack (0), Queen (1), King (2)
//! - 2 players, each antes 1 chip
//! - Each player receives 1 card (6 equally likely deals)
//! - Player 0 acts first: check or bet (1 chip)
//! - Facing a bet, a player folds or calls
//! - Higher card wins at showdown: ±1 after check-check, ±2 after a call,
//!   ±1 to the non-folding player after a fold
//!
//! ## Known Nash Equilibrium
//!
//! First-player strategies form a one-parameter family (bluff frequency
//! alpha in [0, 1/3]). [`KuhnPoker::equilibrium_profile`] returns the
//! alpha = 0 member:
//!
//! - **Player 0**: always check; facing check-bet, call with Queen 1/3 of
//!   the time, always with King, never with Jack
//! - **Player 1 after a check**: bet Jack 1/3 of the time, never Queen,
//!   always King
//! - **Player 1 facing a bet**: fold Jack, call with Queen 1/3 of the
//!   time, always call with King
//!
//! **Game value**: player 0 expects -1/18 per hand at equilibrium.

use crate::cfr::game::{Game, GameError};
use crate::cfr::profile::StrategyProfile;
use crate::cfr::tree::{Actor, GameTree, InfoKey, NodeId};

const CHECK: &str = "check";
const BET: &str = "bet";
const FOLD: &str = "fold";
const CALL: &str = "call";

/// Kuhn poker game builder.
pub struct KuhnPoker;

impl KuhnPoker {
    /// Build the full Kuhn poker game: a uniform chance root over the 6
    /// deals, each followed by the complete betting tree.
    pub fn game() -> Game {
        Game::from_tree(Self::build_tree()).expect("Kuhn tree satisfies the info-set invariant")
    }

    fn build_tree() -> GameTree {
        let mut tree = GameTree::new(2);
        let root = tree.add_root(Actor::Chance, InfoKey::root());

        for card_0 in 0..3u8 {
            for card_1 in 0..3u8 {
                if card_0 == card_1 {
                    continue;
                }
                let deal = format!("{},{}", card_0, card_1);
                let node = tree.add_child(
                    root,
                    &deal,
                    Actor::Player(0),
                    InfoKey::new(card_0.to_string(), vec![]),
                );
                Self::build_betting(&mut tree, node, card_0, card_1);
            }
        }

        tree
    }

    /// Betting tree below one deal. `parent` is player 0's opening
    /// decision. Payoffs are player-0-relative.
    fn build_betting(tree: &mut GameTree, parent: NodeId, card_0: u8, card_1: u8) {
        let signal_0 = card_0.to_string();
        let signal_1 = card_1.to_string();
        let showdown_1 = if card_0 > card_1 { 1.0 } else { -1.0 };
        let showdown_2 = if card_0 > card_1 { 2.0 } else { -2.0 };

        // Player 0 checks; player 1 checks behind (showdown for the
        // antes) or bets.
        let after_check = tree.add_child(
            parent,
            CHECK,
            Actor::Player(1),
            InfoKey::new(&signal_1, vec![CHECK.into()]),
        );
        tree.add_terminal(after_check, CHECK, showdown_1);
        let after_check_bet = tree.add_child(
            after_check,
            BET,
            Actor::Player(0),
            InfoKey::new(&signal_0, vec![CHECK.into(), BET.into()]),
        );
        tree.add_terminal(after_check_bet, FOLD, -1.0);
        tree.add_terminal(after_check_bet, CALL, showdown_2);

        // Player 0 bets; player 1 folds or calls.
        let after_bet = tree.add_child(
            parent,
            BET,
            Actor::Player(1),
            InfoKey::new(&signal_1, vec![BET.into()]),
        );
        tree.add_terminal(after_bet, FOLD, 1.0);
        tree.add_terminal(after_bet, CALL, showdown_2);
    }

    /// The alpha = 0 analytic Nash equilibrium as a full profile
    /// (chance stays uniform over the 6 deals).
    pub fn equilibrium_profile(game: &Game) -> Result<StrategyProfile, GameError> {
        let mut profile = StrategyProfile::uniform(game);

        for player in 0..2 {
            let actor = Actor::Player(player);
            let mut assignments = Vec::new();
            for (key, set) in game.index().sets(actor) {
                let card: u8 = key
                    .signal()
                    .parse()
                    .expect("Kuhn signals are card ranks");
                let probs: Vec<f64> = set
                    .actions()
                    .iter()
                    .map(|action| Self::equilibrium_prob(player, card, action))
                    .collect();
                assignments.push((key.clone(), probs));
            }
            for (key, probs) in assignments {
                profile.set_probs(game, actor, &key, probs)?;
            }
        }

        Ok(profile)
    }

    fn equilibrium_prob(player: usize, card: u8, action: &str) -> f64 {
        match (player, action) {
            (0, CHECK) => 1.0,
            (0, BET) => 0.0,
            (1, CHECK) => match card {
                0 => 2.0 / 3.0,
                1 => 1.0,
                _ => 0.0,
            },
            (1, BET) => match card {
                0 => 1.0 / 3.0,
                1 => 0.0,
                _ => 1.0,
            },
            (_, CALL) => match card {
                0 => 0.0,
                1 => 1.0 / 3.0,
                _ => 1.0,
            },
            (_, FOLD) => match card {
                0 => 1.0,
                1 => 2.0 / 3.0,
                _ => 0.0,
            },
            _ => unreachable!("unknown Kuhn action {}", action),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfr::best_response::{best_response_value, exploitability};
    use crate::cfr::config::CfrConfig;
    use crate::cfr::solver::CfrSolver;

    /// Player 0's equilibrium expectation per hand.
    const GAME_VALUE: f64 = -1.0 / 18.0;

    #[test]
    fn test_kuhn_tree_shape() {
        let game = KuhnPoker::game();

        // Root + 6 deals x 9 betting nodes.
        assert_eq!(game.tree().len(), 55);
        assert_eq!(game.tree().node(game.root()).children().len(), 6);

        // 3 cards x 2 histories per player, plus the chance root.
        assert_eq!(game.index().num_info_sets(), 12);
        assert_eq!(game.index().sets(Actor::Chance).len(), 1);

        // Each player information set spans the 2 deals consistent with
        // the player's card.
        for player in 0..2 {
            for set in game.index().sets(Actor::Player(player)).values() {
                assert_eq!(set.nodes().len(), 2);
            }
        }
    }

    #[test]
    fn test_zero_sum_terminal_convention() {
        let game = KuhnPoker::game();
        let tree = game.tree();

        // Mirrored deals produce negated showdown payoffs.
        let payoff_after = |deal: &str, line: &[&str]| -> f64 {
            let mut id = tree
                .node(game.root())
                .children()
                .iter()
                .find(|(action, _)| action == deal)
                .map(|&(_, child)| child)
                .unwrap();
            for step in line {
                id = tree
                    .node(id)
                    .children()
                    .iter()
                    .find(|(action, _)| action == step)
                    .map(|&(_, child)| child)
                    .unwrap();
            }
            tree.node(id).payoff()
        };

        assert_eq!(payoff_after("2,0", &[CHECK, CHECK]), 1.0);
        assert_eq!(payoff_after("0,2", &[CHECK, CHECK]), -1.0);
        assert_eq!(payoff_after("2,0", &[BET, CALL]), 2.0);
        assert_eq!(payoff_after("0,2", &[BET, CALL]), -2.0);

        // Folds pay the non-folding player one ante regardless of cards.
        assert_eq!(payoff_after("0,2", &[BET, FOLD]), 1.0);
        assert_eq!(payoff_after("2,0", &[CHECK, BET, FOLD]), -1.0);
    }

    #[test]
    fn test_equilibrium_profile_has_zero_exploitability() {
        let game = KuhnPoker::game();
        let profile = KuhnPoker::equilibrium_profile(&game).unwrap();

        let exploit = exploitability(&game, &profile).unwrap();
        assert!(exploit.abs() < 1e-9, "equilibrium exploitability: {}", exploit);

        // Both best responses recover the game value.
        let br0 = best_response_value(&game, &profile, 0).unwrap();
        let br1 = best_response_value(&game, &profile, 1).unwrap();
        assert!((br0 - GAME_VALUE).abs() < 1e-9, "br0 = {}", br0);
        assert!((br1 - GAME_VALUE).abs() < 1e-9, "br1 = {}", br1);
    }

    #[test]
    fn test_kuhn_cfr_convergence() {
        let game = KuhnPoker::game();
        let mut solver = CfrSolver::new(game, CfrConfig::default()).unwrap();

        solver.train(10_000);

        let exploit = solver.exploitability();
        assert!(exploit >= -1e-9, "exploitability must be non-negative: {}", exploit);
        assert!(exploit < 0.05, "exploitability after 10k iterations: {}", exploit);

        let avg = solver.average_profile();
        let probs = |player: usize, card: &str, history: &[&str]| -> Vec<f64> {
            let key = InfoKey::new(card, history.iter().map(|s| s.to_string()).collect());
            avg.probs(Actor::Player(player), &key).unwrap().to_vec()
        };

        // Equilibrium components, generous tolerances. Action order
        // follows construction: [check, bet] / [fold, call].

        // Player 0 facing check-bet: never call with Jack, always with King.
        assert!(probs(0, "0", &[CHECK, BET])[1] < 0.1, "Jack should fold to a bet");
        assert!(probs(0, "2", &[CHECK, BET])[1] > 0.9, "King should call a bet");

        // Player 0's Queen call facing check-bet is not unique: across the
        // equilibrium family it equals alpha + 1/3, where alpha is the
        // opening Jack bet frequency, so it can land anywhere in
        // [1/3, 2/3]. Check the family relation, not a point value.
        let alpha = probs(0, "0", &[])[1];
        let queen_call = probs(0, "1", &[CHECK, BET])[1];
        assert!(
            queen_call > 1.0 / 3.0 - 0.1 && queen_call < 2.0 / 3.0 + 0.1,
            "Queen call probability {} should lie in [1/3, 2/3]",
            queen_call
        );
        assert!(
            (queen_call - (alpha + 1.0 / 3.0)).abs() < 0.1,
            "Queen call probability {} should track alpha + 1/3 = {}",
            queen_call,
            alpha + 1.0 / 3.0
        );

        // Player 1 after a check: never bet Queen, always bet King.
        assert!(probs(1, "1", &[CHECK])[1] < 0.1, "Queen should not bet after a check");
        assert!(probs(1, "2", &[CHECK])[1] > 0.9, "King should bet after a check");

        // Player 1 facing a bet: fold Jack, call King, call Queen ~1/3.
        assert!(probs(1, "0", &[BET])[1] < 0.1, "Jack should fold to a bet");
        assert!(probs(1, "2", &[BET])[1] > 0.9, "King should call a bet");
        let p1_queen_call = probs(1, "1", &[BET])[1];
        assert!(
            p1_queen_call > 0.18 && p1_queen_call < 0.48,
            "Queen call probability {} should be near 1/3",
            p1_queen_call
        );
    }

    #[test]
    fn test_trained_value_approaches_game_value() {
        let game = KuhnPoker::game();
        let mut solver = CfrSolver::new(game, CfrConfig::default()).unwrap();
        solver.train(10_000);

        let br0 = best_response_value(solver.game(), solver.average_profile(), 0).unwrap();
        let br1 = best_response_value(solver.game(), solver.average_profile(), 1).unwrap();
        assert!((br0 - GAME_VALUE).abs() < 0.05, "br0 = {}", br0);
        assert!((br1 - GAME_VALUE).abs() < 0.05, "br1 = {}", br1);
    }

    #[test]
    fn test_first_player_bluff_relation() {
        // Any equilibrium in the family satisfies bet(King) = 3 * bet(Jack)
        // at the opening decision.
        let game = KuhnPoker::game();
        let mut solver = CfrSolver::new(game, CfrConfig::default()).unwrap();
        solver.train(10_000);

        let avg = solver.average_profile();
        let bet = |card: &str| -> f64 {
            avg.probs(Actor::Player(0), &InfoKey::new(card, vec![]))
                .unwrap()[1]
        };
        assert!(bet("1") < 0.1, "Queen should not open-bet");
        assert!(
            (bet("2") - 3.0 * bet("0")).abs() < 0.15,
            "King bet {} should be ~3x Jack bet {}",
            bet("2"),
            bet("0")
        );
    }
}
