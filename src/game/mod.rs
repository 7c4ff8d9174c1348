//! Kuhn poker game primitives.
//!
//! Kuhn poker is the smallest non-trivial imperfect-information poker game:
//! three cards, two players, one private card each, and a single betting
//! round over the action alphabet {Pass, Bet}.
//!
//! ## Game rules
//!
//! - 3 cards: Jack < Queen < King
//! - 2 players, each antes 1 chip, each receives 1 card
//! - Player 0 acts first: Pass or Bet (1 chip)
//! - Two equal actions in a row end the hand in a showdown (`pp` for 2 chips,
//!   `bb`/`pbb` for 4 chips); a Pass after a Bet is a fold (`bp`, `pbp`)
//! - Higher card wins at showdown
//!
//! This module defines the pieces the solver traverses: [`Rank`],
//! [`KuhnAction`], the bit-packed [`History`], the compact [`InfoSetKey`],
//! and terminal payoff evaluation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cfr::Real;

/// Number of actions available at every decision point.
pub const NUM_ACTIONS: usize = 2;

/// Card rank. Higher is better; `Ord` follows card strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    /// The lowest card.
    Jack,
    /// The middle card.
    Queen,
    /// The highest card.
    King,
}

impl Rank {
    /// The full three-card deck in ascending order.
    pub const ALL: [Rank; 3] = [Rank::Jack, Rank::Queen, Rank::King];

    /// One-character symbol used in diagnostic output.
    pub fn symbol(self) -> char {
        match self {
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// An action in Kuhn poker.
///
/// Pass checks when no bet is pending and folds when facing a bet;
/// Bet commits one additional chip (a call when facing a bet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KuhnAction {
    /// Check or fold, depending on context.
    Pass,
    /// Bet or call, depending on context.
    Bet,
}

impl KuhnAction {
    /// Both actions, in the index order used by strategy vectors.
    pub const ALL: [KuhnAction; NUM_ACTIONS] = [KuhnAction::Pass, KuhnAction::Bet];

    /// One-character symbol used in history strings (`p` / `b`).
    pub fn symbol(self) -> char {
        match self {
            KuhnAction::Pass => 'p',
            KuhnAction::Bet => 'b',
        }
    }
}

impl fmt::Display for KuhnAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KuhnAction::Pass => write!(f, "Pass"),
            KuhnAction::Bet => write!(f, "Bet"),
        }
    }
}

/// A bounded public action history, bit-packed into two bytes.
///
/// Bit `i` of `bits` holds action `i` (0 = Pass, 1 = Bet). Kuhn poker hands
/// last at most [`History::MAX_LEN`] actions, so the packed form is always a
/// valid, allocation-free `Copy` key component. The acting player at any
/// history is `len % 2`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct History {
    bits: u8,
    len: u8,
}

impl History {
    /// Upper bound on history length in this game.
    pub const MAX_LEN: usize = 4;

    /// The empty history (root of the game tree).
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of actions taken so far.
    pub fn len(self) -> usize {
        self.len as usize
    }

    /// True at the root, before any action.
    pub fn is_empty(self) -> bool {
        self.len == 0
    }

    /// Index of the player about to act: 0 at even length, 1 at odd.
    pub fn current_player(self) -> usize {
        (self.len % 2) as usize
    }

    /// The `i`-th action taken.
    ///
    /// # Panics
    /// Panics in debug builds if `i >= len`.
    pub fn action_at(self, i: usize) -> KuhnAction {
        debug_assert!(i < self.len(), "history index {} out of range", i);
        if self.bits >> i & 1 == 1 {
            KuhnAction::Bet
        } else {
            KuhnAction::Pass
        }
    }

    /// Extend the history with one more action, returning the new history.
    pub fn push(self, action: KuhnAction) -> Self {
        debug_assert!(self.len() < Self::MAX_LEN, "history overflow");
        let bit = match action {
            KuhnAction::Pass => 0,
            KuhnAction::Bet => 1,
        };
        Self {
            bits: self.bits | bit << self.len,
            len: self.len + 1,
        }
    }

    /// Evaluate this history as a terminal state, from the perspective of
    /// the player about to act.
    ///
    /// `hero` is the private rank of the player to act here and `villain`
    /// the opponent's. Returns `None` for non-terminal histories, otherwise:
    ///
    /// - two Passes in a row (`pp`): showdown for the antes, ±1 by rank
    /// - two Bets in a row (`bb`, `pbb`): showdown for the raised pot, ±2
    /// - a Pass ending a sequence that differs from the previous action
    ///   (`bp`, `pbp`): the opponent folded; the payoff is the forfeited
    ///   ante, a literal +1 regardless of which ranks are held
    pub fn terminal_payoff<T: Real>(self, hero: Rank, villain: Rank) -> Option<T> {
        if self.len() < 2 {
            return None;
        }
        let last = self.action_at(self.len() - 1);
        let prev = self.action_at(self.len() - 2);
        if last == prev {
            let stake = if last == KuhnAction::Pass { 1.0 } else { 2.0 };
            let payoff = if hero > villain { stake } else { -stake };
            Some(T::from_f64(payoff))
        } else if last == KuhnAction::Pass {
            Some(T::one())
        } else {
            None
        }
    }
}

impl fmt::Display for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.len() {
            write!(f, "{}", self.action_at(i).symbol())?;
        }
        Ok(())
    }
}

/// Key identifying an information set: the acting player's private rank plus
/// the public action history.
///
/// The pair is `Copy` and fixed-width, so looking up a node never allocates.
/// Two game states that look identical to the acting player map to the same
/// key; the opponent's card never enters it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InfoSetKey {
    /// The acting player's private card.
    pub rank: Rank,
    /// The public action sequence so far.
    pub history: History,
}

impl InfoSetKey {
    /// Build a key from a rank and history.
    pub fn new(rank: Rank, history: History) -> Self {
        Self { rank, history }
    }
}

impl fmt::Display for InfoSetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.rank, self.history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(actions: &[KuhnAction]) -> History {
        actions.iter().fold(History::new(), |h, &a| h.push(a))
    }

    use KuhnAction::{Bet, Pass};

    #[test]
    fn history_packing_round_trips() {
        let h = history(&[Pass, Bet, Bet]);
        assert_eq!(h.len(), 3);
        assert_eq!(h.action_at(0), Pass);
        assert_eq!(h.action_at(1), Bet);
        assert_eq!(h.action_at(2), Bet);
        assert_eq!(h.to_string(), "pbb");
    }

    #[test]
    fn current_player_follows_parity() {
        assert_eq!(History::new().current_player(), 0);
        assert_eq!(history(&[Pass]).current_player(), 1);
        assert_eq!(history(&[Bet]).current_player(), 1);
        assert_eq!(history(&[Pass, Bet]).current_player(), 0);
    }

    #[test]
    fn distinct_histories_produce_distinct_keys() {
        // "pp" and "bb" have the same length; "p" and "pp" share a prefix.
        let keys = [
            InfoSetKey::new(Rank::Jack, history(&[Pass, Pass])),
            InfoSetKey::new(Rank::Jack, history(&[Bet, Bet])),
            InfoSetKey::new(Rank::Jack, history(&[Pass])),
            InfoSetKey::new(Rank::Queen, history(&[Pass])),
        ];
        for (i, a) in keys.iter().enumerate() {
            for b in &keys[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(keys[0].to_string(), "J:pp");
        assert_eq!(keys[3].to_string(), "Q:p");
    }

    #[test]
    fn showdown_after_two_passes_pays_one_by_rank() {
        let h = history(&[Pass, Pass]);
        assert_eq!(h.terminal_payoff::<f64>(Rank::King, Rank::Jack), Some(1.0));
        assert_eq!(h.terminal_payoff::<f64>(Rank::Jack, Rank::King), Some(-1.0));
    }

    #[test]
    fn showdown_after_bet_call_pays_two_by_rank() {
        for h in [history(&[Bet, Bet]), history(&[Pass, Bet, Bet])] {
            assert_eq!(h.terminal_payoff::<f64>(Rank::Queen, Rank::Jack), Some(2.0));
            assert_eq!(h.terminal_payoff::<f64>(Rank::Queen, Rank::King), Some(-2.0));
        }
    }

    #[test]
    fn fold_pays_exactly_one_regardless_of_ranks() {
        // The folder forfeits the ante, so the payoff never consults ranks:
        // even the Jack collects +1 when the opponent folds.
        for h in [history(&[Bet, Pass]), history(&[Pass, Bet, Pass])] {
            assert_eq!(h.terminal_payoff::<f64>(Rank::Jack, Rank::King), Some(1.0));
            assert_eq!(h.terminal_payoff::<f64>(Rank::King, Rank::Jack), Some(1.0));
        }
    }

    #[test]
    fn short_and_continuing_histories_are_not_terminal() {
        for h in [
            History::new(),
            history(&[Pass]),
            history(&[Bet]),
            history(&[Pass, Bet]),
        ] {
            assert_eq!(h.terminal_payoff::<f64>(Rank::Jack, Rank::King), None);
        }
    }
}
