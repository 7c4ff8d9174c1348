//! Per-information-set regret and strategy accumulators.

use std::fmt;
use std::ops::AddAssign;

use num_traits::Float;
use rand::Rng;

use crate::game::{KuhnAction, NUM_ACTIONS};

/// Floating-point precision of a solver instance.
///
/// The whole solver is generic over this trait so the same code runs in
/// single or double precision. `f64` is the recommended default: regret and
/// strategy sums grow monotonically in magnitude, and `f32` loses precision
/// once iteration counts go well past 10^6.
pub trait Real: Float + AddAssign + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Narrowing conversion from `f64` (exact for `f64`, rounds for `f32`).
    fn from_f64(x: f64) -> Self;
}

impl Real for f32 {
    #[inline]
    fn from_f64(x: f64) -> Self {
        x as f32
    }
}

impl Real for f64 {
    #[inline]
    fn from_f64(x: f64) -> Self {
        x
    }
}

/// The uniform distribution over the two actions.
pub(crate) fn uniform<T: Real>() -> [T; NUM_ACTIONS] {
    [T::from_f64(1.0 / NUM_ACTIONS as f64); NUM_ACTIONS]
}

/// Normalize a non-negative vector, falling back to uniform when it sums
/// to zero. The fallback must not bias toward either action.
fn normalized_or_uniform<T: Real>(values: [T; NUM_ACTIONS]) -> [T; NUM_ACTIONS] {
    let mut total = T::zero();
    for &v in &values {
        total += v;
    }
    if total > T::zero() {
        values.map(|v| v / total)
    } else {
        uniform()
    }
}

/// State attached to one information set.
///
/// A node carries three parallel per-action accumulators:
///
/// - `regret_sum`: cumulative counterfactual regret (signed, may go negative)
/// - `strategy`: the distribution derived for the current visit via regret
///   matching, transient between visits
/// - `strategy_sum`: reach-weighted sum of every `strategy` ever produced;
///   its normalization is the average strategy, the quantity that actually
///   converges toward equilibrium
///
/// Nodes are created lazily on first visit and live for the life of the
/// solver instance.
#[derive(Debug, Clone)]
pub struct Node<T> {
    regret_sum: [T; NUM_ACTIONS],
    strategy: [T; NUM_ACTIONS],
    strategy_sum: [T; NUM_ACTIONS],
}

impl<T: Real> Default for Node<T> {
    fn default() -> Self {
        Self {
            regret_sum: [T::zero(); NUM_ACTIONS],
            strategy: [T::zero(); NUM_ACTIONS],
            strategy_sum: [T::zero(); NUM_ACTIONS],
        }
    }
}

impl<T: Real> Node<T> {
    /// Create a fresh node with all accumulators at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the current strategy by regret matching and accumulate it
    /// into the strategy sum.
    ///
    /// The strategy is proportional to positive regret, uniform when no
    /// action has positive regret. `reach` must be the *acting player's own*
    /// reach probability of the current history, never the opponent's; the
    /// average strategy is only correct under that weighting.
    ///
    /// Returns the recomputed strategy, which is non-negative and sums to 1.
    pub fn update_strategy(&mut self, reach: T) -> [T; NUM_ACTIONS] {
        self.strategy = normalized_or_uniform(self.regret_sum.map(|r| r.max(T::zero())));
        for (sum, &p) in self.strategy_sum.iter_mut().zip(&self.strategy) {
            *sum += p * reach;
        }
        self.strategy
    }

    /// Fold one traversal's action utilities into the regret sums.
    ///
    /// `utilities[a]` is the counterfactual utility of action `a` and
    /// `node_utility` the strategy-weighted utility of this node;
    /// `opponent_reach` is the opponent's reach probability, which weights
    /// how much this visit counts.
    pub fn accumulate_regret(
        &mut self,
        utilities: [T; NUM_ACTIONS],
        node_utility: T,
        opponent_reach: T,
    ) {
        for (regret, &u) in self.regret_sum.iter_mut().zip(&utilities) {
            *regret += opponent_reach * (u - node_utility);
        }
    }

    /// The time-averaged strategy: normalized strategy sums, uniform if
    /// this node has never been visited with positive reach.
    ///
    /// This, not the latest [`current strategy`](Node::current_strategy),
    /// is the trained policy.
    pub fn average_strategy(&self) -> [T; NUM_ACTIONS] {
        normalized_or_uniform(self.strategy_sum)
    }

    /// Sample an action from the average strategy.
    ///
    /// Takes the random source as a parameter so callers (and tests) control
    /// determinism. Used for executing or inspecting a trained policy, never
    /// during training.
    pub fn sample_average<R: Rng + ?Sized>(&self, rng: &mut R) -> KuhnAction {
        let average = self.average_strategy();
        let r = T::from_f64(rng.gen::<f64>());
        let mut cumulative = T::zero();
        for (i, &p) in average.iter().enumerate() {
            cumulative += p;
            if r < cumulative {
                return KuhnAction::ALL[i];
            }
        }
        // Floating-point slack: the cumulative sum can fall a hair short of 1.
        KuhnAction::ALL[NUM_ACTIONS - 1]
    }

    /// Accumulated signed regret per action.
    pub fn regret_sum(&self) -> [T; NUM_ACTIONS] {
        self.regret_sum
    }

    /// Accumulated reach-weighted strategy per action.
    pub fn strategy_sum(&self) -> [T; NUM_ACTIONS] {
        self.strategy_sum
    }

    /// The strategy computed by the most recent visit.
    pub fn current_strategy(&self) -> [T; NUM_ACTIONS] {
        self.strategy
    }
}
