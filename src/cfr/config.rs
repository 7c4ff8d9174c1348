//! Configuration and training statistics for the solver.

use serde::{Deserialize, Serialize};

use crate::game::Rank;

/// Configuration for a [`KuhnSolver`](crate::cfr::KuhnSolver).
///
/// # Example
/// ```
/// use kuhn_cfr::SolverConfig;
///
/// let config = SolverConfig::new().with_iterations(100_000).with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Number of self-play iterations [`train`](crate::cfr::KuhnSolver::train)
    /// runs. Zero is allowed and makes training a no-op that reports a game
    /// value of 0.
    pub iterations: u64,

    /// Random seed for the deck shuffle.
    ///
    /// `Some` makes training reproducible; `None` seeds from entropy.
    pub seed: Option<u64>,

    /// The deck to deal from. Must contain three distinct ranks.
    ///
    /// Exposed so tests can fix unusual deals; the default full deck is
    /// what the game means.
    pub deck: [Rank; 3],
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            iterations: 100_000,
            seed: None,
            deck: Rank::ALL,
        }
    }
}

impl SolverConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the iteration count.
    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }

    /// Builder method: set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder method: set the deck.
    pub fn with_deck(mut self, deck: [Rank; 3]) -> Self {
        self.deck = deck;
        self
    }

    /// Validate the configuration.
    ///
    /// The only rejectable input is a deck whose three cards are not
    /// distinct; that is a construction-time error, never a training-time
    /// one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, &rank) in self.deck.iter().enumerate() {
            if self.deck[i + 1..].contains(&rank) {
                return Err(ConfigError::DuplicateRank(rank));
            }
        }
        Ok(())
    }
}

/// Errors from validating a [`SolverConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The configured deck repeats a rank.
    DuplicateRank(Rank),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::DuplicateRank(rank) => {
                write!(f, "deck contains rank {} more than once", rank)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Statistics tracked across a training run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainStats {
    /// Total iterations completed over the solver's lifetime.
    pub iterations: u64,

    /// Number of unique information sets discovered.
    pub info_sets: usize,

    /// Wall-clock time of the last training run, in seconds.
    pub elapsed_seconds: f64,

    /// Iterations per second of the last training run.
    pub iterations_per_second: f64,

    /// Average utility for player 0 reported by the last training run.
    pub game_value: f64,
}

impl TrainStats {
    /// Create empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the iteration rate from elapsed time.
    pub fn update_rate(&mut self) {
        if self.elapsed_seconds > 0.0 {
            self.iterations_per_second = self.iterations as f64 / self.elapsed_seconds;
        }
    }
}
