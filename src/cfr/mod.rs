//! Counterfactual Regret Minimization for Kuhn poker.
//!
//! CFR is an iterative self-play algorithm that converges to a Nash
//! equilibrium by:
//!
//! 1. Computing counterfactual regret for each action at each information set
//! 2. Deriving the next strategy from accumulated positive regret
//!    (regret matching)
//! 3. Averaging strategies across iterations; the *average* strategy is the
//!    quantity that provably converges
//!
//! This is the classic vanilla formulation over the full dealt tree, with
//! one deliberate deviation: actions the current strategy assigns zero
//! probability are not recursed into, and their counterfactual utility is
//! taken as zero for that iteration (see [`KuhnSolver`]).
//!
//! # Usage
//!
//! ```
//! use kuhn_cfr::{KuhnSolver, Rank, History, SolverConfig};
//!
//! let config = SolverConfig::new().with_iterations(10_000).with_seed(42);
//! let mut solver = KuhnSolver::<f64>::new(config)?;
//!
//! let game_value = solver.train();
//! let root_policy = solver.average_strategy(Rank::King, History::new());
//! assert!(root_policy[1] > 0.5); // the King mostly bets
//! # Ok::<(), kuhn_cfr::ConfigError>(())
//! ```
//!
//! # References
//!
//! - Zinkevich, M., et al. "Regret Minimization in Games with Incomplete
//!   Information" (2007)
//! - Neller, T., Lanctot, M. "An Introduction to Counterfactual Regret
//!   Minimization" (2013)

pub mod config;
pub mod node;
pub mod solver;
pub mod store;

// Re-export main types for convenient access
pub use config::{ConfigError, SolverConfig, TrainStats};
pub use node::{Node, Real};
pub use solver::KuhnSolver;
pub use store::NodeStore;
