//! # Kuhn CFR
//!
//! A Counterfactual Regret Minimization (CFR) solver for Kuhn poker, the
//! minimal imperfect-information card game: three ranks, two players, one
//! private card each, and the two-action alphabet {Pass, Bet}.
//!
//! ## Features
//!
//! - **Vanilla CFR core**: recursive self-play traversal with per-node
//!   regret matching and strategy averaging
//! - **Compact information-set keys**: bit-packed rank + history, no
//!   per-visit allocation
//! - **Selectable precision**: the whole solver is generic over `f32`/`f64`
//! - **Deterministic runs**: seedable shuffling and injectable sampling RNG
//!
//! ## Quick start
//!
//! ```
//! use kuhn_cfr::{History, KuhnSolver, Rank, SolverConfig};
//!
//! // 1. Configure and construct a solver
//! let config = SolverConfig::new().with_iterations(100_000).with_seed(42);
//! let mut solver = KuhnSolver::<f64>::new(config)?;
//!
//! // 2. Train; the returned value estimates player 0's game value (-1/18)
//! let game_value = solver.train();
//! assert!((game_value + 1.0 / 18.0).abs() < 0.05);
//!
//! // 3. Query trained policies per information set
//! let jack_root = solver.average_strategy(Rank::Jack, History::new());
//! println!("Jack at root: pass={:.3} bet={:.3}", jack_root[0], jack_root[1]);
//! # Ok::<(), kuhn_cfr::ConfigError>(())
//! ```
//!
//! ## Modules
//!
//! - [`cfr`]: the solver — node bookkeeping, information-set store,
//!   training loop
//! - [`game`]: Kuhn poker primitives — ranks, actions, histories, terminal
//!   payoffs

#![warn(missing_docs)]

/// CFR (Counterfactual Regret Minimization) solver module.
///
/// The core module containing node bookkeeping, storage, and the trainer.
pub mod cfr;

/// Kuhn poker game definition.
///
/// Ranks, actions, bit-packed histories, information-set keys, and terminal
/// payoff evaluation.
pub mod game;

// Re-export commonly used types at crate root for convenience
pub use cfr::{ConfigError, KuhnSolver, Node, NodeStore, Real, SolverConfig, TrainStats};
pub use game::{History, InfoSetKey, KuhnAction, Rank, NUM_ACTIONS};
