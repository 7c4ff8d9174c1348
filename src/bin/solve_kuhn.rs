//! Kuhn poker solver binary.
//!
//! Usage:
//!   cargo run --release --bin solve_kuhn -- [OPTIONS]
//!
//! Options:
//!   --iterations <N>     Training iterations (default: 1,000,000)
//!   --seed <N>           Random seed (optional)
//!   --f32                Train in single precision instead of f64
//!   --json               Emit the trained strategies as JSON to stdout
//!   --dump               Print the raw per-info-set accumulators

use std::collections::BTreeMap;
use std::env;

use indicatif::{ProgressBar, ProgressStyle};
use num_traits::ToPrimitive;

use kuhn_cfr::{History, KuhnAction, KuhnSolver, Rank, Real, SolverConfig};

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut iterations: u64 = 1_000_000;
    let mut seed: Option<u64> = None;
    let mut single_precision = false;
    let mut json = false;
    let mut dump = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--iterations" | "-i" => {
                i += 1;
                if i < args.len() {
                    iterations = args[i].parse().unwrap_or(iterations);
                }
            }
            "--seed" | "-s" => {
                i += 1;
                if i < args.len() {
                    seed = args[i].parse().ok();
                }
            }
            "--f32" => {
                single_precision = true;
            }
            "--json" => {
                json = true;
            }
            "--dump" => {
                dump = true;
            }
            "--help" | "-h" => {
                print_help();
                return;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let mut config = SolverConfig::new().with_iterations(iterations);
    if let Some(s) = seed {
        config = config.with_seed(s);
    }

    if single_precision {
        run::<f32>(config, json, dump);
    } else {
        run::<f64>(config, json, dump);
    }
}

fn run<T: Real>(config: SolverConfig, json: bool, dump: bool) {
    let iterations = config.iterations;
    let mut solver = match KuhnSolver::<T>::new(config) {
        Ok(solver) => solver,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    if !json {
        println!("=================================================");
        println!("  Kuhn Poker CFR Solver");
        println!("=================================================");
        println!();
        println!("Iterations: {}", iterations);
        if let Some(s) = solver.config().seed {
            println!("Seed: {}", s);
        }
        println!();
    }

    let progress = if json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(iterations)
    };
    progress.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} ({per_sec}, eta {eta})")
            .expect("static template is valid"),
    );

    let callback_interval = (iterations / 100).max(1);
    let game_value = solver.train_with_callback(callback_interval, |stats| {
        progress.set_position(stats.iterations);
    });
    progress.finish_and_clear();

    if json {
        print_json(&solver, game_value);
        return;
    }

    let stats = solver.stats();
    println!(
        "Trained {} iterations over {} info sets in {:.2}s ({:.0} it/s)",
        stats.iterations, stats.info_sets, stats.elapsed_seconds, stats.iterations_per_second
    );
    println!();
    println!(
        "Game value for player 0: {:.5} (equilibrium: -1/18 = {:.5})",
        game_value,
        -1.0 / 18.0
    );
    println!();

    println!("Average strategy per information set (history after ':'):");
    println!("{:<8} {:>8} {:>8}", "info set", "pass", "bet");
    for (key, strategy) in strategy_table(&solver) {
        println!("{:<8} {:>8.4} {:>8.4}", key, strategy[0], strategy[1]);
    }

    if dump {
        println!();
        println!("Raw accumulators:");
        print!("{}", solver);
    }

    // Demonstrate policy execution with the sampling helper.
    let mut rng = rand::thread_rng();
    let opening = solver.sample_action(Rank::King, History::new(), &mut rng);
    println!();
    println!(
        "Sampled opening action holding the King: {}",
        match opening {
            KuhnAction::Pass => "Pass",
            KuhnAction::Bet => "Bet",
        }
    );
}

fn strategy_table<T: Real>(solver: &KuhnSolver<T>) -> BTreeMap<String, [f64; 2]> {
    solver
        .store()
        .iter()
        .map(|(key, node)| {
            let avg = node.average_strategy();
            (
                key.to_string(),
                [
                    avg[0].to_f64().unwrap_or(f64::NAN),
                    avg[1].to_f64().unwrap_or(f64::NAN),
                ],
            )
        })
        .collect()
}

fn print_json<T: Real>(solver: &KuhnSolver<T>, game_value: T) {
    let strategies: BTreeMap<String, serde_json::Value> = strategy_table(solver)
        .into_iter()
        .map(|(key, s)| (key, serde_json::json!({ "pass": s[0], "bet": s[1] })))
        .collect();

    let report = serde_json::json!({
        "iterations": solver.iteration(),
        "info_sets": solver.num_info_sets(),
        "game_value": game_value.to_f64().unwrap_or(f64::NAN),
        "strategies": strategies,
    });

    match serde_json::to_string_pretty(&report) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Failed to serialize report: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_help() {
    println!("Kuhn poker CFR solver");
    println!();
    println!("USAGE:");
    println!("  solve_kuhn [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -i, --iterations <N>  Training iterations (default: 1,000,000)");
    println!("  -s, --seed <N>        Random seed for reproducible runs");
    println!("      --f32             Train in single precision");
    println!("      --json            Emit strategies and game value as JSON");
    println!("      --dump            Print raw per-info-set accumulators");
    println!("  -h, --help            Show this help");
}
