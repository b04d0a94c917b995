//! Kuhn poker solver binary.
//!
//! Usage:
//!   cargo run --release --bin solve_kuhn -- [OPTIONS]
//!
//! Options:
//!   --iterations <N>     Training iterations (default: 10000)
//!   --exploit-every <N>  Record exploitability every N iterations
//!   --output <FILE>      Strategy output file (default: strategy.json)

use std::env;
use std::fs;
use std::process;

use indicatif::{ProgressBar, ProgressStyle};

use tree_cfr::cfr::{best_response_value, CfrConfig, CfrSolver, StrategyTable};
use tree_cfr::games::kuhn::KuhnPoker;

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut iterations: u64 = 10_000;
    let mut exploit_every: Option<u64> = None;
    let mut output_file = "strategy.json".to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--iterations" | "-i" => {
                i += 1;
                if i < args.len() {
                    iterations = args[i].parse().unwrap_or(10_000);
                }
            }
            "--exploit-every" | "-e" => {
                i += 1;
                if i < args.len() {
                    exploit_every = args[i].parse().ok();
                }
            }
            "--output" | "-o" => {
                i += 1;
                if i < args.len() {
                    output_file = args[i].clone();
                }
            }
            "--help" | "-h" => {
                print_help();
                return;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    println!("=================================================");
    println!("  Kuhn Poker CFR Solver");
    println!("=================================================");
    println!();
    println!("Iterations: {}", iterations);
    if let Some(interval) = exploit_every {
        println!("Exploitability interval: {}", interval);
    }
    println!("Output: {}", output_file);
    println!();

    let mut config = CfrConfig::default();
    if let Some(interval) = exploit_every {
        config = config.with_exploitability_interval(interval);
    }
    let mut solver = match CfrSolver::new(KuhnPoker::game(), config) {
        Ok(solver) => solver,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            process::exit(1);
        }
    };

    let bar = ProgressBar::new(iterations);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})",
        )
        .unwrap()
        .progress_chars("#>-"),
    );

    let callback_interval = (iterations / 100).max(1);
    solver.train_with_callback(iterations, callback_interval, |stats| {
        bar.set_position(stats.iterations);
    });
    bar.finish_and_clear();

    let stats = solver.stats();
    println!("Training complete!");
    println!("Total time: {:.2}s", stats.elapsed_seconds);
    println!("Speed: {:.0} iterations/second", stats.iterations_per_second);
    println!("Info sets: {}", stats.info_sets);
    println!();

    let exploitability = solver.exploitability();
    let br0 = best_response_value(solver.game(), solver.average_profile(), 0)
        .expect("average profile covers the game");
    let br1 = best_response_value(solver.game(), solver.average_profile(), 1)
        .expect("average profile covers the game");
    println!("Exploitability: {:.6}", exploitability);
    println!("Best response vs player 1: {:.6}", br0);
    println!("Best response vs player 0: {:.6}", br1);
    println!("(Kuhn game value is -1/18 = -0.055556)");
    println!();

    if !stats.exploitability_history.is_empty() {
        println!("=== Exploitability History ===");
        for point in &stats.exploitability_history {
            println!("  iteration {:>8}: {:.6}", point.iteration, point.exploitability);
        }
        println!();
    }

    println!("Exporting strategy to {}...", output_file);
    let table = StrategyTable::from_profile(solver.game(), solver.average_profile());
    let json = match serde_json::to_string_pretty(&table) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error serializing strategy: {}", e);
            process::exit(1);
        }
    };
    if let Err(e) = fs::write(&output_file, json) {
        eprintln!("Error writing {}: {}", output_file, e);
        process::exit(1);
    }
    println!("Strategy saved successfully!");
    println!();

    println!("=== Average Strategy (card -> history -> action) ===");
    println!();
    for (card, by_history) in &table.strategies {
        let name = match card.as_str() {
            "0" => "Jack",
            "1" => "Queen",
            "2" => "King",
            other => other,
        };
        println!("{}:", name);
        for (history, by_action) in by_history {
            let line: Vec<String> = by_action
                .iter()
                .map(|(action, prob)| format!("{}: {:.1}%", action, prob * 100.0))
                .collect();
            println!("  {:>10}  {}", history, line.join(", "));
        }
        println!();
    }

    println!("Done!");
}

fn print_help() {
    println!("Kuhn Poker CFR Solver");
    println!();
    println!("Usage: solve_kuhn [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -i, --iterations <N>     Training iterations (default: 10000)");
    println!("  -e, --exploit-every <N>  Record exploitability every N iterations");
    println!("  -o, --output <FILE>      Strategy output file (default: strategy.json)");
    println!("  -h, --help               Show this help");
    println!();
    println!("Examples:");
    println!("  # Solve with defaults");
    println!("  solve_kuhn");
    println!();
    println!("  # Longer run with an exploitability trace");
    println!("  solve_kuhn --iterations 100000 --exploit-every 10000");
}
