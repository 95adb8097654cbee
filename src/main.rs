//! Metasearch CLI - Run a benchmark optimization from JSON configuration.

use std::fs;
use std::path::PathBuf;

use metasearch::{
    compute::{Bounds, Optimizer},
    schema::{RunConfig, Solution},
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <run.json> [epochs]", args[0]);
        eprintln!();
        eprintln!("Optimize a benchmark function from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  run.json  Path to run configuration file");
        eprintln!("  epochs    Override the configured epoch count");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);

    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let mut config: RunConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    if let Some(epochs) = args.get(2).and_then(|s| s.parse().ok()) {
        config.optimizer.epoch = epochs;
    }

    let (lower, upper) = config.problem.resolved_bounds();
    let bounds = Bounds::new(lower, upper).unwrap_or_else(|e| {
        eprintln!("Error in problem bounds: {}", e);
        std::process::exit(1);
    });

    println!("Metasearch");
    println!("==========");
    println!(
        "Problem: {:?} ({} dims)",
        config.problem.function,
        bounds.n_dims()
    );
    println!("Strategy: {}", config.optimizer.strategy.name());
    println!(
        "Population: {}, epochs: {}, mode: {:?}",
        config.optimizer.pop_size, config.optimizer.epoch, config.optimizer.mode
    );
    println!();

    let objective = config.problem.function.as_fn();
    let mut optimizer = Optimizer::new(config.optimizer, bounds, objective).unwrap_or_else(|e| {
        eprintln!("Error creating optimizer: {}", e);
        std::process::exit(1);
    });

    let total = optimizer.config().epoch;
    let report_every = (total / 10).max(1);
    let result = optimizer
        .run_with_callback(|p| {
            if p.epoch % report_every == 0 {
                println!(
                    "  Epoch {}/{}: best={:.6e}, current={:.6e}, avg={:.6e}",
                    p.epoch, p.total_epochs, p.best_target, p.current_best, p.avg_target
                );
            }
        })
        .unwrap_or_else(|e| {
            eprintln!("Optimization failed: {}", e);
            std::process::exit(1);
        });

    println!();
    println!("Stopped: {:?}", result.stats.stop_reason);
    println!("Best target: {:.6e}", result.best.target());
    println!("Best position: {}", format_position(&result.best));
    println!(
        "Time: {:.2}s ({} epochs, {} evaluations)",
        result.stats.elapsed_seconds, result.stats.epochs, result.stats.evaluations
    );
    println!();

    match serde_json::to_string_pretty(&result.stats) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing stats: {}", e),
    }
}

fn format_position(solution: &Solution) -> String {
    let coords: Vec<String> = solution
        .position
        .iter()
        .map(|x| format!("{:.6}", x))
        .collect();
    format!("[{}]", coords.join(", "))
}

fn print_example_config() {
    let config = RunConfig::default();

    println!("Example configuration (run.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing example: {}", e),
    }
}
