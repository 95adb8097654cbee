//! Weighted three-objective problem solved with the herd-immunity strategy,
//! followed by trajectories of a few agents in one dimension.
//!
//! Run with `cargo run --release --example multi_objective`.

use metasearch::{
    compute::{Bounds, Optimizer},
    schema::{HerdImmunityConfig, OptimizerConfig, StrategyConfig},
};

/// Three objectives, folded into one target by the configured weights.
fn objectives(x: &[f64]) -> [f64; 3] {
    let n = x.len() as f64;
    let sum_sq: f64 = x.iter().map(|v| v * v).sum();
    let mean: f64 = x.iter().sum::<f64>() / n;

    let f1 = (sum_sq - mean) / n;
    let f2 = x.iter().map(|v| v.abs().sqrt()).sum();
    let f3 = x.iter().map(|v| sum_sq / n - v).sum();
    [f1, f2, f3]
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let lower = vec![-10.0, -5.0, -15.0, -20.0, -10.0, -15.0, -10.0, -30.0];
    let upper = vec![10.0, 5.0, 15.0, 20.0, 50.0, 30.0, 100.0, 85.0];
    let bounds = Bounds::new(lower, upper)?;

    let config = OptimizerConfig {
        epoch: 100,
        pop_size: 50,
        weights: Some(vec![0.2, 0.5, 0.3]),
        random_seed: Some(2021),
        strategy: StrategyConfig::HerdImmunity(HerdImmunityConfig::default()),
        ..Default::default()
    };

    let mut optimizer = Optimizer::new(config, bounds, objectives)?;
    let result = optimizer.run()?;

    println!("Best target: {:.6}", result.best.target());
    println!("Best objectives: {:?}", result.best.fitness.objectives);
    println!("Best position: {:?}", result.best.position);
    println!();

    // Third coordinate of agents 1, 3 and 5 over the run.
    let dim = 2;
    let agents = [0, 2, 4];
    let trajectories = result.history.trajectories(&agents, dim);
    println!("Trajectories of x{} (every 10th epoch):", dim + 1);
    for (agent, trajectory) in agents.iter().zip(&trajectories) {
        let samples: Vec<String> = trajectory
            .iter()
            .step_by(10)
            .map(|x| format!("{:8.3}", x))
            .collect();
        println!("  Agent {}: {}", agent + 1, samples.join(" "));
    }

    Ok(())
}
