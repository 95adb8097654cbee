//! End-to-end runs of both strategies on the sphere function.

use metasearch::{
    compute::{Bounds, Optimizer, sphere},
    schema::{
        AntColonyConfig, EvaluationMode, HerdImmunityConfig, HerdImmunityVariant,
        OptimizerConfig, Sense, StopReason, StrategyConfig,
    },
};

fn run(strategy: StrategyConfig, epoch: usize, seed: u64) -> metasearch::OptimizationResult {
    let config = OptimizerConfig {
        epoch,
        pop_size: 30,
        random_seed: Some(seed),
        strategy,
        ..Default::default()
    };
    let bounds = Bounds::uniform(5, -10.0, 10.0).unwrap();
    Optimizer::new(config, bounds, sphere).unwrap().run().unwrap()
}

#[test]
fn ant_colony_converges_on_sphere() {
    for seed in 0..5 {
        let strategy = StrategyConfig::AntColony(AntColonyConfig::default());
        let result = run(strategy, 50, seed);

        assert_eq!(result.stats.stop_reason, StopReason::MaxEpochs);
        assert!(
            result.best.target() < 1.0,
            "seed {}: best target {} did not converge",
            seed,
            result.best.target()
        );
    }
}

#[test]
fn herd_immunity_converges_on_sphere() {
    for seed in 0..5 {
        let strategy = StrategyConfig::HerdImmunity(HerdImmunityConfig {
            brr: 0.3,
            ..Default::default()
        });
        let result = run(strategy, 50, seed);

        assert_eq!(result.stats.stop_reason, StopReason::MaxEpochs);
        assert!(
            result.best.target() < 1.0,
            "seed {}: best target {} did not converge",
            seed,
            result.best.target()
        );
        assert!(result.best.position.iter().all(|x| (-10.0..=10.0).contains(x)));
    }
}

#[test]
fn global_best_never_worsens() {
    let strategies = [
        StrategyConfig::HerdImmunity(HerdImmunityConfig::default()),
        StrategyConfig::HerdImmunity(HerdImmunityConfig {
            variant: HerdImmunityVariant::Original,
            ..Default::default()
        }),
        StrategyConfig::AntColony(AntColonyConfig::default()),
    ];

    for strategy in strategies {
        for seed in [1, 2, 3] {
            let result = run(strategy.clone(), 40, seed);
            for pair in result.curves.global_best.windows(2) {
                assert!(pair[1] <= pair[0], "{} seed {}", strategy.name(), seed);
            }
            // Every recorded population member is at least as bad as the record.
            for snapshot in result.history.snapshots() {
                for s in &snapshot.solutions {
                    assert!(Sense::Min.compare(&result.best, s));
                }
            }
        }
    }
}

#[test]
fn seeded_runs_are_reproducible() {
    let strategy = StrategyConfig::HerdImmunity(HerdImmunityConfig::default());
    let a = run(strategy.clone(), 25, 9);
    let b = run(strategy, 25, 9);
    assert_eq!(a.best, b.best);
    assert_eq!(a.curves.average, b.curves.average);
}

#[test]
fn thread_mode_matches_sequential() {
    let run_mode = |mode: EvaluationMode| {
        let config = OptimizerConfig {
            epoch: 15,
            pop_size: 20,
            mode,
            workers: Some(4),
            random_seed: Some(5),
            ..Default::default()
        };
        let bounds = Bounds::uniform(4, -5.0, 5.0).unwrap();
        Optimizer::new(config, bounds, sphere).unwrap().run().unwrap()
    };

    let sequential = run_mode(EvaluationMode::Sequential);
    let threaded = run_mode(EvaluationMode::Thread);
    assert_eq!(sequential.best, threaded.best);
    assert_eq!(sequential.curves.global_best, threaded.curves.global_best);
}
