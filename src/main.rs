use tulana::prelude::*;

fn main() -> Result<(), Error> {
    let registry = BenchmarkRegistry::standard();
    let store = ResultStore::new("data")?;
    let ctrl_c = CtrlCAbortSignal::new();
    'sweep: for benchmark in ["hart6", "branin"] {
        for noise_level in [0.0, 0.01, 0.1] {
            for seed in 0..5 {
                let settings = ExperimentSettings::new(benchmark, noise_level, seed, 10);
                println!("=== {} ===", settings.file_stem());
                let mut runner = OptimizationRunner::new(&registry, settings)?;
                runner
                    .register(
                        "gp",
                        GaussianProcess::default(),
                        OptionsTemplate::new(GaussianProcess::BUDGET_MULTIPLIER),
                    )
                    .register("tpe", Tpe::default(), OptionsTemplate::new(Tpe::BUDGET_MULTIPLIER))
                    .register("gbrt", Gbrt::default(), OptionsTemplate::new(Gbrt::BUDGET_MULTIPLIER))
                    .register(
                        "forest",
                        Forest::default(),
                        OptionsTemplate::new(Forest::BUDGET_MULTIPLIER),
                    )
                    .register(
                        "random",
                        RandomSearch::default(),
                        OptionsTemplate::new(RandomSearch::BUDGET_MULTIPLIER),
                    )
                    .add_observer(ProgressObserver::build())
                    .with_abort_signal(CtrlCAbortSignal::new());
                let comparison = runner.run();
                let path = store.save(&comparison)?;
                println!("saved {}", path.display());
                if ctrl_c.is_aborted() {
                    break 'sweep;
                }
            }
        }
    }
    Ok(())
}
