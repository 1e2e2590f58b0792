use fastrand::Rng;

use crate::{
    core::SearchSpace,
    error::Error,
    traits::{MinimizeOptions, MinimizeReport, Minimizer, Objective},
    DVector, Float,
};

/// Pure random search: every query is an independent uniform draw from the search space.
///
/// The baseline every surrogate-driven adapter has to beat. It makes up in budget what it
/// lacks in strategy, so comparisons typically hand it the largest multiplier.
#[derive(Default, Copy, Clone, Debug)]
pub struct RandomSearch;

impl RandomSearch {
    /// The call budget multiplier the comparison experiments give this adapter.
    pub const BUDGET_MULTIPLIER: usize = 1000;
}

impl Minimizer for RandomSearch {
    fn minimize(
        &mut self,
        objective: &mut dyn Objective,
        space: &SearchSpace,
        options: &MinimizeOptions,
    ) -> Result<MinimizeReport, Error> {
        let mut rng = Rng::with_seed(options.seed);
        let mut best: Option<(DVector<Float>, Float)> = None;
        for _ in 0..options.max_calls {
            let x = space.sample(&mut rng);
            let y = objective.evaluate(&x)?;
            match &best {
                Some((_, incumbent)) if *incumbent <= y => {}
                _ => best = Some((x, y)),
            }
        }
        let (x, fx) = best.ok_or_else(|| Error::AlgorithmFailure {
            algorithm: "random search".to_string(),
            message: "no evaluations were budgeted".to_string(),
        })?;
        Ok(MinimizeReport {
            x,
            fx,
            n_calls: options.max_calls,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{benchmarks::Branin, core::InstrumentedObjective};

    #[test]
    fn test_random_search_finds_the_branin_valley() {
        let benchmark = Branin::benchmark();
        let mut objective = InstrumentedObjective::new(&benchmark, 0.0, 0);
        let options = MinimizeOptions {
            max_calls: 200,
            seed: 0,
        };
        let report = RandomSearch
            .minimize(&mut objective, benchmark.space(), &options)
            .unwrap();
        assert_eq!(report.n_calls, 200);
        assert_eq!(objective.n_evaluations(), 200);
        assert!(report.fx < 20.0);
        assert_eq!(report.fx, objective.best_record().unwrap().y_output);
    }

    #[test]
    fn test_random_search_is_deterministic() {
        let benchmark = Branin::benchmark();
        let options = MinimizeOptions {
            max_calls: 50,
            seed: 11,
        };
        let mut first = InstrumentedObjective::new(&benchmark, 0.1, 3);
        let a = RandomSearch
            .minimize(&mut first, benchmark.space(), &options)
            .unwrap();
        let mut second = InstrumentedObjective::new(&benchmark, 0.1, 3);
        let b = RandomSearch
            .minimize(&mut second, benchmark.space(), &options)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_search_rejects_an_empty_budget() {
        let benchmark = Branin::benchmark();
        let mut objective = InstrumentedObjective::new(&benchmark, 0.0, 0);
        let options = MinimizeOptions {
            max_calls: 0,
            seed: 0,
        };
        assert!(matches!(
            RandomSearch.minimize(&mut objective, benchmark.space(), &options),
            Err(Error::AlgorithmFailure { .. })
        ));
    }
}
