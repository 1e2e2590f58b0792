use std::{sync::Arc, time::Instant};

use fastrand::Rng;

use crate::{
    benchmarks::Benchmark,
    core::{
        abort_signals::NopAbortSignal,
        trace::{EvaluationRecord, Trace},
        utils::{mean_absolute_error, SampleFloat},
    },
    error::Error,
    traits::{AbortSignal, Objective},
    DVector, Float,
};

/// How much an [`InstrumentedObjective`] prints to standard error while it is queried.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Print nothing.
    #[default]
    Silent,
    /// Print a line whenever a query improves on the best value seen so far.
    NewBest,
    /// Print a line for every query.
    Debug,
}

/// A benchmark function wrapped with additive Gaussian noise and full call recording.
///
/// Every query is validated against the benchmark's search space, evaluated, perturbed by
/// `noise_level` times a standard normal draw from a private seeded stream, and appended to the
/// wrapper's [`Trace`] before the noisy value is returned. The caller never sees the noise-free
/// value, so algorithms are compared on exactly what they could observe; the trace keeps both.
///
/// The noise stream depends only on the seed and the number of queries made, never on the
/// queried points, so two wrappers built with the same seed perturb their nth queries
/// identically. A draw is consumed even when `noise_level` is zero.
///
/// The running best index is updated only on strict improvement, so among equal values the
/// earliest query keeps the title.
pub struct InstrumentedObjective {
    benchmark: Benchmark,
    noise_level: Float,
    rng: Rng,
    clock: Instant,
    trace: Trace,
    best: Option<usize>,
    verbosity: Verbosity,
    abort_signal: Arc<dyn AbortSignal>,
}

impl InstrumentedObjective {
    /// Creates a wrapper around the given benchmark with its own noise stream.
    pub fn new(benchmark: &Benchmark, noise_level: Float, seed: u64) -> Self {
        Self {
            benchmark: benchmark.clone(),
            noise_level,
            rng: Rng::with_seed(seed),
            clock: Instant::now(),
            trace: Trace::default(),
            best: None,
            verbosity: Verbosity::default(),
            abort_signal: Arc::new(NopAbortSignal),
        }
    }
    /// Sets how much the wrapper prints while queried (default [`Verbosity::Silent`]).
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }
    /// Attaches an abort signal checked before every evaluation.
    pub fn with_abort_signal<A: AbortSignal + 'static>(mut self, abort_signal: A) -> Self {
        self.abort_signal = Arc::new(abort_signal);
        self
    }
    pub(crate) fn set_abort_signal(&mut self, abort_signal: Arc<dyn AbortSignal>) {
        self.abort_signal = abort_signal;
    }
    /// The wrapped benchmark definition.
    pub const fn benchmark(&self) -> &Benchmark {
        &self.benchmark
    }
    /// The standard deviation of the additive noise.
    pub const fn noise_level(&self) -> Float {
        self.noise_level
    }
    /// The records of every query made so far, in call order.
    pub const fn trace(&self) -> &Trace {
        &self.trace
    }
    /// Consumes the wrapper, returning its trace.
    pub fn into_trace(self) -> Trace {
        self.trace
    }
    /// The record of the best query so far, if any query has been made.
    pub fn best_record(&self) -> Option<&EvaluationRecord> {
        self.trace.best_record()
    }
    /// The number of queries made so far.
    pub fn n_evaluations(&self) -> usize {
        self.trace.len()
    }
    /// Re-evaluates the benchmark at its documented optimum with the noise turned off,
    /// appending one more record.
    ///
    /// The extra record closes out a trace with the value an algorithm would see if it reported
    /// the true optimum, which anchors comparisons across noise levels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Aborted`] if the attached abort signal has been tripped.
    pub fn final_evaluation(&mut self) -> Result<Float, Error> {
        let x = self.benchmark.optimal_x().clone();
        self.record(&x, 0.0)
    }

    fn seconds(&self) -> Float {
        self.clock.elapsed().as_secs_f64() as Float
    }

    fn record(&mut self, x: &DVector<Float>, noise_level: Float) -> Result<Float, Error> {
        if self.abort_signal.is_aborted() {
            return Err(Error::Aborted);
        }
        let input_time = self.seconds();
        self.benchmark.space().validate(x)?;
        let index = self.trace.len();
        let x_error = mean_absolute_error(x, self.benchmark.optimal_x());
        let y_true = self.benchmark.evaluate(x);
        // the draw is consumed even at level zero so the stream position depends only on the
        // number of queries
        let y_output = y_true + self.rng.normal(0.0, 1.0) * noise_level;
        let best = match self.best {
            Some(best) if self.trace[best].y_output <= y_output => best,
            _ => index,
        };
        let is_new_best = best == index;
        self.best = Some(best);
        self.trace.push(EvaluationRecord {
            index,
            x: x.clone(),
            input_time,
            output_time: self.seconds(),
            x_error,
            y_true,
            y_output,
            best,
        });
        if is_new_best && self.verbosity >= Verbosity::NewBest {
            eprintln!("idx: {index}, new best: {y_output}");
        } else if self.verbosity == Verbosity::Debug {
            eprintln!("idx: {index}, y: {y_output}");
        }
        Ok(y_output)
    }
}

impl Objective for InstrumentedObjective {
    fn evaluate(&mut self, x: &DVector<Float>) -> Result<Float, Error> {
        self.record(x, self.noise_level)
    }
}
