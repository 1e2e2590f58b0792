//! `tulana` (/ˈt̪ʊl.ə.naː/), named after the Sanskrit word for weighing one thing against another,
//! benchmarks black-box optimization algorithms against synthetic test functions under
//! controllable output noise. Every algorithm under comparison sees the same interface: a
//! function it can query at a point. Behind that interface, an
//! [`InstrumentedObjective`](`core::InstrumentedObjective`) records every call it receives, so
//! the comparison is always made on the harness's own measurements rather than on whatever an
//! algorithm reports about itself.
//!
//! <div class="warning">
//!
//! This crate is still in an early development phase, and the API is not stable. It can (and
//! likely will) be subject to breaking changes before the 1.0.0 version release (and hopefully
//! not many after that).
//!
//! </div>
//!
//! # Table of Contents
//! - [Key Features](#key-features)
//! - [Quick Start](#quick-start)
//! - [Noise and Seeding](#noise-and-seeding)
//! - [Call Budgets](#call-budgets)
//!
//! # Key Features
//! * An instrumented objective which records the query point, wall time in and out, the noisy
//!   and noise-free values, the distance to the documented optimum, and the running best index
//!   for every evaluation.
//! * A catalog of benchmark functions with documented optima, addressed by name through a
//!   [`BenchmarkRegistry`](`benchmarks::BenchmarkRegistry`).
//! * A runner that drives any number of [`Minimizer`](`traits::Minimizer`) implementations
//!   through identical experiments, isolating each algorithm's failures from the rest.
//! * Reference adapters for random search, TPE, and Gaussian-process, random-forest, and
//!   gradient-boosted-tree surrogates.
//! * Collision-free persistence of full comparison artifacts.
//! * Pressing `Ctrl-C` during a comparison (with a
//!   [`CtrlCAbortSignal`](`core::CtrlCAbortSignal`) installed) ends the sweep cleanly, keeping
//!   every record gathered so far.
//!
//! # Quick Start
//!
//! ```rust
//! use tulana::prelude::*;
//!
//! fn main() -> Result<(), Error> {
//!     let registry = BenchmarkRegistry::standard();
//!     let settings = ExperimentSettings::new("branin", 0.01, 0, 10);
//!     let mut runner = OptimizationRunner::new(&registry, settings)?;
//!     runner.register("random", RandomSearch::default(), OptionsTemplate::new(1));
//!     let comparison = runner.run();
//!     // the harness's own trace, not the algorithm's self-report
//!     assert_eq!(comparison.runs[0].trace.len(), 10);
//!     Ok(())
//! }
//! ```
//!
//! # Noise and Seeding
//!
//! Each [`InstrumentedObjective`](`core::InstrumentedObjective`) owns a private generator
//! seeded at construction. The Gaussian
//! perturbation is drawn on every call, even when the noise level is zero, so two objectives
//! built with the same seed replay bit-identical value sequences regardless of the noise level
//! they were given. The noise-free value is kept alongside the noisy one in every
//! [`EvaluationRecord`](`core::EvaluationRecord`).
//!
//! # Call Budgets
//!
//! Algorithms burn through evaluations at very different rates, so a comparison declares a
//! per-algorithm budget multiplier at registration time via
//! [`OptionsTemplate`](`traits::OptionsTemplate`): an experiment with a call budget of 10 might
//! allow a Gaussian-process adapter 10 evaluations and a random search 10,000. The reference
//! adapters carry the multipliers used by the comparison experiments as associated constants
//! (e.g. [`RandomSearch::BUDGET_MULTIPLIER`](`algorithms::RandomSearch::BUDGET_MULTIPLIER`)).
#![warn(
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::doc_markdown,
    clippy::doc_link_with_quotes,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::perf,
    clippy::style,
    missing_docs
)]

/// Module containing the optimization algorithm adapters under comparison.
pub mod algorithms;
/// Module containing the benchmark function catalog.
pub mod benchmarks;
/// Module containing the instrumented objective, runner, trace, and store.
pub mod core;
/// Module containing the crate's error type.
pub mod error;
/// Module containing the traits connecting benchmarks, objectives, and algorithms.
pub mod traits;

pub use error::Error;

/// Prelude module containing everything someone should need to use this crate for
/// non-development purposes.
pub mod prelude {
    pub use crate::algorithms::{Forest, GaussianProcess, Gbrt, RandomSearch, Tpe};
    pub use crate::benchmarks::{Benchmark, BenchmarkRegistry};
    pub use crate::core::{
        AtomicAbortSignal, Comparison, CtrlCAbortSignal, EvaluationRecord, ExperimentSettings,
        InstrumentedObjective, NopAbortSignal, OptimizationRunner, ResultStore, RunOutcome,
        RunResult, SearchSpace, Trace, Verbosity,
    };
    pub use crate::error::Error;
    pub use crate::traits::{
        AbortSignal, CostFunction, MinimizeOptions, MinimizeReport, Minimizer, Objective,
        OptionsTemplate, ProgressObserver, RunObserver,
    };
    pub use crate::{DVector, Float, PI};
}

/// A type alias for the floating-point type used throughout the crate. This defaults to `f64`,
/// but the `f32` feature can be enabled to use `f32` instead.
#[cfg(not(feature = "f32"))]
pub type Float = f64;

/// A type alias for the floating-point type used throughout the crate. This defaults to `f64`,
/// but the `f32` feature can be enabled to use `f32` instead.
#[cfg(feature = "f32")]
pub type Float = f32;

/// The mathematical constant $`\pi`$ at the precision of [`Float`].
#[cfg(not(feature = "f32"))]
pub const PI: Float = std::f64::consts::PI;

/// The mathematical constant $`\pi`$ at the precision of [`Float`].
#[cfg(feature = "f32")]
pub const PI: Float = std::f32::consts::PI;

pub use nalgebra::{DMatrix, DVector};
