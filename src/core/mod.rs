/// Module containing ready-made abort signals.
pub mod abort_signals;
/// Module containing experiment settings and collected results.
pub mod comparison;
/// Module containing the noisy, call-recording objective wrapper.
pub mod objective;
/// Module containing the runner that drives algorithms through identical experiments.
pub mod runner;
/// Module containing search space bounds and distributions.
pub mod space;
/// Module containing pickle persistence for comparisons.
pub mod store;
/// Module containing per-evaluation records and traces.
pub mod trace;
/// Module containing random sampling helpers and warning toggles.
pub mod utils;

pub use abort_signals::{AtomicAbortSignal, CtrlCAbortSignal, NopAbortSignal};
pub use comparison::{Comparison, ExperimentSettings, RunOutcome, RunResult};
pub use objective::{InstrumentedObjective, Verbosity};
pub use runner::OptimizationRunner;
pub use space::{Bound, Bounds, Distribution, SearchSpace};
pub use store::ResultStore;
pub use trace::{EvaluationRecord, Trace};
pub use utils::{disable_warnings, enable_warnings, maybe_warn, should_warn, SampleFloat};
