/// Module containing the [`AbortSignal`] trait.
pub mod abort_signal;
/// Module containing the [`CostFunction`] trait.
pub mod cost_function;
/// Module containing the [`Minimizer`] trait and its option types.
pub mod minimizer;
/// Module containing the [`Objective`] trait.
pub mod objective;
/// Module containing the [`RunObserver`] trait and its implementations.
pub mod observer;

pub use abort_signal::AbortSignal;
pub use cost_function::CostFunction;
pub use minimizer::{MinimizeOptions, MinimizeReport, Minimizer, OptionsTemplate};
pub use objective::Objective;
pub use observer::{ProgressObserver, RunObserver};
