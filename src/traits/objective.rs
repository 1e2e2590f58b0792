use crate::{error::Error, DVector, Float};

/// The single capability an algorithm adapter receives: query a value at a point.
///
/// Implementations may record, perturb, or otherwise instrument the call, which is why
/// evaluation takes `&mut self` and can fail where [`CostFunction`](`super::CostFunction`)
/// cannot.
pub trait Objective {
    /// The evaluation of the objective at a point `x`.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if `x` is malformed for the underlying search space or if an abort
    /// was requested.
    fn evaluate(&mut self, x: &DVector<Float>) -> Result<Float, Error>;
}
