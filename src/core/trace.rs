use crate::{DVector, Float};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Everything measured about one call to an
/// [`InstrumentedObjective`](`crate::core::InstrumentedObjective`).
///
/// Field names follow the keys of the persisted artifact, so readers of older result files
/// keep working.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EvaluationRecord {
    /// Zero-based position of this evaluation in the call sequence.
    pub index: usize,
    /// The queried point.
    pub x: DVector<Float>,
    /// Seconds on the objective's clock when the query arrived.
    pub input_time: Float,
    /// Seconds on the objective's clock when the value was returned.
    pub output_time: Float,
    /// Mean absolute distance from `x` to the benchmark's documented optimum.
    pub x_error: Float,
    /// The noise-free value of the benchmark function at `x`.
    pub y_true: Float,
    /// The noisy value handed back to the caller.
    pub y_output: Float,
    /// Index of the best record (lowest `y_output`, earliest on ties) up to and including this
    /// one.
    pub best: usize,
}

/// The records of every evaluation an objective performed, in call order.
///
/// Only the objective itself appends; everything else reads. Derefs to the inner slice of
/// [`EvaluationRecord`]s.
#[derive(Default, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Trace(Vec<EvaluationRecord>);

impl Trace {
    pub(crate) fn push(&mut self, record: EvaluationRecord) {
        self.0.push(record);
    }
    /// Returns the inner Vector of records.
    pub fn into_inner(self) -> Vec<EvaluationRecord> {
        self.0
    }
    /// The record holding the best value seen over the whole trace, found through the last
    /// record's running best index.
    pub fn best_record(&self) -> Option<&EvaluationRecord> {
        self.0.last().map(|record| &self.0[record.best])
    }
    /// The running minimum of `y_output`, one entry per record; the usual convergence curve.
    pub fn best_values(&self) -> Vec<Float> {
        self.0
            .iter()
            .map(|record| self.0[record.best].y_output)
            .collect()
    }
}

impl Deref for Trace {
    type Target = [EvaluationRecord];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(index: usize, y_output: Float, best: usize) -> EvaluationRecord {
        EvaluationRecord {
            index,
            x: DVector::from_vec(vec![0.0, 0.0]),
            input_time: index as Float,
            output_time: index as Float,
            x_error: 0.0,
            y_true: y_output,
            y_output,
            best,
        }
    }

    #[test]
    fn test_empty_trace() {
        let trace = Trace::default();
        assert!(trace.is_empty());
        assert!(trace.best_record().is_none());
        assert!(trace.best_values().is_empty());
    }

    #[test]
    fn test_best_record_follows_last_best_index() {
        let mut trace = Trace::default();
        trace.push(record(0, 3.0, 0));
        trace.push(record(1, 1.0, 1));
        trace.push(record(2, 2.0, 1));
        let best = trace.best_record().unwrap();
        assert_eq!(best.index, 1);
        assert_eq!(best.y_output, 1.0);
    }

    #[test]
    fn test_best_values_is_running_minimum() {
        let mut trace = Trace::default();
        trace.push(record(0, 3.0, 0));
        trace.push(record(1, 5.0, 0));
        trace.push(record(2, 1.0, 2));
        trace.push(record(3, 4.0, 2));
        assert_eq!(trace.best_values(), vec![3.0, 3.0, 1.0, 1.0]);
    }
}
