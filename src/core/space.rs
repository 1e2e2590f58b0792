use crate::{core::utils::SampleFloat, error::Error, DVector, Float};
use fastrand::Rng;
use serde::{Deserialize, Serialize};
use std::{
    fmt::Display,
    ops::{Deref, DerefMut},
};

/// A finite inclusive interval constraining one coordinate of a search space.
///
/// Benchmark domains are always finite boxes, so both edges are required and must be finite.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Bound {
    /// The lower edge of the interval.
    pub lower: Float,
    /// The upper edge of the interval.
    pub upper: Float,
}
impl Display for Bound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.lower, self.upper)
    }
}
impl From<(Float, Float)> for Bound {
    fn from(value: (Float, Float)) -> Self {
        assert!(value.0.is_finite() && value.1.is_finite() && value.0 < value.1);
        Self {
            lower: value.0,
            upper: value.1,
        }
    }
}
impl Bound {
    /// Checks whether the given `value` is compatible with the bound.
    pub fn contains(&self, value: Float) -> bool {
        value >= self.lower && value <= self.upper
    }
    /// Returns the length of the interval.
    pub fn width(&self) -> Float {
        self.upper - self.lower
    }
    /// Clamps the given `value` into the interval.
    pub fn clip(&self, value: Float) -> Float {
        value.clamp(self.lower, self.upper)
    }
    /// Get a value in the uniform distribution between `lower` and `upper`.
    pub fn get_uniform(&self, rng: &mut Rng) -> Float {
        rng.range(self.lower, self.upper)
    }
}

/// A struct that contains a list of [`Bound`]s.
#[derive(Default, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Bounds(Vec<Bound>);

impl Bounds {
    /// Returns the inner Vector of bounds.
    pub fn into_inner(self) -> Vec<Bound> {
        self.0
    }
}

impl From<Vec<Bound>> for Bounds {
    fn from(value: Vec<Bound>) -> Self {
        Self(value)
    }
}

impl<B: Into<Bound>> FromIterator<B> for Bounds {
    fn from_iter<T: IntoIterator<Item = B>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl Deref for Bounds {
    type Target = Vec<Bound>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Bounds {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// A labeled per-coordinate sampling distribution, the second of the two equivalent encodings
/// carried by a [`SearchSpace`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum Distribution {
    /// A continuous uniform distribution over `[low, high]`.
    Uniform {
        /// The coordinate's label (e.g. `"x0"`).
        label: String,
        /// The lower edge of the support.
        low: Float,
        /// The upper edge of the support.
        high: Float,
    },
}

impl Distribution {
    /// The coordinate label this distribution is keyed by.
    pub fn label(&self) -> &str {
        match self {
            Self::Uniform { label, .. } => label,
        }
    }
    /// The interval implied by this distribution's support.
    pub fn bound(&self) -> Bound {
        match self {
            Self::Uniform { low, high, .. } => Bound {
                lower: *low,
                upper: *high,
            },
        }
    }
    /// Draw one value from this distribution.
    pub fn sample(&self, rng: &mut Rng) -> Float {
        match self {
            Self::Uniform { low, high, .. } => rng.range(*low, *high),
        }
    }
}

/// A benchmark's domain, carried in two equivalent encodings: a plain list of [`Bound`]s and a
/// list of labeled [`Distribution`]s.
///
/// Some adapters consume interval pairs and others consume named distributions; holding both,
/// proven equal at construction, means neither family needs a conversion step that could
/// silently disagree with the other.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SearchSpace {
    bounds: Bounds,
    distributions: Vec<Distribution>,
}

impl SearchSpace {
    /// Creates a search space from both encodings, verifying that they describe the identical
    /// domain.
    ///
    /// # Panics
    ///
    /// Panics if the encodings have different lengths, if any distribution's support differs
    /// from the bound at the same position, or if two distributions share a label.
    pub fn new(bounds: Bounds, distributions: Vec<Distribution>) -> Self {
        assert_eq!(
            bounds.len(),
            distributions.len(),
            "search space encodings have different dimensions"
        );
        for (i, (bound, distribution)) in bounds.iter().zip(&distributions).enumerate() {
            assert_eq!(
                *bound,
                distribution.bound(),
                "search space encodings disagree at coordinate {i}"
            );
        }
        for (i, distribution) in distributions.iter().enumerate() {
            assert!(
                distributions[..i]
                    .iter()
                    .all(|other| other.label() != distribution.label()),
                "duplicate distribution label '{}'",
                distribution.label()
            );
        }
        Self {
            bounds,
            distributions,
        }
    }

    /// Creates a uniform box from `(low, high)` pairs, deriving both encodings with labels
    /// `x0`, `x1`, and so on.
    pub fn uniform(limits: &[(Float, Float)]) -> Self {
        let bounds: Bounds = limits.iter().copied().collect();
        let distributions = limits
            .iter()
            .enumerate()
            .map(|(i, &(low, high))| Distribution::Uniform {
                label: format!("x{i}"),
                low,
                high,
            })
            .collect();
        Self::new(bounds, distributions)
    }

    /// The number of coordinates in the space.
    pub fn dimension(&self) -> usize {
        self.bounds.len()
    }

    /// The interval-pair encoding.
    pub const fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// The labeled-distribution encoding.
    pub fn distributions(&self) -> &[Distribution] {
        &self.distributions
    }

    /// Checks whether the given point has the right dimension and lies inside every bound.
    pub fn contains(&self, x: &DVector<Float>) -> bool {
        x.len() == self.dimension()
            && x.iter()
                .zip(self.bounds.iter())
                .all(|(value, bound)| bound.contains(*value))
    }

    /// Checks the given point against the space, reporting exactly what is wrong with it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`], [`Error::NonFiniteCoordinate`], or
    /// [`Error::OutOfBounds`] for the first violation found.
    pub fn validate(&self, x: &DVector<Float>) -> Result<(), Error> {
        if x.len() != self.dimension() {
            return Err(Error::DimensionMismatch {
                expected: self.dimension(),
                actual: x.len(),
            });
        }
        for (index, (value, bound)) in x.iter().zip(self.bounds.iter()).enumerate() {
            if !value.is_finite() {
                return Err(Error::NonFiniteCoordinate { index });
            }
            if !bound.contains(*value) {
                return Err(Error::OutOfBounds {
                    index,
                    value: *value,
                    lower: bound.lower,
                    upper: bound.upper,
                });
            }
        }
        Ok(())
    }

    /// Draw one point uniformly from the box, coordinate by coordinate.
    pub fn sample(&self, rng: &mut Rng) -> DVector<Float> {
        DVector::from_iterator(
            self.dimension(),
            self.bounds.iter().map(|bound| bound.get_uniform(rng)),
        )
    }

    /// Clamps the given point into the box, coordinate by coordinate.
    pub fn clip(&self, x: &DVector<Float>) -> DVector<Float> {
        DVector::from_iterator(
            self.dimension(),
            x.iter()
                .zip(self.bounds.iter())
                .map(|(value, bound)| bound.clip(*value)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_contains_width_clip() {
        let bound = Bound::from((-5.0, 5.0));
        assert!(bound.contains(0.0));
        assert!(bound.contains(-5.0));
        assert!(bound.contains(5.0));
        assert!(!bound.contains(5.1));
        assert_eq!(bound.width(), 10.0);
        assert_eq!(bound.clip(7.0), 5.0);
        assert_eq!(bound.clip(-7.0), -5.0);
        assert_eq!(bound.clip(1.0), 1.0);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_bound_rejects_inverted_edges() {
        let _ = Bound::from((1.0, -1.0));
    }

    #[test]
    fn test_uniform_space_encodings_agree() {
        let space = SearchSpace::uniform(&[(-5.0, 5.0), (0.0, 1.0)]);
        assert_eq!(space.dimension(), 2);
        for (bound, distribution) in space.bounds().iter().zip(space.distributions()) {
            assert_eq!(*bound, distribution.bound());
        }
        assert_eq!(space.distributions()[0].label(), "x0");
        assert_eq!(space.distributions()[1].label(), "x1");
    }

    #[test]
    #[should_panic(expected = "search space encodings disagree at coordinate 1")]
    fn test_disagreeing_encodings_rejected() {
        let bounds: Bounds = [(-5.0, 5.0), (-5.0, 5.0)].into_iter().collect();
        let distributions = vec![
            Distribution::Uniform {
                label: "x0".to_string(),
                low: -5.0,
                high: 5.0,
            },
            Distribution::Uniform {
                label: "x1".to_string(),
                low: 0.0,
                high: 5.0,
            },
        ];
        let _ = SearchSpace::new(bounds, distributions);
    }

    #[test]
    #[should_panic(expected = "duplicate distribution label 'x0'")]
    fn test_duplicate_labels_rejected() {
        let bounds: Bounds = [(-5.0, 5.0), (-5.0, 5.0)].into_iter().collect();
        let distributions = vec![
            Distribution::Uniform {
                label: "x0".to_string(),
                low: -5.0,
                high: 5.0,
            },
            Distribution::Uniform {
                label: "x0".to_string(),
                low: -5.0,
                high: 5.0,
            },
        ];
        let _ = SearchSpace::new(bounds, distributions);
    }

    #[test]
    fn test_sample_stays_inside() {
        let space = SearchSpace::uniform(&[(-5.0, 5.0), (0.0, 1.0), (10.0, 20.0)]);
        let mut rng = Rng::with_seed(0);
        for _ in 0..100 {
            let x = space.sample(&mut rng);
            assert!(space.contains(&x));
        }
    }

    #[test]
    fn test_validate_reports_first_violation() {
        let space = SearchSpace::uniform(&[(-5.0, 5.0), (-5.0, 5.0)]);
        assert!(space.validate(&DVector::from_vec(vec![0.0, 0.0])).is_ok());
        assert!(matches!(
            space.validate(&DVector::from_vec(vec![0.0])),
            Err(Error::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        ));
        assert!(matches!(
            space.validate(&DVector::from_vec(vec![Float::NAN, 0.0])),
            Err(Error::NonFiniteCoordinate { index: 0 })
        ));
        assert!(matches!(
            space.validate(&DVector::from_vec(vec![0.0, 6.0])),
            Err(Error::OutOfBounds { index: 1, .. })
        ));
    }

    #[test]
    fn test_clip_point() {
        let space = SearchSpace::uniform(&[(-1.0, 1.0), (-1.0, 1.0)]);
        let clipped = space.clip(&DVector::from_vec(vec![3.0, -0.5]));
        assert_eq!(clipped, DVector::from_vec(vec![1.0, -0.5]));
    }
}
