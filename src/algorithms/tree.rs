use crate::{DVector, Float};

/// A binary regression tree fit by exhaustive variance-reduction splits, in the manner of
/// CART[^1].
///
/// This is the base learner shared by the [`Forest`](`crate::algorithms::Forest`) and
/// [`Gbrt`](`crate::algorithms::Gbrt`) adapters. Fitting is deterministic; any randomness
/// (bootstrapping, row subsampling) is the caller's business.
///
/// [^1]: [Breiman, L., Friedman, J. H., Olshen, R. A., & Stone, C. J. (1984). Classification and Regression Trees. Chapman and Hall/CRC.](https://doi.org/10.1201/9781315139470)
pub struct RegressionTree {
    root: Node,
}

enum Node {
    Leaf {
        value: Float,
    },
    Split {
        feature: usize,
        threshold: Float,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl RegressionTree {
    /// Fits a tree to the given points and targets.
    ///
    /// Growth stops when `max_depth` is exhausted, when a node holds fewer than twice
    /// `min_leaf` samples, or when no split separates distinct feature values.
    ///
    /// # Panics
    ///
    /// Panics if `xs` and `ys` have different lengths or are empty.
    pub fn fit(xs: &[DVector<Float>], ys: &[Float], max_depth: usize, min_leaf: usize) -> Self {
        assert_eq!(xs.len(), ys.len());
        assert!(!xs.is_empty());
        let indices: Vec<usize> = (0..xs.len()).collect();
        Self {
            root: build(xs, ys, indices, max_depth, min_leaf.max(1)),
        }
    }
    /// The fitted value at the given point.
    pub fn predict(&self, x: &DVector<Float>) -> Float {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if x[*feature] <= *threshold { left } else { right };
                }
            }
        }
    }
}

fn mean_of(ys: &[Float], indices: &[usize]) -> Float {
    indices.iter().map(|&i| ys[i]).sum::<Float>() / indices.len() as Float
}

fn build(
    xs: &[DVector<Float>],
    ys: &[Float],
    indices: Vec<usize>,
    depth: usize,
    min_leaf: usize,
) -> Node {
    if depth == 0 || indices.len() < 2 * min_leaf {
        return Node::Leaf {
            value: mean_of(ys, &indices),
        };
    }
    let dim = xs[indices[0]].len();
    // (sse, feature, threshold) of the best candidate so far, earliest kept on ties
    let mut best: Option<(Float, usize, Float)> = None;
    for feature in 0..dim {
        let mut order = indices.clone();
        order.sort_by(|&a, &b| xs[a][feature].total_cmp(&xs[b][feature]));
        let n = order.len();
        let mut prefix = Vec::with_capacity(n + 1);
        prefix.push((0.0, 0.0));
        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        for &i in &order {
            sum += ys[i];
            sum_sq += ys[i] * ys[i];
            prefix.push((sum, sum_sq));
        }
        let (total_sum, total_sq) = prefix[n];
        for split in min_leaf..=(n - min_leaf) {
            let left_value = xs[order[split - 1]][feature];
            let right_value = xs[order[split]][feature];
            if left_value == right_value {
                continue;
            }
            let (left_sum, left_sq) = prefix[split];
            let sse = left_sq - left_sum * left_sum / split as Float + (total_sq - left_sq)
                - (total_sum - left_sum) * (total_sum - left_sum) / (n - split) as Float;
            let threshold = 0.5 * (left_value + right_value);
            match best {
                Some((incumbent, _, _)) if incumbent <= sse => {}
                _ => best = Some((sse, feature, threshold)),
            }
        }
    }
    match best {
        None => Node::Leaf {
            value: mean_of(ys, &indices),
        },
        Some((_, feature, threshold)) => {
            let (left, right): (Vec<usize>, Vec<usize>) = indices
                .into_iter()
                .partition(|&i| xs[i][feature] <= threshold);
            Node::Split {
                feature,
                threshold,
                left: Box::new(build(xs, ys, left, depth - 1, min_leaf)),
                right: Box::new(build(xs, ys, right, depth - 1, min_leaf)),
            }
        }
    }
}
