//! Regression tree over a single feature (MSE splits)

use serde::{Deserialize, Serialize};

use super::running_mean;

/// Tree node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    Leaf {
        value: f64,
        n_samples: usize,
    },
    Split {
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
        n_samples: usize,
    },
}

/// Regression tree grown on `(x, y)` pairs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    root: TreeNode,
}

#[derive(Debug, Clone, Copy)]
pub struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_leaf: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_leaf: 1,
        }
    }
}

impl RegressionTree {
    /// Grow a tree; callers guarantee `x` and `y` are non-empty and equal length
    pub fn grow(x: &[f64], y: &[f64], params: TreeParams) -> Self {
        let mut samples: Vec<(f64, f64)> = x.iter().copied().zip(y.iter().copied()).collect();
        samples.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self {
            root: build_node(&samples, 0, params),
        }
    }

    pub fn predict(&self, x: f64) -> f64 {
        let mut node = &self.root;
        loop {
            match node {
                TreeNode::Leaf { value, .. } => return *value,
                TreeNode::Split {
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    node = if x <= *threshold { left } else { right };
                }
            }
        }
    }

    pub fn depth(&self) -> usize {
        node_depth(&self.root)
    }

    pub fn n_leaves(&self) -> usize {
        count_leaves(&self.root)
    }
}

fn build_node(samples: &[(f64, f64)], depth: usize, params: TreeParams) -> TreeNode {
    let n = samples.len();
    let mean = running_mean(samples.iter().map(|s| s.1));
    let leaf = TreeNode::Leaf {
        value: mean,
        n_samples: n,
    };

    if params.max_depth.is_some_and(|d| depth >= d) || n < 2 * params.min_samples_leaf {
        return leaf;
    }

    match best_split(samples, params.min_samples_leaf) {
        Some((position, threshold)) => {
            let (left, right) = samples.split_at(position);
            TreeNode::Split {
                threshold,
                left: Box::new(build_node(left, depth + 1, params)),
                right: Box::new(build_node(right, depth + 1, params)),
                n_samples: n,
            }
        }
        None => leaf,
    }
}

/// Best split of x-sorted samples: (left length, threshold)
///
/// Splits only between distinct x values; None when no split lowers the
/// squared error.
fn best_split(samples: &[(f64, f64)], min_leaf: usize) -> Option<(usize, f64)> {
    let n = samples.len();
    let total_sum: f64 = samples.iter().map(|s| s.1).sum();
    let total_sq: f64 = samples.iter().map(|s| s.1 * s.1).sum();
    let parent_sse = total_sq - total_sum * total_sum / n as f64;
    if parent_sse <= 1e-12 {
        return None;
    }

    let mut best: Option<(usize, f64, f64)> = None;
    let mut left_sum = 0.0;
    let mut left_sq = 0.0;

    for i in 1..n {
        let y = samples[i - 1].1;
        left_sum += y;
        left_sq += y * y;

        if i < min_leaf || n - i < min_leaf {
            continue;
        }
        if samples[i - 1].0 == samples[i].0 {
            continue;
        }

        let right_sum = total_sum - left_sum;
        let right_sq = total_sq - left_sq;
        let sse = (left_sq - left_sum * left_sum / i as f64)
            + (right_sq - right_sum * right_sum / (n - i) as f64);

        if best.is_none_or(|(_, _, b)| sse < b) {
            let threshold = (samples[i - 1].0 + samples[i].0) / 2.0;
            best = Some((i, threshold, sse));
        }
    }

    best.filter(|&(_, _, sse)| sse < parent_sse)
        .map(|(i, threshold, _)| (i, threshold))
}

fn node_depth(node: &TreeNode) -> usize {
    match node {
        TreeNode::Leaf { .. } => 0,
        TreeNode::Split { left, right, .. } => 1 + node_depth(left).max(node_depth(right)),
    }
}

fn count_leaves(node: &TreeNode) -> usize {
    match node {
        TreeNode::Leaf { .. } => 1,
        TreeNode::Split { left, right, .. } => count_leaves(left) + count_leaves(right),
    }
}
