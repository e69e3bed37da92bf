use serde::{Deserialize, Serialize};

use crate::error::TreeError;
use crate::record::RiskLabel;

/// One entry of the flattened tree.
///
/// Splits send a row to `left` when `row[feature_index] <= threshold` and to
/// `right` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature_index: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        label: u8,
    },
}

/// Direction taken at a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Branch {
    Left,
    Right,
}

/// A single visited split on the way to a leaf.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionStep {
    pub node: usize,
    pub feature: String,
    pub threshold: f64,
    pub value: f64,
    pub branch: Branch,
}

/// A validated, immutable decision tree over named feature columns.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
    feature_names: Vec<String>,
    classes: Vec<u8>,
    nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Builds a tree, rejecting any structure that could make traversal
    /// index out of bounds or loop.
    pub fn new(
        feature_names: Vec<String>,
        classes: Vec<u8>,
        nodes: Vec<TreeNode>,
    ) -> Result<Self, TreeError> {
        if nodes.is_empty() {
            return Err(TreeError::Empty);
        }
        if feature_names.is_empty() {
            return Err(TreeError::NoFeatures);
        }
        for (i, name) in feature_names.iter().enumerate() {
            if feature_names[..i].contains(name) {
                return Err(TreeError::DuplicateFeature(name.clone()));
            }
        }
        for class in &classes {
            RiskLabel::try_from(*class).map_err(|_| TreeError::UnsupportedClass(*class))?;
        }

        for (node, entry) in nodes.iter().enumerate() {
            match *entry {
                TreeNode::Split {
                    feature_index,
                    threshold,
                    left,
                    right,
                } => {
                    if feature_index >= feature_names.len() {
                        return Err(TreeError::FeatureIndexOutOfRange {
                            node,
                            index: feature_index,
                            count: feature_names.len(),
                        });
                    }
                    if !threshold.is_finite() {
                        return Err(TreeError::NonFiniteThreshold { node });
                    }
                    for child in [left, right] {
                        if child >= nodes.len() {
                            return Err(TreeError::ChildOutOfRange { node, child });
                        }
                        // Children always sit after their parent, so every walk terminates.
                        if child <= node {
                            return Err(TreeError::BackwardChild { node, child });
                        }
                    }
                }
                TreeNode::Leaf { label } => {
                    if !classes.contains(&label) {
                        return Err(TreeError::UndeclaredLeafClass { node, label });
                    }
                }
            }
        }

        Ok(Self {
            feature_names,
            classes,
            nodes,
        })
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn classes(&self) -> &[u8] {
        &self.classes
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, TreeNode::Leaf { .. }))
            .count()
    }

    /// Number of splits on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        // Children come after parents, so a reverse sweep sees every child first.
        let mut depths = vec![0usize; self.nodes.len()];
        for (idx, node) in self.nodes.iter().enumerate().rev() {
            if let TreeNode::Split { left, right, .. } = *node {
                depths[idx] = 1 + depths[left].max(depths[right]);
            }
        }
        depths[0]
    }

    /// Class of the leaf reached by `row`, laid out like [`Self::feature_names`].
    pub fn predict_row(&self, row: &[f64]) -> u8 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                TreeNode::Split {
                    feature_index,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[feature_index] <= threshold {
                        left
                    } else {
                        right
                    };
                }
                TreeNode::Leaf { label } => return label,
            }
        }
    }

    /// Splits visited by `row`, followed by the class of the reached leaf.
    pub fn decision_path(&self, row: &[f64]) -> (Vec<DecisionStep>, u8) {
        let mut steps = Vec::new();
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                TreeNode::Split {
                    feature_index,
                    threshold,
                    left,
                    right,
                } => {
                    let value = row[feature_index];
                    let branch = if value <= threshold {
                        Branch::Left
                    } else {
                        Branch::Right
                    };
                    steps.push(DecisionStep {
                        node: idx,
                        feature: self.feature_names[feature_index].clone(),
                        threshold,
                        value,
                        branch,
                    });
                    idx = match branch {
                        Branch::Left => left,
                        Branch::Right => right,
                    };
                }
                TreeNode::Leaf { label } => return (steps, label),
            }
        }
    }

    /// Human-readable rule for every node, in node order.
    pub fn rules(&self) -> Vec<String> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| match node {
                TreeNode::Split {
                    feature_index,
                    threshold,
                    left,
                    right,
                } => format!(
                    "node {idx}: if {} <= {threshold} then node {left} else node {right}",
                    self.feature_names[*feature_index]
                ),
                TreeNode::Leaf { label } => match RiskLabel::try_from(*label) {
                    Ok(risk) => format!("node {idx}: predict {risk}"),
                    Err(_) => format!("node {idx}: predict class {label}"),
                },
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Vec<String> {
        vec!["a".to_string(), "b".to_string()]
    }

    fn split(feature_index: usize, threshold: f64, left: usize, right: usize) -> TreeNode {
        TreeNode::Split {
            feature_index,
            threshold,
            left,
            right,
        }
    }

    fn sample_tree() -> DecisionTree {
        DecisionTree::new(
            names(),
            vec![0, 1],
            vec![
                split(0, 10.0, 1, 2),
                TreeNode::Leaf { label: 0 },
                split(1, 5.0, 3, 4),
                TreeNode::Leaf { label: 0 },
                TreeNode::Leaf { label: 1 },
            ],
        )
        .unwrap()
    }

    #[test]
    fn threshold_equality_goes_left() {
        let tree = sample_tree();
        assert_eq!(tree.predict_row(&[10.0, 100.0]), 0);
        assert_eq!(tree.predict_row(&[10.5, 5.0]), 0);
        assert_eq!(tree.predict_row(&[10.5, 5.5]), 1);
    }

    #[test]
    fn decision_path_records_each_split() {
        let tree = sample_tree();
        let (steps, label) = tree.decision_path(&[11.0, 6.0]);
        assert_eq!(label, 1);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].feature, "a");
        assert_eq!(steps[0].branch, Branch::Right);
        assert_eq!(steps[1].node, 2);
        assert_eq!(steps[1].value, 6.0);
        assert_eq!(steps[1].branch, Branch::Right);
    }

    #[test]
    fn shape_statistics() {
        let tree = sample_tree();
        assert_eq!(tree.node_count(), 5);
        assert_eq!(tree.leaf_count(), 3);
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn single_leaf_tree_has_depth_zero() {
        let tree = DecisionTree::new(names(), vec![0, 1], vec![TreeNode::Leaf { label: 1 }]).unwrap();
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.predict_row(&[0.0, 0.0]), 1);
    }

    #[test]
    fn rules_describe_splits_and_leaves() {
        let rules = sample_tree().rules();
        assert_eq!(rules[0], "node 0: if a <= 10 then node 1 else node 2");
        assert_eq!(rules[4], "node 4: predict High Risk");
    }

    #[test]
    fn rejects_empty_tree() {
        assert_eq!(
            DecisionTree::new(names(), vec![0, 1], vec![]),
            Err(TreeError::Empty)
        );
    }

    #[test]
    fn rejects_backward_child() {
        let nodes = vec![
            split(0, 1.0, 1, 2),
            split(0, 1.0, 0, 2),
            TreeNode::Leaf { label: 0 },
        ];
        assert_eq!(
            DecisionTree::new(names(), vec![0, 1], nodes),
            Err(TreeError::BackwardChild { node: 1, child: 0 })
        );
    }

    #[test]
    fn rejects_dangling_child() {
        let nodes = vec![split(0, 1.0, 1, 7), TreeNode::Leaf { label: 0 }];
        assert_eq!(
            DecisionTree::new(names(), vec![0, 1], nodes),
            Err(TreeError::ChildOutOfRange { node: 0, child: 7 })
        );
    }

    #[test]
    fn rejects_unknown_feature_index() {
        let nodes = vec![
            split(2, 1.0, 1, 2),
            TreeNode::Leaf { label: 0 },
            TreeNode::Leaf { label: 1 },
        ];
        assert_eq!(
            DecisionTree::new(names(), vec![0, 1], nodes),
            Err(TreeError::FeatureIndexOutOfRange {
                node: 0,
                index: 2,
                count: 2
            })
        );
    }

    #[test]
    fn rejects_nan_threshold() {
        let nodes = vec![
            split(0, f64::NAN, 1, 2),
            TreeNode::Leaf { label: 0 },
            TreeNode::Leaf { label: 1 },
        ];
        assert_eq!(
            DecisionTree::new(names(), vec![0, 1], nodes),
            Err(TreeError::NonFiniteThreshold { node: 0 })
        );
    }

    #[test]
    fn rejects_undeclared_and_unsupported_classes() {
        assert_eq!(
            DecisionTree::new(names(), vec![0], vec![TreeNode::Leaf { label: 1 }]),
            Err(TreeError::UndeclaredLeafClass { node: 0, label: 1 })
        );
        assert_eq!(
            DecisionTree::new(names(), vec![0, 1, 2], vec![TreeNode::Leaf { label: 0 }]),
            Err(TreeError::UnsupportedClass(2))
        );
    }

    #[test]
    fn rejects_duplicate_features() {
        assert_eq!(
            DecisionTree::new(
                vec!["a".to_string(), "a".to_string()],
                vec![0, 1],
                vec![TreeNode::Leaf { label: 0 }]
            ),
            Err(TreeError::DuplicateFeature("a".to_string()))
        );
    }

    #[test]
    fn nodes_deserialize_from_plain_json() {
        let nodes: Vec<TreeNode> = serde_json::from_str(
            r#"[{"feature_index": 1, "threshold": 2.5, "left": 1, "right": 2}, {"label": 1}]"#,
        )
        .unwrap();
        assert_eq!(nodes[0], split(1, 2.5, 1, 2));
        assert_eq!(nodes[1], TreeNode::Leaf { label: 1 });
    }
}
