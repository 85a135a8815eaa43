//! Random forest classifier
//!
//! Trees are stored as flat node arrays (root at index 0). A split sends
//! `x[feature] <= threshold` to `left`. Leaves hold per-class weights, which
//! are normalised per tree and then averaged over the forest.

use serde::{Deserialize, Serialize};

use super::inference::{
    argmax, check_probabilities, check_width, Inference, InferenceEngine, InferenceError,
};
use crate::logic::scaler::ScaledVector;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Structural checks: children point forward, leaves match the class count
    fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }

        for (index, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split { feature, threshold, left, right } => {
                    if *feature >= n_features {
                        return Err(format!("node {} splits on feature {}", index, feature));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {} has non-finite threshold", index));
                    }
                    for child in [*left, *right] {
                        if child <= index || child >= self.nodes.len() {
                            return Err(format!("node {} has invalid child {}", index, child));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if value.len() != n_classes {
                        return Err(format!(
                            "leaf {} has {} class weights, expected {}",
                            index,
                            value.len(),
                            n_classes
                        ));
                    }
                    let valid = value.iter().all(|w| w.is_finite() && *w >= 0.0);
                    if !valid || value.iter().sum::<f64>() <= 0.0 {
                        return Err(format!("leaf {} has invalid class weights", index));
                    }
                }
            }
        }
        Ok(())
    }

    /// Leaf weights reached by `x`
    fn leaf(&self, x: &[f64]) -> Result<&[f64], InferenceError> {
        let mut index = 0;
        // Children always point forward, so at most nodes.len() steps
        for _ in 0..self.nodes.len() {
            match self.nodes.get(index) {
                Some(TreeNode::Split { feature, threshold, left, right }) => {
                    let value = x.get(*feature).copied().ok_or_else(|| {
                        InferenceError::Runtime(format!("split on missing feature {}", feature))
                    })?;
                    index = if value <= *threshold { *left } else { *right };
                }
                Some(TreeNode::Leaf { value }) => return Ok(value.as_slice()),
                None => break,
            }
        }
        Err(InferenceError::Runtime(format!("tree walk left the node array at {}", index)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub classes: Vec<i64>,
    pub n_features: usize,
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn validate(&self) -> Result<(), InferenceError> {
        if self.classes.len() < 2 {
            return Err(InferenceError::InvalidModel(format!(
                "need at least 2 classes, got {}",
                self.classes.len()
            )));
        }
        if self.trees.is_empty() {
            return Err(InferenceError::InvalidModel("forest has no trees".to_string()));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features, self.classes.len())
                .map_err(|e| InferenceError::InvalidModel(format!("tree {}: {}", i, e)))?;
        }
        Ok(())
    }

    /// Mean of the per-tree normalised leaf distributions
    pub fn predict_proba(&self, x: &[f64]) -> Result<Vec<f64>, InferenceError> {
        let mut proba = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            let leaf = tree.leaf(x)?;
            let total: f64 = leaf.iter().sum();
            for (p, w) in proba.iter_mut().zip(leaf) {
                *p += w / total;
            }
        }

        let n = self.trees.len() as f64;
        proba.iter_mut().for_each(|p| *p /= n);
        Ok(proba)
    }
}

impl InferenceEngine for RandomForest {
    fn name(&self) -> &str {
        "random_forest"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn supports_probabilities(&self) -> bool {
        true
    }

    fn infer(&self, input: &ScaledVector) -> Result<Inference, InferenceError> {
        check_width(self.n_features, input.as_slice())?;

        let probabilities = self.predict_proba(input.as_slice())?;
        check_probabilities(&probabilities)?;

        let label = argmax(&probabilities)
            .and_then(|i| self.classes.get(i).copied())
            .ok_or_else(|| InferenceError::Runtime("empty probability vector".to_string()))?;

        Ok(Inference {
            label,
            probabilities: Some(probabilities),
        })
    }
}
