//! Serde model of the performance profile file.
//!
//! ```json
//! {
//!   "node_0": { "qualities": { "0.0": [0.1, 0.2], "0.1": [0.15] } },
//!   "node_1": { "qualities": { "0.15": { "0.0": [0.3] } } }
//! }
//! ```
//!
//! Leaf nodes map time keys straight to samples. Other nodes nest one
//! level of two-decimal parent-quality keys per parent, in parent
//! declaration order, before reaching the time keys.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One level of a node's quality mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QualityTree {
    /// Observed qualities at a time key.
    Samples(Vec<f64>),
    /// Keyed by parent quality or by time.
    Branch(BTreeMap<String, QualityTree>),
}

/// Entry stored under `"node_<id>"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeProfile {
    pub qualities: BTreeMap<String, QualityTree>,
}

/// Whole profile file keyed by `"node_<id>"`.
pub type ProfileDocument = BTreeMap<String, NodeProfile>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_leaf_and_nested() {
        let doc: ProfileDocument = serde_json::from_str(
            r#"{
                "node_0": { "qualities": { "0.0": [0.1, 0.2] } },
                "node_1": { "qualities": { "0.15": { "0.0": [0.3] } }, "parents": [0] }
            }"#,
        )
        .unwrap();

        assert_eq!(
            doc["node_0"].qualities["0.0"],
            QualityTree::Samples(vec![0.1, 0.2])
        );
        match &doc["node_1"].qualities["0.15"] {
            QualityTree::Branch(inner) => {
                assert_eq!(inner["0.0"], QualityTree::Samples(vec![0.3]));
            }
            other => panic!("expected branch, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_list_is_samples() {
        let tree: QualityTree = serde_json::from_str("[]").unwrap();
        assert_eq!(tree, QualityTree::Samples(Vec::new()));
    }
}
