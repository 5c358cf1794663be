//! Time allocation for programs of contract algorithms.
//!
//! A contract algorithm returns, by a fixed deadline, an output whose
//! quality is random and improves with the time it is given. This crate
//! splits a fixed budget among the nodes of a DAG of such algorithms to
//! maximize the expected global utility of their qualities:
//!
//! - **DAG**: read-only node arena with parent back-references and a
//!   cached topological order.
//! - **Performance profiles**: empirical quality samples keyed by node,
//!   rounded parent qualities, and time, loaded once from JSON.
//! - **Contract program**: quality propagation through the DAG and the
//!   expected-utility evaluator over an [`Allocation`](program::Allocation).
//! - **Hill climbing**: pairwise time transfers with a decaying step size.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use u_contract::climb::HillClimbConfig;
//! use u_contract::dag::{Dag, Node};
//! use u_contract::profile::ProfileDocument;
//! use u_contract::program::{ContractProgram, ProgramConfig};
//!
//! let times: serde_json::Map<String, serde_json::Value> = (0..=40)
//!     .map(|k| (format!("{:.1}", k as f64 / 10.0), json!([0.5])))
//!     .collect();
//! let document: ProfileDocument = serde_json::from_value(json!({
//!     "node_0": { "qualities": times.clone() },
//!     "node_1": { "qualities": { "0.50": times } },
//! }))
//! .unwrap();
//!
//! let dag = Dag::new(vec![Node::leaf(0), Node::with_parents(1, vec![0])]).unwrap();
//! let mut program = ContractProgram::from_document(dag, document, ProgramConfig::new(4.0)).unwrap();
//! let result = program.naive_hill_climbing(&HillClimbConfig::default()).unwrap();
//! assert_eq!(result.best_utility, 1.0);
//! ```

pub mod climb;
pub mod dag;
pub mod error;
pub mod profile;
pub mod program;

pub use error::{ContractError, Result};
