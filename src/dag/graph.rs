//! Node arena and topological ordering.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::error::{ContractError, Result};

/// A contract algorithm in the DAG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Unique id, also the index of the node's allocation entry.
    pub id: usize,
    /// Ids of the parent nodes, in declaration order. The order matters:
    /// it fixes the nesting order of parent-quality keys in the profile.
    pub parents: Vec<usize>,
}

impl Node {
    /// Creates a node with no parents.
    pub fn leaf(id: usize) -> Self {
        Self {
            id,
            parents: Vec::new(),
        }
    }

    /// Creates a node fed by the given parents.
    pub fn with_parents(id: usize, parents: Vec<usize>) -> Self {
        Self { id, parents }
    }

    /// Whether the node is a source of the DAG.
    pub fn is_leaf(&self) -> bool {
        self.parents.is_empty()
    }
}

/// Directed acyclic graph with dense ids `0..order` and exactly one sink.
///
/// # Examples
///
/// ```
/// use u_contract::dag::{Dag, Node};
///
/// let dag = Dag::new(vec![Node::leaf(0), Node::with_parents(1, vec![0])]).unwrap();
/// assert_eq!(dag.order(), 2);
/// assert_eq!(dag.root(), 1);
/// assert_eq!(dag.topological_order(), &[0, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct Dag {
    nodes: Vec<Node>,
    topological: Vec<usize>,
    root: usize,
}

impl Dag {
    /// Builds and validates a DAG.
    ///
    /// Fails when ids are not exactly `0..n`, a parent id is dangling or
    /// self-referential, the graph has a cycle, or it does not have exactly
    /// one sink.
    pub fn new(mut nodes: Vec<Node>) -> Result<Self> {
        if nodes.is_empty() {
            return Err(ContractError::InvalidDag("dag has no nodes".into()));
        }
        nodes.sort_by_key(|n| n.id);
        for (index, node) in nodes.iter().enumerate() {
            if node.id != index {
                return Err(ContractError::InvalidDag(format!(
                    "node ids must be unique and dense in 0..{}, found id {} at position {index}",
                    nodes.len(),
                    node.id
                )));
            }
        }

        let n = nodes.len();
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut in_degree = vec![0usize; n];
        for node in &nodes {
            for &parent in &node.parents {
                if parent >= n {
                    return Err(ContractError::InvalidDag(format!(
                        "node {} references unknown parent {parent}",
                        node.id
                    )));
                }
                if parent == node.id {
                    return Err(ContractError::InvalidDag(format!(
                        "node {} lists itself as a parent",
                        node.id
                    )));
                }
                children[parent].push(node.id);
                in_degree[node.id] += 1;
            }
        }

        // Kahn's algorithm, smallest ready id first.
        let mut ready: BinaryHeap<Reverse<usize>> = in_degree
            .iter()
            .enumerate()
            .filter(|&(_, &d)| d == 0)
            .map(|(id, _)| Reverse(id))
            .collect();
        let mut topological = Vec::with_capacity(n);
        while let Some(Reverse(id)) = ready.pop() {
            topological.push(id);
            for &child in &children[id] {
                in_degree[child] -= 1;
                if in_degree[child] == 0 {
                    ready.push(Reverse(child));
                }
            }
        }
        if topological.len() != n {
            return Err(ContractError::InvalidDag("graph contains a cycle".into()));
        }

        let sinks: Vec<usize> = (0..n).filter(|&id| children[id].is_empty()).collect();
        if sinks.len() != 1 {
            return Err(ContractError::InvalidDag(format!(
                "expected exactly one sink, found {sinks:?}"
            )));
        }

        Ok(Self {
            nodes,
            topological,
            root: sinks[0],
        })
    }

    /// Number of nodes.
    pub fn order(&self) -> usize {
        self.nodes.len()
    }

    /// All nodes, indexed by id.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Looks up a node by id.
    pub fn node(&self, id: usize) -> Result<&Node> {
        self.nodes.get(id).ok_or(ContractError::NodeNotFound(id))
    }

    /// Ancestors-before-descendants traversal order.
    pub fn topological_order(&self) -> &[usize] {
        &self.topological
    }

    /// Id of the unique sink.
    pub fn root(&self) -> usize {
        self.root
    }
}
