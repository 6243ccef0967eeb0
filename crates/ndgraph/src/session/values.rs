//! Per-node tensor value storage.

use crate::error::GraphError;
use crate::graph::NodeId;
use crate::scalar::Scalar;
use crate::tensor::Tensor;
use std::collections::HashMap;

/// Tensor values keyed by node identity.
#[derive(Debug, Clone)]
pub struct ValueMap<T: Scalar> {
    values: HashMap<NodeId, Tensor<T>>,
}

impl<T: Scalar> ValueMap<T> {
    /// Create empty value map.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Store the value of a node, replacing any previous one.
    pub fn insert(&mut self, id: NodeId, value: Tensor<T>) {
        self.values.insert(id, value);
    }

    /// Get the value of a node, if any.
    pub fn get(&self, id: NodeId) -> Option<&Tensor<T>> {
        self.values.get(&id)
    }

    /// Get the value of a node, treating a missing entry as an error.
    pub fn value(&self, id: NodeId) -> Result<&Tensor<T>, GraphError> {
        self.values
            .get(&id)
            .ok_or(GraphError::UnknownNode { node: id })
    }

    /// Check if a value exists for node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.values.contains_key(&id)
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if no values stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over all values.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &Tensor<T>)> {
        self.values.iter()
    }
}

impl<T: Scalar> Default for ValueMap<T> {
    fn default() -> Self {
        Self::new()
    }
}
