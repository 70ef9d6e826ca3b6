use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

/// Shape of a tensor. Unknown dimensions are `None`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct TensorShape {
    dims: Vec<Option<usize>>,
}

impl TensorShape {
    pub fn new(dims: Vec<Option<usize>>) -> Self {
        Self { dims }
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Number of elements held by a tensor of this shape, ignoring unknown dimensions
    pub fn dims(&self) -> usize {
        self.dims.iter().flatten().product()
    }

    pub fn is_fully_defined(&self) -> bool {
        self.dims.iter().all(Option::is_some)
    }

    pub fn is_compatible_with(&self, other: &Self) -> bool {
        if self.dims == vec![None] || other.dims == vec![None] {
            return true;
        }
        if self.dims.len() != other.dims.len() {
            // Layers always see flattened data, so equal element counts are enough
            return self.is_fully_defined()
                && other.is_fully_defined()
                && self.dims() == other.dims();
        }
        self.dims
            .iter()
            .zip(other.dims.iter())
            .all(|(x, y)| match (x, y) {
                (Some(a), Some(b)) => a == b,
                _ => true,
            })
    }
}

impl Index<usize> for TensorShape {
    type Output = Option<usize>;

    fn index(&self, idx: usize) -> &Option<usize> {
        &self.dims[idx]
    }
}

impl From<Vec<usize>> for TensorShape {
    fn from(v: Vec<usize>) -> Self {
        Self {
            dims: v.into_iter().map(Some).collect(),
        }
    }
}

impl fmt::Display for TensorShape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let dims: Vec<String> = self
            .dims
            .iter()
            .map(|x| x.map_or_else(|| "?".to_string(), |d| d.to_string()))
            .collect();
        write!(f, "[{}]", dims.join(", "))
    }
}
