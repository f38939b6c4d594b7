//! Edge identifiers for [`DirectedGraph`](crate::utils::graph::DirectedGraph).

use std::fmt;

/// Dense index of an edge within a graph, assigned in insertion order.
///
/// Outgoing edge lists preserve insertion order, so for a CFG built from a
/// diagram snapshot the edge order matches the snapshot's edge array.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub(crate) usize);

impl EdgeId {
    /// Wraps a raw index.
    #[must_use]
    #[inline]
    pub const fn new(index: usize) -> Self {
        EdgeId(index)
    }

    /// The raw index.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeId({})", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatting() {
        assert_eq!(format!("{:?}", EdgeId::new(2)), "EdgeId(2)");
        assert_eq!(EdgeId::new(2).to_string(), "e2");
        assert_eq!(EdgeId::new(2).index(), 2);
    }
}
