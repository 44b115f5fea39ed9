// Portable profile tree
//
// One node per call-tree frame. Both samplers emit the same shape and differ
// only in the statistics flattened into each node.

use serde::{Deserialize, Serialize};

/// A node of a converted call tree
///
/// The statistics in `stats` describe this frame only. Totals for a subtree are
/// left to the consumer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileNode<S> {
    /// Script or resource the frame belongs to (may be empty)
    pub file_name: String,
    /// Engine-reported line number, copied verbatim
    pub line_num: i32,
    /// Engine-reported column number, copied verbatim
    pub col_num: i32,
    /// Function name as supplied by the engine, e.g. "(root)" or ""
    pub func_name: String,
    /// Per-node statistics
    #[serde(flatten)]
    pub stats: S,
    /// Child frames in engine enumeration order
    pub children: Vec<ProfileNode<S>>,
}

/// CPU sampler statistics
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CpuStats {
    /// Samples whose top frame was exactly this node
    pub hit_count: u32,
}

/// Allocation sampler statistics
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AllocationStats {
    /// Number of sampled allocations attributed to this node
    pub count: u64,
    /// Total sampled bytes, sum of `size * count` over the node's records
    pub size: u64,
}

/// CPU profile tree
pub type CpuProfileNode = ProfileNode<CpuStats>;

/// Allocation profile tree
pub type AllocationProfileNode = ProfileNode<AllocationStats>;

impl<S> ProfileNode<S> {
    /// Number of levels in this tree (a lone node has depth 1)
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(ProfileNode::depth)
            .max()
            .unwrap_or(0)
    }

    /// Number of nodes in this tree, including `self`
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(ProfileNode::node_count)
            .sum::<usize>()
    }
}

impl AllocationStats {
    /// Fold one coalesced allocation record into the totals.
    ///
    /// Saturates at `u64::MAX`.
    pub fn add_allocation(&mut self, count: u32, size: u64) {
        let count = u64::from(count);
        self.count = self.count.saturating_add(count);
        self.size = self.size.saturating_add(size.saturating_mul(count));
    }
}
