// Conversion of engine call trees into portable profile trees

use profile_types::{AllocationProfileNode, AllocationStats, CpuProfileNode, CpuStats, ProfileNode};
use sampling_engine::{AllocationNode, CallTreeNode};

/// Maximum number of levels in a converted tree, root included.
///
/// Also used as the stack depth the heap sampler records.
pub const MAX_DEPTH: usize = 25;

/// Convert a CPU profile's top-down tree, starting at its root
pub fn convert_cpu_tree<N>(root: &N) -> CpuProfileNode
where
    N: sampling_engine::CpuProfileNode,
{
    convert_node(root, 0, &|node: &N| CpuStats {
        hit_count: node.hit_count(),
    })
}

/// Convert a heap-sampling snapshot's tree, aggregating each node's records
pub fn convert_allocation_tree<N>(root: &N) -> AllocationProfileNode
where
    N: AllocationNode,
{
    convert_node(root, 0, &|node: &N| {
        let mut stats = AllocationStats::default();
        for allocation in node.allocations() {
            stats.add_allocation(allocation.count, allocation.size);
        }
        stats
    })
}

/// Depth-first pre-order walk. Children of a node at `depth` are only visited
/// while `depth + 1 < MAX_DEPTH`, so the deepest emitted level is always a leaf.
fn convert_node<N, S, F>(node: &N, depth: usize, stats: &F) -> ProfileNode<S>
where
    N: CallTreeNode,
    F: Fn(&N) -> S,
{
    let children = if depth + 1 < MAX_DEPTH {
        (0..node.children_count())
            .filter_map(|index| node.child(index))
            .map(|child| convert_node(child, depth + 1, stats))
            .collect()
    } else {
        Vec::new()
    };

    ProfileNode {
        file_name: node.script_resource_name().to_string(),
        line_num: node.line_number(),
        col_num: node.column_number(),
        func_name: node.function_name().to_string(),
        stats: stats(node),
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sampling_engine::MockNode;

    #[test]
    fn test_fields_copied_verbatim() {
        let node = MockNode::new("", "", -1, -1).with_hit_count(7);
        let converted = convert_cpu_tree(&node);

        assert_eq!(converted.func_name, "");
        assert_eq!(converted.file_name, "");
        assert_eq!(converted.line_num, -1);
        assert_eq!(converted.col_num, -1);
        assert_eq!(converted.stats.hit_count, 7);
    }

    #[test]
    fn test_children_keep_engine_order() {
        let root = MockNode::root()
            .with_child(MockNode::new("b", "x.js", 2, 1))
            .with_child(MockNode::new("a", "x.js", 1, 1))
            .with_child(MockNode::new("c", "x.js", 3, 1));
        let converted = convert_cpu_tree(&root);

        let names: Vec<&str> = converted
            .children
            .iter()
            .map(|c| c.func_name.as_str())
            .collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_exact_depth_cap() {
        assert_eq!(convert_cpu_tree(&MockNode::chain(MAX_DEPTH)).depth(), MAX_DEPTH);
        assert_eq!(
            convert_cpu_tree(&MockNode::chain(MAX_DEPTH + 1)).depth(),
            MAX_DEPTH
        );
        assert_eq!(
            convert_cpu_tree(&MockNode::chain(MAX_DEPTH - 1)).depth(),
            MAX_DEPTH - 1
        );
    }

    #[test]
    fn test_allocation_stats_aggregated_per_node() {
        let root = MockNode::root().with_allocation(1, 8).with_child(
            MockNode::new("alloc", "heap.js", 5, 3)
                .with_allocation(3, 16)
                .with_allocation(2, 100),
        );
        let converted = convert_allocation_tree(&root);

        // Own statistics only, never rolled up from children
        assert_eq!(converted.stats, AllocationStats { count: 1, size: 8 });
        assert_eq!(
            converted.children[0].stats,
            AllocationStats { count: 5, size: 248 }
        );
    }

    #[test]
    fn test_node_without_allocations() {
        let converted = convert_allocation_tree(&MockNode::root());
        assert_eq!(converted.stats, AllocationStats::default());
    }
}
