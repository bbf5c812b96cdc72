//! Level stamping and parent reference resolution.

use std::collections::HashMap;

use super::types::{Level, LayoutNode, LayoutWarning, NodeIndex, NodeStub};

/// Nodes copied out of the leveled input, before parent resolution.
pub struct StagedNodes<'a> {
    pub nodes: Vec<LayoutNode>,
    /// Raw parent ids, parallel to `nodes`.
    pub raw_parents: Vec<&'a [String]>,
    pub levels: Vec<Level>,
    pub lookup: HashMap<String, NodeIndex>,
}

/// Copy every stub into a fresh node whose level is its input index.
/// A repeated id keeps its first occurrence.
pub fn stamp_levels<'a>(
    input: &'a [Vec<NodeStub>],
    warnings: &mut Vec<LayoutWarning>,
) -> StagedNodes<'a> {
    let mut staged = StagedNodes {
        nodes: Vec::new(),
        raw_parents: Vec::new(),
        levels: Vec::with_capacity(input.len()),
        lookup: HashMap::new(),
    };

    for (level, stubs) in input.iter().enumerate() {
        let mut members = Vec::with_capacity(stubs.len());
        for stub in stubs {
            if staged.lookup.contains_key(&stub.id) {
                log::warn!("duplicate node id {} at level {}; ignored", stub.id, level);
                warnings.push(LayoutWarning::DuplicateNode {
                    id: stub.id.clone(),
                    level,
                });
                continue;
            }

            let index = staged.nodes.len();
            staged.lookup.insert(stub.id.clone(), index);
            staged.nodes.push(LayoutNode {
                id: stub.id.clone(),
                label: stub.label.clone(),
                url: stub.url.clone(),
                level,
                parents: Vec::new(),
                parent_bundles: Vec::new(),
                bundles: Vec::new(),
                bundles_index: Default::default(),
                height: 0.0,
                x: 0.0,
                y: 0.0,
            });
            staged.raw_parents.push(&stub.parents);
            members.push(index);
        }
        staged.levels.push(Level {
            nodes: members,
            bundles: Vec::new(),
        });
    }

    staged
}

/// Replace raw parent ids with node indices.
///
/// Self references and repeated ids are skipped silently. Unknown ids and
/// parents that do not sit at a strictly lower level are dropped with a
/// warning.
pub fn resolve_parents(staged: &mut StagedNodes<'_>, warnings: &mut Vec<LayoutWarning>) {
    for index in 0..staged.nodes.len() {
        let mut resolved: Vec<NodeIndex> = Vec::new();

        for parent_id in staged.raw_parents[index] {
            let node = &staged.nodes[index];
            if *parent_id == node.id {
                log::debug!("node {}: ignoring self reference", node.id);
                continue;
            }

            let Some(&parent) = staged.lookup.get(parent_id) else {
                log::warn!("node {}: parent {} not found; edge dropped", node.id, parent_id);
                warnings.push(LayoutWarning::UnresolvedParent {
                    node: node.id.clone(),
                    parent: parent_id.clone(),
                });
                continue;
            };

            if resolved.contains(&parent) {
                continue;
            }

            let parent_level = staged.nodes[parent].level;
            if parent_level >= node.level {
                log::warn!(
                    "node {} (level {}): parent {} at level {}; edge dropped",
                    node.id,
                    node.level,
                    parent_id,
                    parent_level
                );
                warnings.push(LayoutWarning::ParentNotLower {
                    node: node.id.clone(),
                    parent: parent_id.clone(),
                    node_level: node.level,
                    parent_level,
                });
                continue;
            }

            resolved.push(parent);
        }

        staged.nodes[index].parents = resolved;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(input: &[Vec<NodeStub>]) -> (StagedNodes<'_>, Vec<LayoutWarning>) {
        let mut warnings = Vec::new();
        let mut staged = stamp_levels(input, &mut warnings);
        resolve_parents(&mut staged, &mut warnings);
        (staged, warnings)
    }

    #[test]
    fn test_levels_follow_input_index() {
        let input = vec![
            vec![NodeStub::new("A", &[]), NodeStub::new("B", &[])],
            vec![],
            vec![NodeStub::new("C", &["A"])],
        ];
        let (staged, warnings) = resolve(&input);

        assert!(warnings.is_empty());
        assert_eq!(staged.levels.len(), 3);
        assert_eq!(staged.levels[1].nodes.len(), 0);
        let levels: Vec<usize> = staged.nodes.iter().map(|n| n.level).collect();
        assert_eq!(levels, vec![0, 0, 2]);
        assert_eq!(staged.nodes[2].parents, vec![0]);
    }

    #[test]
    fn test_unknown_parent_dropped() {
        let input = vec![vec![NodeStub::new("D", &["ZZZ"])]];
        let (staged, warnings) = resolve(&input);

        assert!(staged.nodes[0].parents.is_empty());
        assert_eq!(
            warnings,
            vec![LayoutWarning::UnresolvedParent {
                node: "D".to_string(),
                parent: "ZZZ".to_string(),
            }]
        );
    }

    #[test]
    fn test_self_and_repeated_references() {
        let input = vec![
            vec![NodeStub::new("A", &[])],
            vec![NodeStub::new("B", &["B", "A", "A"])],
        ];
        let (staged, warnings) = resolve(&input);

        assert!(warnings.is_empty());
        assert_eq!(staged.nodes[1].parents, vec![0]);
    }

    #[test]
    fn test_parent_at_same_or_higher_level() {
        let input = vec![
            vec![NodeStub::new("A", &["B"]), NodeStub::new("C", &[])],
            vec![NodeStub::new("B", &["C"])],
        ];
        let (staged, warnings) = resolve(&input);

        assert!(staged.nodes[0].parents.is_empty());
        assert_eq!(staged.nodes[2].parents, vec![1]);
        assert!(matches!(
            &warnings[..],
            [LayoutWarning::ParentNotLower { node, parent_level: 1, .. }] if node == "A"
        ));
    }

    #[test]
    fn test_duplicate_node_keeps_first() {
        let input = vec![vec![NodeStub::new("A", &[])], vec![NodeStub::new("A", &[])]];
        let (staged, warnings) = resolve(&input);

        assert_eq!(staged.nodes.len(), 1);
        assert_eq!(staged.levels[1].nodes.len(), 0);
        assert_eq!(
            warnings,
            vec![LayoutWarning::DuplicateNode {
                id: "A".to_string(),
                level: 1,
            }]
        );
    }
}
