//! Bundle formation, link construction and the parent -> bundle reverse index.

use super::types::{Bundle, BundleIndex, LayoutNode, Level, Link};

/// Bundle id for the edge between a child and one of its parents.
pub fn bundle_id(child: &str, parent: &str) -> String {
    format!("{child} <- {parent}")
}

/// Create one bundle per (child, parent) pair, level by level.
///
/// Fills `Level::bundles` and each child's `parent_bundles`.
pub fn form_bundles(nodes: &mut [LayoutNode], levels: &mut [Level]) -> Vec<Bundle> {
    let mut bundles: Vec<Bundle> = Vec::new();

    for (level_idx, level) in levels.iter_mut().enumerate() {
        let mut level_bundles: Vec<BundleIndex> = Vec::new();

        for &child in &level.nodes {
            let parents = nodes[child].parents.clone();
            for parent in parents {
                let index = bundles.len();
                bundles.push(Bundle {
                    id: bundle_id(&nodes[child].id, &nodes[parent].id),
                    child,
                    parents: vec![parent],
                    level: level_idx,
                    span: level_idx - nodes[parent].level,
                    i: level_bundles.len(),
                    x: 0.0,
                    y: 0.0,
                    links: Vec::new(),
                });
                level_bundles.push(index);
                nodes[child].parent_bundles.push(index);
            }
        }

        level.bundles = level_bundles;
    }

    bundles
}

/// One link per (node, parent) pair, registered on its bundle.
pub fn build_links(nodes: &[LayoutNode], bundles: &mut [Bundle]) -> Vec<Link> {
    let mut links = Vec::new();

    for (source, node) in nodes.iter().enumerate() {
        for (&target, &bundle) in node.parents.iter().zip(&node.parent_bundles) {
            bundles[bundle].links.push(links.len());
            links.push(Link {
                source,
                target,
                bundle,
                ..Default::default()
            });
        }
    }

    links
}

/// Register every bundle on each of its parents, then order each parent's
/// bundles by descending span. The sort is stable, so equal spans keep
/// discovery order.
pub fn index_fan_out(nodes: &mut [LayoutNode], bundles: &[Bundle]) {
    for (index, bundle) in bundles.iter().enumerate() {
        for &parent in &bundle.parents {
            if !nodes[parent].bundles_index.contains_key(&bundle.id) {
                nodes[parent].bundles_index.insert(bundle.id.clone(), 0);
                nodes[parent].bundles.push(index);
            }
        }
    }

    for node in nodes.iter_mut() {
        node.bundles
            .sort_by(|a, b| bundles[*b].span.cmp(&bundles[*a].span));
        for (slot, &bundle) in node.bundles.iter().enumerate() {
            node.bundles_index.insert(bundles[bundle].id.clone(), slot);
        }
    }
}
