//! Node sizing and coordinate assignment.

use super::engine::LayoutOptions;
use super::types::{Bundle, LayoutExtent, LayoutNode, Level, Link};

/// A node's tick grows by `metro_d` for every fan-out bundle past the first.
pub fn size_nodes(nodes: &mut [LayoutNode], metro_d: f64) {
    for node in nodes.iter_mut() {
        node.height = (node.bundles.len().max(1) - 1) as f64 * metro_d;
    }
}

/// Place nodes level by level. Each level is shifted right by the lanes
/// reserved for its bundles; nodes stack top to bottom across all levels.
pub fn place_nodes(
    nodes: &mut [LayoutNode],
    levels: &[Level],
    options: &LayoutOptions,
    node_width: f64,
) {
    let mut x_offset = options.padding;
    let mut y_offset = options.padding;

    for (level_idx, level) in levels.iter().enumerate() {
        x_offset += level.bundles.len() as f64 * options.bundle_width;
        y_offset += options.level_y_padding;

        for &index in &level.nodes {
            let node = &mut nodes[index];
            node.x = level_idx as f64 * node_width + x_offset;
            node.y = options.node_height + y_offset + node.height / 2.0;
            y_offset += options.node_height + node.height;
        }
    }
}

/// Place each bundle's lane right of its rightmost parent. Higher-index
/// bundles of a level sit closer to the level boundary.
pub fn place_bundles(
    bundles: &mut [Bundle],
    nodes: &[LayoutNode],
    levels: &[Level],
    options: &LayoutOptions,
    node_width: f64,
) {
    let mut rows = 0usize;

    for level in levels {
        let count = level.bundles.len();
        for &index in &level.bundles {
            let bundle = &mut bundles[index];
            let parent_x = bundle
                .parents
                .iter()
                .map(|&p| nodes[p].x)
                .fold(f64::NEG_INFINITY, f64::max);
            bundle.x =
                parent_x + node_width + (count - 1 - bundle.i) as f64 * options.bundle_width;
            bundle.y = rows as f64 * options.node_height;
        }
        rows += level.nodes.len();
    }
}

/// Pull each level up by the slack between its links' endpoints, keeping
/// `min_family_height` of it. Nodes sitting above a level's tightest link
/// move with it, so the whole layout is then shifted back down until its
/// topmost node starts no higher than an uncompressed first row would.
/// Link geometry must be recomputed afterwards.
pub fn compress_vertical(
    nodes: &mut [LayoutNode],
    levels: &[Level],
    bundles: &[Bundle],
    links: &[Link],
    options: &LayoutOptions,
) {
    let c = options.c;
    let mut negative_offset = 0.0;

    for level in levels {
        let slack = level
            .bundles
            .iter()
            .flat_map(|&b| &bundles[b].links)
            .map(|&l| links[l].ys - 2.0 * c - (links[l].yt + c))
            .reduce(f64::min);

        if let Some(slack) = slack {
            negative_offset += slack - options.min_family_height;
        }
        for &index in &level.nodes {
            nodes[index].y -= negative_offset;
        }
    }

    let top = nodes
        .iter()
        .map(|n| n.y - n.height / 2.0)
        .fold(f64::INFINITY, f64::min);
    let floor = options.padding + options.node_height;
    if top < floor {
        for node in nodes.iter_mut() {
            node.y += floor - top;
        }
    }
}

/// Canvas size covering every node plus padding. Empty input yields a
/// zero-size canvas.
pub fn canvas_extent(nodes: &[LayoutNode], options: &LayoutOptions, node_width: f64) -> LayoutExtent {
    let mut extent = LayoutExtent {
        width: 0.0,
        height: 0.0,
        node_width,
        node_height: options.node_height,
        bundle_width: options.bundle_width,
        level_y_padding: options.level_y_padding,
        metro_d: options.metro_d,
    };

    if nodes.is_empty() {
        return extent;
    }

    let max_x = nodes.iter().map(|n| n.x).fold(f64::NEG_INFINITY, f64::max);
    let max_y = nodes.iter().map(|n| n.y).fold(f64::NEG_INFINITY, f64::max);
    extent.width = max_x + node_width + 2.0 * options.padding;
    extent.height = max_y + options.node_height / 2.0 + 2.0 * options.padding;
    extent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::bundles::{build_links, form_bundles, index_fan_out};
    use crate::layout::resolve::{resolve_parents, stamp_levels};
    use crate::layout::types::NodeStub;

    fn staged(input: &[Vec<NodeStub>]) -> (Vec<LayoutNode>, Vec<Level>, Vec<Bundle>) {
        let mut warnings = Vec::new();
        let mut staged = stamp_levels(input, &mut warnings);
        resolve_parents(&mut staged, &mut warnings);
        let mut nodes = staged.nodes;
        let mut levels = staged.levels;
        let mut bundles = form_bundles(&mut nodes, &mut levels);
        build_links(&nodes, &mut bundles);
        index_fan_out(&mut nodes, &bundles);
        (nodes, levels, bundles)
    }

    fn fan_out_input() -> Vec<Vec<NodeStub>> {
        vec![
            vec![NodeStub::new("P", &[]), NodeStub::new("Q", &[])],
            vec![
                NodeStub::new("X", &["P"]),
                NodeStub::new("Y", &["P"]),
                NodeStub::new("Z", &["P", "Q"]),
            ],
        ]
    }

    #[test]
    fn test_node_heights() {
        let (mut nodes, _, _) = staged(&fan_out_input());
        size_nodes(&mut nodes, 4.0);

        assert_eq!(nodes[0].height, 8.0); // P: three bundles
        assert_eq!(nodes[1].height, 0.0); // Q: one bundle
        assert_eq!(nodes[2].height, 0.0); // X: none
    }

    #[test]
    fn test_place_nodes() {
        let options = LayoutOptions::default();
        let (mut nodes, levels, _) = staged(&fan_out_input());
        size_nodes(&mut nodes, options.metro_d);
        place_nodes(&mut nodes, &levels, &options, 100.0);

        // level 0 has no bundles, level 1 reserves four lanes
        assert_eq!(nodes[0].x, options.padding);
        assert_eq!(nodes[2].x, 100.0 + options.padding + 4.0 * options.bundle_width);

        // P is 8 tall, centred below the first row
        assert_eq!(nodes[0].y, options.padding + options.node_height + 4.0);
        let q_y = options.padding + options.node_height + 8.0 + options.node_height;
        assert_eq!(nodes[1].y, q_y);
        assert!(nodes[2].y > nodes[1].y);
        assert!(nodes[3].y > nodes[2].y);
    }

    #[test]
    fn test_place_bundles_reserves_lanes_right_to_left() {
        let options = LayoutOptions::default();
        let (mut nodes, levels, mut bundles) = staged(&fan_out_input());
        size_nodes(&mut nodes, options.metro_d);
        place_nodes(&mut nodes, &levels, &options, 100.0);
        place_bundles(&mut bundles, &nodes, &levels, &options, 100.0);

        let p_x = nodes[0].x;
        assert_eq!(bundles[0].x, p_x + 100.0 + 3.0 * options.bundle_width);
        assert_eq!(bundles[3].x, nodes[1].x + 100.0);
        // level 1 bundles start after the two rows of level 0
        assert!(bundles.iter().all(|b| b.y == 2.0 * options.node_height));
    }

    #[test]
    fn test_canvas_extent() {
        let options = LayoutOptions::default();
        let (mut nodes, levels, _) = staged(&fan_out_input());
        size_nodes(&mut nodes, options.metro_d);
        place_nodes(&mut nodes, &levels, &options, 100.0);
        let extent = canvas_extent(&nodes, &options, 100.0);

        let max_x = nodes.iter().map(|n| n.x).fold(0.0, f64::max);
        let max_y = nodes.iter().map(|n| n.y).fold(0.0, f64::max);
        assert_eq!(extent.width, max_x + 100.0 + 2.0 * options.padding);
        assert_eq!(extent.height, max_y + options.node_height / 2.0 + 2.0 * options.padding);
        assert_eq!(extent.node_width, 100.0);
    }

    #[test]
    fn test_empty_canvas() {
        let options = LayoutOptions::default();
        let extent = canvas_extent(&[], &options, 100.0);
        assert_eq!(extent.width, 0.0);
        assert_eq!(extent.height, 0.0);
    }
}
