//! Layout engine core implementation.

use serde::Deserialize;

use crate::measure::TextMetrics;

use super::bundles::{build_links, form_bundles, index_fan_out};
use super::geometry::route_links;
use super::placement::{canvas_extent, compress_vertical, place_bundles, place_nodes, size_nodes};
use super::resolve::{resolve_parents, stamp_levels};
use super::types::{NodeStub, TangleLayout};

/// Spacing and curve parameters of a tangle layout.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutOptions {
    /// Horizontal pitch per level; derived from the longest label when unset.
    pub node_width: Option<f64>,
    /// Vertical pitch per node.
    pub node_height: f64,
    pub padding: f64,
    /// Horizontal space reserved per bundle lane.
    pub bundle_width: f64,
    /// Extra vertical space before each level.
    pub level_y_padding: f64,
    /// Spacing between stacked edges leaving one node.
    pub metro_d: f64,
    /// Space kept between levels by the vertical compression pass.
    pub min_family_height: f64,
    /// Small corner radius.
    pub c: f64,
    /// Upper bound of the parent-side radius for edges spanning several levels.
    #[serde(alias = "bigc")]
    pub big_c: f64,
    pub compress_vertical: bool,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OptionsError {
    #[error("Layout option {name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },
    #[error("Layout option {name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },
}

impl LayoutOptions {
    /// Check that pitches are positive and spacings are non-negative. A zero
    /// node width would put consecutive levels on the same column.
    pub fn validate(&self) -> Result<(), OptionsError> {
        let positive = [
            ("nodeWidth", self.node_width.unwrap_or(1.0)),
            ("nodeHeight", self.node_height),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(OptionsError::NotPositive { name, value });
            }
        }

        let non_negative = [
            ("padding", self.padding),
            ("bundleWidth", self.bundle_width),
            ("levelYPadding", self.level_y_padding),
            ("metroD", self.metro_d),
            ("minFamilyHeight", self.min_family_height),
            ("c", self.c),
            ("bigC", self.big_c),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(OptionsError::Negative { name, value });
            }
        }

        Ok(())
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            node_width: None,
            node_height: 27.0,
            padding: 8.0,
            bundle_width: 14.0,
            level_y_padding: 0.0,
            metro_d: 4.0,
            min_family_height: 10.0,
            c: 16.0,
            big_c: 64.0,
            compress_vertical: false,
        }
    }
}

/// Layout engine configuration and computation.
///
/// The engine holds no state between calls; every call builds a fresh arena
/// from the input.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    pub(crate) options: LayoutOptions,
    pub(crate) metrics: TextMetrics,
}

impl LayoutEngine {
    pub fn new(options: LayoutOptions) -> Self {
        Self {
            options,
            metrics: TextMetrics::default(),
        }
    }

    pub fn with_metrics(mut self, metrics: TextMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Compute layout for the given levels. The input is only read.
    pub fn layout(&self, input: &[Vec<NodeStub>]) -> TangleLayout {
        let options = &self.options;
        let mut warnings = Vec::new();

        // Phase 1: level stamping and reference resolution
        let mut staged = stamp_levels(input, &mut warnings);
        resolve_parents(&mut staged, &mut warnings);
        let mut nodes = staged.nodes;
        let mut levels = staged.levels;

        // Phase 2: bundles, links and the parent -> bundle index
        let mut bundles = form_bundles(&mut nodes, &mut levels);
        let mut links = build_links(&nodes, &mut bundles);
        index_fan_out(&mut nodes, &bundles);

        // Phase 3: sizing and placement
        let node_width = options.node_width.unwrap_or_else(|| {
            self.metrics
                .node_width(nodes.iter().map(|n| n.display_label()))
        });
        size_nodes(&mut nodes, options.metro_d);
        place_nodes(&mut nodes, &levels, options, node_width);
        place_bundles(&mut bundles, &nodes, &levels, options, node_width);

        // Phase 4: link geometry
        route_links(&mut links, &nodes, &bundles, options);
        if options.compress_vertical {
            compress_vertical(&mut nodes, &levels, &bundles, &links, options);
            route_links(&mut links, &nodes, &bundles, options);
        }

        let layout = canvas_extent(&nodes, options, node_width);

        log::debug!(
            "tangle layout: {} nodes, {} bundles, {} links, {}x{}",
            nodes.len(),
            bundles.len(),
            links.len(),
            layout.width,
            layout.height
        );

        TangleLayout {
            levels,
            nodes,
            bundles,
            links,
            layout,
            warnings,
            node_lookup: staged.lookup,
        }
    }
}

/// Lay out `input` with `options`.
pub fn compute_layout(input: &[Vec<NodeStub>], options: &LayoutOptions) -> TangleLayout {
    LayoutEngine::new(options.clone()).layout(input)
}
