//! Data structures for layout computation.
//!
//! Nodes, bundles and links live in flat arenas on [`TangleLayout`] and refer
//! to each other by index.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub type NodeIndex = usize;
pub type BundleIndex = usize;
pub type LinkIndex = usize;

/// One entry of the leveled input: a node and the ids of its parents.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeStub {
    pub id: String,
    #[serde(default)]
    pub parents: Vec<String>,
    /// Display text; the id is shown when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// External reference opened by a modifier click.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl NodeStub {
    pub fn new(id: &str, parents: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            parents: parents.iter().map(|p| p.to_string()).collect(),
            label: None,
            url: None,
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }
}

/// A positioned node in the layout.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNode {
    pub id: String,
    pub label: Option<String>,
    pub url: Option<String>,
    pub level: usize,
    /// Resolved parents, all at a lower level.
    pub parents: Vec<NodeIndex>,
    /// Bundle carrying the edge to each parent, parallel to `parents`.
    pub parent_bundles: Vec<BundleIndex>,
    /// Bundles this node is a parent of, in stacking order.
    pub bundles: Vec<BundleIndex>,
    /// Bundle id -> stack slot within `bundles`.
    pub bundles_index: BTreeMap<String, usize>,
    pub height: f64,
    pub x: f64,
    pub y: f64,
}

impl LayoutNode {
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

/// Edges from one child to one parent, drawn as a single lane.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub id: String,
    pub child: NodeIndex,
    pub parents: Vec<NodeIndex>,
    /// Level of the child.
    pub level: usize,
    /// Child level minus the lowest parent level.
    pub span: usize,
    /// Index within the level's bundle list.
    pub i: usize,
    pub x: f64,
    pub y: f64,
    pub links: Vec<LinkIndex>,
}

/// A child -> parent edge with its curve control geometry.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// Child node.
    pub source: NodeIndex,
    /// Parent node.
    pub target: NodeIndex,
    pub bundle: BundleIndex,
    pub xt: f64,
    pub yt: f64,
    pub xb: f64,
    pub yb: f64,
    pub xs: f64,
    pub ys: f64,
    /// Corner radius at the parent side of the lane.
    pub c1: f64,
    /// Corner radius at the child side of the lane.
    pub c2: f64,
}

/// Node and bundle membership of one input level.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Level {
    pub nodes: Vec<NodeIndex>,
    pub bundles: Vec<BundleIndex>,
}

/// Canvas extent and the spacing the layout was computed with.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutExtent {
    pub width: f64,
    pub height: f64,
    pub node_width: f64,
    pub node_height: f64,
    pub bundle_width: f64,
    pub level_y_padding: f64,
    pub metro_d: f64,
}

/// Recoverable problems found while ingesting the leveled input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LayoutWarning {
    #[error("Node {node}: parent {parent} not found")]
    UnresolvedParent { node: String, parent: String },
    #[error("Node {node} (level {node_level}): parent {parent} is at level {parent_level}")]
    ParentNotLower {
        node: String,
        parent: String,
        node_level: usize,
        parent_level: usize,
    },
    #[error("Duplicate node id {id} at level {level}")]
    DuplicateNode { id: String, level: usize },
}

/// The complete layout result.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TangleLayout {
    pub levels: Vec<Level>,
    pub nodes: Vec<LayoutNode>,
    pub bundles: Vec<Bundle>,
    pub links: Vec<Link>,
    pub layout: LayoutExtent,
    pub warnings: Vec<LayoutWarning>,
    #[serde(skip)]
    pub(crate) node_lookup: HashMap<String, NodeIndex>,
}

impl TangleLayout {
    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_lookup.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.node_index(id).map(|i| &self.nodes[i])
    }

    pub fn bundle_by_id(&self, id: &str) -> Option<&Bundle> {
        self.bundles.iter().find(|b| b.id == id)
    }

    /// Parent ids of a node, in input order.
    pub fn parent_ids(&self, index: NodeIndex) -> Vec<&str> {
        self.nodes[index]
            .parents
            .iter()
            .map(|&p| self.nodes[p].id.as_str())
            .collect()
    }
}
