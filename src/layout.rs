//! Tangled tree layout of leveled DAGs.
//!
//! Nodes are laid out in columns by level. Every child -> parent edge gets
//! its own bundle, routed through a lane right of the parent's column and
//! drawn as an S-shaped curve.

mod bundles;
mod engine;
mod geometry;
mod placement;
mod resolve;
mod types;

pub use bundles::bundle_id;
pub use engine::{LayoutEngine, LayoutOptions, OptionsError, compute_layout};
pub use geometry::{PathSegment, target_y};
pub use types::{
    Bundle, BundleIndex, LayoutExtent, LayoutNode, LayoutWarning, Level, Link, LinkIndex,
    NodeIndex, NodeStub, TangleLayout,
};
