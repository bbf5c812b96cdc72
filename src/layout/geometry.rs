//! Link control geometry and the curve each link is drawn with.

use std::fmt;

use super::engine::LayoutOptions;
use super::types::{Bundle, LayoutNode, Link};

/// One drawing instruction of a link curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    /// Quarter arc of `radius` ending at `(x, y)`.
    Arc {
        radius: f64,
        sweep: bool,
        x: f64,
        y: f64,
    },
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PathSegment::MoveTo(x, y) => write!(f, "M{x} {y}"),
            PathSegment::LineTo(x, y) => write!(f, "L{x} {y}"),
            PathSegment::Arc { radius, sweep, x, y } => {
                write!(f, "A{radius} {radius} 90 0 {} {x} {y}", u8::from(sweep))
            }
        }
    }
}

/// Vertical position where a link leaves its parent: the bundle's slot in the
/// parent's fan-out, centred on the parent tick.
pub fn target_y(target: &LayoutNode, bundle: &Bundle, metro_d: f64) -> f64 {
    let slot = target.bundles_index.get(&bundle.id).copied().unwrap_or(0);
    target.y + slot as f64 * metro_d - (target.bundles.len() as f64 * metro_d) / 2.0
        + metro_d / 2.0
}

/// Fill in endpoints, lane position and corner radii of every link.
pub fn route_links(
    links: &mut [Link],
    nodes: &[LayoutNode],
    bundles: &[Bundle],
    options: &LayoutOptions,
) {
    let c = options.c;

    for link in links.iter_mut() {
        let source = &nodes[link.source];
        let target = &nodes[link.target];
        let bundle = &bundles[link.bundle];

        link.xt = target.x;
        link.yt = target_y(target, bundle, options.metro_d);
        link.xb = bundle.x;
        link.yb = bundle.y;
        link.xs = source.x;
        link.ys = source.y;

        link.c1 = if source.level - target.level > 1 {
            let room = options
                .big_c
                .min(link.xb - link.xt)
                .min(link.yb - link.yt);
            (room - c).max(0.0)
        } else {
            c
        };
        link.c2 = c;
    }
}

impl Link {
    /// The S-shaped curve from the parent endpoint, through the bundle lane,
    /// to the child: line, arc, line, arc, line.
    pub fn path(&self) -> [PathSegment; 6] {
        [
            PathSegment::MoveTo(self.xt, self.yt),
            PathSegment::LineTo(self.xb - self.c1, self.yt),
            PathSegment::Arc {
                radius: self.c1,
                sweep: true,
                x: self.xb,
                y: self.yt + self.c1,
            },
            PathSegment::LineTo(self.xb, self.ys - self.c2),
            PathSegment::Arc {
                radius: self.c2,
                sweep: false,
                x: self.xb + self.c2,
                y: self.ys,
            },
            PathSegment::LineTo(self.xs, self.ys),
        ]
    }

    /// SVG path data for [`Link::path`].
    pub fn path_data(&self) -> String {
        self.path()
            .iter()
            .map(|segment| segment.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
