use crate::layout::{LayoutNode, TangleLayout};
use crate::selection::{Highlight, Selection};
use std::collections::HashMap;
use std::fmt::{self, Write};

/// Categorical palette (ColorBrewer Dark2).
const DARK2: [&str; 8] = [
    "#1b9e77", "#d95f02", "#7570b3", "#e7298a", "#66a61e", "#e6ab02", "#a6761d", "#666666",
];

pub struct SvgRenderer {
    pub background: String,
    pub palette: Vec<String>,
    pub font_size: f64,
    /// Halo drawn under each link so crossing lanes stay readable.
    pub halo_width: f64,
    pub link_width: f64,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            background: "white".to_string(),
            palette: DARK2.iter().map(|c| c.to_string()).collect(),
            font_size: 10.0,
            halo_width: 5.0,
            link_width: 2.0,
        }
    }
}

impl SvgRenderer {
    pub fn render(&self, layout: &TangleLayout, selection: Option<&Selection>) -> String {
        let mut svg = String::new();
        self.write_document(&mut svg, layout, selection).unwrap();
        svg
    }

    fn write_document(
        &self,
        svg: &mut String,
        layout: &TangleLayout,
        selection: Option<&Selection>,
    ) -> fmt::Result {
        let extent = &layout.layout;
        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            extent.width, extent.height, extent.width, extent.height
        )?;

        writeln!(
            svg,
            r#"<style>
  text {{ font-family: sans-serif; font-size: {}px; }}
  .node {{ stroke-linecap: round; }}
  .link {{ fill: none; }}
  .dimmed {{ opacity: 0.15; }}
  .highlighted {{ stroke-width: 3; }}
  .focus {{ font-weight: bold; }}
</style>"#,
            self.font_size
        )?;

        writeln!(
            svg,
            r#"<rect width="{}" height="{}" fill="{}" />"#,
            extent.width,
            extent.height,
            escape_xml(&self.background)
        )?;

        let colors = self.bundle_colors(layout);
        let selection = selection.filter(|s| s.current().is_some());

        // Links first (behind nodes)
        for (index, bundle) in layout.bundles.iter().enumerate() {
            let d = bundle
                .links
                .iter()
                .map(|&l| layout.links[l].path_data())
                .collect::<Vec<_>>()
                .join(" ");
            if d.is_empty() {
                continue;
            }

            let state = match selection {
                None => "",
                Some(selection) => {
                    let child = selection.highlight(&layout.nodes[bundle.child].id);
                    let on_path = bundle.parents.iter().all(|&p| {
                        on_selected_path(selection.highlight(&layout.nodes[p].id), child)
                    });
                    if on_path { " highlighted" } else { " dimmed" }
                }
            };

            writeln!(
                svg,
                r#"<path class="link{}" d="{}" stroke="{}" stroke-width="{}" />"#,
                state,
                d,
                escape_xml(&self.background),
                self.halo_width
            )?;
            writeln!(
                svg,
                r#"<path class="link{}" d="{}" stroke="{}" stroke-width="{}" />"#,
                state, d, colors[index], self.link_width
            )?;
        }

        for node in &layout.nodes {
            let highlight = selection.map_or(Highlight::Neutral, |s| s.highlight(&node.id));
            self.write_node(svg, node, highlight)?;
        }

        writeln!(svg, "</svg>")
    }

    fn write_node(&self, svg: &mut String, node: &LayoutNode, highlight: Highlight) -> fmt::Result {
        let class = match highlight {
            Highlight::Neutral => "",
            Highlight::Focus => " focus",
            Highlight::Ancestor | Highlight::Descendant => " highlighted",
            Highlight::Unrelated => " dimmed",
        };
        let id = escape_xml(&node.id);
        let label = escape_xml(node.display_label());
        let top = node.y - node.height / 2.0;
        let bottom = node.y + node.height / 2.0;
        let url = node
            .url
            .as_deref()
            .map(|u| format!(r#" data-url="{}""#, escape_xml(u)))
            .unwrap_or_default();

        writeln!(svg, r#"<g class="course{class}" data-id="{id}"{url}>"#)?;
        writeln!(
            svg,
            r#"<path class="selectable node" data-id="{}" stroke="black" stroke-width="8" d="M{} {} L{} {}" />"#,
            id, node.x, top, node.x, bottom
        )?;
        writeln!(
            svg,
            r#"<path class="node" stroke="white" stroke-width="4" d="M{} {} L{} {}" />"#,
            node.x, top, node.x, bottom
        )?;

        let text_x = node.x + 4.0;
        let text_y = top - 4.0;
        writeln!(
            svg,
            r#"<text class="selectable" data-id="{}" x="{}" y="{}" stroke="{}" stroke-width="2">{}</text>"#,
            id,
            text_x,
            text_y,
            escape_xml(&self.background),
            label
        )?;
        writeln!(
            svg,
            r#"<text x="{}" y="{}" style="pointer-events: none">{}</text>"#,
            text_x, text_y, label
        )?;
        writeln!(svg, "</g>")
    }

    /// Ordinal colour per bundle, keyed by the bundle's first parent.
    fn bundle_colors(&self, layout: &TangleLayout) -> Vec<String> {
        let mut slots: HashMap<usize, usize> = HashMap::new();
        layout
            .bundles
            .iter()
            .map(|bundle| {
                let key = bundle.parents.first().copied().unwrap_or(bundle.child);
                let next = slots.len();
                let slot = *slots.entry(key).or_insert(next);
                match self.palette.len() {
                    0 => "black".to_string(),
                    n => escape_xml(&self.palette[slot % n]),
                }
            })
            .collect()
    }
}

/// An edge is on a selected path when it leads into or out of the focus, or
/// joins two ancestors or two descendants.
fn on_selected_path(parent: Highlight, child: Highlight) -> bool {
    matches!(
        (parent, child),
        (Highlight::Ancestor, Highlight::Focus | Highlight::Ancestor)
            | (Highlight::Focus | Highlight::Descendant, Highlight::Descendant)
    )
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
