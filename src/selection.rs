//! Hover/lock selection over a computed layout and the ancestor/descendant
//! sets it highlights.

use std::collections::{BTreeSet, HashSet};

use crate::layout::{NodeIndex, TangleLayout};

/// Hop bound of the ancestor/descendant walks.
pub const MAX_HOPS: usize = 10;

/// Breadth-first walk from `start`, at most `max_hops` steps deep. The start
/// node is not part of the result.
fn walk<F>(layout: &TangleLayout, start: NodeIndex, max_hops: usize, next: F) -> BTreeSet<NodeIndex>
where
    F: Fn(&TangleLayout, NodeIndex) -> Vec<NodeIndex>,
{
    let mut seen: HashSet<NodeIndex> = HashSet::from([start]);
    let mut found = BTreeSet::new();
    let mut frontier = vec![start];

    for _ in 0..max_hops {
        let mut next_frontier = Vec::new();
        for &node in &frontier {
            for reached in next(layout, node) {
                if seen.insert(reached) {
                    found.insert(reached);
                    next_frontier.push(reached);
                }
            }
        }
        if next_frontier.is_empty() {
            break;
        }
        frontier = next_frontier;
    }

    found
}

/// Prerequisites of a node, transitively: the parents of every bundle the
/// node is the child of.
pub fn ancestors(layout: &TangleLayout, start: NodeIndex, max_hops: usize) -> BTreeSet<NodeIndex> {
    walk(layout, start, max_hops, |layout, node| {
        layout.nodes[node]
            .parent_bundles
            .iter()
            .flat_map(|&b| layout.bundles[b].parents.iter().copied())
            .collect()
    })
}

/// Courses requiring a node, transitively: the children of every bundle the
/// node is a parent of.
pub fn descendants(
    layout: &TangleLayout,
    start: NodeIndex,
    max_hops: usize,
) -> BTreeSet<NodeIndex> {
    walk(layout, start, max_hops, |layout, node| {
        layout.nodes[node]
            .bundles
            .iter()
            .map(|&b| layout.bundles[b].child)
            .collect()
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    Hovering(String),
    Locked(String),
}

/// How a node was clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Click {
    #[default]
    Plain,
    /// Ctrl/Cmd click: opens the node's external reference instead of
    /// changing the selection.
    Modified,
}

/// What a selection event asks of the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEffect {
    Unchanged,
    /// Highlighting changed; redraw styles.
    Changed,
    OpenReference { id: String, url: Option<String> },
}

/// Role of a node under the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    /// Nothing is selected.
    Neutral,
    Focus,
    Ancestor,
    Descendant,
    Unrelated,
}

/// Selection state of one visualization session.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    state: SelectionState,
    ancestor_ids: BTreeSet<String>,
    descendant_ids: BTreeSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Hovered or locked node id.
    pub fn current(&self) -> Option<&str> {
        match &self.state {
            SelectionState::Idle => None,
            SelectionState::Hovering(id) | SelectionState::Locked(id) => Some(id),
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self.state, SelectionState::Locked(_))
    }

    pub fn ancestor_ids(&self) -> &BTreeSet<String> {
        &self.ancestor_ids
    }

    pub fn descendant_ids(&self) -> &BTreeSet<String> {
        &self.descendant_ids
    }

    pub fn highlight(&self, id: &str) -> Highlight {
        match self.current() {
            None => Highlight::Neutral,
            Some(current) if current == id => Highlight::Focus,
            Some(_) if self.ancestor_ids.contains(id) => Highlight::Ancestor,
            Some(_) if self.descendant_ids.contains(id) => Highlight::Descendant,
            Some(_) => Highlight::Unrelated,
        }
    }

    /// Pointer entered a node. Ignored while locked or for unknown ids.
    pub fn pointer_enter(&mut self, layout: &TangleLayout, id: &str) -> SelectionEffect {
        if self.is_locked() {
            return SelectionEffect::Unchanged;
        }
        if self.current() == Some(id) {
            return SelectionEffect::Unchanged;
        }
        let Some(index) = layout.node_index(id) else {
            log::debug!("pointer entered unknown node {}", id);
            return SelectionEffect::Unchanged;
        };

        self.focus(layout, index);
        self.state = SelectionState::Hovering(id.to_string());
        SelectionEffect::Changed
    }

    /// Pointer left the hovered node.
    pub fn pointer_leave(&mut self) -> SelectionEffect {
        match self.state {
            SelectionState::Hovering(_) => {
                self.clear();
                SelectionEffect::Changed
            }
            _ => SelectionEffect::Unchanged,
        }
    }

    /// Click on a node. A plain click locks the hovered selection or releases
    /// a locked one; a modified click only reports the node's reference.
    pub fn click(&mut self, layout: &TangleLayout, id: &str, click: Click) -> SelectionEffect {
        if click == Click::Modified {
            return match layout.node(id) {
                Some(node) => SelectionEffect::OpenReference {
                    id: node.id.clone(),
                    url: node.url.clone(),
                },
                None => SelectionEffect::Unchanged,
            };
        }

        match &self.state {
            SelectionState::Idle => SelectionEffect::Unchanged,
            SelectionState::Hovering(hovered) => {
                if hovered != id {
                    let Some(index) = layout.node_index(id) else {
                        return SelectionEffect::Unchanged;
                    };
                    self.focus(layout, index);
                }
                self.state = SelectionState::Locked(id.to_string());
                SelectionEffect::Changed
            }
            SelectionState::Locked(_) => {
                self.clear();
                SelectionEffect::Changed
            }
        }
    }

    fn focus(&mut self, layout: &TangleLayout, index: NodeIndex) {
        let ids = |set: BTreeSet<NodeIndex>| -> BTreeSet<String> {
            set.into_iter().map(|i| layout.nodes[i].id.clone()).collect()
        };
        self.ancestor_ids = ids(ancestors(layout, index, MAX_HOPS));
        self.descendant_ids = ids(descendants(layout, index, MAX_HOPS));
    }

    fn clear(&mut self) {
        self.state = SelectionState::Idle;
        self.ancestor_ids.clear();
        self.descendant_ids.clear();
    }
}
