// Copyright 2025 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reference tree implementation: structure, updates, queries.

use alloc::vec::Vec;
use kurbo::{Point, Rect, RoundedRect, Shape, Vec2};

use crate::access::WidgetTree;
use crate::types::{LocalWidget, Visibility, WidgetFlags, WidgetId};

/// Arena-backed widget tree.
///
/// Widgets live in generational slots; removing a widget frees its slot and every
/// id handed out for it becomes stale. Bounds are relative to the parent and
/// absolute rectangles are derived on demand, so updates take effect immediately.
///
/// Removal here is purely structural. Hosts that route events must notify the
/// router (`widget_deregistered`) *before* calling [`Tree::remove`], while parent
/// links are still intact.
///
/// ## Example
///
/// ```rust
/// use kurbo::{Point, Rect};
/// use weft_tree::{LocalWidget, Tree, WidgetTree};
///
/// let mut tree = Tree::new();
/// let root = tree.insert(
///     None,
///     LocalWidget {
///         bounds: Rect::new(0.0, 0.0, 100.0, 100.0),
///         ..LocalWidget::default()
///     },
/// );
/// let child = tree.insert(
///     Some(root),
///     LocalWidget {
///         bounds: Rect::new(10.0, 10.0, 50.0, 50.0),
///         ..LocalWidget::default()
///     },
/// );
///
/// assert_eq!(tree.absolute_rect(child), Some(Rect::new(10.0, 10.0, 50.0, 50.0)));
/// assert_eq!(tree.child_at(root, Point::new(20.0, 20.0)), Some(child));
/// ```
#[derive(Clone, Default)]
pub struct Tree {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Tree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<WidgetId>,
    children: Vec<WidgetId>,
    local: LocalWidget,
}

impl Tree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new widget as the front-most child of `parent` (or as a root if `None`).
    pub fn insert(&mut self, parent: Option<WidgetId>, local: LocalWidget) -> WidgetId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node {
                generation,
                parent: None,
                children: Vec::new(),
                local,
            });
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node {
                generation,
                parent: None,
                children: Vec::new(),
                local,
            }));
            self.generations.push(generation);
            (self.nodes.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "WidgetId uses 32-bit indices by design."
        )]
        let id = WidgetId::from_raw(idx as u32, generation);
        if let Some(p) = parent
            && self.is_alive(p)
        {
            self.link_parent(id, p);
        }
        id
    }

    /// Remove a widget and its whole subtree.
    pub fn remove(&mut self, id: WidgetId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        let children = self.node(id).children.clone();
        for child in children {
            self.remove(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Move `id` under `new_parent` (front-most), or make it a root.
    pub fn reparent(&mut self, id: WidgetId, new_parent: Option<WidgetId>) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(p) = new_parent
            && (!self.is_alive(p) || self.is_ancestor_or_self(id, p))
        {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        if let Some(p) = new_parent {
            self.link_parent(id, p);
        }
    }

    /// Update bounds relative to the parent.
    pub fn set_bounds(&mut self, id: WidgetId, bounds: Rect) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.bounds = bounds;
        }
    }

    /// Update the z index among siblings.
    pub fn set_z_index(&mut self, id: WidgetId, z: i32) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.z_index = z;
        }
    }

    /// Replace all flags.
    pub fn set_flags(&mut self, id: WidgetId, flags: WidgetFlags) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.flags = flags;
        }
    }

    /// Toggle [`WidgetFlags::ACTIVE`].
    pub fn set_active(&mut self, id: WidgetId, active: bool) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.flags.set(WidgetFlags::ACTIVE, active);
        }
    }

    /// Update visibility.
    pub fn set_visibility(&mut self, id: WidgetId, visibility: Visibility) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.visibility = visibility;
        }
    }

    /// Set or clear the precise hit shape; toggles [`WidgetFlags::IRREGULAR`] accordingly.
    pub fn set_shape(&mut self, id: WidgetId, shape: Option<RoundedRect>) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.flags.set(WidgetFlags::IRREGULAR, shape.is_some());
            n.local.shape = shape;
        }
    }

    /// Local data of a live widget.
    pub fn local(&self, id: WidgetId) -> Option<&LocalWidget> {
        self.node_opt(id).map(|n| &n.local)
    }

    /// Number of live widgets.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Whether the tree has no live widgets.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // --- internals ---

    fn node(&self, id: WidgetId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling WidgetId")
    }

    fn node_mut(&mut self, id: WidgetId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling WidgetId")
    }

    fn node_opt(&self, id: WidgetId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.generation()).then_some(n)
    }

    fn node_opt_mut(&mut self, id: WidgetId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.generation() {
            return None;
        }
        Some(n)
    }

    fn link_parent(&mut self, id: WidgetId, parent: WidgetId) {
        self.node_mut(parent).children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: WidgetId, parent: WidgetId) {
        self.node_mut(parent).children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }
}

impl WidgetTree for Tree {
    fn is_alive(&self, id: WidgetId) -> bool {
        self.node_opt(id).is_some()
    }

    fn parent_of(&self, id: WidgetId) -> Option<WidgetId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    fn children_of(&self, id: WidgetId) -> &[WidgetId] {
        self.node_opt(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    fn absolute_rect(&self, id: WidgetId) -> Option<Rect> {
        let node = self.node_opt(id)?;
        let mut offset = Vec2::ZERO;
        let mut cur = node.parent;
        while let Some(p) = cur {
            let pn = self.node_opt(p)?;
            offset += pn.local.bounds.origin().to_vec2();
            cur = pn.parent;
        }
        Some(node.local.bounds + offset)
    }

    fn flags(&self, id: WidgetId) -> WidgetFlags {
        self.node_opt(id)
            .map(|n| n.local.flags)
            .unwrap_or(WidgetFlags::empty())
    }

    fn visibility(&self, id: WidgetId) -> Visibility {
        self.node_opt(id)
            .map(|n| n.local.visibility)
            .unwrap_or(Visibility::Gone)
    }

    fn z_index(&self, id: WidgetId) -> i32 {
        self.node_opt(id).map(|n| n.local.z_index).unwrap_or(0)
    }

    fn contains_point_irregular(&self, id: WidgetId, local: Point) -> bool {
        match self.node_opt(id).and_then(|n| n.local.shape) {
            Some(shape) => shape.contains(local),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn widget(x0: f64, y0: f64, x1: f64, y1: f64) -> LocalWidget {
        LocalWidget {
            bounds: Rect::new(x0, y0, x1, y1),
            ..LocalWidget::default()
        }
    }

    #[test]
    fn absolute_rect_accumulates_parent_origins() {
        let mut tree = Tree::new();
        let root = tree.insert(None, widget(10.0, 10.0, 210.0, 210.0));
        let a = tree.insert(Some(root), widget(20.0, 20.0, 120.0, 120.0));
        let b = tree.insert(Some(a), widget(5.0, 5.0, 15.0, 15.0));
        assert_eq!(tree.absolute_rect(b), Some(Rect::new(35.0, 35.0, 45.0, 45.0)));
    }

    #[test]
    fn child_at_prefers_higher_z_then_later_sibling() {
        let mut tree = Tree::new();
        let root = tree.insert(None, widget(0.0, 0.0, 200.0, 200.0));
        let a = tree.insert(Some(root), widget(0.0, 0.0, 100.0, 100.0));
        let b = tree.insert(Some(root), widget(50.0, 50.0, 150.0, 150.0));
        // Equal z: the later child is in front.
        assert_eq!(tree.child_at(root, Point::new(60.0, 60.0)), Some(b));
        tree.set_z_index(a, 5);
        assert_eq!(tree.child_at(root, Point::new(60.0, 60.0)), Some(a));
        assert_eq!(tree.child_at(root, Point::new(120.0, 120.0)), Some(b));
        assert_eq!(tree.child_at(root, Point::new(180.0, 10.0)), None);
    }

    #[test]
    fn child_at_skips_hidden_inactive_and_irregular_misses() {
        let mut tree = Tree::new();
        let root = tree.insert(None, widget(0.0, 0.0, 200.0, 200.0));
        let back = tree.insert(Some(root), widget(0.0, 0.0, 100.0, 100.0));
        let front = tree.insert(Some(root), widget(0.0, 0.0, 100.0, 100.0));

        tree.set_visibility(front, Visibility::Invisible);
        assert_eq!(tree.child_at(root, Point::new(10.0, 10.0)), Some(back));
        tree.set_visibility(front, Visibility::Visible);
        tree.set_active(front, false);
        assert_eq!(tree.child_at(root, Point::new(10.0, 10.0)), Some(back));
        tree.set_active(front, true);

        // A round shape misses the corner, so the sibling behind wins there.
        tree.set_shape(
            front,
            Some(RoundedRect::new(0.0, 0.0, 100.0, 100.0, 50.0)),
        );
        assert_eq!(tree.child_at(root, Point::new(2.0, 2.0)), Some(back));
        assert_eq!(tree.child_at(root, Point::new(50.0, 50.0)), Some(front));
    }

    #[test]
    fn remove_invalidates_subtree_and_reuses_slots() {
        let mut tree = Tree::new();
        let root = tree.insert(None, widget(0.0, 0.0, 10.0, 10.0));
        let a = tree.insert(Some(root), widget(0.0, 0.0, 5.0, 5.0));
        let b = tree.insert(Some(a), widget(0.0, 0.0, 1.0, 1.0));
        tree.remove(a);
        assert!(!tree.is_alive(a));
        assert!(!tree.is_alive(b));
        assert!(tree.children_of(root).is_empty());
        assert_eq!(tree.visibility(b), Visibility::Gone);
        assert_eq!(tree.flags(b), WidgetFlags::empty());

        let c = tree.insert(Some(root), widget(0.0, 0.0, 1.0, 1.0));
        assert_ne!(c, a);
        assert_ne!(c, b);
        assert!(!tree.is_alive(a));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn reparent_rejects_cycles() {
        let mut tree = Tree::new();
        let root = tree.insert(None, widget(0.0, 0.0, 10.0, 10.0));
        let a = tree.insert(Some(root), widget(0.0, 0.0, 5.0, 5.0));
        let b = tree.insert(Some(a), widget(0.0, 0.0, 1.0, 1.0));
        tree.reparent(a, Some(b));
        assert_eq!(tree.parent_of(a), Some(root));
        tree.reparent(b, Some(root));
        assert_eq!(tree.children_of(root), &[a, b]);
    }

    #[test]
    fn depth_first_traversal_stays_in_scope() {
        let mut tree = Tree::new();
        let root = tree.insert(None, widget(0.0, 0.0, 10.0, 10.0));
        let a = tree.insert(Some(root), widget(0.0, 0.0, 5.0, 5.0));
        let a1 = tree.insert(Some(a), widget(0.0, 0.0, 1.0, 1.0));
        let a2 = tree.insert(Some(a), widget(0.0, 0.0, 1.0, 1.0));
        let b = tree.insert(Some(root), widget(0.0, 0.0, 5.0, 5.0));

        let mut order = vec![root];
        let mut cur = root;
        while let Some(next) = tree.next_depth_first(root, cur) {
            order.push(next);
            cur = next;
        }
        assert_eq!(order, vec![root, a, a1, a2, b]);

        let mut back = vec![b];
        let mut cur = b;
        while let Some(prev) = tree.prev_depth_first(root, cur) {
            back.push(prev);
            cur = prev;
        }
        assert_eq!(back, vec![b, a2, a1, a, root]);

        // Scoped to `a`, traversal never reaches `b`.
        assert_eq!(tree.next_depth_first(a, a2), None);
        assert_eq!(tree.prev_depth_first(a, a), None);
    }

    #[test]
    fn interactive_within_checks_every_ancestor() {
        let mut tree = Tree::new();
        let root = tree.insert(None, widget(0.0, 0.0, 10.0, 10.0));
        let a = tree.insert(Some(root), widget(0.0, 0.0, 5.0, 5.0));
        let b = tree.insert(Some(a), widget(0.0, 0.0, 1.0, 1.0));
        assert!(tree.is_interactive_within(root, b));
        tree.set_visibility(a, Visibility::Gone);
        assert!(!tree.is_interactive_within(root, b));
        // `b` itself is still visible and active.
        assert!(tree.is_interactive(b));
        assert!(!tree.is_interactive_within(b, root));
    }
}
