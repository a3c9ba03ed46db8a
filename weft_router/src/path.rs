// Copyright 2025 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Traversal paths: the root-to-leaf chain under a point.
//!
//! A [`TraversalPath`] lists the widgets hit by a screen position, outermost first,
//! together with the position localized to each of them. Paths are bounded by
//! [`MAX_PATH_DEPTH`] and stored inline.

use kurbo::Point;
use smallvec::SmallVec;
use weft_tree::{WidgetId, WidgetTree};

use crate::error::RoutingError;

/// Maximum number of widgets in a traversal path.
pub const MAX_PATH_DEPTH: usize = 32;

/// One widget of a traversal path.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PathEntry {
    /// The widget.
    pub widget: WidgetId,
    /// The hit point relative to the widget's absolute origin.
    pub local: Point,
}

/// Ordered chain of widgets from a scope root down to the deepest hit widget.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TraversalPath {
    entries: SmallVec<[PathEntry; MAX_PATH_DEPTH]>,
}

impl TraversalPath {
    /// An empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry below the current leaf.
    ///
    /// # Panics
    ///
    /// Panics when the path already holds [`MAX_PATH_DEPTH`] entries.
    pub fn push(&mut self, widget: WidgetId, local: Point) {
        if let Err(err) = self.try_push(widget, local) {
            panic!("{err}");
        }
    }

    /// Append an entry below the current leaf, failing past [`MAX_PATH_DEPTH`].
    pub fn try_push(&mut self, widget: WidgetId, local: Point) -> Result<(), RoutingError> {
        if self.entries.len() >= MAX_PATH_DEPTH {
            return Err(RoutingError::PathTooDeep {
                max: MAX_PATH_DEPTH,
            });
        }
        self.entries.push(PathEntry { widget, local });
        Ok(())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was hit.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries, outermost first.
    pub fn entries(&self) -> &[PathEntry] {
        &self.entries
    }

    /// Outermost entry.
    pub fn root(&self) -> Option<&PathEntry> {
        self.entries.first()
    }

    /// Deepest entry.
    pub fn leaf(&self) -> Option<&PathEntry> {
        self.entries.last()
    }

    /// Widgets, outermost first.
    pub fn widgets(&self) -> impl DoubleEndedIterator<Item = WidgetId> + '_ {
        self.entries.iter().map(|e| e.widget)
    }

    /// Index of `widget` in the path.
    pub fn position(&self, widget: WidgetId) -> Option<usize> {
        self.entries.iter().position(|e| e.widget == widget)
    }

    /// Whether `widget` is on the path.
    pub fn contains(&self, widget: WidgetId) -> bool {
        self.position(widget).is_some()
    }

    /// Keep only the first `len` entries.
    pub fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    /// Drop the entries above `index`, making the entry at `index` the new root.
    pub fn rebase(&mut self, index: usize) {
        let index = index.min(self.entries.len());
        self.entries.drain(..index);
    }
}

/// Screen-space `point` relative to the absolute origin of `id`.
///
/// Falls back to the screen position for widgets without a rectangle.
pub fn local_point<T>(tree: &T, id: WidgetId, point: Point) -> Point
where
    T: WidgetTree + ?Sized,
{
    match tree.absolute_rect(id) {
        Some(rect) => point - rect.origin().to_vec2(),
        None => point,
    }
}

/// Whether `widget` is on `path` and it and every entry above it are still
/// interactive.
pub(crate) fn reachable<T>(tree: &T, path: &TraversalPath, widget: WidgetId) -> bool
where
    T: WidgetTree + ?Sized,
{
    let Some(index) = path.position(widget) else {
        return false;
    };
    path.entries()[..=index]
        .iter()
        .all(|e| tree.is_interactive(e.widget))
}

/// Hit-test `point` starting at `root`.
///
/// The root must be interactive and contain the point; each step then descends
/// into [`WidgetTree::child_at`]. The result is empty when the root is missed.
///
/// # Panics
///
/// Panics when the hit chain is deeper than [`MAX_PATH_DEPTH`].
///
/// ```
/// use kurbo::{Point, Rect};
/// use weft_router::path::hit_test;
/// use weft_tree::{LocalWidget, Tree};
///
/// let mut tree = Tree::new();
/// let root = tree.insert(None, LocalWidget {
///     bounds: Rect::new(0.0, 0.0, 100.0, 100.0),
///     ..LocalWidget::default()
/// });
/// let child = tree.insert(Some(root), LocalWidget {
///     bounds: Rect::new(10.0, 10.0, 50.0, 50.0),
///     ..LocalWidget::default()
/// });
///
/// let path = hit_test(&tree, root, Point::new(20.0, 30.0));
/// assert_eq!(path.widgets().collect::<Vec<_>>(), vec![root, child]);
/// assert_eq!(path.leaf().unwrap().local, Point::new(10.0, 20.0));
/// assert!(hit_test(&tree, root, Point::new(200.0, 0.0)).is_empty());
/// ```
pub fn hit_test<T>(tree: &T, root: WidgetId, point: Point) -> TraversalPath
where
    T: WidgetTree + ?Sized,
{
    if !tree.is_interactive(root) || !tree.contains_point(root, point) {
        return TraversalPath::new();
    }
    descend(tree, root, point)
}

/// Hit-test `point` below `root` without requiring `root` to contain it.
///
/// Used for a modal root, which receives every pointer event in its scope.
pub fn hit_test_unbounded<T>(tree: &T, root: WidgetId, point: Point) -> TraversalPath
where
    T: WidgetTree + ?Sized,
{
    if !tree.is_interactive(root) {
        return TraversalPath::new();
    }
    descend(tree, root, point)
}

fn descend<T>(tree: &T, root: WidgetId, point: Point) -> TraversalPath
where
    T: WidgetTree + ?Sized,
{
    let mut path = TraversalPath::new();
    let mut cur = root;
    loop {
        let local = local_point(tree, cur, point);
        path.push(cur, local);
        match tree.child_at(cur, local) {
            Some(child) => cur = child,
            None => return path,
        }
    }
}

/// Chain from `widget` up to `scope` (or the tree root if `scope` is not an
/// ancestor), outermost first, localized to `point`.
///
/// This is the path events take when they target a known widget rather than a
/// hit point: captured pointers and keyboard focus.
///
/// # Panics
///
/// Panics when the chain is deeper than [`MAX_PATH_DEPTH`].
pub fn chain_to<T>(tree: &T, widget: WidgetId, scope: Option<WidgetId>, point: Point) -> TraversalPath
where
    T: WidgetTree + ?Sized,
{
    let mut chain: SmallVec<[WidgetId; MAX_PATH_DEPTH]> = SmallVec::new();
    if !tree.is_alive(widget) {
        return TraversalPath::new();
    }
    let mut cur = Some(widget);
    while let Some(id) = cur {
        chain.push(id);
        if Some(id) == scope {
            break;
        }
        cur = tree.parent_of(id);
    }
    let mut path = TraversalPath::new();
    for &id in chain.iter().rev() {
        path.push(id, local_point(tree, id, point));
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use kurbo::Rect;
    use weft_tree::{LocalWidget, Tree, Visibility};

    fn widget(x0: f64, y0: f64, x1: f64, y1: f64) -> LocalWidget {
        LocalWidget {
            bounds: Rect::new(x0, y0, x1, y1),
            ..LocalWidget::default()
        }
    }

    #[test]
    fn hit_path_localizes_each_entry() {
        let mut tree = Tree::new();
        let a = tree.insert(None, widget(0.0, 0.0, 300.0, 300.0));
        let b = tree.insert(Some(a), widget(50.0, 50.0, 250.0, 250.0));
        let c = tree.insert(Some(b), widget(25.0, 25.0, 125.0, 125.0));

        let path = hit_test(&tree, a, Point::new(100.0, 100.0));
        assert_eq!(path.widgets().collect::<Vec<_>>(), [a, b, c]);
        let locals: Vec<Point> = path.entries().iter().map(|e| e.local).collect();
        assert_eq!(
            locals,
            [
                Point::new(100.0, 100.0),
                Point::new(50.0, 50.0),
                Point::new(25.0, 25.0)
            ]
        );
    }

    #[test]
    fn hidden_subtrees_are_not_entered() {
        let mut tree = Tree::new();
        let a = tree.insert(None, widget(0.0, 0.0, 300.0, 300.0));
        let b = tree.insert(Some(a), widget(50.0, 50.0, 250.0, 250.0));
        let _c = tree.insert(Some(b), widget(25.0, 25.0, 125.0, 125.0));
        tree.set_visibility(b, Visibility::Invisible);

        let path = hit_test(&tree, a, Point::new(100.0, 100.0));
        assert_eq!(path.widgets().collect::<Vec<_>>(), [a]);

        tree.set_active(a, false);
        assert!(hit_test(&tree, a, Point::new(100.0, 100.0)).is_empty());
    }

    #[test]
    fn unbounded_hit_keeps_the_root() {
        let mut tree = Tree::new();
        let root = tree.insert(None, widget(0.0, 0.0, 10.0, 10.0));
        let path = hit_test_unbounded(&tree, root, Point::new(500.0, 500.0));
        assert_eq!(path.widgets().collect::<Vec<_>>(), [root]);
    }

    #[test]
    fn chain_stops_at_scope() {
        let mut tree = Tree::new();
        let a = tree.insert(None, widget(0.0, 0.0, 300.0, 300.0));
        let b = tree.insert(Some(a), widget(50.0, 50.0, 250.0, 250.0));
        let c = tree.insert(Some(b), widget(25.0, 25.0, 125.0, 125.0));

        let full = chain_to(&tree, c, None, Point::ZERO);
        assert_eq!(full.widgets().collect::<Vec<_>>(), [a, b, c]);
        let scoped = chain_to(&tree, c, Some(b), Point::ZERO);
        assert_eq!(scoped.widgets().collect::<Vec<_>>(), [b, c]);
        assert_eq!(scoped.root().unwrap().local, Point::new(-50.0, -50.0));
    }

    #[test]
    fn rebase_and_truncate() {
        let mut tree = Tree::new();
        let a = tree.insert(None, widget(0.0, 0.0, 300.0, 300.0));
        let b = tree.insert(Some(a), widget(0.0, 0.0, 300.0, 300.0));
        let c = tree.insert(Some(b), widget(0.0, 0.0, 300.0, 300.0));
        let mut path = hit_test(&tree, a, Point::new(1.0, 1.0));
        path.rebase(1);
        assert_eq!(path.widgets().collect::<Vec<_>>(), [b, c]);
        path.truncate(1);
        assert_eq!(path.widgets().collect::<Vec<_>>(), [b]);
    }

    #[test]
    fn overflow_is_reported() {
        let mut path = TraversalPath::new();
        let id = WidgetId::from_raw(0, 0);
        for _ in 0..MAX_PATH_DEPTH {
            path.try_push(id, Point::ZERO).unwrap();
        }
        assert_eq!(
            path.try_push(id, Point::ZERO),
            Err(RoutingError::PathTooDeep {
                max: MAX_PATH_DEPTH
            })
        );
    }

    #[test]
    #[should_panic(expected = "maximum depth")]
    fn deep_tree_hit_test_panics() {
        let mut tree = Tree::new();
        let root = tree.insert(None, widget(0.0, 0.0, 100.0, 100.0));
        let mut parent = root;
        for _ in 0..MAX_PATH_DEPTH {
            parent = tree.insert(Some(parent), widget(0.0, 0.0, 100.0, 100.0));
        }
        let _ = hit_test(&tree, root, Point::new(1.0, 1.0));
    }
}
