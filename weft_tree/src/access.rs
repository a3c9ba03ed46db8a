// Copyright 2025 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The structural capability surface consumed by the router.

use kurbo::{Point, Rect};

use crate::types::{Visibility, WidgetFlags, WidgetId};

/// Read-only view of a widget tree.
///
/// This is the structural half of what the router needs from its host: identity,
/// parent/child links, absolute geometry, and activity/visibility. Delivery of
/// events is a separate concern handled by the router's target traits.
///
/// All methods must tolerate stale ids: `is_alive` returns `false`, `parent_of`
/// and `absolute_rect` return `None`, `children_of` returns an empty slice,
/// `flags` returns empty flags, and `visibility` returns [`Visibility::Gone`].
///
/// The provided methods implement hit-testing and depth-first traversal on top of
/// the required ones; hosts may override them (for example to consult a spatial
/// index in `child_at`).
pub trait WidgetTree {
    /// Whether `id` refers to a live widget.
    fn is_alive(&self, id: WidgetId) -> bool;

    /// Parent of a live widget, or `None` for roots and stale ids.
    fn parent_of(&self, id: WidgetId) -> Option<WidgetId>;

    /// Children of a live widget in back-to-front insertion order.
    fn children_of(&self, id: WidgetId) -> &[WidgetId];

    /// Absolute (screen-space) rectangle of a live widget.
    fn absolute_rect(&self, id: WidgetId) -> Option<Rect>;

    /// Flags of a widget; empty for stale ids.
    fn flags(&self, id: WidgetId) -> WidgetFlags;

    /// Visibility of a widget; [`Visibility::Gone`] for stale ids.
    fn visibility(&self, id: WidgetId) -> Visibility;

    /// Z-order among siblings. Higher is in front.
    fn z_index(&self, _id: WidgetId) -> i32 {
        0
    }

    /// Precise shape test for widgets flagged [`WidgetFlags::IRREGULAR`].
    ///
    /// `local` is relative to the widget's absolute origin. Only called once the
    /// rectangle test has passed.
    fn contains_point_irregular(&self, _id: WidgetId, _local: Point) -> bool {
        true
    }

    /// Whether the widget has [`WidgetFlags::ACTIVE`].
    fn is_active(&self, id: WidgetId) -> bool {
        self.flags(id).contains(WidgetFlags::ACTIVE)
    }

    /// Whether the widget itself is [`Visibility::Visible`].
    fn is_visible(&self, id: WidgetId) -> bool {
        self.visibility(id).is_visible()
    }

    /// Alive, visible, and active.
    fn is_interactive(&self, id: WidgetId) -> bool {
        self.is_alive(id) && self.is_visible(id) && self.is_active(id)
    }

    /// Whether `id` and every ancestor up to and including `scope` are interactive.
    ///
    /// Returns `false` when `scope` is not an ancestor-or-self of `id`.
    fn is_interactive_within(&self, scope: WidgetId, id: WidgetId) -> bool {
        let mut cur = id;
        loop {
            if !self.is_interactive(cur) {
                return false;
            }
            if cur == scope {
                return true;
            }
            match self.parent_of(cur) {
                Some(p) => cur = p,
                None => return false,
            }
        }
    }

    /// Whether the screen-space `point` lies in the widget's rectangle and,
    /// for irregular widgets, in its shape.
    fn contains_point(&self, id: WidgetId, point: Point) -> bool {
        let Some(rect) = self.absolute_rect(id) else {
            return false;
        };
        if !rect.contains(point) {
            return false;
        }
        if self.flags(id).contains(WidgetFlags::IRREGULAR) {
            let local = point - rect.origin().to_vec2();
            return self.contains_point_irregular(id, local);
        }
        true
    }

    /// Front-most interactive child of `id` containing `local` (relative to `id`'s origin).
    ///
    /// Higher `z_index` wins; on equal z the later child wins. Children failing the
    /// irregular-shape test are skipped, so a sibling behind them can still be hit.
    fn child_at(&self, id: WidgetId, local: Point) -> Option<WidgetId> {
        let origin = self.absolute_rect(id)?.origin();
        let screen = origin + local.to_vec2();
        let mut best: Option<(WidgetId, i32)> = None;
        for &child in self.children_of(id) {
            if !self.is_interactive(child) || !self.contains_point(child, screen) {
                continue;
            }
            let z = self.z_index(child);
            match best {
                Some((_, z_best)) if z < z_best => {}
                _ => best = Some((child, z)),
            }
        }
        best.map(|(child, _)| child)
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    fn is_ancestor_or_self(&self, ancestor: WidgetId, id: WidgetId) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.parent_of(c);
        }
        false
    }

    /// Next widget after `current` in depth-first order, without leaving `scope`.
    ///
    /// Returns `None` past the last widget of the scope; does not wrap.
    fn next_depth_first(&self, scope: WidgetId, current: WidgetId) -> Option<WidgetId> {
        if !self.is_alive(current) {
            return None;
        }
        if let Some(&first) = self.children_of(current).first() {
            return Some(first);
        }
        let mut node = current;
        while node != scope {
            let parent = self.parent_of(node)?;
            let siblings = self.children_of(parent);
            let pos = siblings.iter().position(|&s| s == node)?;
            if let Some(&next) = siblings.get(pos + 1) {
                return Some(next);
            }
            node = parent;
        }
        None
    }

    /// Previous widget before `current` in depth-first order, without leaving `scope`.
    ///
    /// Returns `None` for the scope root itself; does not wrap.
    fn prev_depth_first(&self, scope: WidgetId, current: WidgetId) -> Option<WidgetId> {
        if !self.is_alive(current) || current == scope {
            return None;
        }
        let parent = self.parent_of(current)?;
        let siblings = self.children_of(parent);
        let pos = siblings.iter().position(|&s| s == current)?;
        if pos > 0 {
            return Some(self.last_in_subtree(siblings[pos - 1]));
        }
        Some(parent)
    }

    /// Deepest last descendant of `id` (or `id` itself when it has no children).
    fn last_in_subtree(&self, id: WidgetId) -> WidgetId {
        let mut node = id;
        while let Some(&last) = self.children_of(node).last() {
            node = last;
        }
        node
    }
}
