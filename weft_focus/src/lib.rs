// Copyright 2025 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Weft Focus: tab-order navigation primitives.
//!
//! This crate models keyboard focus traversal as a combination of:
//! - **Navigation intents** ([`Navigation`]): Tab and Shift+Tab.
//! - **Per-widget flags** read through [`WidgetTree`]: a widget is a tab stop when it is
//!   [`WidgetFlags::FOCUSABLE`] and [`WidgetFlags::TAB_IN`], and it and every ancestor up
//!   to the scope root are alive, visible and active.
//! - A **scope root**: the top-level widget, or the modal widget while one is set.
//!   Traversal never leaves the scope.
//! - Pluggable **policies** ([`FocusPolicy`]) that select the next tab stop given an origin.
//!
//! Candidates are visited in depth-first document order, parents before children and
//! siblings in insertion order.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Rect;
//! use weft_focus::{DefaultPolicy, FocusPolicy, Navigation, WrapMode};
//! use weft_tree::{LocalWidget, Tree, WidgetFlags};
//!
//! let button = LocalWidget {
//!     bounds: Rect::new(0.0, 0.0, 10.0, 10.0),
//!     flags: WidgetFlags::default() | WidgetFlags::FOCUSABLE,
//!     ..LocalWidget::default()
//! };
//! let mut tree = Tree::new();
//! let root = tree.insert(None, LocalWidget::default());
//! let first = tree.insert(Some(root), button.clone());
//! let second = tree.insert(Some(root), button);
//!
//! let policy = DefaultPolicy { wrap: WrapMode::Scope };
//!
//! // Tab moves from the first button to the second…
//! assert_eq!(policy.next(&tree, root, Some(first), Navigation::Next), Some(second));
//! // …and wraps back to the first.
//! assert_eq!(policy.next(&tree, root, Some(second), Navigation::Next), Some(first));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

use weft_tree::{WidgetFlags, WidgetId, WidgetTree};

/// Direction of tab navigation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Navigation {
    /// Move to the next tab stop in document order (Tab).
    Next,
    /// Move to the previous tab stop in document order (Shift+Tab).
    Prev,
}

impl Navigation {
    /// `Prev` when `reverse`, otherwise `Next`.
    pub const fn from_reverse(reverse: bool) -> Self {
        if reverse { Self::Prev } else { Self::Next }
    }
}

/// Wrap mode configuration for focus traversal.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum WrapMode {
    /// Do not wrap; reaching the end of the scope yields no next candidate.
    Never,
    /// Wrap around within the current scope.
    #[default]
    Scope,
}

/// Trait for tab traversal policies.
///
/// A policy receives the scope root, the current origin (if any), and a
/// navigation intent, and returns the next tab stop if any. `origin` may lie
/// outside the scope or be stale; policies then start from the scope's edge.
pub trait FocusPolicy<T>
where
    T: WidgetTree + ?Sized,
{
    /// Compute the next tab stop.
    fn next(
        &self,
        tree: &T,
        scope: WidgetId,
        origin: Option<WidgetId>,
        direction: Navigation,
    ) -> Option<WidgetId>;
}

/// Default linear traversal policy: depth-first document order with optional wrap.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultPolicy {
    /// Wrap behavior at the ends of the scope.
    pub wrap: WrapMode,
}

impl<T> FocusPolicy<T> for DefaultPolicy
where
    T: WidgetTree + ?Sized,
{
    fn next(
        &self,
        tree: &T,
        scope: WidgetId,
        origin: Option<WidgetId>,
        direction: Navigation,
    ) -> Option<WidgetId> {
        if !tree.is_alive(scope) {
            return None;
        }
        let origin = origin.filter(|&o| tree.is_alive(o) && tree.is_ancestor_or_self(scope, o));
        match direction {
            Navigation::Next => next_forward(tree, scope, origin, self.wrap),
            Navigation::Prev => next_backward(tree, scope, origin, self.wrap),
        }
    }
}

/// Whether `id` is a tab stop inside `scope`.
pub fn is_tab_candidate<T>(tree: &T, scope: WidgetId, id: WidgetId) -> bool
where
    T: WidgetTree + ?Sized,
{
    tree.flags(id)
        .contains(WidgetFlags::FOCUSABLE | WidgetFlags::TAB_IN)
        && tree.is_interactive_within(scope, id)
}

/// All tab stops of `scope` in document order.
pub fn tab_stops<T>(tree: &T, scope: WidgetId) -> Vec<WidgetId>
where
    T: WidgetTree + ?Sized,
{
    let mut out = Vec::new();
    if !tree.is_alive(scope) {
        return out;
    }
    let mut cur = Some(scope);
    while let Some(id) = cur {
        if is_tab_candidate(tree, scope, id) {
            out.push(id);
        }
        cur = tree.next_depth_first(scope, id);
    }
    out
}

fn next_forward<T>(
    tree: &T,
    scope: WidgetId,
    origin: Option<WidgetId>,
    wrap: WrapMode,
) -> Option<WidgetId>
where
    T: WidgetTree + ?Sized,
{
    let Some(origin) = origin else {
        return first_from(tree, scope, Some(scope), None);
    };
    if let Some(found) = first_from(tree, scope, tree.next_depth_first(scope, origin), None) {
        return Some(found);
    }
    match wrap {
        WrapMode::Never => None,
        // Restart at the scope root and stop once the origin itself was considered.
        WrapMode::Scope => first_from(tree, scope, Some(scope), Some(origin)),
    }
}

fn next_backward<T>(
    tree: &T,
    scope: WidgetId,
    origin: Option<WidgetId>,
    wrap: WrapMode,
) -> Option<WidgetId>
where
    T: WidgetTree + ?Sized,
{
    let last = tree.last_in_subtree(scope);
    let Some(origin) = origin else {
        return last_from(tree, scope, Some(last), None);
    };
    if let Some(found) = last_from(tree, scope, tree.prev_depth_first(scope, origin), None) {
        return Some(found);
    }
    match wrap {
        WrapMode::Never => None,
        WrapMode::Scope => last_from(tree, scope, Some(last), Some(origin)),
    }
}

/// First candidate walking forward from `start`, considering `stop` as the final widget.
fn first_from<T>(
    tree: &T,
    scope: WidgetId,
    start: Option<WidgetId>,
    stop: Option<WidgetId>,
) -> Option<WidgetId>
where
    T: WidgetTree + ?Sized,
{
    let mut cur = start;
    while let Some(id) = cur {
        if is_tab_candidate(tree, scope, id) {
            return Some(id);
        }
        if Some(id) == stop {
            return None;
        }
        cur = tree.next_depth_first(scope, id);
    }
    None
}

/// First candidate walking backward from `start`, considering `stop` as the final widget.
fn last_from<T>(
    tree: &T,
    scope: WidgetId,
    start: Option<WidgetId>,
    stop: Option<WidgetId>,
) -> Option<WidgetId>
where
    T: WidgetTree + ?Sized,
{
    let mut cur = start;
    while let Some(id) = cur {
        if is_tab_candidate(tree, scope, id) {
            return Some(id);
        }
        if Some(id) == stop {
            return None;
        }
        cur = tree.prev_depth_first(scope, id);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use kurbo::Rect;
    use weft_tree::{LocalWidget, Tree, Visibility};

    fn focusable() -> LocalWidget {
        LocalWidget {
            bounds: Rect::new(0.0, 0.0, 10.0, 10.0),
            flags: WidgetFlags::default() | WidgetFlags::FOCUSABLE,
            ..LocalWidget::default()
        }
    }

    fn plain() -> LocalWidget {
        LocalWidget {
            bounds: Rect::new(0.0, 0.0, 100.0, 100.0),
            ..LocalWidget::default()
        }
    }

    #[test]
    fn linear_next_prev_with_wrap() {
        let mut tree = Tree::new();
        let root = tree.insert(None, plain());
        let a = tree.insert(Some(root), focusable());
        let b = tree.insert(Some(root), focusable());
        let policy = DefaultPolicy {
            wrap: WrapMode::Scope,
        };

        assert_eq!(policy.next(&tree, root, Some(a), Navigation::Next), Some(b));
        assert_eq!(policy.next(&tree, root, Some(b), Navigation::Next), Some(a));
        assert_eq!(policy.next(&tree, root, Some(a), Navigation::Prev), Some(b));
        assert_eq!(policy.next(&tree, root, Some(b), Navigation::Prev), Some(a));
    }

    #[test]
    fn no_origin_starts_at_the_edges() {
        let mut tree = Tree::new();
        let root = tree.insert(None, plain());
        let a = tree.insert(Some(root), focusable());
        let b = tree.insert(Some(root), focusable());
        let policy = DefaultPolicy::default();

        assert_eq!(policy.next(&tree, root, None, Navigation::Next), Some(a));
        assert_eq!(policy.next(&tree, root, None, Navigation::Prev), Some(b));
    }

    #[test]
    fn document_order_visits_nested_widgets() {
        let mut tree = Tree::new();
        let root = tree.insert(None, plain());
        let group = tree.insert(Some(root), plain());
        let inner1 = tree.insert(Some(group), focusable());
        let inner2 = tree.insert(Some(group), focusable());
        let after = tree.insert(Some(root), focusable());

        assert_eq!(tab_stops(&tree, root), vec![inner1, inner2, after]);
        let policy = DefaultPolicy::default();
        assert_eq!(
            policy.next(&tree, root, Some(inner2), Navigation::Next),
            Some(after)
        );
        assert_eq!(
            policy.next(&tree, root, Some(after), Navigation::Prev),
            Some(inner2)
        );
    }

    #[test]
    fn skips_hidden_inactive_and_tab_in_disabled() {
        let mut tree = Tree::new();
        let root = tree.insert(None, plain());
        let a = tree.insert(Some(root), focusable());
        let hidden = tree.insert(Some(root), focusable());
        let inactive = tree.insert(Some(root), focusable());
        let no_tab = tree.insert(Some(root), focusable());
        let group = tree.insert(Some(root), plain());
        let in_gone_group = tree.insert(Some(group), focusable());
        let b = tree.insert(Some(root), focusable());

        tree.set_visibility(hidden, Visibility::Invisible);
        tree.set_active(inactive, false);
        tree.set_flags(no_tab, WidgetFlags::ACTIVE | WidgetFlags::FOCUSABLE);
        tree.set_visibility(group, Visibility::Gone);

        assert!(!is_tab_candidate(&tree, root, in_gone_group));
        assert_eq!(tab_stops(&tree, root), vec![a, b]);
        let policy = DefaultPolicy::default();
        assert_eq!(policy.next(&tree, root, Some(a), Navigation::Next), Some(b));
    }

    #[test]
    fn no_wrap_stops_at_edges() {
        let mut tree = Tree::new();
        let root = tree.insert(None, plain());
        let a = tree.insert(Some(root), focusable());
        let b = tree.insert(Some(root), focusable());
        let policy = DefaultPolicy {
            wrap: WrapMode::Never,
        };

        assert_eq!(policy.next(&tree, root, Some(b), Navigation::Next), None);
        assert_eq!(policy.next(&tree, root, Some(a), Navigation::Prev), None);
    }

    #[test]
    fn single_candidate_wraps_to_itself() {
        let mut tree = Tree::new();
        let root = tree.insert(None, plain());
        let only = tree.insert(Some(root), focusable());
        let policy = DefaultPolicy::default();
        assert_eq!(
            policy.next(&tree, root, Some(only), Navigation::Next),
            Some(only)
        );
        assert_eq!(
            policy.next(&tree, root, Some(only), Navigation::Prev),
            Some(only)
        );
    }

    #[test]
    fn empty_scope_yields_none() {
        let mut tree = Tree::new();
        let root = tree.insert(None, plain());
        let _ = tree.insert(Some(root), plain());
        let policy = DefaultPolicy::default();
        assert_eq!(policy.next(&tree, root, None, Navigation::Next), None);
        assert_eq!(policy.next(&tree, root, Some(root), Navigation::Prev), None);
    }

    #[test]
    fn traversal_is_confined_to_the_scope() {
        let mut tree = Tree::new();
        let root = tree.insert(None, plain());
        let outside = tree.insert(Some(root), focusable());
        let dialog = tree.insert(Some(root), plain());
        let ok = tree.insert(Some(dialog), focusable());
        let cancel = tree.insert(Some(dialog), focusable());
        let policy = DefaultPolicy::default();

        assert_eq!(
            policy.next(&tree, dialog, Some(cancel), Navigation::Next),
            Some(ok)
        );
        // An origin outside the scope restarts at the scope's first stop.
        assert_eq!(
            policy.next(&tree, dialog, Some(outside), Navigation::Next),
            Some(ok)
        );
        assert_eq!(
            policy.next(&tree, dialog, Some(outside), Navigation::Prev),
            Some(cancel)
        );
    }
}
