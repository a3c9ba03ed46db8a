// Copyright 2025 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Insertion-ordered widget set shared by the hover and drag trackers.

use alloc::vec::Vec;

use hashbrown::HashSet;
use weft_tree::{WidgetId, WidgetTree};

use crate::path::TraversalPath;

/// Widgets in insertion order with constant-time membership.
///
/// Trackers keep ancestors ahead of descendants (see [`WidgetSet::insert_on_path`]),
/// so iterating in reverse yields leaf-first order, which is the order `Left`
/// notifications go out in.
#[derive(Clone, Debug, Default)]
pub(crate) struct WidgetSet {
    order: Vec<WidgetId>,
    members: HashSet<WidgetId>,
}

impl WidgetSet {
    pub(crate) fn contains(&self, id: WidgetId) -> bool {
        self.members.contains(&id)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub(crate) fn as_slice(&self) -> &[WidgetId] {
        &self.order
    }

    /// Insert `id`; `false` if it was already a member.
    pub(crate) fn insert(&mut self, id: WidgetId) -> bool {
        if !self.members.insert(id) {
            return false;
        }
        self.order.push(id);
        true
    }

    /// Insert `id` ahead of the members that lie deeper on `path`, keeping the
    /// order ancestor-first; `false` if it was already a member.
    pub(crate) fn insert_on_path(&mut self, id: WidgetId, path: &TraversalPath) -> bool {
        if !self.members.insert(id) {
            return false;
        }
        let at = path.position(id).and_then(|rank| {
            self.order
                .iter()
                .position(|&w| path.position(w).is_some_and(|p| p > rank))
        });
        match at {
            Some(at) => self.order.insert(at, id),
            None => self.order.push(id),
        }
        true
    }

    /// Remove `id`; `false` if it was not a member.
    pub(crate) fn remove(&mut self, id: WidgetId) -> bool {
        if !self.members.remove(&id) {
            return false;
        }
        self.order.retain(|&w| w != id);
        true
    }

    /// Silently drop members whose ids went stale.
    pub(crate) fn retain_alive<T: WidgetTree + ?Sized>(&mut self, tree: &T) {
        let members = &mut self.members;
        self.order.retain(|&id| {
            let alive = tree.is_alive(id);
            if !alive {
                members.remove(&id);
            }
            alive
        });
    }

    /// Members not on `path`, leaf-first.
    pub(crate) fn not_in_path(&self, path: &TraversalPath) -> Vec<WidgetId> {
        self.leaf_first(|id| !path.contains(id))
    }

    /// Members inside the subtree of `root`, leaf-first.
    pub(crate) fn in_subtree<T: WidgetTree + ?Sized>(
        &self,
        tree: &T,
        root: WidgetId,
    ) -> Vec<WidgetId> {
        self.leaf_first(|id| tree.is_ancestor_or_self(root, id))
    }

    /// Members outside the subtree of `root`, leaf-first.
    pub(crate) fn outside_subtree<T: WidgetTree + ?Sized>(
        &self,
        tree: &T,
        root: WidgetId,
    ) -> Vec<WidgetId> {
        self.leaf_first(|id| !tree.is_ancestor_or_self(root, id))
    }

    /// All members, leaf-first.
    pub(crate) fn all(&self) -> Vec<WidgetId> {
        self.leaf_first(|_| true)
    }

    fn leaf_first(&self, mut keep: impl FnMut(WidgetId) -> bool) -> Vec<WidgetId> {
        self.order.iter().rev().copied().filter(|&id| keep(id)).collect()
    }
}
