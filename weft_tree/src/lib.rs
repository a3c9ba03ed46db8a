// Copyright 2025 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Weft Tree: widget identity and the structural capability surface for event routing.
//!
//! The event router in `weft_router` never owns widgets. It refers to them by
//! generational [`WidgetId`]s and asks a host for structure and geometry through the
//! [`WidgetTree`] trait:
//!
//! - liveness ([`WidgetTree::is_alive`]), so stale ids are detected rather than dereferenced;
//! - parent/child links and depth-first traversal, used for bubbling and tab order;
//! - absolute rectangles, activity and visibility, used for hit-testing;
//! - an optional precise shape test for irregular widgets.
//!
//! [`Tree`] is a small arena implementation of that trait. It is handy for tests,
//! demos, and hosts that do not already keep their own widget storage.
//!
//! ## Not a layout engine
//!
//! Bounds are supplied by the caller relative to the parent. Nothing here measures or
//! arranges widgets.
//!
//! ## Hit-testing rules
//!
//! [`WidgetTree::child_at`] picks, among the interactive (alive, visible, active)
//! children containing a point, the one with the highest z-index, and the later
//! child on ties. Widgets flagged [`WidgetFlags::IRREGULAR`] additionally run
//! [`WidgetTree::contains_point_irregular`] after the rectangle test.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod access;
mod tree;
mod types;

pub use access::WidgetTree;
pub use tree::Tree;
pub use types::{LocalWidget, Visibility, WidgetFlags, WidgetId};
