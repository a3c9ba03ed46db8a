// Copyright 2025 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover tracking: which widgets the pointer is over.
//!
//! The hovered set is always an ancestor-closed chain ending at the deepest hit
//! widget. Every widget entering the set gets exactly one
//! [`MouseEventKind::Entered`], and every widget leaving it while still alive
//! gets exactly one [`MouseEventKind::Left`], deepest first.

use kurbo::Point;
use tracing::trace;
use weft_tree::WidgetId;

use crate::capability::Host;
use crate::ctx::EventCtx;
use crate::delivery::{self, Pointer};
use crate::event::{MouseButton, MouseEventKind, Timestamp};
use crate::path::{self, TraversalPath};
use crate::set::WidgetSet;

/// The set of hovered widgets.
#[derive(Clone, Debug, Default)]
pub struct HoverTracker {
    set: WidgetSet,
}

impl HoverTracker {
    /// An empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `widget` is hovered.
    pub fn contains(&self, widget: WidgetId) -> bool {
        self.set.contains(widget)
    }

    /// Hovered widgets, outermost first.
    pub fn widgets(&self) -> &[WidgetId] {
        self.set.as_slice()
    }

    /// Whether nothing is hovered.
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Add every widget of `path` not yet hovered, outermost first, sending each
    /// `Entered`.
    ///
    /// Stops at the first widget that is no longer reachable.
    pub fn register_entered<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        ctx: &mut EventCtx,
        path: &TraversalPath,
        screen_pos: Point,
        button: Option<MouseButton>,
        timestamp: Timestamp,
    ) {
        let pointer = Pointer {
            screen_pos,
            button,
            timestamp,
        };
        for id in path.widgets() {
            if self.set.contains(id) {
                continue;
            }
            if !path::reachable(&*host, path, id) {
                break;
            }
            self.set.insert_on_path(id, path);
            trace!(?id, "hover entered");
            delivery::deliver_mouse(host, ctx, id, MouseEventKind::Entered, pointer, 0);
        }
    }

    /// [`register_entered`](Self::register_entered) with no button held, then, if
    /// `send_move`, bubble `Moved` from the leaf of `path`.
    pub fn reregister_under<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        ctx: &mut EventCtx,
        path: &TraversalPath,
        screen_pos: Point,
        send_move: bool,
        timestamp: Timestamp,
    ) {
        self.register_entered(host, ctx, path, screen_pos, None, timestamp);
        if send_move {
            let pointer = Pointer {
                screen_pos,
                button: None,
                timestamp,
            };
            delivery::bubble_mouse(host, ctx, path, MouseEventKind::Moved, pointer);
        }
    }

    /// Remove every hovered widget not on `path`, sending `Left` deepest first.
    pub fn remove_not_under<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        ctx: &mut EventCtx,
        path: &TraversalPath,
        screen_pos: Point,
        timestamp: Timestamp,
    ) {
        self.set.retain_alive(&*host);
        let gone = self.set.not_in_path(path);
        self.remove_each(host, ctx, &gone, true, screen_pos, timestamp);
    }

    /// Remove the hovered widgets inside the subtree of `root`.
    pub fn remove_subtree<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        ctx: &mut EventCtx,
        root: WidgetId,
        send_events: bool,
        screen_pos: Point,
        timestamp: Timestamp,
    ) {
        let gone = self.set.in_subtree(&*host, root);
        self.remove_each(host, ctx, &gone, send_events, screen_pos, timestamp);
    }

    /// Remove the hovered widgets outside the subtree of `root`.
    pub fn remove_all_except_subtree<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        ctx: &mut EventCtx,
        root: WidgetId,
        send_events: bool,
        screen_pos: Point,
        timestamp: Timestamp,
    ) {
        let gone = self.set.outside_subtree(&*host, root);
        self.remove_each(host, ctx, &gone, send_events, screen_pos, timestamp);
    }

    /// Remove every hovered widget.
    pub fn clear<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        ctx: &mut EventCtx,
        send_events: bool,
        screen_pos: Point,
        timestamp: Timestamp,
    ) {
        let gone = self.set.all();
        self.remove_each(host, ctx, &gone, send_events, screen_pos, timestamp);
    }

    fn remove_each<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        ctx: &mut EventCtx,
        ids: &[WidgetId],
        send_events: bool,
        screen_pos: Point,
        timestamp: Timestamp,
    ) {
        let pointer = Pointer {
            screen_pos,
            button: None,
            timestamp,
        };
        for &id in ids {
            if !self.set.remove(id) {
                continue;
            }
            trace!(?id, "hover left");
            if send_events && host.is_alive(id) {
                delivery::deliver_mouse(host, ctx, id, MouseEventKind::Left, pointer, 0);
            }
        }
    }
}
