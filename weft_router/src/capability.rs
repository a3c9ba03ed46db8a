// Copyright 2025 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Delivery capabilities a host provides to the router.
//!
//! The router never calls into widgets directly. It asks the host to deliver an
//! event to a [`WidgetId`], and the host forwards it to whatever it keeps behind that
//! id. Each concern is its own trait with a do-nothing default, so a host implements
//! only what its widgets care about. [`Host`] bundles them with [`WidgetTree`].

use weft_tree::{WidgetId, WidgetTree};

use crate::ctx::EventCtx;
use crate::event::{DragDropEvent, FocusEvent, KeyEvent, MouseEvent};

/// Receives pointer events.
pub trait MouseTarget {
    /// Deliver `event` to `widget`. Return `true` to consume it and stop bubbling.
    fn send_mouse_event(
        &mut self,
        widget: WidgetId,
        event: &MouseEvent,
        ctx: &mut EventCtx,
    ) -> bool {
        let _ = (widget, event, ctx);
        false
    }
}

/// Receives keyboard events.
pub trait KeyTarget {
    /// Deliver `event` to `widget`. Return `true` to consume it and stop bubbling.
    fn send_key_event(&mut self, widget: WidgetId, event: &KeyEvent, ctx: &mut EventCtx) -> bool {
        let _ = (widget, event, ctx);
        false
    }
}

/// Receives drag-and-drop events.
pub trait DragTarget {
    /// Deliver `event` to `widget`.
    ///
    /// The return value matters only for [`DragDropEventKind::Entered`]: `true`
    /// offers `widget` as the drop target.
    ///
    /// [`DragDropEventKind::Entered`]: crate::event::DragDropEventKind::Entered
    fn send_dragdrop_event(
        &mut self,
        widget: WidgetId,
        event: &DragDropEvent<'_>,
        ctx: &mut EventCtx,
    ) -> bool {
        let _ = (widget, event, ctx);
        false
    }
}

/// Receives focus notifications.
pub trait FocusTarget {
    /// Notify `widget` of a focus change.
    fn send_focus_event(&mut self, widget: WidgetId, event: FocusEvent, ctx: &mut EventCtx) {
        let _ = (widget, event, ctx);
    }
}

/// Receives timer ticks.
pub trait TimerTarget {
    /// Tick `widget` with the platform's tick counter.
    fn timer_ticked(&mut self, widget: WidgetId, count: u64, ctx: &mut EventCtx) {
        let _ = (widget, count, ctx);
    }
}

/// Everything the router needs from its host.
///
/// Implemented automatically for any type providing the structural and delivery
/// traits.
pub trait Host:
    WidgetTree + MouseTarget + KeyTarget + DragTarget + FocusTarget + TimerTarget
{
}

impl<T> Host for T where
    T: WidgetTree + MouseTarget + KeyTarget + DragTarget + FocusTarget + TimerTarget + ?Sized
{
}
