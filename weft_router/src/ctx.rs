// Copyright 2025 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handler context: requests queued during delivery and applied afterwards.
//!
//! Handlers receive a `&mut EventCtx` with every event. Anything that would change
//! routing state (focus, modal focus, timers, visibility notifications, drags) is
//! queued here and applied by the router once the current delivery step is over,
//! so no tracker is ever mutated while it is iterating.

use alloc::collections::VecDeque;

use weft_tree::WidgetId;

use crate::drag::{DragRepresentation, SourceAction};

/// A routing state change requested by a handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Request {
    /// Move focus to `widget`.
    Focus {
        /// Widget to focus.
        widget: WidgetId,
        /// Focus even if the widget is not [`FOCUSABLE`](weft_tree::WidgetFlags::FOCUSABLE).
        steal: bool,
    },
    /// Clear focus.
    FocusNone,
    /// Acquire modal focus for a widget.
    ModalFocus(WidgetId),
    /// Release modal focus held by a widget.
    ReleaseModalFocus(WidgetId),
    /// Move focus to the next (or previous, when `reverse`) tab stop.
    TabMove {
        /// Move backward.
        reverse: bool,
    },
    /// Subscribe a widget to timer ticks.
    SubscribeTimer {
        /// Subscriber.
        widget: WidgetId,
        /// Only ticks whose counter is a multiple of this are delivered.
        skip_modulus: u32,
    },
    /// Drop a widget's timer subscription.
    UnsubscribeTimer(WidgetId),
    /// A widget has been hidden or deactivated.
    BecameInvisibleOrInactive(WidgetId),
    /// A widget is about to be destroyed.
    Deregistered {
        /// The widget.
        widget: WidgetId,
        /// Suppress the resulting focus and hover notifications.
        destroying: bool,
    },
    /// Abort the running drag-and-drop operation.
    AbortDrag,
}

/// Per-delivery context handed to every handler.
#[derive(Debug, Default)]
pub struct EventCtx {
    requests: VecDeque<Request>,
    current: Option<WidgetId>,
    spawned_drag: Option<(Option<WidgetId>, DragRepresentation)>,
    source_action: Option<SourceAction>,
}

impl EventCtx {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// The widget currently receiving an event, if any.
    pub fn current_widget(&self) -> Option<WidgetId> {
        self.current
    }

    /// Request focus for a focusable widget.
    pub fn request_focus(&mut self, widget: WidgetId) {
        self.push(Request::Focus {
            widget,
            steal: false,
        });
    }

    /// Request focus for a widget even if it is not focusable.
    pub fn steal_focus(&mut self, widget: WidgetId) {
        self.push(Request::Focus {
            widget,
            steal: true,
        });
    }

    /// Request that nothing be focused.
    pub fn focus_none(&mut self) {
        self.push(Request::FocusNone);
    }

    /// Request modal focus for `widget`.
    pub fn request_modal_focus(&mut self, widget: WidgetId) {
        self.push(Request::ModalFocus(widget));
    }

    /// Release modal focus held by `widget`.
    pub fn release_modal_focus(&mut self, widget: WidgetId) {
        self.push(Request::ReleaseModalFocus(widget));
    }

    /// Move focus along the tab order.
    pub fn tab_move_focus(&mut self, reverse: bool) {
        self.push(Request::TabMove { reverse });
    }

    /// Subscribe `widget` to every `skip_modulus`-th timer tick.
    pub fn subscribe_timer(&mut self, widget: WidgetId, skip_modulus: u32) {
        self.push(Request::SubscribeTimer {
            widget,
            skip_modulus,
        });
    }

    /// Drop `widget`'s timer subscription.
    pub fn unsubscribe_timer(&mut self, widget: WidgetId) {
        self.push(Request::UnsubscribeTimer(widget));
    }

    /// Report that `widget` was hidden or deactivated.
    pub fn widget_became_invisible_or_inactive(&mut self, widget: WidgetId) {
        self.push(Request::BecameInvisibleOrInactive(widget));
    }

    /// Report that `widget` is about to be destroyed.
    ///
    /// The widget must stay alive in the tree until the request has been applied,
    /// which happens before the router returns to the caller.
    pub fn widget_deregistered(&mut self, widget: WidgetId, destroying: bool) {
        self.push(Request::Deregistered { widget, destroying });
    }

    /// Abort the running drag-and-drop operation.
    pub fn abort_drag(&mut self) {
        self.push(Request::AbortDrag);
    }

    /// Start a drag-and-drop operation with `representation` as its payload.
    ///
    /// Honored only while handling [`MouseEventKind::Dragged`]; the widget handling
    /// that event becomes the drag source. A second call replaces the first.
    ///
    /// [`MouseEventKind::Dragged`]: crate::event::MouseEventKind::Dragged
    pub fn spawn_drag(&mut self, representation: DragRepresentation) {
        self.spawned_drag = Some((self.current, representation));
    }

    /// Tell the drag source what to do with its payload after a drop.
    ///
    /// Honored only while handling [`DragDropEventKind::Dropped`].
    ///
    /// [`DragDropEventKind::Dropped`]: crate::event::DragDropEventKind::Dropped
    pub fn set_source_action(&mut self, action: SourceAction) {
        self.source_action = Some(action);
    }

    /// Whether any request is waiting to be applied.
    pub fn has_pending_requests(&self) -> bool {
        !self.requests.is_empty()
    }

    fn push(&mut self, request: Request) {
        self.requests.push_back(request);
    }

    pub(crate) fn next_request(&mut self) -> Option<Request> {
        self.requests.pop_front()
    }

    pub(crate) fn set_current(&mut self, widget: Option<WidgetId>) {
        self.current = widget;
    }

    pub(crate) fn take_spawned_drag(&mut self) -> Option<(Option<WidgetId>, DragRepresentation)> {
        self.spawned_drag.take()
    }

    pub(crate) fn take_source_action(&mut self) -> Option<SourceAction> {
        self.source_action.take()
    }
}
