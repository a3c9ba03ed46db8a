// Copyright 2025 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard focus and modal focus.
//!
//! At most one widget holds focus and at most one holds modal focus. While a
//! modal widget is set, focus may only move inside its subtree, pointer input is
//! confined to it, and tab navigation cycles within it.

use tracing::{debug, warn};
use weft_focus::{DefaultPolicy, FocusPolicy, Navigation};
use weft_tree::{WidgetFlags, WidgetId, WidgetTree};

use crate::capability::Host;
use crate::ctx::EventCtx;
use crate::delivery;
use crate::event::FocusEvent;

/// The focus and modal-focus widgets.
#[derive(Clone, Debug, Default)]
pub struct FocusManager {
    focused: Option<WidgetId>,
    modal: Option<WidgetId>,
}

impl FocusManager {
    /// No focus, no modal.
    pub fn new() -> Self {
        Self::default()
    }

    /// The focus widget.
    pub fn focused(&self) -> Option<WidgetId> {
        self.focused
    }

    /// The modal-focus widget.
    pub fn modal(&self) -> Option<WidgetId> {
        self.modal
    }

    /// Whether `widget` may take focus: alive, focusable, and it and all its
    /// ancestors visible and active.
    pub fn can_focus<T: WidgetTree + ?Sized>(tree: &T, widget: WidgetId) -> bool {
        tree.flags(widget).contains(WidgetFlags::FOCUSABLE) && effectively_interactive(tree, widget)
    }

    /// Move focus to `widget`.
    ///
    /// Fails for stale, hidden or inactive widgets, for widgets outside the modal
    /// subtree, and for non-focusable widgets unless `steal` is set. Sends `Lost`
    /// to the previous focus widget, then `Gained` to `widget`.
    pub fn request_focus<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        ctx: &mut EventCtx,
        widget: WidgetId,
        steal: bool,
    ) -> bool {
        if !effectively_interactive(&*host, widget) {
            return false;
        }
        if !steal && !host.flags(widget).contains(WidgetFlags::FOCUSABLE) {
            return false;
        }
        if let Some(modal) = self.modal
            && !host.is_ancestor_or_self(modal, widget)
        {
            debug!(?widget, ?modal, "focus request outside the modal subtree refused");
            return false;
        }
        if self.focused == Some(widget) {
            return true;
        }
        let previous = self.focused.replace(widget);
        debug!(?previous, ?widget, "focus moved");
        if let Some(previous) = previous
            && host.is_alive(previous)
        {
            delivery::deliver_focus(host, ctx, previous, FocusEvent::Lost);
        }
        delivery::deliver_focus(host, ctx, widget, FocusEvent::Gained);
        true
    }

    /// Clear focus, sending `Lost` to the previous focus widget.
    pub fn focus_none<H: Host + ?Sized>(&mut self, host: &mut H, ctx: &mut EventCtx) {
        self.clear_focus(host, ctx, true);
    }

    /// Give `widget` modal focus.
    ///
    /// Returns `false` when a different widget already holds it, and `true`
    /// without events when `widget` already holds it. On success, `ModalGained` is
    /// sent and focus outside the modal subtree is cleared.
    pub fn request_modal_focus<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        ctx: &mut EventCtx,
        widget: WidgetId,
    ) -> bool {
        match self.modal {
            Some(modal) if modal == widget => return true,
            Some(modal) => {
                warn!(?widget, holder = ?modal, "modal focus already held");
                return false;
            }
            None => {}
        }
        if !effectively_interactive(&*host, widget) {
            return false;
        }
        self.modal = Some(widget);
        debug!(?widget, "modal focus acquired");
        delivery::deliver_focus(host, ctx, widget, FocusEvent::ModalGained);
        if let Some(focused) = self.focused
            && !host.is_ancestor_or_self(widget, focused)
        {
            self.clear_focus(host, ctx, true);
        }
        true
    }

    /// Release modal focus held by `widget`, sending `ModalLost`.
    ///
    /// Returns `false` if `widget` does not hold it.
    pub fn release_modal_focus<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        ctx: &mut EventCtx,
        widget: WidgetId,
    ) -> bool {
        if self.modal != Some(widget) {
            return false;
        }
        self.clear_modal(host, ctx, true);
        true
    }

    /// Move focus to the next tab stop of `scope`, or of the modal subtree while a
    /// modal widget is set.
    ///
    /// Returns `false` (leaving focus unchanged) when there is no tab stop to move
    /// to.
    pub fn tab_move_focus<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        ctx: &mut EventCtx,
        scope: Option<WidgetId>,
        policy: &DefaultPolicy,
        reverse: bool,
    ) -> bool {
        let Some(scope) = self.modal.or(scope) else {
            return false;
        };
        let next = policy.next(&*host, scope, self.focused, Navigation::from_reverse(reverse));
        match next {
            Some(next) => self.request_focus(host, ctx, next, false),
            None => false,
        }
    }

    /// Drop focus and modal focus held inside the subtree of `root`.
    ///
    /// Returns whether modal focus changed.
    pub fn remove_subtree<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        ctx: &mut EventCtx,
        root: WidgetId,
        send_events: bool,
    ) -> bool {
        if let Some(focused) = self.focused
            && host.is_ancestor_or_self(root, focused)
        {
            self.clear_focus(host, ctx, send_events);
        }
        if let Some(modal) = self.modal
            && host.is_ancestor_or_self(root, modal)
        {
            self.clear_modal(host, ctx, send_events);
            return true;
        }
        false
    }

    /// Drop focus and modal focus held outside the subtree of `scope`, or all of
    /// it when there is no scope.
    ///
    /// Returns whether modal focus changed.
    pub fn retain_within<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        ctx: &mut EventCtx,
        scope: Option<WidgetId>,
    ) -> bool {
        let inside = |host: &H, w: WidgetId| scope.is_some_and(|s| host.is_ancestor_or_self(s, w));
        if let Some(focused) = self.focused
            && !inside(&*host, focused)
        {
            self.clear_focus(host, ctx, true);
        }
        if let Some(modal) = self.modal
            && !inside(&*host, modal)
        {
            self.clear_modal(host, ctx, true);
            return true;
        }
        false
    }

    fn clear_focus<H: Host + ?Sized>(&mut self, host: &mut H, ctx: &mut EventCtx, send: bool) {
        let Some(previous) = self.focused.take() else {
            return;
        };
        debug!(?previous, "focus cleared");
        if send && host.is_alive(previous) {
            delivery::deliver_focus(host, ctx, previous, FocusEvent::Lost);
        }
    }

    fn clear_modal<H: Host + ?Sized>(&mut self, host: &mut H, ctx: &mut EventCtx, send: bool) {
        let Some(previous) = self.modal.take() else {
            return;
        };
        debug!(?previous, "modal focus released");
        if send && host.is_alive(previous) {
            delivery::deliver_focus(host, ctx, previous, FocusEvent::ModalLost);
        }
    }
}

/// Alive, and it and every ancestor visible and active.
fn effectively_interactive<T: WidgetTree + ?Sized>(tree: &T, widget: WidgetId) -> bool {
    let mut cur = Some(widget);
    while let Some(id) = cur {
        if !tree.is_interactive(id) {
            return false;
        }
        cur = tree.parent_of(id);
    }
    true
}
