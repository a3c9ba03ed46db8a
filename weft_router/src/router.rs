// Copyright 2025 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The event router: raw input in, per-widget deliveries out.
//!
//! [`EventRouter::dispatch`] takes one [`ExternalEvent`] and drives the trackers:
//!
//! - **Pointer motion** hit-tests the top-level widget (or the modal widget), prunes
//!   and extends the hovered set, and bubbles `Moved`. While a button is held the
//!   pressed widget keeps the pointer and receives `Dragged` instead; while a
//!   drag-and-drop operation runs, motion feeds the drag tracker only.
//! - **Press** captures the pointer for the deepest hit widget until release.
//! - **Release** bubbles `Released` from the captured widget, recognizes clicks, and
//!   completes a running drag.
//! - **Keys** bubble from the focus widget up to the scope root. An unconsumed Tab
//!   character moves focus along the tab order.
//! - **Ticks** go to timer subscribers.
//!
//! Handlers never mutate routing state directly. They queue requests on the
//! [`EventCtx`] they receive, and the router applies them once the current
//! delivery is over. Operations called from outside a delivery take effect
//! immediately.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Rect};
//! use weft_router::{
//!     EventCtx, EventRouter, ExternalEvent, MouseEvent, MouseEventKind, MouseTarget,
//!     KeyTarget, DragTarget, FocusTarget, TimerTarget,
//! };
//! use weft_tree::{LocalWidget, Tree, WidgetId, WidgetTree, WidgetFlags, Visibility};
//!
//! struct App {
//!     tree: Tree,
//!     seen: Vec<(WidgetId, MouseEventKind)>,
//! }
//!
//! impl WidgetTree for App {
//!     fn is_alive(&self, id: WidgetId) -> bool { self.tree.is_alive(id) }
//!     fn parent_of(&self, id: WidgetId) -> Option<WidgetId> { self.tree.parent_of(id) }
//!     fn children_of(&self, id: WidgetId) -> &[WidgetId] { self.tree.children_of(id) }
//!     fn absolute_rect(&self, id: WidgetId) -> Option<Rect> { self.tree.absolute_rect(id) }
//!     fn flags(&self, id: WidgetId) -> WidgetFlags { self.tree.flags(id) }
//!     fn visibility(&self, id: WidgetId) -> Visibility { self.tree.visibility(id) }
//! }
//!
//! impl MouseTarget for App {
//!     fn send_mouse_event(&mut self, id: WidgetId, ev: &MouseEvent, _: &mut EventCtx) -> bool {
//!         self.seen.push((id, ev.kind));
//!         true
//!     }
//! }
//! impl KeyTarget for App {}
//! impl DragTarget for App {}
//! impl FocusTarget for App {}
//! impl TimerTarget for App {}
//!
//! let mut tree = Tree::new();
//! let window = tree.insert(None, LocalWidget {
//!     bounds: Rect::new(0.0, 0.0, 200.0, 200.0),
//!     ..LocalWidget::default()
//! });
//! let button = tree.insert(Some(window), LocalWidget {
//!     bounds: Rect::new(10.0, 10.0, 60.0, 40.0),
//!     ..LocalWidget::default()
//! });
//! let mut app = App { tree, seen: Vec::new() };
//!
//! let mut router = EventRouter::default();
//! router.set_top_widget(&mut app, Some(window));
//! router.dispatch(&mut app, &ExternalEvent::mouse_moved(0.0, Point::new(20.0, 20.0)));
//!
//! assert_eq!(router.hovered(), &[window, button]);
//! assert_eq!(app.seen, vec![
//!     (window, MouseEventKind::Entered),
//!     (button, MouseEventKind::Entered),
//!     (button, MouseEventKind::Moved),
//! ]);
//! ```

use alloc::vec::Vec;

use kurbo::{Point, Rect};
use tracing::{debug, trace, trace_span, warn};
use weft_focus::DefaultPolicy;
use weft_tree::{WidgetFlags, WidgetId, WidgetTree};

use crate::capability::Host;
use crate::click::{ClickResult, ClickState};
use crate::config::RouterConfig;
use crate::ctx::{EventCtx, Request};
use crate::delivery::{self, Key, Pointer};
use crate::drag::{DragContext, DragDropTracker, DragRepresentation};
use crate::error::RoutingError;
use crate::event::{
    ExternalEvent, ExternalEventKind, KeyCode, KeyEventKind, Modifiers, MouseButton,
    MouseEventKind, Timestamp,
};
use crate::focus::FocusManager;
use crate::hover::HoverTracker;
use crate::path::{self, TraversalPath, local_point};
use crate::timer::TimerRegistry;

/// The widget holding the pointer between press and release.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Capture {
    /// Pressed widget.
    pub widget: WidgetId,
    /// Button that went down.
    pub button: MouseButton,
}

/// Routes raw input to widgets and owns all interaction state.
#[derive(Debug)]
pub struct EventRouter {
    config: RouterConfig,
    tops: Vec<WidgetId>,
    focus: FocusManager,
    hover: HoverTracker,
    drag: DragDropTracker,
    timers: TimerRegistry,
    clicks: ClickState<WidgetId>,
    capture: Option<Capture>,
    pointer: Option<Point>,
    now: Timestamp,
    /// Subtree being deregistered; excluded from hit-testing meanwhile.
    dying: Option<WidgetId>,
}

impl Default for EventRouter {
    fn default() -> Self {
        Self::new(RouterConfig::default())
    }
}

impl EventRouter {
    /// A router with no top-level widget.
    pub fn new(config: RouterConfig) -> Self {
        let clicks = ClickState::new(config.multi_click_interval);
        Self {
            config,
            tops: Vec::new(),
            focus: FocusManager::new(),
            hover: HoverTracker::new(),
            drag: DragDropTracker::new(),
            timers: TimerRegistry::new(),
            clicks,
            capture: None,
            pointer: None,
            now: 0.0,
            dying: None,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// The top-level widget receiving pointer input.
    pub fn top_widget(&self) -> Option<WidgetId> {
        self.tops.last().copied()
    }

    /// The top-level stack, bottom first.
    pub fn top_widgets(&self) -> &[WidgetId] {
        &self.tops
    }

    /// The focus widget.
    pub fn focused(&self) -> Option<WidgetId> {
        self.focus.focused()
    }

    /// The modal-focus widget.
    pub fn modal_focused(&self) -> Option<WidgetId> {
        self.focus.modal()
    }

    /// Hovered widgets, outermost first.
    pub fn hovered(&self) -> &[WidgetId] {
        self.hover.widgets()
    }

    /// Whether `widget` is hovered.
    pub fn is_hovered(&self, widget: WidgetId) -> bool {
        self.hover.contains(widget)
    }

    /// Widgets under a running drag, outermost first.
    pub fn under_drag(&self) -> &[WidgetId] {
        self.drag.under_drag()
    }

    /// Whether a drag-and-drop operation is running.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    /// The running drag-and-drop operation.
    pub fn drag_context(&self) -> Option<&DragContext> {
        self.drag.context()
    }

    /// Payload of the running drag-and-drop operation.
    pub fn drag_representation(&self) -> Option<&DragRepresentation> {
        self.drag.context().map(|c| c.info().representation())
    }

    /// Screen rectangle of the drag visual, placed so its hotspot is under the
    /// pointer.
    pub fn drag_representation_rect(&self) -> Option<Rect> {
        let pointer = self.pointer?;
        let repr = self.drag_representation()?;
        Some(Rect::from_origin_size(pointer - repr.hotspot(), repr.size()))
    }

    /// The widget holding the pointer.
    pub fn captured(&self) -> Option<Capture> {
        self.capture
    }

    /// Last known pointer position.
    pub fn pointer_position(&self) -> Option<Point> {
        self.pointer
    }

    /// Widget of the last recognized click.
    pub fn last_click_target(&self) -> Option<WidgetId> {
        self.clicks.last_click_target().copied()
    }

    /// Timer subscriptions.
    pub fn timers(&self) -> &TimerRegistry {
        &self.timers
    }

    /// The root that bounds bubbling and tab navigation: the modal widget, else
    /// the top-level widget.
    pub fn scope_root(&self) -> Option<WidgetId> {
        self.focus.modal().or(self.top_widget())
    }

    /// Hit-test `point` the way pointer events are routed.
    ///
    /// With a modal widget set, a hit outside its subtree collapses to the modal
    /// widget alone, and a hit inside it starts at the modal widget.
    pub fn hit_test<T: WidgetTree + ?Sized>(&self, tree: &T, point: Point) -> TraversalPath {
        let Some(top) = self.top_widget() else {
            return TraversalPath::new();
        };
        let mut path = match self.focus.modal() {
            None => path::hit_test(tree, top, point),
            Some(modal) if !tree.is_ancestor_or_self(top, modal) => {
                path::hit_test_unbounded(tree, modal, point)
            }
            Some(modal) => {
                let mut full = path::hit_test(tree, top, point);
                match full.position(modal) {
                    Some(index) => {
                        full.rebase(index);
                        full
                    }
                    None if tree.is_interactive(modal) => {
                        let mut only = TraversalPath::new();
                        only.push(modal, local_point(tree, modal, point));
                        only
                    }
                    None => TraversalPath::new(),
                }
            }
        };
        let cut = self.dying.and_then(|dying| {
            path.widgets()
                .position(|w| tree.is_ancestor_or_self(dying, w))
        });
        if let Some(index) = cut {
            path.truncate(index);
        }
        path
    }

    /// Route one raw input event.
    pub fn dispatch<H: Host + ?Sized>(&mut self, host: &mut H, event: &ExternalEvent) {
        let _span = trace_span!("dispatch", kind = ?event.kind).entered();
        self.now = event.timestamp;
        let timestamp = event.timestamp;
        let mut ctx = EventCtx::new();
        match event.kind {
            ExternalEventKind::MouseMoved { pos } => {
                self.mouse_moved(host, &mut ctx, pos, timestamp);
            }
            ExternalEventKind::MousePressed { pos, button } => {
                self.mouse_pressed(host, &mut ctx, pos, button, timestamp);
            }
            ExternalEventKind::MouseReleased { pos, button } => {
                self.mouse_released(host, &mut ctx, pos, button, timestamp);
            }
            ExternalEventKind::MouseWheel { dz } => {
                self.mouse_wheel(host, &mut ctx, dz, timestamp);
            }
            ExternalEventKind::KeyPressed { code, modifiers } => {
                let key = Key {
                    kind: KeyEventKind::Pressed,
                    code,
                    modifiers,
                    unicode: None,
                    repeated: false,
                    timestamp,
                };
                self.key(host, &mut ctx, key);
            }
            ExternalEventKind::KeyReleased { code, modifiers } => {
                let key = Key {
                    kind: KeyEventKind::Released,
                    code,
                    modifiers,
                    unicode: None,
                    repeated: false,
                    timestamp,
                };
                self.key(host, &mut ctx, key);
            }
            ExternalEventKind::KeyChar {
                code,
                modifiers,
                unicode,
                repeated,
            } => {
                let key = Key {
                    kind: KeyEventKind::Char,
                    code,
                    modifiers,
                    unicode,
                    repeated,
                    timestamp,
                };
                self.key(host, &mut ctx, key);
            }
            ExternalEventKind::TimerTick { count } => {
                self.timer_tick(host, &mut ctx, count);
            }
        }
        self.apply_requests(host, &mut ctx);
    }

    /// Replace the top-level stack with `widget` (or nothing).
    ///
    /// Hover and any drag end against the old top; focus and modal focus outside
    /// the new one are cleared; hover is then rebuilt at the last pointer position.
    pub fn set_top_widget<H: Host + ?Sized>(&mut self, host: &mut H, widget: Option<WidgetId>) {
        let mut ctx = EventCtx::new();
        self.before_top_change(host, &mut ctx, true);
        self.tops.clear();
        self.tops.extend(widget);
        self.after_top_change(host, &mut ctx);
        self.apply_requests(host, &mut ctx);
    }

    /// Push a new top-level widget, for example a popup.
    ///
    /// # Panics
    ///
    /// Panics if `widget` is already on the stack.
    pub fn push_top_widget<H: Host + ?Sized>(&mut self, host: &mut H, widget: WidgetId) {
        if let Err(err) = self.try_push_top_widget(host, widget) {
            panic!("{err}");
        }
    }

    /// Push a new top-level widget, failing if it is already on the stack.
    pub fn try_push_top_widget<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        widget: WidgetId,
    ) -> Result<(), RoutingError> {
        if self.tops.contains(&widget) {
            return Err(RoutingError::RootAlreadyAdded(widget));
        }
        let mut ctx = EventCtx::new();
        self.before_top_change(host, &mut ctx, true);
        self.tops.push(widget);
        self.after_top_change(host, &mut ctx);
        self.apply_requests(host, &mut ctx);
        Ok(())
    }

    /// Pop the top-level widget.
    pub fn pop_top_widget<H: Host + ?Sized>(&mut self, host: &mut H) -> Option<WidgetId> {
        if self.tops.is_empty() {
            return None;
        }
        let mut ctx = EventCtx::new();
        self.before_top_change(host, &mut ctx, true);
        let popped = self.tops.pop();
        self.after_top_change(host, &mut ctx);
        self.apply_requests(host, &mut ctx);
        popped
    }

    /// Focus `widget`; see [`FocusManager::request_focus`].
    pub fn request_focus<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        widget: WidgetId,
        steal: bool,
    ) -> bool {
        let mut ctx = EventCtx::new();
        let focused = self.focus.request_focus(host, &mut ctx, widget, steal);
        self.apply_requests(host, &mut ctx);
        focused
    }

    /// Clear focus.
    pub fn focus_none<H: Host + ?Sized>(&mut self, host: &mut H) {
        let mut ctx = EventCtx::new();
        self.focus.focus_none(host, &mut ctx);
        self.apply_requests(host, &mut ctx);
    }

    /// Give `widget` modal focus; see [`FocusManager::request_modal_focus`].
    pub fn request_modal_focus<H: Host + ?Sized>(&mut self, host: &mut H, widget: WidgetId) -> bool {
        let mut ctx = EventCtx::new();
        let acquired = self.modal_focus(host, &mut ctx, widget);
        self.apply_requests(host, &mut ctx);
        acquired
    }

    /// Release modal focus held by `widget`.
    pub fn release_modal_focus<H: Host + ?Sized>(&mut self, host: &mut H, widget: WidgetId) -> bool {
        let mut ctx = EventCtx::new();
        let released = self.release_modal(host, &mut ctx, widget);
        self.apply_requests(host, &mut ctx);
        released
    }

    /// Move focus along the tab order. Returns `false` if there was nowhere to go.
    pub fn tab_move_focus<H: Host + ?Sized>(&mut self, host: &mut H, reverse: bool) -> bool {
        let mut ctx = EventCtx::new();
        let moved = self.tab_move(host, &mut ctx, reverse);
        self.apply_requests(host, &mut ctx);
        moved
    }

    /// Subscribe `widget` to every `skip_modulus`-th timer tick.
    pub fn subscribe_timer(&mut self, widget: WidgetId, skip_modulus: u32) {
        self.timers.subscribe(widget, skip_modulus);
    }

    /// Drop `widget`'s timer subscription.
    pub fn unsubscribe_timer(&mut self, widget: WidgetId) {
        self.timers.unsubscribe(widget);
    }

    /// Tell the router `widget` was hidden or deactivated.
    ///
    /// Call after the change is visible through the host's [`WidgetTree`]. Hover,
    /// drag-over, capture and focus leave the widget's subtree, and a drag whose
    /// source lies inside it is aborted.
    pub fn widget_became_invisible_or_inactive<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        widget: WidgetId,
    ) {
        let mut ctx = EventCtx::new();
        self.widget_hidden(host, &mut ctx, widget);
        self.apply_requests(host, &mut ctx);
    }

    /// Tell the router `widget` and its subtree are about to be destroyed.
    ///
    /// Call while the widgets are still alive. With `destroying` set, focus and
    /// hover leave silently. A drag whose source lies inside the subtree goes on
    /// without a source, unless the subtree holds the top-level widget, in which
    /// case the drag is aborted as on any top-level change.
    pub fn widget_deregistered<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        widget: WidgetId,
        destroying: bool,
    ) {
        let mut ctx = EventCtx::new();
        self.widget_gone(host, &mut ctx, widget, destroying);
        self.apply_requests(host, &mut ctx);
    }

    /// Re-confine hover, drag-over and capture after the modal widget changed
    /// outside of the router's own operations.
    pub fn modal_focus_changed<H: Host + ?Sized>(&mut self, host: &mut H) {
        let mut ctx = EventCtx::new();
        self.handle_modal_change(host, &mut ctx);
        self.apply_requests(host, &mut ctx);
    }

    /// Abort a running drag-and-drop operation.
    ///
    /// See [`DragDropTracker::abort_drag`] for the flags.
    pub fn abort_drag<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        send_events: bool,
        send_dd_end_to_gone_src: bool,
    ) {
        let mut ctx = EventCtx::new();
        self.cancel_drag(host, &mut ctx, send_events, send_dd_end_to_gone_src);
        self.apply_requests(host, &mut ctx);
    }

    fn mouse_moved<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        ctx: &mut EventCtx,
        pos: Point,
        timestamp: Timestamp,
    ) {
        self.pointer = Some(pos);
        let path = self.hit_test(&*host, pos);
        self.hover.remove_not_under(host, ctx, &path, pos, timestamp);

        if self.drag.is_active() {
            self.drag.remove_not_under_drag(host, ctx, &path, pos, timestamp);
            self.drag.register_entered(host, ctx, &path, pos, timestamp);
            self.drag.send_moved(host, ctx, pos, timestamp);
            return;
        }

        if let Some(capture) = self.live_capture(&*host) {
            let chain = self.chain_for(&*host, capture.widget, pos);
            let pointer = Pointer {
                screen_pos: pos,
                button: Some(capture.button),
                timestamp,
            };
            delivery::bubble_mouse(host, ctx, &chain, MouseEventKind::Dragged, pointer);
            if let Some((source, representation)) = ctx.take_spawned_drag() {
                self.capture = None;
                self.clicks.cancel();
                self.drag.prepare_drag_drop_operation(
                    representation,
                    source.or(Some(capture.widget)),
                    capture.button,
                );
                self.drag.register_entered(host, ctx, &path, pos, timestamp);
            }
            return;
        }

        self.hover
            .reregister_under(host, ctx, &path, pos, true, timestamp);
    }

    fn mouse_pressed<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        ctx: &mut EventCtx,
        pos: Point,
        button: MouseButton,
        timestamp: Timestamp,
    ) {
        self.pointer = Some(pos);
        if self.drag.is_active() {
            trace!(?button, "press ignored during drag");
            return;
        }
        let path = match self.live_capture(&*host) {
            Some(capture) => self.chain_for(&*host, capture.widget, pos),
            None => {
                let path = self.hit_test(&*host, pos);
                self.hover.remove_not_under(host, ctx, &path, pos, timestamp);
                self.hover
                    .register_entered(host, ctx, &path, pos, Some(button), timestamp);
                path
            }
        };
        let Some(leaf) = path.leaf().map(|e| e.widget) else {
            return;
        };
        let pointer = Pointer {
            screen_pos: pos,
            button: Some(button),
            timestamp,
        };
        delivery::bubble_mouse(host, ctx, &path, MouseEventKind::Pressed, pointer);
        self.capture = Some(Capture {
            widget: leaf,
            button,
        });
        self.clicks.on_down(leaf, button, pos, timestamp);

        if self.config.focus_on_press {
            let target = path
                .widgets()
                .rev()
                .find(|&w| FocusManager::can_focus(&*host, w));
            if let Some(target) = target {
                self.focus.request_focus(host, ctx, target, false);
            }
        }
    }

    fn mouse_released<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        ctx: &mut EventCtx,
        pos: Point,
        button: MouseButton,
        timestamp: Timestamp,
    ) {
        self.pointer = Some(pos);
        if self.drag.is_active() {
            self.drag
                .finish_drag_drop_operation(host, ctx, pos, timestamp);
            self.capture = None;
            self.clicks.cancel();
            let under = self.hit_test(&*host, pos);
            self.rebuild_hover(host, ctx, &under, pos, timestamp);
            return;
        }

        let captured = self.live_capture(&*host);
        self.capture = None;
        let path = match captured {
            Some(capture) => self.chain_for(&*host, capture.widget, pos),
            None => self.hit_test(&*host, pos),
        };
        let under = self.hit_test(&*host, pos);
        let pointer = Pointer {
            screen_pos: pos,
            button: Some(button),
            timestamp,
        };
        if let Some(leaf) = path.leaf().map(|e| e.widget) {
            delivery::bubble_mouse(host, ctx, &path, MouseEventKind::Released, pointer);
            if captured.is_some() {
                let hovered = under.contains(leaf) && host.is_interactive(leaf);
                if let ClickResult::Click { target, count } =
                    self.clicks.on_up(button, &leaf, hovered, timestamp)
                    && host.is_interactive(target)
                {
                    trace!(?target, count, "click");
                    delivery::deliver_mouse(
                        host,
                        ctx,
                        target,
                        MouseEventKind::Clicked,
                        pointer,
                        count,
                    );
                }
            }
        }
        self.rebuild_hover(host, ctx, &under, pos, timestamp);
    }

    fn mouse_wheel<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        ctx: &mut EventCtx,
        dz: f64,
        timestamp: Timestamp,
    ) {
        let Some(pos) = self.pointer else {
            return;
        };
        let kind = if dz > 0.0 {
            MouseEventKind::WheelUp
        } else if dz < 0.0 {
            MouseEventKind::WheelDown
        } else {
            return;
        };
        let pinned = if self.drag.is_active() {
            self.drag_source().filter(|&source| host.is_alive(source))
        } else {
            self.live_capture(&*host).map(|capture| capture.widget)
        };
        let path = match pinned {
            Some(widget) => self.chain_for(&*host, widget, pos),
            None => self.hit_test(&*host, pos),
        };
        let pointer = Pointer {
            screen_pos: pos,
            button: None,
            timestamp,
        };
        delivery::bubble_mouse(host, ctx, &path, kind, pointer);
    }

    fn key<H: Host + ?Sized>(&mut self, host: &mut H, ctx: &mut EventCtx, key: Key) {
        let focused = self.focus.focused().filter(|&f| host.is_alive(f));
        let consumed = match focused {
            Some(focused) => {
                let chain = self.chain_for(&*host, focused, self.pointer.unwrap_or(Point::ZERO));
                delivery::bubble_key(host, ctx, &chain, key).is_some()
            }
            None => false,
        };
        if consumed
            || !self.config.tab_navigation
            || key.kind != KeyEventKind::Char
            || key.code != KeyCode::TAB
        {
            return;
        }
        if let Some(focused) = focused
            && !host.flags(focused).contains(WidgetFlags::TAB_OUT)
        {
            return;
        }
        self.tab_move(host, ctx, key.modifiers.contains(Modifiers::SHIFT));
    }

    fn timer_tick<H: Host + ?Sized>(&mut self, host: &mut H, ctx: &mut EventCtx, count: u64) {
        let slots = self.timers.begin_pass();
        for index in 0..slots {
            let Some(sub) = self.timers.slot(index) else {
                continue;
            };
            if !sub.wants(count) {
                continue;
            }
            if !host.is_alive(sub.widget) {
                debug!(widget = ?sub.widget, "dropping timer subscription of a stale widget");
                self.timers.unsubscribe(sub.widget);
                continue;
            }
            ctx.set_current(Some(sub.widget));
            host.timer_ticked(sub.widget, count, ctx);
            ctx.set_current(None);
            self.apply_requests(host, ctx);
        }
        self.timers.end_pass();
    }

    fn tab_move<H: Host + ?Sized>(&mut self, host: &mut H, ctx: &mut EventCtx, reverse: bool) -> bool {
        let policy = DefaultPolicy {
            wrap: self.config.tab_wrap,
        };
        self.focus
            .tab_move_focus(host, ctx, self.top_widget(), &policy, reverse)
    }

    fn modal_focus<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        ctx: &mut EventCtx,
        widget: WidgetId,
    ) -> bool {
        let before = self.focus.modal();
        let acquired = self.focus.request_modal_focus(host, ctx, widget);
        if self.focus.modal() != before {
            self.handle_modal_change(host, ctx);
        }
        acquired
    }

    fn release_modal<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        ctx: &mut EventCtx,
        widget: WidgetId,
    ) -> bool {
        let released = self.focus.release_modal_focus(host, ctx, widget);
        if released {
            self.handle_modal_change(host, ctx);
        }
        released
    }

    fn widget_hidden<H: Host + ?Sized>(&mut self, host: &mut H, ctx: &mut EventCtx, widget: WidgetId) {
        debug!(?widget, "widget hidden or deactivated");
        if self
            .drag_source()
            .is_some_and(|source| host.is_ancestor_or_self(widget, source))
        {
            self.cancel_drag(host, ctx, true, true);
        }
        let pos = self.pointer.unwrap_or(Point::ZERO);
        self.hover
            .remove_subtree(host, ctx, widget, true, pos, self.now);
        self.drag
            .remove_subtree(host, ctx, widget, true, pos, self.now);
        self.release_capture_in(&*host, widget);
        if self.focus.remove_subtree(host, ctx, widget, true) {
            self.handle_modal_change(host, ctx);
        }
    }

    fn widget_gone<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        ctx: &mut EventCtx,
        widget: WidgetId,
        destroying: bool,
    ) {
        debug!(?widget, destroying, "widget deregistered");
        let send = !destroying;
        let pos = self.pointer.unwrap_or(Point::ZERO);
        let outer = self.dying.replace(widget);

        self.hover
            .remove_subtree(host, ctx, widget, send, pos, self.now);
        self.drag
            .remove_subtree(host, ctx, widget, send, pos, self.now);
        self.drag.source_deregistered(&*host, widget);
        self.release_capture_in(&*host, widget);
        self.timers.unsubscribe_subtree(&*host, widget);
        let modal_changed = self.focus.remove_subtree(host, ctx, widget, send);

        let top_before = self.top_widget();
        if top_before.is_some_and(|top| host.is_ancestor_or_self(widget, top)) {
            self.before_top_change(host, ctx, send);
        }
        self.tops.retain(|&t| !host.is_ancestor_or_self(widget, t));
        if self.top_widget() != top_before {
            self.after_top_change(host, ctx);
        } else if modal_changed {
            self.handle_modal_change(host, ctx);
        }

        self.dying = outer;
    }

    fn cancel_drag<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        ctx: &mut EventCtx,
        send_events: bool,
        send_dd_end_to_gone_src: bool,
    ) {
        if !self.drag.is_active() {
            return;
        }
        let pos = self.pointer.unwrap_or(Point::ZERO);
        self.drag
            .abort_drag(host, ctx, send_events, send_dd_end_to_gone_src, pos, self.now);
        self.capture = None;
        self.clicks.cancel();
        self.refresh_pointer(host, ctx);
    }

    /// Confine hover, drag-over and capture to the modal subtree, then rebuild at
    /// the pointer.
    fn handle_modal_change<H: Host + ?Sized>(&mut self, host: &mut H, ctx: &mut EventCtx) {
        let pos = self.pointer.unwrap_or(Point::ZERO);
        if let Some(modal) = self.focus.modal() {
            self.hover
                .remove_all_except_subtree(host, ctx, modal, true, pos, self.now);
            self.drag
                .remove_all_except_subtree(host, ctx, modal, true, pos, self.now);
            if let Some(capture) = self.capture
                && !host.is_ancestor_or_self(modal, capture.widget)
            {
                self.capture = None;
                self.clicks.cancel();
            }
        }
        self.refresh_pointer(host, ctx);
    }

    fn before_top_change<H: Host + ?Sized>(&mut self, host: &mut H, ctx: &mut EventCtx, send: bool) {
        let pos = self.pointer.unwrap_or(Point::ZERO);
        self.hover.clear(host, ctx, send, pos, self.now);
        self.drag.abort_drag(host, ctx, send, send, pos, self.now);
        self.capture = None;
        self.clicks.cancel();
    }

    fn after_top_change<H: Host + ?Sized>(&mut self, host: &mut H, ctx: &mut EventCtx) {
        debug!(top = ?self.top_widget(), "top-level widget changed");
        self.focus.retain_within(host, ctx, self.top_widget());
        self.refresh_pointer(host, ctx);
    }

    /// Re-run hover (or drag-over) tracking at the last pointer position.
    fn refresh_pointer<H: Host + ?Sized>(&mut self, host: &mut H, ctx: &mut EventCtx) {
        let Some(pos) = self.pointer else {
            return;
        };
        let path = self.hit_test(&*host, pos);
        if self.drag.is_active() {
            self.hover.remove_not_under(host, ctx, &path, pos, self.now);
            self.drag
                .remove_not_under_drag(host, ctx, &path, pos, self.now);
            self.drag.register_entered(host, ctx, &path, pos, self.now);
        } else if self.capture.is_some() {
            self.hover.remove_not_under(host, ctx, &path, pos, self.now);
        } else {
            self.rebuild_hover(host, ctx, &path, pos, self.now);
        }
    }

    fn rebuild_hover<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        ctx: &mut EventCtx,
        path: &TraversalPath,
        pos: Point,
        timestamp: Timestamp,
    ) {
        self.hover.remove_not_under(host, ctx, path, pos, timestamp);
        self.hover
            .reregister_under(host, ctx, path, pos, false, timestamp);
    }

    fn drag_source(&self) -> Option<WidgetId> {
        self.drag.context().and_then(|c| c.info().source())
    }

    fn live_capture<T: WidgetTree + ?Sized>(&mut self, tree: &T) -> Option<Capture> {
        if let Some(capture) = self.capture
            && !tree.is_alive(capture.widget)
        {
            self.capture = None;
            self.clicks.cancel();
        }
        self.capture
    }

    fn release_capture_in<T: WidgetTree + ?Sized>(&mut self, tree: &T, root: WidgetId) {
        if let Some(capture) = self.capture
            && tree.is_ancestor_or_self(root, capture.widget)
        {
            trace!(widget = ?capture.widget, "capture released");
            self.capture = None;
        }
        self.clicks.forget(|&w| tree.is_ancestor_or_self(root, w));
    }

    fn chain_for<T: WidgetTree + ?Sized>(&self, tree: &T, widget: WidgetId, pos: Point) -> TraversalPath {
        path::chain_to(tree, widget, self.scope_root(), pos)
    }

    /// Apply the requests handlers queued, including any they queue meanwhile.
    fn apply_requests<H: Host + ?Sized>(&mut self, host: &mut H, ctx: &mut EventCtx) {
        while let Some(request) = ctx.next_request() {
            trace!(?request, "applying request");
            match request {
                Request::Focus { widget, steal } => {
                    self.focus.request_focus(host, ctx, widget, steal);
                }
                Request::FocusNone => self.focus.focus_none(host, ctx),
                Request::ModalFocus(widget) => {
                    self.modal_focus(host, ctx, widget);
                }
                Request::ReleaseModalFocus(widget) => {
                    self.release_modal(host, ctx, widget);
                }
                Request::TabMove { reverse } => {
                    self.tab_move(host, ctx, reverse);
                }
                Request::SubscribeTimer {
                    widget,
                    skip_modulus,
                } => self.timers.subscribe(widget, skip_modulus),
                Request::UnsubscribeTimer(widget) => self.timers.unsubscribe(widget),
                Request::BecameInvisibleOrInactive(widget) => self.widget_hidden(host, ctx, widget),
                Request::Deregistered { widget, destroying } => {
                    self.widget_gone(host, ctx, widget, destroying);
                }
                Request::AbortDrag => self.cancel_drag(host, ctx, true, true),
            }
        }
        if ctx.take_spawned_drag().is_some() {
            warn!("drag spawned outside of a Dragged delivery; representation dropped");
        }
        ctx.take_source_action();
    }
}
