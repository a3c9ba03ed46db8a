// Copyright 2025 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag and drop: the payload, the running operation, and the widgets under it.
//!
//! A drag starts when a handler of [`MouseEventKind::Dragged`] calls
//! [`EventCtx::spawn_drag`]. From then on the router feeds pointer motion to the
//! [`DragDropTracker`] instead of the hover tracker:
//!
//! - widgets newly under the pointer get [`DragDropEventKind::Entered`]; the first
//!   one to accept becomes the drop target and keeps that role until it is left;
//! - the target alone gets [`DragDropEventKind::Moved`];
//! - on release the target gets [`DragDropEventKind::Dropped`], the source gets
//!   [`DragDropEventKind::Ended`] followed by a synthetic
//!   [`MouseEventKind::Released`], and every other widget still under the drag
//!   gets [`DragDropEventKind::Left`].
//!
//! The tracker owns the [`DragRepresentation`] for the whole operation and drops
//! it exactly once, when the operation finishes or is aborted.
//!
//! [`MouseEventKind::Dragged`]: crate::event::MouseEventKind::Dragged
//! [`MouseEventKind::Released`]: crate::event::MouseEventKind::Released

use alloc::boxed::Box;
use alloc::string::String;
use core::any::Any;
use core::fmt;

use kurbo::{Point, Size, Vec2};
use tracing::{debug, trace, warn};
use weft_tree::WidgetId;

use crate::capability::Host;
use crate::ctx::EventCtx;
use crate::delivery::{self, Pointer};
use crate::event::{DragDropEvent, DragDropEventKind, MouseButton, MouseEventKind, Timestamp};
use crate::path::{self, TraversalPath, local_point};
use crate::set::WidgetSet;

/// What the drag source should do with its copy of the payload after a drop.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SourceAction {
    /// Keep it (copy semantics).
    #[default]
    None,
    /// Remove it (move semantics).
    Remove,
}

/// The payload and visual of a drag-and-drop operation.
///
/// `content` names the payload type (for example a MIME type) so drop targets can
/// decide whether to accept. Arbitrary data travels in `user_data`; a rendered
/// preview travels in `visual`.
pub struct DragRepresentation {
    content: String,
    hotspot: Vec2,
    size: Size,
    visual: Option<Box<dyn Any>>,
    user_data: Option<Box<dyn Any>>,
}

impl DragRepresentation {
    /// A representation carrying `content` with no visual or data.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            hotspot: Vec2::ZERO,
            size: Size::ZERO,
            visual: None,
            user_data: None,
        }
    }

    /// Offset of the pointer within the visual.
    #[must_use]
    pub fn with_hotspot(mut self, hotspot: Vec2) -> Self {
        self.hotspot = hotspot;
        self
    }

    /// Size of the visual.
    #[must_use]
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    /// Attach a visual; dropped together with the representation.
    #[must_use]
    pub fn with_visual(mut self, visual: impl Any) -> Self {
        self.visual = Some(Box::new(visual));
        self
    }

    /// Attach arbitrary data for the drop target.
    #[must_use]
    pub fn with_user_data(mut self, data: impl Any) -> Self {
        self.user_data = Some(Box::new(data));
        self
    }

    /// Payload type.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Offset of the pointer within the visual.
    pub fn hotspot(&self) -> Vec2 {
        self.hotspot
    }

    /// Size of the visual.
    pub fn size(&self) -> Size {
        self.size
    }

    /// The visual, if its type is `T`.
    pub fn visual<T: Any>(&self) -> Option<&T> {
        self.visual.as_deref()?.downcast_ref()
    }

    /// The attached data, if its type is `T`.
    pub fn user_data<T: Any>(&self) -> Option<&T> {
        self.user_data.as_deref()?.downcast_ref()
    }
}

impl fmt::Debug for DragRepresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragRepresentation")
            .field("content", &self.content)
            .field("hotspot", &self.hotspot)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// What drop targets see of a running drag.
#[derive(Debug)]
pub struct DragInfo {
    source: Option<WidgetId>,
    button: MouseButton,
    representation: DragRepresentation,
}

impl DragInfo {
    /// The widget the drag started from; `None` once it was deregistered.
    pub fn source(&self) -> Option<WidgetId> {
        self.source
    }

    /// The button holding the drag.
    pub fn button(&self) -> MouseButton {
        self.button
    }

    /// The payload.
    pub fn representation(&self) -> &DragRepresentation {
        &self.representation
    }
}

/// State of a running drag-and-drop operation.
#[derive(Debug)]
pub struct DragContext {
    info: DragInfo,
    target: Option<WidgetId>,
    source_action: SourceAction,
}

impl DragContext {
    /// Source, button and payload.
    pub fn info(&self) -> &DragInfo {
        &self.info
    }

    /// The widget that accepted the drag, if any.
    pub fn target(&self) -> Option<WidgetId> {
        self.target
    }

    /// Action chosen by the target when it handled the drop.
    pub fn source_action(&self) -> SourceAction {
        self.source_action
    }
}

/// Tracks the running drag-and-drop operation and the widgets under it.
#[derive(Debug, Default)]
pub struct DragDropTracker {
    context: Option<DragContext>,
    under: WidgetSet,
}

impl DragDropTracker {
    /// A tracker with no operation running.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an operation is running.
    pub fn is_active(&self) -> bool {
        self.context.is_some()
    }

    /// The running operation.
    pub fn context(&self) -> Option<&DragContext> {
        self.context.as_ref()
    }

    /// Widgets under the drag, outermost first.
    pub fn under_drag(&self) -> &[WidgetId] {
        self.under.as_slice()
    }

    /// Whether `widget` is under the drag.
    pub fn is_under_drag(&self, widget: WidgetId) -> bool {
        self.under.contains(widget)
    }

    /// Start an operation.
    ///
    /// An operation that is already running wins; the new representation is
    /// dropped.
    pub fn prepare_drag_drop_operation(
        &mut self,
        representation: DragRepresentation,
        source: Option<WidgetId>,
        button: MouseButton,
    ) {
        if self.context.is_some() {
            warn!("drag already in progress; ignoring new drag representation");
            return;
        }
        debug!(?source, content = representation.content(), "drag started");
        self.context = Some(DragContext {
            info: DragInfo {
                source,
                button,
                representation,
            },
            target: None,
            source_action: SourceAction::None,
        });
    }

    /// Add every widget of `path` not yet under the drag, outermost first, sending
    /// each `Entered`. The first acceptor becomes the target if there is none.
    pub fn register_entered<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        ctx: &mut EventCtx,
        path: &TraversalPath,
        screen_pos: Point,
        timestamp: Timestamp,
    ) {
        let Some(context) = self.context.as_mut() else {
            return;
        };
        if let Some(target) = context.target
            && !(host.is_alive(target) && self.under.contains(target))
        {
            context.target = None;
        }
        for id in path.widgets() {
            if self.under.contains(id) {
                continue;
            }
            if !path::reachable(&*host, path, id) {
                break;
            }
            self.under.insert_on_path(id, path);
            let Some(context) = self.context.as_mut() else {
                return;
            };
            let accepted = deliver(
                host,
                ctx,
                context,
                id,
                DragDropEventKind::Entered,
                screen_pos,
                timestamp,
            );
            if accepted && context.target.is_none() {
                debug!(?id, "drop target accepted");
                context.target = Some(id);
            }
        }
    }

    /// Send `Moved` to the current target.
    pub fn send_moved<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        ctx: &mut EventCtx,
        screen_pos: Point,
        timestamp: Timestamp,
    ) {
        let Some(context) = self.context.as_ref() else {
            return;
        };
        if let Some(target) = context.target
            && host.is_interactive(target)
        {
            deliver(
                host,
                ctx,
                context,
                target,
                DragDropEventKind::Moved,
                screen_pos,
                timestamp,
            );
        }
    }

    /// Remove every widget under the drag that is not on `path`, sending `Left`
    /// deepest first.
    pub fn remove_not_under_drag<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        ctx: &mut EventCtx,
        path: &TraversalPath,
        screen_pos: Point,
        timestamp: Timestamp,
    ) {
        self.under.retain_alive(&*host);
        let gone = self.under.not_in_path(path);
        self.remove_each(host, ctx, &gone, true, screen_pos, timestamp);
    }

    /// Remove the widgets under the drag inside the subtree of `root`.
    pub fn remove_subtree<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        ctx: &mut EventCtx,
        root: WidgetId,
        send_events: bool,
        screen_pos: Point,
        timestamp: Timestamp,
    ) {
        let gone = self.under.in_subtree(&*host, root);
        self.remove_each(host, ctx, &gone, send_events, screen_pos, timestamp);
    }

    /// Remove the widgets under the drag outside the subtree of `root`.
    pub fn remove_all_except_subtree<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        ctx: &mut EventCtx,
        root: WidgetId,
        send_events: bool,
        screen_pos: Point,
        timestamp: Timestamp,
    ) {
        let gone = self.under.outside_subtree(&*host, root);
        self.remove_each(host, ctx, &gone, send_events, screen_pos, timestamp);
    }

    /// Forget the source if it lies in the subtree of `root`; the operation goes on.
    pub fn source_deregistered<H: Host + ?Sized>(&mut self, host: &H, root: WidgetId) {
        if let Some(context) = self.context.as_mut()
            && let Some(source) = context.info.source
            && host.is_ancestor_or_self(root, source)
        {
            debug!(?source, "drag source deregistered");
            context.info.source = None;
        }
    }

    /// Complete the operation at `screen_pos`.
    ///
    /// Sends `Dropped` to the target, then `Ended` and a synthetic `Released` to the
    /// source, then `Left` to the remaining widgets, and drops the representation.
    pub fn finish_drag_drop_operation<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        ctx: &mut EventCtx,
        screen_pos: Point,
        timestamp: Timestamp,
    ) {
        let Some(mut context) = self.context.take() else {
            return;
        };
        let target = context
            .target
            .filter(|&t| host.is_alive(t) && self.under.contains(t));
        if let Some(target) = target {
            ctx.take_source_action();
            deliver(
                host,
                ctx,
                &context,
                target,
                DragDropEventKind::Dropped,
                screen_pos,
                timestamp,
            );
            if let Some(action) = ctx.take_source_action() {
                context.source_action = action;
            }
        }
        debug!(?target, action = ?context.source_action, "drag finished");
        end_at_source(host, ctx, &context, screen_pos, timestamp);
        for id in self.under.all() {
            self.under.remove(id);
            if Some(id) != target && host.is_alive(id) {
                deliver(
                    host,
                    ctx,
                    &context,
                    id,
                    DragDropEventKind::Left,
                    screen_pos,
                    timestamp,
                );
            }
        }
    }

    /// Abort the operation, dropping the representation.
    ///
    /// `send_events` sends `Left` to every widget under the drag, target included.
    /// `send_dd_end_to_gone_src` sends `Ended` and a synthetic `Released` to the
    /// source if it is still alive.
    pub fn abort_drag<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        ctx: &mut EventCtx,
        send_events: bool,
        send_dd_end_to_gone_src: bool,
        screen_pos: Point,
        timestamp: Timestamp,
    ) {
        let Some(context) = self.context.take() else {
            return;
        };
        debug!(source = ?context.info.source, "drag aborted");
        if send_dd_end_to_gone_src {
            end_at_source(host, ctx, &context, screen_pos, timestamp);
        }
        for id in self.under.all() {
            self.under.remove(id);
            if send_events && host.is_alive(id) {
                deliver(
                    host,
                    ctx,
                    &context,
                    id,
                    DragDropEventKind::Left,
                    screen_pos,
                    timestamp,
                );
            }
        }
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
        for &id in ids {
            if !self.under.remove(id) {
                continue;
            }
            let Some(context) = self.context.as_mut() else {
                continue;
            };
            if context.target == Some(id) {
                trace!(?id, "drop target left");
                context.target = None;
            }
            if send_events && host.is_alive(id) {
                deliver(
                    host,
                    ctx,
                    context,
                    id,
                    DragDropEventKind::Left,
                    screen_pos,
                    timestamp,
                );
            }
        }
    }
}

fn end_at_source<H: Host + ?Sized>(
    host: &mut H,
    ctx: &mut EventCtx,
    context: &DragContext,
    screen_pos: Point,
    timestamp: Timestamp,
) {
    let Some(source) = context.info.source else {
        return;
    };
    if !host.is_alive(source) {
        return;
    }
    deliver(
        host,
        ctx,
        context,
        source,
        DragDropEventKind::Ended,
        screen_pos,
        timestamp,
    );
    let pointer = Pointer {
        screen_pos,
        button: Some(context.info.button),
        timestamp,
    };
    delivery::deliver_mouse(host, ctx, source, MouseEventKind::Released, pointer, 0);
}

fn deliver<H: Host + ?Sized>(
    host: &mut H,
    ctx: &mut EventCtx,
    context: &DragContext,
    widget: WidgetId,
    kind: DragDropEventKind,
    screen_pos: Point,
    timestamp: Timestamp,
) -> bool {
    let event = DragDropEvent {
        kind,
        pos: local_point(&*host, widget, screen_pos),
        screen_pos,
        button: context.info.button,
        source_action: context.source_action,
        drag: &context.info,
        timestamp,
    };
    ctx.set_current(Some(widget));
    let accepted = host.send_dragdrop_event(widget, &event, ctx);
    ctx.set_current(None);
    accepted
}
