// Copyright 2025 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Building typed events and handing them to the host.

use kurbo::Point;
use weft_tree::WidgetId;

use crate::capability::Host;
use crate::ctx::EventCtx;
use crate::dispatcher::{self, Outcome};
use crate::event::{
    FocusEvent, KeyCode, KeyEvent, KeyEventKind, Modifiers, MouseButton, MouseEvent,
    MouseEventKind, Phase, Timestamp,
};
use crate::path::{self, TraversalPath, local_point};

/// Screen position, button and time shared by the events of one input.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Pointer {
    pub(crate) screen_pos: Point,
    pub(crate) button: Option<MouseButton>,
    pub(crate) timestamp: Timestamp,
}

/// Deliver a non-bubbling mouse event to `widget` alone.
pub(crate) fn deliver_mouse<H: Host + ?Sized>(
    host: &mut H,
    ctx: &mut EventCtx,
    widget: WidgetId,
    kind: MouseEventKind,
    pointer: Pointer,
    click_count: u32,
) -> bool {
    let event = MouseEvent {
        kind,
        pos: local_point(&*host, widget, pointer.screen_pos),
        screen_pos: pointer.screen_pos,
        button: pointer.button,
        source: widget,
        phase: Phase::Target,
        click_count,
        timestamp: pointer.timestamp,
    };
    ctx.set_current(Some(widget));
    let consumed = host.send_mouse_event(widget, &event, ctx);
    ctx.set_current(None);
    consumed
}

/// Bubble a mouse event from the leaf of `path` to its root.
///
/// Widgets that are no longer reachable (they or an ancestor on the path stopped
/// being interactive since the path was computed) are skipped. Returns the widget that consumed the event.
pub(crate) fn bubble_mouse<H: Host + ?Sized>(
    host: &mut H,
    ctx: &mut EventCtx,
    path: &TraversalPath,
    kind: MouseEventKind,
    pointer: Pointer,
) -> Option<WidgetId> {
    let source = path.leaf()?.widget;
    let seq = dispatcher::bubble_sequence(path);
    let stopped = dispatcher::run(&seq, &mut (), |d, _| {
        if !path::reachable(&*host, path, d.widget) {
            return Outcome::Continue;
        }
        let event = MouseEvent {
            kind,
            pos: local_point(&*host, d.widget, pointer.screen_pos),
            screen_pos: pointer.screen_pos,
            button: pointer.button,
            source,
            phase: d.phase,
            click_count: 0,
            timestamp: pointer.timestamp,
        };
        ctx.set_current(Some(d.widget));
        let consumed = host.send_mouse_event(d.widget, &event, ctx);
        ctx.set_current(None);
        if consumed {
            Outcome::Stop
        } else {
            Outcome::Continue
        }
    });
    stopped.map(|d| d.widget)
}

/// Key payload shared by every step of a keyboard delivery.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Key {
    pub(crate) kind: KeyEventKind,
    pub(crate) code: KeyCode,
    pub(crate) modifiers: Modifiers,
    pub(crate) unicode: Option<char>,
    pub(crate) repeated: bool,
    pub(crate) timestamp: Timestamp,
}

/// Bubble a key event from the leaf of `chain` (the focus widget) to its root.
pub(crate) fn bubble_key<H: Host + ?Sized>(
    host: &mut H,
    ctx: &mut EventCtx,
    chain: &TraversalPath,
    key: Key,
) -> Option<WidgetId> {
    let source = chain.leaf()?.widget;
    let seq = dispatcher::bubble_sequence(chain);
    let stopped = dispatcher::run(&seq, &mut (), |d, _| {
        if !path::reachable(&*host, chain, d.widget) {
            return Outcome::Continue;
        }
        let event = KeyEvent {
            kind: key.kind,
            code: key.code,
            modifiers: key.modifiers,
            unicode: key.unicode,
            repeated: key.repeated,
            source,
            phase: d.phase,
            timestamp: key.timestamp,
        };
        ctx.set_current(Some(d.widget));
        let consumed = host.send_key_event(d.widget, &event, ctx);
        ctx.set_current(None);
        if consumed {
            Outcome::Stop
        } else {
            Outcome::Continue
        }
    });
    stopped.map(|d| d.widget)
}

/// Notify `widget` of a focus change.
pub(crate) fn deliver_focus<H: Host + ?Sized>(
    host: &mut H,
    ctx: &mut EventCtx,
    widget: WidgetId,
    event: FocusEvent,
) {
    ctx.set_current(Some(widget));
    host.send_focus_event(widget, event, ctx);
    ctx.set_current(None);
}
