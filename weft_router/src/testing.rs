// Copyright 2025 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording host shared by the router tests.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;

use hashbrown::HashSet;
use kurbo::{Point, Rect};
use weft_tree::{LocalWidget, Tree, Visibility, WidgetFlags, WidgetId, WidgetTree};

use crate::capability::{DragTarget, FocusTarget, KeyTarget, MouseTarget, TimerTarget};
use crate::ctx::EventCtx;
use crate::drag::{DragRepresentation, SourceAction};
use crate::event::{
    DragDropEvent, DragDropEventKind, FocusEvent, KeyEvent, KeyEventKind, MouseEvent,
    MouseEventKind,
};

/// One recorded delivery.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Seen {
    Mouse(MouseEventKind),
    Key(KeyEventKind),
    Drag(DragDropEventKind),
    Focus(FocusEvent),
    Tick(u64),
}

type MouseHook = Box<dyn FnMut(&mut Tree, WidgetId, &MouseEvent, &mut EventCtx)>;
type TickHook = Box<dyn FnMut(WidgetId, u64, &mut EventCtx)>;

/// Counts how often the value it is attached to gets dropped.
pub(crate) struct DropCounter(pub(crate) Rc<Cell<u32>>);

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}

pub(crate) struct TestHost {
    pub(crate) tree: Tree,
    pub(crate) log: Vec<(WidgetId, Seen)>,
    pub(crate) mouse_events: Vec<MouseEvent>,
    pub(crate) consume_mouse: HashSet<WidgetId>,
    pub(crate) consume_keys: HashSet<WidgetId>,
    pub(crate) accept_drop: HashSet<WidgetId>,
    pub(crate) spawn_drag_from: Option<WidgetId>,
    pub(crate) drop_action: Option<SourceAction>,
    pub(crate) ended_action: Option<SourceAction>,
    pub(crate) representation_drops: Rc<Cell<u32>>,
    pub(crate) on_mouse: Option<MouseHook>,
    pub(crate) on_tick: Option<TickHook>,
}

impl TestHost {
    pub(crate) fn new(tree: Tree) -> Self {
        Self {
            tree,
            log: Vec::new(),
            mouse_events: Vec::new(),
            consume_mouse: HashSet::new(),
            consume_keys: HashSet::new(),
            accept_drop: HashSet::new(),
            spawn_drag_from: None,
            drop_action: None,
            ended_action: None,
            representation_drops: Rc::new(Cell::new(0)),
            on_mouse: None,
            on_tick: None,
        }
    }

    pub(crate) fn take_log(&mut self) -> Vec<(WidgetId, Seen)> {
        self.mouse_events.clear();
        core::mem::take(&mut self.log)
    }

    /// Recorded deliveries matching `keep`, in order.
    pub(crate) fn filtered(&self, keep: impl Fn(&Seen) -> bool) -> Vec<(WidgetId, Seen)> {
        self.log.iter().copied().filter(|(_, s)| keep(s)).collect()
    }

    pub(crate) fn count(&self, widget: WidgetId, seen: Seen) -> usize {
        self.log.iter().filter(|&&e| e == (widget, seen)).count()
    }
}

pub(crate) fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> LocalWidget {
    LocalWidget {
        bounds: Rect::new(x0, y0, x1, y1),
        ..LocalWidget::default()
    }
}

pub(crate) fn focusable(x0: f64, y0: f64, x1: f64, y1: f64) -> LocalWidget {
    LocalWidget {
        flags: WidgetFlags::default() | WidgetFlags::FOCUSABLE,
        ..rect(x0, y0, x1, y1)
    }
}

/// A ⊃ B ⊃ C with C focusable; (100, 100) hits C.
pub(crate) fn nested() -> (TestHost, WidgetId, WidgetId, WidgetId) {
    let mut tree = Tree::new();
    let a = tree.insert(None, rect(0.0, 0.0, 300.0, 300.0));
    let b = tree.insert(Some(a), rect(50.0, 50.0, 250.0, 250.0));
    let c = tree.insert(Some(b), focusable(25.0, 25.0, 125.0, 125.0));
    (TestHost::new(tree), a, b, c)
}

pub(crate) const IN_C: Point = Point::new(100.0, 100.0);
pub(crate) const IN_B_ONLY: Point = Point::new(60.0, 60.0);
pub(crate) const OUTSIDE: Point = Point::new(400.0, 400.0);

impl WidgetTree for TestHost {
    fn is_alive(&self, id: WidgetId) -> bool {
        self.tree.is_alive(id)
    }

    fn parent_of(&self, id: WidgetId) -> Option<WidgetId> {
        self.tree.parent_of(id)
    }

    fn children_of(&self, id: WidgetId) -> &[WidgetId] {
        self.tree.children_of(id)
    }

    fn absolute_rect(&self, id: WidgetId) -> Option<Rect> {
        self.tree.absolute_rect(id)
    }

    fn flags(&self, id: WidgetId) -> WidgetFlags {
        self.tree.flags(id)
    }

    fn visibility(&self, id: WidgetId) -> Visibility {
        self.tree.visibility(id)
    }

    fn z_index(&self, id: WidgetId) -> i32 {
        self.tree.z_index(id)
    }

    fn contains_point_irregular(&self, id: WidgetId, local: Point) -> bool {
        self.tree.contains_point_irregular(id, local)
    }
}

impl MouseTarget for TestHost {
    fn send_mouse_event(&mut self, widget: WidgetId, event: &MouseEvent, ctx: &mut EventCtx) -> bool {
        self.log.push((widget, Seen::Mouse(event.kind)));
        self.mouse_events.push(*event);
        if event.kind == MouseEventKind::Dragged && self.spawn_drag_from == Some(widget) {
            self.spawn_drag_from = None;
            let drops = DropCounter(self.representation_drops.clone());
            ctx.spawn_drag(DragRepresentation::new("text/plain").with_visual(drops));
        }
        if let Some(mut hook) = self.on_mouse.take() {
            hook(&mut self.tree, widget, event, ctx);
            self.on_mouse = Some(hook);
        }
        self.consume_mouse.contains(&widget)
    }
}

impl KeyTarget for TestHost {
    fn send_key_event(&mut self, widget: WidgetId, event: &KeyEvent, _ctx: &mut EventCtx) -> bool {
        self.log.push((widget, Seen::Key(event.kind)));
        self.consume_keys.contains(&widget)
    }
}

impl DragTarget for TestHost {
    fn send_dragdrop_event(
        &mut self,
        widget: WidgetId,
        event: &DragDropEvent<'_>,
        ctx: &mut EventCtx,
    ) -> bool {
        self.log.push((widget, Seen::Drag(event.kind)));
        if event.kind == DragDropEventKind::Dropped
            && let Some(action) = self.drop_action
        {
            ctx.set_source_action(action);
        }
        if event.kind == DragDropEventKind::Ended {
            self.ended_action = Some(event.source_action);
        }
        event.kind == DragDropEventKind::Entered
            && event.drag.representation().content() == "text/plain"
            && self.accept_drop.contains(&widget)
    }
}

impl FocusTarget for TestHost {
    fn send_focus_event(&mut self, widget: WidgetId, event: FocusEvent, _ctx: &mut EventCtx) {
        self.log.push((widget, Seen::Focus(event)));
    }
}

impl TimerTarget for TestHost {
    fn timer_ticked(&mut self, widget: WidgetId, count: u64, ctx: &mut EventCtx) {
        self.log.push((widget, Seen::Tick(count)));
        if let Some(mut hook) = self.on_tick.take() {
            hook(widget, count, ctx);
            self.on_tick = Some(hook);
        }
    }
}
