// Copyright 2025 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover, click, focus and drag-and-drop through `weft_router`.
//!
//! A window holds a draggable card, a trash can that accepts cards, and a
//! focusable button. The scripted input below moves over the card, drags it onto
//! the trash, then clicks the button and tabs around.
//!
//! Run:
//! - `cargo run -p weft_demos --example router_basics`

use kurbo::{Point, Rect};
use weft_router::{
    DragDropEvent, DragDropEventKind, DragRepresentation, DragTarget, EventCtx, EventRouter,
    ExternalEvent, FocusEvent, FocusTarget, KeyCode, KeyEvent, KeyTarget, Modifiers, MouseButton,
    MouseEvent, MouseEventKind, MouseTarget, SourceAction, TimerTarget,
};
use weft_tree::{LocalWidget, Tree, Visibility, WidgetFlags, WidgetId, WidgetTree};

struct Scene {
    tree: Tree,
    card: WidgetId,
    trash: WidgetId,
    button: WidgetId,
    names: Vec<(WidgetId, &'static str)>,
    trashed: Vec<String>,
}

impl Scene {
    fn name(&self, id: WidgetId) -> &'static str {
        self.names
            .iter()
            .find(|(w, _)| *w == id)
            .map_or("?", |(_, n)| n)
    }
}

impl WidgetTree for Scene {
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
}

impl MouseTarget for Scene {
    fn send_mouse_event(&mut self, id: WidgetId, ev: &MouseEvent, ctx: &mut EventCtx) -> bool {
        match ev.kind {
            MouseEventKind::Entered | MouseEventKind::Left => {
                println!("  {:<7} {:?}", self.name(id), ev.kind);
                false
            }
            MouseEventKind::Dragged if id == self.card => {
                println!("  card    starts a drag");
                ctx.spawn_drag(DragRepresentation::new("card").with_user_data(String::from("todo #1")));
                true
            }
            MouseEventKind::Clicked if id == self.button => {
                println!("  button  clicked (count {})", ev.click_count);
                ctx.request_focus(id);
                true
            }
            _ => false,
        }
    }
}

impl DragTarget for Scene {
    fn send_dragdrop_event(&mut self, id: WidgetId, ev: &DragDropEvent<'_>, ctx: &mut EventCtx) -> bool {
        println!("  {:<7} drag {:?}", self.name(id), ev.kind);
        match ev.kind {
            DragDropEventKind::Entered => {
                id == self.trash && ev.drag.representation().content() == "card"
            }
            DragDropEventKind::Dropped => {
                if let Some(data) = ev.drag.representation().user_data::<String>() {
                    self.trashed.push(data.clone());
                }
                ctx.set_source_action(SourceAction::Remove);
                true
            }
            DragDropEventKind::Ended => {
                println!("  card    source action {:?}", ev.source_action);
                true
            }
            _ => false,
        }
    }
}

impl KeyTarget for Scene {
    fn send_key_event(&mut self, id: WidgetId, ev: &KeyEvent, _ctx: &mut EventCtx) -> bool {
        println!("  {:<7} key {:?} {:?}", self.name(id), ev.kind, ev.code);
        false
    }
}

impl FocusTarget for Scene {
    fn send_focus_event(&mut self, id: WidgetId, ev: FocusEvent, _ctx: &mut EventCtx) {
        println!("  {:<7} {:?}", self.name(id), ev);
    }
}

impl TimerTarget for Scene {}

fn widget(x0: f64, y0: f64, x1: f64, y1: f64) -> LocalWidget {
    LocalWidget {
        bounds: Rect::new(x0, y0, x1, y1),
        ..LocalWidget::default()
    }
}

fn main() {
    let mut tree = Tree::new();
    let window = tree.insert(None, widget(0.0, 0.0, 400.0, 300.0));
    let card = tree.insert(Some(window), widget(20.0, 20.0, 120.0, 80.0));
    let trash = tree.insert(Some(window), widget(280.0, 20.0, 380.0, 120.0));
    let button = tree.insert(
        Some(window),
        LocalWidget {
            flags: WidgetFlags::default() | WidgetFlags::FOCUSABLE,
            ..widget(20.0, 200.0, 140.0, 240.0)
        },
    );
    let mut scene = Scene {
        tree,
        card,
        trash,
        button,
        names: vec![
            (window, "window"),
            (card, "card"),
            (trash, "trash"),
            (button, "button"),
        ],
        trashed: Vec::new(),
    };

    let mut router = EventRouter::default();
    router.set_top_widget(&mut scene, Some(window));

    let left = MouseButton::Left;
    let script = [
        ("hover the card", ExternalEvent::mouse_moved(0.0, Point::new(50.0, 50.0))),
        ("press on the card", ExternalEvent::mouse_pressed(0.1, Point::new(50.0, 50.0), left)),
        ("drag a little", ExternalEvent::mouse_moved(0.2, Point::new(60.0, 50.0))),
        ("drag over the trash", ExternalEvent::mouse_moved(0.3, Point::new(300.0, 60.0))),
        ("release over the trash", ExternalEvent::mouse_released(0.4, Point::new(300.0, 60.0), left)),
        ("press the button", ExternalEvent::mouse_pressed(1.0, Point::new(50.0, 220.0), left)),
        ("release the button", ExternalEvent::mouse_released(1.1, Point::new(50.0, 220.0), left)),
        (
            "tab",
            ExternalEvent::key_char(1.2, KeyCode::TAB, Modifiers::empty(), Some('\t')),
        ),
    ];
    for (label, event) in script {
        println!("{label}:");
        router.dispatch(&mut scene, &event);
    }

    let hovered: Vec<&str> = router.hovered().iter().map(|&w| scene.name(w)).collect();
    println!("hovered: {hovered:?}");
    println!("focused: {:?}", router.focused().map(|w| scene.name(w)));
    println!("trashed: {:?}", scene.trashed);
}
