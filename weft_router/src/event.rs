// Copyright 2025 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event vocabulary: raw platform input and the typed events delivered to widgets.
//!
//! Raw input arrives as [`ExternalEvent`]s in screen coordinates. The router turns
//! them into [`MouseEvent`], [`KeyEvent`], [`DragDropEvent`] and [`FocusEvent`]
//! deliveries, localizing positions to each receiving widget.

use kurbo::Point;
use weft_tree::WidgetId;

use crate::drag::{DragInfo, SourceAction};

/// Seconds on a monotonic clock chosen by the platform layer.
pub type Timestamp = f64;

/// A mouse button.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Secondary button.
    Right,
    /// Wheel button.
    Middle,
    /// Any further button, by platform index.
    Other(u8),
}

bitflags::bitflags! {
    /// Keyboard modifier state at the time of a key event.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Either shift key.
        const SHIFT = 1 << 0;
        /// Either control key.
        const CTRL = 1 << 1;
        /// Either alt/option key.
        const ALT = 1 << 2;
        /// Either meta/command/super key.
        const META = 1 << 3;
    }
}

/// Platform key code.
///
/// Codes are opaque to the router except for [`KeyCode::TAB`], which drives tab
/// navigation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyCode(pub u32);

impl KeyCode {
    /// Horizontal tab.
    pub const TAB: Self = Self(0x09);
    /// Return / enter.
    pub const ENTER: Self = Self(0x0D);
    /// Escape.
    pub const ESCAPE: Self = Self(0x1B);
    /// Space bar.
    pub const SPACE: Self = Self(0x20);
}

/// What happened in a raw input event.
#[derive(Clone, Debug, PartialEq)]
pub enum ExternalEventKind {
    /// The pointer moved to `pos`.
    MouseMoved {
        /// Screen-space pointer position.
        pos: Point,
    },
    /// A button went down at `pos`.
    MousePressed {
        /// Screen-space pointer position.
        pos: Point,
        /// Button that went down.
        button: MouseButton,
    },
    /// A button went up at `pos`.
    MouseReleased {
        /// Screen-space pointer position.
        pos: Point,
        /// Button that went up.
        button: MouseButton,
    },
    /// The wheel turned; positive `dz` scrolls up.
    MouseWheel {
        /// Wheel delta.
        dz: f64,
    },
    /// A key went down.
    KeyPressed {
        /// Key code.
        code: KeyCode,
        /// Modifier state.
        modifiers: Modifiers,
    },
    /// A key went up.
    KeyReleased {
        /// Key code.
        code: KeyCode,
        /// Modifier state.
        modifiers: Modifiers,
    },
    /// A character was produced.
    KeyChar {
        /// Key code that produced the character.
        code: KeyCode,
        /// Modifier state.
        modifiers: Modifiers,
        /// The produced character, if printable.
        unicode: Option<char>,
        /// Whether this is an auto-repeat.
        repeated: bool,
    },
    /// The periodic timer fired for the `count`-th time.
    TimerTick {
        /// Monotonic tick counter.
        count: u64,
    },
}

/// A raw input event from the platform layer.
#[derive(Clone, Debug, PartialEq)]
pub struct ExternalEvent {
    /// When the event happened.
    pub timestamp: Timestamp,
    /// What happened.
    pub kind: ExternalEventKind,
}

impl ExternalEvent {
    /// Create an event.
    pub const fn new(timestamp: Timestamp, kind: ExternalEventKind) -> Self {
        Self { timestamp, kind }
    }

    /// Pointer moved to `pos`.
    pub const fn mouse_moved(timestamp: Timestamp, pos: Point) -> Self {
        Self::new(timestamp, ExternalEventKind::MouseMoved { pos })
    }

    /// `button` pressed at `pos`.
    pub const fn mouse_pressed(timestamp: Timestamp, pos: Point, button: MouseButton) -> Self {
        Self::new(timestamp, ExternalEventKind::MousePressed { pos, button })
    }

    /// `button` released at `pos`.
    pub const fn mouse_released(timestamp: Timestamp, pos: Point, button: MouseButton) -> Self {
        Self::new(timestamp, ExternalEventKind::MouseReleased { pos, button })
    }

    /// Wheel turned by `dz`.
    pub const fn mouse_wheel(timestamp: Timestamp, dz: f64) -> Self {
        Self::new(timestamp, ExternalEventKind::MouseWheel { dz })
    }

    /// Key `code` pressed.
    pub const fn key_pressed(timestamp: Timestamp, code: KeyCode, modifiers: Modifiers) -> Self {
        Self::new(timestamp, ExternalEventKind::KeyPressed { code, modifiers })
    }

    /// Key `code` released.
    pub const fn key_released(timestamp: Timestamp, code: KeyCode, modifiers: Modifiers) -> Self {
        Self::new(timestamp, ExternalEventKind::KeyReleased { code, modifiers })
    }

    /// Character produced by key `code`.
    pub const fn key_char(
        timestamp: Timestamp,
        code: KeyCode,
        modifiers: Modifiers,
        unicode: Option<char>,
    ) -> Self {
        Self::new(
            timestamp,
            ExternalEventKind::KeyChar {
                code,
                modifiers,
                unicode,
                repeated: false,
            },
        )
    }

    /// Timer tick number `count`.
    pub const fn timer_tick(timestamp: Timestamp, count: u64) -> Self {
        Self::new(timestamp, ExternalEventKind::TimerTick { count })
    }
}

/// Where in a bubbling delivery a widget sits.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The widget is the event's source.
    Target,
    /// The widget is an ancestor of the source.
    Bubble,
}

/// Kind of a [`MouseEvent`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    /// The pointer entered the widget. Not bubbled.
    Entered,
    /// The pointer left the widget. Not bubbled.
    Left,
    /// The pointer moved over the widget.
    Moved,
    /// A button went down.
    Pressed,
    /// A button went up.
    Released,
    /// Press and release on the same widget. Not bubbled.
    Clicked,
    /// The pointer moved while the widget holds the pointer capture.
    Dragged,
    /// The wheel scrolled up.
    WheelUp,
    /// The wheel scrolled down.
    WheelDown,
}

/// A pointer event delivered to one widget.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MouseEvent {
    /// What happened.
    pub kind: MouseEventKind,
    /// Pointer position relative to the receiving widget's origin.
    pub pos: Point,
    /// Pointer position in screen space.
    pub screen_pos: Point,
    /// Button involved, if any.
    pub button: Option<MouseButton>,
    /// Widget the event originated at; the receiver itself unless bubbling.
    pub source: WidgetId,
    /// Whether the receiver is the source or an ancestor.
    pub phase: Phase,
    /// Consecutive clicks so far; `0` outside of [`MouseEventKind::Clicked`].
    pub click_count: u32,
    /// When the triggering input happened.
    pub timestamp: Timestamp,
}

/// Kind of a [`KeyEvent`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyEventKind {
    /// A key went down.
    Pressed,
    /// A key went up.
    Released,
    /// A character was produced.
    Char,
}

/// A keyboard event delivered to one widget of the focus chain.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct KeyEvent {
    /// What happened.
    pub kind: KeyEventKind,
    /// Key code.
    pub code: KeyCode,
    /// Modifier state.
    pub modifiers: Modifiers,
    /// Produced character for [`KeyEventKind::Char`].
    pub unicode: Option<char>,
    /// Auto-repeat flag for [`KeyEventKind::Char`].
    pub repeated: bool,
    /// The focused widget the event originated at.
    pub source: WidgetId,
    /// Whether the receiver is the source or an ancestor.
    pub phase: Phase,
    /// When the key input happened.
    pub timestamp: Timestamp,
}

/// Kind of a [`DragDropEvent`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DragDropEventKind {
    /// The drag entered the widget. Returning `true` offers the widget as drop target.
    Entered,
    /// The drag moved over the current drop target.
    Moved,
    /// The drag left the widget.
    Left,
    /// The payload was dropped on the target.
    Dropped,
    /// The operation ended; sent to the source.
    Ended,
}

/// A drag-and-drop event delivered to one widget.
#[derive(Copy, Clone, Debug)]
pub struct DragDropEvent<'a> {
    /// What happened.
    pub kind: DragDropEventKind,
    /// Pointer position relative to the receiving widget's origin.
    pub pos: Point,
    /// Pointer position in screen space.
    pub screen_pos: Point,
    /// The button that started the drag.
    pub button: MouseButton,
    /// What the source should do with its copy of the payload.
    pub source_action: SourceAction,
    /// Source and payload of the running operation.
    pub drag: &'a DragInfo,
    /// When the triggering input happened.
    pub timestamp: Timestamp,
}

/// Focus change notifications.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FocusEvent {
    /// The widget became the focus widget.
    Gained,
    /// The widget stopped being the focus widget.
    Lost,
    /// The widget became the modal-focus widget.
    ModalGained,
    /// The widget stopped being the modal-focus widget.
    ModalLost,
}
