// Copyright 2025 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for widgets: identifiers, flags, visibility, and local geometry.

use kurbo::{Rect, RoundedRect};

/// Identifier for a widget (generational).
///
/// The router only ever stores `WidgetId`s, never references into the host's
/// storage. A stale id (its slot was freed or reused) is detected through
/// [`WidgetTree::is_alive`](crate::WidgetTree::is_alive) and skipped.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct WidgetId(pub(crate) u32, pub(crate) u32);

impl WidgetId {
    /// Build an identifier from a slot index and a generation.
    ///
    /// Hosts that keep their own widget storage use this to mint ids; two ids
    /// with the same index but different generations never compare equal.
    pub const fn from_raw(index: u32, generation: u32) -> Self {
        Self(index, generation)
    }

    /// Slot index of this id.
    pub const fn index(self) -> u32 {
        self.0
    }

    /// Generation of this id.
    pub const fn generation(self) -> u32 {
        self.1
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Widget flags consulted by hit-testing, focus, and tab navigation.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct WidgetFlags: u8 {
        /// Widget reacts to input. Inactive widgets are transparent to the pointer.
        const ACTIVE    = 0b0000_0001;
        /// Widget may hold keyboard focus.
        const FOCUSABLE = 0b0000_0010;
        /// Tab navigation may move focus into this widget.
        const TAB_IN    = 0b0000_0100;
        /// Tab navigation may move focus out of this widget.
        const TAB_OUT   = 0b0000_1000;
        /// Widget has a non-rectangular shape; see
        /// [`WidgetTree::contains_point_irregular`](crate::WidgetTree::contains_point_irregular).
        const IRREGULAR = 0b0001_0000;
    }
}

impl Default for WidgetFlags {
    fn default() -> Self {
        Self::ACTIVE | Self::TAB_IN | Self::TAB_OUT
    }
}

/// Visibility of a widget.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Drawn and reachable by input.
    #[default]
    Visible,
    /// Not drawn, still occupies its place in layout.
    Invisible,
    /// Not drawn and takes no space.
    Gone,
}

impl Visibility {
    /// Whether the widget is drawn.
    pub const fn is_visible(self) -> bool {
        matches!(self, Self::Visible)
    }
}

/// Local data for a widget in the reference [`Tree`](crate::Tree).
#[derive(Clone, Debug)]
pub struct LocalWidget {
    /// Bounds relative to the parent's origin (or the screen for roots).
    pub bounds: Rect,
    /// Z-order among siblings. Higher is in front.
    pub z_index: i32,
    /// Activity, focus, and tab flags.
    pub flags: WidgetFlags,
    /// Visibility state.
    pub visibility: Visibility,
    /// Precise hit shape in local coordinates, used when
    /// [`WidgetFlags::IRREGULAR`] is set.
    pub shape: Option<RoundedRect>,
}

impl Default for LocalWidget {
    fn default() -> Self {
        Self {
            bounds: Rect::ZERO,
            z_index: 0,
            flags: WidgetFlags::default(),
            visibility: Visibility::Visible,
            shape: None,
        }
    }
}
