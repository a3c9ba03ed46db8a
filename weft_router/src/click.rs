// Copyright 2025 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Click recognition for a single pointer.
//!
//! A click is a press and release of the same button on the same widget, with the
//! widget still hovered at release time. Consecutive clicks on one widget count up
//! when each press follows the previous release within the multi-click interval.
//!
//! ```
//! use kurbo::Point;
//! use weft_router::click::{ClickResult, ClickState};
//! use weft_router::event::MouseButton;
//!
//! let mut state: ClickState<u32> = ClickState::new(0.3);
//!
//! state.on_down(42, MouseButton::Left, Point::new(10.0, 20.0), 1.0);
//! assert_eq!(
//!     state.on_up(MouseButton::Left, &42, true, 1.1),
//!     ClickResult::Click { target: 42, count: 1 }
//! );
//!
//! // A quick second press on the same target continues the sequence.
//! state.on_down(42, MouseButton::Left, Point::new(10.0, 20.0), 1.2);
//! assert_eq!(
//!     state.on_up(MouseButton::Left, &42, true, 1.25),
//!     ClickResult::Click { target: 42, count: 2 }
//! );
//! ```

use kurbo::Point;

use crate::event::{MouseButton, Timestamp};

/// State for the active press.
#[derive(Clone, Debug, PartialEq)]
pub struct Press<K> {
    /// Widget the press landed on.
    pub target: K,
    /// Pointer position at press time.
    pub down_position: Point,
    /// When the press happened.
    pub down_time: Timestamp,
    /// Button that went down.
    pub button: MouseButton,
}

/// The last recognized click.
#[derive(Clone, Debug, PartialEq)]
pub struct LastClick<K> {
    /// The press that produced it.
    pub press: Press<K>,
    /// When the button went up.
    pub up_time: Timestamp,
    /// Position in the multi-click sequence, starting at 1.
    pub count: u32,
}

/// Result of a release.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickResult<K> {
    /// Deliver a click with this count to `target`.
    Click {
        /// The pressed widget.
        target: K,
        /// Position in the multi-click sequence.
        count: u32,
    },
    /// No click; carries the pressed widget if there was an active press.
    Suppressed(Option<K>),
}

/// Click recognition state machine.
#[derive(Clone, Debug)]
pub struct ClickState<K> {
    press: Option<Press<K>>,
    last_click: Option<LastClick<K>>,
    /// Maximum seconds between a release and the next press for a multi-click.
    pub multi_click_interval: f64,
}

impl<K: PartialEq + Clone> ClickState<K> {
    /// Idle state with the given multi-click interval.
    pub fn new(multi_click_interval: f64) -> Self {
        Self {
            press: None,
            last_click: None,
            multi_click_interval,
        }
    }

    /// Record a press, replacing any active one.
    pub fn on_down(&mut self, target: K, button: MouseButton, position: Point, timestamp: Timestamp) {
        self.press = Some(Press {
            target,
            down_position: position,
            down_time: timestamp,
            button,
        });
    }

    /// Process a release over `current_target`.
    ///
    /// `still_hovered` reports whether the pressed widget is under the pointer.
    pub fn on_up(
        &mut self,
        button: MouseButton,
        current_target: &K,
        still_hovered: bool,
        timestamp: Timestamp,
    ) -> ClickResult<K> {
        let Some(press) = self.press.take() else {
            return ClickResult::Suppressed(None);
        };
        if press.button != button || press.target != *current_target || !still_hovered {
            return ClickResult::Suppressed(Some(press.target));
        }
        let count = match &self.last_click {
            Some(last)
                if last.press.target == press.target
                    && last.press.button == press.button
                    && press.down_time - last.up_time <= self.multi_click_interval =>
            {
                last.count + 1
            }
            _ => 1,
        };
        let target = press.target.clone();
        self.last_click = Some(LastClick {
            press,
            up_time: timestamp,
            count,
        });
        ClickResult::Click { target, count }
    }

    /// Cancel the active press. Returns whether one was active.
    pub fn cancel(&mut self) -> bool {
        self.press.take().is_some()
    }

    /// Forget all state for targets matching `pred`.
    pub fn forget(&mut self, mut pred: impl FnMut(&K) -> bool) {
        if self.press.as_ref().is_some_and(|p| pred(&p.target)) {
            self.press = None;
        }
        if self.last_click.as_ref().is_some_and(|c| pred(&c.press.target)) {
            self.last_click = None;
        }
    }

    /// Whether a press is active.
    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    /// The active press.
    pub fn press(&self) -> Option<&Press<K>> {
        self.press.as_ref()
    }

    /// The last recognized click.
    pub fn last_click(&self) -> Option<&LastClick<K>> {
        self.last_click.as_ref()
    }

    /// Target of the last recognized click.
    pub fn last_click_target(&self) -> Option<&K> {
        self.last_click.as_ref().map(|c| &c.press.target)
    }
}
