// Copyright 2025 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatcher helper: walk a bubbling sequence and honor stop outcomes.
//!
//! The router delivers pointer and keyboard events leaf-first: the source widget
//! gets [`Phase::Target`], then each ancestor up to the scope root gets
//! [`Phase::Bubble`]. A handler that consumes the event stops the walk.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use weft_router::dispatcher::{self, Outcome};
//! use weft_router::event::Phase;
//! use weft_router::path::TraversalPath;
//! use weft_tree::WidgetId;
//!
//! let (root, mid, leaf) = (
//!     WidgetId::from_raw(0, 0),
//!     WidgetId::from_raw(1, 0),
//!     WidgetId::from_raw(2, 0),
//! );
//! let mut path = TraversalPath::new();
//! path.push(root, Point::ZERO);
//! path.push(mid, Point::ZERO);
//! path.push(leaf, Point::ZERO);
//!
//! let seq = dispatcher::bubble_sequence(&path);
//! let mut seen = Vec::new();
//! let stopped = dispatcher::run(&seq, &mut (), |d, _| {
//!     seen.push((d.phase, d.widget));
//!     if d.widget == mid { Outcome::Stop } else { Outcome::Continue }
//! });
//!
//! assert_eq!(seen, vec![(Phase::Target, leaf), (Phase::Bubble, mid)]);
//! assert_eq!(stopped.map(|d| d.widget), Some(mid));
//! ```

use smallvec::SmallVec;
use weft_tree::WidgetId;

use crate::event::Phase;
use crate::path::{MAX_PATH_DEPTH, TraversalPath};

/// Whether propagation continues after a handler.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Keep going.
    Continue,
    /// Stop; no further widgets see the event.
    Stop,
}

/// One step of a delivery sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dispatch {
    /// Phase of this step.
    pub phase: Phase,
    /// Receiving widget.
    pub widget: WidgetId,
}

/// Leaf-first bubbling sequence for `path`.
pub fn bubble_sequence(path: &TraversalPath) -> SmallVec<[Dispatch; MAX_PATH_DEPTH]> {
    path.widgets()
        .rev()
        .enumerate()
        .map(|(i, widget)| Dispatch {
            phase: if i == 0 { Phase::Target } else { Phase::Bubble },
            widget,
        })
        .collect()
}

/// Run a handler over a dispatch sequence and honor stop outcomes.
///
/// Returns `None` if the full sequence was visited, or the entry whose handler
/// returned [`Outcome::Stop`].
pub fn run<'a, E>(
    seq: &'a [Dispatch],
    event: &mut E,
    mut handler: impl FnMut(&Dispatch, &mut E) -> Outcome,
) -> Option<&'a Dispatch> {
    for d in seq {
        if handler(d, event) == Outcome::Stop {
            return Some(d);
        }
    }
    None
}
