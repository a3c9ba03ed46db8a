// Copyright 2025 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Weft Router: a deterministic, `no_std` input router for retained-mode UI.
//!
//! ## Overview
//!
//! The router turns raw platform input ([`ExternalEvent`]) into per-widget
//! deliveries. It owns the interaction state of a widget tree and nothing else:
//!
//! - **Hover**: the hovered set always equals the path hit by the last pointer
//!   position. See [`hover`].
//! - **Pointer capture and clicks**: a pressed widget keeps the pointer until
//!   release; press and release on the same hovered widget make a click, counted
//!   up for quick repeats. See [`click`].
//! - **Focus and modal focus**: one focus widget, one optional modal widget that
//!   confines pointer input, focus and tab navigation to its subtree. See [`focus`].
//! - **Drag and drop**: a source, a first-accept-wins target, the widgets under the
//!   drag, and an owned payload dropped exactly once. See [`drag`].
//! - **Timers**: tick subscriptions that tolerate changes mid-delivery. See [`timer`].
//!
//! Widgets are referred to by generational [`WidgetId`](weft_tree::WidgetId)s. The
//! host answers structural questions through [`WidgetTree`](weft_tree::WidgetTree)
//! and receives events through the capability traits in [`capability`].
//!
//! ## Deferred requests
//!
//! Handlers receive an [`EventCtx`]. Focus changes, timer subscriptions,
//! visibility notifications and drag requests made there are queued and applied
//! by the router after the handler returns, so trackers are never mutated while
//! they iterate. Every delivery step re-checks that its widget is still alive
//! and reachable.
//!
//! ## Bubbling
//!
//! Pointer events (other than `Entered`, `Left` and `Clicked`) and key events
//! bubble from the source widget up to the scope root, which is the modal widget
//! if one is set and the top-level widget otherwise. A handler returning `true`
//! consumes the event. See [`dispatcher`].
//!
//! ## Logging
//!
//! State transitions are reported through `tracing` at `debug` and `trace`
//! level; contract slips that the router recovers from are reported at `warn`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod capability;
pub mod click;
pub mod config;
pub mod ctx;
pub mod dispatcher;
pub mod drag;
pub mod error;
pub mod event;
pub mod focus;
pub mod hover;
pub mod path;
pub mod router;
pub mod timer;

mod delivery;
mod set;

#[cfg(test)]
mod testing;

pub use capability::{DragTarget, FocusTarget, Host, KeyTarget, MouseTarget, TimerTarget};
pub use config::RouterConfig;
pub use ctx::EventCtx;
pub use drag::{DragRepresentation, SourceAction};
pub use error::RoutingError;
pub use event::{
    DragDropEvent, DragDropEventKind, ExternalEvent, ExternalEventKind, FocusEvent, KeyCode,
    KeyEvent, KeyEventKind, Modifiers, MouseButton, MouseEvent, MouseEventKind, Phase,
};
pub use router::EventRouter;
