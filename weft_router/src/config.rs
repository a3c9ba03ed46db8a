// Copyright 2025 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Router configuration.

use weft_focus::WrapMode;

/// Policies for an [`EventRouter`](crate::router::EventRouter).
///
/// ```
/// use weft_router::{EventRouter, RouterConfig};
///
/// let router = EventRouter::new(RouterConfig {
///     focus_on_press: true,
///     ..RouterConfig::default()
/// });
/// assert!(router.config().tab_navigation);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RouterConfig {
    /// Move focus on an unconsumed Tab character (Shift+Tab moves backward).
    pub tab_navigation: bool,
    /// Wrap behavior of tab navigation at the ends of the focus scope.
    pub tab_wrap: WrapMode,
    /// On press, focus the nearest focusable widget of the pressed chain.
    pub focus_on_press: bool,
    /// Maximum gap in seconds between a click's release and the next press on the
    /// same widget for the clicks to count as one multi-click.
    pub multi_click_interval: f64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            tab_navigation: true,
            tab_wrap: WrapMode::Scope,
            focus_on_press: false,
            multi_click_interval: 0.3,
        }
    }
}
