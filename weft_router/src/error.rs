// Copyright 2025 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contract violations reported by the router.
//!
//! These describe collaborator bugs, not runtime conditions. The plain APIs panic
//! with them; the `try_` variants hand them back for hosts that prefer to log.

use weft_tree::WidgetId;

/// A broken routing contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RoutingError {
    /// A traversal path would exceed [`MAX_PATH_DEPTH`](crate::path::MAX_PATH_DEPTH) entries.
    #[error("traversal path exceeds the maximum depth of {max} widgets")]
    PathTooDeep {
        /// The depth limit that was hit.
        max: usize,
    },
    /// A top-level widget was pushed while already on the top-level stack.
    #[error("top-level widget {0:?} is already registered")]
    RootAlreadyAdded(WidgetId),
}
