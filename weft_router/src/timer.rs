// Copyright 2025 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timer subscriptions.
//!
//! Subscribers receive every tick whose counter is a multiple of their skip
//! modulus. The registry can be mutated while a tick pass walks it:
//! unsubscribing blanks the entry in place so the pass skips it, and subscribing
//! is queued until the pass ends.

use alloc::vec::Vec;

use weft_tree::{WidgetId, WidgetTree};

/// One subscription.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Subscription {
    /// Subscriber.
    pub widget: WidgetId,
    /// Tick divisor; at least 1.
    pub skip_modulus: u32,
}

impl Subscription {
    /// Whether tick `count` is delivered to this subscriber.
    pub fn wants(&self, count: u64) -> bool {
        count % u64::from(self.skip_modulus) == 0
    }
}

#[derive(Copy, Clone, Debug)]
enum Pending {
    Subscribe(Subscription),
    Unsubscribe(WidgetId),
}

/// Registry of timer subscriptions, safe to mutate during a tick pass.
#[derive(Clone, Debug, Default)]
pub struct TimerRegistry {
    entries: Vec<Option<Subscription>>,
    pending: Vec<Pending>,
    iterating: bool,
}

impl TimerRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `widget`, replacing an existing subscription's modulus.
    ///
    /// A modulus of 0 is treated as 1. During a pass the subscription takes effect
    /// once the pass ends.
    pub fn subscribe(&mut self, widget: WidgetId, skip_modulus: u32) {
        let sub = Subscription {
            widget,
            skip_modulus: skip_modulus.max(1),
        };
        if self.iterating {
            self.pending.push(Pending::Subscribe(sub));
        } else {
            self.upsert(sub);
        }
    }

    /// Drop `widget`'s subscription. Takes effect immediately, even mid-pass.
    pub fn unsubscribe(&mut self, widget: WidgetId) {
        if self.iterating {
            for entry in &mut self.entries {
                if entry.is_some_and(|s| s.widget == widget) {
                    *entry = None;
                }
            }
            self.pending.push(Pending::Unsubscribe(widget));
        } else {
            self.entries.retain(|e| e.is_some_and(|s| s.widget != widget));
        }
    }

    /// Drop the subscriptions of every widget in the subtree of `root`.
    pub fn unsubscribe_subtree<T: WidgetTree + ?Sized>(&mut self, tree: &T, root: WidgetId) {
        let doomed: Vec<WidgetId> = self
            .subscribers()
            .filter(|&w| tree.is_ancestor_or_self(root, w))
            .collect();
        for widget in doomed {
            self.unsubscribe(widget);
        }
    }

    /// Whether `widget` is subscribed or will be once the current pass ends.
    pub fn is_subscribed(&self, widget: WidgetId) -> bool {
        let mut subscribed = self.entries.iter().flatten().any(|s| s.widget == widget);
        for pending in &self.pending {
            match pending {
                Pending::Subscribe(s) if s.widget == widget => subscribed = true,
                Pending::Unsubscribe(w) if *w == widget => subscribed = false,
                _ => {}
            }
        }
        subscribed
    }

    /// Number of live subscriptions, queued ones excluded.
    pub fn len(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    /// Whether there are no live subscriptions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live subscribers in subscription order, queued ones included.
    pub fn subscribers(&self) -> impl Iterator<Item = WidgetId> + '_ {
        self.entries
            .iter()
            .flatten()
            .map(|s| s.widget)
            .chain(self.pending.iter().filter_map(|p| match p {
                Pending::Subscribe(s) => Some(s.widget),
                Pending::Unsubscribe(_) => None,
            }))
    }

    /// Start a pass; returns how many slots to visit.
    pub(crate) fn begin_pass(&mut self) -> usize {
        self.iterating = true;
        self.entries.len()
    }

    /// The subscription in slot `index`, unless it was removed.
    pub(crate) fn slot(&self, index: usize) -> Option<Subscription> {
        self.entries.get(index).copied().flatten()
    }

    /// End a pass: compact removed slots and apply queued changes in order.
    pub(crate) fn end_pass(&mut self) {
        self.iterating = false;
        self.entries.retain(Option::is_some);
        for pending in core::mem::take(&mut self.pending) {
            match pending {
                Pending::Subscribe(sub) => self.upsert(sub),
                Pending::Unsubscribe(widget) => {
                    self.entries.retain(|e| e.is_some_and(|s| s.widget != widget));
                }
            }
        }
    }

    fn upsert(&mut self, sub: Subscription) {
        if let Some(existing) = self
            .entries
            .iter_mut()
            .flatten()
            .find(|s| s.widget == sub.widget)
        {
            existing.skip_modulus = sub.skip_modulus;
        } else {
            self.entries.push(Some(sub));
        }
    }
}
