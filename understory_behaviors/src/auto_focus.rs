// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Move focus into a node on attach and restore it on destroy.
//!
//! Focus capture is deferred: the effect posts a task that, on the host's
//! next flush, records the currently focused element and focuses the first
//! tabbable descendant of the node. [`AutoFocus::settled`] reports the element
//! that received focus once the task has run.
//!
//! Destroying the effect before the task runs turns the task into a no-op.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use understory_dom::{Deferred, Document, NodeId};
use understory_effect::{Effect, Patch};

/// Enumerates the focusable descendants of a node, in tab order.
pub trait Tabbable {
    /// Tabbable descendants of `root`, excluding `root` itself.
    fn tabbable(&self, doc: &Document, root: NodeId) -> Vec<NodeId>;
}

impl<F: Fn(&Document, NodeId) -> Vec<NodeId>> Tabbable for F {
    fn tabbable(&self, doc: &Document, root: NodeId) -> Vec<NodeId> {
        self(doc, root)
    }
}

/// A tab-order query for the in-memory document.
///
/// A descendant is tabbable when it is a connected element that is natively
/// focusable (`button`, `input`, `select`, `textarea`, `a[href]`) or has a
/// `tabindex` of zero or more; elements with a negative `tabindex`, or that
/// are `disabled`, or sit under a `hidden` or `inert` element (up to `root`),
/// are skipped. Positive `tabindex` values come first in ascending order,
/// then everything else in document order.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultTabbable;

impl DefaultTabbable {
    fn tab_index(doc: &Document, node: NodeId) -> Option<i32> {
        if let Some(explicit) = doc
            .get_attribute(node, "tabindex")
            .and_then(|v| v.trim().parse::<i32>().ok())
        {
            return Some(explicit);
        }
        let natively_focusable = match doc.tag(node).as_deref() {
            Some("button" | "input" | "select" | "textarea") => true,
            Some("a") => doc.has_attribute(node, "href"),
            _ => false,
        };
        natively_focusable.then_some(0)
    }

    fn is_concealed(doc: &Document, root: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if n == root {
                return false;
            }
            if doc.has_attribute(n, "hidden") || doc.has_attribute(n, "inert") {
                return true;
            }
            cur = doc.parent(n);
        }
        false
    }
}

impl Tabbable for DefaultTabbable {
    fn tabbable(&self, doc: &Document, root: NodeId) -> Vec<NodeId> {
        let mut found: Vec<(i32, NodeId)> = doc
            .descendants(root)
            .into_iter()
            .filter(|&n| doc.is_element(n) && doc.is_connected(n))
            .filter(|&n| !doc.has_attribute(n, "disabled"))
            .filter_map(|n| Self::tab_index(doc, n).map(|i| (i, n)))
            .filter(|&(i, n)| i >= 0 && !Self::is_concealed(doc, root, n))
            .collect();
        found.sort_by_key(|&(i, _)| if i > 0 { (0, i) } else { (1, 0) });
        found.into_iter().map(|(_, n)| n).collect()
    }
}

/// Props for [`AutoFocus`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AutoFocusProps {
    /// Refocus the previously focused element on destroy.
    pub restore: bool,
}

impl Default for AutoFocusProps {
    fn default() -> Self {
        Self { restore: true }
    }
}

/// Partial [`AutoFocusProps`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AutoFocusPatch {
    /// New `restore` flag.
    pub restore: Option<bool>,
}

impl From<AutoFocusProps> for AutoFocusPatch {
    fn from(props: AutoFocusProps) -> Self {
        Self {
            restore: Some(props.restore),
        }
    }
}

impl Patch for AutoFocusProps {
    type Partial = AutoFocusPatch;

    fn merge(&mut self, partial: AutoFocusPatch) {
        if let Some(restore) = partial.restore {
            self.restore = restore;
        }
    }
}

/// Focus the first tabbable descendant of a node.
#[derive(Debug)]
pub struct AutoFocus {
    doc: Document,
    props: AutoFocusProps,
    previous: Rc<RefCell<Option<NodeId>>>,
    alive: Rc<Cell<bool>>,
    settled: Deferred<Option<NodeId>>,
}

impl AutoFocus {
    /// Attach with the [`DefaultTabbable`] query.
    pub fn new(doc: &Document, node: NodeId, props: AutoFocusProps) -> Self {
        Self::with_tabbable(doc, node, props, DefaultTabbable)
    }

    /// Attach with a custom tab-order query.
    pub fn with_tabbable(
        doc: &Document,
        node: NodeId,
        props: AutoFocusProps,
        tabbable: impl Tabbable + 'static,
    ) -> Self {
        let this = Self {
            doc: doc.clone(),
            props,
            previous: Rc::new(RefCell::new(None)),
            alive: Rc::new(Cell::new(true)),
            settled: Deferred::new(),
        };
        let (task_doc, previous, alive, settled) = (
            doc.clone(),
            this.previous.clone(),
            this.alive.clone(),
            this.settled.clone(),
        );
        doc.scheduler().post(move || {
            if !alive.get() {
                tracing::debug!(node = ?node, "auto-focus skipped: effect destroyed");
                return;
            }
            *previous.borrow_mut() = task_doc.active_element();
            let first = tabbable.tabbable(&task_doc, node).into_iter().next();
            let focused = first.filter(|&n| task_doc.focus(n));
            settled.settle(focused);
        });
        this
    }

    /// Settles with the element that received focus once the deferred task ran.
    pub fn settled(&self) -> Deferred<Option<NodeId>> {
        self.settled.clone()
    }
}

impl Effect for AutoFocus {
    type Props = AutoFocusProps;

    fn update(&mut self, partial: AutoFocusPatch) {
        if self.alive.get() {
            self.props.merge(partial);
        }
    }

    fn destroy(&mut self) {
        if !self.alive.replace(false) {
            return;
        }
        if !self.props.restore {
            return;
        }
        if let Some(previous) = self.previous.borrow_mut().take() {
            self.doc.focus(previous);
        }
    }
}
