// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Move a node under another container.
//!
//! ## Resolution
//!
//! A [`PortalTarget::Element`] is used as-is. A [`PortalTarget::Selector`] is
//! queried immediately; if nothing matches, the query is retried once on the
//! host's next flush. Failures are configuration errors:
//!
//! - errors known at construction (a malformed selector, a target that is not
//!   an element) are returned from [`Portal::new`] and [`Portal::set_target`];
//! - a selector that still matches nothing after the retry leaves the portal in
//!   [`PortalStatus::Failed`] with [`PortalError::Unresolved`].
//!
//! There is no fallback container. Mounting sets `data-portal=""`, appends the
//! node to the target and removes its `hidden` attribute.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use understory_dom::{Document, DomError, NodeId};
use understory_effect::{Effect, Patch};

/// Where a portal mounts its node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PortalTarget {
    /// First element matching a selector.
    Selector(String),
    /// A specific element.
    Element(NodeId),
}

impl Default for PortalTarget {
    fn default() -> Self {
        Self::Selector("body".into())
    }
}

impl From<&str> for PortalTarget {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.into())
    }
}

impl From<NodeId> for PortalTarget {
    fn from(node: NodeId) -> Self {
        Self::Element(node)
    }
}

impl Patch for PortalTarget {
    type Partial = Option<Self>;

    fn merge(&mut self, partial: Option<Self>) {
        if let Some(target) = partial {
            *self = target;
        }
    }
}

/// Errors resolving a portal target.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PortalError {
    /// The selector matched nothing, even after the deferred retry.
    #[error("invalid portal selector {selector:?}: no element matches")]
    Unresolved {
        /// The selector that failed.
        selector: String,
    },
    /// The selector could not be parsed.
    #[error(transparent)]
    Selector(#[from] DomError),
    /// The target is not an element, or cannot contain the node.
    #[error("portal target {0:?} is not a usable element")]
    InvalidTarget(NodeId),
}

/// Progress of a portal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PortalStatus {
    /// Waiting for the deferred retry.
    Pending,
    /// Mounted under the given container.
    Mounted(NodeId),
    /// Resolution failed.
    Failed(PortalError),
}

/// Keeps a node mounted under a target container.
#[derive(Debug)]
pub struct Portal {
    doc: Document,
    node: NodeId,
    target: PortalTarget,
    status: Rc<RefCell<PortalStatus>>,
    generation: Rc<Cell<u64>>,
    destroyed: bool,
}

impl Portal {
    /// Resolve `target` and mount `node` under it.
    ///
    /// Returns an error when the target is known to be unusable right away.
    pub fn new(doc: &Document, node: NodeId, target: PortalTarget) -> Result<Self, PortalError> {
        let mut portal = Self {
            doc: doc.clone(),
            node,
            target,
            status: Rc::new(RefCell::new(PortalStatus::Pending)),
            generation: Rc::new(Cell::new(0)),
            destroyed: false,
        };
        portal.run()?;
        Ok(portal)
    }

    /// Current resolution status.
    ///
    /// After a failed retarget this is [`PortalStatus::Failed`], while the node
    /// stays under whichever container it was last mounted in. Use
    /// [`Portal::set_target`] to observe the error directly.
    pub fn status(&self) -> PortalStatus {
        self.status.borrow().clone()
    }

    /// The configured target.
    pub fn target(&self) -> &PortalTarget {
        &self.target
    }

    /// Replace the target and mount the node under it.
    ///
    /// Errors known right away are returned and recorded in [`Portal::status`];
    /// the node is not moved. A pending retry for the previous target is
    /// discarded. Does nothing once destroyed.
    pub fn set_target(&mut self, target: PortalTarget) -> Result<(), PortalError> {
        if self.destroyed {
            return Ok(());
        }
        self.target = target;
        self.run()
    }

    fn run(&mut self) -> Result<(), PortalError> {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        let outcome = match &self.target {
            PortalTarget::Element(target) => mount(&self.doc, self.node, *target).map(Some),
            PortalTarget::Selector(selector) => match self.doc.query_selector(selector) {
                Ok(Some(target)) => mount(&self.doc, self.node, target).map(Some),
                Ok(None) => Ok(None),
                Err(err) => Err(err.into()),
            },
        };
        match outcome {
            Ok(Some(target)) => {
                *self.status.borrow_mut() = PortalStatus::Mounted(target);
                Ok(())
            }
            Ok(None) => {
                *self.status.borrow_mut() = PortalStatus::Pending;
                self.retry_later(generation);
                Ok(())
            }
            Err(err) => {
                *self.status.borrow_mut() = PortalStatus::Failed(err.clone());
                Err(err)
            }
        }
    }

    fn retry_later(&self, generation: u64) {
        let PortalTarget::Selector(selector) = self.target.clone() else {
            return;
        };
        let (doc, node) = (self.doc.clone(), self.node);
        let (status, current) = (self.status.clone(), self.generation.clone());
        self.doc.scheduler().post(move || {
            if current.get() != generation {
                tracing::debug!(selector = %selector, "portal retry skipped: superseded");
                return;
            }
            let resolved = match doc.query_selector(&selector) {
                Ok(Some(target)) => mount(&doc, node, target),
                Ok(None) => Err(PortalError::Unresolved {
                    selector: selector.clone(),
                }),
                Err(err) => Err(err.into()),
            };
            *status.borrow_mut() = match resolved {
                Ok(target) => PortalStatus::Mounted(target),
                Err(err) => {
                    tracing::warn!(selector = %selector, error = %err, "portal target unresolved");
                    PortalStatus::Failed(err)
                }
            };
        });
    }
}

fn mount(doc: &Document, node: NodeId, target: NodeId) -> Result<NodeId, PortalError> {
    if !doc.is_element(target) {
        return Err(PortalError::InvalidTarget(target));
    }
    doc.append_child(target, node)
        .map_err(|_| PortalError::InvalidTarget(target))?;
    doc.set_attribute(node, "data-portal", "");
    doc.remove_attribute(node, "hidden");
    tracing::debug!(node = ?node, target = ?target, "portal mounted");
    Ok(target)
}

impl Effect for Portal {
    type Props = PortalTarget;

    fn update(&mut self, partial: Option<PortalTarget>) {
        let mut target = self.target.clone();
        target.merge(partial);
        if let Err(err) = self.set_target(target) {
            tracing::warn!(error = %err, "portal update failed");
        }
    }

    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.generation.set(self.generation.get() + 1);
        self.doc.remove(self.node);
    }
}
