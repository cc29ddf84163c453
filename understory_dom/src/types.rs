// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public handle types for the document: node and listener identifiers.

/// Identifier for a node in a [`Document`](crate::Document).
///
/// This is a small, copyable handle. Nodes are never freed while their document
/// lives: detaching a node with [`Document::remove`](crate::Document::remove)
/// keeps the handle valid so the node can be re-inserted later.
///
/// A `NodeId` is only meaningful for the document that created it. Passing a
/// handle from another document is not an error, but operations on it either
/// refer to an unrelated node or silently do nothing.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32) -> Self {
        Self(idx)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Identifier for an event listener registered on a node.
///
/// Returned by [`Document::add_event_listener`](crate::Document::add_event_listener)
/// and consumed by [`Document::remove_event_listener`](crate::Document::remove_event_listener).
/// Identifiers are never reused within a document.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ListenerId(pub(crate) u64);

/// Node kinds known to the document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum NodeKind {
    /// The document node itself. Not an element.
    Document,
    /// An element with a lowercase tag name.
    Element(alloc::string::String),
}
