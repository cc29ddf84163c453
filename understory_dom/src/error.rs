// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised by document operations.

use alloc::string::String;

/// Failure of a [`Document`](crate::Document) operation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// The selector could not be parsed or uses unsupported syntax.
    #[error("invalid selector `{selector}`: {reason}")]
    Selector {
        /// The selector text as given.
        selector: String,
        /// What the parser rejected.
        reason: &'static str,
    },
    /// Inserting the node would make it its own ancestor, or the node is the document itself.
    #[error("cannot insert a node into itself or one of its descendants")]
    Hierarchy,
}
