// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attribute maps and the idempotent attribute reconciler.
//!
//! ## Reconciliation
//!
//! [`AttributeReconciler`] remembers the last attribute map it applied to a
//! node (its snapshot). Applying a new map:
//!
//! 1. removes every attribute present in the snapshot but missing from the new map;
//! 2. writes every attribute whose value differs from the snapshot
//!    ([`AttrValue::Absent`] is written as a removal);
//! 3. replaces the snapshot with the new map, `Absent` entries included.
//!
//! Unchanged values are never written, so applying the same map twice causes
//! no mutations the second time. An attribute that goes from one value to
//! another is overwritten in place, never removed and re-added.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use understory_dom::{Document, NodeId};

/// A value in an attribute map.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum AttrValue {
    /// Absent: ensure the attribute is not present.
    #[default]
    Absent,
    /// A string value.
    Text(String),
    /// A boolean, written as `"true"` or `"false"`.
    Bool(bool),
    /// An integer, written in decimal.
    Int(i64),
}

impl AttrValue {
    /// The string to write, or `None` when the attribute should be absent.
    pub fn to_attr_string(&self) -> Option<String> {
        match self {
            Self::Absent => None,
            Self::Text(s) => Some(s.clone()),
            Self::Bool(b) => Some(if *b { "true" } else { "false" }.into()),
            Self::Int(i) => Some(i.to_string()),
        }
    }

    /// Returns true for [`AttrValue::Absent`].
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for AttrValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u32> for AttrValue {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl<T: Into<Self>> From<Option<T>> for AttrValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

/// An ordered attribute map.
///
/// Setting a name that is already present overwrites its value in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, AttrValue)>,
}

impl Attributes {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, name: &str, value: impl Into<AttrValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Insert or overwrite `name`.
    pub fn set(&mut self, name: &str, value: impl Into<AttrValue>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name.into(), value)),
        }
    }

    /// The value for `name`, if the key is present.
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.entries
            .iter()
            .find_map(|(n, v)| (n == name).then_some(v))
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Number of keys, `Absent` entries included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the map has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<AttrValue>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut out = Self::new();
        for (k, v) in iter {
            let k: String = k.into();
            out.set(&k, v);
        }
        out
    }
}

/// Mutations performed by one [`AttributeReconciler::apply`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Reconciled {
    /// Attributes written with a new value.
    pub written: usize,
    /// Attributes removed.
    pub removed: usize,
}

impl Reconciled {
    /// Returns true when nothing was touched.
    pub fn is_noop(&self) -> bool {
        self.written == 0 && self.removed == 0
    }
}

/// Applies attribute maps to one node, touching only what changed.
#[derive(Clone, Debug, Default)]
pub struct AttributeReconciler {
    snapshot: BTreeMap<String, AttrValue>,
}

impl AttributeReconciler {
    /// Create a reconciler with an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile `node` against `next` and remember `next` as the snapshot.
    pub fn apply(&mut self, doc: &Document, node: NodeId, next: &Attributes) -> Reconciled {
        let mut tally = Reconciled::default();

        let stale: Vec<String> = self
            .snapshot
            .keys()
            .filter(|k| next.get(k).is_none())
            .cloned()
            .collect();
        for key in stale {
            self.snapshot.remove(&key);
            doc.remove_attribute(node, &key);
            tally.removed += 1;
        }

        for (key, value) in next.iter() {
            if self.snapshot.get(key) == Some(value) {
                continue;
            }
            match value.to_attr_string() {
                Some(text) => {
                    doc.set_attribute(node, key, &text);
                    tally.written += 1;
                }
                None => {
                    doc.remove_attribute(node, key);
                    tally.removed += 1;
                }
            }
            self.snapshot.insert(key.into(), value.clone());
        }

        tracing::trace!(
            node = ?node,
            written = tally.written,
            removed = tally.removed,
            "reconciled attributes"
        );
        tally
    }

    /// The last applied map, by key.
    pub fn snapshot(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.snapshot.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Document, NodeId) {
        let doc = Document::new();
        let node = doc.create_element("button");
        doc.append_child(doc.body(), node).unwrap();
        (doc, node)
    }

    #[test]
    fn initial_apply_writes_present_values_only() {
        let (doc, node) = setup();
        let mut r = AttributeReconciler::new();
        let attrs = Attributes::new()
            .with("role", "checkbox")
            .with("aria-checked", true)
            .with("tabindex", 0_i32)
            .with("title", None::<&str>);
        let tally = r.apply(&doc, node, &attrs);
        assert_eq!(tally, Reconciled { written: 3, removed: 1 });
        assert_eq!(doc.get_attribute(node, "aria-checked").as_deref(), Some("true"));
        assert_eq!(doc.get_attribute(node, "tabindex").as_deref(), Some("0"));
        assert!(!doc.has_attribute(node, "title"));
        // Absent entries stay in the snapshot.
        assert_eq!(r.snapshot().count(), 4);
    }

    #[test]
    fn reapplying_the_same_map_is_free() {
        let (doc, node) = setup();
        let mut r = AttributeReconciler::new();
        let attrs = Attributes::new().with("data-state", "checked");
        r.apply(&doc, node, &attrs);
        let before = doc.mutation_count();
        assert!(r.apply(&doc, node, &attrs).is_noop());
        assert_eq!(doc.mutation_count(), before);
    }

    #[test]
    fn changed_value_is_overwritten_not_removed() {
        let (doc, node) = setup();
        let mut r = AttributeReconciler::new();
        r.apply(&doc, node, &Attributes::new().with("data-state", "checked"));
        let before = doc.mutation_count();
        let tally = r.apply(&doc, node, &Attributes::new().with("data-state", "unchecked"));
        assert_eq!(tally, Reconciled { written: 1, removed: 0 });
        assert_eq!(doc.mutation_count(), before + 1);
        assert_eq!(
            doc.get_attribute(node, "data-state").as_deref(),
            Some("unchecked")
        );
    }

    #[test]
    fn stale_keys_are_removed() {
        let (doc, node) = setup();
        let mut r = AttributeReconciler::new();
        r.apply(
            &doc,
            node,
            &[("a", "1"), ("b", "2")].into_iter().collect(),
        );
        let tally = r.apply(&doc, node, &[("b", "2")].into_iter().collect());
        assert_eq!(tally, Reconciled { written: 0, removed: 1 });
        assert!(!doc.has_attribute(node, "a"));
        assert_eq!(doc.get_attribute(node, "b").as_deref(), Some("2"));
        assert_eq!(r.snapshot().map(|(k, _)| k).collect::<Vec<_>>(), ["b"]);
    }

    #[test]
    fn attributes_set_overwrites_in_place() {
        let attrs = Attributes::new().with("x", 1_i64).with("y", 2_i64).with("x", 3_i64);
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get("x"), Some(&AttrValue::Int(3)));
        assert_eq!(attrs.iter().next().map(|(k, _)| k), Some("x"));
    }
}
