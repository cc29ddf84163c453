// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decorative icons, hidden from assistive technology.

use understory_dom::{Document, NodeId};
use understory_effect::{Attributes, Element, ElementBuilder};

/// Builder marking a node `aria-hidden="true"`.
pub fn icon() -> ElementBuilder<()> {
    ElementBuilder::new().attributes(|_: &()| Attributes::new().with("aria-hidden", "true"))
}

/// Attach [`icon`] to `node`.
pub fn attach_icon(doc: &Document, node: NodeId) -> Element<()> {
    icon().attach(doc, node, ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use understory_effect::Effect;

    #[test]
    fn marks_node_hidden_and_stays_idempotent() {
        let doc = Document::new();
        let svg = doc.create_element("svg");
        doc.append_child(doc.body(), svg).unwrap();
        let mut el = attach_icon(&doc, svg);
        assert_eq!(doc.get_attribute(svg, "aria-hidden").as_deref(), Some("true"));

        let before = doc.mutation_count();
        el.update(());
        assert_eq!(doc.mutation_count(), before);
        el.destroy();
        assert_eq!(doc.get_attribute(svg, "aria-hidden").as_deref(), Some("true"));
    }
}
