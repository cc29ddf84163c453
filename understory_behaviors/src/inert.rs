// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Make everything outside a node inert.
//!
//! On the host's next flush the effect marks every child of `<body>` that
//! neither is nor contains the node with `inert=""`. `script`, `style` and
//! `link` children are left alone. Each update schedules the pass again and
//! releases elements that no longer qualify; destroy releases every element
//! the effect marked.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use understory_dom::{Deferred, Document, NodeId};
use understory_effect::Effect;

const SKIPPED_TAGS: [&str; 3] = ["script", "style", "link"];

/// Marks the rest of the page inert while a node is shown.
#[derive(Debug)]
pub struct Inert {
    doc: Document,
    node: NodeId,
    marked: Rc<RefCell<Vec<NodeId>>>,
    alive: Rc<Cell<bool>>,
    settled: Deferred<()>,
}

impl Inert {
    /// Schedule the first marking pass for `node`.
    pub fn new(doc: &Document, node: NodeId) -> Self {
        let this = Self {
            doc: doc.clone(),
            node,
            marked: Rc::new(RefCell::new(Vec::new())),
            alive: Rc::new(Cell::new(true)),
            settled: Deferred::new(),
        };
        this.schedule();
        this
    }

    /// Elements currently marked by this effect.
    pub fn marked(&self) -> Vec<NodeId> {
        self.marked.borrow().clone()
    }

    /// Settles once the first marking pass has run.
    pub fn settled(&self) -> Deferred<()> {
        self.settled.clone()
    }

    fn schedule(&self) {
        let (doc, node) = (self.doc.clone(), self.node);
        let (marked, alive, settled) = (
            self.marked.clone(),
            self.alive.clone(),
            self.settled.clone(),
        );
        self.doc.scheduler().post(move || {
            if !alive.get() {
                tracing::debug!(node = ?node, "inert pass skipped: effect destroyed");
                return;
            }
            let next: Vec<NodeId> = doc
                .children(doc.body())
                .into_iter()
                .filter(|&el| doc.is_element(el) && !doc.contains(el, node))
                .filter(|&el| {
                    doc.tag(el)
                        .is_none_or(|tag| !SKIPPED_TAGS.contains(&tag.as_str()))
                })
                .collect();
            let mut marked = marked.borrow_mut();
            for &released in marked.iter().filter(|el| !next.contains(el)) {
                doc.remove_attribute(released, "inert");
            }
            for &el in &next {
                if !doc.has_attribute(el, "inert") {
                    doc.set_attribute(el, "inert", "");
                }
            }
            tracing::trace!(node = ?node, marked = next.len(), "inert pass");
            *marked = next;
            settled.settle(());
        });
    }
}

impl Effect for Inert {
    type Props = ();

    fn update(&mut self, _partial: ()) {
        if self.alive.get() {
            self.schedule();
        }
    }

    fn destroy(&mut self) {
        if !self.alive.replace(false) {
            return;
        }
        for el in self.marked.borrow_mut().drain(..) {
            self.doc.remove_attribute(el, "inert");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Page {
        doc: Document,
        header: NodeId,
        main: NodeId,
        modal_host: NodeId,
        modal: NodeId,
        script: NodeId,
    }

    fn page() -> Page {
        let doc = Document::new();
        let header = doc.create_element("header");
        let main = doc.create_element("main");
        let modal_host = doc.create_element("div");
        let modal = doc.create_element("div");
        let script = doc.create_element("script");
        for n in [header, main, modal_host, script] {
            doc.append_child(doc.body(), n).unwrap();
        }
        doc.append_child(modal_host, modal).unwrap();
        Page {
            doc,
            header,
            main,
            modal_host,
            modal,
            script,
        }
    }

    #[test]
    fn marks_siblings_after_flush_and_releases_on_destroy() {
        let p = page();
        let mut effect = Inert::new(&p.doc, p.modal);
        assert!(!p.doc.has_attribute(p.header, "inert"), "marking is deferred");
        p.doc.scheduler().flush();
        assert!(effect.settled().is_settled());
        assert_eq!(effect.marked(), [p.header, p.main]);
        assert_eq!(p.doc.get_attribute(p.main, "inert").as_deref(), Some(""));
        assert!(!p.doc.has_attribute(p.modal_host, "inert"));
        assert!(!p.doc.has_attribute(p.script, "inert"));

        effect.destroy();
        effect.destroy();
        assert!(!p.doc.has_attribute(p.header, "inert"));
        assert!(!p.doc.has_attribute(p.main, "inert"));
    }

    #[test]
    fn update_releases_elements_that_left_the_set() {
        let p = page();
        let mut effect = Inert::new(&p.doc, p.modal);
        p.doc.scheduler().flush();
        p.doc.remove(p.main);
        p.doc.append_child(p.modal_host, p.header).unwrap();
        effect.update(());
        p.doc.scheduler().flush();
        assert!(effect.marked().is_empty());
        assert!(!p.doc.has_attribute(p.header, "inert"));
        assert!(!p.doc.has_attribute(p.main, "inert"));
        effect.destroy();
    }

    #[test]
    fn destroy_before_flush_marks_nothing() {
        let p = page();
        let mut effect = Inert::new(&p.doc, p.modal);
        effect.destroy();
        p.doc.scheduler().flush();
        assert!(!p.doc.has_attribute(p.header, "inert"));
        assert!(!effect.settled().is_settled());
    }
}
