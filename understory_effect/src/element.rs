// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element builders: a props-to-attributes function plus an optional inner effect.
//!
//! An [`ElementBuilder`] is a reusable recipe. [`ElementBuilder::attach`]
//! reconciles the initial attributes onto a node, constructs the inner effect
//! with the same props, and returns the live [`Element`].
//!
//! Updating the element merges the partial props, re-reconciles attributes,
//! then forwards the full merged props to the inner effect. Destroying it
//! destroys the inner effect and leaves the attributes in place.

use alloc::boxed::Box;
use alloc::rc::Rc;

use understory_dom::{Document, NodeId};

use crate::attributes::{AttributeReconciler, Attributes};
use crate::effect::{Effect, Patch};

/// Maps props to an attribute map.
pub type AttributesFn<P> = Rc<dyn Fn(&P) -> Attributes>;

/// Builds the inner effect for a freshly attached element.
pub type EffectFactory<P> = Rc<dyn Fn(&Document, NodeId, &P) -> Box<dyn Effect<Props = P>>>;

/// A reusable element recipe.
pub struct ElementBuilder<P> {
    attributes: Option<AttributesFn<P>>,
    effect: Option<EffectFactory<P>>,
}

impl<P> Clone for ElementBuilder<P> {
    fn clone(&self) -> Self {
        Self {
            attributes: self.attributes.clone(),
            effect: self.effect.clone(),
        }
    }
}

impl<P> Default for ElementBuilder<P> {
    fn default() -> Self {
        Self {
            attributes: None,
            effect: None,
        }
    }
}

impl<P> core::fmt::Debug for ElementBuilder<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ElementBuilder")
            .field("has_attributes", &self.attributes.is_some())
            .field("has_effect", &self.effect.is_some())
            .finish()
    }
}

impl<P> ElementBuilder<P>
where
    P: Patch + Clone + 'static,
    P::Partial: From<P>,
{
    /// An empty recipe: no attributes, no inner effect.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the props-to-attributes function.
    pub fn attributes(mut self, f: impl Fn(&P) -> Attributes + 'static) -> Self {
        self.attributes = Some(Rc::new(f));
        self
    }

    /// Set the inner effect constructor.
    pub fn effect<E>(mut self, f: impl Fn(&Document, NodeId, &P) -> E + 'static) -> Self
    where
        E: Effect<Props = P> + 'static,
    {
        let factory: EffectFactory<P> = Rc::new(
            move |doc: &Document, node: NodeId, props: &P| -> Box<dyn Effect<Props = P>> {
                Box::new(f(doc, node, props))
            },
        );
        self.effect = Some(factory);
        self
    }

    /// Attach to `node` with full initial props.
    pub fn attach(&self, doc: &Document, node: NodeId, props: P) -> Element<P> {
        let mut reconciler = AttributeReconciler::new();
        if let Some(attributes) = &self.attributes {
            reconciler.apply(doc, node, &attributes(&props));
        }
        let inner = self.effect.as_ref().map(|f| f(doc, node, &props));
        Element {
            doc: doc.clone(),
            node,
            props,
            reconciler,
            attributes: self.attributes.clone(),
            inner,
            destroyed: false,
        }
    }
}

/// A live element produced by [`ElementBuilder::attach`].
pub struct Element<P> {
    doc: Document,
    node: NodeId,
    props: P,
    reconciler: AttributeReconciler,
    attributes: Option<AttributesFn<P>>,
    inner: Option<Box<dyn Effect<Props = P>>>,
    destroyed: bool,
}

impl<P: core::fmt::Debug> core::fmt::Debug for Element<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Element")
            .field("node", &self.node)
            .field("props", &self.props)
            .field("has_effect", &self.inner.is_some())
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

impl<P> Element<P> {
    /// The node this element is attached to.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The current merged props.
    pub fn props(&self) -> &P {
        &self.props
    }

    /// Whether [`destroy`](Effect::destroy) has run.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl<P> Effect for Element<P>
where
    P: Patch + Clone + 'static,
    P::Partial: From<P>,
{
    type Props = P;

    fn update(&mut self, partial: P::Partial) {
        if self.destroyed {
            tracing::debug!(node = ?self.node, "update after destroy ignored");
            return;
        }
        self.props.merge(partial);
        if let Some(attributes) = &self.attributes {
            self.reconciler
                .apply(&self.doc, self.node, &attributes(&self.props));
        }
        if let Some(inner) = &mut self.inner {
            inner.update(P::Partial::from(self.props.clone()));
        }
    }

    fn destroy(&mut self) {
        self.destroyed = true;
        if let Some(mut inner) = self.inner.take() {
            inner.destroy();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct ToggleProps {
        checked: bool,
        title: Option<String>,
    }

    #[derive(Clone, Debug, Default)]
    struct TogglePatch {
        checked: Option<bool>,
        title: Option<Option<String>>,
    }

    impl From<ToggleProps> for TogglePatch {
        fn from(p: ToggleProps) -> Self {
            Self {
                checked: Some(p.checked),
                title: Some(p.title),
            }
        }
    }

    impl Patch for ToggleProps {
        type Partial = TogglePatch;

        fn merge(&mut self, partial: TogglePatch) {
            if let Some(checked) = partial.checked {
                self.checked = checked;
            }
            if let Some(title) = partial.title {
                self.title = title;
            }
        }
    }

    type Log = Rc<RefCell<Vec<String>>>;

    struct Recorder {
        log: Log,
    }

    impl Effect for Recorder {
        type Props = ToggleProps;

        fn update(&mut self, partial: TogglePatch) {
            self.log
                .borrow_mut()
                .push(alloc::format!("update {:?}", partial.checked));
        }

        fn destroy(&mut self) {
            self.log.borrow_mut().push("destroy".into());
        }
    }

    fn toggle(log: &Log) -> ElementBuilder<ToggleProps> {
        let log = log.clone();
        ElementBuilder::new()
            .attributes(|p: &ToggleProps| {
                Attributes::new()
                    .with("data-state", if p.checked { "checked" } else { "unchecked" })
                    .with("title", p.title.clone())
            })
            .effect(move |_, _, _| Recorder { log: log.clone() })
    }

    fn node(doc: &Document) -> NodeId {
        let n = doc.create_element("button");
        doc.append_child(doc.body(), n).unwrap();
        n
    }

    #[test]
    fn attach_applies_attributes_and_builds_effect() {
        let doc = Document::new();
        let n = node(&doc);
        let log = Log::default();
        let el = toggle(&log).attach(
            &doc,
            n,
            ToggleProps {
                checked: true,
                title: Some("Agree".into()),
            },
        );
        assert_eq!(doc.get_attribute(n, "data-state").as_deref(), Some("checked"));
        assert_eq!(doc.get_attribute(n, "title").as_deref(), Some("Agree"));
        assert_eq!(el.node(), n);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn update_overwrites_in_place_and_forwards_full_props() {
        let doc = Document::new();
        let n = node(&doc);
        let log = Log::default();
        let mut el = toggle(&log).attach(
            &doc,
            n,
            ToggleProps {
                checked: true,
                title: Some("Agree".into()),
            },
        );
        let before = doc.mutation_count();
        el.update(TogglePatch {
            checked: Some(false),
            ..TogglePatch::default()
        });
        // One in-place overwrite; the untouched title is not rewritten.
        assert_eq!(doc.mutation_count(), before + 1);
        assert_eq!(
            doc.get_attribute(n, "data-state").as_deref(),
            Some("unchecked")
        );
        assert_eq!(doc.get_attribute(n, "title").as_deref(), Some("Agree"));
        assert_eq!(*log.borrow(), ["update Some(false)"]);

        el.update(TogglePatch {
            title: Some(None),
            ..TogglePatch::default()
        });
        assert!(!doc.has_attribute(n, "title"));
        assert_eq!(el.props().title, None);
    }

    #[test]
    fn repeated_identical_update_does_not_mutate() {
        let doc = Document::new();
        let n = node(&doc);
        let log = Log::default();
        let mut el = toggle(&log).attach(&doc, n, ToggleProps::default());
        let before = doc.mutation_count();
        for _ in 0..3 {
            el.update(TogglePatch::default());
        }
        assert_eq!(doc.mutation_count(), before);
    }

    #[test]
    fn destroy_is_idempotent_and_blocks_updates() {
        let doc = Document::new();
        let n = node(&doc);
        let log = Log::default();
        let mut el = toggle(&log).attach(&doc, n, ToggleProps::default());
        el.destroy();
        el.destroy();
        el.update(TogglePatch {
            checked: Some(true),
            ..TogglePatch::default()
        });
        assert_eq!(*log.borrow(), ["destroy"]);
        assert!(el.is_destroyed());
        assert_eq!(
            doc.get_attribute(n, "data-state").as_deref(),
            Some("unchecked")
        );
    }

    #[test]
    fn builder_without_effect_only_reconciles() {
        let doc = Document::new();
        let n = node(&doc);
        let mut el = ElementBuilder::<ToggleProps>::new()
            .attributes(|p| Attributes::new().with("aria-checked", p.checked))
            .attach(&doc, n, ToggleProps::default());
        el.update(TogglePatch {
            checked: Some(true),
            ..TogglePatch::default()
        });
        assert_eq!(doc.get_attribute(n, "aria-checked").as_deref(), Some("true"));
        el.destroy();
    }
}
