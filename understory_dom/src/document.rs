// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core document implementation: structure, attributes, focus, queries, and dispatch.

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use kurbo::Rect;

use crate::error::DomError;
use crate::event::{Event, EventType, Phase};
use crate::scheduler::Scheduler;
use crate::selector::Selector;
use crate::types::{ListenerId, NodeId, NodeKind};

/// Callback invoked for a dispatched event.
pub type ListenerFn = Rc<dyn Fn(&Event)>;

struct Listener {
    id: ListenerId,
    ty: EventType,
    capture: bool,
    callback: ListenerFn,
}

struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    rect: Rect,
    listeners: Vec<Listener>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            attributes: BTreeMap::new(),
            style: BTreeMap::new(),
            rect: Rect::ZERO,
            listeners: Vec::new(),
        }
    }

    fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element(tag) => Some(tag.as_str()),
            NodeKind::Document => None,
        }
    }
}

struct Tree {
    nodes: Vec<Node>,
    html: NodeId,
    head: NodeId,
    body: NodeId,
    viewport: Rect,
    active: Option<NodeId>,
    mutations: u64,
    next_listener: u64,
}

impl Tree {
    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.idx())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.idx())
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(Node::new(kind));
        id
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Some(p) = self.node_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        }
    }

    fn unlink(&mut self, child: NodeId) {
        let Some(parent) = self.node(child).and_then(|c| c.parent) else {
            return;
        };
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|c| *c != child);
        }
        if let Some(c) = self.node_mut(child) {
            c.parent = None;
        }
    }

    fn contains(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.node(node).and_then(|n| n.parent) {
                Some(p) => node = p,
                None => return false,
            }
        }
    }

    fn path_to_root(&self, mut id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        loop {
            out.push(id);
            match self.node(id).and_then(|n| n.parent) {
                Some(p) => id = p,
                None => break,
            }
        }
        out.reverse();
        out
    }

    fn descendants(&self, root: NodeId, out: &mut Vec<NodeId>) {
        let Some(node) = self.node(root) else {
            return;
        };
        for &child in &node.children {
            out.push(child);
            self.descendants(child, out);
        }
    }
}

/// Shared handle to an in-memory document.
///
/// ## Usage
///
/// - [`Document::new`] builds `<html>` with `<head>` and `<body>` under the
///   document node ([`Document::root`]).
/// - Build the tree with [`Document::create_element`] and
///   [`Document::append_child`]; detach with [`Document::remove`].
/// - Attributes, inline style, and geometry are plain per-node storage. This is
///   not a layout engine: hosts write the rectangles they computed elsewhere
///   via [`Document::set_rect`].
/// - Register listeners with [`Document::add_event_listener`] and deliver
///   events with [`Document::dispatch`].
///
/// Cloning yields another handle to the same document. All methods take
/// `&self`; listeners may freely call back into the document.
///
/// Nodes are never freed: [`Document::remove`] only detaches, and every
/// [`NodeId`] stays valid for the document's lifetime. Memory therefore grows
/// with the number of nodes ever created.
#[derive(Clone)]
pub struct Document {
    tree: Rc<RefCell<Tree>>,
    scheduler: Scheduler,
}

impl core::fmt::Debug for Document {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let tree = self.tree.borrow();
        f.debug_struct("Document")
            .field("nodes_total", &tree.nodes.len())
            .field("active", &tree.active)
            .field("mutations", &tree.mutations)
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document with its own [`Scheduler`].
    pub fn new() -> Self {
        Self::with_scheduler(Scheduler::new())
    }

    /// Create a document driven by an existing scheduler.
    pub fn with_scheduler(scheduler: Scheduler) -> Self {
        let mut tree = Tree {
            nodes: Vec::new(),
            html: NodeId::new(0),
            head: NodeId::new(0),
            body: NodeId::new(0),
            viewport: Rect::new(0.0, 0.0, 1024.0, 768.0),
            active: None,
            mutations: 0,
            next_listener: 0,
        };
        let root = tree.push(NodeKind::Document);
        let html = tree.push(NodeKind::Element("html".into()));
        let head = tree.push(NodeKind::Element("head".into()));
        let body = tree.push(NodeKind::Element("body".into()));
        tree.link(root, html);
        tree.link(html, head);
        tree.link(html, body);
        tree.html = html;
        tree.head = head;
        tree.body = body;
        Self {
            tree: Rc::new(RefCell::new(tree)),
            scheduler,
        }
    }

    /// The scheduler that drives this document's timers and deferred tasks.
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// The document node. It is not an element.
    pub fn root(&self) -> NodeId {
        NodeId::new(0)
    }

    /// The `<html>` element.
    pub fn document_element(&self) -> NodeId {
        self.tree.borrow().html
    }

    /// The `<head>` element.
    pub fn head(&self) -> NodeId {
        self.tree.borrow().head
    }

    /// The `<body>` element.
    pub fn body(&self) -> NodeId {
        self.tree.borrow().body
    }

    // --- structure ---

    /// Create a detached element with the given tag name.
    pub fn create_element(&self, tag: &str) -> NodeId {
        self.tree
            .borrow_mut()
            .push(NodeKind::Element(tag.to_ascii_lowercase()))
    }

    /// Append `child` as the last child of `parent`, detaching it from its old parent first.
    pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let mut tree = self.tree.borrow_mut();
        if child == self.root() || tree.contains(child, parent) {
            return Err(DomError::Hierarchy);
        }
        tree.unlink(child);
        tree.link(parent, child);
        Ok(())
    }

    /// Detach `node` (and its subtree) from its parent.
    ///
    /// The node stays usable and may be appended again. Removing a detached
    /// node is a no-op. If the focused element is inside the removed subtree,
    /// focus is cleared.
    pub fn remove(&self, node: NodeId) {
        let mut tree = self.tree.borrow_mut();
        tree.unlink(node);
        if let Some(active) = tree.active
            && tree.contains(node, active)
        {
            tree.active = None;
        }
    }

    /// The parent of `node`, if attached.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.tree.borrow().node(node).and_then(|n| n.parent)
    }

    /// Children of `node` in document order.
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.tree
            .borrow()
            .node(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// All descendants of `root` in document (pre-)order, excluding `root`.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.tree.borrow().descendants(root, &mut out);
        out
    }

    /// Whether `node` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.tree.borrow().contains(ancestor, node)
    }

    /// Whether `node` is attached to this document.
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.contains(self.root(), node)
    }

    /// Whether `node` is an element (as opposed to the document node or an unknown handle).
    pub fn is_element(&self, node: NodeId) -> bool {
        self.tree.borrow().node(node).is_some_and(|n| n.tag().is_some())
    }

    /// The lowercase tag name of an element.
    pub fn tag(&self, node: NodeId) -> Option<String> {
        self.tree.borrow().node(node).and_then(|n| n.tag().map(String::from))
    }

    // --- attributes ---

    /// Read an attribute.
    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.tree
            .borrow()
            .node(node)
            .and_then(|n| n.attributes.get(name).cloned())
    }

    /// Whether an attribute is present.
    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.tree
            .borrow()
            .node(node)
            .is_some_and(|n| n.attributes.contains_key(name))
    }

    /// Write an attribute. Counts as a mutation even when the value is unchanged.
    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        let mut tree = self.tree.borrow_mut();
        if let Some(n) = tree.node_mut(node)
            && n.tag().is_some()
        {
            n.attributes.insert(name.into(), value.into());
            tree.mutations += 1;
        }
    }

    /// Remove an attribute. Only counts as a mutation when the attribute was present.
    pub fn remove_attribute(&self, node: NodeId, name: &str) {
        let mut tree = self.tree.borrow_mut();
        let removed = tree
            .node_mut(node)
            .is_some_and(|n| n.attributes.remove(name).is_some());
        if removed {
            tree.mutations += 1;
        }
    }

    /// Attribute names of `node`, sorted.
    pub fn attribute_names(&self, node: NodeId) -> Vec<String> {
        self.tree
            .borrow()
            .node(node)
            .map(|n| n.attributes.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Total number of attribute writes and effective removals so far.
    pub fn mutation_count(&self) -> u64 {
        self.tree.borrow().mutations
    }

    // --- style & geometry ---

    /// Set an inline style property.
    pub fn set_style(&self, node: NodeId, property: &str, value: &str) {
        if let Some(n) = self.tree.borrow_mut().node_mut(node) {
            n.style.insert(property.into(), value.into());
        }
    }

    /// Remove an inline style property.
    pub fn remove_style(&self, node: NodeId, property: &str) {
        if let Some(n) = self.tree.borrow_mut().node_mut(node) {
            n.style.remove(property);
        }
    }

    /// Read an inline style property.
    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.tree
            .borrow()
            .node(node)
            .and_then(|n| n.style.get(property).cloned())
    }

    /// Record the layout rectangle of `node` in viewport coordinates.
    pub fn set_rect(&self, node: NodeId, rect: Rect) {
        if let Some(n) = self.tree.borrow_mut().node_mut(node) {
            n.rect = rect;
        }
    }

    /// The last recorded layout rectangle of `node`.
    pub fn rect(&self, node: NodeId) -> Rect {
        self.tree
            .borrow()
            .node(node)
            .map(|n| n.rect)
            .unwrap_or(Rect::ZERO)
    }

    /// The viewport rectangle.
    pub fn viewport(&self) -> Rect {
        self.tree.borrow().viewport
    }

    /// Replace the viewport rectangle.
    pub fn set_viewport(&self, viewport: Rect) {
        self.tree.borrow_mut().viewport = viewport;
    }

    // --- focus ---

    /// Focus a connected element. Returns `false` if the node cannot take focus.
    pub fn focus(&self, node: NodeId) -> bool {
        if !self.is_element(node) || !self.is_connected(node) {
            return false;
        }
        self.tree.borrow_mut().active = Some(node);
        true
    }

    /// Clear focus.
    pub fn blur(&self) {
        self.tree.borrow_mut().active = None;
    }

    /// The focused element, if any.
    pub fn active_element(&self) -> Option<NodeId> {
        self.tree.borrow().active
    }

    // --- queries ---

    /// First connected element matching `selector` in document order.
    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, DomError> {
        self.query_selector_within(self.root(), selector)
    }

    /// First descendant of `root` matching `selector` in document order.
    pub fn query_selector_within(
        &self,
        root: NodeId,
        selector: &str,
    ) -> Result<Option<NodeId>, DomError> {
        let selector = Selector::parse(selector)?;
        let tree = self.tree.borrow();
        let mut candidates = Vec::new();
        tree.descendants(root, &mut candidates);
        Ok(candidates
            .into_iter()
            .find(|&id| Self::matches_in(&tree, id, &selector)))
    }

    /// Whether `node` is an element matching a pre-parsed `selector`.
    pub fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        Self::matches_in(&self.tree.borrow(), node, selector)
    }

    fn matches_in(tree: &Tree, node: NodeId, selector: &Selector) -> bool {
        tree.node(node)
            .and_then(|n| n.tag().map(|tag| selector.matches(tag, &n.attributes)))
            .unwrap_or(false)
    }

    // --- events ---

    /// Register `callback` for events of type `ty` on `target`.
    ///
    /// With `capture` the listener runs during the capture phase (and first at the target),
    /// otherwise during the target and bubble phases.
    pub fn add_event_listener(
        &self,
        target: NodeId,
        ty: EventType,
        capture: bool,
        callback: impl Fn(&Event) + 'static,
    ) -> ListenerId {
        let mut tree = self.tree.borrow_mut();
        tree.next_listener += 1;
        let id = ListenerId(tree.next_listener);
        if let Some(n) = tree.node_mut(target) {
            n.listeners.push(Listener {
                id,
                ty,
                capture,
                callback: Rc::new(callback),
            });
        }
        id
    }

    /// Unregister a listener. Returns `false` if it was not registered.
    pub fn remove_event_listener(&self, target: NodeId, id: ListenerId) -> bool {
        let mut tree = self.tree.borrow_mut();
        let Some(n) = tree.node_mut(target) else {
            return false;
        };
        let before = n.listeners.len();
        n.listeners.retain(|l| l.id != id);
        n.listeners.len() != before
    }

    /// Number of listeners registered on `target`.
    pub fn listener_count(&self, target: NodeId) -> usize {
        self.tree
            .borrow()
            .node(target)
            .map(|n| n.listeners.len())
            .unwrap_or(0)
    }

    /// Dispatch `event` at `at`, returning it after propagation.
    ///
    /// Order follows the native model: capture listeners root→target, then the
    /// target's capture and non-capture listeners, then non-capture listeners
    /// target→root if the event bubbles. [`Event::stop_propagation`] takes effect
    /// once the current node's listeners have run. Listeners removed during
    /// dispatch do not run.
    pub fn dispatch(&self, at: NodeId, mut event: Event) -> Event {
        event.target = event.forced_target().unwrap_or(Some(at));
        let path = self.tree.borrow().path_to_root(at);
        tracing::trace!(ty = event.ty().as_str(), depth = path.len(), "dispatch");
        let Some((&target, ancestors)) = path.split_last() else {
            return Self::finish(event);
        };

        event.phase = Phase::Capture;
        for &node in ancestors {
            self.invoke(node, &mut event, true);
            if event.propagation_stopped() {
                return Self::finish(event);
            }
        }

        event.phase = Phase::Target;
        self.invoke(target, &mut event, true);
        if !event.propagation_stopped() {
            self.invoke(target, &mut event, false);
        }
        if event.propagation_stopped() || !event.bubbles() {
            return Self::finish(event);
        }

        event.phase = Phase::Bubble;
        for &node in ancestors.iter().rev() {
            self.invoke(node, &mut event, false);
            if event.propagation_stopped() {
                break;
            }
        }
        Self::finish(event)
    }

    fn finish(mut event: Event) -> Event {
        event.phase = Phase::None;
        event.current_target = None;
        event
    }

    fn invoke(&self, node: NodeId, event: &mut Event, capture: bool) {
        let snapshot: Vec<(ListenerId, ListenerFn)> = {
            let tree = self.tree.borrow();
            let Some(n) = tree.node(node) else {
                return;
            };
            n.listeners
                .iter()
                .filter(|l| l.ty == event.ty() && l.capture == capture)
                .map(|l| (l.id, l.callback.clone()))
                .collect()
        };
        for (id, callback) in snapshot {
            let live = self
                .tree
                .borrow()
                .node(node)
                .is_some_and(|n| n.listeners.iter().any(|l| l.id == id));
            if live {
                event.current_target = Some(node);
                callback(event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use core::cell::Cell;

    type Log = Rc<RefCell<Vec<(Phase, &'static str)>>>;

    fn recorder(log: &Log, name: &'static str) -> impl Fn(&Event) + 'static {
        let log = log.clone();
        move |e: &Event| log.borrow_mut().push((e.phase(), name))
    }

    #[test]
    fn fresh_document_has_html_head_body() {
        let doc = Document::new();
        let html = doc.document_element();
        assert_eq!(doc.children(doc.root()), vec![html]);
        assert_eq!(doc.children(html), vec![doc.head(), doc.body()]);
        assert!(!doc.is_element(doc.root()));
        assert_eq!(doc.tag(doc.body()).as_deref(), Some("body"));
    }

    #[test]
    fn append_moves_and_rejects_cycles() {
        let doc = Document::new();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        doc.append_child(doc.body(), a).unwrap();
        doc.append_child(a, b).unwrap();
        assert!(doc.is_connected(b));
        assert_eq!(doc.append_child(b, a), Err(DomError::Hierarchy));
        assert_eq!(doc.append_child(a, a), Err(DomError::Hierarchy));
        doc.append_child(doc.body(), b).unwrap();
        assert_eq!(doc.parent(b), Some(doc.body()));
        assert!(doc.children(a).is_empty());
    }

    #[test]
    fn remove_detaches_and_clears_focus() {
        let doc = Document::new();
        let a = doc.create_element("button");
        doc.append_child(doc.body(), a).unwrap();
        assert!(doc.focus(a));
        doc.remove(a);
        assert!(!doc.is_connected(a));
        assert_eq!(doc.active_element(), None);
        assert!(!doc.focus(a), "detached nodes cannot take focus");
    }

    #[test]
    fn attribute_mutations_are_counted() {
        let doc = Document::new();
        let a = doc.create_element("div");
        doc.set_attribute(a, "title", "x");
        doc.set_attribute(a, "title", "x");
        doc.remove_attribute(a, "title");
        doc.remove_attribute(a, "title");
        assert_eq!(doc.mutation_count(), 3);
        doc.set_attribute(doc.root(), "title", "x");
        assert_eq!(doc.mutation_count(), 3, "the document node has no attributes");
    }

    #[test]
    fn query_selector_finds_first_in_document_order() {
        let doc = Document::new();
        let a = doc.create_element("div");
        let b = doc.create_element("span");
        let c = doc.create_element("span");
        doc.append_child(doc.body(), a).unwrap();
        doc.append_child(a, b).unwrap();
        doc.append_child(doc.body(), c).unwrap();
        doc.set_attribute(c, "id", "target");
        assert_eq!(doc.query_selector("span").unwrap(), Some(b));
        assert_eq!(doc.query_selector("#target").unwrap(), Some(c));
        assert_eq!(doc.query_selector("#missing").unwrap(), None);
        assert_eq!(doc.query_selector_within(a, "span").unwrap(), Some(b));
        assert!(doc.query_selector("a b").is_err());
    }

    #[test]
    fn parsed_selector_matches_elements_only() {
        let doc = Document::new();
        let button = doc.create_element("button");
        let span = doc.create_element("span");
        doc.append_child(doc.body(), button).unwrap();
        doc.append_child(doc.body(), span).unwrap();
        doc.set_attribute(button, "type", "button");

        let selector = Selector::parse("button[type=button]").unwrap();
        assert!(doc.matches(button, &selector));
        assert!(!doc.matches(span, &selector));
        assert!(!doc.matches(doc.root(), &selector));
        doc.remove_attribute(button, "type");
        assert!(!doc.matches(button, &selector));
    }

    #[test]
    fn removed_nodes_stay_addressable() {
        let doc = Document::new();
        let node = doc.create_element("div");
        doc.append_child(doc.body(), node).unwrap();
        doc.set_attribute(node, "id", "kept");
        doc.remove(node);
        assert_eq!(doc.parent(node), None);
        assert_eq!(doc.get_attribute(node, "id").as_deref(), Some("kept"));
        doc.append_child(doc.body(), node).unwrap();
        assert_eq!(doc.query_selector("#kept").unwrap(), Some(node));
    }

    #[test]
    fn dispatch_order_is_capture_target_bubble() {
        let doc = Document::new();
        let parent = doc.create_element("div");
        let child = doc.create_element("div");
        doc.append_child(doc.body(), parent).unwrap();
        doc.append_child(parent, child).unwrap();

        let log = Rc::new(RefCell::new(Vec::new()));
        doc.add_event_listener(doc.root(), EventType::Click, false, recorder(&log, "doc-bubble"));
        doc.add_event_listener(doc.root(), EventType::Click, true, recorder(&log, "doc-capture"));
        doc.add_event_listener(parent, EventType::Click, true, recorder(&log, "parent-capture"));
        doc.add_event_listener(child, EventType::Click, false, recorder(&log, "child"));
        doc.add_event_listener(child, EventType::Click, true, recorder(&log, "child-capture"));

        let ev = doc.dispatch(child, Event::new(EventType::Click));
        assert_eq!(ev.target(), Some(child));
        assert_eq!(
            *log.borrow(),
            vec![
                (Phase::Capture, "doc-capture"),
                (Phase::Capture, "parent-capture"),
                (Phase::Target, "child-capture"),
                (Phase::Target, "child"),
                (Phase::Bubble, "doc-bubble"),
            ]
        );
    }

    #[test]
    fn stop_propagation_skips_ancestors() {
        let doc = Document::new();
        let child = doc.create_element("div");
        doc.append_child(doc.body(), child).unwrap();
        let reached = Rc::new(Cell::new(false));
        let r = reached.clone();
        doc.add_event_listener(doc.root(), EventType::PointerDown, false, move |_| r.set(true));
        doc.add_event_listener(child, EventType::PointerDown, false, |e| e.stop_propagation());
        let ev = doc.dispatch(child, Event::new(EventType::PointerDown));
        assert!(ev.propagation_stopped());
        assert!(!reached.get());
    }

    #[test]
    fn non_bubbling_events_skip_bubble_phase() {
        let doc = Document::new();
        let child = doc.create_element("div");
        doc.append_child(doc.body(), child).unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        doc.add_event_listener(doc.root(), EventType::Scroll, false, recorder(&log, "bubble"));
        doc.add_event_listener(doc.root(), EventType::Scroll, true, recorder(&log, "capture"));
        doc.dispatch(child, Event::new(EventType::Scroll));
        assert_eq!(*log.borrow(), vec![(Phase::Capture, "capture")]);
    }

    #[test]
    fn listener_removed_during_dispatch_does_not_run() {
        let doc = Document::new();
        let child = doc.create_element("div");
        doc.append_child(doc.body(), child).unwrap();
        let ran = Rc::new(Cell::new(0));
        let second: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));
        let (d, s) = (doc.clone(), second.clone());
        doc.add_event_listener(child, EventType::Click, false, move |_| {
            if let Some(id) = s.get() {
                d.remove_event_listener(child, id);
            }
        });
        let r = ran.clone();
        second.set(Some(doc.add_event_listener(
            child,
            EventType::Click,
            false,
            move |_| r.set(r.get() + 1),
        )));
        doc.dispatch(child, Event::new(EventType::Click));
        assert_eq!(ran.get(), 0);
        assert_eq!(doc.listener_count(child), 1);
    }

    #[test]
    fn forced_null_target_is_reported() {
        let doc = Document::new();
        let seen = Rc::new(Cell::new(Some(doc.body())));
        let s = seen.clone();
        doc.add_event_listener(doc.root(), EventType::Click, false, move |e| s.set(e.target()));
        doc.dispatch(doc.root(), Event::new(EventType::Click).with_target(None));
        assert_eq!(seen.get(), None);
    }

    #[test]
    fn detached_dispatch_does_not_reach_document() {
        let doc = Document::new();
        let loose = doc.create_element("div");
        let reached = Rc::new(Cell::new(false));
        let r = reached.clone();
        doc.add_event_listener(doc.root(), EventType::Click, true, move |_| r.set(true));
        doc.dispatch(loose, Event::new(EventType::Click));
        assert!(!reached.get());
    }
}
