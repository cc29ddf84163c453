// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Position a floating node next to a reference node.
//!
//! ## Overview
//!
//! [`Floating`] derives a middleware list from [`FloatingProps`], asks a
//! [`PositionEngine`] for a position and writes the result back onto the
//! floating node: `data-side`, `data-align`, `position`, and rounded `top` and
//! `left` styles. When the node contains an arrow (`[data-arrow=true]`), the
//! arrow is placed along the reference and rotated to point at it.
//!
//! Middleware runs in a fixed order:
//!
//! 1. `flip`: switch to the opposite side when the preferred side overflows.
//! 2. `offset`: move away from the reference by the gutter (plus half the
//!    arrow height), or by explicit [`OffsetOptions`] when the gutter is zero.
//! 3. `shift`: slide along the reference to stay inside the padded boundary.
//! 4. `arrow`: center the arrow on the reference, clamped by its padding.
//! 5. `size`: report the space available on the chosen side.
//!
//! ## Auto-update
//!
//! Positions are recomputed on every `scroll` (observed in the capture phase)
//! and `resize` reaching the document. Each recompute runs as a deferred task
//! and is skipped when the reference has left the document or the effect was
//! updated or destroyed in the meantime.
//!
//! Geometry comes from [`Document::rect`] and [`Document::viewport`]; nothing
//! is laid out here. The engine is a black box: supply your own
//! [`PositionEngine`] with [`Floating::with_engine`].

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use kurbo::{Point, Rect, Size, Vec2};
use understory_dom::{Document, EventType, NodeId};
use understory_effect::{Effect, EffectSet, ListenerOptions, Patch, on};

/// Default distance between reference and floating node.
pub const DEFAULT_GUTTER: f64 = 5.0;

/// Default padding kept between the floating node and the boundary.
pub const DEFAULT_OVERFLOW_PADDING: f64 = 8.0;

/// Padding between the arrow and the floating node's edges.
pub const ARROW_PADDING: f64 = 8.0;

const ARROW_SELECTOR: &str = "[data-arrow=true]";

/// Side of the reference the floating node is placed on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Side {
    /// Above.
    #[default]
    Top,
    /// To the right.
    Right,
    /// Below.
    Bottom,
    /// To the left.
    Left,
}

impl Side {
    /// The lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }

    /// The side across the reference.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Right => Self::Left,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
        }
    }

    /// Returns true for `Top` and `Bottom`, where alignment runs along x.
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    const fn arrow_transform(self) -> &'static str {
        match self {
            Self::Bottom => "rotate(45deg)",
            Self::Left => "rotate(135deg)",
            Self::Top => "rotate(225deg)",
            Self::Right => "rotate(315deg)",
        }
    }
}

/// Alignment along the reference edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// Align with the reference's start edge.
    Start,
    /// Center on the reference.
    #[default]
    Center,
    /// Align with the reference's end edge.
    End,
}

impl Alignment {
    /// The lowercase name, as written to `data-align`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Center => "center",
            Self::End => "end",
        }
    }
}

/// A side plus an alignment, written `top`, `top-start`, `left-end`, …
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Placement {
    /// Side of the reference.
    pub side: Side,
    /// Alignment along that side.
    pub alignment: Alignment,
}

impl Placement {
    /// A placement with explicit alignment.
    pub const fn new(side: Side, alignment: Alignment) -> Self {
        Self { side, alignment }
    }

    /// A centered placement.
    pub const fn centered(side: Side) -> Self {
        Self::new(side, Alignment::Center)
    }

    /// Parse `side` or `side-start` / `side-end`.
    pub fn parse(s: &str) -> Option<Self> {
        let (side, alignment) = match s.split_once('-') {
            Some((side, "start")) => (side, Alignment::Start),
            Some((side, "end")) => (side, Alignment::End),
            Some(_) => return None,
            None => (s, Alignment::Center),
        };
        let side = match side {
            "top" => Side::Top,
            "right" => Side::Right,
            "bottom" => Side::Bottom,
            "left" => Side::Left,
            _ => return None,
        };
        Some(Self::new(side, alignment))
    }

    /// The same alignment on the opposite side.
    pub const fn opposite(self) -> Self {
        Self::new(self.side.opposite(), self.alignment)
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.alignment {
            Alignment::Center => f.write_str(self.side.as_str()),
            a => write!(f, "{}-{}", self.side.as_str(), a.as_str()),
        }
    }
}

/// CSS positioning strategy written to the floating node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// `position: absolute`.
    Absolute,
    /// `position: fixed`.
    #[default]
    Fixed,
}

impl Strategy {
    /// The CSS value.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Absolute => "absolute",
            Self::Fixed => "fixed",
        }
    }
}

/// Explicit offsets, used when the gutter is zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OffsetOptions {
    /// Distance away from the reference.
    pub main_axis: f64,
    /// Distance along the reference edge.
    pub cross_axis: f64,
}

/// Props for [`Floating`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloatingProps {
    /// The node to position against.
    pub reference: NodeId,
    /// Preferred placement.
    pub placement: Placement,
    /// Positioning strategy.
    pub strategy: Strategy,
    /// Explicit offsets; ignored unless `gutter` is zero.
    pub offset: Option<OffsetOptions>,
    /// Distance from the reference; zero disables it.
    pub gutter: f64,
    /// Padding kept from the boundary by flip, shift and size.
    pub overflow_padding: f64,
    /// Flip to the opposite side on overflow.
    pub flip: bool,
    /// Also shift across the reference, letting the node overlap it.
    pub overlap: bool,
    /// Match the reference's width.
    pub same_width: bool,
    /// Limit `max-width`/`max-height` to the available space.
    pub fit_viewport: bool,
    /// Overflow boundary; the viewport when `None`.
    pub boundary: Option<Rect>,
}

impl FloatingProps {
    /// Default props positioned against `reference`.
    pub fn new(reference: NodeId) -> Self {
        Self {
            reference,
            placement: Placement::default(),
            strategy: Strategy::default(),
            offset: None,
            gutter: DEFAULT_GUTTER,
            overflow_padding: DEFAULT_OVERFLOW_PADDING,
            flip: true,
            overlap: false,
            same_width: false,
            fit_viewport: false,
            boundary: None,
        }
    }
}

/// Partial [`FloatingProps`]; `None` keeps the current value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FloatingPatch {
    /// New reference node.
    pub reference: Option<NodeId>,
    /// New placement.
    pub placement: Option<Placement>,
    /// New strategy.
    pub strategy: Option<Strategy>,
    /// New explicit offsets.
    pub offset: Option<Option<OffsetOptions>>,
    /// New gutter.
    pub gutter: Option<f64>,
    /// New boundary padding.
    pub overflow_padding: Option<f64>,
    /// New flip flag.
    pub flip: Option<bool>,
    /// New overlap flag.
    pub overlap: Option<bool>,
    /// New same-width flag.
    pub same_width: Option<bool>,
    /// New fit-viewport flag.
    pub fit_viewport: Option<bool>,
    /// New boundary.
    pub boundary: Option<Option<Rect>>,
}

impl From<FloatingProps> for FloatingPatch {
    fn from(p: FloatingProps) -> Self {
        Self {
            reference: Some(p.reference),
            placement: Some(p.placement),
            strategy: Some(p.strategy),
            offset: Some(p.offset),
            gutter: Some(p.gutter),
            overflow_padding: Some(p.overflow_padding),
            flip: Some(p.flip),
            overlap: Some(p.overlap),
            same_width: Some(p.same_width),
            fit_viewport: Some(p.fit_viewport),
            boundary: Some(p.boundary),
        }
    }
}

impl Patch for FloatingProps {
    type Partial = FloatingPatch;

    fn merge(&mut self, p: FloatingPatch) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }
        set(&mut self.reference, p.reference);
        set(&mut self.placement, p.placement);
        set(&mut self.strategy, p.strategy);
        set(&mut self.offset, p.offset);
        set(&mut self.gutter, p.gutter);
        set(&mut self.overflow_padding, p.overflow_padding);
        set(&mut self.flip, p.flip);
        set(&mut self.overlap, p.overlap);
        set(&mut self.same_width, p.same_width);
        set(&mut self.fit_viewport, p.fit_viewport);
        set(&mut self.boundary, p.boundary);
    }
}

/// One positioning step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Middleware {
    /// Flip to the opposite side when the current side overflows.
    Flip {
        /// Boundary padding.
        padding: f64,
    },
    /// Move away from and along the reference.
    Offset {
        /// Distance away from the reference.
        main_axis: f64,
        /// Distance along the reference edge.
        cross_axis: f64,
    },
    /// Keep inside the padded boundary.
    Shift {
        /// Boundary padding.
        padding: f64,
        /// Also shift across the reference.
        cross_axis: bool,
    },
    /// Place an arrow element of the given size.
    Arrow {
        /// Arrow element size.
        size: Size,
        /// Minimum distance from the floating node's edges.
        padding: f64,
    },
    /// Report the available space.
    Size {
        /// Boundary padding.
        padding: f64,
    },
}

/// The middleware list for `props`, given the arrow element's size if there is one.
pub fn middleware(props: &FloatingProps, arrow: Option<Size>) -> Vec<Middleware> {
    let arrow_offset = arrow.map_or(0.0, |a| a.height / 2.0);
    let padding = props.overflow_padding;
    let mut out = Vec::with_capacity(5);
    if props.flip {
        out.push(Middleware::Flip { padding });
    }
    let offset = if props.gutter != 0.0 {
        Some(OffsetOptions {
            main_axis: props.gutter,
            cross_axis: 0.0,
        })
    } else {
        props.offset
    };
    if let Some(offset) = offset {
        out.push(Middleware::Offset {
            main_axis: offset.main_axis + arrow_offset,
            cross_axis: offset.cross_axis,
        });
    }
    out.push(Middleware::Shift {
        padding,
        cross_axis: props.overlap,
    });
    if let Some(size) = arrow {
        out.push(Middleware::Arrow {
            size,
            padding: ARROW_PADDING,
        });
    }
    out.push(Middleware::Size { padding });
    out
}

/// Input to a [`PositionEngine`].
#[derive(Clone, Copy, Debug)]
pub struct PositionRequest<'a> {
    /// Reference rectangle.
    pub reference: Rect,
    /// Floating node size.
    pub floating: Size,
    /// Overflow boundary.
    pub boundary: Rect,
    /// Preferred placement.
    pub placement: Placement,
    /// Positioning strategy.
    pub strategy: Strategy,
    /// Steps to run, in order.
    pub middleware: &'a [Middleware],
}

/// Arrow coordinates relative to the floating node; one axis is set.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ArrowPosition {
    /// Left offset, for top/bottom placements.
    pub x: Option<f64>,
    /// Top offset, for left/right placements.
    pub y: Option<f64>,
}

/// Output of a [`PositionEngine`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    /// Top-left corner of the floating node.
    pub point: Point,
    /// Final placement, after any flip.
    pub placement: Placement,
    /// Arrow coordinates, when an arrow step ran.
    pub arrow: Option<ArrowPosition>,
    /// Space available on the final side, when a size step ran.
    pub available: Option<Size>,
}

/// Computes a floating position. Treated as a black box by [`Floating`].
pub trait PositionEngine {
    /// Position the floating node for `request`.
    fn compute(&self, request: &PositionRequest<'_>) -> Position;
}

/// Rectangle-based engine covering the middleware in [`Middleware`].
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicEngine;

impl BasicEngine {
    fn anchor(reference: Rect, floating: Size, placement: Placement) -> Point {
        let center = reference.center();
        let cross_x = match placement.alignment {
            Alignment::Start => reference.x0,
            Alignment::Center => center.x - floating.width / 2.0,
            Alignment::End => reference.x1 - floating.width,
        };
        let cross_y = match placement.alignment {
            Alignment::Start => reference.y0,
            Alignment::Center => center.y - floating.height / 2.0,
            Alignment::End => reference.y1 - floating.height,
        };
        match placement.side {
            Side::Top => Point::new(cross_x, reference.y0 - floating.height),
            Side::Bottom => Point::new(cross_x, reference.y1),
            Side::Left => Point::new(reference.x0 - floating.width, cross_y),
            Side::Right => Point::new(reference.x1, cross_y),
        }
    }

    fn overflow(at: Point, floating: Size, bounds: Rect, side: Side) -> f64 {
        let rect = Rect::from_origin_size(at, floating);
        match side {
            Side::Top => bounds.y0 - rect.y0,
            Side::Bottom => rect.y1 - bounds.y1,
            Side::Left => bounds.x0 - rect.x0,
            Side::Right => rect.x1 - bounds.x1,
        }
    }
}

fn clamp(v: f64, min: f64, max: f64) -> f64 {
    if max < min { min } else { v.clamp(min, max) }
}

impl PositionEngine for BasicEngine {
    fn compute(&self, req: &PositionRequest<'_>) -> Position {
        let mut placement = req.placement;
        let mut point = Self::anchor(req.reference, req.floating, placement);
        let mut arrow = None;
        let mut available = None;

        for step in req.middleware {
            match *step {
                Middleware::Flip { padding } => {
                    let bounds = req.boundary.inset(-padding);
                    let here = Self::overflow(point, req.floating, bounds, placement.side);
                    if here > 0.0 {
                        let flipped = placement.opposite();
                        let there_at = Self::anchor(req.reference, req.floating, flipped);
                        let there = Self::overflow(there_at, req.floating, bounds, flipped.side);
                        if there < here {
                            placement = flipped;
                            point = there_at;
                        }
                    }
                }
                Middleware::Offset {
                    main_axis,
                    cross_axis,
                } => {
                    let cross = if placement.alignment == Alignment::End {
                        -cross_axis
                    } else {
                        cross_axis
                    };
                    point += match placement.side {
                        Side::Top => Vec2::new(cross, -main_axis),
                        Side::Bottom => Vec2::new(cross, main_axis),
                        Side::Left => Vec2::new(-main_axis, cross),
                        Side::Right => Vec2::new(main_axis, cross),
                    };
                }
                Middleware::Shift {
                    padding,
                    cross_axis,
                } => {
                    let bounds = req.boundary.inset(-padding);
                    let shift_x = placement.side.is_vertical() || cross_axis;
                    let shift_y = !placement.side.is_vertical() || cross_axis;
                    if shift_x {
                        point.x = clamp(point.x, bounds.x0, bounds.x1 - req.floating.width);
                    }
                    if shift_y {
                        point.y = clamp(point.y, bounds.y0, bounds.y1 - req.floating.height);
                    }
                }
                Middleware::Arrow { size, padding } => {
                    let center = req.reference.center();
                    arrow = Some(if placement.side.is_vertical() {
                        let x = center.x - point.x - size.width / 2.0;
                        ArrowPosition {
                            x: Some(clamp(x, padding, req.floating.width - size.width - padding)),
                            y: None,
                        }
                    } else {
                        let y = center.y - point.y - size.height / 2.0;
                        ArrowPosition {
                            x: None,
                            y: Some(clamp(y, padding, req.floating.height - size.height - padding)),
                        }
                    });
                }
                Middleware::Size { padding } => {
                    let bounds = req.boundary.inset(-padding);
                    let r = req.reference;
                    let (w, h) = match placement.side {
                        Side::Top => (bounds.width(), r.y0 - bounds.y0),
                        Side::Bottom => (bounds.width(), bounds.y1 - r.y1),
                        Side::Left => (r.x0 - bounds.x0, bounds.height()),
                        Side::Right => (bounds.x1 - r.x1, bounds.height()),
                    };
                    available = Some(Size::new(w.max(0.0), h.max(0.0)));
                }
            }
        }

        Position {
            point,
            placement,
            arrow,
            available,
        }
    }
}

fn px(v: f64) -> String {
    // `+ 0.0` folds negative zero.
    format!("{}px", v + 0.0)
}

/// Everything one recompute needs, shared by the auto-update listeners.
struct Tick<E> {
    doc: Document,
    node: NodeId,
    props: FloatingProps,
    engine: Rc<E>,
    middleware: Vec<Middleware>,
    arrow: Option<NodeId>,
    arrow_offset: f64,
    generation: u64,
    current: Rc<Cell<u64>>,
}

impl<E: PositionEngine + 'static> Tick<E> {
    fn post(self: &Rc<Self>) {
        let tick = self.clone();
        self.doc.scheduler().post(move || tick.apply());
    }

    fn apply(&self) {
        if self.current.get() != self.generation {
            tracing::debug!(node = ?self.node, "floating compute skipped: superseded");
            return;
        }
        let (doc, node, props) = (&self.doc, self.node, &self.props);
        if !doc.is_connected(props.reference) {
            tracing::debug!(node = ?node, "floating compute skipped: reference detached");
            return;
        }
        let reference = doc.rect(props.reference);
        let position = self.engine.compute(&PositionRequest {
            reference,
            floating: doc.rect(node).size(),
            boundary: props.boundary.unwrap_or_else(|| doc.viewport()),
            placement: props.placement,
            strategy: props.strategy,
            middleware: &self.middleware,
        });

        if position.available.is_some() && props.same_width {
            doc.set_style(node, "width", &px(reference.width().round()));
            doc.set_style(node, "min-width", "unset");
        }
        if let Some(available) = position.available
            && props.fit_viewport
        {
            doc.set_style(node, "max-width", &px(available.width));
            doc.set_style(node, "max-height", &px(available.height));
        }

        let side = position.placement.side;
        doc.set_attribute(node, "data-side", side.as_str());
        doc.set_attribute(node, "data-align", position.placement.alignment.as_str());
        doc.set_style(node, "position", props.strategy.as_str());
        doc.set_style(node, "top", &px(position.point.y.round()));
        doc.set_style(node, "left", &px(position.point.x.round()));

        if let (Some(arrow), Some(at)) = (self.arrow, position.arrow) {
            doc.set_attribute(arrow, "data-side", side.as_str());
            doc.set_style(arrow, "position", "absolute");
            for (property, value) in [("left", at.x), ("top", at.y)] {
                match value {
                    Some(v) => doc.set_style(arrow, property, &px(v)),
                    None => doc.remove_style(arrow, property),
                }
            }
            doc.set_style(
                arrow,
                side.as_str(),
                &format!("calc(100% - {}px)", self.arrow_offset),
            );
            doc.set_style(arrow, "transform", side.arrow_transform());
        }
        tracing::trace!(
            node = ?node,
            placement = %position.placement,
            x = position.point.x,
            y = position.point.y,
            "floating position"
        );
    }
}

/// Keeps a floating node positioned against its reference.
pub struct Floating<E = BasicEngine> {
    doc: Document,
    node: NodeId,
    props: FloatingProps,
    engine: Rc<E>,
    generation: Rc<Cell<u64>>,
    auto_update: EffectSet,
    destroyed: bool,
}

impl<E> fmt::Debug for Floating<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Floating")
            .field("node", &self.node)
            .field("props", &self.props)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

impl Floating<BasicEngine> {
    /// Position `node` with the [`BasicEngine`].
    pub fn new(doc: &Document, node: NodeId, props: FloatingProps) -> Self {
        Self::with_engine(doc, node, props, BasicEngine)
    }
}

impl<E: PositionEngine + 'static> Floating<E> {
    /// Position `node` with a custom engine.
    pub fn with_engine(doc: &Document, node: NodeId, props: FloatingProps, engine: E) -> Self {
        let mut this = Self {
            doc: doc.clone(),
            node,
            props,
            engine: Rc::new(engine),
            generation: Rc::new(Cell::new(0)),
            auto_update: EffectSet::new(),
            destroyed: false,
        };
        this.run();
        this
    }

    /// The current merged props.
    pub fn props(&self) -> &FloatingProps {
        &self.props
    }

    fn run(&mut self) {
        self.auto_update.destroy();
        let generation = self.generation.get() + 1;
        self.generation.set(generation);

        let doc = &self.doc;
        let arrow = doc
            .query_selector_within(self.node, ARROW_SELECTOR)
            .ok()
            .flatten();
        let arrow_size = arrow.map(|a| doc.rect(a).size());
        doc.set_style(self.node, "position", self.props.strategy.as_str());

        let tick = Rc::new(Tick {
            doc: doc.clone(),
            node: self.node,
            props: self.props,
            engine: self.engine.clone(),
            middleware: middleware(&self.props, arrow_size),
            arrow,
            arrow_offset: arrow_size.map_or(0.0, |s| s.height / 2.0),
            generation,
            current: self.generation.clone(),
        });

        let root = doc.root();
        let on_scroll = tick.clone();
        self.auto_update.push_subscription(on(
            doc,
            root,
            EventType::Scroll,
            ListenerOptions::CAPTURE,
            move |_| on_scroll.post(),
        ));
        let on_resize = tick.clone();
        self.auto_update.push_subscription(on(
            doc,
            root,
            EventType::Resize,
            ListenerOptions::BUBBLE,
            move |_| on_resize.post(),
        ));
        tick.post();
    }
}

impl<E: PositionEngine + 'static> Effect for Floating<E> {
    type Props = FloatingProps;

    fn update(&mut self, partial: FloatingPatch) {
        if self.destroyed {
            return;
        }
        self.props.merge(partial);
        self.run();
    }

    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.generation.set(self.generation.get() + 1);
        self.auto_update.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use understory_dom::Event;

    struct Scene {
        doc: Document,
        reference: NodeId,
        floating: NodeId,
    }

    fn scene(reference: Rect) -> Scene {
        let doc = Document::new();
        let r = doc.create_element("button");
        let f = doc.create_element("div");
        doc.append_child(doc.body(), r).unwrap();
        doc.append_child(doc.body(), f).unwrap();
        doc.set_viewport(Rect::new(0.0, 0.0, 1024.0, 768.0));
        doc.set_rect(r, reference);
        doc.set_rect(f, Rect::new(0.0, 0.0, 80.0, 30.0));
        Scene {
            doc,
            reference: r,
            floating: f,
        }
    }

    fn style(s: &Scene, property: &str) -> Option<String> {
        s.doc.style(s.floating, property)
    }

    #[test]
    fn default_placement_is_top_center_after_flush() {
        let s = scene(Rect::new(100.0, 300.0, 200.0, 340.0));
        let mut effect = Floating::new(&s.doc, s.floating, FloatingProps::new(s.reference));
        assert_eq!(style(&s, "position").as_deref(), Some("fixed"));
        assert_eq!(style(&s, "top"), None, "compute is deferred");

        s.doc.scheduler().flush();
        assert_eq!(style(&s, "top").as_deref(), Some("265px"));
        assert_eq!(style(&s, "left").as_deref(), Some("110px"));
        assert_eq!(s.doc.get_attribute(s.floating, "data-side").as_deref(), Some("top"));
        assert_eq!(s.doc.get_attribute(s.floating, "data-align").as_deref(), Some("center"));
        effect.destroy();
    }

    #[test]
    fn flips_when_the_preferred_side_overflows() {
        let s = scene(Rect::new(100.0, 10.0, 200.0, 50.0));
        let mut effect = Floating::new(&s.doc, s.floating, FloatingProps::new(s.reference));
        s.doc.scheduler().flush();
        assert_eq!(s.doc.get_attribute(s.floating, "data-side").as_deref(), Some("bottom"));
        assert_eq!(style(&s, "top").as_deref(), Some("55px"));
        effect.destroy();
    }

    #[test]
    fn shifts_into_the_padded_boundary() {
        let s = scene(Rect::new(0.0, 300.0, 20.0, 340.0));
        let mut props = FloatingProps::new(s.reference);
        props.placement = Placement::centered(Side::Bottom);
        let mut effect = Floating::new(&s.doc, s.floating, props);
        s.doc.scheduler().flush();
        assert_eq!(style(&s, "left").as_deref(), Some("8px"));
        assert_eq!(style(&s, "top").as_deref(), Some("345px"));
        effect.destroy();
    }

    #[test]
    fn arrow_is_centered_and_rotated() {
        let s = scene(Rect::new(100.0, 300.0, 200.0, 340.0));
        let arrow = s.doc.create_element("span");
        s.doc.set_attribute(arrow, "data-arrow", "true");
        s.doc.set_rect(arrow, Rect::new(0.0, 0.0, 8.0, 8.0));
        s.doc.append_child(s.floating, arrow).unwrap();

        let mut effect = Floating::new(&s.doc, s.floating, FloatingProps::new(s.reference));
        s.doc.scheduler().flush();
        // Gutter 5 plus half the arrow height.
        assert_eq!(style(&s, "top").as_deref(), Some("261px"));
        assert_eq!(s.doc.get_attribute(arrow, "data-side").as_deref(), Some("top"));
        assert_eq!(s.doc.style(arrow, "left").as_deref(), Some("36px"));
        assert_eq!(s.doc.style(arrow, "top").as_deref(), Some("calc(100% - 4px)"));
        assert_eq!(s.doc.style(arrow, "transform").as_deref(), Some("rotate(225deg)"));
        assert_eq!(s.doc.style(arrow, "position").as_deref(), Some("absolute"));
        effect.destroy();
    }

    #[test]
    fn auto_update_follows_scroll_and_resize() {
        let s = scene(Rect::new(100.0, 300.0, 200.0, 340.0));
        let mut effect = Floating::new(&s.doc, s.floating, FloatingProps::new(s.reference));
        s.doc.scheduler().flush();

        s.doc.set_rect(s.reference, Rect::new(100.0, 200.0, 200.0, 240.0));
        s.doc.dispatch(s.reference, Event::new(EventType::Scroll));
        assert_eq!(style(&s, "top").as_deref(), Some("265px"));
        s.doc.scheduler().flush();
        assert_eq!(style(&s, "top").as_deref(), Some("165px"));

        s.doc.set_rect(s.reference, Rect::new(300.0, 200.0, 400.0, 240.0));
        s.doc.dispatch(s.doc.root(), Event::new(EventType::Resize));
        s.doc.scheduler().flush();
        assert_eq!(style(&s, "left").as_deref(), Some("310px"));
        effect.destroy();
    }

    #[test]
    fn detached_reference_skips_the_tick() {
        let s = scene(Rect::new(100.0, 300.0, 200.0, 340.0));
        let mut effect = Floating::new(&s.doc, s.floating, FloatingProps::new(s.reference));
        s.doc.scheduler().flush();
        s.doc.remove(s.reference);
        s.doc.set_rect(s.reference, Rect::new(0.0, 0.0, 10.0, 10.0));
        s.doc.dispatch(s.doc.root(), Event::new(EventType::Resize));
        s.doc.scheduler().flush();
        assert_eq!(style(&s, "top").as_deref(), Some("265px"));
        effect.destroy();
    }

    #[test]
    fn update_replaces_auto_update_and_destroy_cancels_pending_ticks() {
        let s = scene(Rect::new(100.0, 300.0, 200.0, 340.0));
        let mut effect = Floating::new(&s.doc, s.floating, FloatingProps::new(s.reference));
        effect.update(FloatingPatch {
            placement: Some(Placement::parse("bottom-start").unwrap()),
            ..FloatingPatch::default()
        });
        assert_eq!(s.doc.listener_count(s.doc.root()), 2);
        s.doc.scheduler().flush();
        assert_eq!(style(&s, "top").as_deref(), Some("345px"));
        assert_eq!(style(&s, "left").as_deref(), Some("100px"));
        assert_eq!(s.doc.get_attribute(s.floating, "data-align").as_deref(), Some("start"));

        s.doc.dispatch(s.doc.root(), Event::new(EventType::Resize));
        s.doc.set_rect(s.reference, Rect::new(500.0, 300.0, 600.0, 340.0));
        effect.destroy();
        effect.destroy();
        s.doc.scheduler().flush();
        assert_eq!(style(&s, "left").as_deref(), Some("100px"));
        assert_eq!(s.doc.listener_count(s.doc.root()), 0);
    }

    #[test]
    fn same_width_and_fit_viewport() {
        let s = scene(Rect::new(100.0, 300.0, 200.0, 340.0));
        let mut props = FloatingProps::new(s.reference);
        props.same_width = true;
        props.fit_viewport = true;
        let mut effect = Floating::new(&s.doc, s.floating, props);
        s.doc.scheduler().flush();
        assert_eq!(style(&s, "width").as_deref(), Some("100px"));
        assert_eq!(style(&s, "min-width").as_deref(), Some("unset"));
        assert_eq!(style(&s, "max-width").as_deref(), Some("1008px"));
        assert_eq!(style(&s, "max-height").as_deref(), Some("292px"));
        effect.destroy();
    }

    #[test]
    fn middleware_order_and_offset_fallback() {
        let s = scene(Rect::ZERO);
        let mut props = FloatingProps::new(s.reference);
        let arrow = Size::new(8.0, 8.0);
        let kinds: Vec<_> = middleware(&props, Some(arrow))
            .iter()
            .map(core::mem::discriminant)
            .collect();
        let expected: Vec<_> = [
            Middleware::Flip { padding: 0.0 },
            Middleware::Offset {
                main_axis: 0.0,
                cross_axis: 0.0,
            },
            Middleware::Shift {
                padding: 0.0,
                cross_axis: false,
            },
            Middleware::Arrow {
                size: arrow,
                padding: 0.0,
            },
            Middleware::Size { padding: 0.0 },
        ]
        .iter()
        .map(core::mem::discriminant)
        .collect();
        assert_eq!(kinds, expected);

        props.flip = false;
        props.gutter = 0.0;
        props.offset = Some(OffsetOptions {
            main_axis: 3.0,
            cross_axis: 2.0,
        });
        assert_eq!(
            middleware(&props, None)[0],
            Middleware::Offset {
                main_axis: 3.0,
                cross_axis: 2.0
            }
        );
        props.offset = None;
        assert_eq!(middleware(&props, None).len(), 2);
    }

    #[test]
    fn placement_parse_and_display() {
        assert_eq!(Placement::parse("top"), Some(Placement::centered(Side::Top)));
        let p = Placement::parse("left-end").unwrap();
        assert_eq!(p, Placement::new(Side::Left, Alignment::End));
        assert_eq!(p.to_string(), "left-end");
        assert_eq!(p.opposite().to_string(), "right-end");
        assert_eq!(Placement::parse("top-middle"), None);
        assert_eq!(Placement::parse("up"), None);
    }
}
