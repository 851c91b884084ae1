use crate::debug::{DebugLogger, layout_json};
use crate::error::PaintError;
use crate::host::{Event, Host, Target};
use crate::layout::{DomRect, Layout};
use crate::render_tree::{Child, RenderTree, default_parent};
use crate::stylesheet::Stylesheet;
use crate::types::{Axis, Property, Side, StyleDeclaration, StyleValue};
use log::{debug, trace, warn};
use serde_json::json;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::marker::PhantomData;
use std::path::PathBuf;

/// What a `paint` call styles: one target, or every match of a selector
/// under a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaintTarget<N> {
    Selector(String),
    Node(Target<N>),
}

impl<N> From<&str> for PaintTarget<N> {
    fn from(selector: &str) -> Self {
        PaintTarget::Selector(selector.to_string())
    }
}

impl<N> From<String> for PaintTarget<N> {
    fn from(selector: String) -> Self {
        PaintTarget::Selector(selector)
    }
}

impl<N> From<Target<N>> for PaintTarget<N> {
    fn from(target: Target<N>) -> Self {
        PaintTarget::Node(target)
    }
}

/// Scroll coordinates; an omitted coordinate keeps its current value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollToOptions {
    pub left: Option<f64>,
    pub top: Option<f64>,
}

impl From<(f64, f64)> for ScrollToOptions {
    fn from((left, top): (f64, f64)) -> Self {
        Self {
            left: Some(left),
            top: Some(top),
        }
    }
}

pub struct Painter<H: Host> {
    host: H,
    stylesheet: Stylesheet,
    // Live selector children get registered while resolving, hence the cell.
    tree: RefCell<RenderTree<H::Node>>,
    viewport: Option<(f64, f64)>,
    debug: Option<DebugLogger>,
}

/// Per-query scratch state. Never outlives one top-level `get_layout`.
struct Resolution<N> {
    cache: HashMap<Target<N>, Layout>,
    in_progress: HashSet<Target<N>>,
    resolved: u64,
    cache_hits: u64,
    cycles: u64,
}

impl<N> Resolution<N> {
    fn new() -> Self {
        Self {
            cache: HashMap::new(),
            in_progress: HashSet::new(),
            resolved: 0,
            cache_hits: 0,
            cycles: 0,
        }
    }
}

/// Running furthest edge per auto axis while stacking siblings.
#[derive(Debug, Clone, Copy, Default)]
struct AxisStack([Option<f64>; 2]);

impl AxisStack {
    fn get(&self, axis: Axis) -> Option<f64> {
        self.0[axis.index()]
    }

    fn raise(&mut self, axis: Axis, reach: f64) {
        let slot = &mut self.0[axis.index()];
        *slot = Some(slot.map_or(reach, |current| current.max(reach)));
    }
}

impl<H: Host> Painter<H> {
    pub fn new(host: H) -> Self {
        let mut painter = Self {
            host,
            stylesheet: Stylesheet::new(),
            tree: RefCell::new(RenderTree::new()),
            viewport: None,
            debug: None,
        };
        painter.init();
        painter
    }

    pub fn builder() -> PainterBuilder<H> {
        PainterBuilder::new()
    }

    /// Seeds the window root with the viewport size. Its scroll height follows
    /// whatever is painted under it.
    pub fn init(&mut self) -> &mut Self {
        let (width, height) = self.viewport.unwrap_or_else(|| self.host.viewport());
        let styles = StyleDeclaration::new()
            .with(Property::Width, width)
            .with(Property::Height, height)
            .with(Property::ScrollHeight, StyleValue::Auto);
        self.paint(Target::Window, styles, None)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn stylesheet(&self) -> &Stylesheet {
        &self.stylesheet
    }

    pub fn stylesheet_mut(&mut self) -> &mut Stylesheet {
        &mut self.stylesheet
    }

    /// Registers styles for a target or a selector. Selectors become live
    /// children of `parent` (the window by default); targets get `changes`
    /// merged into their override and join the render tree under `parent`
    /// on first registration.
    pub fn paint(
        &mut self,
        target: impl Into<PaintTarget<H::Node>>,
        changes: StyleDeclaration,
        parent: Option<Target<H::Node>>,
    ) -> &mut Self {
        match target.into() {
            PaintTarget::Selector(selector) => {
                let scope = parent.unwrap_or(Target::Window);
                debug!(
                    "paint selector `{selector}` under {}: {changes}",
                    self.describe(&scope)
                );
                if let Some(logger) = &self.debug {
                    logger.log_json(&json!({
                        "type": "paint.selector",
                        "selector": selector,
                        "scope": self.describe(&scope),
                        "styles": changes.to_string(),
                    }));
                }
                self.stylesheet.add_rule(selector.clone(), changes);
                self.tree.get_mut().add_live_selector(&scope, &selector);
            }
            PaintTarget::Node(target) => {
                debug!("paint {}: {changes}", self.describe(&target));
                if let Some(logger) = &self.debug {
                    logger.log_json(&json!({
                        "type": "paint.node",
                        "target": self.describe(&target),
                        "styles": changes.to_string(),
                    }));
                }
                let tree = self.tree.get_mut();
                match parent {
                    Some(parent) => tree.register(&target, Some(parent), true),
                    None => tree.register(&target, default_parent(&target), false),
                }
                tree.styles_mut(&target).merge(&changes);
            }
        }
        self
    }

    /// The explicit override painted on `target`, if it is registered.
    pub fn element_styles(&self, target: &Target<H::Node>) -> Option<StyleDeclaration> {
        self.tree.borrow().styles(target).cloned()
    }

    pub fn parent_of(&self, target: &Target<H::Node>) -> Option<Target<H::Node>> {
        self.tree.borrow().parent(target)
    }

    /// Resolves the box of `target`. `relative` subtracts the scroll offset
    /// of every render-tree ancestor, giving viewport coordinates; otherwise
    /// coordinates are document offsets.
    ///
    /// Live selector matches join the render tree when their scope is first
    /// resolved. Until then they resolve as roots, so reading an element
    /// before its scope can differ from reading it after.
    pub fn get_layout(&self, target: &Target<H::Node>, relative: bool) -> Layout {
        let mut resolution = Resolution::new();
        let layout = self.resolve(target, relative, &mut resolution, None);
        if let Some(logger) = &self.debug {
            logger.increment("layout.resolve", resolution.resolved);
            logger.increment("layout.cache_hit", resolution.cache_hits);
            logger.increment("layout.cycle", resolution.cycles);
            logger.log_json(&json!({
                "type": "layout.resolve",
                "target": self.describe(target),
                "relative": relative,
                "resolved": resolution.resolved,
                "layout": layout_json(&layout),
            }));
        }
        layout
    }

    pub fn bounding_client_rect(&self, target: &Target<H::Node>) -> DomRect {
        self.get_layout(target, true).rect()
    }

    /// Writes the debug counters summary and flushes the trace file.
    pub fn flush_debug(&self) {
        if let Some(logger) = &self.debug {
            logger.emit_summary("painter");
            logger.flush();
        }
    }

    fn resolve(
        &self,
        target: &Target<H::Node>,
        relative: bool,
        resolution: &mut Resolution<H::Node>,
        accumulated: Option<&AxisStack>,
    ) -> Layout {
        if let Some(layout) = resolution.cache.get(target) {
            resolution.cache_hits += 1;
            return *layout;
        }
        if !resolution.in_progress.insert(target.clone()) {
            resolution.cycles += 1;
            warn!(
                "render tree cycle through {}; resolved as an empty box",
                self.describe(target)
            );
            return Layout::default();
        }

        let mut styles = self.compounded_styles(target);
        self.resolve_auto_axes(target, &mut styles, resolution, accumulated);
        self.resolve_auto_sides(target, &mut styles, resolution);
        if relative {
            self.apply_ancestor_scroll(target, &mut styles);
        }

        let layout = Layout::new(&styles);
        resolution.in_progress.remove(target);
        resolution.cache.insert(target.clone(), layout);
        resolution.resolved += 1;
        trace!("resolved {} -> {:?}", self.describe(target), layout.rect());
        layout
    }

    /// Stylesheet matches, weakest first, then the override on top.
    fn compounded_styles(&self, target: &Target<H::Node>) -> StyleDeclaration {
        let mut styles = StyleDeclaration::new();
        for declaration in self.stylesheet.matching_styles(&self.host, target) {
            styles.merge(&declaration);
        }
        if let Some(own) = self.tree.borrow().styles(target) {
            styles.merge(own);
        }
        styles
    }

    /// `auto` positions stack after the furthest-reaching preceding sibling.
    fn resolve_auto_axes(
        &self,
        target: &Target<H::Node>,
        styles: &mut StyleDeclaration,
        resolution: &mut Resolution<H::Node>,
        accumulated: Option<&AxisStack>,
    ) {
        let auto_axes: Vec<Axis> = Axis::ALL
            .into_iter()
            .filter(|axis| styles.is_auto(axis.property()))
            .collect();
        if auto_axes.is_empty() {
            return;
        }

        // A sibling probe takes its position from the caller's running stack.
        if let Some(stack) = accumulated {
            for axis in &auto_axes {
                styles.set_opt(axis.property(), stack.get(*axis).map(StyleValue::Number));
            }
            return;
        }

        let mut stack = AxisStack::default();
        for axis in &auto_axes {
            stack.raise(*axis, 0.0);
        }
        let parent = self.tree.borrow().parent(target);
        let siblings = parent
            .map(|parent| self.child_targets(&parent))
            .unwrap_or_default();
        for sibling in siblings {
            if sibling == *target {
                break;
            }
            let layout = self.resolve(&sibling, false, resolution, Some(&stack));
            for axis in &auto_axes {
                let reach = or_zero(layout.get(axis.property()))
                    + or_zero(layout.get(axis.side().property()));
                stack.raise(*axis, reach);
            }
        }
        for axis in &auto_axes {
            styles.set(axis.property(), stack.get(*axis).unwrap_or(0.0));
        }
    }

    /// `auto` sizes cover the furthest edge of the children.
    fn resolve_auto_sides(
        &self,
        target: &Target<H::Node>,
        styles: &mut StyleDeclaration,
        resolution: &mut Resolution<H::Node>,
    ) {
        let mut auto_sides: Vec<Side> = Side::ALL
            .into_iter()
            .filter(|side| styles.is_auto(side.property()))
            .collect();
        if auto_sides.is_empty() {
            return;
        }

        // With both a side and its scroll side auto, only the side is summed;
        // the layout then raises the scroll side to match it.
        let shadowed: Vec<Side> = auto_sides
            .iter()
            .filter_map(|side| side.paired_scroll())
            .filter(|scroll| auto_sides.contains(scroll))
            .collect();
        for side in &shadowed {
            styles.remove(side.property());
        }
        auto_sides.retain(|side| !shadowed.contains(side));

        let mut extents = vec![0.0_f64; auto_sides.len()];
        for child in self.child_targets(target) {
            let layout = self.resolve(&child, false, resolution, None);
            for (extent, side) in extents.iter_mut().zip(&auto_sides) {
                let base = side.base();
                let reach = or_zero(layout.get(side.axis().property()))
                    + or_zero(layout.get(base.property()));
                *extent = extent.max(reach);
            }
        }
        for (side, extent) in auto_sides.iter().zip(extents) {
            styles.set(side.property(), extent);
        }
    }

    fn apply_ancestor_scroll(&self, target: &Target<H::Node>, styles: &mut StyleDeclaration) {
        let tree = self.tree.borrow();
        for ancestor in tree.ancestors(target) {
            let Some(ancestor_styles) = tree.styles(&ancestor) else {
                continue;
            };
            for (axis, scroll) in [(Property::X, Property::ScrollX), (Property::Y, Property::ScrollY)] {
                let position = or_zero(styles.number(axis).unwrap_or(0.0));
                let offset = or_zero(ancestor_styles.number(scroll).unwrap_or(0.0));
                styles.set(axis, position - offset);
            }
        }
    }

    /// Expands the child list of `scope`, re-querying live selectors, and
    /// registers every discovered child under `scope`.
    fn child_targets(&self, scope: &Target<H::Node>) -> Vec<Target<H::Node>> {
        let entries = self.tree.borrow().children(scope);
        let mut seen = HashSet::new();
        let mut children = Vec::new();
        for entry in entries {
            let expanded = match entry {
                Child::Concrete(target) => vec![target],
                Child::LiveSelector(selector) => self
                    .host
                    .query_selector_all(scope, &selector)
                    .into_iter()
                    .map(Target::Element)
                    .collect(),
            };
            for child in expanded {
                if seen.insert(child.clone()) {
                    children.push(child);
                }
            }
        }
        let mut tree = self.tree.borrow_mut();
        for child in &children {
            tree.register(child, Some(scope.clone()), false);
        }
        children
    }

    /// Paints new scroll offsets, then notifies listeners on `target`.
    pub fn scroll_to(&mut self, target: &Target<H::Node>, options: impl Into<ScrollToOptions>) {
        let options = options.into();
        let mut changes = StyleDeclaration::new();
        if let Some(left) = options.left {
            changes.set(Property::ScrollX, left);
        }
        if let Some(top) = options.top {
            changes.set(Property::ScrollY, top);
        }
        self.paint(target.clone(), changes, None);
        self.host.dispatch_event(self, &Event::scroll(target.clone()));
    }

    pub fn scroll_by(&mut self, target: &Target<H::Node>, delta: impl Into<ScrollToOptions>) {
        let delta = delta.into();
        let layout = self.get_layout(target, false);
        let options = ScrollToOptions {
            left: delta.left.map(|dx| layout.scroll_x() + dx),
            top: delta.top.map(|dy| layout.scroll_y() + dy),
        };
        self.scroll_to(target, options);
    }

    pub fn set_scroll_left(&mut self, target: &Target<H::Node>, left: f64) {
        self.scroll_to(
            target,
            ScrollToOptions {
                left: Some(left),
                top: None,
            },
        );
    }

    pub fn set_scroll_top(&mut self, target: &Target<H::Node>, top: f64) {
        self.scroll_to(
            target,
            ScrollToOptions {
                left: None,
                top: Some(top),
            },
        );
    }

    /// Scrolls the window to the element's document offset.
    pub fn scroll_into_view(&mut self, node: &H::Node) {
        let layout = self.get_layout(&Target::Element(node.clone()), false);
        self.scroll_to(&Target::Window, (layout.x(), layout.y()));
    }

    pub(crate) fn describe(&self, target: &Target<H::Node>) -> String {
        match target {
            Target::Window => "window".to_string(),
            Target::Element(node) => self.host.describe(node),
        }
    }
}

// NaN extents count as 0 when stacking.
fn or_zero(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value }
}

/// Configures a [`Painter`] for host type `H`, fixed by the `build` call.
pub struct PainterBuilder<H> {
    stylesheet: Option<Stylesheet>,
    css: Vec<String>,
    viewport: Option<(f64, f64)>,
    debug_path: Option<PathBuf>,
    host: PhantomData<fn() -> H>,
}

impl<H> Default for PainterBuilder<H> {
    fn default() -> Self {
        Self {
            stylesheet: None,
            css: Vec::new(),
            viewport: None,
            debug_path: None,
            host: PhantomData,
        }
    }
}

impl<H> Clone for PainterBuilder<H> {
    fn clone(&self) -> Self {
        Self {
            stylesheet: self.stylesheet.clone(),
            css: self.css.clone(),
            viewport: self.viewport,
            debug_path: self.debug_path.clone(),
            host: PhantomData,
        }
    }
}

impl<H> fmt::Debug for PainterBuilder<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PainterBuilder")
            .field("stylesheet", &self.stylesheet)
            .field("css", &self.css)
            .field("viewport", &self.viewport)
            .field("debug_path", &self.debug_path)
            .finish()
    }
}

impl<H: Host> PainterBuilder<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stylesheet(mut self, stylesheet: Stylesheet) -> Self {
        self.stylesheet = Some(stylesheet);
        self
    }

    /// CSS text added on top of the stylesheet when the painter is built.
    pub fn css(mut self, css: impl Into<String>) -> Self {
        self.css.push(css.into());
        self
    }

    /// Overrides the viewport size the host reports.
    pub fn viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport = Some((width, height));
        self
    }

    pub fn debug_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.debug_path = Some(path.into());
        self
    }

    pub fn build(self, host: H) -> Result<Painter<H>, PaintError> {
        if let Some((width, height)) = self.viewport {
            if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
                return Err(PaintError::InvalidConfiguration(format!(
                    "viewport must be finite and non-negative, got {width}x{height}"
                )));
            }
        }
        let mut stylesheet = self.stylesheet.unwrap_or_default();
        for css in &self.css {
            stylesheet.add_css(css)?;
        }
        let debug = match self.debug_path {
            Some(path) => Some(DebugLogger::new(path)?),
            None => None,
        };
        let mut painter = Painter {
            host,
            stylesheet,
            tree: RefCell::new(RenderTree::new()),
            viewport: self.viewport,
            debug,
        };
        painter.init();
        Ok(painter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Dom, DomNode};
    use kuchiki::traits::*;

    fn decl(pairs: &[(Property, StyleValue)]) -> StyleDeclaration {
        pairs.iter().copied().collect()
    }

    fn n(value: f64) -> StyleValue {
        StyleValue::Number(value)
    }

    const AUTO: StyleValue = StyleValue::Auto;

    fn all(painter: &Painter<Dom>, selector: &str) -> Vec<DomNode> {
        painter.host().query_selector_all(&Target::Window, selector)
    }

    fn one(painter: &Painter<Dom>, selector: &str) -> DomNode {
        painter.host().query_selector(selector).unwrap()
    }

    fn offset_height(painter: &Painter<Dom>, node: &DomNode) -> f64 {
        painter.html_element(node).unwrap().offset_height()
    }

    fn offset_top(painter: &Painter<Dom>, node: &DomNode) -> f64 {
        painter.html_element(node).unwrap().offset_top()
    }

    fn gallery() -> Painter<Dom> {
        Painter::new(Dom::parse(
            r#"<article><img id="a"><img id="b"><img id="c"></article>"#,
        ))
    }

    #[test]
    fn window_starts_at_the_viewport_size() {
        let painter = Painter::new(Dom::parse("<p></p>").with_viewport(800.0, 600.0));
        let layout = painter.get_layout(&Target::Window, false);
        assert_eq!((layout.width(), layout.height()), (800.0, 600.0));
        assert_eq!(layout.scroll_height(), 600.0);
        assert_eq!(painter.parent_of(&Target::Window), None);
        assert!(
            painter
                .element_styles(&Target::Window)
                .unwrap()
                .is_auto(Property::ScrollHeight)
        );
    }

    #[test]
    fn nested_scroll_offsets_accumulate() {
        let mut painter = Painter::new(Dom::parse(
            r#"<div id="grandparent"><div id="parent"><div id="element"></div></div></div>"#,
        ));
        let grandparent = one(&painter, "#grandparent");
        let parent = one(&painter, "#parent");
        let element = one(&painter, "#element");
        painter
            .paint(
                grandparent.clone(),
                decl(&[(Property::ScrollX, n(0.0)), (Property::ScrollWidth, n(800.0))]),
                None,
            )
            .paint(
                parent.clone(),
                decl(&[(Property::ScrollX, n(400.0)), (Property::ScrollWidth, n(800.0))]),
                Some(Target::Element(grandparent)),
            )
            .paint(
                element.clone(),
                decl(&[(Property::X, n(400.0)), (Property::Width, n(100.0))]),
                Some(Target::Element(parent.clone())),
            );
        assert_eq!(painter.bounding_client_rect(&Target::Element(element.clone())).x, 0.0);

        painter.scroll_to(&Target::Element(parent), (100.0, 0.0));
        assert_eq!(painter.bounding_client_rect(&Target::Element(element.clone())).x, 300.0);
        // Ancestor offsets are taken as painted, before clamping.
        painter.scroll_to(&Target::Window, (50.0, 0.0));
        assert_eq!(painter.bounding_client_rect(&Target::Element(element)).x, 250.0);
    }

    #[test]
    fn scrolled_window_shifts_elements() {
        let mut painter = Painter::new(Dom::parse("<div></div>"));
        let div = one(&painter, "div");
        painter.paint(
            Target::Window,
            decl(&[(Property::ScrollHeight, n(2000.0)), (Property::ScrollY, n(300.0))]),
            None,
        );
        painter.paint(div.clone(), decl(&[(Property::Y, n(500.0))]), None);
        let rect = painter.bounding_client_rect(&Target::Element(div.clone()));
        assert_eq!((rect.y, rect.top), (200.0, 200.0));
        assert_eq!(offset_top(&painter, &div), 500.0);
    }

    #[test]
    fn stylesheet_defaults_apply_to_every_match() {
        let stylesheet = Stylesheet::from_rules([(
            "*",
            decl(&[
                (Property::X, n(50.0)),
                (Property::Y, n(20.0)),
                (Property::Width, n(150.0)),
                (Property::Height, n(250.0)),
            ]),
        )]);
        let painter = Painter::builder()
            .stylesheet(stylesheet)
            .build(Dom::parse("<h1>a</h1><p>b</p><div><span>c</span></div>"))
            .unwrap();
        for node in all(&painter, "*") {
            let rect = painter.bounding_client_rect(&Target::Element(node));
            assert_eq!((rect.x, rect.y, rect.width, rect.height), (50.0, 20.0, 150.0, 250.0));
        }
    }

    #[test]
    fn stylesheet_rules_compound() {
        let painter = Painter::builder()
            .css("* { width: 375px } h1 { height: 36px } p { height: 160px; y: 36px }")
            .build(Dom::parse("<h1>Title</h1><p>Body</p>"))
            .unwrap();
        let h1 = one(&painter, "h1");
        let rect = painter.bounding_client_rect(&Target::Element(h1));
        assert_eq!((rect.width, rect.height, rect.x, rect.y), (375.0, 36.0, 0.0, 0.0));
        let p = one(&painter, "p");
        let rect = painter.bounding_client_rect(&Target::Element(p));
        assert_eq!((rect.width, rect.height, rect.y, rect.bottom), (375.0, 160.0, 36.0, 196.0));
    }

    #[test]
    fn more_specific_rules_win() {
        let painter = Painter::builder()
            .stylesheet(Stylesheet::from_rules([
                ("#the-heading", decl(&[(Property::Height, n(30.0))])),
                ("h1, h2", decl(&[(Property::Height, n(10.0))])),
                (".heading", decl(&[(Property::Height, n(20.0))])),
            ]))
            .build(Dom::parse(r#"<h1 id="the-heading" class="heading">A</h1>"#))
            .unwrap();
        let h1 = one(&painter, "h1");
        assert_eq!(offset_height(&painter, &h1), 30.0);
    }

    #[test]
    fn painted_styles_supersede_the_stylesheet() {
        let mut painter = Painter::builder()
            .stylesheet(Stylesheet::from_rules([(
                "#element",
                decl(&[(Property::Width, n(100.0)), (Property::Height, n(100.0))]),
            )]))
            .build(Dom::parse(r#"<div id="element"></div>"#))
            .unwrap();
        let element = one(&painter, "#element");
        painter.paint(element.clone(), decl(&[(Property::Width, n(200.0))]), None);
        let html = painter.html_element(&element).unwrap();
        assert_eq!((html.offset_width(), html.offset_height()), (200.0, 100.0));
    }

    #[test]
    fn painting_a_selector_styles_every_match() {
        let mut painter = Painter::new(Dom::parse(
            "<div>a</div><div>b</div><span>c</span><span>d</span>",
        ));
        painter.paint("div", decl(&[(Property::Height, n(16.0)), (Property::Y, n(10.0))]), None);
        for div in all(&painter, "div") {
            assert_eq!(offset_height(&painter, &div), 16.0);
            assert_eq!(offset_top(&painter, &div), 10.0);
        }
        for span in all(&painter, "span") {
            assert_eq!(offset_height(&painter, &span), 0.0);
        }

        painter.paint("div", decl(&[(Property::Height, n(32.0))]), None);
        for div in all(&painter, "div") {
            assert_eq!(offset_height(&painter, &div), 32.0);
            assert_eq!(offset_top(&painter, &div), 0.0);
        }
        assert_eq!(painter.stylesheet().len(), 1);
    }

    #[test]
    fn auto_width_and_x_stack_children() {
        let mut painter = gallery();
        let article = one(&painter, "article");
        let imgs = all(&painter, "img");
        painter.paint(article.clone(), decl(&[(Property::Width, AUTO)]), None);
        for (img, width) in imgs.iter().zip([100.0, 300.0, 200.0]) {
            painter.paint(
                img.clone(),
                decl(&[(Property::Width, n(width)), (Property::X, AUTO)]),
                Some(Target::Element(article.clone())),
            );
        }
        assert_eq!(painter.html_element(&article).unwrap().offset_width(), 600.0);
        let lefts: Vec<f64> = imgs
            .iter()
            .map(|img| painter.html_element(img).unwrap().offset_left())
            .collect();
        assert_eq!(lefts, vec![0.0, 100.0, 400.0]);
        assert_eq!(painter.parent_of(&Target::Element(imgs[0].clone())), Some(Target::Element(article)));
    }

    #[test]
    fn auto_height_and_y_stack_children() {
        let mut painter = gallery();
        let article = one(&painter, "article");
        let imgs = all(&painter, "img");
        painter.paint(article.clone(), decl(&[(Property::Height, AUTO)]), None);
        for (img, height) in imgs.iter().zip([100.0, 300.0, 200.0]) {
            painter.paint(
                img.clone(),
                decl(&[(Property::Height, n(height)), (Property::Y, AUTO)]),
                Some(Target::Element(article.clone())),
            );
        }
        assert_eq!(offset_height(&painter, &article), 600.0);
        let tops: Vec<f64> = imgs.iter().map(|img| offset_top(&painter, img)).collect();
        assert_eq!(tops, vec![0.0, 100.0, 400.0]);
    }

    #[test]
    fn auto_scroll_size_covers_children() {
        let mut painter = gallery();
        let article = one(&painter, "article");
        painter.paint(
            article.clone(),
            decl(&[(Property::Width, n(400.0)), (Property::ScrollWidth, AUTO)]),
            None,
        );
        for (img, width) in all(&painter, "img").iter().zip([100.0, 300.0, 200.0]) {
            painter.paint(
                img.clone(),
                decl(&[(Property::Width, n(width)), (Property::X, AUTO)]),
                Some(Target::Element(article.clone())),
            );
        }
        let element = painter.element(&article);
        assert_eq!(element.scroll_width(), 600.0);
        assert_eq!(painter.html_element(&article).unwrap().offset_width(), 400.0);
    }

    #[test]
    fn auto_size_with_auto_scroll_size_matches_children() {
        let mut painter = gallery();
        let article = one(&painter, "article");
        painter.paint(
            article.clone(),
            decl(&[(Property::Height, AUTO), (Property::ScrollHeight, AUTO)]),
            None,
        );
        painter.paint(
            "img",
            decl(&[(Property::Height, n(50.0)), (Property::Y, AUTO)]),
            Some(Target::Element(article.clone())),
        );
        let layout = painter.get_layout(&Target::Element(article), false);
        assert_eq!((layout.height(), layout.scroll_height()), (150.0, 150.0));
    }

    #[test]
    fn live_selectors_follow_document_changes() {
        let mut painter = gallery();
        let article = one(&painter, "article");
        painter.paint(article.clone(), decl(&[(Property::Height, AUTO)]), None);
        painter.paint(
            "img",
            decl(&[(Property::Height, n(100.0)), (Property::Y, AUTO)]),
            Some(Target::Element(article.clone())),
        );
        assert_eq!(offset_height(&painter, &article), 300.0);
        assert_eq!(offset_top(&painter, &all(&painter, "img")[2]), 200.0);

        let fragment = kuchiki::parse_html().one(r#"<img id="d">"#);
        let added = fragment.select_first("img").unwrap().as_node().clone();
        added.detach();
        article.append(added);
        assert_eq!(offset_height(&painter, &article), 400.0);
        assert_eq!(offset_top(&painter, &all(&painter, "img")[3]), 300.0);

        all(&painter, "img")[0].detach();
        assert_eq!(offset_height(&painter, &article), 300.0);
        assert_eq!(offset_top(&painter, &all(&painter, "img")[2]), 200.0);
    }

    #[test]
    fn live_matches_stack_once_their_scope_is_resolved() {
        let mut painter = gallery();
        let article = one(&painter, "article");
        painter.paint(
            "img",
            decl(&[(Property::Height, n(100.0)), (Property::Y, AUTO)]),
            Some(Target::Element(article.clone())),
        );
        let third = all(&painter, "img")[2].clone();
        assert_eq!(offset_top(&painter, &third), 0.0);
        painter.get_layout(&Target::Element(article), false);
        assert_eq!(offset_top(&painter, &third), 200.0);
    }

    #[test]
    fn window_scroll_height_follows_painted_content() {
        let mut painter = Painter::new(Dom::parse("<div>a</div><div>b</div>").with_viewport(1024.0, 500.0));
        painter.paint(
            "div",
            decl(&[(Property::Height, n(400.0)), (Property::Y, AUTO)]),
            None,
        );
        let window = painter.get_layout(&Target::Window, false);
        assert_eq!(window.height(), 500.0);
        assert_eq!(window.scroll_height(), 800.0);
    }

    #[test]
    fn unregistered_elements_resolve_to_an_empty_box() {
        let painter = Painter::new(Dom::parse("<p></p>"));
        let p = one(&painter, "p");
        assert_eq!(painter.get_layout(&Target::Element(p.clone()), true), Layout::default());
        assert_eq!(painter.element_styles(&Target::Element(p)), None);
    }

    #[test]
    fn omitted_scroll_coordinates_are_kept() {
        let mut painter = Painter::new(Dom::parse("<div></div>"));
        let div = Target::Element(one(&painter, "div"));
        painter.paint(
            div.clone(),
            decl(&[(Property::ScrollWidth, n(500.0)), (Property::ScrollHeight, n(500.0))]),
            None,
        );
        painter.scroll_to(&div, (40.0, 60.0));
        painter.scroll_by(&div, ScrollToOptions { left: Some(5.0), top: None });
        let layout = painter.get_layout(&div, false);
        assert_eq!((layout.scroll_x(), layout.scroll_y()), (45.0, 60.0));
    }

    #[test]
    fn scrolling_stops_at_zero() {
        let mut painter = Painter::new(Dom::parse("<div></div>"));
        let div = Target::Element(one(&painter, "div"));
        painter.paint(
            div.clone(),
            decl(&[
                (Property::Width, n(100.0)),
                (Property::ScrollWidth, n(300.0)),
                (Property::Height, n(100.0)),
                (Property::ScrollHeight, n(300.0)),
            ]),
            None,
        );
        painter.scroll_by(&div, (-50.0, -20.0));
        let layout = painter.get_layout(&div, false);
        assert_eq!((layout.scroll_x(), layout.scroll_y()), (0.0, 0.0));

        painter.scroll_to(&Target::Window, (-10.0, -10.0));
        let window = painter.get_layout(&Target::Window, false);
        assert_eq!((window.scroll_x(), window.scroll_y()), (0.0, 0.0));
    }

    #[test]
    fn builder_infers_the_host_from_build() {
        let painter = PainterBuilder::new()
            .css("p { height: 12px }")
            .build(Dom::parse("<p></p>"))
            .unwrap();
        let p = one(&painter, "p");
        assert_eq!(offset_height(&painter, &p), 12.0);
    }

    #[test]
    fn render_tree_cycles_resolve_as_empty_boxes() {
        let mut painter = Painter::new(Dom::parse("<section><div></div></section>"));
        let section = one(&painter, "section");
        let div = one(&painter, "div");
        painter.paint(div.clone(), decl(&[(Property::Height, AUTO)]), None);
        painter.paint(
            section.clone(),
            decl(&[(Property::Height, AUTO)]),
            Some(Target::Element(div.clone())),
        );
        painter.paint("div", StyleDeclaration::new(), Some(Target::Element(section)));
        let layout = painter.get_layout(&Target::Element(div), false);
        assert_eq!(layout.height(), 0.0);
    }

    #[test]
    fn builder_rejects_bad_viewports() {
        let err = Painter::builder()
            .viewport(f64::NAN, 100.0)
            .build(Dom::parse(""))
            .err()
            .unwrap();
        assert!(matches!(err, PaintError::InvalidConfiguration(_)));
        assert!(Painter::builder().viewport(-1.0, 1.0).build(Dom::parse("")).is_err());

        let painter = Painter::builder().viewport(320.0, 480.0).build(Dom::parse("")).unwrap();
        assert_eq!(painter.window().inner_width(), 320.0);
    }

    #[test]
    fn builder_surfaces_css_errors() {
        let err = Painter::builder()
            .css("h1..x { height: 1px }")
            .build(Dom::parse(""))
            .err()
            .unwrap();
        assert!(matches!(err, PaintError::InvalidStylesheet(_)));
    }

    #[test]
    fn debug_log_records_paints_and_resolutions() {
        let _ = env_logger::builder().is_test(true).try_init();
        let path = std::env::temp_dir().join(format!("boxpaint-debug-{}.jsonl", std::process::id()));
        let mut painter = Painter::builder()
            .debug_log(&path)
            .build(Dom::parse("<div></div>"))
            .unwrap();
        let div = one(&painter, "div");
        painter.paint(div.clone(), decl(&[(Property::Width, n(10.0))]), None);
        painter.paint("p", decl(&[(Property::Height, n(5.0))]), None);
        painter.get_layout(&Target::Element(div), true);
        painter.flush_debug();

        let contents = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        let kinds: Vec<String> = contents
            .lines()
            .map(|line| {
                let value: serde_json::Value = serde_json::from_str(line).unwrap();
                value["type"].as_str().unwrap().to_string()
            })
            .collect();
        assert!(kinds.contains(&"paint.node".to_string()));
        assert!(kinds.contains(&"paint.selector".to_string()));
        assert!(kinds.contains(&"layout.resolve".to_string()));
        assert_eq!(kinds.last().map(String::as_str), Some("debug.summary"));
        assert!(contents.contains("\"layout.resolve\":1"));
    }
}
