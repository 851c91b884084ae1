//! Browser-shaped accessors over painted geometry.
//!
//! Read views borrow the painter; the `*Mut` views also scroll, which paints
//! the new offsets and dispatches `scroll` on the target.

use crate::host::{Host, Target};
use crate::layout::{DomRect, Layout};
use crate::painter::{Painter, ScrollToOptions};

impl<H: Host> Painter<H> {
    pub fn window(&self) -> WindowView<'_, H> {
        WindowView { painter: self }
    }

    pub fn window_mut(&mut self) -> WindowViewMut<'_, H> {
        WindowViewMut { painter: self }
    }

    pub fn element(&self, node: &H::Node) -> ElementView<'_, H> {
        ElementView {
            painter: self,
            target: Target::Element(node.clone()),
        }
    }

    pub fn element_mut(&mut self, node: &H::Node) -> ElementViewMut<'_, H> {
        ElementViewMut {
            painter: self,
            target: Target::Element(node.clone()),
        }
    }

    /// Offsets exist only on HTML elements.
    pub fn html_element(&self, node: &H::Node) -> Option<HtmlElementView<'_, H>> {
        self.host().is_html_element(node).then(|| HtmlElementView {
            painter: self,
            target: Target::Element(node.clone()),
        })
    }
}

pub struct WindowView<'p, H: Host> {
    painter: &'p Painter<H>,
}

impl<H: Host> WindowView<'_, H> {
    fn layout(&self) -> Layout {
        self.painter.get_layout(&Target::Window, false)
    }

    pub fn inner_width(&self) -> f64 {
        self.layout().width()
    }

    pub fn inner_height(&self) -> f64 {
        self.layout().height()
    }

    pub fn scroll_x(&self) -> f64 {
        self.layout().scroll_x()
    }

    pub fn scroll_y(&self) -> f64 {
        self.layout().scroll_y()
    }

    pub fn page_x_offset(&self) -> f64 {
        self.scroll_x()
    }

    pub fn page_y_offset(&self) -> f64 {
        self.scroll_y()
    }
}

pub struct WindowViewMut<'p, H: Host> {
    painter: &'p mut Painter<H>,
}

impl<H: Host> WindowViewMut<'_, H> {
    pub fn view(&self) -> WindowView<'_, H> {
        self.painter.window()
    }

    pub fn scroll(&mut self, options: impl Into<ScrollToOptions>) {
        self.scroll_to(options);
    }

    pub fn scroll_to(&mut self, options: impl Into<ScrollToOptions>) {
        self.painter.scroll_to(&Target::Window, options);
    }

    pub fn scroll_by(&mut self, delta: impl Into<ScrollToOptions>) {
        self.painter.scroll_by(&Target::Window, delta);
    }
}

pub struct ElementView<'p, H: Host> {
    painter: &'p Painter<H>,
    target: Target<H::Node>,
}

impl<H: Host> ElementView<'_, H> {
    fn layout(&self) -> Layout {
        self.painter.get_layout(&self.target, false)
    }

    pub fn scroll_width(&self) -> f64 {
        self.layout().scroll_width()
    }

    pub fn scroll_height(&self) -> f64 {
        self.layout().scroll_height()
    }

    pub fn scroll_left(&self) -> f64 {
        self.layout().scroll_x()
    }

    pub fn scroll_top(&self) -> f64 {
        self.layout().scroll_y()
    }

    pub fn bounding_client_rect(&self) -> DomRect {
        self.painter.bounding_client_rect(&self.target)
    }
}

pub struct HtmlElementView<'p, H: Host> {
    painter: &'p Painter<H>,
    target: Target<H::Node>,
}

impl<H: Host> HtmlElementView<'_, H> {
    fn layout(&self) -> Layout {
        self.painter.get_layout(&self.target, false)
    }

    pub fn offset_width(&self) -> f64 {
        self.layout().width()
    }

    pub fn offset_height(&self) -> f64 {
        self.layout().height()
    }

    pub fn offset_left(&self) -> f64 {
        self.layout().x()
    }

    pub fn offset_top(&self) -> f64 {
        self.layout().y()
    }
}

pub struct ElementViewMut<'p, H: Host> {
    painter: &'p mut Painter<H>,
    target: Target<H::Node>,
}

impl<H: Host> ElementViewMut<'_, H> {
    pub fn view(&self) -> ElementView<'_, H> {
        ElementView {
            painter: &*self.painter,
            target: self.target.clone(),
        }
    }

    pub fn set_scroll_left(&mut self, left: f64) {
        self.painter.set_scroll_left(&self.target, left);
    }

    pub fn set_scroll_top(&mut self, top: f64) {
        self.painter.set_scroll_top(&self.target, top);
    }

    pub fn scroll(&mut self, options: impl Into<ScrollToOptions>) {
        self.scroll_to(options);
    }

    pub fn scroll_to(&mut self, options: impl Into<ScrollToOptions>) {
        self.painter.scroll_to(&self.target, options);
    }

    pub fn scroll_by(&mut self, delta: impl Into<ScrollToOptions>) {
        self.painter.scroll_by(&self.target, delta);
    }

    pub fn scroll_into_view(&mut self) {
        if let Target::Element(node) = &self.target {
            self.painter.scroll_into_view(node);
        }
    }
}
