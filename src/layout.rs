use crate::types::{Property, StyleDeclaration};

/// A resolved box. Built once from a declaration and never mutated; the edge
/// coordinates are always derived from position and size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    width: f64,
    height: f64,
    scroll_width: f64,
    scroll_height: f64,
    x: f64,
    y: f64,
    scroll_x: f64,
    scroll_y: f64,
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl Layout {
    pub fn new(styles: &StyleDeclaration) -> Self {
        let value = |property: Property| styles.number(property).unwrap_or(0.0);
        let width = value(Property::Width);
        let height = value(Property::Height);
        let x = value(Property::X);
        let y = value(Property::Y);
        let scroll_width = nan_max(width, value(Property::ScrollWidth));
        let scroll_height = nan_max(height, value(Property::ScrollHeight));
        let scroll_x = nan_max(0.0, nan_min(value(Property::ScrollX), scroll_width - width));
        let scroll_y = nan_max(0.0, nan_min(value(Property::ScrollY), scroll_height - height));
        Self {
            width,
            height,
            scroll_width,
            scroll_height,
            x,
            y,
            scroll_x,
            scroll_y,
            left: nan_min(x, x + width),
            top: nan_min(y, y + height),
            right: nan_max(x + width, x),
            bottom: nan_max(y + height, y),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn scroll_width(&self) -> f64 {
        self.scroll_width
    }

    pub fn scroll_height(&self) -> f64 {
        self.scroll_height
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn scroll_x(&self) -> f64 {
        self.scroll_x
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    pub fn left(&self) -> f64 {
        self.left
    }

    pub fn top(&self) -> f64 {
        self.top
    }

    pub fn right(&self) -> f64 {
        self.right
    }

    pub fn bottom(&self) -> f64 {
        self.bottom
    }

    pub fn get(&self, property: Property) -> f64 {
        match property {
            Property::Width => self.width,
            Property::Height => self.height,
            Property::ScrollWidth => self.scroll_width,
            Property::ScrollHeight => self.scroll_height,
            Property::X => self.x,
            Property::Y => self.y,
            Property::ScrollX => self.scroll_x,
            Property::ScrollY => self.scroll_y,
        }
    }

    pub fn rect(&self) -> DomRect {
        DomRect {
            width: self.width,
            height: self.height,
            x: self.x,
            y: self.y,
            left: self.left,
            right: self.right,
            top: self.top,
            bottom: self.bottom,
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Layout::new(&StyleDeclaration::new())
    }
}

impl From<&StyleDeclaration> for Layout {
    fn from(styles: &StyleDeclaration) -> Self {
        Layout::new(styles)
    }
}

/// The `getBoundingClientRect()` shape.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DomRect {
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

// f64::max/min drop NaN operands; geometry keeps them visible instead.
pub(crate) fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() { f64::NAN } else { a.max(b) }
}

pub(crate) fn nan_min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() { f64::NAN } else { a.min(b) }
}
