use std::fmt;

/// Geometry properties a style declaration can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Property {
    Width,
    Height,
    ScrollWidth,
    ScrollHeight,
    X,
    Y,
    ScrollX,
    ScrollY,
}

impl Property {
    pub const ALL: [Property; 8] = [
        Property::Width,
        Property::Height,
        Property::ScrollWidth,
        Property::ScrollHeight,
        Property::X,
        Property::Y,
        Property::ScrollX,
        Property::ScrollY,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Property::Width => "width",
            Property::Height => "height",
            Property::ScrollWidth => "scrollWidth",
            Property::ScrollHeight => "scrollHeight",
            Property::X => "x",
            Property::Y => "y",
            Property::ScrollX => "scrollX",
            Property::ScrollY => "scrollY",
        }
    }

    /// Accepts the camelCase and kebab-case spellings, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Property> {
        let normalized: String = name
            .trim()
            .chars()
            .filter(|ch| *ch != '-')
            .map(|ch| ch.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "width" => Some(Property::Width),
            "height" => Some(Property::Height),
            "scrollwidth" => Some(Property::ScrollWidth),
            "scrollheight" => Some(Property::ScrollHeight),
            "x" => Some(Property::X),
            "y" => Some(Property::Y),
            "scrollx" => Some(Property::ScrollX),
            "scrolly" => Some(Property::ScrollY),
            _ => None,
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StyleValue {
    Number(f64),
    Auto,
}

impl StyleValue {
    pub fn as_number(self) -> Option<f64> {
        match self {
            StyleValue::Number(value) => Some(value),
            StyleValue::Auto => None,
        }
    }

    pub fn is_auto(self) -> bool {
        matches!(self, StyleValue::Auto)
    }

    /// `auto`, a bare number, or a `px` length. Anything else is NaN.
    pub fn parse(raw: &str) -> StyleValue {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("auto") {
            return StyleValue::Auto;
        }
        let number = raw
            .strip_suffix("px")
            .or_else(|| raw.strip_suffix("PX"))
            .unwrap_or(raw)
            .trim();
        StyleValue::Number(number.parse::<f64>().unwrap_or(f64::NAN))
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        StyleValue::Number(value)
    }
}

impl From<i32> for StyleValue {
    fn from(value: i32) -> Self {
        StyleValue::Number(value as f64)
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Number(value) => write!(f, "{value}"),
            StyleValue::Auto => f.write_str("auto"),
        }
    }
}

/// A partial set of geometry values. Unset properties fall back to 0 once a
/// [`Layout`](crate::Layout) is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleDeclaration {
    values: [Option<StyleValue>; 8],
}

impl StyleDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, property: Property, value: impl Into<StyleValue>) -> Self {
        self.set(property, value);
        self
    }

    pub fn set(&mut self, property: Property, value: impl Into<StyleValue>) {
        self.values[property.index()] = Some(value.into());
    }

    pub(crate) fn set_opt(&mut self, property: Property, value: Option<StyleValue>) {
        self.values[property.index()] = value;
    }

    pub fn remove(&mut self, property: Property) -> Option<StyleValue> {
        self.values[property.index()].take()
    }

    pub fn get(&self, property: Property) -> Option<StyleValue> {
        self.values[property.index()]
    }

    pub fn number(&self, property: Property) -> Option<f64> {
        self.get(property).and_then(StyleValue::as_number)
    }

    pub fn is_auto(&self, property: Property) -> bool {
        self.get(property).is_some_and(StyleValue::is_auto)
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// Set values of `other` overwrite the ones held here.
    pub fn merge(&mut self, other: &StyleDeclaration) {
        for (slot, value) in self.values.iter_mut().zip(other.values.iter()) {
            if value.is_some() {
                *slot = *value;
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Property, StyleValue)> + '_ {
        Property::ALL
            .into_iter()
            .filter_map(|property| self.get(property).map(|value| (property, value)))
    }
}

impl FromIterator<(Property, StyleValue)> for StyleDeclaration {
    fn from_iter<T: IntoIterator<Item = (Property, StyleValue)>>(iter: T) -> Self {
        let mut declaration = StyleDeclaration::new();
        for (property, value) in iter {
            declaration.set(property, value);
        }
        declaration
    }
}

impl fmt::Display for StyleDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (idx, (property, value)) in self.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{property}: {value}")?;
        }
        f.write_str("}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Axis {
    X,
    Y,
}

impl Axis {
    pub(crate) const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    pub(crate) fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }

    pub(crate) fn property(self) -> Property {
        match self {
            Axis::X => Property::X,
            Axis::Y => Property::Y,
        }
    }

    /// The extent along this axis.
    pub(crate) fn side(self) -> Side {
        match self {
            Axis::X => Side::Width,
            Axis::Y => Side::Height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Side {
    Width,
    Height,
    ScrollWidth,
    ScrollHeight,
}

impl Side {
    pub(crate) const ALL: [Side; 4] = [
        Side::Width,
        Side::Height,
        Side::ScrollWidth,
        Side::ScrollHeight,
    ];

    pub(crate) fn property(self) -> Property {
        match self {
            Side::Width => Property::Width,
            Side::Height => Property::Height,
            Side::ScrollWidth => Property::ScrollWidth,
            Side::ScrollHeight => Property::ScrollHeight,
        }
    }

    /// Scroll sides measure children by the plain side on the same axis.
    pub(crate) fn base(self) -> Side {
        match self {
            Side::Width | Side::ScrollWidth => Side::Width,
            Side::Height | Side::ScrollHeight => Side::Height,
        }
    }

    pub(crate) fn paired_scroll(self) -> Option<Side> {
        match self {
            Side::Width => Some(Side::ScrollWidth),
            Side::Height => Some(Side::ScrollHeight),
            _ => None,
        }
    }

    pub(crate) fn axis(self) -> Axis {
        match self.base() {
            Side::Width => Axis::X,
            _ => Axis::Y,
        }
    }
}
