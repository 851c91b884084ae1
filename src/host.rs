use crate::painter::Painter;
use std::fmt;
use std::hash::Hash;

/// Anything geometry can be painted on: the viewport root or one element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target<N> {
    Window,
    Element(N),
}

impl<N> Target<N> {
    pub fn element(&self) -> Option<&N> {
        match self {
            Target::Window => None,
            Target::Element(node) => Some(node),
        }
    }

    pub fn is_window(&self) -> bool {
        matches!(self, Target::Window)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event<N> {
    pub event_type: &'static str,
    pub target: Target<N>,
}

impl<N> Event<N> {
    pub const SCROLL: &'static str = "scroll";

    pub fn scroll(target: Target<N>) -> Self {
        Self {
            event_type: Self::SCROLL,
            target,
        }
    }
}

/// Capabilities the painter consumes from the document it measures.
pub trait Host {
    type Node: Clone + Eq + Hash + fmt::Debug;

    /// Inner width and height reported by the window when painting starts.
    fn viewport(&self) -> (f64, f64);

    /// Invalid selectors match nothing.
    fn matches(&self, node: &Self::Node, selector: &str) -> bool;

    /// Descendants of `scope` matching `selector`, in document order. The
    /// window scope covers the whole document.
    fn query_selector_all(&self, scope: &Target<Self::Node>, selector: &str) -> Vec<Self::Node>;

    fn is_html_element(&self, node: &Self::Node) -> bool;

    /// Called after a scroll mutation has been painted, so listeners read the
    /// committed geometry through `painter`.
    fn dispatch_event(&self, painter: &Painter<Self>, event: &Event<Self::Node>)
    where
        Self: Sized;

    fn describe(&self, node: &Self::Node) -> String {
        format!("{node:?}")
    }
}
