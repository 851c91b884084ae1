mod css;
mod debug;
mod dom;
mod error;
mod host;
mod layout;
mod painter;
mod projection;
mod render_tree;
mod specificity;
mod stylesheet;
mod types;

pub use dom::{Dom, DomNode};
pub use error::PaintError;
pub use host::{Event, Host, Target};
pub use layout::{DomRect, Layout};
pub use painter::{PaintTarget, Painter, PainterBuilder, ScrollToOptions};
pub use projection::{ElementView, ElementViewMut, HtmlElementView, WindowView, WindowViewMut};
pub use specificity::{Specificity, split_selector_list};
pub use stylesheet::{Rule, Stylesheet};
pub use types::{Property, StyleDeclaration, StyleValue};
