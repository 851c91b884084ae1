use crate::host::{Event, Host, Target};
use crate::painter::{PaintTarget, Painter};
use kuchiki::traits::*;
use kuchiki::{NodeRef, Selectors};
use log::warn;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::rc::Rc;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";
const DEFAULT_VIEWPORT: (f64, f64) = (1024.0, 768.0);

/// A document node compared by identity.
#[derive(Clone)]
pub struct DomNode(NodeRef);

impl DomNode {
    pub fn node(&self) -> &NodeRef {
        &self.0
    }

    pub fn into_inner(self) -> NodeRef {
        self.0
    }
}

impl From<NodeRef> for DomNode {
    fn from(node: NodeRef) -> Self {
        DomNode(node)
    }
}

impl Deref for DomNode {
    type Target = NodeRef;

    fn deref(&self) -> &NodeRef {
        &self.0
    }
}

impl PartialEq for DomNode {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0.0, &other.0.0)
    }
}

impl Eq for DomNode {}

impl Hash for DomNode {
    fn hash<S: Hasher>(&self, state: &mut S) {
        std::ptr::hash(Rc::as_ptr(&self.0.0), state);
    }
}

impl fmt::Debug for DomNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DomNode({})", label(&self.0))
    }
}

impl From<DomNode> for Target<DomNode> {
    fn from(node: DomNode) -> Self {
        Target::Element(node)
    }
}

impl From<DomNode> for PaintTarget<DomNode> {
    fn from(node: DomNode) -> Self {
        PaintTarget::Node(Target::Element(node))
    }
}

type Callback = Rc<dyn Fn(&Painter<Dom>, &Event<DomNode>)>;

struct Listener {
    target: Target<DomNode>,
    event_type: String,
    once: bool,
    callback: Callback,
}

/// An in-memory HTML document the painter can measure.
pub struct Dom {
    document: NodeRef,
    inner_width: f64,
    inner_height: f64,
    listeners: RefCell<Vec<Listener>>,
    selector_cache: RefCell<HashMap<String, Option<Rc<Selectors>>>>,
}

impl Dom {
    pub fn parse(html: &str) -> Self {
        Self::from_document(kuchiki::parse_html().one(html))
    }

    pub fn from_document(document: NodeRef) -> Self {
        Self {
            document,
            inner_width: DEFAULT_VIEWPORT.0,
            inner_height: DEFAULT_VIEWPORT.1,
            listeners: RefCell::new(Vec::new()),
            selector_cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.inner_width = width;
        self.inner_height = height;
        self
    }

    pub fn document(&self) -> &NodeRef {
        &self.document
    }

    pub fn query_selector(&self, selector: &str) -> Option<DomNode> {
        self.query_selector_all(&Target::Window, selector)
            .into_iter()
            .next()
    }

    /// Registers `callback` for `event_type` events dispatched on `target`.
    pub fn add_event_listener<F>(
        &self,
        target: impl Into<Target<DomNode>>,
        event_type: &str,
        callback: F,
    ) where
        F: Fn(&Painter<Dom>, &Event<DomNode>) + 'static,
    {
        self.push_listener(target.into(), event_type, false, Rc::new(callback));
    }

    /// Like `add_event_listener`, removed after its first call.
    pub fn add_event_listener_once<F>(
        &self,
        target: impl Into<Target<DomNode>>,
        event_type: &str,
        callback: F,
    ) where
        F: Fn(&Painter<Dom>, &Event<DomNode>) + 'static,
    {
        self.push_listener(target.into(), event_type, true, Rc::new(callback));
    }

    fn push_listener(
        &self,
        target: Target<DomNode>,
        event_type: &str,
        once: bool,
        callback: Callback,
    ) {
        self.listeners.borrow_mut().push(Listener {
            target,
            event_type: event_type.to_string(),
            once,
            callback,
        });
    }

    fn compiled(&self, selector: &str) -> Option<Rc<Selectors>> {
        if let Some(cached) = self.selector_cache.borrow().get(selector) {
            return cached.clone();
        }
        let compiled = Selectors::compile(selector).ok().map(Rc::new);
        if compiled.is_none() {
            warn!("invalid selector `{selector}` matches nothing");
        }
        self.selector_cache
            .borrow_mut()
            .insert(selector.to_string(), compiled.clone());
        compiled
    }
}

impl Host for Dom {
    type Node = DomNode;

    fn viewport(&self) -> (f64, f64) {
        (self.inner_width, self.inner_height)
    }

    fn matches(&self, node: &DomNode, selector: &str) -> bool {
        let Some(selectors) = self.compiled(selector) else {
            return false;
        };
        node.0
            .clone()
            .into_element_ref()
            .is_some_and(|element| selectors.matches(&element))
    }

    fn query_selector_all(&self, scope: &Target<DomNode>, selector: &str) -> Vec<DomNode> {
        let Some(selectors) = self.compiled(selector) else {
            return Vec::new();
        };
        let root = match scope {
            Target::Window => &self.document,
            Target::Element(node) => &node.0,
        };
        root.descendants()
            .elements()
            .filter(|element| selectors.matches(element))
            .map(|element| DomNode(element.as_node().clone()))
            .collect()
    }

    fn is_html_element(&self, node: &DomNode) -> bool {
        node.as_element()
            .is_some_and(|element| &*element.name.ns == HTML_NAMESPACE)
    }

    fn dispatch_event(&self, painter: &Painter<Self>, event: &Event<DomNode>) {
        let mut fired: Vec<Callback> = Vec::new();
        self.listeners.borrow_mut().retain(|listener| {
            if listener.target != event.target || listener.event_type != event.event_type {
                return true;
            }
            fired.push(Rc::clone(&listener.callback));
            !listener.once
        });
        for callback in fired {
            callback(painter, event);
        }
    }

    fn describe(&self, node: &DomNode) -> String {
        label(&node.0)
    }
}

// `tag#id.class` for elements, the node kind otherwise.
fn label(node: &NodeRef) -> String {
    let Some(element) = node.as_element() else {
        return if node.as_document().is_some() {
            "#document".to_string()
        } else {
            "#node".to_string()
        };
    };
    let mut label = element.name.local.to_string();
    let attributes = element.attributes.borrow();
    if let Some(id) = attributes.get("id") {
        label.push('#');
        label.push_str(id);
    }
    if let Some(classes) = attributes.get("class") {
        for class in classes.split_whitespace() {
            label.push('.');
            label.push_str(class);
        }
    }
    label
}
