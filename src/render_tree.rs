use crate::host::Target;
use crate::types::StyleDeclaration;
use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Child<N> {
    Concrete(Target<N>),
    /// Re-queried under the owning node on every resolution.
    LiveSelector(String),
}

#[derive(Debug, Clone)]
pub(crate) struct RenderNode<N> {
    pub parent: Option<Target<N>>,
    pub children: Vec<Child<N>>,
}

/// Registration structure mirrored next to the document: who paints under
/// whom, plus each registered target's explicit style override.
#[derive(Debug)]
pub(crate) struct RenderTree<N> {
    nodes: HashMap<Target<N>, RenderNode<N>>,
    styles: HashMap<Target<N>, StyleDeclaration>,
}

impl<N: Clone + Eq + Hash> RenderTree<N> {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            styles: HashMap::new(),
        }
    }

    /// Registers `target` under `parent` unless it is already known. With
    /// `attach`, the target is also appended to the parent's child list,
    /// registering the parent under the window first if needed.
    pub fn register(&mut self, target: &Target<N>, parent: Option<Target<N>>, attach: bool) {
        if self.nodes.contains_key(target) {
            return;
        }
        self.styles.insert(target.clone(), StyleDeclaration::new());
        self.nodes.insert(
            target.clone(),
            RenderNode {
                parent: parent.clone(),
                children: Vec::new(),
            },
        );
        if !attach {
            return;
        }
        if let Some(parent) = parent {
            self.register(&parent, default_parent(&parent), false);
            if let Some(node) = self.nodes.get_mut(&parent) {
                node.children.push(Child::Concrete(target.clone()));
            }
        }
    }

    pub fn add_live_selector(&mut self, scope: &Target<N>, selector: &str) {
        self.register(scope, default_parent(scope), false);
        if let Some(node) = self.nodes.get_mut(scope) {
            let already_live = node
                .children
                .iter()
                .any(|child| matches!(child, Child::LiveSelector(existing) if existing == selector));
            if !already_live {
                node.children.push(Child::LiveSelector(selector.to_string()));
            }
        }
    }

    #[cfg(test)]
    pub fn contains(&self, target: &Target<N>) -> bool {
        self.nodes.contains_key(target)
    }

    pub fn parent(&self, target: &Target<N>) -> Option<Target<N>> {
        self.nodes.get(target).and_then(|node| node.parent.clone())
    }

    pub fn children(&self, target: &Target<N>) -> Vec<Child<N>> {
        self.nodes
            .get(target)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    /// Closest first.
    pub fn ancestors(&self, target: &Target<N>) -> Vec<Target<N>> {
        let mut ancestors = Vec::new();
        let mut current = self.parent(target);
        while let Some(parent) = current {
            if ancestors.contains(&parent) || parent == *target {
                break;
            }
            current = self.parent(&parent);
            ancestors.push(parent);
        }
        ancestors
    }

    pub fn styles(&self, target: &Target<N>) -> Option<&StyleDeclaration> {
        self.styles.get(target)
    }

    pub fn styles_mut(&mut self, target: &Target<N>) -> &mut StyleDeclaration {
        self.styles.entry(target.clone()).or_default()
    }
}

/// Everything hangs off the window; the window itself has no parent.
pub(crate) fn default_parent<N>(target: &Target<N>) -> Option<Target<N>> {
    match target {
        Target::Window => None,
        Target::Element(_) => Some(Target::Window),
    }
}
