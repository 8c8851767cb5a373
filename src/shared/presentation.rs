// Root presentation node that styling rules key off

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use parking_lot::RwLock;

use super::theme::ThemeMode;

/// The document root the theme marker is written to.
pub trait PresentationRoot: Send + Sync {
    fn set_attribute(&self, name: &str, value: &str);
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);
}

impl<P: PresentationRoot + ?Sized> PresentationRoot for Arc<P> {
    fn set_attribute(&self, name: &str, value: &str) {
        (**self).set_attribute(name, value)
    }

    fn add_class(&self, class: &str) {
        (**self).add_class(class)
    }

    fn remove_class(&self, class: &str) {
        (**self).remove_class(class)
    }
}

/// How the mode is marked on the root node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub attribute: String,
    pub class: bool,
}

impl Marker {
    /// Writes `mode` to `root`, replacing whichever mode was marked before.
    pub fn apply(&self, root: &dyn PresentationRoot, mode: ThemeMode) {
        root.set_attribute(&self.attribute, mode.as_str());
        if self.class {
            root.remove_class(mode.toggled().as_str());
            root.add_class(mode.as_str());
        }
    }
}

#[derive(Debug, Default)]
struct NodeState {
    attributes: BTreeMap<String, String>,
    classes: BTreeSet<String>,
}

/// In-memory root node. Clones observe the same node.
#[derive(Debug, Clone, Default)]
pub struct RootNode {
    state: Arc<RwLock<NodeState>>,
}

impl RootNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.state.read().attributes.get(name).cloned()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.state.read().classes.contains(class)
    }

    pub fn classes(&self) -> Vec<String> {
        self.state.read().classes.iter().cloned().collect()
    }
}

impl PresentationRoot for RootNode {
    fn set_attribute(&self, name: &str, value: &str) {
        self.state
            .write()
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn add_class(&self, class: &str) {
        self.state.write().classes.insert(class.to_string());
    }

    fn remove_class(&self, class: &str) {
        self.state.write().classes.remove(class);
    }
}
