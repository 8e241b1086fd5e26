use std::{
    cell::{Cell, RefCell},
    collections::{BTreeMap, BTreeSet},
    rc::Rc,
};

use crate::{PresentationHost, RootNode};

#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct NodeState {
    pub classes: BTreeSet<String>,
    pub attributes: BTreeMap<String, String>,
}

#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct DomSnapshot {
    pub document: NodeState,
    pub body: NodeState,
    /// `(name, content)` per `<meta>` tag in document order.
    pub meta: Vec<(String, String)>,
}

impl DomSnapshot {
    fn node(&self, node: RootNode) -> &NodeState {
        match node {
            RootNode::Document => &self.document,
            RootNode::Body => &self.body,
        }
    }

    fn node_mut(&mut self, node: RootNode) -> &mut NodeState {
        match node {
            RootNode::Document => &mut self.document,
            RootNode::Body => &mut self.body,
        }
    }
}

/// In-memory stand-in for the document's root nodes.
#[derive(Default, Clone)]
pub struct RecordingHost {
    dom: Rc<RefCell<DomSnapshot>>,
    failing: Rc<Cell<bool>>,
}

impl RecordingHost {
    pub fn new() -> Self { Self::default() }

    pub fn snapshot(&self) -> DomSnapshot { self.dom.borrow().clone() }

    pub fn has_class(&self, node: RootNode, class: &str) -> bool {
        self.dom.borrow().node(node).classes.contains(class)
    }

    pub fn attribute(&self, node: RootNode, name: &str) -> Option<String> {
        self.dom.borrow().node(node).attributes.get(name).cloned()
    }

    pub fn meta_contents(&self, name: &str) -> Vec<String> {
        self.dom
            .borrow()
            .meta
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, c)| c.clone())
            .collect()
    }

    pub fn set_failing(&self, failing: bool) { self.failing.set(failing); }

    fn check(&self) -> anyhow::Result<()> {
        if self.failing.get() {
            anyhow::bail!("document unavailable");
        }
        Ok(())
    }
}

impl PresentationHost for RecordingHost {
    fn set_class(&self, node: RootNode, class: &str, present: bool) -> anyhow::Result<()> {
        self.check()?;
        let mut dom = self.dom.borrow_mut();
        let classes = &mut dom.node_mut(node).classes;
        if present {
            classes.insert(class.to_string());
        } else {
            classes.remove(class);
        }
        Ok(())
    }

    fn set_attribute(&self, node: RootNode, name: &str, value: &str) -> anyhow::Result<()> {
        self.check()?;
        self.dom
            .borrow_mut()
            .node_mut(node)
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn upsert_meta(&self, name: &str, content: &str) -> anyhow::Result<()> {
        self.check()?;
        let mut dom = self.dom.borrow_mut();
        match dom.meta.iter_mut().find(|(n, _)| n == name) {
            Some((_, c)) => *c = content.to_string(),
            None => dom.meta.push((name.to_string(), content.to_string())),
        }
        Ok(())
    }
}
