use anyhow::anyhow;
use leptos::tachys::dom::document;
use web_sys::Element;

use crate::{PresentationHost, RootNode};

/// Mutates the live `<html>` and `<body>` elements.
pub struct DocumentHost {
    document: web_sys::Document,
}

impl Default for DocumentHost {
    fn default() -> Self { Self::new() }
}

impl DocumentHost {
    pub fn new() -> Self { Self { document: document() } }

    fn node(&self, node: RootNode) -> anyhow::Result<Element> {
        match node {
            RootNode::Document => self
                .document
                .document_element()
                .ok_or_else(|| anyhow!("no document element")),
            RootNode::Body => self
                .document
                .body()
                .map(Element::from)
                .ok_or_else(|| anyhow!("no body")),
        }
    }
}

impl PresentationHost for DocumentHost {
    fn set_class(&self, node: RootNode, class: &str, present: bool) -> anyhow::Result<()> {
        let list = self.node(node)?.class_list();
        let result = if present {
            list.add_1(class)
        } else {
            list.remove_1(class)
        };
        result.map_err(|e| anyhow!("{e:?}"))
    }

    fn set_attribute(&self, node: RootNode, name: &str, value: &str) -> anyhow::Result<()> {
        self.node(node)?
            .set_attribute(name, value)
            .map_err(|e| anyhow!("{e:?}"))
    }

    fn upsert_meta(&self, name: &str, content: &str) -> anyhow::Result<()> {
        let selector = format!("meta[name=\"{name}\"]");
        let existing = self
            .document
            .query_selector(&selector)
            .map_err(|e| anyhow!("{e:?}"))?;
        let meta = match existing {
            Some(meta) => meta,
            None => {
                let meta = self
                    .document
                    .create_element("meta")
                    .map_err(|e| anyhow!("{e:?}"))?;
                meta.set_attribute("name", name).map_err(|e| anyhow!("{e:?}"))?;
                self.document
                    .head()
                    .ok_or_else(|| anyhow!("no head"))?
                    .append_child(&meta)
                    .map_err(|e| anyhow!("{e:?}"))?;
                meta
            },
        };
        meta.set_attribute("content", content).map_err(|e| anyhow!("{e:?}"))
    }
}
