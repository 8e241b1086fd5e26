use std::{cell::RefCell, rc::Rc};

use crate::{insertion_point, is_activation_key, InsertAt, ToggleButton, ToggleHost, ToggleView};

/// Name the button takes among the container's children.
pub const TOGGLE_CHILD: &str = "theme-toggle";

#[derive(Default)]
struct Nav {
    // None when the container doesn't exist.
    children: RefCell<Option<Vec<String>>>,
    view: RefCell<Option<ToggleView>>,
    on_activate: RefCell<Option<Rc<dyn Fn()>>>,
}

/// A navigation container modelled as a list of named children.
#[derive(Default, Clone)]
pub struct MemoryToggleHost {
    nav: Rc<Nav>,
}

impl MemoryToggleHost {
    pub fn new(children: &[&str]) -> Self {
        let host = Self::default();
        host.nav
            .children
            .replace(Some(children.iter().map(|c| c.to_string()).collect()));
        host
    }

    pub fn missing() -> Self { Self::default() }

    pub fn children(&self) -> Vec<String> { self.nav.children.borrow().clone().unwrap_or_default() }

    pub fn view(&self) -> Option<ToggleView> { *self.nav.view.borrow() }

    pub fn click(&self) {
        let on_activate = self.nav.on_activate.borrow().clone();
        if let Some(on_activate) = on_activate {
            on_activate();
        }
    }

    pub fn press(&self, key: &str) {
        if is_activation_key(key) {
            self.click();
        }
    }
}

impl ToggleHost for MemoryToggleHost {
    fn mount(&self, view: &ToggleView, on_activate: Rc<dyn Fn()>) -> anyhow::Result<Box<dyn ToggleButton>> {
        {
            let mut children = self.nav.children.borrow_mut();
            let children = children
                .as_mut()
                .ok_or_else(|| anyhow::anyhow!("navigation container not found"))?;
            let count = u32::try_from(children.len())?;
            match insertion_point(count) {
                InsertAt::Before(i) => children.insert(i as usize, TOGGLE_CHILD.to_string()),
                InsertAt::Append => children.push(TOGGLE_CHILD.to_string()),
            }
        }
        self.nav.on_activate.replace(Some(on_activate));
        let button = MemoryButton {
            nav: self.nav.clone(),
        };
        button.render(view)?;
        Ok(Box::new(button))
    }
}

struct MemoryButton {
    nav: Rc<Nav>,
}

impl ToggleButton for MemoryButton {
    fn render(&self, view: &ToggleView) -> anyhow::Result<()> {
        self.nav.view.replace(Some(*view));
        Ok(())
    }

    fn remove(&self) {
        if let Some(children) = self.nav.children.borrow_mut().as_mut() {
            children.retain(|c| c != TOGGLE_CHILD);
        }
        self.nav.view.replace(None);
        let on_activate = self.nav.on_activate.take();
        drop(on_activate);
    }
}
