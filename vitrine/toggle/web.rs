use std::rc::Rc;

use anyhow::anyhow;
use leptos::tachys::dom::document;
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{Element, Event, KeyboardEvent};

use crate::{insertion_point, is_activation_key, InsertAt, ToggleButton, ToggleHost, ToggleView, TOGGLE_CLASS};

/// Inserts a `<button>` into the container matched by `selector`.
pub struct DomToggleHost {
    selector: String,
}

impl DomToggleHost {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
        }
    }
}

impl ToggleHost for DomToggleHost {
    fn mount(&self, view: &ToggleView, on_activate: Rc<dyn Fn()>) -> anyhow::Result<Box<dyn ToggleButton>> {
        let document = document();
        let container = document
            .query_selector(&self.selector)
            .map_err(|e| anyhow!("{e:?}"))?
            .ok_or_else(|| anyhow!("navigation container {} not found", self.selector))?;
        let element = document.create_element("button").map_err(|e| anyhow!("{e:?}"))?;
        element.set_attribute("type", "button").map_err(|e| anyhow!("{e:?}"))?;
        element.set_class_name(TOGGLE_CLASS);

        let click = {
            let on_activate = on_activate.clone();
            Closure::<dyn Fn(Event)>::new(move |_: Event| on_activate())
        };
        // Buttons synthesize a click for Enter and Space; prevent it so one
        // key press is one activation.
        let keydown = Closure::<dyn Fn(KeyboardEvent)>::new(move |ev: KeyboardEvent| {
            if is_activation_key(&ev.key()) {
                ev.prevent_default();
                on_activate();
            }
        });
        element
            .add_event_listener_with_callback("click", click.as_ref().unchecked_ref())
            .map_err(|e| anyhow!("{e:?}"))?;
        element
            .add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())
            .map_err(|e| anyhow!("{e:?}"))?;

        let children = container.children();
        match insertion_point(children.length()) {
            InsertAt::Before(i) => {
                let reference = children.item(i);
                container
                    .insert_before(&element, reference.as_deref())
                    .map_err(|e| anyhow!("{e:?}"))?;
            },
            InsertAt::Append => {
                container.append_child(&element).map_err(|e| anyhow!("{e:?}"))?;
            },
        }

        let button = DomToggleButton {
            element,
            click,
            keydown,
        };
        button.render(view)?;
        Ok(Box::new(button))
    }
}

struct DomToggleButton {
    element: Element,
    click: Closure<dyn Fn(Event)>,
    keydown: Closure<dyn Fn(KeyboardEvent)>,
}

impl ToggleButton for DomToggleButton {
    fn render(&self, view: &ToggleView) -> anyhow::Result<()> {
        self.element.set_text_content(Some(view.icon));
        for (name, value) in [
            ("aria-label", view.label),
            ("title", view.label),
            ("aria-pressed", if view.pressed { "true" } else { "false" }),
            ("data-theme", view.theme.as_str()),
        ] {
            self.element
                .set_attribute(name, value)
                .map_err(|e| anyhow!("{e:?}"))?;
        }
        Ok(())
    }

    fn remove(&self) {
        _ = self
            .element
            .remove_event_listener_with_callback("click", self.click.as_ref().unchecked_ref());
        _ = self
            .element
            .remove_event_listener_with_callback("keydown", self.keydown.as_ref().unchecked_ref());
        self.element.remove();
    }
}
