use anyhow::anyhow;
use leptos::tachys::dom::window;
use state::Subscription;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::{RevealOptions, Stagger, Visibility, VisibilityBackend};

/// One `IntersectionObserver` per watched element.
#[derive(Debug, Clone, Copy)]
pub struct IntersectionBackend;

impl IntersectionBackend {
    /// `None` on engines without `IntersectionObserver`.
    pub fn detect() -> Option<Self> {
        js_sys::Reflect::has(&window(), &JsValue::from_str("IntersectionObserver"))
            .unwrap_or(false)
            .then_some(Self)
    }
}

impl VisibilityBackend for IntersectionBackend {
    type Target = Element;

    fn observe(
        &self,
        target: &Element,
        options: &RevealOptions,
        on_change: Box<dyn Fn(Visibility)>,
    ) -> anyhow::Result<Subscription> {
        let callback = Closure::<dyn Fn(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, _: IntersectionObserver| {
                for entry in entries.iter() {
                    let entry: IntersectionObserverEntry = entry.unchecked_into();
                    on_change(Visibility {
                        intersecting: entry.is_intersecting(),
                        ratio: entry.intersection_ratio(),
                    });
                }
            },
        );
        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin);
        let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
            .map_err(|e| anyhow!("{e:?}"))?;
        observer.observe(target);
        Ok(Subscription::new(move || {
            observer.disconnect();
            drop(callback);
        }))
    }
}

/// Gives each child of `container` its staggered `transition-delay`, then
/// marks the container and children with `class`.
pub fn reveal_children(container: &Element, stagger: &Stagger, class: &str) {
    let children = container.children();
    for i in 0..children.length() {
        let Some(child) = children.item(i) else {
            continue;
        };
        if let Some(el) = child.dyn_ref::<HtmlElement>() {
            let delay = stagger.delay_for(i as usize).as_millis();
            _ = el
                .style()
                .set_property("transition-delay", &format!("{delay}ms"))
                .inspect_err(|e| tracing::debug!("failed to set transition-delay: {e:?}"));
        }
        _ = child.class_list().add_1(class);
    }
    _ = container.class_list().add_1(class);
}
