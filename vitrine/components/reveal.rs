use cfg_if::cfg_if;
use leptos::{html::Section, prelude::*};
use reveal::RevealHandle;

/// A page section that animates its children in the first time it scrolls
/// into view. Server markup carries only the `reveal` class.
#[allow(non_snake_case)]
#[component]
pub fn Reveal(
    children: Children,
    #[prop(optional)] id: Option<&'static str>,
    #[prop(into, default = "".into())] class: String,
    /// Delay added per child, in milliseconds.
    #[prop(default = 100)]
    stagger_ms: u64,
    #[prop(optional)] threshold: Option<f64>,
) -> impl IntoView {
    let node = NodeRef::<Section>::new();
    let handle = StoredValue::new_local(None::<RevealHandle>);

    cfg_if! {
        if #[cfg(feature = "hydrate")] {
            use std::time::Duration;

            use reveal::{reveal_children, RevealOptions, Stagger, REVEALED_CLASS};

            use crate::components::context::AnimatorContext;

            let animator = use_context::<AnimatorContext>();
            Effect::new(move || {
                let (Some(section), Some(AnimatorContext(animator))) = (node.get(), animator) else {
                    return;
                };
                let container: web_sys::Element = section.into();
                let target = container.clone();
                let stagger = Stagger::new(Duration::from_millis(stagger_ms));
                let watched = animator.with_value(|animator| {
                    let options = RevealOptions {
                        threshold: threshold.unwrap_or(animator.options().threshold),
                        ..animator.options().clone()
                    };
                    animator.watch_with(
                        &container,
                        move || reveal_children(&target, &stagger, REVEALED_CLASS),
                        &options,
                    )
                });
                handle.set_value(Some(watched));
            });
        } else {
            _ = (handle, stagger_ms, threshold);
        }
    }

    view! {
        <section id=id class=format!("reveal {class}") node_ref=node>
            {children()}
        </section>
    }
}
