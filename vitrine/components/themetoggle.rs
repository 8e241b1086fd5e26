use leptos::prelude::*;
use toggle::{is_activation_key, ToggleView, TOGGLE_CLASS};
use web_sys::KeyboardEvent;

use crate::components::context::ThemeContext;

#[allow(non_snake_case)]
#[component]
pub fn ThemeToggle() -> impl IntoView {
    let ctx = expect_context::<ThemeContext>();
    let current = move || ToggleView::for_theme(ctx.theme.get());
    view! {
        <button
            type="button"
            class=TOGGLE_CLASS
            aria-label=move || current().label
            title=move || current().label
            aria-pressed=move || if current().pressed { "true" } else { "false" }
            data-theme=move || current().theme.as_str()
            on:click=move |_| ctx.activate()
            on:keydown=move |ev: KeyboardEvent| {
                if is_activation_key(&ev.key()) {
                    ev.prevent_default();
                    ctx.activate();
                }
            }
        >
            {move || current().icon}
        </button>
    }
}
