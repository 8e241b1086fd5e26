use leptos::{config::LeptosOptions, prelude::*};
use leptos_meta::*;
use leptos_router::{components::*, path};
use state::ThemeConfig;

use crate::{
    components::{
        context::{provide_animator, provide_theme},
        nav::Nav,
    },
    routes::home::Home,
};

/// Document shell rendered around [`Site`] by the server.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <AutoReload options=options.clone() />
                <HydrationScripts options />
                <MetaTags />
            </head>
            <body>
                <Site />
            </body>
        </html>
    }
}

#[allow(non_snake_case)]
#[component]
pub fn Site() -> impl IntoView {
    provide_meta_context();
    provide_theme(ThemeConfig::default());
    provide_animator();
    let formatter = |text: String| {
        format!(
            "Vitrine{}{}",
            if text.is_empty() { "" } else { " - " },
            if text.is_empty() { "" } else { &text },
        )
    };
    view! {
        <Title formatter />
        <Stylesheet id="leptos" href="/assets/style.css" />
        <Router>
            <div id="root" class="min-h-screen">
                <Nav name="Vitrine" logo="/assets/logo.svg" />
                <main>
                    <Routes fallback=|| "Not Found.">
                        <Route path=path!("") view=Home />
                    </Routes>
                </main>
            </div>
        </Router>
    }
}
