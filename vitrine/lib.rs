use cfg_if::cfg_if;
#[allow(clippy::empty_docs)]
pub mod components;
#[allow(clippy::empty_docs)]
pub mod routes;

// wasm-bindgen entry points have to live in the lib target.
cfg_if! {
    if #[cfg(feature = "hydrate")] {
        use std::{rc::Rc, time::Duration};

        use darkmode::PreferenceStore;
        use leptos::tachys::dom::document;
        use presentation::{Applier, DocumentHost};
        use reveal::{reveal_children, Animator, IntersectionBackend, RevealHandle, Stagger, REVEALED_CLASS};
        use state::{ThemeConfig, TimeoutScheduler};
        use toggle::{DomToggleHost, ThemeController};
        use tracing_subscriber::prelude::*;
        use tracing_web::MakeWebConsoleWriter;
        use wasm_bindgen::{prelude::wasm_bindgen, JsCast};

        use crate::routes::app::Site;

        /// Attribute marking a static section for reveal; its value, if any,
        /// is the per-child stagger in milliseconds.
        const REVEAL_ATTRIBUTE: &str = "data-reveal";

        fn init_tracing() {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_ansi(false) // Only partially supported across browsers
                .without_time()
                .with_writer(MakeWebConsoleWriter::new());
            // Both entry points may run on one page.
            _ = tracing_subscriber::registry().with(fmt_layer).try_init();
        }

        /// Paints the stored or OS theme before anything renders.
        fn paint_early(config: &ThemeConfig) {
            let store = PreferenceStore::browser(config);
            let applier = Applier::new(Rc::new(DocumentHost::new()), Rc::new(TimeoutScheduler), config);
            applier.apply_immediately(store.resolve());
        }

        #[wasm_bindgen]
        pub fn hydrate() {
            init_tracing();
            paint_early(&ThemeConfig::default());
            leptos::mount::hydrate_body(Site);
        }

        /// Everything `enhance` set up on a static page.
        #[wasm_bindgen]
        pub struct Enhancement {
            controller: ThemeController,
            reveals: Vec<RevealHandle>,
        }

        #[wasm_bindgen]
        impl Enhancement {
            pub fn theme(&self) -> String { self.controller.current().to_string() }

            pub fn toggle(&self) { self.controller.activate(); }

            /// Removes the toggle and cancels every listener and pending reveal.
            pub fn teardown(self) {
                self.controller.teardown();
                drop(self.reveals);
            }
        }

        /// Progressive enhancement for pages not rendered by [`Site`].
        #[wasm_bindgen]
        pub fn enhance() -> Enhancement {
            init_tracing();
            let config = ThemeConfig::default();
            let controller = ThemeController::browser(&config);
            let theme = controller.init(Some(&DomToggleHost::new(config.nav_container.clone())));
            tracing::info!("enhanced page with {theme} theme");

            let animator = Animator::new(IntersectionBackend::detect(), Rc::new(TimeoutScheduler));
            let reveals = watch_sections(&animator);
            Enhancement { controller, reveals }
        }

        fn watch_sections(animator: &Animator<IntersectionBackend>) -> Vec<RevealHandle> {
            let sections = match document().query_selector_all(&format!("[{REVEAL_ATTRIBUTE}]")) {
                Ok(sections) => sections,
                Err(e) => {
                    tracing::warn!("failed to query reveal sections: {e:?}");
                    return vec![];
                },
            };
            let mut handles = Vec::with_capacity(sections.length() as usize);
            for i in 0..sections.length() {
                let Some(section) = sections.item(i).and_then(|n| n.dyn_into::<web_sys::Element>().ok()) else {
                    continue;
                };
                let stagger = section
                    .get_attribute(REVEAL_ATTRIBUTE)
                    .and_then(|ms| ms.parse::<u64>().ok())
                    .map(|ms| Stagger::new(Duration::from_millis(ms)))
                    .unwrap_or_default();
                let target = section.clone();
                handles.push(animator.watch(&section, move || reveal_children(&target, &stagger, REVEALED_CLASS)));
            }
            handles
        }
    }
}
