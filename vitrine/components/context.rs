use cfg_if::cfg_if;
use leptos::prelude::*;
use state::{Subscription, Theme, ThemeConfig};
use toggle::ThemeController;

/// The page's theme as a signal, plus the controller that owns it once the
/// page is live in a browser.
#[derive(Clone, Copy)]
pub struct ThemeContext {
    pub theme: ReadSignal<Theme>,
    controller: StoredValue<Option<ThemeController>, LocalStorage>,
}

impl ThemeContext {
    pub fn activate(&self) {
        self.controller.with_value(|controller| match controller {
            Some(controller) => controller.activate(),
            None => tracing::debug!("theme toggle activated before hydration"),
        });
    }
}

/// Provides a [`ThemeContext`]. The controller is only built in the browser,
/// after mount, so server and hydrated markup agree on the first render.
pub fn provide_theme(config: ThemeConfig) -> ThemeContext {
    let (theme, set_theme) = signal(Theme::default());
    let controller = StoredValue::new_local(None::<ThemeController>);
    let subscription = StoredValue::new_local(None::<Subscription>);

    Effect::new(move || {
        cfg_if! {
            if #[cfg(feature = "hydrate")] {
                let live = ThemeController::browser(&config);
                set_theme.set(live.init(None));
                let follow = live.subscribe(move |change| set_theme.set(change.theme));
                subscription.set_value(Some(follow));
                controller.set_value(Some(live));
            } else {
                _ = (&config, set_theme, subscription);
            }
        }
    });

    on_cleanup(move || {
        _ = subscription.try_update_value(|s| s.take());
        _ = controller.try_update_value(|c| {
            if let Some(c) = c.take() {
                c.teardown();
            }
        });
    });

    let ctx = ThemeContext { theme, controller };
    provide_context(ctx);
    ctx
}

cfg_if! {
    if #[cfg(feature = "hydrate")] {
        use std::rc::Rc;

        use reveal::{Animator, IntersectionBackend};

        /// Animator shared by every `Reveal` on the page.
        #[derive(Clone, Copy)]
        pub struct AnimatorContext(pub StoredValue<Animator<IntersectionBackend>, LocalStorage>);

        pub fn provide_animator() {
            let animator = Animator::new(IntersectionBackend::detect(), Rc::new(state::TimeoutScheduler));
            provide_context(AnimatorContext(StoredValue::new_local(animator)));
        }
    } else {
        /// Reveals only run in the browser.
        pub fn provide_animator() {}
    }
}
