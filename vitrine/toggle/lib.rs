// The light/dark toggle: state machine, button rendering and wiring.
use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use broadcast::{ChangeSource, ThemeBus, ThemeChange};
use cfg_if::cfg_if;
use darkmode::PreferenceStore;
use presentation::Applier;
use state::{Subscription, Theme};

mod memory;

pub use memory::{MemoryToggleHost, TOGGLE_CHILD};

cfg_if! {
    if #[cfg(feature = "hydrate")] {
        mod web;
        pub use web::DomToggleHost;
    }
}

/// CSS class of the toggle button.
pub const TOGGLE_CLASS: &str = "theme-toggle";

pub const LABEL_TO_LIGHT: &str = "Switch to light mode";
pub const LABEL_TO_DARK: &str = "Switch to dark mode";

/// What the button shows for the active theme.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ToggleView {
    pub theme: Theme,
    pub icon: &'static str,
    pub label: &'static str,
    pub pressed: bool,
}

impl ToggleView {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                theme,
                icon: "\u{263E}",
                label: LABEL_TO_DARK,
                pressed: false,
            },
            Theme::Dark => Self {
                theme,
                icon: "\u{2600}",
                label: LABEL_TO_LIGHT,
                pressed: true,
            },
        }
    }
}

/// `KeyboardEvent.key` values that activate the toggle.
pub fn is_activation_key(key: &str) -> bool { matches!(key, "Enter" | " " | "Spacebar") }

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum InsertAt {
    Before(u32),
    Append,
}

/// Second-to-last when the container has children, otherwise appended.
pub fn insertion_point(child_count: u32) -> InsertAt {
    match child_count {
        0 => InsertAt::Append,
        n => InsertAt::Before(n - 1),
    }
}

pub trait ToggleButton {
    fn render(&self, view: &ToggleView) -> anyhow::Result<()>;
    fn remove(&self);
}

/// Places the toggle button into the navigation container.
pub trait ToggleHost {
    fn mount(&self, view: &ToggleView, on_activate: Rc<dyn Fn()>) -> anyhow::Result<Box<dyn ToggleButton>>;
}

struct Inner {
    store: PreferenceStore,
    applier: Applier,
    bus: ThemeBus,
    current: Cell<Theme>,
    live: Cell<bool>,
    // Set once the user toggles, even if the choice couldn't be stored.
    explicit: Cell<bool>,
    button: RefCell<Option<Box<dyn ToggleButton>>>,
    subscriptions: RefCell<Vec<Subscription>>,
}

impl Inner {
    fn activate(&self) {
        if !self.live.get() {
            return;
        }
        let previous = self.current.get();
        let next = previous.toggled();
        if let Err(e) = self.applier.try_apply(next, true) {
            tracing::warn!("failed to switch to {next} theme: {e:#}");
            self.applier.apply_immediately(previous);
            return;
        }
        self.current.set(next);
        self.explicit.set(true);
        self.store.persist(next);
        self.render();
        self.bus.broadcast(next, ChangeSource::User);
    }

    fn follow_system(&self, theme: Theme) {
        if !self.live.get() || theme == self.current.get() {
            return;
        }
        if self.explicit.get() || self.store.has_explicit_preference() {
            return;
        }
        self.current.set(theme);
        self.applier.apply(theme);
        self.render();
        self.bus.broadcast(theme, ChangeSource::System);
    }

    fn render(&self) {
        if let Some(button) = self.button.borrow().as_ref() {
            _ = button
                .render(&ToggleView::for_theme(self.current.get()))
                .inspect_err(|e| tracing::warn!("failed to render theme toggle: {e:#}"));
        }
    }

    fn release(&self) {
        let subscriptions = self.subscriptions.take();
        drop(subscriptions);
        self.applier.cancel_transition();
        let button = self.button.take();
        if let Some(button) = button {
            button.remove();
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) { self.release(); }
}

/// Owns the theme for a page. Clones share the same state.
#[derive(Clone)]
pub struct ThemeController {
    inner: Rc<Inner>,
}

impl ThemeController {
    pub fn new(store: PreferenceStore, applier: Applier, bus: ThemeBus) -> Self {
        Self {
            inner: Rc::new(Inner {
                store,
                applier,
                bus,
                current: Cell::new(Theme::default()),
                live: Cell::new(false),
                explicit: Cell::new(false),
                button: RefCell::new(None),
                subscriptions: RefCell::new(vec![]),
            }),
        }
    }

    /// Controller over `localStorage`, `matchMedia`, the live document and
    /// `themeChanged` events.
    #[cfg(feature = "hydrate")]
    pub fn browser(config: &state::ThemeConfig) -> Self {
        Self::new(
            PreferenceStore::browser(config),
            Applier::new(
                Rc::new(presentation::DocumentHost::new()),
                Rc::new(state::TimeoutScheduler),
                config,
            ),
            ThemeBus::browser(config),
        )
    }

    /// Resolves and paints the preference, follows OS changes and mounts the
    /// button when a host is given. A missing anchor only skips the button.
    pub fn init(&self, toggle_host: Option<&dyn ToggleHost>) -> Theme {
        if self.inner.live.get() {
            self.teardown();
        }
        let theme = self.inner.store.resolve();
        self.inner.current.set(theme);
        self.inner.applier.apply_immediately(theme);
        self.inner.live.set(true);

        let weak = Rc::downgrade(&self.inner);
        let watch = self.inner.store.watch_system(move |theme| {
            if let Some(inner) = weak.upgrade() {
                inner.follow_system(theme);
            }
        });
        self.inner.subscriptions.borrow_mut().push(watch);

        if let Some(host) = toggle_host {
            self.mount(host);
        }
        theme
    }

    fn mount(&self, host: &dyn ToggleHost) {
        let weak = Rc::downgrade(&self.inner);
        let on_activate: Rc<dyn Fn()> = Rc::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.activate();
            }
        });
        match host.mount(&ToggleView::for_theme(self.current()), on_activate) {
            Ok(button) => {
                let previous = self.inner.button.replace(Some(button));
                if let Some(previous) = previous {
                    previous.remove();
                }
            },
            Err(e) => tracing::warn!("theme toggle not mounted: {e:#}"),
        }
    }

    /// Flips the theme, then applies, persists, re-renders and broadcasts.
    pub fn activate(&self) { self.inner.activate(); }

    pub fn current(&self) -> Theme { self.inner.current.get() }

    pub fn view(&self) -> ToggleView { ToggleView::for_theme(self.current()) }

    pub fn has_button(&self) -> bool { self.inner.button.borrow().is_some() }

    pub fn subscribe(&self, listener: impl Fn(&ThemeChange) + 'static) -> Subscription {
        self.inner.bus.subscribe(listener)
    }

    /// Cancels every registration and removes the button. Later activations
    /// and OS changes are ignored until `init` runs again.
    pub fn teardown(&self) {
        self.inner.live.set(false);
        self.inner.release();
    }
}
