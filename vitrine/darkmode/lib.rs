// Theme preference persistence and OS color scheme detection
use cfg_if::cfg_if;
use state::{Subscription, Theme, ThemeConfig};

mod memory;

pub use memory::{FixedSignal, MemoryStore};

cfg_if! {
    if #[cfg(feature = "hydrate")] {
        mod web;
        pub use web::{LocalStorage, MediaQuerySignal};
    }
}

pub const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

/// Persistent string key-value storage, e.g. `window.localStorage`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// The environment's "prefers dark color scheme" signal.
pub trait ColorSchemeSignal {
    fn prefers_dark(&self) -> anyhow::Result<bool>;
    fn subscribe(&self, on_change: Box<dyn Fn(bool)>) -> anyhow::Result<Subscription>;
}

pub struct PreferenceStore {
    key: String,
    store: Option<Box<dyn KeyValueStore>>,
    signal: Option<Box<dyn ColorSchemeSignal>>,
}

impl PreferenceStore {
    pub fn new(
        config: &ThemeConfig,
        store: Option<Box<dyn KeyValueStore>>,
        signal: Option<Box<dyn ColorSchemeSignal>>,
    ) -> Self {
        Self {
            key: config.storage_key.clone(),
            store,
            signal,
        }
    }

    /// Store backed by `localStorage` and `matchMedia`. Either may be missing
    /// (private browsing, very old engines); the store degrades accordingly.
    #[cfg(feature = "hydrate")]
    pub fn browser(config: &ThemeConfig) -> Self {
        Self::new(
            config,
            LocalStorage::open().map(|s| Box::new(s) as Box<dyn KeyValueStore>),
            MediaQuerySignal::open(DARK_SCHEME_QUERY).map(|s| Box::new(s) as Box<dyn ColorSchemeSignal>),
        )
    }

    pub fn key(&self) -> &str { &self.key }

    fn stored(&self) -> anyhow::Result<Option<String>> {
        match &self.store {
            Some(store) => store.get(&self.key),
            None => Ok(None),
        }
    }

    /// Stored value, then the OS signal, then [`Theme::Light`].
    pub fn resolve(&self) -> Theme {
        match self.stored() {
            Ok(Some(value)) => {
                return value.parse().unwrap_or_else(|e| {
                    tracing::warn!("ignoring stored preference under {}: {e:#}", self.key);
                    Theme::Light
                });
            },
            Ok(None) => {},
            Err(e) => tracing::warn!("failed to read stored preference: {e:#}"),
        }
        self.system_prefers_dark()
            .map(Theme::from_dark)
            .unwrap_or_default()
    }

    pub fn system_prefers_dark(&self) -> Option<bool> {
        let signal = self.signal.as_ref()?;
        signal
            .prefers_dark()
            .inspect_err(|e| tracing::warn!("color scheme signal unavailable: {e:#}"))
            .ok()
    }

    pub fn try_persist(&self, theme: Theme) -> anyhow::Result<()> {
        self.store
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("no storage"))?
            .set(&self.key, theme.as_str())
    }

    pub fn persist(&self, theme: Theme) {
        _ = self
            .try_persist(theme)
            .inspect_err(|e| tracing::warn!("failed to persist {theme} preference: {e:#}"));
    }

    pub fn has_explicit_preference(&self) -> bool { matches!(self.stored(), Ok(Some(_))) }

    /// Calls `on_change` with the new OS theme whenever it changes.
    pub fn watch_system(&self, on_change: impl Fn(Theme) + 'static) -> Subscription {
        let Some(signal) = &self.signal else {
            return Subscription::noop();
        };
        signal
            .subscribe(Box::new(move |dark| on_change(Theme::from_dark(dark))))
            .unwrap_or_else(|e| {
                tracing::warn!("failed to watch color scheme: {e:#}");
                Subscription::noop()
            })
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    fn store(kv: &MemoryStore, signal: &FixedSignal) -> PreferenceStore {
        PreferenceStore::new(
            &ThemeConfig::default(),
            Some(Box::new(kv.clone())),
            Some(Box::new(signal.clone())),
        )
    }

    #[test]
    fn test_round_trip() {
        let kv = MemoryStore::new();
        let p = store(&kv, &FixedSignal::new(false));
        for theme in [Theme::Dark, Theme::Light] {
            p.persist(theme);
            assert_eq!(p.resolve(), theme);
        }
        assert_eq!(kv.value("vitrine-theme").as_deref(), Some("light"));
    }

    #[test]
    fn test_fallback_chain() {
        let kv = MemoryStore::new();
        assert_eq!(store(&kv, &FixedSignal::new(true)).resolve(), Theme::Dark);
        assert_eq!(store(&kv, &FixedSignal::new(false)).resolve(), Theme::Light);
        assert_eq!(store(&kv, &FixedSignal::unavailable()).resolve(), Theme::Light);
        let no_signal = PreferenceStore::new(&ThemeConfig::default(), Some(Box::new(kv)), None);
        assert_eq!(no_signal.resolve(), Theme::Light);
    }

    #[test]
    fn test_stored_beats_signal() {
        let kv = MemoryStore::new().with("vitrine-theme", "light");
        assert_eq!(store(&kv, &FixedSignal::new(true)).resolve(), Theme::Light);
    }

    #[test]
    fn test_invalid_value_coerced() {
        let kv = MemoryStore::new().with("vitrine-theme", "purple");
        let p = store(&kv, &FixedSignal::new(true));
        assert_eq!(p.resolve(), Theme::Light);
        assert!(p.has_explicit_preference());
    }

    #[test]
    fn test_broken_store() {
        let kv = MemoryStore::new().with("vitrine-theme", "light");
        kv.set_failing(true);
        let p = store(&kv, &FixedSignal::new(true));
        assert_eq!(p.resolve(), Theme::Dark);
        assert!(!p.has_explicit_preference());
        assert!(p.try_persist(Theme::Light).is_err());
        // Swallowed.
        p.persist(Theme::Light);
    }

    #[test]
    fn test_no_storage() {
        let p = PreferenceStore::new(&ThemeConfig::default(), None, Some(Box::new(FixedSignal::new(true))));
        assert_eq!(p.resolve(), Theme::Dark);
        assert!(!p.has_explicit_preference());
        let _ = p.try_persist(Theme::Dark).unwrap_err();
    }

    #[test]
    fn test_custom_key() {
        let kv = MemoryStore::new();
        let config = ThemeConfig {
            storage_key: "acme-theme".into(),
            ..Default::default()
        };
        let p = PreferenceStore::new(&config, Some(Box::new(kv.clone())), None);
        p.persist(Theme::Dark);
        assert_eq!(kv.value("acme-theme").as_deref(), Some("dark"));
        assert_eq!(kv.value("vitrine-theme"), None);
    }

    #[test]
    fn test_watch_system() {
        let signal = FixedSignal::new(false);
        let p = store(&MemoryStore::new(), &signal);
        let seen = Rc::new(RefCell::new(vec![]));
        let s = seen.clone();
        let sub = p.watch_system(move |t| s.borrow_mut().push(t));
        signal.set(Some(true));
        signal.set(Some(false));
        drop(sub);
        signal.set(Some(true));
        assert_eq!(*seen.borrow(), vec![Theme::Dark, Theme::Light]);
        assert_eq!(signal.listener_count(), 0);
    }
}
