use anyhow::anyhow;
use leptos::tachys::dom::window;
use state::Subscription;
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{MediaQueryList, MediaQueryListEvent};

use crate::{ColorSchemeSignal, KeyValueStore};

pub struct LocalStorage(web_sys::Storage);

impl LocalStorage {
    /// `None` when storage is disabled or access throws (e.g. sandboxed
    /// iframes).
    pub fn open() -> Option<Self> {
        window()
            .local_storage()
            .inspect_err(|e| tracing::warn!("localStorage unavailable: {e:?}"))
            .ok()
            .flatten()
            .map(Self)
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        self.0.get_item(key).map_err(|e| anyhow!("{e:?}"))
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.0.set_item(key, value).map_err(|e| anyhow!("{e:?}"))
    }
}

pub struct MediaQuerySignal(MediaQueryList);

impl MediaQuerySignal {
    pub fn open(query: &str) -> Option<Self> {
        window()
            .match_media(query)
            .inspect_err(|e| tracing::warn!("matchMedia failed: {e:?}"))
            .ok()
            .flatten()
            .map(Self)
    }
}

impl ColorSchemeSignal for MediaQuerySignal {
    fn prefers_dark(&self) -> anyhow::Result<bool> { Ok(self.0.matches()) }

    fn subscribe(&self, on_change: Box<dyn Fn(bool)>) -> anyhow::Result<Subscription> {
        let listener = Closure::<dyn Fn(MediaQueryListEvent)>::new(move |ev: MediaQueryListEvent| {
            on_change(ev.matches())
        });
        self.0
            .add_event_listener_with_callback("change", listener.as_ref().unchecked_ref())
            .map_err(|e| anyhow!("{e:?}"))?;
        let list = self.0.clone();
        Ok(Subscription::new(move || {
            _ = list.remove_event_listener_with_callback("change", listener.as_ref().unchecked_ref());
        }))
    }
}
