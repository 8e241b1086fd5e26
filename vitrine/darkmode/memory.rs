use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::{Rc, Weak},
};

use state::Subscription;

use crate::{ColorSchemeSignal, KeyValueStore};

/// In-process storage for server rendering and tests. Clones share contents.
#[derive(Default, Clone)]
pub struct MemoryStore {
    values: Rc<RefCell<HashMap<String, String>>>,
    failing: Rc<Cell<bool>>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    pub fn with(self, key: &str, value: &str) -> Self {
        self.values.borrow_mut().insert(key.into(), value.into());
        self
    }

    /// Makes every read and write fail, like a disabled `localStorage`.
    pub fn set_failing(&self, failing: bool) { self.failing.set(failing); }

    pub fn value(&self, key: &str) -> Option<String> { self.values.borrow().get(key).cloned() }

    fn check(&self) -> anyhow::Result<()> {
        if self.failing.get() {
            anyhow::bail!("storage disabled");
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        self.check()?;
        Ok(self.value(key))
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.check()?;
        self.values.borrow_mut().insert(key.into(), value.into());
        Ok(())
    }
}

type Listeners = RefCell<Vec<(u64, Rc<dyn Fn(bool)>)>>;

#[derive(Default)]
struct SignalInner {
    // None means the signal can't be queried.
    value: Cell<Option<bool>>,
    next_id: Cell<u64>,
    listeners: Listeners,
}

/// Color scheme signal whose value is set by hand.
#[derive(Default, Clone)]
pub struct FixedSignal {
    inner: Rc<SignalInner>,
}

impl FixedSignal {
    pub fn new(dark: bool) -> Self {
        let s = Self::default();
        s.inner.value.set(Some(dark));
        s
    }

    pub fn unavailable() -> Self { Self::default() }

    /// Changes the value and notifies subscribers if it is known.
    pub fn set(&self, dark: Option<bool>) {
        self.inner.value.set(dark);
        let Some(dark) = dark else {
            return;
        };
        let listeners: Vec<_> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for l in listeners {
            l(dark);
        }
    }

    pub fn listener_count(&self) -> usize { self.inner.listeners.borrow().len() }
}

impl ColorSchemeSignal for FixedSignal {
    fn prefers_dark(&self) -> anyhow::Result<bool> {
        self.inner
            .value
            .get()
            .ok_or_else(|| anyhow::anyhow!("matchMedia unavailable"))
    }

    fn subscribe(&self, on_change: Box<dyn Fn(bool)>) -> anyhow::Result<Subscription> {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::from(on_change)));
        let inner: Weak<SignalInner> = Rc::downgrade(&self.inner);
        Ok(Subscription::new(move || {
            if let Some(inner) = inner.upgrade() {
                inner.listeners.borrow_mut().retain(|(i, _)| *i != id);
            }
        }))
    }
}
