use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::{Rc, Weak},
};

use state::Subscription;

use crate::{RevealOptions, Visibility, VisibilityBackend};

type Observation = (u64, String, Rc<dyn Fn(Visibility)>);

#[derive(Default)]
struct Inner {
    next_id: Cell<u64>,
    observations: RefCell<Vec<Observation>>,
    initial: RefCell<HashMap<String, Visibility>>,
    failing: Cell<bool>,
}

/// Visibility backend driven by hand. Targets are element ids.
#[derive(Default, Clone)]
pub struct ManualBackend {
    inner: Rc<Inner>,
}

impl ManualBackend {
    pub fn new() -> Self { Self::default() }

    /// Visibility reported immediately when `target` starts being observed,
    /// like the first `IntersectionObserver` callback.
    pub fn set_initial(&self, target: &str, v: Visibility) {
        self.inner.initial.borrow_mut().insert(target.to_string(), v);
    }

    pub fn set_visibility(&self, target: &str, v: Visibility) {
        let callbacks: Vec<_> = self
            .inner
            .observations
            .borrow()
            .iter()
            .filter(|(_, t, _)| t == target)
            .map(|(_, _, cb)| cb.clone())
            .collect();
        for cb in callbacks {
            cb(v);
        }
    }

    pub fn observed(&self, target: &str) -> usize {
        self.inner
            .observations
            .borrow()
            .iter()
            .filter(|(_, t, _)| t == target)
            .count()
    }

    pub fn set_failing(&self, failing: bool) { self.inner.failing.set(failing); }
}

impl VisibilityBackend for ManualBackend {
    type Target = String;

    fn observe(
        &self,
        target: &String,
        _options: &RevealOptions,
        on_change: Box<dyn Fn(Visibility)>,
    ) -> anyhow::Result<Subscription> {
        if self.inner.failing.get() {
            anyhow::bail!("IntersectionObserver constructor threw");
        }
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        let on_change: Rc<dyn Fn(Visibility)> = Rc::from(on_change);
        self.inner
            .observations
            .borrow_mut()
            .push((id, target.clone(), on_change.clone()));
        let initial = self.inner.initial.borrow().get(target).copied();
        if let Some(v) = initial {
            on_change(v);
        }
        let inner: Weak<Inner> = Rc::downgrade(&self.inner);
        Ok(Subscription::new(move || {
            if let Some(inner) = inner.upgrade() {
                let removed = {
                    let mut observations = inner.observations.borrow_mut();
                    observations
                        .iter()
                        .position(|(i, _, _)| *i == id)
                        .map(|pos| observations.remove(pos))
                };
                drop(removed);
            }
        }))
    }
}
