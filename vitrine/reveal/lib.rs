// One-shot "run when first visible" registrations for page sections.
use std::{
    cell::{Cell, RefCell},
    rc::{Rc, Weak},
    time::Duration,
};

use cfg_if::cfg_if;
use state::{Scheduler, Subscription};

mod manual;

pub use manual::ManualBackend;

cfg_if! {
    if #[cfg(feature = "hydrate")] {
        mod web;
        pub use web::{reveal_children, IntersectionBackend};
    }
}

pub const REVEALED_CLASS: &str = "is-revealed";

#[derive(Debug, Clone, PartialEq)]
pub struct RevealOptions {
    /// Visible fraction, 0.0 to 1.0, that counts as revealed.
    pub threshold: f64,
    pub root_margin: String,
    /// Delay before firing when there is no visibility primitive.
    pub fallback_delay: Duration,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: "0px 0px -50px 0px".to_string(),
            fallback_delay: Duration::from_millis(100),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visibility {
    pub intersecting: bool,
    pub ratio: f64,
}

impl Visibility {
    pub fn visible(ratio: f64) -> Self {
        Self {
            intersecting: true,
            ratio,
        }
    }

    pub fn hidden() -> Self {
        Self {
            intersecting: false,
            ratio: 0.0,
        }
    }

    pub fn crosses(&self, threshold: f64) -> bool { self.intersecting && self.ratio >= threshold }
}

/// A visibility-detection primitive such as `IntersectionObserver`.
pub trait VisibilityBackend {
    type Target;

    fn observe(
        &self,
        target: &Self::Target,
        options: &RevealOptions,
        on_change: Box<dyn Fn(Visibility)>,
    ) -> anyhow::Result<Subscription>;
}

struct Latch {
    fired: Cell<bool>,
    on_reveal: RefCell<Option<Box<dyn FnOnce()>>>,
    source: RefCell<Option<Subscription>>,
}

impl Latch {
    fn fire(&self) {
        // Set before anything else runs so a queued crossing can't re-enter.
        if self.fired.replace(true) {
            return;
        }
        let source = self.source.borrow_mut().take();
        drop(source);
        let on_reveal = self.on_reveal.borrow_mut().take();
        if let Some(on_reveal) = on_reveal {
            on_reveal();
        }
    }
}

/// Owns a watch. Dropping it before the target is revealed cancels the watch.
#[must_use = "dropping a RevealHandle cancels the watch"]
pub struct RevealHandle {
    latch: Rc<Latch>,
}

impl RevealHandle {
    pub fn is_revealed(&self) -> bool { self.latch.fired.get() }

    pub fn cancel(self) {}
}

impl Drop for RevealHandle {
    fn drop(&mut self) {
        let source = self.latch.source.borrow_mut().take();
        let on_reveal = self.latch.on_reveal.borrow_mut().take();
        drop(source);
        drop(on_reveal);
    }
}

pub struct Animator<B: VisibilityBackend> {
    backend: Option<B>,
    scheduler: Rc<dyn Scheduler>,
    options: RevealOptions,
}

impl<B: VisibilityBackend> Animator<B> {
    /// `backend` is `None` when the runtime has no visibility primitive; every
    /// watch then fires on a timer instead.
    pub fn new(backend: Option<B>, scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            backend,
            scheduler,
            options: RevealOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RevealOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &RevealOptions { &self.options }

    pub fn has_observer(&self) -> bool { self.backend.is_some() }

    pub fn watch(&self, target: &B::Target, on_reveal: impl FnOnce() + 'static) -> RevealHandle {
        self.watch_with(target, on_reveal, &self.options)
    }

    /// Runs `on_reveal` once, the first time `target` crosses
    /// `options.threshold`, and stops observing it.
    pub fn watch_with(
        &self,
        target: &B::Target,
        on_reveal: impl FnOnce() + 'static,
        options: &RevealOptions,
    ) -> RevealHandle {
        let latch = Rc::new(Latch {
            fired: Cell::new(false),
            on_reveal: RefCell::new(Some(Box::new(on_reveal))),
            source: RefCell::new(None),
        });
        let observed = self.backend.as_ref().and_then(|backend| {
            let weak = Rc::downgrade(&latch);
            let threshold = options.threshold;
            backend
                .observe(
                    target,
                    options,
                    Box::new(move |v| {
                        if v.crosses(threshold) {
                            if let Some(latch) = weak.upgrade() {
                                latch.fire();
                            }
                        }
                    }),
                )
                .inspect_err(|e| tracing::warn!("visibility observer failed, using timer: {e:#}"))
                .ok()
        });
        let source = observed.unwrap_or_else(|| self.fallback(Rc::downgrade(&latch), options.fallback_delay));
        if !latch.fired.get() {
            latch.source.replace(Some(source));
        }
        RevealHandle { latch }
    }

    fn fallback(&self, latch: Weak<Latch>, delay: Duration) -> Subscription {
        self.scheduler.schedule(
            delay,
            Box::new(move || {
                if let Some(latch) = latch.upgrade() {
                    latch.fire();
                }
            }),
        )
    }
}

/// Fixed per-child delay offsets for staggered entrances.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Stagger {
    pub initial: Duration,
    pub step: Duration,
}

impl Default for Stagger {
    fn default() -> Self {
        Self {
            initial: Duration::ZERO,
            step: Duration::from_millis(100),
        }
    }
}

impl Stagger {
    pub fn new(step: Duration) -> Self {
        Self {
            step,
            ..Default::default()
        }
    }

    pub fn delay_for(&self, index: usize) -> Duration {
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        self.initial.saturating_add(self.step.saturating_mul(index))
    }
}

#[cfg(test)]
mod tests {
    use state::ManualScheduler;

    use super::*;

    fn counter() -> (Rc<Cell<u32>>, impl FnOnce() + 'static) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        (count, move || c.set(c.get() + 1))
    }

    fn animator(backend: Option<ManualBackend>) -> (Animator<ManualBackend>, ManualScheduler) {
        let scheduler = ManualScheduler::new();
        (Animator::new(backend, Rc::new(scheduler.clone())), scheduler)
    }

    #[test]
    fn test_fires_once() {
        let backend = ManualBackend::new();
        let (a, _) = animator(Some(backend.clone()));
        let (count, cb) = counter();
        let handle = a.watch(&"hero".to_string(), cb);
        assert_eq!(backend.observed("hero"), 1);

        backend.set_visibility("hero", Visibility::visible(0.5));
        backend.set_visibility("hero", Visibility::hidden());
        backend.set_visibility("hero", Visibility::visible(0.5));
        assert_eq!(count.get(), 1);
        assert!(handle.is_revealed());
        assert_eq!(backend.observed("hero"), 0);
    }

    #[test]
    fn test_threshold() {
        let backend = ManualBackend::new();
        let (a, _) = animator(Some(backend.clone()));
        let (count, cb) = counter();
        let options = RevealOptions {
            threshold: 0.5,
            ..Default::default()
        };
        let _h = a.watch_with(&"stats".to_string(), cb, &options);
        backend.set_visibility("stats", Visibility::visible(0.2));
        backend.set_visibility("stats", Visibility {
            intersecting: false,
            ratio: 0.9,
        });
        assert_eq!(count.get(), 0);
        backend.set_visibility("stats", Visibility::visible(0.5));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_independent_targets() {
        let backend = ManualBackend::new();
        let (a, _) = animator(Some(backend.clone()));
        let (hero, cb1) = counter();
        let (cta, cb2) = counter();
        let _h1 = a.watch(&"hero".to_string(), cb1);
        let _h2 = a.watch(&"cta".to_string(), cb2);
        backend.set_visibility("hero", Visibility::visible(1.0));
        assert_eq!((hero.get(), cta.get()), (1, 0));
        backend.set_visibility("cta", Visibility::visible(1.0));
        assert_eq!((hero.get(), cta.get()), (1, 1));
    }

    #[test]
    fn test_fallback_without_observer() {
        let (a, scheduler) = animator(None);
        assert!(!a.has_observer());
        let (count, cb) = counter();
        let handle = a.watch(&"hero".to_string(), cb);
        scheduler.advance(Duration::from_millis(99));
        assert_eq!(count.get(), 0);
        scheduler.advance(Duration::from_millis(1));
        assert_eq!(count.get(), 1);
        assert!(handle.is_revealed());
        scheduler.advance(Duration::from_secs(10));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_fallback_when_observe_fails() {
        let backend = ManualBackend::new();
        backend.set_failing(true);
        let (a, scheduler) = animator(Some(backend.clone()));
        let (count, cb) = counter();
        let _h = a.watch(&"hero".to_string(), cb);
        assert_eq!(backend.observed("hero"), 0);
        scheduler.advance(a.options().fallback_delay);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_drop_cancels() {
        let backend = ManualBackend::new();
        let (a, _) = animator(Some(backend.clone()));
        let (count, cb) = counter();
        let handle = a.watch(&"hero".to_string(), cb);
        drop(handle);
        assert_eq!(backend.observed("hero"), 0);
        backend.set_visibility("hero", Visibility::visible(1.0));
        assert_eq!(count.get(), 0);

        let (a, scheduler) = animator(None);
        let (count, cb) = counter();
        a.watch(&"hero".to_string(), cb).cancel();
        scheduler.advance(Duration::from_secs(1));
        assert_eq!(count.get(), 0);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_reentrant_crossing() {
        // A crossing delivered from inside on_reveal must not fire again.
        let backend = ManualBackend::new();
        let (a, _) = animator(Some(backend.clone()));
        let count = Rc::new(Cell::new(0));
        let (c, b) = (count.clone(), backend.clone());
        let _h = a.watch(&"hero".to_string(), move || {
            c.set(c.get() + 1);
            b.set_visibility("hero", Visibility::visible(1.0));
        });
        backend.set_visibility("hero", Visibility::visible(1.0));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_already_visible_at_observe() {
        let backend = ManualBackend::new();
        backend.set_initial("hero", Visibility::visible(1.0));
        let (a, _) = animator(Some(backend.clone()));
        let (count, cb) = counter();
        let handle = a.watch(&"hero".to_string(), cb);
        assert_eq!(count.get(), 1);
        assert!(handle.is_revealed());
        assert_eq!(backend.observed("hero"), 0);
    }

    #[test]
    fn test_stagger() {
        let s = Stagger::new(Duration::from_millis(150));
        assert_eq!(s.delay_for(0), Duration::ZERO);
        assert_eq!(s.delay_for(3), Duration::from_millis(450));
        let s = Stagger {
            initial: Duration::from_millis(200),
            step: Duration::from_millis(100),
        };
        assert_eq!(s.delay_for(0), Duration::from_millis(200));
        assert_eq!(s.delay_for(2), Duration::from_millis(400));
    }
}
