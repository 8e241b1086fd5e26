use std::{
    cell::RefCell,
    collections::BTreeMap,
    rc::{Rc, Weak},
    time::Duration,
};

use cfg_if::cfg_if;

use crate::Subscription;

pub trait Scheduler {
    /// Runs `task` once after `delay`. Dropping the returned handle before the
    /// deadline cancels the task.
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Subscription;
}

impl<S: Scheduler + ?Sized> Scheduler for Rc<S> {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Subscription {
        (**self).schedule(delay, task)
    }
}

pub trait Clock {
    /// Milliseconds since the unix epoch.
    fn now_ms(&self) -> f64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        cfg_if! {
            // std::time is not available in browsers
            if #[cfg(target_arch = "wasm32")] {
                js_sys::Date::now()
            } else {
                std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_secs_f64() * 1000.0)
                    .unwrap_or_default()
            }
        }
    }
}

type TaskKey = (Duration, u64);

#[derive(Default)]
struct Queue {
    now: Duration,
    next_id: u64,
    tasks: BTreeMap<TaskKey, Box<dyn FnOnce()>>,
}

/// Scheduler driven by virtual time. Nothing runs until [`advance`] is called.
///
/// [`advance`]: ManualScheduler::advance
#[derive(Default, Clone)]
pub struct ManualScheduler {
    queue: Rc<RefCell<Queue>>,
}

impl ManualScheduler {
    pub fn new() -> Self { Self::default() }

    pub fn now(&self) -> Duration { self.queue.borrow().now }

    pub fn pending(&self) -> usize { self.queue.borrow().tasks.len() }

    /// Moves time forward, running due tasks in deadline order. Tasks
    /// scheduled while advancing run too if they fall inside the window.
    pub fn advance(&self, by: Duration) {
        let target = self.now() + by;
        loop {
            let next = {
                let mut q = self.queue.borrow_mut();
                let due = q.tasks.first_key_value().is_some_and(|(key, _)| key.0 <= target);
                if due {
                    q.tasks.pop_first().map(|((deadline, _), task)| {
                        q.now = deadline;
                        task
                    })
                } else {
                    None
                }
            };
            match next {
                Some(task) => task(),
                None => break,
            }
        }
        self.queue.borrow_mut().now = target;
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Subscription {
        let key = {
            let mut q = self.queue.borrow_mut();
            q.next_id += 1;
            let key = (q.now + delay, q.next_id);
            q.tasks.insert(key, task);
            key
        };
        let queue: Weak<RefCell<Queue>> = Rc::downgrade(&self.queue);
        Subscription::new(move || {
            if let Some(queue) = queue.upgrade() {
                let removed = queue.borrow_mut().tasks.remove(&key);
                drop(removed);
            }
        })
    }
}

cfg_if! {
    if #[cfg(feature = "hydrate")] {
        use leptos::leptos_dom::helpers::set_timeout_with_handle;

        /// `setTimeout` backed scheduler.
        #[derive(Debug, Default, Clone, Copy)]
        pub struct TimeoutScheduler;

        impl Scheduler for TimeoutScheduler {
            fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Subscription {
                match set_timeout_with_handle(task, delay) {
                    Ok(handle) => Subscription::new(move || handle.clear()),
                    Err(e) => {
                        tracing::warn!("failed to schedule timeout: {e:?}");
                        Subscription::noop()
                    },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc, time::Duration};

    use super::*;

    fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Box<dyn FnOnce()>) {
        let log = Rc::new(RefCell::new(vec![]));
        let l = log.clone();
        (log, move |name| {
            let l = l.clone();
            Box::new(move || l.borrow_mut().push(name)) as Box<dyn FnOnce()>
        })
    }

    #[test]
    fn test_runs_in_deadline_order() {
        let s = ManualScheduler::new();
        let (log, task) = recorder();
        let _b = s.schedule(Duration::from_millis(20), task("b"));
        let _a = s.schedule(Duration::from_millis(10), task("a"));
        let _c = s.schedule(Duration::from_millis(30), task("c"));
        s.advance(Duration::from_millis(25));
        assert_eq!(*log.borrow(), vec!["a", "b"]);
        assert_eq!(s.pending(), 1);
        s.advance(Duration::from_millis(5));
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
        assert_eq!(s.now(), Duration::from_millis(30));
    }

    #[test]
    fn test_drop_cancels() {
        let s = ManualScheduler::new();
        let (log, task) = recorder();
        let sub = s.schedule(Duration::from_millis(10), task("a"));
        drop(sub);
        s.advance(Duration::from_secs(1));
        assert!(log.borrow().is_empty());
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn test_nested_schedule() {
        let s = ManualScheduler::new();
        let log = Rc::new(RefCell::new(vec![]));
        let inner_sub = Rc::new(RefCell::new(None));
        let (s2, l2, keep) = (s.clone(), log.clone(), inner_sub.clone());
        let _outer = s.schedule(
            Duration::from_millis(10),
            Box::new(move || {
                let l3 = l2.clone();
                *keep.borrow_mut() = Some(s2.schedule(
                    Duration::from_millis(5),
                    Box::new(move || l3.borrow_mut().push(15)),
                ));
                l2.borrow_mut().push(10);
            }),
        );
        s.advance(Duration::from_millis(20));
        assert_eq!(*log.borrow(), vec![10, 15]);
    }

    #[test]
    fn test_system_clock() { assert!(SystemClock.now_ms() > 0.0); }
}
