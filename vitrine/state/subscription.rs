/// Handle returned by every registration (listeners, observers, timers).
///
/// Dropping the handle cancels the registration. Call [`Subscription::detach`]
/// to keep it alive for the rest of the page.
#[must_use = "dropping a Subscription cancels it"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn noop() -> Self { Self { cancel: None } }

    pub fn cancel(mut self) { self.run(); }

    pub fn detach(mut self) { self.cancel = None; }

    fn run(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) { self.run(); }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::Subscription;

    #[test]
    fn test_drop_cancels_once() {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let sub = Subscription::new(move || c.set(c.get() + 1));
        drop(sub);
        assert_eq!(count.get(), 1);

        let c = count.clone();
        Subscription::new(move || c.set(c.get() + 1)).cancel();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_detach() {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        Subscription::new(move || c.set(c.get() + 1)).detach();
        assert_eq!(count.get(), 0);
        drop(Subscription::noop());
    }
}
