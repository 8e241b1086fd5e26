use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use state::Theme;

use crate::{EventSink, Telemetry, ThemeChange};

/// Keeps every dispatched event as `(name, json detail)`.
#[derive(Default, Clone)]
pub struct RecordingSink {
    events: Rc<RefCell<Vec<(String, String)>>>,
    failing: Rc<Cell<bool>>,
}

impl RecordingSink {
    pub fn new() -> Self { Self::default() }

    pub fn events(&self) -> Vec<(String, String)> { self.events.borrow().clone() }

    pub fn set_failing(&self, failing: bool) { self.failing.set(failing); }
}

impl EventSink for RecordingSink {
    fn dispatch(&self, name: &str, change: &ThemeChange) -> anyhow::Result<()> {
        if self.failing.get() {
            anyhow::bail!("dispatch failed");
        }
        let detail = serde_json::to_string(change)?;
        self.events.borrow_mut().push((name.to_string(), detail));
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct RecordingTelemetry {
    reports: Rc<RefCell<Vec<(String, Theme)>>>,
    failing: Rc<Cell<bool>>,
}

impl RecordingTelemetry {
    pub fn new() -> Self { Self::default() }

    pub fn reports(&self) -> Vec<(String, Theme)> { self.reports.borrow().clone() }

    pub fn set_failing(&self, failing: bool) { self.failing.set(failing); }
}

impl Telemetry for RecordingTelemetry {
    fn report(&self, event: &str, theme: Theme) -> anyhow::Result<()> {
        if self.failing.get() {
            anyhow::bail!("analytics unavailable");
        }
        self.reports.borrow_mut().push((event.to_string(), theme));
        Ok(())
    }
}
