// Notifies interested parties that the theme changed.
use std::{
    cell::{Cell, RefCell},
    rc::{Rc, Weak},
};

use cfg_if::cfg_if;
use serde::*;
use state::{Clock, Subscription, Theme, ThemeConfig};

mod recording;

pub use recording::{RecordingSink, RecordingTelemetry};

cfg_if! {
    if #[cfg(feature = "hydrate")] {
        mod web;
        pub use web::{DocumentEventSink, Gtag};
    }
}

pub const TELEMETRY_EVENT: &str = "theme_change";

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ChangeSource {
    /// The visitor used the toggle.
    User,
    /// The OS color scheme changed while no explicit choice was stored.
    System,
}

/// Payload of the document-level event. `source` stays in-process.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct ThemeChange {
    pub theme: Theme,
    pub timestamp: f64,
    #[serde(skip)]
    pub source: ChangeSource,
}

pub trait EventSink {
    fn dispatch(&self, name: &str, change: &ThemeChange) -> anyhow::Result<()>;
}

/// Fire-and-forget analytics. Absent backends are not an error.
pub trait Telemetry {
    fn report(&self, event: &str, theme: Theme) -> anyhow::Result<()>;
}

type Listener = Rc<dyn Fn(&ThemeChange)>;

#[derive(Default)]
struct Listeners {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(u64, Listener)>>,
}

pub struct ThemeBus {
    event_name: String,
    clock: Rc<dyn Clock>,
    listeners: Rc<Listeners>,
    sinks: Vec<Box<dyn EventSink>>,
    telemetry: Option<Box<dyn Telemetry>>,
}

impl ThemeBus {
    pub fn new(config: &ThemeConfig, clock: Rc<dyn Clock>) -> Self {
        Self {
            event_name: config.event_name.clone(),
            clock,
            listeners: Rc::default(),
            sinks: vec![],
            telemetry: None,
        }
    }

    /// Bus dispatching `themeChanged` on `document` and reporting to `gtag`.
    #[cfg(feature = "hydrate")]
    pub fn browser(config: &ThemeConfig) -> Self {
        Self::new(config, Rc::new(state::SystemClock))
            .with_sink(DocumentEventSink::new())
            .with_telemetry(Gtag)
    }

    pub fn with_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn with_telemetry(mut self, telemetry: impl Telemetry + 'static) -> Self {
        self.telemetry = Some(Box::new(telemetry));
        self
    }

    pub fn event_name(&self) -> &str { &self.event_name }

    pub fn subscribe(&self, listener: impl Fn(&ThemeChange) + 'static) -> Subscription {
        let id = self.listeners.next_id.get();
        self.listeners.next_id.set(id + 1);
        self.listeners
            .entries
            .borrow_mut()
            .push((id, Rc::new(listener)));
        let listeners: Weak<Listeners> = Rc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(listeners) = listeners.upgrade() {
                let removed = {
                    let mut entries = listeners.entries.borrow_mut();
                    entries
                        .iter()
                        .position(|(i, _)| *i == id)
                        .map(|pos| entries.remove(pos))
                };
                drop(removed);
            }
        })
    }

    pub fn listener_count(&self) -> usize { self.listeners.entries.borrow().len() }

    /// Delivers the change to subscribers, then for user changes to sinks
    /// and telemetry. Synchronous; nothing is acknowledged.
    pub fn broadcast(&self, theme: Theme, source: ChangeSource) -> ThemeChange {
        let change = ThemeChange {
            theme,
            timestamp: self.clock.now_ms(),
            source,
        };
        let listeners: Vec<Listener> = self
            .listeners
            .entries
            .borrow()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in listeners {
            listener(&change);
        }
        if source != ChangeSource::User {
            return change;
        }
        for sink in &self.sinks {
            _ = sink
                .dispatch(&self.event_name, &change)
                .inspect_err(|e| tracing::warn!("failed to dispatch {}: {e:#}", self.event_name));
        }
        if let Some(telemetry) = &self.telemetry {
            _ = telemetry
                .report(TELEMETRY_EVENT, theme)
                .inspect_err(|e| tracing::debug!("telemetry failed: {e:#}"));
        }
        change
    }
}
