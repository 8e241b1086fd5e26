use anyhow::{anyhow, Context};
use leptos::tachys::dom::{document, window};
use state::Theme;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CustomEvent, CustomEventInit};

use crate::{EventSink, Telemetry, ThemeChange};

/// Dispatches a `CustomEvent` on `document` with the change as `detail`.
pub struct DocumentEventSink {
    document: web_sys::Document,
}

impl Default for DocumentEventSink {
    fn default() -> Self { Self::new() }
}

impl DocumentEventSink {
    pub fn new() -> Self { Self { document: document() } }
}

impl EventSink for DocumentEventSink {
    fn dispatch(&self, name: &str, change: &ThemeChange) -> anyhow::Result<()> {
        let json = serde_json::to_string(change).context("serializing change")?;
        let detail = js_sys::JSON::parse(&json).map_err(|e| anyhow!("{e:?}"))?;
        let init = CustomEventInit::new();
        init.set_detail(&detail);
        let event = CustomEvent::new_with_event_init_dict(name, &init).map_err(|e| anyhow!("{e:?}"))?;
        self.document
            .dispatch_event(&event)
            .map(|_| ())
            .map_err(|e| anyhow!("{e:?}"))
    }
}

/// Reports through the Google Analytics `gtag` global when the page has one.
pub struct Gtag;

impl Telemetry for Gtag {
    fn report(&self, event: &str, theme: Theme) -> anyhow::Result<()> {
        let global = js_sys::Reflect::get(&window(), &JsValue::from_str("gtag")).map_err(|e| anyhow!("{e:?}"))?;
        let Some(gtag) = global.dyn_ref::<js_sys::Function>() else {
            return Ok(());
        };
        let params = js_sys::Object::new();
        js_sys::Reflect::set(&params, &JsValue::from_str("theme"), &JsValue::from_str(theme.as_str()))
            .map_err(|e| anyhow!("{e:?}"))?;
        gtag.call3(
            &JsValue::NULL,
            &JsValue::from_str("event"),
            &JsValue::from_str(event),
            &params,
        )
        .map(|_| ())
        .map_err(|e| anyhow!("{e:?}"))
    }
}
