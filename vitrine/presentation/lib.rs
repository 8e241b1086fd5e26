// Paints a theme onto the document: marker classes, data-theme, theme-color.
use std::{cell::RefCell, rc::Rc, time::Duration};

use anyhow::Context;
use cfg_if::cfg_if;
use state::{Scheduler, Subscription, Theme, ThemeConfig, MARKER_CLASSES};

mod recording;

pub use recording::{DomSnapshot, NodeState, RecordingHost};

cfg_if! {
    if #[cfg(feature = "hydrate")] {
        mod web;
        pub use web::DocumentHost;
    }
}

pub const THEME_ATTRIBUTE: &str = "data-theme";
pub const THEME_COLOR_META: &str = "theme-color";
pub const TRANSITION_CLASS: &str = "theme-transitioning";

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RootNode {
    Document,
    Body,
}

pub const ROOT_NODES: [RootNode; 2] = [RootNode::Document, RootNode::Body];

/// The DOM operations the applier needs.
pub trait PresentationHost {
    fn set_class(&self, node: RootNode, class: &str, present: bool) -> anyhow::Result<()>;
    fn set_attribute(&self, node: RootNode, name: &str, value: &str) -> anyhow::Result<()>;
    /// Creates `<meta name=..>` if missing, then sets its content.
    fn upsert_meta(&self, name: &str, content: &str) -> anyhow::Result<()>;
}

pub struct Applier {
    host: Rc<dyn PresentationHost>,
    scheduler: Rc<dyn Scheduler>,
    transition: Option<Duration>,
    pending: RefCell<Option<Subscription>>,
}

impl Applier {
    pub fn new(host: Rc<dyn PresentationHost>, scheduler: Rc<dyn Scheduler>, config: &ThemeConfig) -> Self {
        Self {
            host,
            scheduler,
            transition: config.transitions_enabled.then_some(config.transition),
            pending: RefCell::new(None),
        }
    }

    /// Paints `theme`, smoothing color changes when transitions are enabled.
    pub fn apply(&self, theme: Theme) {
        _ = self
            .try_apply(theme, true)
            .inspect_err(|e| tracing::warn!("failed to apply {theme} theme: {e:#}"));
    }

    /// Paints `theme` without the transition, for the first paint.
    pub fn apply_immediately(&self, theme: Theme) {
        _ = self
            .try_apply(theme, false)
            .inspect_err(|e| tracing::warn!("failed to apply {theme} theme: {e:#}"));
    }

    pub fn try_apply(&self, theme: Theme, animate: bool) -> anyhow::Result<()> {
        for node in ROOT_NODES {
            for class in MARKER_CLASSES {
                self.host
                    .set_class(node, class, false)
                    .with_context(|| format!("removing {class} from {node:?}"))?;
            }
            self.host
                .set_class(node, theme.marker_class(), true)
                .with_context(|| format!("adding {} to {node:?}", theme.marker_class()))?;
        }
        for node in ROOT_NODES {
            self.host
                .set_attribute(node, THEME_ATTRIBUTE, theme.as_str())
                .with_context(|| format!("setting {THEME_ATTRIBUTE} on {node:?}"))?;
        }
        self.host
            .upsert_meta(THEME_COLOR_META, theme.palette().primary_color)
            .context("updating theme-color meta")?;
        if animate {
            self.start_transition();
        }
        Ok(())
    }

    fn start_transition(&self) {
        let Some(duration) = self.transition else {
            return;
        };
        if let Err(e) = self.host.set_class(RootNode::Body, TRANSITION_CLASS, true) {
            tracing::warn!("failed to start theme transition: {e:#}");
            return;
        }
        let host = self.host.clone();
        let removal = self.scheduler.schedule(
            duration,
            Box::new(move || {
                _ = host
                    .set_class(RootNode::Body, TRANSITION_CLASS, false)
                    .inspect_err(|e| tracing::warn!("failed to end theme transition: {e:#}"));
            }),
        );
        // Replacing the previous handle cancels its removal; the new one
        // covers both.
        self.pending.replace(Some(removal));
    }

    /// Drops a pending transition and clears its class now.
    pub fn cancel_transition(&self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        drop(pending);
        _ = self
            .host
            .set_class(RootNode::Body, TRANSITION_CLASS, false)
            .inspect_err(|e| tracing::warn!("failed to end theme transition: {e:#}"));
    }
}

#[cfg(test)]
mod tests {
    use state::ManualScheduler;

    use super::*;

    fn applier(config: &ThemeConfig) -> (Applier, RecordingHost, ManualScheduler) {
        let host = RecordingHost::new();
        let scheduler = ManualScheduler::new();
        (
            Applier::new(Rc::new(host.clone()), Rc::new(scheduler.clone()), config),
            host,
            scheduler,
        )
    }

    #[test]
    fn test_apply_marks_both_nodes() {
        let (a, host, _) = applier(&ThemeConfig::default());
        for theme in [Theme::Dark, Theme::Light, Theme::Dark] {
            a.apply(theme);
            for node in ROOT_NODES {
                assert_eq!(host.attribute(node, THEME_ATTRIBUTE).as_deref(), Some(theme.as_str()));
                assert!(host.has_class(node, theme.marker_class()));
                assert!(!host.has_class(node, theme.toggled().marker_class()));
            }
            assert_eq!(host.meta_contents(THEME_COLOR_META), vec![theme.palette().primary_color]);
        }
    }

    #[test]
    fn test_idempotent() {
        let (a, host, s) = applier(&ThemeConfig::default());
        a.apply_immediately(Theme::Dark);
        let once = host.snapshot();
        a.apply_immediately(Theme::Dark);
        assert_eq!(host.snapshot(), once);

        a.apply(Theme::Light);
        s.advance(Duration::from_secs(1));
        let once = host.snapshot();
        a.apply(Theme::Light);
        s.advance(Duration::from_secs(1));
        assert_eq!(host.snapshot(), once);
    }

    #[test]
    fn test_transition_class() {
        let (a, host, s) = applier(&ThemeConfig::default());
        a.apply(Theme::Dark);
        assert!(host.has_class(RootNode::Body, TRANSITION_CLASS));
        assert!(!host.has_class(RootNode::Document, TRANSITION_CLASS));
        s.advance(Duration::from_millis(299));
        assert!(host.has_class(RootNode::Body, TRANSITION_CLASS));
        s.advance(Duration::from_millis(1));
        assert!(!host.has_class(RootNode::Body, TRANSITION_CLASS));
    }

    #[test]
    fn test_rapid_applies_extend_transition() {
        let (a, host, s) = applier(&ThemeConfig::default());
        a.apply(Theme::Dark);
        s.advance(Duration::from_millis(200));
        a.apply(Theme::Light);
        assert_eq!(s.pending(), 1);
        s.advance(Duration::from_millis(200));
        assert!(host.has_class(RootNode::Body, TRANSITION_CLASS));
        s.advance(Duration::from_millis(100));
        assert!(!host.has_class(RootNode::Body, TRANSITION_CLASS));
    }

    #[test]
    fn test_cancel_transition() {
        let (a, host, s) = applier(&ThemeConfig::default());
        a.cancel_transition();
        assert_eq!(host.snapshot(), DomSnapshot::default());

        a.apply(Theme::Dark);
        a.cancel_transition();
        assert_eq!(s.pending(), 0);
        assert!(!host.has_class(RootNode::Body, TRANSITION_CLASS));
        assert!(host.has_class(RootNode::Body, Theme::Dark.marker_class()));
    }

    #[test]
    fn test_no_transition() {
        let config = ThemeConfig {
            transitions_enabled: false,
            ..Default::default()
        };
        let (a, host, s) = applier(&config);
        a.apply(Theme::Dark);
        assert!(!host.has_class(RootNode::Body, TRANSITION_CLASS));
        assert_eq!(s.pending(), 0);

        let (a, host, s) = applier(&ThemeConfig::default());
        a.apply_immediately(Theme::Dark);
        assert!(!host.has_class(RootNode::Body, TRANSITION_CLASS));
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn test_host_failure_swallowed() {
        let (a, host, _) = applier(&ThemeConfig::default());
        host.set_failing(true);
        a.apply(Theme::Dark);
        assert!(a.try_apply(Theme::Dark, false).is_err());
        host.set_failing(false);
        assert_eq!(host.attribute(RootNode::Body, THEME_ATTRIBUTE), None);
    }
}
