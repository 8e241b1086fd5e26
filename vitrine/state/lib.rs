// Shared types used across the theme, presentation and reveal crates
use std::{str::FromStr, time::Duration};

use serde::*;

mod scheduler;
mod subscription;

pub use scheduler::{Clock, ManualScheduler, Scheduler, SystemClock};
#[cfg(feature = "hydrate")]
pub use scheduler::TimeoutScheduler;
pub use subscription::Subscription;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Hash, Eq, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(anyhow::anyhow!("invalid theme: {s:?}")),
        }
    }
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn from_dark(is_dark: bool) -> Self {
        if is_dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn is_dark(self) -> bool { self == Theme::Dark }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Class placed on the root nodes so stylesheets can key on the theme.
    pub fn marker_class(self) -> &'static str {
        match self {
            Theme::Light => "light-theme",
            Theme::Dark => "dark-theme",
        }
    }

    pub fn palette(self) -> &'static Palette {
        match self {
            Theme::Light => &LIGHT_PALETTE,
            Theme::Dark => &DARK_PALETTE,
        }
    }
}

/// Every marker class, used to clear the previous theme before applying the
/// next one.
pub const MARKER_CLASSES: [&str; 2] = ["light-theme", "dark-theme"];

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Palette {
    pub primary_color: &'static str,
    pub text_color: &'static str,
    pub navbar_background: &'static str,
    pub navbar_background_scrolled: &'static str,
    pub hover_tint: &'static str,
}

pub static LIGHT_PALETTE: Palette = Palette {
    primary_color: "#0071e3",
    text_color: "#1d1d1f",
    navbar_background: "rgba(255, 255, 255, 0.8)",
    navbar_background_scrolled: "rgba(255, 255, 255, 0.95)",
    hover_tint: "rgba(0, 0, 0, 0.05)",
};

pub static DARK_PALETTE: Palette = Palette {
    primary_color: "#2997ff",
    text_color: "#f5f5f7",
    navbar_background: "rgba(0, 0, 0, 0.8)",
    navbar_background_scrolled: "rgba(0, 0, 0, 0.95)",
    hover_tint: "rgba(255, 255, 255, 0.1)",
};

/// Knobs shared by the store, the applier, the bus and the controller.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
#[serde(default)]
pub struct ThemeConfig {
    pub storage_key: String,
    #[serde(with = "millis")]
    pub transition: Duration,
    pub transitions_enabled: bool,
    pub event_name: String,
    pub nav_container: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: "vitrine-theme".to_string(),
            transition: Duration::from_millis(300),
            transitions_enabled: true,
            event_name: "themeChanged".to_string(),
            nav_container: "#nav-actions".to_string(),
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("light".parse::<Theme>().unwrap(), Theme::Light);
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("Dark".parse::<Theme>().is_err());
        assert!("".parse::<Theme>().is_err());
        assert!("blue".parse::<Theme>().is_err());
    }

    #[test]
    fn test_toggle() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled().toggled(), Theme::Light);
        assert_eq!(Theme::from_dark(true), Theme::Dark);
        assert_eq!(Theme::from_dark(false), Theme::Light);
        assert_eq!(Theme::default(), Theme::Light);
    }

    #[test]
    fn test_palette() {
        assert_eq!(Theme::Dark.palette().primary_color, "#2997ff");
        assert_eq!(Theme::Light.palette().primary_color, "#0071e3");
        assert_ne!(Theme::Light.palette(), Theme::Dark.palette());
        assert!(MARKER_CLASSES.contains(&Theme::Light.marker_class()));
        assert!(MARKER_CLASSES.contains(&Theme::Dark.marker_class()));
    }

    #[test]
    fn test_config() {
        let c: ThemeConfig = serde_json::from_str(r#"{"transition": 150}"#).unwrap();
        assert_eq!(c.transition, Duration::from_millis(150));
        assert_eq!(c.storage_key, "vitrine-theme");
        assert!(c.transitions_enabled);
        assert_eq!(
            serde_json::to_string(&Theme::Dark).unwrap(),
            r#""dark""#
        );
    }
}
