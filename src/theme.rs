//! Light/dark theme, injected into the sphere as a context value.

use yew::prelude::*;

const THEME_KEY: &str = "theme";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn is_dark(self) -> bool {
        matches!(self, Theme::Dark)
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Light => Palette {
                selected_stroke: "rgba(59, 130, 246, 0.9)",
                glow: "rgba(59, 130, 246, 0.5)",
                stroke_rgb: (59, 130, 246),
                stroke_alpha: 0.7,
                dot_rgb: (96, 165, 250),
                dot_alpha: 0.8,
                selected_dot: "rgba(255, 255, 255, 0.95)",
                particle: "rgba(255, 255, 255, 0.95)",
            },
            Theme::Dark => Palette {
                selected_stroke: "rgba(96, 165, 250, 0.95)",
                glow: "rgba(147, 197, 253, 0.6)",
                stroke_rgb: (147, 197, 253),
                stroke_alpha: 0.8,
                dot_rgb: (147, 197, 253),
                dot_alpha: 0.9,
                selected_dot: "rgba(219, 234, 254, 0.95)",
                particle: "rgba(191, 219, 254, 0.95)",
            },
        }
    }
}

/// Canvas colors for one theme. Depth-faded colors keep their RGB and get
/// `alpha * opacity` at draw time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub selected_stroke: &'static str,
    pub glow: &'static str,
    pub stroke_rgb: (u8, u8, u8),
    pub stroke_alpha: f64,
    pub dot_rgb: (u8, u8, u8),
    pub dot_alpha: f64,
    pub selected_dot: &'static str,
    pub particle: &'static str,
}

#[derive(Clone, PartialEq)]
pub struct ThemeContext {
    pub theme: Theme,
    pub toggle: Callback<()>,
}

/// Saved preference, else the system color scheme.
pub fn initial_theme() -> Theme {
    let Some(win) = web_sys::window() else {
        return Theme::default();
    };
    if let Ok(Some(store)) = win.local_storage() {
        if let Ok(Some(saved)) = store.get_item(THEME_KEY) {
            if let Some(theme) = Theme::parse(&saved) {
                return theme;
            }
        }
    }
    match win.match_media("(prefers-color-scheme: dark)") {
        Ok(Some(mq)) if mq.matches() => Theme::Dark,
        _ => Theme::Light,
    }
}

pub fn persist_theme(theme: Theme) {
    if let Some(win) = web_sys::window() {
        if let Ok(Some(store)) = win.local_storage() {
            let _ = store.set_item(THEME_KEY, theme.as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_names_round_trip() {
        assert_eq!(Theme::parse(Theme::Dark.as_str()), Some(Theme::Dark));
        assert_eq!(Theme::parse("sepia"), None);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
    }

    #[test]
    fn palettes_differ_per_theme() {
        assert_ne!(Theme::Light.palette(), Theme::Dark.palette());
    }
}
