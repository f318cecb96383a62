//! Site-wide settings consumed read-only by the presentation layer.

use serde::{Deserialize, Serialize};

pub const THEMES: &[&str] = &["blue", "white"];
pub const DEFAULT_THEME: &str = "blue";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct SiteSettings {
    pub theme_default: String,
    pub logo_path: String,
    pub hero_bg_path: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            theme_default: DEFAULT_THEME.to_string(),
            logo_path: String::new(),
            hero_bg_path: String::new(),
        }
    }
}

impl SiteSettings {
    /// Constrains the theme to a known value and trims the asset paths.
    pub fn normalized(mut self) -> Self {
        let theme = self.theme_default.trim();
        self.theme_default = if THEMES.contains(&theme) {
            theme.to_string()
        } else {
            DEFAULT_THEME.to_string()
        };
        self.logo_path = self.logo_path.trim().to_string();
        self.hero_bg_path = self.hero_bg_path.trim().to_string();
        self
    }

    /// Partial update: only supplied fields change, an unknown theme is
    /// ignored rather than rejected.
    pub fn apply(mut self, patch: SettingsPatch) -> Self {
        if let Some(theme) = patch.theme_default {
            let theme = theme.trim().to_string();
            if THEMES.contains(&theme.as_str()) {
                self.theme_default = theme;
            }
        }
        if let Some(logo) = patch.logo_path {
            self.logo_path = logo.trim().to_string();
        }
        if let Some(hero) = patch.hero_bg_path {
            self.hero_bg_path = hero.trim().to_string();
        }
        self
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct SettingsPatch {
    pub theme_default: Option<String>,
    pub logo_path: Option<String>,
    pub hero_bg_path: Option<String>,
}
