//! Theme configuration

use serde::{Deserialize, Serialize};

/// A selectable UI theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    /// Lowercase identifier used in class names and storage (`corporate-blue`)
    pub id: String,
    /// Display name shown in the theme selector
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub enabled: bool,
}

/// Default theme, switcher toggle, and the list of theme definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    pub default_theme: String,
    pub enable_theme_switcher: bool,
    pub themes: Vec<Theme>,
}

impl ThemeConfig {
    /// Enabled themes in configured order.
    pub fn available_themes(&self) -> impl Iterator<Item = &Theme> {
        self.themes.iter().filter(|t| t.enabled)
    }

    pub fn find(&self, id: &str) -> Option<&Theme> {
        self.themes.iter().find(|t| t.id == id)
    }

    /// The default theme definition. Always present on a validated config.
    pub fn default_theme(&self) -> Option<&Theme> {
        self.find(&self.default_theme)
    }

    /// Theme to apply for a user's stored choice.
    ///
    /// The request is honored only when the switcher is on and the requested
    /// theme is enabled; otherwise the default theme id is returned.
    pub fn resolve<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        match requested {
            Some(id)
                if self.enable_theme_switcher
                    && self.find(id).map(|t| t.enabled).unwrap_or(false) =>
            {
                id
            }
            _ => &self.default_theme,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theme(id: &str, enabled: bool) -> Theme {
        Theme {
            id: id.to_string(),
            name: id.to_uppercase(),
            description: None,
            enabled,
        }
    }

    fn config(switcher: bool) -> ThemeConfig {
        ThemeConfig {
            default_theme: "light".to_string(),
            enable_theme_switcher: switcher,
            themes: vec![theme("light", true), theme("dark", true), theme("retro", false)],
        }
    }

    #[test]
    fn test_available_themes_skips_disabled() {
        let themes = config(true);
        let ids: Vec<&str> = themes
            .available_themes()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["light", "dark"]);
    }

    #[test]
    fn test_resolve() {
        let themes = config(true);
        assert_eq!(themes.resolve(Some("dark")), "dark");
        assert_eq!(themes.resolve(Some("retro")), "light");
        assert_eq!(themes.resolve(Some("missing")), "light");
        assert_eq!(themes.resolve(None), "light");

        let locked = config(false);
        assert_eq!(locked.resolve(Some("dark")), "light");
    }

    #[test]
    fn test_default_theme_lookup() {
        let themes = config(true);
        assert_eq!(themes.default_theme().map(|t| t.name.as_str()), Some("LIGHT"));
    }
}
