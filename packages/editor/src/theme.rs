//! # Editor Themes
//!
//! Named palettes for the external editor widget. The core only stores
//! which theme is selected; the palette tables are handed to the widget
//! as data (see [`ThemePalette::to_widget_json`]).

use crate::EditorError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::str::FromStr;

/// Selectable editor theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EditorTheme {
    #[default]
    #[serde(rename = "vs-dark")]
    VsDark,
    #[serde(rename = "vs")]
    Light,
    #[serde(rename = "hc-black")]
    HighContrast,
    #[serde(rename = "dracula")]
    Dracula,
}

impl EditorTheme {
    pub const ALL: [EditorTheme; 4] = [
        EditorTheme::VsDark,
        EditorTheme::Light,
        EditorTheme::HighContrast,
        EditorTheme::Dracula,
    ];

    /// Persisted identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            EditorTheme::VsDark => "vs-dark",
            EditorTheme::Light => "vs",
            EditorTheme::HighContrast => "hc-black",
            EditorTheme::Dracula => "dracula",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            EditorTheme::VsDark => "Dark",
            EditorTheme::Light => "Light",
            EditorTheme::HighContrast => "High Contrast",
            EditorTheme::Dracula => "Dracula",
        }
    }

    pub fn is_dark(&self) -> bool {
        !matches!(self, EditorTheme::Light)
    }

    pub fn palette(&self) -> ThemePalette {
        match self {
            EditorTheme::VsDark => ThemePalette {
                theme: *self,
                base: "vs-dark",
                rules: vec![
                    TokenRule::new("comment", "6A9955").italic(),
                    TokenRule::new("keyword", "569CD6"),
                    TokenRule::new("string", "CE9178"),
                    TokenRule::new("number", "B5CEA8"),
                    TokenRule::new("tag", "569CD6"),
                    TokenRule::new("attribute.name", "9CDCFE"),
                    TokenRule::new("attribute.value", "CE9178"),
                ],
                chrome: EditorChrome {
                    background: "#1e1e1e",
                    foreground: "#d4d4d4",
                    line_highlight: "#2a2d2e",
                    selection: "#264f78",
                    cursor: "#aeafad",
                    gutter_foreground: "#858585",
                },
            },
            EditorTheme::Light => ThemePalette {
                theme: *self,
                base: "vs",
                rules: vec![
                    TokenRule::new("comment", "008000").italic(),
                    TokenRule::new("keyword", "0000FF"),
                    TokenRule::new("string", "A31515"),
                    TokenRule::new("number", "098658"),
                    TokenRule::new("tag", "800000"),
                    TokenRule::new("attribute.name", "E50000"),
                    TokenRule::new("attribute.value", "0000FF"),
                ],
                chrome: EditorChrome {
                    background: "#ffffff",
                    foreground: "#000000",
                    line_highlight: "#f3f3f3",
                    selection: "#add6ff",
                    cursor: "#000000",
                    gutter_foreground: "#237893",
                },
            },
            EditorTheme::HighContrast => ThemePalette {
                theme: *self,
                base: "hc-black",
                rules: vec![
                    TokenRule::new("comment", "7CA668"),
                    TokenRule::new("keyword", "569CD6").bold(),
                    TokenRule::new("string", "CE9178"),
                    TokenRule::new("number", "B5CEA8"),
                    TokenRule::new("tag", "569CD6"),
                ],
                chrome: EditorChrome {
                    background: "#000000",
                    foreground: "#ffffff",
                    line_highlight: "#000000",
                    selection: "#ffffff",
                    cursor: "#ffffff",
                    gutter_foreground: "#ffffff",
                },
            },
            EditorTheme::Dracula => ThemePalette {
                theme: *self,
                base: "vs-dark",
                rules: vec![
                    TokenRule::new("comment", "6272A4").italic(),
                    TokenRule::new("keyword", "FF79C6"),
                    TokenRule::new("string", "F1FA8C"),
                    TokenRule::new("number", "BD93F9"),
                    TokenRule::new("tag", "FF79C6"),
                    TokenRule::new("attribute.name", "50FA7B"),
                    TokenRule::new("attribute.value", "F1FA8C"),
                ],
                chrome: EditorChrome {
                    background: "#282a36",
                    foreground: "#f8f8f2",
                    line_highlight: "#44475a",
                    selection: "#44475a",
                    cursor: "#f8f8f0",
                    gutter_foreground: "#6272a4",
                },
            },
        }
    }
}

impl fmt::Display for EditorTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EditorTheme {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EditorTheme::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| EditorError::UnknownTheme(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    Normal,
    Italic,
    Bold,
}

/// Syntax highlighting rule for one token class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenRule {
    pub token: &'static str,
    /// Hex colour without `#`
    pub foreground: &'static str,
    pub font_style: FontStyle,
}

impl TokenRule {
    fn new(token: &'static str, foreground: &'static str) -> Self {
        Self {
            token,
            foreground,
            font_style: FontStyle::Normal,
        }
    }

    fn italic(mut self) -> Self {
        self.font_style = FontStyle::Italic;
        self
    }

    fn bold(mut self) -> Self {
        self.font_style = FontStyle::Bold;
        self
    }
}

/// Colours of the editor surface around the text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorChrome {
    pub background: &'static str,
    pub foreground: &'static str,
    pub line_highlight: &'static str,
    pub selection: &'static str,
    pub cursor: &'static str,
    pub gutter_foreground: &'static str,
}

/// Resolved palette of a theme
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemePalette {
    pub theme: EditorTheme,
    /// Built-in widget theme this palette extends
    pub base: &'static str,
    pub rules: Vec<TokenRule>,
    pub chrome: EditorChrome,
}

impl ThemePalette {
    /// Theme definition in the shape the editor widget's `defineTheme` expects
    pub fn to_widget_json(&self) -> serde_json::Value {
        let rules: Vec<serde_json::Value> = self
            .rules
            .iter()
            .map(|rule| {
                let mut value = json!({
                    "token": rule.token,
                    "foreground": rule.foreground,
                });
                if rule.font_style != FontStyle::Normal {
                    value["fontStyle"] = json!(rule.font_style);
                }
                value
            })
            .collect();

        json!({
            "base": self.base,
            "inherit": true,
            "rules": rules,
            "colors": {
                "editor.background": self.chrome.background,
                "editor.foreground": self.chrome.foreground,
                "editor.lineHighlightBackground": self.chrome.line_highlight,
                "editor.selectionBackground": self.chrome.selection,
                "editorCursor.foreground": self.chrome.cursor,
                "editorLineNumber.foreground": self.chrome.gutter_foreground,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme_is_vs_dark() {
        assert_eq!(EditorTheme::default(), EditorTheme::VsDark);
        assert_eq!(EditorTheme::default().as_str(), "vs-dark");
    }

    #[test]
    fn test_theme_names_round_trip_through_from_str() {
        for theme in EditorTheme::ALL {
            assert_eq!(theme.as_str().parse::<EditorTheme>().unwrap(), theme);
        }
        assert!("solarized".parse::<EditorTheme>().is_err());
    }

    #[test]
    fn test_serde_name_matches_persisted_identifier() {
        let json = serde_json::to_string(&EditorTheme::HighContrast).unwrap();
        assert_eq!(json, "\"hc-black\"");
    }

    #[test]
    fn test_every_palette_has_rules() {
        for theme in EditorTheme::ALL {
            let palette = theme.palette();
            assert_eq!(palette.theme, theme);
            assert!(!palette.rules.is_empty());
            assert!(palette.chrome.background.starts_with('#'));
        }
    }

    #[test]
    fn test_widget_json_shape() {
        let value = EditorTheme::Dracula.palette().to_widget_json();

        assert_eq!(value["base"], "vs-dark");
        assert_eq!(value["colors"]["editor.background"], "#282a36");
        assert_eq!(value["rules"][0]["fontStyle"], "italic");
        assert!(value["rules"][1].get("fontStyle").is_none());
    }
}
