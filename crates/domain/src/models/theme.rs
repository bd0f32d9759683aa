//! Named color themes for the invitation card.

use serde::{Deserialize, Serialize};

/// Palette preview shown in the theme picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub primary: &'static str,
    pub accent: &'static str,
}

/// Theme token stored on the invitation document.
///
/// Tokens written by older clients that are not in the catalog are kept
/// verbatim and rendered with the classic palette.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    ClassicMaroon,
    RoyalBlue,
    EmeraldGreen,
    RubyRed,
    RoyalScroll,
    AutumnFloral,
    Other(String),
}

impl Theme {
    /// Every theme offered in the editor, in picker order.
    pub const CATALOG: [Theme; 6] = [
        Theme::ClassicMaroon,
        Theme::RoyalBlue,
        Theme::EmeraldGreen,
        Theme::RubyRed,
        Theme::RoyalScroll,
        Theme::AutumnFloral,
    ];

    pub fn parse(token: &str) -> Self {
        match token {
            "" | "default" => Theme::ClassicMaroon,
            "theme-royal-blue" => Theme::RoyalBlue,
            "theme-emerald-green" => Theme::EmeraldGreen,
            "theme-ruby-red" => Theme::RubyRed,
            "theme-royal-scroll" => Theme::RoyalScroll,
            "theme-autumn-floral" => Theme::AutumnFloral,
            other => Theme::Other(other.to_string()),
        }
    }

    /// CSS class for the card. Unknown tokens render with the classic palette.
    pub fn css_class(&self) -> &str {
        match self {
            Theme::Other(_) => Theme::ClassicMaroon.token(),
            known => known.token(),
        }
    }

    /// Token as stored.
    pub fn token(&self) -> &str {
        match self {
            Theme::ClassicMaroon => "default",
            Theme::RoyalBlue => "theme-royal-blue",
            Theme::EmeraldGreen => "theme-emerald-green",
            Theme::RubyRed => "theme-ruby-red",
            Theme::RoyalScroll => "theme-royal-scroll",
            Theme::AutumnFloral => "theme-autumn-floral",
            Theme::Other(token) => token,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::ClassicMaroon | Theme::Other(_) => "Classic Maroon",
            Theme::RoyalBlue => "Royal Blue",
            Theme::EmeraldGreen => "Emerald Green",
            Theme::RubyRed => "Ruby Red",
            Theme::RoyalScroll => "Royal Scroll",
            Theme::AutumnFloral => "Nature Floral",
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            Theme::ClassicMaroon | Theme::Other(_) => Palette {
                primary: "hsl(333 62% 19%)",
                accent: "hsl(46 65% 52%)",
            },
            Theme::RoyalBlue => Palette {
                primary: "hsl(220 90% 20%)",
                accent: "hsl(46 65% 52%)",
            },
            Theme::EmeraldGreen => Palette {
                primary: "hsl(150 80% 18%)",
                accent: "hsl(46 65% 52%)",
            },
            Theme::RubyRed => Palette {
                primary: "hsl(345 80% 30%)",
                accent: "hsl(46 65% 52%)",
            },
            Theme::RoyalScroll => Palette {
                primary: "hsl(30 40% 20%)",
                accent: "hsl(25 80% 50%)",
            },
            Theme::AutumnFloral => Palette {
                primary: "hsl(35 30% 90%)",
                accent: "hsl(140 40% 40%)",
            },
        }
    }

    /// The floral theme adds a falling-leaves layer behind the card.
    pub fn has_falling_leaves(&self) -> bool {
        matches!(self, Theme::AutumnFloral)
    }
}

impl From<String> for Theme {
    fn from(token: String) -> Self {
        Theme::parse(&token)
    }
}

impl From<Theme> for String {
    fn from(theme: Theme) -> Self {
        theme.token().to_string()
    }
}

impl Serialize for Theme {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.token())
    }
}

impl<'de> Deserialize<'de> for Theme {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = Option::<String>::deserialize(deserializer)?;
        Ok(token.map(Theme::from).unwrap_or_default())
    }
}

/// Theme entry for the editor options endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ThemeOption {
    pub name: String,
    pub label: &'static str,
    pub primary: &'static str,
    pub accent: &'static str,
}

pub fn theme_options() -> Vec<ThemeOption> {
    Theme::CATALOG
        .iter()
        .map(|theme| {
            let palette = theme.palette();
            ThemeOption {
                name: theme.token().to_string(),
                label: theme.label(),
                primary: palette.primary,
                accent: palette.accent,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_tokens_round_trip() {
        for theme in Theme::CATALOG {
            assert_eq!(Theme::parse(theme.token()), theme);
        }
    }

    #[test]
    fn test_unknown_token_is_preserved() {
        let theme = Theme::parse("theme-saffron");
        assert_eq!(theme, Theme::Other("theme-saffron".into()));
        assert_eq!(theme.token(), "theme-saffron");
        assert_eq!(theme.css_class(), "default");
        assert_eq!(theme.palette(), Theme::ClassicMaroon.palette());
    }

    #[test]
    fn test_null_theme_deserializes_to_default() {
        let theme: Theme = serde_json::from_str("null").unwrap();
        assert_eq!(theme, Theme::ClassicMaroon);
        let theme: Theme = serde_json::from_str("\"theme-ruby-red\"").unwrap();
        assert_eq!(theme, Theme::RubyRed);
    }

    #[test]
    fn test_only_autumn_floral_has_leaves() {
        assert!(Theme::AutumnFloral.has_falling_leaves());
        assert!(!Theme::RoyalScroll.has_falling_leaves());
    }

    #[test]
    fn test_theme_options_in_picker_order() {
        let options = theme_options();
        assert_eq!(options.len(), 6);
        assert_eq!(options[0].name, "default");
        assert_eq!(options[5].label, "Nature Floral");
    }
}
