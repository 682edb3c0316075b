use std::path::Path;

use serde::Deserialize;

use crate::color::Color;
use crate::error::{Error, Result};

const DEEP_SPACE_BACKGROUND: Color = Color::opaque(0.0, 0.0, 0.0);
const DEEP_SPACE_STAR: Color = Color::opaque(1.0, 0.82, 0.48);
const DEEP_SPACE_BODY: Color = Color::opaque(0.29, 0.33, 0.4);

const FONT_FAMILY: &str = "sans-serif";
const VIEW_WIDTH: f64 = 1200.0;
const VIEW_HEIGHT: f64 = 900.0;

const BUILTIN_STYLES: &[(&str, &str)] = &[
    ("chart", include_str!("../styles/chart.toml")),
    ("deep_space", include_str!("../styles/deep_space.toml")),
];

/// Colors, font and view size of a rendered system map. Label colors are
/// not part of the style; they come from each planet's government.
#[derive(Debug, Clone, Deserialize)]
pub struct MapStyle {
    #[serde(default = "default_background")]
    pub background_color: Color,
    /// Fill for objects without a planet (stars and unnamed rocks).
    #[serde(default = "default_star")]
    pub star_color: Color,
    /// Fill for objects carrying a planet.
    #[serde(default = "default_body")]
    pub body_color: Color,

    #[serde(default = "default_font_family")]
    pub font_family: String,

    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
}

fn default_background() -> Color {
    DEEP_SPACE_BACKGROUND
}
fn default_star() -> Color {
    DEEP_SPACE_STAR
}
fn default_body() -> Color {
    DEEP_SPACE_BODY
}
fn default_font_family() -> String {
    FONT_FAMILY.to_string()
}
fn default_width() -> f64 {
    VIEW_WIDTH
}
fn default_height() -> f64 {
    VIEW_HEIGHT
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            background_color: DEEP_SPACE_BACKGROUND,
            star_color: DEEP_SPACE_STAR,
            body_color: DEEP_SPACE_BODY,
            font_family: FONT_FAMILY.to_string(),
            width: VIEW_WIDTH,
            height: VIEW_HEIGHT,
        }
    }
}

impl MapStyle {
    pub fn from_builtin(name: &str) -> Result<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
        let content = BUILTIN_STYLES
            .iter()
            .find(|(n, _)| *n == normalized)
            .map(|(_, c)| *c)
            .ok_or_else(|| Error::UnknownStyle {
                name: name.to_string(),
                available: Self::list_builtins().join(", "),
            })?;
        Self::from_toml(content)
    }

    pub fn list_builtins() -> Vec<&'static str> {
        BUILTIN_STYLES.iter().map(|(n, _)| *n).collect()
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// A built-in style name, or a path to a TOML or YAML style file.
    pub fn resolve(name_or_path: &str) -> Result<Self> {
        let path = Path::new(name_or_path);
        if !path.is_file() {
            return Self::from_builtin(name_or_path);
        }

        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        match Self::from_toml(&content) {
            Ok(style) => Ok(style),
            Err(toml_err) => Self::from_yaml(&content).map_err(|yaml_err| Error::UnknownSyntax {
                toml: toml_err.to_string(),
                yaml: yaml_err.to_string(),
            }),
        }
    }
}
