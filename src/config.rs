use std::collections::HashMap;

use smithay::backend::renderer::Color32F;

use crate::{DecorationError, layout::ButtonKind};

/// Largest border, title or corner margin, in logical pixels.
pub const MAX_METRIC: u32 = 1024;

/// Widest button relative to its height.
pub const MAX_BUTTON_ASPECT_RATIO: f64 = 8.0;

/// Converts a pixel metric for frame arithmetic, clamped to [`MAX_METRIC`].
pub(crate) fn metric_px(value: u32) -> i32 {
    i32::try_from(value.min(MAX_METRIC)).unwrap_or_default()
}

#[derive(Clone, Debug, PartialEq)]
pub struct DecorationConfig {
    pub border_size: u32,
    pub title_height: u32,
    /// Distance from a frame corner within which a border press resizes diagonally.
    pub corner_margin: u32,
    pub button_height_ratio: f64,
    pub button_aspect_ratio: f64,
    /// Buttons laid out from the right edge of the title bar, first entry rightmost.
    pub buttons: Vec<ButtonKind>,
    pub font_size_ratio: f64,
    pub colors: DecorationColors,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DecorationColors {
    pub active: Color32F,
    pub inactive: Color32F,
    pub title: Color32F,
    pub icon: Color32F,
    pub button_hovered: Color32F,
    pub button_pressed: Color32F,
    pub close_hovered: Color32F,
}

impl Default for DecorationColors {
    fn default() -> Self {
        Self {
            active: Color32F::new(0.133, 0.133, 0.133, 1.0),
            inactive: Color32F::new(0.2, 0.2, 0.2, 1.0),
            title: Color32F::new(1.0, 1.0, 1.0, 1.0),
            icon: Color32F::new(0.9, 0.9, 0.9, 1.0),
            button_hovered: Color32F::new(0.3, 0.3, 0.3, 1.0),
            button_pressed: Color32F::new(0.08, 0.08, 0.08, 1.0),
            close_hovered: Color32F::new(0.85, 0.26, 0.32, 1.0),
        }
    }
}

impl Default for DecorationConfig {
    fn default() -> Self {
        Self {
            border_size: 4,
            title_height: 24,
            corner_margin: 16,
            button_height_ratio: 0.8,
            button_aspect_ratio: 25.0 / 16.0,
            buttons: vec![ButtonKind::Close, ButtonKind::Maximize, ButtonKind::Minimize],
            font_size_ratio: 0.8,
            colors: DecorationColors::default(),
        }
    }
}

impl DecorationConfig {
    /// Builds a config from flat `decoration.*` key/value pairs handed over by
    /// the host's own config loader. Missing keys keep their defaults.
    pub fn from_values(values: &HashMap<String, String>) -> Result<Self, DecorationError> {
        let defaults = Self::default();
        let colors = &defaults.colors;

        let config = Self {
            border_size: parse_u32(values, "decoration.border_size", defaults.border_size)?,
            title_height: parse_u32(values, "decoration.title_height", defaults.title_height)?,
            corner_margin: parse_u32(values, "decoration.corner_margin", defaults.corner_margin)?,
            button_height_ratio: parse_f64(
                values,
                "decoration.button_height_ratio",
                defaults.button_height_ratio,
            )?,
            button_aspect_ratio: parse_f64(
                values,
                "decoration.button_aspect_ratio",
                defaults.button_aspect_ratio,
            )?,
            buttons: parse_buttons(values, "decoration.buttons", &defaults.buttons)?,
            font_size_ratio: parse_f64(
                values,
                "decoration.font_size_ratio",
                defaults.font_size_ratio,
            )?,
            colors: DecorationColors {
                active: parse_color(values, "decoration.active_color", colors.active)?,
                inactive: parse_color(values, "decoration.inactive_color", colors.inactive)?,
                title: parse_color(values, "decoration.title_color", colors.title)?,
                icon: parse_color(values, "decoration.icon_color", colors.icon)?,
                button_hovered: parse_color(
                    values,
                    "decoration.button_hovered_color",
                    colors.button_hovered,
                )?,
                button_pressed: parse_color(
                    values,
                    "decoration.button_pressed_color",
                    colors.button_pressed,
                )?,
                close_hovered: parse_color(
                    values,
                    "decoration.close_hovered_color",
                    colors.close_hovered,
                )?,
            },
        };

        config.validate()?;
        tracing::debug!(
            border_size = config.border_size,
            title_height = config.title_height,
            buttons = config.buttons.len(),
            "decoration config loaded"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DecorationError> {
        for (key, value) in [
            ("border_size", self.border_size),
            ("title_height", self.title_height),
            ("corner_margin", self.corner_margin),
        ] {
            if value > MAX_METRIC {
                return Err(DecorationError::Config(format!(
                    "invalid value for decoration.{key}: {value} (expected non-negative integer <= {MAX_METRIC})"
                )));
            }
        }

        for (key, value) in [
            ("button_height_ratio", self.button_height_ratio),
            ("button_aspect_ratio", self.button_aspect_ratio),
            ("font_size_ratio", self.font_size_ratio),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(DecorationError::Config(format!(
                    "{key} must be a positive number, got {value}"
                )));
            }
        }

        if self.button_height_ratio > 1.0 {
            return Err(DecorationError::Config(format!(
                "button_height_ratio must not exceed 1.0, got {}",
                self.button_height_ratio
            )));
        }

        if self.button_aspect_ratio > MAX_BUTTON_ASPECT_RATIO {
            return Err(DecorationError::Config(format!(
                "button_aspect_ratio must not exceed {MAX_BUTTON_ASPECT_RATIO}, got {}",
                self.button_aspect_ratio
            )));
        }

        if self.title_height == 0 && !self.buttons.is_empty() {
            return Err(DecorationError::Config(
                "buttons need a title bar; set title_height or clear buttons".to_owned(),
            ));
        }

        for (index, kind) in self.buttons.iter().enumerate() {
            if self.buttons[..index].contains(kind) {
                return Err(DecorationError::Config(format!(
                    "button `{}` listed more than once",
                    kind.name()
                )));
            }
        }

        Ok(())
    }
}

fn parse_u32(
    values: &HashMap<String, String>,
    key: &str,
    default: u32,
) -> Result<u32, DecorationError> {
    match values.get(key) {
        Some(raw) => raw.trim().parse::<u32>().map_err(|err| {
            DecorationError::Config(format!("invalid value for {key}: {raw} ({err})"))
        }),
        None => Ok(default),
    }
}

fn parse_f64(
    values: &HashMap<String, String>,
    key: &str,
    default: f64,
) -> Result<f64, DecorationError> {
    match values.get(key) {
        Some(raw) => raw.trim().parse::<f64>().map_err(|err| {
            DecorationError::Config(format!("invalid value for {key}: {raw} ({err})"))
        }),
        None => Ok(default),
    }
}

fn parse_buttons(
    values: &HashMap<String, String>,
    key: &str,
    default: &[ButtonKind],
) -> Result<Vec<ButtonKind>, DecorationError> {
    let Some(raw) = values.get(key) else {
        return Ok(default.to_vec());
    };

    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            ButtonKind::from_name(token).ok_or_else(|| {
                DecorationError::Config(format!(
                    "invalid value for {key}: unknown button `{token}` (expected close, maximize or minimize)"
                ))
            })
        })
        .collect()
}

fn parse_color(
    values: &HashMap<String, String>,
    key: &str,
    default: Color32F,
) -> Result<Color32F, DecorationError> {
    let Some(raw) = values.get(key) else {
        return Ok(default);
    };

    parse_hex_color(raw.trim()).ok_or_else(|| {
        DecorationError::Config(format!(
            "invalid value for {key}: {raw} (expected #rrggbb or #rrggbbaa)"
        ))
    })
}

/// Parses `#rrggbb` / `#rrggbbaa` into a premultiplied color.
fn parse_hex_color(raw: &str) -> Option<Color32F> {
    let hex = raw.strip_prefix('#')?;
    if !matches!(hex.len(), 6 | 8) || !hex.is_ascii() {
        return None;
    }

    let channel = |index: usize| -> Option<f32> {
        u8::from_str_radix(&hex[index..index + 2], 16)
            .ok()
            .map(|value| f32::from(value) / 255.0)
    };

    let r = channel(0)?;
    let g = channel(2)?;
    let b = channel(4)?;
    let a = if hex.len() == 8 { channel(6)? } else { 1.0 };
    Some(Color32F::new(r * a, g * a, b * a, a))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect()
    }

    #[test]
    fn empty_values_give_defaults() {
        let config = DecorationConfig::from_values(&HashMap::new()).unwrap();
        assert_eq!(config, DecorationConfig::default());
    }

    #[test]
    fn overrides_are_applied() {
        let config = DecorationConfig::from_values(&values(&[
            ("decoration.border_size", "6"),
            ("decoration.title_height", " 30 "),
            ("decoration.corner_margin", "20"),
            ("decoration.buttons", "close, minimize"),
            ("decoration.active_color", "#ff0000"),
        ]))
        .unwrap();

        assert_eq!(config.border_size, 6);
        assert_eq!(config.title_height, 30);
        assert_eq!(config.corner_margin, 20);
        assert_eq!(config.buttons, vec![ButtonKind::Close, ButtonKind::Minimize]);
        assert_eq!(config.colors.active, Color32F::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn translucent_colors_are_premultiplied() {
        let color = parse_hex_color("#ffffff80").unwrap();
        assert!((color.a() - 128.0 / 255.0).abs() < f32::EPSILON);
        assert!((color.r() - color.a()).abs() < f32::EPSILON);
    }

    #[test]
    fn malformed_values_are_rejected() {
        for (key, value) in [
            ("decoration.border_size", "-1"),
            ("decoration.button_height_ratio", "wide"),
            ("decoration.buttons", "close,shade"),
            ("decoration.active_color", "red"),
            ("decoration.active_color", "#12345"),
        ] {
            let err = DecorationConfig::from_values(&values(&[(key, value)])).unwrap_err();
            assert!(matches!(err, DecorationError::Config(_)), "{key}={value}");
        }
    }

    #[test]
    fn validation_catches_inconsistent_metrics() {
        let config = DecorationConfig {
            title_height: 0,
            ..DecorationConfig::default()
        };
        assert!(config.validate().is_err());

        let config = DecorationConfig {
            title_height: 0,
            buttons: Vec::new(),
            ..DecorationConfig::default()
        };
        assert!(config.validate().is_ok());

        let config = DecorationConfig {
            buttons: vec![ButtonKind::Close, ButtonKind::Close],
            ..DecorationConfig::default()
        };
        assert!(config.validate().is_err());

        let config = DecorationConfig {
            button_height_ratio: 1.5,
            ..DecorationConfig::default()
        };
        assert!(config.validate().is_err());

        let config = DecorationConfig {
            button_aspect_ratio: 100.0,
            ..DecorationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn oversized_metrics_are_rejected() {
        for key in [
            "decoration.border_size",
            "decoration.title_height",
            "decoration.corner_margin",
        ] {
            let err = DecorationConfig::from_values(&values(&[(key, "2000000000")])).unwrap_err();
            let DecorationError::Config(message) = err else {
                panic!("{key}: expected a config error");
            };
            assert!(message.contains("<= 1024"), "{key}: {message}");

            let limit = MAX_METRIC.to_string();
            assert!(DecorationConfig::from_values(&values(&[(key, limit.as_str())])).is_ok());
        }
    }

    #[test]
    fn metric_conversion_saturates_at_the_bound() {
        assert_eq!(metric_px(4), 4);
        assert_eq!(metric_px(u32::MAX), 1024);
    }
}
