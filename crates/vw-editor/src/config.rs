//! Per-widget configuration, read from host-element attributes.
//!
//! | Attribute | Value | Default |
//! |-----------|-------|---------|
//! | `bounds` | `"x y width height"` | the widget's own bounds |
//! | `clamp` | boolean | `true` |
//! | `dark` | boolean | `false` |

use vw_core::{Bounds, parse_bounds, parse_flag};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidgetConfig {
    /// Overrides the widget's default visible rectangle.
    pub bounds: Option<Bounds>,
    /// Keep dragged points inside the visible rectangle.
    pub clamp_drag: bool,
    /// Start in the dark theme.
    pub dark: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            bounds: None,
            clamp_drag: true,
            dark: false,
        }
    }
}

impl WidgetConfig {
    /// Build from `(name, value)` attribute pairs. Unknown attributes are
    /// ignored; malformed known ones are an error.
    pub fn from_attributes<'a, I>(attrs: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut config = Self::default();
        for (name, value) in attrs {
            match name {
                "bounds" => {
                    config.bounds =
                        Some(parse_bounds(value).map_err(|e| format!("attribute `bounds`: {e}"))?);
                }
                "clamp" => {
                    config.clamp_drag =
                        parse_flag(value).map_err(|e| format!("attribute `clamp`: {e}"))?;
                }
                "dark" => {
                    config.dark = parse_flag(value).map_err(|e| format!("attribute `dark`: {e}"))?;
                }
                other => log::debug!("ignoring attribute `{other}`"),
            }
        }
        Ok(config)
    }
}
