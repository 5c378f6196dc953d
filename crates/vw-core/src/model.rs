//! Styling and value types shared by every widget.
//!
//! Colors are injected through a `Theme` value: primitives only name the
//! palette slot (`Tone`) they draw in, and the render layer resolves the
//! concrete color from whichever theme is active.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a hex color string: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.
    /// The string may optionally start with `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        let (r, g, b, a) = match bytes.len() {
            3 | 4 => {
                let r = hex_val(bytes[0])? * 17;
                let g = hex_val(bytes[1])? * 17;
                let b = hex_val(bytes[2])? * 17;
                let a = match bytes.get(3) {
                    Some(&c) => hex_val(c)? * 17,
                    None => 255,
                };
                (r, g, b, a)
            }
            6 | 8 => {
                let r = hex_val(bytes[0])? << 4 | hex_val(bytes[1])?;
                let g = hex_val(bytes[2])? << 4 | hex_val(bytes[3])?;
                let b = hex_val(bytes[4])? << 4 | hex_val(bytes[5])?;
                let a = if bytes.len() == 8 {
                    hex_val(bytes[6])? << 4 | hex_val(bytes[7])?
                } else {
                    255
                };
                (r, g, b, a)
            }
            _ => return None,
        };

        Some(Self::rgba(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        ))
    }

    /// 8-bit channels, rounded.
    pub fn to_rgba8(&self) -> [u8; 4] {
        [
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            (self.a * 255.0).round() as u8,
        ]
    }

    /// Emit as shortest valid hex string (`#RRGGBB` when opaque).
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }
}

/// Parse a hex literal known at compile time. Falls back to opaque black
/// so a typo shows up visually instead of panicking at runtime.
fn hex(s: &str) -> Color {
    Color::from_hex(s).unwrap_or(Color::rgba(0.0, 0.0, 0.0, 1.0))
}

// ─── Theme ───────────────────────────────────────────────────────────────

/// Palette slot a primitive or readout draws in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Red,
    Green,
    Blue,
    Yellow,
    Grey,
}

/// Injected color set for one appearance mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub background: Color,
    pub grid: Color,
    pub axes: Color,
    pub red: Color,
    pub green: Color,
    pub blue: Color,
    pub yellow: Color,
    pub grey: Color,
    /// Readout background tints, paired with the line colors above.
    pub red_secondary: Color,
    pub green_secondary: Color,
    pub blue_secondary: Color,
    pub yellow_secondary: Color,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            background: hex("#fafafa"),
            grid: hex("#f5f5f5"),
            axes: hex("#0a0a0a"),
            red: hex("#f43f5e"),
            green: hex("#65a30d"),
            blue: hex("#0284c7"),
            yellow: hex("#facc15"),
            grey: hex("#e5e5e5"),
            red_secondary: hex("#fecdd3"),
            green_secondary: hex("#ecfccb"),
            blue_secondary: hex("#e0f2fe"),
            yellow_secondary: hex("#fefce8"),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: hex("#030712"),
            grid: hex("#111827"),
            axes: hex("#1f2937"),
            red: hex("#fb7185"),
            green: hex("#a3e635"),
            blue: hex("#38bdf8"),
            yellow: hex("#fde047"),
            grey: hex("#374151"),
            red_secondary: hex("#4c0519"),
            green_secondary: hex("#1a2e05"),
            blue_secondary: hex("#082f49"),
            yellow_secondary: hex("#422006"),
        }
    }

    pub fn for_mode(dark: bool) -> Self {
        if dark { Self::dark() } else { Self::light() }
    }

    /// Line color for a tone.
    pub fn line(&self, tone: Tone) -> Color {
        match tone {
            Tone::Red => self.red,
            Tone::Green => self.green,
            Tone::Blue => self.blue,
            Tone::Yellow => self.yellow,
            Tone::Grey => self.grey,
        }
    }

    /// Readout background for a tone. Grey readouts sit on the grid color.
    pub fn secondary(&self, tone: Tone) -> Color {
        match tone {
            Tone::Red => self.red_secondary,
            Tone::Green => self.green_secondary,
            Tone::Blue => self.blue_secondary,
            Tone::Yellow => self.yellow_secondary,
            Tone::Grey => self.grid,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

// ─── Stroke & Label ──────────────────────────────────────────────────────

/// Where a stroke takes its color from.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum StrokeColor {
    /// Use the owning primitive's tone (`currentColor`).
    #[default]
    Inherit,
    Tone(Tone),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub width: f64,
    pub color: StrokeColor,
    /// Dash lengths in user units; `None` draws a solid line.
    pub dash: Option<SmallVec<[f64; 2]>>,
}

impl Stroke {
    pub fn solid(width: f64) -> Self {
        Self {
            width,
            color: StrokeColor::Inherit,
            dash: None,
        }
    }

    pub fn dashed(width: f64, on: f64, off: f64) -> Self {
        let mut dash = SmallVec::new();
        dash.push(on);
        dash.push(off);
        Self {
            width,
            color: StrokeColor::Inherit,
            dash: Some(dash),
        }
    }

    /// Effective color given the owning primitive's tone.
    pub fn resolve(&self, tone: Tone) -> Tone {
        match self.color {
            StrokeColor::Inherit => tone,
            StrokeColor::Tone(t) => t,
        }
    }

    /// SVG `stroke-dasharray` value.
    pub fn dash_array(&self) -> String {
        match &self.dash {
            Some(d) => d
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" "),
            None => "none".to_string(),
        }
    }
}

impl Default for Stroke {
    fn default() -> Self {
        Self::solid(0.15)
    }
}

/// Text label attached to a primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    /// Perpendicular distance from the segment midpoint.
    pub offset: f64,
    /// Set when the label lives in an unflipped (y-down) coordinate frame.
    pub flip_y: bool,
}

impl Label {
    pub fn new(text: impl Into<String>, offset: f64) -> Self {
        Self {
            text: text.into(),
            offset,
            flip_y: false,
        }
    }

    #[must_use]
    pub fn flipped(mut self) -> Self {
        self.flip_y = true;
        self
    }
}

/// Arrowhead marker geometry in stroke-width units.
///
/// The marker triangle is `(0,0) (width, height/2) (0,height)`; `ref_x` is
/// the point along its length that sits on the shaft end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrowMarker {
    pub width: f64,
    pub height: f64,
    pub ref_x: f64,
}

impl ArrowMarker {
    /// `6 × 4` triangle anchored at `x = 4`, the classic SVG marker shape.
    pub const fn classic() -> Self {
        Self {
            width: 6.0,
            height: 4.0,
            ref_x: 4.0,
        }
    }
}

impl Default for ArrowMarker {
    /// Head length π·stroke, half-width π/2·stroke, base on the shaft end.
    fn default() -> Self {
        Self {
            width: std::f64::consts::PI,
            height: std::f64::consts::PI,
            ref_x: 0.0,
        }
    }
}

// ─── Bounds ──────────────────────────────────────────────────────────────

/// Visible rectangle of a widget in user units (the SVG `viewBox`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn view_box(&self) -> String {
        format!("{} {} {} {}", self.x, self.y, self.width, self.height)
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// The same rectangle as seen from a `scale(1 -1)` frame.
    pub fn flipped_y(&self) -> Self {
        Self::new(self.x, -(self.y + self.height), self.width, self.height)
    }

    /// Clamp a point into the rectangle. A negative width or height spans
    /// back from `x`/`y`.
    pub fn clamp(&self, px: f64, py: f64) -> (f64, f64) {
        let (x0, x1) = (self.x, self.x + self.width);
        let (y0, y1) = (self.y, self.y + self.height);
        (
            px.max(x0.min(x1)).min(x0.max(x1)),
            py.max(y0.min(y1)).min(y0.max(y1)),
        )
    }
}
