//! Parsers for the small attribute grammars widgets accept.
//!
//! Built on `winnow` 0.7. Currently: `viewBox`-style bounds
//! (`"x y width height"`, whitespace and/or comma separated) and the
//! boolean attribute spellings hosts tend to use.

use crate::model::Bounds;
use winnow::ascii::{float, multispace0};
use winnow::combinator::{opt, preceded, repeat};
use winnow::prelude::*;

/// Largest accepted bounds width or height, in user units. Grid lines are
/// drawn one per unit, so this also bounds the decoration count.
pub const MAX_BOUNDS_SIZE: f64 = 1000.0;

/// Parse `"x y width height"` into `Bounds`.
///
/// Width and height must be positive and at most `MAX_BOUNDS_SIZE`, and
/// all values finite.
#[must_use = "parsing result should be used"]
pub fn parse_bounds(input: &str) -> Result<Bounds, String> {
    let values: Vec<f64> = bounds_values
        .parse(input.trim())
        .map_err(|e| format!("Bounds parse error: {e}"))?;

    let &[x, y, width, height] = values.as_slice() else {
        return Err(format!(
            "Bounds need 4 numbers (x y width height), got {}",
            values.len()
        ));
    };
    if !values.iter().all(|v| v.is_finite()) {
        return Err("Bounds must be finite".to_string());
    }
    if width <= 0.0 || height <= 0.0 {
        return Err(format!("Bounds size must be positive, got {width} × {height}"));
    }
    if width > MAX_BOUNDS_SIZE || height > MAX_BOUNDS_SIZE {
        return Err(format!(
            "Bounds size must be at most {MAX_BOUNDS_SIZE}, got {width} × {height}"
        ));
    }
    Ok(Bounds::new(x, y, width, height))
}

/// Parse a boolean attribute: `true/false`, `yes/no`, `on/off`, `1/0`.
/// An empty value counts as `true` (bare HTML attribute).
pub fn parse_flag(input: &str) -> Result<bool, String> {
    match input.trim().to_ascii_lowercase().as_str() {
        "" | "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => Err(format!("Expected a boolean, got {other:?}")),
    }
}

// ─── Low-level parsers ──────────────────────────────────────────────────

fn number(input: &mut &str) -> ModalResult<f64> {
    float.parse_next(input)
}

/// Separator between numbers: whitespace with at most one comma.
fn separator(input: &mut &str) -> ModalResult<()> {
    (multispace0, opt(','), multispace0).void().parse_next(input)
}

fn bounds_values(input: &mut &str) -> ModalResult<Vec<f64>> {
    let first = number.parse_next(input)?;
    let rest: Vec<f64> = repeat(0.., preceded(separator, number)).parse_next(input)?;
    let mut out = Vec::with_capacity(rest.len() + 1);
    out.push(first);
    out.extend(rest);
    Ok(out)
}
