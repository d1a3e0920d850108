#![forbid(unsafe_code)]

//! Length units and parent-relative resolution.
//!
//! Positions and extents are written either as absolute lengths (`2.5`) or as
//! percentages of the immediate parent region (`"50%"`). Percentages always
//! resolve against the parent's own absolute dimensions, never the top-level
//! slide, so grids nested inside grids stay relative to their container.
//!
//! # Responsive centering
//!
//! Deck templates are conventionally designed for 16:9. When a center-aligned
//! percentage x-position is resolved against a region with a different aspect
//! ratio, [`Length::resolve_aligned`] scales the result by half the relative
//! ratio deviation so centered content stays visually centered on 4:3 and
//! other non-standard decks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// EMUs (English Metric Units) per inch, the native unit of OOXML documents.
pub const EMU_PER_INCH: f64 = 914_400.0;

/// The aspect ratio deck templates are designed for.
pub const STANDARD_ASPECT: f64 = 16.0 / 9.0;

/// Aspect deviation below which no centering adjustment is applied.
pub const ASPECT_TOLERANCE: f64 = 0.01;

/// Convert EMUs to inches.
#[inline]
pub fn emu_to_inches(emu: f64) -> f64 {
    emu / EMU_PER_INCH
}

/// Convert inches to EMUs.
#[inline]
pub fn inches_to_emu(inches: f64) -> f64 {
    inches * EMU_PER_INCH
}

/// Horizontal alignment hint for responsive positioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// An absolute length or a percentage of the parent extent.
///
/// Serializes through its string form (`"2.5"` / `"50%"`), matching the
/// position strings accepted from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Length {
    /// An absolute length in document units.
    Abs(f64),
    /// A percentage of the parent extent (0.0 to 100.0, not clamped).
    Percent(f64),
}

impl Length {
    /// Shorthand for [`Length::Percent`].
    #[inline]
    #[must_use]
    pub const fn pct(value: f64) -> Self {
        Self::Percent(value)
    }

    /// Resolve against the parent extent.
    #[inline]
    pub fn resolve(self, extent: f64) -> f64 {
        match self {
            Self::Abs(value) => value,
            Self::Percent(percent) => percent / 100.0 * extent,
        }
    }

    /// Resolve an x-position with the responsive centering adjustment.
    ///
    /// Only center-aligned percentage values are adjusted; absolute lengths
    /// and left/right alignment resolve exactly as [`Length::resolve`].
    /// `aspect` is the parent region's width-to-height ratio.
    #[inline]
    pub fn resolve_aligned(self, extent: f64, aspect: f64, align: HAlign) -> f64 {
        let base = self.resolve(extent);
        match (self, align) {
            (Self::Percent(_), HAlign::Center) => base * centered_adjustment(aspect),
            _ => base,
        }
    }
}

/// Scale factor applied to center-aligned percentage x-positions.
///
/// Identity within [`ASPECT_TOLERANCE`] of [`STANDARD_ASPECT`]; otherwise half
/// the relative deviation is folded in.
#[inline]
pub fn centered_adjustment(aspect: f64) -> f64 {
    if aspect.is_finite() && aspect > 0.0 && (aspect - STANDARD_ASPECT).abs() > ASPECT_TOLERANCE {
        1.0 + (aspect / STANDARD_ASPECT - 1.0) * 0.5
    } else {
        1.0
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abs(value) => write!(f, "{value}"),
            Self::Percent(percent) => write!(f, "{percent}%"),
        }
    }
}

impl From<f64> for Length {
    fn from(value: f64) -> Self {
        Self::Abs(value)
    }
}

impl From<Length> for String {
    fn from(value: Length) -> Self {
        value.to_string()
    }
}

impl FromStr for Length {
    type Err = ParseLengthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let err = || ParseLengthError {
            input: s.to_string(),
        };
        let (raw, percent) = match trimmed.strip_suffix('%') {
            Some(raw) => (raw, true),
            None => (trimmed, false),
        };
        let value: f64 = raw.trim().parse().map_err(|_| err())?;
        if !value.is_finite() {
            return Err(err());
        }
        if percent {
            Ok(Self::Percent(value))
        } else {
            Ok(Self::Abs(value))
        }
    }
}

impl TryFrom<String> for Length {
    type Error = ParseLengthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Error for malformed length strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLengthError {
    /// The rejected input.
    pub input: String,
}

impl fmt::Display for ParseLengthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid length {:?}: expected an absolute number or \"<number>%\"",
            self.input
        )
    }
}

impl std::error::Error for ParseLengthError {}
