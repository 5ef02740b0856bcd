//! Parsing of the `"min,max"` and `"w:h,w:h"` limit strings used by the rules.
//!
//! A bound of 0 means "unconstrained" on that side, and a limit whose bounds
//! are both 0 (or an empty string) disables its rule altogether. Parsers
//! therefore return `Ok(None)` for a disabled limit.

use std::str::FromStr;

use super::errors::LimitError;

/// Tolerance used when comparing an image ratio with a fixed `w:h` target
pub const RATIO_TOLERANCE: f64 = 0.01;

const DISABLED_RANGE: &str = "0,0";
const DISABLED_RATIOS: &str = "0:0";

/// Where a value sits relative to a [`LimitRange`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Within,
    BelowMin,
    AboveMax,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimitRange {
    pub min: f64,
    pub max: f64,
}

impl LimitRange {
    /// Parses a limit whose fields must be integers (counts, sizes, pixels)
    pub fn parse_int(raw: &str) -> Result<Option<Self>, LimitError> {
        Self::parse_with(raw, |field| {
            i64::from_str(field)
                .map(|v| v as f64)
                .map_err(|_| LimitError::NotAnInteger(field.to_string()))
        })
    }

    /// Parses a limit whose fields may be fractional (ratios)
    pub fn parse_float(raw: &str) -> Result<Option<Self>, LimitError> {
        Self::parse_with(raw, |field| {
            f64::from_str(field).map_err(|_| LimitError::NotANumber(field.to_string()))
        })
    }

    fn parse_with<F>(raw: &str, parse_field: F) -> Result<Option<Self>, LimitError>
    where
        F: Fn(&str) -> Result<f64, LimitError>,
    {
        let raw = raw.trim();
        if raw.is_empty() || raw == DISABLED_RANGE {
            return Ok(None);
        }

        let fields: Vec<&str> = raw.split(',').map(str::trim).collect();
        let [min, max] = fields.as_slice() else {
            return Err(LimitError::FieldCount(raw.to_string()));
        };

        let range = Self {
            min: parse_field(min)?,
            max: parse_field(max)?,
        };

        if range.min == 0.0 && range.max == 0.0 {
            return Ok(None);
        }
        Ok(Some(range))
    }

    /// Only strictly positive bounds are enforced
    pub fn check(&self, value: f64) -> Bound {
        if self.min > 0.0 && value < self.min {
            Bound::BelowMin
        } else if self.max > 0.0 && value > self.max {
            Bound::AboveMax
        } else {
            Bound::Within
        }
    }
}

/// The `w:h` alternatives an image may match.
#[derive(Debug, Clone, PartialEq)]
pub struct RatioList {
    ratios: Vec<(f64, f64)>,
}

impl RatioList {
    /// Entries without a `:` are ignored, as are surrounding spaces.
    pub fn parse(raw: &str) -> Result<Option<Self>, LimitError> {
        let raw = raw.trim();
        if raw.is_empty() || raw == DISABLED_RATIOS {
            return Ok(None);
        }

        let mut ratios = Vec::new();
        for entry in raw.split(',').map(str::trim) {
            if !entry.contains(':') {
                continue;
            }

            let parts: Vec<&str> = entry.split(':').map(str::trim).collect();
            let [w, h] = parts.as_slice() else {
                return Err(LimitError::BadRatio(entry.to_string()));
            };
            let w = f64::from_str(w).map_err(|_| LimitError::NotANumber(w.to_string()))?;
            let h = f64::from_str(h).map_err(|_| LimitError::NotANumber(h.to_string()))?;
            if h == 0.0 {
                return Err(LimitError::ZeroHeight(entry.to_string()));
            }
            ratios.push((w, h));
        }

        Ok(Some(Self { ratios }))
    }

    /// Compares `width / height` (not the normalized short/long ratio)
    /// against every alternative.
    pub fn matches(&self, width: u32, height: u32) -> bool {
        if height == 0 {
            return false;
        }
        let current = width as f64 / height as f64;
        self.ratios
            .iter()
            .any(|(w, h)| (current - w / h).abs() < RATIO_TOLERANCE)
    }

    pub fn is_empty(&self) -> bool {
        self.ratios.is_empty()
    }
}
