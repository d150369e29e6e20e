// ABOUTME: CSS length values as accepted by AMP width/height attributes.
// ABOUTME: Parses numerals with an optional unit plus the auto and fluid keywords.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static LENGTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)?)(px|em|rem|vh|vw|vmin|vmax)?$").unwrap());

/// A parsed `width` or `height` attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct CssLength {
    pub is_valid: bool,
    pub is_set: bool,
    pub is_auto: bool,
    pub is_fluid: bool,
    pub numeral: f64,
    pub unit: String,
}

impl CssLength {
    fn unset() -> Self {
        Self {
            is_valid: true,
            is_set: false,
            is_auto: false,
            is_fluid: false,
            numeral: f64::NAN,
            unit: "px".to_string(),
        }
    }

    /// A set length in pixels.
    pub fn px(numeral: f64) -> Self {
        Self {
            is_set: true,
            numeral,
            ..Self::unset()
        }
    }

    pub fn parse(input: Option<&str>, allow_auto: bool, allow_fluid: bool) -> Self {
        let Some(input) = input else {
            return Self::unset();
        };
        let mut len = Self {
            is_valid: false,
            is_set: true,
            ..Self::unset()
        };
        match input {
            "auto" => {
                len.is_auto = true;
                len.is_valid = allow_auto;
            }
            "fluid" => {
                len.is_fluid = true;
                len.is_valid = allow_fluid;
            }
            _ => {
                if let Some(caps) = LENGTH_RE.captures(input) {
                    if let Ok(numeral) = caps[1].parse::<f64>() {
                        len.numeral = numeral;
                        len.is_valid = true;
                        if let Some(unit) = caps.get(2) {
                            len.unit = unit.as_str().to_string();
                        }
                    }
                }
            }
        }
        len
    }

    /// Set, numeric and usable in a style declaration.
    pub fn is_definite(&self) -> bool {
        self.is_valid && self.is_set && !self.is_auto && !self.is_fluid
    }
}

impl fmt::Display for CssLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_auto {
            write!(f, "auto")
        } else if self.is_fluid {
            write!(f, "fluid")
        } else {
            write!(f, "{}{}", self.numeral, self.unit)
        }
    }
}
