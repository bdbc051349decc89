//! Per-ingredient quantity parsing.
//!
//! Quantities are free text on the way in and a single canonical form on the
//! way out: `"<number> <unit>"` with a `.` decimal separator and a lower-case
//! metric unit. Only the canonical form is ever persisted.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Message returned to callers when a quantity cannot be parsed.
pub const QUANTITY_FORMAT_MESSAGE: &str =
    "Quantity must use EU units like ml, dl, l, g, or kg (example: 2 dl)";

static QUANTITY_RE: OnceLock<Regex> = OnceLock::new();

fn quantity_regex() -> &'static Regex {
    QUANTITY_RE.get_or_init(|| {
        // Input is lower-cased with all whitespace stripped before matching.
        Regex::new(r"^(\d+(?:[.,]\d+)?)(ml|cl|dl|l|mg|g|kg|st)$")
            .unwrap_or_else(|error| panic!("quantity regex failed to compile: {error}"))
    })
}

/// Units accepted in a recipe quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuantityUnit {
    Millilitre,
    Centilitre,
    Decilitre,
    Litre,
    Milligram,
    Gram,
    Kilogram,
    /// Pieces ("stycken").
    Piece,
}

impl QuantityUnit {
    /// Canonical lower-case unit symbol.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Millilitre => "ml",
            Self::Centilitre => "cl",
            Self::Decilitre => "dl",
            Self::Litre => "l",
            Self::Milligram => "mg",
            Self::Gram => "g",
            Self::Kilogram => "kg",
            Self::Piece => "st",
        }
    }
}

impl FromStr for QuantityUnit {
    type Err = QuantityValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ml" => Ok(Self::Millilitre),
            "cl" => Ok(Self::Centilitre),
            "dl" => Ok(Self::Decilitre),
            "l" => Ok(Self::Litre),
            "mg" => Ok(Self::Milligram),
            "g" => Ok(Self::Gram),
            "kg" => Ok(Self::Kilogram),
            "st" => Ok(Self::Piece),
            _ => Err(QuantityValidationError::UnsupportedFormat),
        }
    }
}

impl fmt::Display for QuantityUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while parsing a quantity string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantityValidationError {
    UnsupportedFormat,
}

impl fmt::Display for QuantityValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFormat => f.write_str(QUANTITY_FORMAT_MESSAGE),
        }
    }
}

impl std::error::Error for QuantityValidationError {}

/// Canonical ingredient quantity such as `1.5 dl`.
///
/// ## Invariants
/// - `amount` is a non-negative decimal using `.` as the separator.
///
/// # Examples
/// ```
/// use recipe_backend::domain::Quantity;
///
/// let parsed = Quantity::parse(Some("1,5 L")).unwrap();
/// assert_eq!(parsed.map(|q| q.to_string()).as_deref(), Some("1.5 l"));
/// assert_eq!(Quantity::parse(Some("   ")).unwrap(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Quantity {
    amount: String,
    unit: QuantityUnit,
}

impl Quantity {
    /// Parse optional free text into a canonical quantity.
    ///
    /// Blank or missing input means "no quantity" and is not an error.
    pub fn parse(raw: Option<&str>) -> Result<Option<Self>, QuantityValidationError> {
        let lowered = raw.unwrap_or_default().trim().to_lowercase();
        if lowered.is_empty() {
            return Ok(None);
        }

        let compact: String = lowered.chars().filter(|c| !c.is_whitespace()).collect();
        let captures = quantity_regex()
            .captures(&compact)
            .ok_or(QuantityValidationError::UnsupportedFormat)?;
        let (Some(amount), Some(unit)) = (captures.get(1), captures.get(2)) else {
            return Err(QuantityValidationError::UnsupportedFormat);
        };

        Ok(Some(Self {
            amount: amount.as_str().replace(',', "."),
            unit: unit.as_str().parse()?,
        }))
    }

    /// Numeric part of the quantity.
    pub fn amount(&self) -> &str {
        self.amount.as_str()
    }

    /// Measurement unit.
    pub fn unit(&self) -> QuantityUnit {
        self.unit
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.unit)
    }
}

impl From<Quantity> for String {
    fn from(value: Quantity) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Quantity {
    type Error = QuantityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(Some(&value))?.ok_or(QuantityValidationError::UnsupportedFormat)
    }
}
