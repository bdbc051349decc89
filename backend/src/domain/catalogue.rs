//! Ingredient and tag catalogue entities.
//!
//! Ingredients are a curated vocabulary: they are created explicitly and a
//! recipe write never adds one. Tags are folksonomy labels created on first
//! use. Both store a trimmed, lower-cased name that is unique regardless of
//! case.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::{IngredientId, TagId};
use super::names::normalize_name;

/// Validation errors for catalogue names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogueValidationError {
    EmptyIngredientName,
    EmptyTagName,
}

impl fmt::Display for CatalogueValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyIngredientName => f.write_str("Ingredient name is required"),
            Self::EmptyTagName => f.write_str("Tag name is required"),
        }
    }
}

impl std::error::Error for CatalogueValidationError {}

/// A single normalised catalogue name.
///
/// # Examples
/// ```
/// use recipe_backend::domain::CatalogueName;
///
/// let name = CatalogueName::ingredient("  Olive Oil ").unwrap();
/// assert_eq!(name.as_ref(), "olive oil");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CatalogueName(String);

impl CatalogueName {
    /// Normalise an ingredient name.
    pub fn ingredient(raw: &str) -> Result<Self, CatalogueValidationError> {
        normalize_name(raw)
            .map(Self)
            .ok_or(CatalogueValidationError::EmptyIngredientName)
    }

    /// Normalise a tag name.
    pub fn tag(raw: &str) -> Result<Self, CatalogueValidationError> {
        normalize_name(raw)
            .map(Self)
            .ok_or(CatalogueValidationError::EmptyTagName)
    }
}

impl AsRef<str> for CatalogueName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CatalogueName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity and name of an ingredient, as attached to recipes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientSummary {
    pub id: IngredientId,
    pub name: String,
}

/// Catalogue ingredient decorated with the number of recipes using it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub recipe_count: i64,
}

impl Ingredient {
    /// Drop the usage count.
    pub fn summary(&self) -> IngredientSummary {
        IngredientSummary {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Free-form recipe label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}
