//! Recipe aggregate: write drafts and read views.
//!
//! A [`RecipeDraft`] is raw caller input. [`RecipeDraft::normalize`] runs the
//! pure half of the write pipeline (scalar validation, name splitting,
//! duplicate detection and quantity parsing) and yields a [`RecipePlan`]
//! whose ingredient names still need resolving against the catalogue.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalogue::{IngredientSummary, Tag};
use super::comment::Comment;
use super::ids::{IngredientId, RecipeId};
use super::names::{
    DuplicateNamesError, NameListKind, ensure_unique, normalize_names, split_terms,
};
use super::quantity::{Quantity, QuantityValidationError};

/// Reasons a recipe draft is rejected before touching storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeValidationError {
    EmptyTitle,
    NegativeMinutes { field: &'static str },
    Quantity(QuantityValidationError),
    Duplicates(DuplicateNamesError),
}

impl fmt::Display for RecipeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => f.write_str("Title is required"),
            Self::NegativeMinutes { field } => write!(f, "{field} must not be negative"),
            Self::Quantity(err) => err.fmt(f),
            Self::Duplicates(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for RecipeValidationError {}

impl From<QuantityValidationError> for RecipeValidationError {
    fn from(value: QuantityValidationError) -> Self {
        Self::Quantity(value)
    }
}

impl From<DuplicateNamesError> for RecipeValidationError {
    fn from(value: DuplicateNamesError) -> Self {
        Self::Duplicates(value)
    }
}

/// Scalar recipe columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeFields {
    pub title: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
}

impl RecipeFields {
    fn validate(self) -> Result<Self, RecipeValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(RecipeValidationError::EmptyTitle);
        }
        if self.prep_time.is_some_and(|minutes| minutes < 0) {
            return Err(RecipeValidationError::NegativeMinutes { field: "prep_time" });
        }
        if self.cook_time.is_some_and(|minutes| minutes < 0) {
            return Err(RecipeValidationError::NegativeMinutes { field: "cook_time" });
        }
        Ok(Self {
            title: title.to_owned(),
            ..self
        })
    }
}

/// One ingredient row of a draft. `name` may hold several names; the
/// quantity then applies to each of them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IngredientLine {
    pub name: String,
    pub quantity: Option<String>,
}

/// Unvalidated recipe write request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    pub fields: RecipeFields,
    pub ingredients: Vec<IngredientLine>,
    pub tags: Vec<String>,
}

/// Normalised ingredient entry awaiting catalogue resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedIngredient {
    pub name: String,
    pub quantity: Option<Quantity>,
}

/// Output of the pure write pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipePlan {
    pub fields: RecipeFields,
    pub ingredients: Vec<PlannedIngredient>,
    pub tag_names: Vec<String>,
}

impl RecipePlan {
    /// Normalised ingredient names in input order.
    pub fn ingredient_names(&self) -> Vec<String> {
        self.ingredients.iter().map(|entry| entry.name.clone()).collect()
    }
}

impl RecipeDraft {
    /// Validate scalars, split and normalise names, reject duplicates and
    /// canonicalise quantities.
    ///
    /// # Examples
    /// ```
    /// use recipe_backend::domain::{IngredientLine, RecipeDraft, RecipeFields};
    ///
    /// let draft = RecipeDraft {
    ///     fields: RecipeFields {
    ///         title: "Pancakes".into(),
    ///         description: None,
    ///         instructions: None,
    ///         prep_time: Some(5),
    ///         cook_time: Some(10),
    ///     },
    ///     ingredients: vec![IngredientLine { name: "Milk".into(), quantity: Some("3dl".into()) }],
    ///     tags: vec!["Breakfast; quick".into()],
    /// };
    /// let plan = draft.normalize().unwrap();
    /// assert_eq!(plan.ingredient_names(), vec!["milk"]);
    /// assert_eq!(plan.tag_names, vec!["breakfast", "quick"]);
    /// ```
    pub fn normalize(self) -> Result<RecipePlan, RecipeValidationError> {
        let fields = self.fields.validate()?;

        let mut ingredients = Vec::new();
        for line in &self.ingredients {
            let quantity = Quantity::parse(line.quantity.as_deref())?;
            for piece in split_terms(&line.name) {
                ingredients.push(PlannedIngredient {
                    name: piece.to_lowercase(),
                    quantity: quantity.clone(),
                });
            }
        }
        let names: Vec<String> = ingredients.iter().map(|entry| entry.name.clone()).collect();
        ensure_unique(&names, NameListKind::Ingredients)?;

        let tag_names = normalize_names(self.tags.iter().map(String::as_str));
        ensure_unique(&tag_names, NameListKind::Tags)?;

        Ok(RecipePlan {
            fields,
            ingredients,
            tag_names,
        })
    }
}

/// Per-recipe quantity joined with its ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientMeasurement {
    pub ingredient_id: IngredientId,
    pub name: String,
    pub quantity: Option<String>,
}

/// Base recipe row before decoration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeRecord {
    pub id: RecipeId,
    pub fields: RecipeFields,
    pub created_at: DateTime<Utc>,
}

/// Fully decorated recipe returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeView {
    pub id: RecipeId,
    #[serde(flatten)]
    pub fields: RecipeFields,
    pub created_at: DateTime<Utc>,
    pub created_by_username: Option<String>,
    pub favorite_count: i64,
    pub ingredients: Vec<IngredientSummary>,
    pub ingredient_measurements: Vec<IngredientMeasurement>,
    pub tags: Vec<Tag>,
    pub comments: Vec<Comment>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the pure write pipeline.
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn fields() -> RecipeFields {
        RecipeFields {
            title: " Tomato soup ".to_owned(),
            description: Some("Warm".to_owned()),
            instructions: None,
            prep_time: Some(10),
            cook_time: Some(20),
        }
    }

    fn line(name: &str, quantity: Option<&str>) -> IngredientLine {
        IngredientLine {
            name: name.to_owned(),
            quantity: quantity.map(str::to_owned),
        }
    }

    #[rstest]
    fn shared_quantity_applies_to_every_name_in_a_line(fields: RecipeFields) {
        let draft = RecipeDraft {
            fields,
            ingredients: vec![line("Salt, Pepper", Some("5 g")), line("Tomato", None)],
            tags: vec![],
        };

        let plan = draft.normalize().expect("valid draft");

        assert_eq!(plan.fields.title, "Tomato soup");
        assert_eq!(plan.ingredient_names(), vec!["salt", "pepper", "tomato"]);
        let quantities: Vec<Option<String>> = plan
            .ingredients
            .iter()
            .map(|entry| entry.quantity.as_ref().map(ToString::to_string))
            .collect();
        assert_eq!(
            quantities,
            vec![Some("5 g".to_owned()), Some("5 g".to_owned()), None]
        );
    }

    #[rstest]
    fn duplicate_ingredients_are_rejected(fields: RecipeFields) {
        let draft = RecipeDraft {
            fields,
            ingredients: vec![line("egg, Egg, milk", None)],
            tags: vec![],
        };

        let err = draft.normalize().expect_err("duplicates");
        assert_eq!(err.to_string(), "Duplicate ingredients: egg");
    }

    #[rstest]
    fn duplicate_tags_are_rejected(fields: RecipeFields) {
        let draft = RecipeDraft {
            fields,
            ingredients: vec![],
            tags: vec!["Soup".to_owned(), "soup".to_owned()],
        };

        let err = draft.normalize().expect_err("duplicates");
        assert_eq!(err.to_string(), "Duplicate tags: soup");
    }

    #[rstest]
    fn bad_quantity_fails_the_whole_draft(fields: RecipeFields) {
        let draft = RecipeDraft {
            fields,
            ingredients: vec![line("flour", Some("2 cups"))],
            tags: vec![],
        };

        assert!(matches!(
            draft.normalize(),
            Err(RecipeValidationError::Quantity(_))
        ));
    }

    #[rstest]
    #[case("   ")]
    #[case("")]
    fn blank_title_is_rejected(mut fields: RecipeFields, #[case] title: &str) {
        fields.title = title.to_owned();
        let draft = RecipeDraft {
            fields,
            ingredients: vec![],
            tags: vec![],
        };
        assert_eq!(
            draft.normalize().expect_err("blank title"),
            RecipeValidationError::EmptyTitle
        );
    }

    #[rstest]
    fn negative_times_are_rejected(mut fields: RecipeFields) {
        fields.cook_time = Some(-1);
        let draft = RecipeDraft {
            fields,
            ingredients: vec![],
            tags: vec![],
        };
        assert_eq!(
            draft.normalize().expect_err("negative"),
            RecipeValidationError::NegativeMinutes { field: "cook_time" }
        );
    }
}
