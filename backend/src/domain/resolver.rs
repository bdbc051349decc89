//! Mapping normalised names onto catalogue rows.
//!
//! Ingredients must already exist; a recipe write never creates one. Tags
//! are created on first use, so resolving them only reports which names are
//! still absent.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use super::catalogue::{IngredientSummary, Tag};
use super::ids::IngredientId;
use super::quantity::Quantity;
use super::recipe::RecipePlan;

/// Ingredient association ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIngredient {
    pub ingredient_id: IngredientId,
    pub quantity: Option<Quantity>,
}

/// One or more ingredient names had no catalogue row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingIngredientsError {
    names: Vec<String>,
}

impl MissingIngredientsError {
    /// Missing names, unique and sorted.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl fmt::Display for MissingIngredientsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown ingredients: {}. Add them to the ingredient list first.",
            self.names.join(", ")
        )
    }
}

impl std::error::Error for MissingIngredientsError {}

/// Resolve planned ingredients against the rows found in the catalogue.
///
/// `found` may be in any order and may hold names in any case; matching is
/// case-insensitive and exact.
///
/// # Examples
/// ```
/// use recipe_backend::domain::{PlannedIngredient, RecipeFields, RecipePlan, resolve_ingredients};
///
/// let plan = RecipePlan {
///     fields: RecipeFields {
///         title: "Toast".into(),
///         description: None,
///         instructions: None,
///         prep_time: None,
///         cook_time: None,
///     },
///     ingredients: vec![PlannedIngredient { name: "saffron".into(), quantity: None }],
///     tag_names: vec![],
/// };
/// let err = resolve_ingredients(&plan, &[]).unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "Unknown ingredients: saffron. Add them to the ingredient list first."
/// );
/// ```
pub fn resolve_ingredients(
    plan: &RecipePlan,
    found: &[IngredientSummary],
) -> Result<Vec<ResolvedIngredient>, MissingIngredientsError> {
    let by_name: HashMap<String, IngredientId> = found
        .iter()
        .map(|row| (row.name.to_lowercase(), row.id))
        .collect();

    let mut missing = BTreeSet::new();
    let mut resolved = Vec::with_capacity(plan.ingredients.len());
    for entry in &plan.ingredients {
        match by_name.get(&entry.name) {
            Some(id) => resolved.push(ResolvedIngredient {
                ingredient_id: *id,
                quantity: entry.quantity.clone(),
            }),
            None => {
                missing.insert(entry.name.clone());
            }
        }
    }

    if missing.is_empty() {
        Ok(resolved)
    } else {
        Err(MissingIngredientsError {
            names: missing.into_iter().collect(),
        })
    }
}

/// Tag names with no existing row, in input order.
pub fn missing_tag_names(names: &[String], existing: &[Tag]) -> Vec<String> {
    names
        .iter()
        .filter(|name| !existing.iter().any(|tag| tag.name.eq_ignore_ascii_case(name)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for catalogue resolution.
    use super::*;
    use crate::domain::ids::TagId;
    use crate::domain::recipe::{PlannedIngredient, RecipeFields};
    use rstest::{fixture, rstest};

    #[fixture]
    fn fields() -> RecipeFields {
        RecipeFields {
            title: "Stew".to_owned(),
            description: None,
            instructions: None,
            prep_time: None,
            cook_time: None,
        }
    }

    fn plan(fields: RecipeFields, names: &[&str]) -> RecipePlan {
        RecipePlan {
            fields,
            ingredients: names
                .iter()
                .map(|name| PlannedIngredient {
                    name: (*name).to_owned(),
                    quantity: Quantity::parse(Some("1 st")).expect("quantity"),
                })
                .collect(),
            tag_names: Vec::new(),
        }
    }

    fn summary(id: i32, name: &str) -> IngredientSummary {
        IngredientSummary {
            id: IngredientId::new(id),
            name: name.to_owned(),
        }
    }

    #[rstest]
    fn resolves_in_plan_order_with_quantities(fields: RecipeFields) {
        let found = vec![summary(2, "onion"), summary(1, "Beef")];

        let resolved = resolve_ingredients(&plan(fields, &["beef", "onion"]), &found)
            .expect("all present");

        let ids: Vec<i32> = resolved.iter().map(|r| r.ingredient_id.get()).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(resolved.iter().all(|r| r.quantity.is_some()));
    }

    #[rstest]
    fn missing_names_are_sorted_and_unique(fields: RecipeFields) {
        let found = vec![summary(1, "beef")];

        let err = resolve_ingredients(&plan(fields, &["zucchini", "beef", "carrot"]), &found)
            .expect_err("missing");

        assert_eq!(err.names(), ["carrot", "zucchini"]);
        assert_eq!(
            err.to_string(),
            "Unknown ingredients: carrot, zucchini. Add them to the ingredient list first."
        );
    }

    #[rstest]
    fn empty_plan_resolves_to_nothing(fields: RecipeFields) {
        let resolved = resolve_ingredients(&plan(fields, &[]), &[]).expect("empty");
        assert!(resolved.is_empty());
    }

    #[rstest]
    fn reports_only_absent_tags() {
        let existing = vec![Tag {
            id: TagId::new(1),
            name: "quick".to_owned(),
        }];
        let names = vec!["vegan".to_owned(), "quick".to_owned(), "cheap".to_owned()];

        assert_eq!(missing_tag_names(&names, &existing), vec!["vegan", "cheap"]);
    }
}
