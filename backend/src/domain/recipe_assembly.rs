//! Read-side composition of recipe views.
//!
//! Listing endpoints load base rows first, then fetch each decoration with
//! one batched query keyed by the full id set, then merge here. Nothing in
//! this module touches storage, so the merge can be tested in isolation.

use std::collections::HashMap;

use super::catalogue::{IngredientSummary, Tag};
use super::comment::{Comment, CommentRecord, sort_newest_first};
use super::ids::{CommentId, RecipeId};
use super::recipe::{IngredientMeasurement, RecipeRecord, RecipeView};

/// Batched decorations for a set of recipes.
///
/// Missing keys mean "nothing attached": no author link, zero favourites,
/// no ingredients and so on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeDecorations {
    pub authors: HashMap<RecipeId, String>,
    pub favorite_counts: HashMap<RecipeId, i64>,
    pub measurements: HashMap<RecipeId, Vec<IngredientMeasurement>>,
    pub tags: HashMap<RecipeId, Vec<Tag>>,
    pub comments: HashMap<RecipeId, Vec<CommentRecord>>,
    pub comment_authors: HashMap<CommentId, String>,
    pub comment_likes: HashMap<CommentId, i64>,
}

/// Decorations for a bare set of comments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentDecorations {
    pub authors: HashMap<CommentId, String>,
    pub likes: HashMap<CommentId, i64>,
}

/// Decorate comment rows and order them newest first.
pub fn assemble_comments(records: Vec<CommentRecord>, decorations: &CommentDecorations) -> Vec<Comment> {
    let mut comments: Vec<Comment> = records
        .into_iter()
        .map(|record| {
            let author = decorations.authors.get(&record.id).cloned();
            let likes = decorations.likes.get(&record.id).copied().unwrap_or(0);
            Comment::decorate(record, author, likes)
        })
        .collect();
    sort_newest_first(&mut comments);
    comments
}

/// Merge base rows with their decorations, preserving input order.
pub fn assemble_recipes(records: Vec<RecipeRecord>, mut decorations: RecipeDecorations) -> Vec<RecipeView> {
    let comment_decorations = CommentDecorations {
        authors: std::mem::take(&mut decorations.comment_authors),
        likes: std::mem::take(&mut decorations.comment_likes),
    };
    records
        .into_iter()
        .map(|record| {
            let id = record.id;
            let measurements = decorations.measurements.remove(&id).unwrap_or_default();
            let ingredients = measurements
                .iter()
                .map(|m| IngredientSummary {
                    id: m.ingredient_id,
                    name: m.name.clone(),
                })
                .collect();
            let comments = assemble_comments(
                decorations.comments.remove(&id).unwrap_or_default(),
                &comment_decorations,
            );
            RecipeView {
                id,
                fields: record.fields,
                created_at: record.created_at,
                created_by_username: decorations.authors.remove(&id),
                favorite_count: decorations.favorite_counts.get(&id).copied().unwrap_or(0),
                ingredients,
                ingredient_measurements: measurements,
                tags: decorations.tags.remove(&id).unwrap_or_default(),
                comments,
            }
        })
        .collect()
}
