//! Explicit delete order for aggregates that own child rows.
//!
//! The schema declares no `ON DELETE CASCADE`; adapters walk these plans in
//! order inside one transaction so no step ever leaves a dangling reference.

/// Rows removed when a recipe is deleted, children first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeDeletionStep {
    /// Likes on any of the recipe's comments.
    CommentLikes,
    /// Author links of the recipe's comments.
    CommentAuthors,
    /// The recipe's comments.
    Comments,
    /// Favourites pointing at the recipe.
    Favorites,
    /// The recipe's author link.
    RecipeAuthor,
    /// Ingredient associations and their quantities.
    IngredientLinks,
    /// Tag associations.
    TagLinks,
    /// The recipe row itself.
    Recipe,
}

/// Ordered recipe deletion plan.
pub const RECIPE_DELETION_PLAN: [RecipeDeletionStep; 8] = [
    RecipeDeletionStep::CommentLikes,
    RecipeDeletionStep::CommentAuthors,
    RecipeDeletionStep::Comments,
    RecipeDeletionStep::Favorites,
    RecipeDeletionStep::RecipeAuthor,
    RecipeDeletionStep::IngredientLinks,
    RecipeDeletionStep::TagLinks,
    RecipeDeletionStep::Recipe,
];

/// Rows removed when a single comment is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentDeletionStep {
    Likes,
    Author,
    Comment,
}

/// Ordered comment deletion plan.
pub const COMMENT_DELETION_PLAN: [CommentDeletionStep; 3] = [
    CommentDeletionStep::Likes,
    CommentDeletionStep::Author,
    CommentDeletionStep::Comment,
];

#[cfg(test)]
mod tests {
    use super::*;

    fn position(step: RecipeDeletionStep) -> usize {
        RECIPE_DELETION_PLAN
            .iter()
            .position(|candidate| *candidate == step)
            .expect("step is planned")
    }

    #[test]
    fn recipe_row_goes_last() {
        assert_eq!(RECIPE_DELETION_PLAN.last(), Some(&RecipeDeletionStep::Recipe));
    }

    #[test]
    fn comment_children_precede_comments() {
        assert!(position(RecipeDeletionStep::CommentLikes) < position(RecipeDeletionStep::Comments));
        assert!(position(RecipeDeletionStep::CommentAuthors) < position(RecipeDeletionStep::Comments));
    }

    #[test]
    fn comment_row_goes_last() {
        assert_eq!(COMMENT_DELETION_PLAN.last(), Some(&CommentDeletionStep::Comment));
    }
}
