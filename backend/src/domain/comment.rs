//! Recipe comments.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{CommentId, RecipeId};

/// Validation errors for comment input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentValidationError {
    EmptyContent,
}

impl fmt::Display for CommentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyContent => f.write_str("Comment content is required"),
        }
    }
}

impl std::error::Error for CommentValidationError {}

/// Trimmed, non-empty comment body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentContent(String);

impl CommentContent {
    pub fn new(raw: &str) -> Result<Self, CommentValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CommentValidationError::EmptyContent);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for CommentContent {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Base comment row before decoration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRecord {
    pub id: CommentId,
    pub recipe_id: RecipeId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Comment decorated with its author and like count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub recipe_id: RecipeId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub created_by_username: Option<String>,
    pub like_count: i64,
}

impl Comment {
    /// Attach decorations to a base row.
    pub fn decorate(record: CommentRecord, author: Option<String>, like_count: i64) -> Self {
        Self {
            id: record.id,
            recipe_id: record.recipe_id,
            content: record.content,
            created_at: record.created_at,
            created_by_username: author,
            like_count,
        }
    }
}

/// Newest first; ties broken by the higher id.
pub fn sort_newest_first(comments: &mut [Comment]) {
    comments.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}
