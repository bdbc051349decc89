//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types live next
//! to the repository that loads them.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{
    auth_tokens, comment_authors, comment_likes, ingredients, online_devices, recipe_authors,
    recipe_comments, recipe_favorites, recipe_ingredients, recipe_tags, recipes, tags, users,
};

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
}

/// Insertable struct for registering accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = auth_tokens)]
pub(crate) struct NewAuthTokenRow<'a> {
    pub token: &'a str,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Recipes
// ---------------------------------------------------------------------------

/// Row struct for reading from the recipes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecipeRow {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipes)]
pub(crate) struct NewRecipeRow<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub instructions: Option<&'a str>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Scalar overwrite; absent optional fields are cleared.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = recipes)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct RecipeUpdate<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub instructions: Option<&'a str>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipe_authors)]
pub(crate) struct RecipeAuthorRow {
    pub recipe_id: i32,
    pub user_id: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipe_ingredients)]
pub(crate) struct RecipeIngredientRow {
    pub recipe_id: i32,
    pub ingredient_id: i32,
    pub quantity: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipe_tags)]
pub(crate) struct RecipeTagRow {
    pub recipe_id: i32,
    pub tag_id: i32,
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct IngredientRow {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = ingredients)]
pub(crate) struct NewIngredientRow<'a> {
    pub name: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TagRow {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tags)]
pub(crate) struct NewTagRow<'a> {
    pub name: &'a str,
}

// ---------------------------------------------------------------------------
// Engagement
// ---------------------------------------------------------------------------

/// Row struct for reading from the recipe_comments table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recipe_comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: i32,
    pub recipe_id: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipe_comments)]
pub(crate) struct NewCommentRow<'a> {
    pub recipe_id: i32,
    pub content: &'a str,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comment_authors)]
pub(crate) struct CommentAuthorRow {
    pub comment_id: i32,
    pub user_id: i32,
}

/// Like link; `created_at` comes from the column default.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comment_likes)]
pub(crate) struct CommentLikeRow {
    pub comment_id: i32,
    pub user_id: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipe_favorites)]
pub(crate) struct FavoriteRow {
    pub recipe_id: i32,
    pub user_id: i32,
}

// ---------------------------------------------------------------------------
// Presence
// ---------------------------------------------------------------------------

/// Presence row used for reads and for the merged upsert.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = online_devices)]
#[diesel(primary_key(device_id))]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OnlineDeviceRow {
    pub device_id: String,
    pub user_id: Option<i32>,
    pub user_agent: Option<String>,
    pub last_seen_at: DateTime<Utc>,
}
