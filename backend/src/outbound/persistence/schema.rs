//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When a
//! migration changes a table, regenerate with `diesel print-schema` or edit
//! by hand.

diesel::table! {
    /// Registered accounts. `username` is stored normalised.
    users (id) {
        id -> Int4,
        username -> Text,
        password_hash -> Text,
        is_admin -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Opaque bearer tokens. Never expire.
    auth_tokens (token) {
        token -> Text,
        user_id -> Int4,
        created_at -> Timestamptz,
        last_seen_at -> Timestamptz,
    }
}

diesel::table! {
    recipes (id) {
        id -> Int4,
        title -> Text,
        description -> Nullable<Text>,
        instructions -> Nullable<Text>,
        prep_time -> Nullable<Int4>,
        cook_time -> Nullable<Int4>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// First writer of a recipe. One row per recipe.
    recipe_authors (recipe_id) {
        recipe_id -> Int4,
        user_id -> Int4,
    }
}

diesel::table! {
    /// Curated ingredient vocabulary, unique on `lower(name)`.
    ingredients (id) {
        id -> Int4,
        name -> Text,
    }
}

diesel::table! {
    /// Recipe to ingredient link carrying the normalised quantity.
    recipe_ingredients (recipe_id, ingredient_id) {
        recipe_id -> Int4,
        ingredient_id -> Int4,
        quantity -> Nullable<Text>,
    }
}

diesel::table! {
    /// Free-form labels, unique on `lower(name)`.
    tags (id) {
        id -> Int4,
        name -> Text,
    }
}

diesel::table! {
    recipe_tags (recipe_id, tag_id) {
        recipe_id -> Int4,
        tag_id -> Int4,
    }
}

diesel::table! {
    recipe_comments (id) {
        id -> Int4,
        recipe_id -> Int4,
        content -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    comment_authors (comment_id) {
        comment_id -> Int4,
        user_id -> Int4,
    }
}

diesel::table! {
    comment_likes (comment_id, user_id) {
        comment_id -> Int4,
        user_id -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    recipe_favorites (recipe_id, user_id) {
        recipe_id -> Int4,
        user_id -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Latest heartbeat per client device.
    online_devices (device_id) {
        device_id -> Text,
        user_id -> Nullable<Int4>,
        user_agent -> Nullable<Text>,
        last_seen_at -> Timestamptz,
    }
}

diesel::joinable!(auth_tokens -> users (user_id));
diesel::joinable!(recipe_authors -> recipes (recipe_id));
diesel::joinable!(recipe_authors -> users (user_id));
diesel::joinable!(recipe_ingredients -> recipes (recipe_id));
diesel::joinable!(recipe_ingredients -> ingredients (ingredient_id));
diesel::joinable!(recipe_tags -> recipes (recipe_id));
diesel::joinable!(recipe_tags -> tags (tag_id));
diesel::joinable!(recipe_comments -> recipes (recipe_id));
diesel::joinable!(comment_authors -> recipe_comments (comment_id));
diesel::joinable!(comment_authors -> users (user_id));
diesel::joinable!(comment_likes -> recipe_comments (comment_id));
diesel::joinable!(comment_likes -> users (user_id));
diesel::joinable!(recipe_favorites -> recipes (recipe_id));
diesel::joinable!(recipe_favorites -> users (user_id));
diesel::joinable!(online_devices -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    auth_tokens,
    recipes,
    recipe_authors,
    ingredients,
    recipe_ingredients,
    tags,
    recipe_tags,
    recipe_comments,
    comment_authors,
    comment_likes,
    recipe_favorites,
    online_devices,
);

diesel::define_sql_function! {
    /// SQL `lower(text)`.
    fn lower(value: diesel::sql_types::Text) -> diesel::sql_types::Text;
}
