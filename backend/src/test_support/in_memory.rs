//! In-memory implementation of every driven repository port.
//!
//! [`InMemoryStore`] mirrors the PostgreSQL adapters closely enough for
//! service and HTTP level tests: ids are sequential, names are unique
//! ignoring case, listings use the same orderings and deletes walk the
//! shared deletion plans.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    AuthTokenRepository, AuthTokenRepositoryError, CatalogueRepository, CatalogueRepositoryError,
    EngagementRepository, EngagementRepositoryError, IngredientDeletion, NewUser,
    PresenceRepository, PresenceRepositoryError, RecipeRepository, RecipeRepositoryError,
    RecipeWrite, StoredUser, UserPersistenceError, UserRepository,
};
use crate::domain::{
    AuthToken, COMMENT_DELETION_PLAN, CatalogueName, CommentContent, CommentDecorations,
    CommentDeletionStep, CommentId, CommentRecord, DeviceId, Heartbeat, Ingredient, IngredientId,
    IngredientMeasurement, IngredientSummary, PresenceRecord, RECIPE_DELETION_PLAN,
    RecipeDecorations, RecipeDeletionStep, RecipeId, RecipeRecord, RecipeSearch, SearchCandidate,
    Tag, TagId, User, UserId, Username,
};

#[derive(Debug, Clone)]
struct StoredRecipe {
    record: RecipeRecord,
    ingredients: Vec<(IngredientId, Option<String>)>,
    tags: Vec<TagId>,
}

#[derive(Debug, Default)]
struct State {
    next_id: i32,
    users: Vec<StoredUser>,
    tokens: HashMap<String, (UserId, DateTime<Utc>)>,
    ingredients: BTreeMap<IngredientId, String>,
    tags: BTreeMap<TagId, String>,
    recipes: BTreeMap<RecipeId, StoredRecipe>,
    recipe_authors: HashMap<RecipeId, UserId>,
    comments: BTreeMap<CommentId, CommentRecord>,
    comment_authors: HashMap<CommentId, UserId>,
    likes: BTreeSet<(CommentId, UserId)>,
    favorites: Vec<(RecipeId, UserId, i32)>,
    presence: HashMap<DeviceId, PresenceRecord>,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn username(&self, id: UserId) -> Option<String> {
        self.users
            .iter()
            .find(|stored| stored.user.id == id)
            .map(|stored| stored.user.username.to_string())
    }

    fn ingredient_named(&self, name: &str) -> Option<IngredientId> {
        self.ingredients
            .iter()
            .find(|(_, existing)| existing.eq_ignore_ascii_case(name))
            .map(|(id, _)| *id)
    }

    fn tag_named(&self, name: &str) -> Option<TagId> {
        self.tags
            .iter()
            .find(|(_, existing)| existing.eq_ignore_ascii_case(name))
            .map(|(id, _)| *id)
    }

    fn recipe_count(&self, id: IngredientId) -> i64 {
        let linked = self
            .recipes
            .values()
            .filter(|recipe| recipe.ingredients.iter().any(|(linked, _)| *linked == id))
            .count();
        i64::try_from(linked).unwrap_or(i64::MAX)
    }

    fn ingredient(&self, id: IngredientId) -> Option<Ingredient> {
        self.ingredients.get(&id).map(|name| Ingredient {
            id,
            name: name.clone(),
            recipe_count: self.recipe_count(id),
        })
    }

    /// Resolve tag names to ids, creating the absent ones.
    fn link_tags(&mut self, names: &[String]) -> Vec<TagId> {
        names
            .iter()
            .map(|name| match self.tag_named(name) {
                Some(id) => id,
                None => {
                    let id = TagId::new(self.next_id());
                    self.tags.insert(id, name.clone());
                    id
                }
            })
            .collect()
    }

    fn apply_write(&mut self, write: &RecipeWrite) -> (Vec<(IngredientId, Option<String>)>, Vec<TagId>) {
        let ingredients = write
            .ingredients
            .iter()
            .map(|line| {
                (
                    line.ingredient_id,
                    line.quantity.as_ref().map(ToString::to_string),
                )
            })
            .collect();
        let tags = self.link_tags(&write.tag_names);
        (ingredients, tags)
    }

    fn ingredient_names(&self, recipe: &StoredRecipe) -> Vec<String> {
        recipe
            .ingredients
            .iter()
            .filter_map(|(id, _)| self.ingredients.get(id).cloned())
            .collect()
    }

    fn tag_names(&self, recipe: &StoredRecipe) -> Vec<String> {
        recipe
            .tags
            .iter()
            .filter_map(|id| self.tags.get(id).cloned())
            .collect()
    }

    fn recipe_comment_ids(&self, recipe_id: RecipeId) -> Vec<CommentId> {
        self.comments
            .values()
            .filter(|comment| comment.recipe_id == recipe_id)
            .map(|comment| comment.id)
            .collect()
    }

    fn like_count(&self, comment_id: CommentId) -> i64 {
        let likes = self
            .likes
            .iter()
            .filter(|(liked, _)| *liked == comment_id)
            .count();
        i64::try_from(likes).unwrap_or(i64::MAX)
    }

    fn delete_recipe_step(&mut self, step: RecipeDeletionStep, id: RecipeId) -> usize {
        let comment_ids = self.recipe_comment_ids(id);
        match step {
            RecipeDeletionStep::CommentLikes => {
                let before = self.likes.len();
                self.likes
                    .retain(|(comment_id, _)| !comment_ids.contains(comment_id));
                before - self.likes.len()
            }
            RecipeDeletionStep::CommentAuthors => comment_ids
                .iter()
                .filter(|comment_id| self.comment_authors.remove(comment_id).is_some())
                .count(),
            RecipeDeletionStep::Comments => comment_ids
                .iter()
                .filter(|comment_id| self.comments.remove(comment_id).is_some())
                .count(),
            RecipeDeletionStep::Favorites => {
                let before = self.favorites.len();
                self.favorites.retain(|(recipe_id, _, _)| *recipe_id != id);
                before - self.favorites.len()
            }
            RecipeDeletionStep::RecipeAuthor => usize::from(self.recipe_authors.remove(&id).is_some()),
            RecipeDeletionStep::IngredientLinks => self
                .recipes
                .get_mut(&id)
                .map_or(0, |recipe| std::mem::take(&mut recipe.ingredients).len()),
            RecipeDeletionStep::TagLinks => self
                .recipes
                .get_mut(&id)
                .map_or(0, |recipe| std::mem::take(&mut recipe.tags).len()),
            RecipeDeletionStep::Recipe => usize::from(self.recipes.remove(&id).is_some()),
        }
    }

    fn delete_comment_step(&mut self, step: CommentDeletionStep, id: CommentId) -> usize {
        match step {
            CommentDeletionStep::Likes => {
                let before = self.likes.len();
                self.likes.retain(|(comment_id, _)| *comment_id != id);
                before - self.likes.len()
            }
            CommentDeletionStep::Author => usize::from(self.comment_authors.remove(&id).is_some()),
            CommentDeletionStep::Comment => usize::from(self.comments.remove(&id).is_some()),
        }
    }
}

fn by_name_then_id<I: Ord>(left: &(I, String), right: &(I, String)) -> std::cmp::Ordering {
    left.1
        .to_lowercase()
        .cmp(&right.1.to_lowercase())
        .then_with(|| left.0.cmp(&right.0))
}

/// Shared in-memory store implementing all repository ports.
///
/// Clones share state, so one store can back every service in a test.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of comment like rows currently stored.
    pub fn like_rows(&self) -> usize {
        self.lock().likes.len()
    }

    /// Number of favourite rows currently stored.
    pub fn favorite_rows(&self) -> usize {
        self.lock().favorites.len()
    }

    /// Number of comment rows currently stored.
    pub fn comment_rows(&self) -> usize {
        self.lock().comments.len()
    }

    /// Stored presence row for a device.
    pub fn presence_record(&self, device_id: &DeviceId) -> Option<PresenceRecord> {
        self.lock().presence.get(device_id).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<StoredUser>, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|stored| stored.user.username == *username)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|stored| stored.user.id == id)
            .map(|stored| stored.user.clone()))
    }

    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut state = self.lock();
        if state
            .users
            .iter()
            .any(|stored| stored.user.username == user.username)
        {
            return Err(UserPersistenceError::duplicate_username(
                user.username.to_string(),
            ));
        }
        let created = User {
            id: UserId::new(state.next_id()),
            username: user.username.clone(),
            is_admin: user.is_admin,
        };
        state.users.push(StoredUser {
            user: created.clone(),
            password_hash: user.password_hash.clone(),
        });
        Ok(created)
    }

    async fn has_admin(&self) -> Result<bool, UserPersistenceError> {
        Ok(self.lock().users.iter().any(|stored| stored.user.is_admin))
    }

    async fn promote_earliest_user(&self) -> Result<Option<User>, UserPersistenceError> {
        let mut state = self.lock();
        Ok(state
            .users
            .iter_mut()
            .min_by_key(|stored| stored.user.id)
            .map(|stored| {
                stored.user.is_admin = true;
                stored.user.clone()
            }))
    }
}

#[async_trait]
impl AuthTokenRepository for InMemoryStore {
    async fn insert(
        &self,
        token: &AuthToken,
        user_id: UserId,
        issued_at: DateTime<Utc>,
    ) -> Result<(), AuthTokenRepositoryError> {
        self.lock()
            .tokens
            .insert(token.as_str().to_owned(), (user_id, issued_at));
        Ok(())
    }

    async fn resolve(
        &self,
        token: &AuthToken,
        seen_at: DateTime<Utc>,
    ) -> Result<Option<User>, AuthTokenRepositoryError> {
        let mut state = self.lock();
        let Some(entry) = state.tokens.get_mut(token.as_str()) else {
            return Ok(None);
        };
        entry.1 = seen_at;
        let user_id = entry.0;
        Ok(state
            .users
            .iter()
            .find(|stored| stored.user.id == user_id)
            .map(|stored| stored.user.clone()))
    }
}

#[async_trait]
impl CatalogueRepository for InMemoryStore {
    async fn list_ingredients(&self) -> Result<Vec<Ingredient>, CatalogueRepositoryError> {
        let state = self.lock();
        let mut rows: Vec<_> = state
            .ingredients
            .iter()
            .map(|(id, name)| (*id, name.clone()))
            .collect();
        rows.sort_by(by_name_then_id);
        Ok(rows
            .into_iter()
            .filter_map(|(id, _)| state.ingredient(id))
            .collect())
    }

    async fn find_ingredients_by_names(
        &self,
        names: &[String],
    ) -> Result<Vec<IngredientSummary>, CatalogueRepositoryError> {
        let state = self.lock();
        Ok(names
            .iter()
            .filter_map(|name| state.ingredient_named(name))
            .filter_map(|id| state.ingredient(id))
            .map(|ingredient| ingredient.summary())
            .collect())
    }

    async fn find_ingredient(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, CatalogueRepositoryError> {
        Ok(self.lock().ingredient(id))
    }

    async fn insert_ingredient(
        &self,
        name: &CatalogueName,
    ) -> Result<Ingredient, CatalogueRepositoryError> {
        let mut state = self.lock();
        if state.ingredient_named(name.as_ref()).is_some() {
            return Err(CatalogueRepositoryError::duplicate_name(name.to_string()));
        }
        let id = IngredientId::new(state.next_id());
        state.ingredients.insert(id, name.to_string());
        Ok(Ingredient {
            id,
            name: name.to_string(),
            recipe_count: 0,
        })
    }

    async fn rename_ingredient(
        &self,
        id: IngredientId,
        name: &CatalogueName,
    ) -> Result<Option<Ingredient>, CatalogueRepositoryError> {
        let mut state = self.lock();
        if !state.ingredients.contains_key(&id) {
            return Ok(None);
        }
        if state
            .ingredient_named(name.as_ref())
            .is_some_and(|existing| existing != id)
        {
            return Err(CatalogueRepositoryError::duplicate_name(name.to_string()));
        }
        state.ingredients.insert(id, name.to_string());
        Ok(state.ingredient(id))
    }

    async fn delete_ingredient(
        &self,
        id: IngredientId,
    ) -> Result<IngredientDeletion, CatalogueRepositoryError> {
        let mut state = self.lock();
        let Some(ingredient) = state.ingredient(id) else {
            return Ok(IngredientDeletion::NotFound);
        };
        if ingredient.recipe_count > 0 {
            return Ok(IngredientDeletion::InUse);
        }
        state.ingredients.remove(&id);
        Ok(IngredientDeletion::Deleted(ingredient))
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, CatalogueRepositoryError> {
        let mut rows: Vec<_> = self
            .lock()
            .tags
            .iter()
            .map(|(id, name)| (*id, name.clone()))
            .collect();
        rows.sort_by(by_name_then_id);
        Ok(rows
            .into_iter()
            .map(|(id, name)| Tag { id, name })
            .collect())
    }

    async fn insert_tag(&self, name: &CatalogueName) -> Result<Tag, CatalogueRepositoryError> {
        let mut state = self.lock();
        if state.tag_named(name.as_ref()).is_some() {
            return Err(CatalogueRepositoryError::duplicate_name(name.to_string()));
        }
        let id = TagId::new(state.next_id());
        state.tags.insert(id, name.to_string());
        Ok(Tag {
            id,
            name: name.to_string(),
        })
    }
}

#[async_trait]
impl RecipeRepository for InMemoryStore {
    async fn create(
        &self,
        author: UserId,
        write: &RecipeWrite,
        created_at: DateTime<Utc>,
    ) -> Result<RecipeId, RecipeRepositoryError> {
        let mut state = self.lock();
        let id = RecipeId::new(state.next_id());
        let (ingredients, tags) = state.apply_write(write);
        state.recipes.insert(
            id,
            StoredRecipe {
                record: RecipeRecord {
                    id,
                    fields: write.fields.clone(),
                    created_at,
                },
                ingredients,
                tags,
            },
        );
        state.recipe_authors.insert(id, author);
        Ok(id)
    }

    async fn update(
        &self,
        id: RecipeId,
        write: &RecipeWrite,
    ) -> Result<bool, RecipeRepositoryError> {
        let mut state = self.lock();
        if !state.recipes.contains_key(&id) {
            return Ok(false);
        }
        let (ingredients, tags) = state.apply_write(write);
        if let Some(recipe) = state.recipes.get_mut(&id) {
            recipe.record.fields = write.fields.clone();
            recipe.ingredients = ingredients;
            recipe.tags = tags;
        }
        Ok(true)
    }

    async fn delete(&self, id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut state = self.lock();
        let mut removed = 0;
        for step in RECIPE_DELETION_PLAN {
            let affected = state.delete_recipe_step(step, id);
            if step == RecipeDeletionStep::Recipe {
                removed = affected;
            }
        }
        Ok(removed > 0)
    }

    async fn exists(&self, id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        Ok(self.lock().recipes.contains_key(&id))
    }

    async fn list_records(
        &self,
        search: &RecipeSearch,
    ) -> Result<Vec<RecipeRecord>, RecipeRepositoryError> {
        let state = self.lock();
        let mut records: Vec<RecipeRecord> = state
            .recipes
            .values()
            .filter(|recipe| {
                let ingredient_names = state.ingredient_names(recipe);
                let tag_names = state.tag_names(recipe);
                search.matches(&SearchCandidate {
                    title: &recipe.record.fields.title,
                    description: recipe.record.fields.description.as_deref(),
                    ingredient_names: &ingredient_names,
                    tag_names: &tag_names,
                })
            })
            .map(|recipe| recipe.record.clone())
            .collect();
        records.sort_by(|left, right| {
            right
                .created_at
                .cmp(&left.created_at)
                .then_with(|| right.id.cmp(&left.id))
        });
        Ok(records)
    }

    async fn find_record(
        &self,
        id: RecipeId,
    ) -> Result<Option<RecipeRecord>, RecipeRepositoryError> {
        Ok(self
            .lock()
            .recipes
            .get(&id)
            .map(|recipe| recipe.record.clone()))
    }

    async fn load_decorations(
        &self,
        ids: &[RecipeId],
    ) -> Result<RecipeDecorations, RecipeRepositoryError> {
        let state = self.lock();
        let mut decorations = RecipeDecorations::default();
        for id in ids {
            let Some(recipe) = state.recipes.get(id) else {
                continue;
            };
            if let Some(name) = state
                .recipe_authors
                .get(id)
                .and_then(|author| state.username(*author))
            {
                decorations.authors.insert(*id, name);
            }

            let favorites = state
                .favorites
                .iter()
                .filter(|(recipe_id, _, _)| recipe_id == id)
                .count();
            decorations
                .favorite_counts
                .insert(*id, i64::try_from(favorites).unwrap_or(i64::MAX));

            let mut measurements: Vec<IngredientMeasurement> = recipe
                .ingredients
                .iter()
                .filter_map(|(ingredient_id, quantity)| {
                    state
                        .ingredients
                        .get(ingredient_id)
                        .map(|name| IngredientMeasurement {
                            ingredient_id: *ingredient_id,
                            name: name.clone(),
                            quantity: quantity.clone(),
                        })
                })
                .collect();
            measurements.sort_by(|left, right| {
                left.name
                    .to_lowercase()
                    .cmp(&right.name.to_lowercase())
                    .then_with(|| left.ingredient_id.cmp(&right.ingredient_id))
            });
            decorations.measurements.insert(*id, measurements);

            let mut tags: Vec<_> = recipe
                .tags
                .iter()
                .filter_map(|tag_id| state.tags.get(tag_id).map(|name| (*tag_id, name.clone())))
                .collect();
            tags.sort_by(by_name_then_id);
            decorations.tags.insert(
                *id,
                tags.into_iter().map(|(id, name)| Tag { id, name }).collect(),
            );

            let comments: Vec<CommentRecord> = state
                .comments
                .values()
                .filter(|comment| comment.recipe_id == *id)
                .cloned()
                .collect();
            for comment in &comments {
                if let Some(name) = state
                    .comment_authors
                    .get(&comment.id)
                    .and_then(|author| state.username(*author))
                {
                    decorations.comment_authors.insert(comment.id, name);
                }
                decorations
                    .comment_likes
                    .insert(comment.id, state.like_count(comment.id));
            }
            decorations.comments.insert(*id, comments);
        }
        Ok(decorations)
    }

    async fn author_of(&self, id: RecipeId) -> Result<Option<UserId>, RecipeRepositoryError> {
        Ok(self.lock().recipe_authors.get(&id).copied())
    }
}

#[async_trait]
impl EngagementRepository for InMemoryStore {
    async fn list_comments(
        &self,
        recipe_id: RecipeId,
    ) -> Result<Vec<CommentRecord>, EngagementRepositoryError> {
        let mut comments: Vec<CommentRecord> = self
            .lock()
            .comments
            .values()
            .filter(|comment| comment.recipe_id == recipe_id)
            .cloned()
            .collect();
        comments.sort_by(|left, right| {
            right
                .created_at
                .cmp(&left.created_at)
                .then_with(|| right.id.cmp(&left.id))
        });
        Ok(comments)
    }

    async fn comment_decorations(
        &self,
        ids: &[CommentId],
    ) -> Result<CommentDecorations, EngagementRepositoryError> {
        let state = self.lock();
        let mut decorations = CommentDecorations::default();
        for id in ids {
            if let Some(name) = state
                .comment_authors
                .get(id)
                .and_then(|author| state.username(*author))
            {
                decorations.authors.insert(*id, name);
            }
            decorations.likes.insert(*id, state.like_count(*id));
        }
        Ok(decorations)
    }

    async fn insert_comment(
        &self,
        recipe_id: RecipeId,
        author: UserId,
        content: &CommentContent,
        created_at: DateTime<Utc>,
    ) -> Result<CommentRecord, EngagementRepositoryError> {
        let mut state = self.lock();
        let record = CommentRecord {
            id: CommentId::new(state.next_id()),
            recipe_id,
            content: content.as_ref().to_owned(),
            created_at,
        };
        state.comments.insert(record.id, record.clone());
        state.comment_authors.insert(record.id, author);
        Ok(record)
    }

    async fn find_comment(
        &self,
        recipe_id: RecipeId,
        comment_id: CommentId,
    ) -> Result<Option<CommentRecord>, EngagementRepositoryError> {
        Ok(self
            .lock()
            .comments
            .get(&comment_id)
            .filter(|comment| comment.recipe_id == recipe_id)
            .cloned())
    }

    async fn comment_author(
        &self,
        comment_id: CommentId,
    ) -> Result<Option<UserId>, EngagementRepositoryError> {
        Ok(self.lock().comment_authors.get(&comment_id).copied())
    }

    async fn delete_comment(
        &self,
        comment_id: CommentId,
    ) -> Result<bool, EngagementRepositoryError> {
        let mut state = self.lock();
        let mut removed = 0;
        for step in COMMENT_DELETION_PLAN {
            let affected = state.delete_comment_step(step, comment_id);
            if step == CommentDeletionStep::Comment {
                removed = affected;
            }
        }
        Ok(removed > 0)
    }

    async fn add_like(
        &self,
        comment_id: CommentId,
        user_id: UserId,
    ) -> Result<(), EngagementRepositoryError> {
        self.lock().likes.insert((comment_id, user_id));
        Ok(())
    }

    async fn remove_like(
        &self,
        comment_id: CommentId,
        user_id: UserId,
    ) -> Result<(), EngagementRepositoryError> {
        self.lock().likes.remove(&(comment_id, user_id));
        Ok(())
    }

    async fn liked_comment_ids(
        &self,
        recipe_id: RecipeId,
        user_id: UserId,
    ) -> Result<Vec<CommentId>, EngagementRepositoryError> {
        let state = self.lock();
        Ok(state
            .likes
            .iter()
            .filter(|(comment_id, liker)| {
                *liker == user_id
                    && state
                        .comments
                        .get(comment_id)
                        .is_some_and(|comment| comment.recipe_id == recipe_id)
            })
            .map(|(comment_id, _)| *comment_id)
            .collect())
    }

    async fn add_favorite(
        &self,
        recipe_id: RecipeId,
        user_id: UserId,
    ) -> Result<(), EngagementRepositoryError> {
        let mut state = self.lock();
        let present = state
            .favorites
            .iter()
            .any(|(recipe, user, _)| *recipe == recipe_id && *user == user_id);
        if !present {
            let sequence = state.next_id();
            state.favorites.push((recipe_id, user_id, sequence));
        }
        Ok(())
    }

    async fn remove_favorite(
        &self,
        recipe_id: RecipeId,
        user_id: UserId,
    ) -> Result<(), EngagementRepositoryError> {
        self.lock()
            .favorites
            .retain(|(recipe, user, _)| !(*recipe == recipe_id && *user == user_id));
        Ok(())
    }

    async fn favorite_recipe_ids(
        &self,
        user_id: UserId,
    ) -> Result<Vec<RecipeId>, EngagementRepositoryError> {
        let mut rows: Vec<_> = self
            .lock()
            .favorites
            .iter()
            .filter(|(_, user, _)| *user == user_id)
            .map(|(recipe, _, sequence)| (*sequence, *recipe))
            .collect();
        rows.sort_by(|left, right| right.cmp(left));
        Ok(rows.into_iter().map(|(_, recipe)| recipe).collect())
    }
}

#[async_trait]
impl PresenceRepository for InMemoryStore {
    async fn record(
        &self,
        heartbeat: &Heartbeat,
        seen_at: DateTime<Utc>,
    ) -> Result<(), PresenceRepositoryError> {
        let mut state = self.lock();
        let merged = heartbeat.apply_to(state.presence.get(&heartbeat.device_id), seen_at);
        state.presence.insert(merged.device_id.clone(), merged);
        Ok(())
    }

    async fn remove(&self, device_id: &DeviceId) -> Result<(), PresenceRepositoryError> {
        self.lock().presence.remove(device_id);
        Ok(())
    }

    async fn list_since(
        &self,
        threshold: DateTime<Utc>,
    ) -> Result<Vec<PresenceRecord>, PresenceRepositoryError> {
        Ok(self
            .lock()
            .presence
            .values()
            .filter(|record| record.last_seen_at >= threshold)
            .cloned()
            .collect())
    }
}
