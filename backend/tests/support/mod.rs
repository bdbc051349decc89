//! Shared harness: real domain services over one in-memory store.
#![allow(dead_code, reason = "each suite uses a different subset")]

pub mod embedded_postgres;

use std::sync::Arc;

use recipe_backend::domain::ports::{
    AccountService, CatalogueCommand, CatalogueQuery, EngagementCommand, EngagementQuery,
    PresenceCommand, PresenceQuery, RecipeCommand, RecipeQuery,
};
use recipe_backend::domain::{
    IngredientLine, LoginCredentials, PresenceWindow, RecipeDraft, RecipeFields, User,
};
use recipe_backend::inbound::http::state::HttpState;
use recipe_backend::test_support::{InMemoryStore, ManualClock, in_memory_http_state};

pub struct Harness {
    pub store: InMemoryStore,
    pub clock: ManualClock,
    pub state: HttpState,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_window(PresenceWindow::default())
    }

    pub fn with_window(window: PresenceWindow) -> Self {
        let store = InMemoryStore::new();
        let clock = ManualClock::fixed();
        let state = in_memory_http_state(&store, Arc::new(clock.clone()), window);
        Self {
            store,
            clock,
            state,
        }
    }

    pub fn accounts(&self) -> &dyn AccountService {
        self.state.accounts.as_ref()
    }

    pub fn recipes(&self) -> &dyn RecipeCommand {
        self.state.recipes.as_ref()
    }

    pub fn recipes_query(&self) -> &dyn RecipeQuery {
        self.state.recipes_query.as_ref()
    }

    pub fn catalogue(&self) -> &dyn CatalogueCommand {
        self.state.catalogue.as_ref()
    }

    pub fn catalogue_query(&self) -> &dyn CatalogueQuery {
        self.state.catalogue_query.as_ref()
    }

    pub fn engagement(&self) -> &dyn EngagementCommand {
        self.state.engagement.as_ref()
    }

    pub fn engagement_query(&self) -> &dyn EngagementQuery {
        self.state.engagement_query.as_ref()
    }

    pub fn presence(&self) -> &dyn PresenceCommand {
        self.state.presence.as_ref()
    }

    pub fn presence_query(&self) -> &dyn PresenceQuery {
        self.state.presence_query.as_ref()
    }

    pub async fn register(&self, username: &str) -> User {
        let credentials =
            LoginCredentials::try_from_parts(username, "correct horse").expect("valid credentials");
        self.accounts()
            .register(&credentials)
            .await
            .expect("registration succeeds")
    }

    pub async fn seed_ingredients(&self, admin: &User, names: &[&str]) {
        for name in names {
            self.catalogue()
                .create_ingredient(admin, name)
                .await
                .expect("ingredient created");
        }
    }
}

pub fn draft(title: &str, ingredients: &[(&str, Option<&str>)], tags: &[&str]) -> RecipeDraft {
    RecipeDraft {
        fields: RecipeFields {
            title: title.to_owned(),
            description: None,
            instructions: Some("Mix and serve.".to_owned()),
            prep_time: Some(5),
            cook_time: None,
        },
        ingredients: ingredients
            .iter()
            .map(|(name, quantity)| IngredientLine {
                name: (*name).to_owned(),
                quantity: quantity.map(str::to_owned),
            })
            .collect(),
        tags: tags.iter().map(|tag| (*tag).to_owned()).collect(),
    }
}
