//! Shared fixtures for domain service unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{IngredientLine, RecipeDraft, RecipeFields, User, UserId, Username};

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

pub(crate) fn admin() -> User {
    User {
        id: UserId::new(1),
        username: Username::new("admin").expect("valid username"),
        is_admin: true,
    }
}

pub(crate) fn member(id: i32) -> User {
    User {
        id: UserId::new(id),
        username: Username::new(format!("member{id}")).expect("valid username"),
        is_admin: false,
    }
}

pub(crate) fn draft(ingredients: &[(&str, Option<&str>)], tags: &[&str]) -> RecipeDraft {
    RecipeDraft {
        fields: RecipeFields {
            title: "Pancakes".to_owned(),
            description: Some("Thin and crisp".to_owned()),
            instructions: Some("Whisk, rest, fry.".to_owned()),
            prep_time: Some(10),
            cook_time: Some(15),
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
