//! Integer identifiers for persisted aggregates.
//!
//! Every table uses a serial primary key; wrapping each in its own type keeps
//! a comment id from being passed where a recipe id is expected.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Wrap a raw database identifier.
            pub const fn new(value: i32) -> Self {
                Self(value)
            }

            /// Raw database identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl From<i32> for $name {
            fn from(value: i32) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id! {
    /// Identifier of a recipe.
    RecipeId
}

define_id! {
    /// Identifier of a catalogue ingredient.
    IngredientId
}

define_id! {
    /// Identifier of a tag.
    TagId
}

define_id! {
    /// Identifier of a recipe comment.
    CommentId
}

define_id! {
    /// Identifier of a registered user.
    UserId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialises_as_bare_integer() {
        let json = serde_json::to_string(&RecipeId::new(42)).expect("serialise id");
        assert_eq!(json, "42");
        let back: CommentId = serde_json::from_str("7").expect("deserialise id");
        assert_eq!(back.get(), 7);
    }
}
