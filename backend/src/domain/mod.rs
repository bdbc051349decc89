//! Domain primitives, aggregates and services.
//!
//! Purpose: hold the recipe sharing rules independent of HTTP and SQL.
//! Value types validate on construction; services orchestrate repositories
//! through the ports in [`ports`] and return transport agnostic [`Error`]s.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifier.
//! - Quantity, name normalisation and ingredient resolution helpers.
//! - RecipeService, CatalogueService, EngagementService, AccountServiceImpl
//!   and PresenceService: implementations of the driving ports.

pub mod access;
pub mod account_service;
pub mod auth;
pub mod catalogue;
pub mod catalogue_service;
pub mod comment;
pub mod deletion;
pub mod engagement_service;
pub mod error;
pub mod ids;
pub mod names;
pub mod ports;
pub mod presence;
pub mod presence_service;
pub mod quantity;
pub mod recipe;
pub mod recipe_assembly;
pub mod recipe_service;
pub mod resolver;
pub mod search;
pub mod trace_id;
pub mod user;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use self::access::{require_admin, require_admin_or_owner};
pub use self::account_service::{AccountServiceImpl, ensure_admin_invariant};
pub use self::auth::{
    AuthToken, LoginCredentials, LoginValidationError, PASSWORD_HASH_ROUNDS, PasswordHash,
};
pub use self::catalogue::{
    CatalogueName, CatalogueValidationError, Ingredient, IngredientSummary, Tag,
};
pub use self::catalogue_service::CatalogueService;
pub use self::comment::{
    Comment, CommentContent, CommentRecord, CommentValidationError, sort_newest_first,
};
pub use self::deletion::{
    COMMENT_DELETION_PLAN, CommentDeletionStep, RECIPE_DELETION_PLAN, RecipeDeletionStep,
};
pub use self::engagement_service::EngagementService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{CommentId, IngredientId, RecipeId, TagId, UserId};
pub use self::names::{
    DuplicateNamesError, NameListKind, ensure_unique, find_duplicates, normalize_name,
    normalize_names, split_terms,
};
pub use self::presence::{
    DEFAULT_PRESENCE_WINDOW_SECS, DeviceId, Heartbeat, MAX_PRESENCE_WINDOW_SECS,
    MIN_PRESENCE_WINDOW_SECS, OnlineCount, PresenceKey, PresenceRecord, PresenceValidationError,
    PresenceWindow, count_online,
};
pub use self::presence_service::PresenceService;
pub use self::quantity::{QUANTITY_FORMAT_MESSAGE, Quantity, QuantityUnit, QuantityValidationError};
pub use self::recipe::{
    IngredientLine, IngredientMeasurement, PlannedIngredient, RecipeDraft, RecipeFields,
    RecipePlan, RecipeRecord, RecipeValidationError, RecipeView,
};
pub use self::recipe_assembly::{
    CommentDecorations, RecipeDecorations, assemble_comments, assemble_recipes,
};
pub use self::recipe_service::RecipeService;
pub use self::resolver::{
    MissingIngredientsError, ResolvedIngredient, missing_tag_names, resolve_ingredients,
};
pub use self::search::{InvalidScopeError, RecipeSearch, SearchCandidate, SearchScope};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{USERNAME_MAX, User, UserValidationError, Username};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use recipe_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
