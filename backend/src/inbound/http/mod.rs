//! HTTP inbound adapter exposing REST endpoints.

pub mod accounts;
pub mod auth;
pub mod catalogue;
pub mod comments;
pub mod error;
pub mod favorites;
pub mod health;
pub mod presence;
pub mod recipes;
mod recipes_dto;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register every API handler on `cfg`.
///
/// Mount inside the versioned scope:
///
/// ```no_run
/// use actix_web::{App, web};
/// use recipe_backend::inbound::http::{configure, state::HttpState};
///
/// let app = App::new()
///     .app_data(web::Data::new(HttpState::default()))
///     .service(web::scope("/api/v1").configure(configure));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(accounts::register)
        .service(accounts::login)
        .service(accounts::me)
        .service(recipes::list_recipes)
        // Literal segments must precede `/recipes/{recipe_id}`.
        .service(recipes::search)
        .service(recipes::get_recipe)
        .service(recipes::create_recipe)
        .service(recipes::update_recipe)
        .service(recipes::delete_recipe)
        .service(comments::list_comments)
        .service(comments::liked_comments)
        .service(comments::add_comment)
        .service(comments::delete_comment)
        .service(comments::like_comment)
        .service(comments::unlike_comment)
        .service(favorites::list_favorites)
        .service(favorites::add_favorite)
        .service(favorites::remove_favorite)
        .service(catalogue::list_ingredients)
        .service(catalogue::create_ingredient)
        .service(catalogue::rename_ingredient)
        .service(catalogue::delete_ingredient)
        .service(catalogue::list_tags)
        .service(catalogue::create_tag)
        .service(presence::heartbeat)
        .service(presence::offline)
        .service(presence::online);
}
