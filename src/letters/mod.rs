use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod generator;
pub mod handlers;
pub mod repo;
pub mod services;

pub fn router() -> Router<AppState> {
    handlers::letter_routes()
}
