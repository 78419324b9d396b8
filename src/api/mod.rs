pub mod auth;
pub mod diagnosis;
pub mod disease;
pub mod error;
pub mod farm;
pub mod middleware;
pub mod notification;
pub mod treatment;
pub mod user;
