//! HTTP handlers

pub mod health;
pub mod auth;
pub mod user;
pub mod api_key;
pub mod check;
