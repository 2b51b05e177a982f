//! HTTP request handlers, one module per resource.

pub mod account;
pub mod admin;
pub mod auth;
pub mod cards;
pub mod favorites;
pub mod interventions;
pub mod reservations;
pub mod security;
pub mod spaces;
pub mod tech;
