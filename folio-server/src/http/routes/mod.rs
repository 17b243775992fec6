//! Route handlers organized by resource

pub mod health;
pub mod auth;
pub mod about;
pub mod stats;
pub mod categories;
pub mod projects;
pub mod technologies;
pub mod upload;
