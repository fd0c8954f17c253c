pub mod admin;
pub mod auth;
pub mod keys;
pub mod stats;
