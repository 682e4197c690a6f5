//! Shared helpers for trivia integration tests: logging, unique ids and
//! JSON fixtures for seeding a document store.

pub mod fixtures;
pub mod logging;
pub mod unique_helpers;

pub use unique_helpers::{unique_email, unique_str};
