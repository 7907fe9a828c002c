// lib.rs - models, queries and store abstractions for the recruitment portal database

pub mod applicants;
pub mod counters;
pub mod error;
pub mod memory;
pub mod store;
pub mod tokens;

pub use error::DbError;
