// tokens.rs - the single cached payment gateway token

pub mod model;
pub mod query;
