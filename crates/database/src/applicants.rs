// applicants.rs - applicant records submitted through the portal

pub mod filter;
pub mod model;
pub mod query;
