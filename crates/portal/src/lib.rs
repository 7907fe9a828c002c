// lib.rs - client side of the recruitment portal
//
// Holds the routing state machine that decides which view is shown, the
// durable pending-applicant record that survives the redirect to bKash,
// and a small HTTP client for the portal API.

pub mod adapter;
pub mod client;
pub mod error;
pub mod history;
pub mod machine;
pub mod pending;
pub mod portal;
pub mod route;

pub use adapter::ApplicantRecord;
pub use client::{ApplicationForm, Document, PortalClient};
pub use error::{PortalError, Result};
pub use history::{History, MemoryHistory};
pub use machine::{transition, Event, Transition};
pub use pending::{FilePendingStore, MemoryPendingStore, PaymentStatus, PendingApplicant, PendingStore};
pub use portal::Portal;
pub use route::Route;
