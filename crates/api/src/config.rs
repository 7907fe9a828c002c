// config.rs - shared state handed to every request handler

use crate::fees::FeeTable;
use crate::gateway::PaymentGateway;
use crate::token_gate::TokenGate;
use database::store::{ApplicantStore, TokenStore};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct Config {
    pub applicants: Arc<dyn ApplicantStore>,
    pub tokens: Arc<dyn TokenStore>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub token_gate: Arc<TokenGate>,
    pub fees: FeeTable,
    pub uploads_dir: PathBuf,
    // Origin of the single-page frontend, used for callback redirects
    pub public_url: String,
}
