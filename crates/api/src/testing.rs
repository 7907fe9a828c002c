// testing.rs - fakes shared by the API unit tests

use crate::config::Config;
use crate::fees::FeeTable;
use crate::gateway::{GatewayError, PaymentGateway, PaymentRequest};
use crate::token_gate::{TokenGate, DEFAULT_TOKEN_LIFETIME_MINUTES};
use async_trait::async_trait;
use database::applicants::model::{ApplicantModel, ApplicantUpdate, NewApplicant, PaymentStatus};
use database::memory::InMemoryStore;
use database::store::ApplicantStore;
use database::DbError;
use reqwest::StatusCode;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use url::Url;

#[derive(Default)]
pub struct FakeGateway {
    grants: AtomicUsize,
    creates: Mutex<Vec<(String, PaymentRequest)>>,
    delay: Option<std::time::Duration>,
    fail_grant: bool,
    fail_create: bool,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: std::time::Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing_grant(mut self) -> Self {
        self.fail_grant = true;
        self
    }

    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub fn grant_calls(&self) -> usize {
        self.grants.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> Vec<(String, PaymentRequest)> {
        self.creates.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn grant_token(&self) -> Result<String, GatewayError> {
        let n = self.grants.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_grant {
            return Err(GatewayError::InvalidResponse("no id_token".to_string()));
        }
        Ok(format!("token-{}", n))
    }

    async fn create_payment(&self, token: &str, request: &PaymentRequest) -> Result<Url, GatewayError> {
        if self.fail_create {
            return Err(GatewayError::Status(
                StatusCode::SERVICE_UNAVAILABLE,
                "maintenance".to_string(),
            ));
        }
        self.creates
            .lock()
            .unwrap()
            .push((token.to_string(), request.clone()));
        Url::parse(&format!(
            "https://sandbox.bka.sh/checkout?invoice={}",
            request.invoice_number
        ))
        .map_err(|e| GatewayError::InvalidResponse(e.to_string()))
    }
}

/// Applicant store whose database is down.
pub struct UnavailableApplicants;

fn unavailable() -> DbError {
    DbError::Counter("applicants".to_string())
}

#[async_trait]
impl ApplicantStore for UnavailableApplicants {
    async fn insert(&self, _applicant: NewApplicant) -> Result<ApplicantModel, DbError> {
        Err(unavailable())
    }

    async fn get(&self, _id: i64) -> Result<Option<ApplicantModel>, DbError> {
        Err(unavailable())
    }

    async fn list(&self) -> Result<Vec<ApplicantModel>, DbError> {
        Err(unavailable())
    }

    async fn set_payment_status(&self, _id: i64, _status: PaymentStatus) -> Result<bool, DbError> {
        Err(unavailable())
    }

    async fn update(&self, _id: i64, _update: &ApplicantUpdate) -> Result<bool, DbError> {
        Err(unavailable())
    }

    async fn delete(&self, _id: i64) -> Result<bool, DbError> {
        Err(unavailable())
    }
}

pub fn test_config(store: &InMemoryStore, gateway: Arc<FakeGateway>, uploads_dir: &Path) -> Config {
    let token_gate = TokenGate::new(
        Arc::new(store.clone()),
        gateway.clone(),
        chrono::Duration::minutes(DEFAULT_TOKEN_LIFETIME_MINUTES),
    );

    Config {
        applicants: Arc::new(store.clone()),
        tokens: Arc::new(store.clone()),
        gateway,
        token_gate: Arc::new(token_gate),
        fees: FeeTable::default(),
        uploads_dir: uploads_dir.to_path_buf(),
        public_url: "http://localhost:5173".to_string(),
    }
}
