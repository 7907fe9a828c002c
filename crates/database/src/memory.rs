// memory.rs - in-memory stores for local runs and tests

use crate::applicants::model::{ApplicantModel, ApplicantUpdate, NewApplicant, PaymentStatus};
use crate::error::DbError;
use crate::store::{ApplicantStore, TokenStore};
use crate::tokens::model::AuthToken;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store implementing both store traits.
///
/// Clones share the same underlying data.
#[derive(Default, Clone)]
pub struct InMemoryStore {
    token: Arc<RwLock<Option<AuthToken>>>,
    token_writes: Arc<AtomicUsize>,
    applicants: Arc<RwLock<BTreeMap<i64, ApplicantModel>>>,
    // Last id handed out; never reused after a delete
    last_id: Arc<AtomicI64>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: AuthToken) -> Self {
        InMemoryStore {
            token: Arc::new(RwLock::new(Some(token))),
            ..Self::default()
        }
    }

    /// Number of times a token has been saved.
    pub fn token_writes(&self) -> usize {
        self.token_writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenStore for InMemoryStore {
    async fn current_token(&self) -> Result<Option<AuthToken>, DbError> {
        Ok(self.token.read().await.clone())
    }

    async fn save_token(&self, token: &AuthToken) -> Result<(), DbError> {
        *self.token.write().await = Some(token.clone());
        self.token_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl ApplicantStore for InMemoryStore {
    async fn insert(&self, applicant: NewApplicant) -> Result<ApplicantModel, DbError> {
        let mut applicants = self.applicants.write().await;
        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        let model = applicant.into_model(id);
        applicants.insert(id, model.clone());
        Ok(model)
    }

    async fn get(&self, id: i64) -> Result<Option<ApplicantModel>, DbError> {
        Ok(self.applicants.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<ApplicantModel>, DbError> {
        Ok(self.applicants.read().await.values().rev().cloned().collect())
    }

    async fn set_payment_status(&self, id: i64, status: PaymentStatus) -> Result<bool, DbError> {
        match self.applicants.write().await.get_mut(&id) {
            Some(applicant) => {
                applicant.payment_status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update(&self, id: i64, update: &ApplicantUpdate) -> Result<bool, DbError> {
        match self.applicants.write().await.get_mut(&id) {
            Some(applicant) => {
                update.apply_to(applicant);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, DbError> {
        Ok(self.applicants.write().await.remove(&id).is_some())
    }
}
