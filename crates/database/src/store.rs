// store.rs - store traits used by the API, backed by MongoDB in production

use crate::applicants::{
    model::{ApplicantModel, ApplicantUpdate, NewApplicant, PaymentStatus},
    query,
};
use crate::error::DbError;
use crate::tokens::{model::AuthToken, query as token_query};
use async_trait::async_trait;
use mongodb::Client;

/// Holds the one current gateway token.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn current_token(&self) -> Result<Option<AuthToken>, DbError>;
    /// Last writer wins; the record is always replaced whole.
    async fn save_token(&self, token: &AuthToken) -> Result<(), DbError>;
}

#[async_trait]
pub trait ApplicantStore: Send + Sync {
    async fn insert(&self, applicant: NewApplicant) -> Result<ApplicantModel, DbError>;
    async fn get(&self, id: i64) -> Result<Option<ApplicantModel>, DbError>;
    /// All applicants, newest first.
    async fn list(&self) -> Result<Vec<ApplicantModel>, DbError>;
    async fn set_payment_status(&self, id: i64, status: PaymentStatus) -> Result<bool, DbError>;
    async fn update(&self, id: i64, update: &ApplicantUpdate) -> Result<bool, DbError>;
    async fn delete(&self, id: i64) -> Result<bool, DbError>;
}

#[derive(Clone, Debug)]
pub struct MongoStore {
    pub client: Client,
    pub database: String,
}

impl MongoStore {
    pub fn new(client: Client, database: impl Into<String>) -> Self {
        MongoStore {
            client,
            database: database.into(),
        }
    }
}

#[async_trait]
impl TokenStore for MongoStore {
    async fn current_token(&self) -> Result<Option<AuthToken>, DbError> {
        token_query::get_token(&self.client, &self.database).await
    }

    async fn save_token(&self, token: &AuthToken) -> Result<(), DbError> {
        token_query::upsert_token(&self.client, &self.database, token).await
    }
}

#[async_trait]
impl ApplicantStore for MongoStore {
    async fn insert(&self, applicant: NewApplicant) -> Result<ApplicantModel, DbError> {
        query::insert_applicant(&self.client, &self.database, applicant).await
    }

    async fn get(&self, id: i64) -> Result<Option<ApplicantModel>, DbError> {
        query::get_applicant(&self.client, &self.database, id).await
    }

    async fn list(&self) -> Result<Vec<ApplicantModel>, DbError> {
        query::list_applicants(&self.client, &self.database).await
    }

    async fn set_payment_status(&self, id: i64, status: PaymentStatus) -> Result<bool, DbError> {
        query::update_payment_status(&self.client, &self.database, id, status).await
    }

    async fn update(&self, id: i64, update: &ApplicantUpdate) -> Result<bool, DbError> {
        query::update_applicant(&self.client, &self.database, id, update).await
    }

    async fn delete(&self, id: i64) -> Result<bool, DbError> {
        query::delete_applicant(&self.client, &self.database, id).await
    }
}
