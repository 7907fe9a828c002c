// models.rs - request and response bodies of the HTTP API

use chrono::{DateTime, TimeZone, Utc};
use database::applicants::model::{ApplicantModel, PaymentStatus};
use serde::{Deserialize, Serialize};

/// Applicant as served to the frontend. This is the only place the stored
/// snake_case record is turned into the camelCase wire shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantResponse {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub nid: String,
    pub last_degree: String,
    pub subject: String,
    pub apply_for: String,
    pub selected_subject: Option<String>,
    pub cv_url: Option<String>,
    pub photo_url: Option<String>,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl From<ApplicantModel> for ApplicantResponse {
    fn from(model: ApplicantModel) -> Self {
        let created_at = Utc
            .timestamp_millis_opt(model.created_at.timestamp_millis())
            .single()
            .unwrap_or_default();

        ApplicantResponse {
            id: model.id,
            name: model.name,
            phone: model.phone,
            email: model.email,
            address: model.address,
            nid: model.nid,
            last_degree: model.last_degree,
            subject: model.subject,
            apply_for: model.apply_for,
            selected_subject: model.selected_subject,
            cv_url: model.cv_url,
            photo_url: model.photo_url,
            payment_status: model.payment_status,
            created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub payment_status: PaymentStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayment {
    pub applicant_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePaymentResponse {
    #[serde(rename = "bkashURL")]
    pub bkash_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenStatus {
    pub expires_at: DateTime<Utc>,
    pub is_valid: bool,
    pub minutes_remaining: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: &str) -> Self {
        Message {
            message: message.to_string(),
        }
    }
}
