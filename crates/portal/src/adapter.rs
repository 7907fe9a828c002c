// adapter.rs - converts server applicant records into the client model
//
// The API answers in camelCase, older records and the admin export use
// snake_case. Both shapes land in the same [`PendingApplicant`].

use crate::pending::{PaymentStatus, PendingApplicant};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicantRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(rename = "applyFor", alias = "apply_for")]
    pub apply_for: String,
    #[serde(rename = "selectedSubject", alias = "selected_subject", default)]
    pub selected_subject: Option<String>,
    #[serde(rename = "paymentStatus", alias = "payment_status", default)]
    pub payment_status: PaymentStatus,
    #[serde(rename = "photoUrl", alias = "photo_url", default)]
    pub photo_url: Option<String>,
}

impl From<ApplicantRecord> for PendingApplicant {
    fn from(record: ApplicantRecord) -> Self {
        let selected_subject = record
            .selected_subject
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty() && s != "N/A");
        PendingApplicant {
            id: record.id,
            name: record.name,
            phone: record.phone,
            apply_for: record.apply_for,
            selected_subject,
            payment_status: record.payment_status,
            photo_url: record.photo_url.filter(|p| !p.is_empty()),
        }
    }
}
