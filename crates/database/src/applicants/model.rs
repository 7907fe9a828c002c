// database/applicants/model.rs - model for the applicants collection

use mongodb::{bson::doc, options::IndexOptions, Client, IndexModel};
use serde::{Deserialize, Serialize};
use tracing::error;

// Only this position carries a teaching subject
pub const SUBJECT_POSITION: &str = "Assistant Teacher";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[serde(rename = "Approved")]
    Approved,
    #[default]
    #[serde(rename = "Not Approved")]
    NotApproved,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Approved => "Approved",
            PaymentStatus::NotApproved => "Not Approved",
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "approved" => Ok(PaymentStatus::Approved),
            "not approved" | "not-approved" | "pending" => Ok(PaymentStatus::NotApproved),
            other => Err(format!("Unknown payment status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantModel {
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
    #[serde(default)]
    pub payment_status: PaymentStatus,
    pub created_at: mongodb::bson::DateTime,
}

/// Fields accepted from the application form, before an id is assigned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewApplicant {
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
}

/// Only applicants for [`SUBJECT_POSITION`] carry a subject.
fn subject_for(apply_for: &str, selected_subject: Option<String>) -> Option<String> {
    if apply_for == SUBJECT_POSITION {
        selected_subject.filter(|s| !s.trim().is_empty())
    } else {
        None
    }
}

impl NewApplicant {
    pub fn into_model(self, id: i64) -> ApplicantModel {
        let selected_subject = subject_for(&self.apply_for, self.selected_subject);

        ApplicantModel {
            id,
            name: self.name,
            phone: self.phone,
            email: self.email,
            address: self.address,
            nid: self.nid,
            last_degree: self.last_degree,
            subject: self.subject,
            apply_for: self.apply_for,
            selected_subject,
            cv_url: self.cv_url,
            photo_url: self.photo_url,
            payment_status: PaymentStatus::NotApproved,
            created_at: mongodb::bson::DateTime::now(),
        }
    }
}

/// Administrative edit of an existing record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantUpdate {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub apply_for: String,
    pub selected_subject: Option<String>,
    pub last_degree: String,
}

impl ApplicantUpdate {
    pub fn effective_subject(&self) -> Option<String> {
        subject_for(&self.apply_for, self.selected_subject.clone())
    }

    pub fn apply_to(&self, applicant: &mut ApplicantModel) {
        applicant.name = self.name.clone();
        applicant.phone = self.phone.clone();
        applicant.email = self.email.clone();
        applicant.apply_for = self.apply_for.clone();
        applicant.selected_subject = self.effective_subject();
        applicant.last_degree = self.last_degree.clone();
    }
}

pub async fn create_applicant_index(client: &Client, database: &str) {
    let options = IndexOptions::builder().unique(true).build();

    let model = IndexModel::builder()
        .keys(doc! { "id": 1 })
        .options(options)
        .build();

    if let Err(e) = client
        .database(database)
        .collection::<ApplicantModel>("applicants")
        .create_index(model, None)
        .await
    {
        error!("Failed to create index on id for applicants: {}", e);
    }
}
