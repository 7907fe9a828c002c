// client.rs - HTTP client for the portal API

use crate::adapter::ApplicantRecord;
use crate::error::{PortalError, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Client as HttpClient, Response};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Position whose applicants pick a subject.
pub const SUBJECT_POSITION: &str = "Assistant Teacher";

#[derive(Debug, Clone)]
pub struct Document {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct ApplicationForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub nid: String,
    pub last_degree: String,
    pub subject: String,
    pub apply_for: String,
    pub selected_subject: Option<String>,
    pub cv: Option<Document>,
    pub photo: Option<Document>,
}

impl ApplicationForm {
    fn into_multipart(self) -> Form {
        let mut form = Form::new()
            .text("name", self.name)
            .text("phone", self.phone)
            .text("email", self.email)
            .text("address", self.address)
            .text("nid", self.nid)
            .text("lastDegree", self.last_degree)
            .text("subject", self.subject);

        if self.apply_for == SUBJECT_POSITION {
            if let Some(subject) = self.selected_subject {
                form = form.text("selectedSubject", subject);
            }
        }
        form = form.text("applyFor", self.apply_for);

        if let Some(cv) = self.cv {
            form = form.part("cv", Part::bytes(cv.bytes).file_name(cv.file_name));
        }
        if let Some(photo) = self.photo {
            form = form.part("photo", Part::bytes(photo.bytes).file_name(photo.file_name));
        }
        form
    }
}

#[derive(Deserialize)]
struct Envelope<T> {
    success: bool,
    data: T,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct CreatePaymentResponse {
    #[serde(rename = "bkashURL")]
    bkash_url: String,
}

pub struct PortalClient {
    http: HttpClient,
    base_url: String,
}

impl PortalClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn rejected(response: Response) -> PortalError {
        let status = response.status();
        let message = response
            .json::<ErrorBody>()
            .await
            .map(|b| b.message)
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());
        PortalError::Rejected {
            status: status.as_u16(),
            message,
        }
    }

    /// Submits the application and returns the stored record.
    pub async fn submit_application(&self, form: ApplicationForm) -> Result<ApplicantRecord> {
        let url = format!("{}/api/apply", self.base_url);
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .multipart(form.into_multipart())
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::rejected(response).await);
        }

        let envelope: Envelope<ApplicantRecord> = response
            .json()
            .await
            .map_err(|e| PortalError::InvalidResponse(e.to_string()))?;
        if !envelope.success {
            return Err(PortalError::InvalidResponse(envelope.message));
        }
        info!("Application accepted with id {}", envelope.data.id);
        Ok(envelope.data)
    }

    /// Asks the backend for a checkout URL to send the browser to.
    pub async fn create_payment(&self, applicant_id: i64) -> Result<Url> {
        let url = format!("{}/api/bkash/create", self.base_url);
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "applicantId": applicant_id }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::rejected(response).await);
        }

        let body: CreatePaymentResponse = response
            .json()
            .await
            .map_err(|e| PortalError::InvalidResponse(e.to_string()))?;
        Url::parse(&body.bkash_url).map_err(|e| PortalError::InvalidResponse(e.to_string()))
    }
}
