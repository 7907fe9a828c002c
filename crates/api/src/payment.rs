// payment.rs - opening checkouts and resolving gateway callbacks

use crate::error::ApiError;
use crate::fees::FeeTable;
use crate::gateway::{PaymentGateway, PaymentRequest};
use crate::token_gate::TokenGate;
use database::applicants::model::ApplicantModel;
use serde::Deserialize;
use tracing::{error, info};
use url::Url;

/// Obtains a token through the gate and opens a checkout for `request.amount`.
pub async fn initiate_payment(
    gate: &TokenGate,
    gateway: &dyn PaymentGateway,
    request: &PaymentRequest,
) -> Result<Url, ApiError> {
    let token = gate.ensure_valid_token().await?;

    let url = gateway
        .create_payment(&token.token, request)
        .await
        .map_err(|e| {
            error!("Create payment error: {}", e);
            ApiError::PaymentInitiation(e.to_string())
        })?;

    info!(
        "Payment of {} BDT opened for {}",
        request.amount, request.payer_reference
    );
    Ok(url)
}

// Fee resolution happens before any external call
pub fn payment_request_for(fees: &FeeTable, applicant: &ApplicantModel) -> Result<PaymentRequest, ApiError> {
    let amount = fees.resolve(&applicant.apply_for)?;

    Ok(PaymentRequest {
        amount,
        payer_reference: applicant.phone.clone(),
        invoice_number: format!("APP-{:06}", applicant.id),
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    #[serde(rename = "paymentID")]
    pub payment_id: Option<String>,
    pub status: Option<String>,
}

/// What the browser is told after returning from the gateway.
///
/// Advisory only: nothing here proves the fee was collected, so the
/// applicant's payment status is left for an administrator to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackOutcome {
    Success,
    Failure,
}

impl CallbackOutcome {
    pub fn from_status(status: Option<&str>) -> Self {
        match status.map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("success") => CallbackOutcome::Success,
            _ => CallbackOutcome::Failure,
        }
    }

    pub fn client_route(&self) -> &'static str {
        match self {
            CallbackOutcome::Success => "payment-success",
            CallbackOutcome::Failure => "payment-failure",
        }
    }

    pub fn redirect_location(&self, public_url: &str) -> String {
        format!("{}/#{}", public_url.trim_end_matches('/'), self.client_route())
    }
}
