// routes.rs - API routes for applications, administration and bKash payments

use super::config::Config;
use super::error::ApiError;
use super::models::{
    ApplicantResponse, CreatePayment, CreatePaymentResponse, Message, StatusUpdate, TokenStatus,
};
use super::payment::{initiate_payment, payment_request_for, CallbackOutcome, CallbackQuery};
use super::upload::{discard_files, read_application};
use super::utils::response;
use actix_multipart::Multipart;
use actix_web::{
    delete, get,
    http::{header::LOCATION, StatusCode},
    patch, post, put,
    web::{Data, Json, Path, Query, ServiceConfig},
    HttpResponse,
};
use database::applicants::{filter::ApplicantFilter, model::ApplicantUpdate};
use tracing::{debug, info, warn};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(apply)
        .service(list_applicants)
        .service(update_status)
        .service(update_applicant)
        .service(delete_applicant)
        .service(create_payment)
        .service(callback)
        .service(token_status);
}

#[tracing::instrument(
    name = "/api/apply - Stores a submitted application and its files",
    skip(config, payload)
)]
#[post("/api/apply")]
pub async fn apply(config: Data<Config>, payload: Multipart) -> Result<HttpResponse, ApiError> {
    let applicant = read_application(payload, &config.uploads_dir).await?;
    info!(
        "Received application from {} for {}",
        applicant.name, applicant.apply_for
    );

    let files: Vec<String> = applicant
        .cv_url
        .iter()
        .chain(applicant.photo_url.iter())
        .cloned()
        .collect();
    let stored = match config.applicants.insert(applicant).await {
        Ok(stored) => stored,
        Err(e) => {
            discard_files(&config.uploads_dir, &files).await;
            return Err(e.into());
        }
    };
    debug!("Applicant stored with id {}", stored.id);

    Ok(response(
        StatusCode::CREATED,
        true,
        ApplicantResponse::from(stored),
        "Application received",
    ))
}

#[tracing::instrument(name = "/api/applicants - Lists applicants, newest first", skip(config))]
#[get("/api/applicants")]
pub async fn list_applicants(
    config: Data<Config>,
    filter: Query<ApplicantFilter>,
) -> Result<HttpResponse, ApiError> {
    let applicants = filter.apply(config.applicants.list().await?);
    debug!("Returning {} applicants", applicants.len());

    let body: Vec<ApplicantResponse> = applicants.into_iter().map(ApplicantResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[tracing::instrument(
    name = "/api/applicants/{id}/status - Updates the payment status of an applicant",
    skip(config)
)]
#[patch("/api/applicants/{id}/status")]
pub async fn update_status(
    config: Data<Config>,
    id: Path<i64>,
    req_data: Json<StatusUpdate>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();
    let status = req_data.payment_status;

    if !config.applicants.set_payment_status(id, status).await? {
        return Err(ApiError::NotFound(format!("Applicant {}", id)));
    }

    info!("Applicant {} payment status set to {}", id, status.as_str());
    Ok(HttpResponse::Ok().json(Message::new("Status updated")))
}

#[tracing::instrument(name = "/api/applicants/{id} - Edits an applicant", skip(config))]
#[put("/api/applicants/{id}")]
pub async fn update_applicant(
    config: Data<Config>,
    id: Path<i64>,
    req_data: Json<ApplicantUpdate>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();

    if !config.applicants.update(id, &req_data).await? {
        return Err(ApiError::NotFound(format!("Applicant {}", id)));
    }

    info!("Applicant {} updated", id);
    Ok(HttpResponse::Ok().json(Message::new("Updated successfully")))
}

#[tracing::instrument(name = "/api/applicants/{id} - Deletes an applicant", skip(config))]
#[delete("/api/applicants/{id}")]
pub async fn delete_applicant(config: Data<Config>, id: Path<i64>) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();

    if !config.applicants.delete(id).await? {
        return Err(ApiError::NotFound(format!("Applicant {}", id)));
    }

    info!("Applicant {} deleted", id);
    Ok(HttpResponse::Ok().json(Message::new("Deleted successfully")))
}

#[tracing::instrument(
    name = "/api/bkash/create - Opens a bKash checkout for an applicant's fee",
    skip(config)
)]
#[post("/api/bkash/create")]
pub async fn create_payment(
    config: Data<Config>,
    req_data: Json<CreatePayment>,
) -> Result<HttpResponse, ApiError> {
    let applicant = config
        .applicants
        .get(req_data.applicant_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Applicant {}", req_data.applicant_id)))?;

    let request = payment_request_for(&config.fees, &applicant)?;
    let url = initiate_payment(&config.token_gate, config.gateway.as_ref(), &request).await?;

    Ok(HttpResponse::Ok().json(CreatePaymentResponse {
        bkash_url: url.to_string(),
    }))
}

#[tracing::instrument(
    name = "/api/bkash/callback - Sends the browser back to the portal after checkout",
    skip(config)
)]
#[get("/api/bkash/callback")]
pub async fn callback(config: Data<Config>, query: Query<CallbackQuery>) -> HttpResponse {
    let outcome = CallbackOutcome::from_status(query.status.as_deref());

    match outcome {
        CallbackOutcome::Success => warn!(
            "bKash reported success for payment {:?}; not verified, status left for manual approval",
            query.payment_id
        ),
        CallbackOutcome::Failure => info!(
            "bKash reported {:?} for payment {:?}",
            query.status, query.payment_id
        ),
    }

    HttpResponse::Found()
        .insert_header((LOCATION, outcome.redirect_location(&config.public_url)))
        .finish()
}

#[tracing::instrument(
    name = "/api/bkash/token-status - Reports whether the cached gateway token is usable",
    skip(config)
)]
#[get("/api/bkash/token-status")]
pub async fn token_status(config: Data<Config>) -> Result<HttpResponse, ApiError> {
    let token = config
        .tokens
        .current_token()
        .await?
        .ok_or_else(|| ApiError::NotFound("No token found in database.".to_string()))?;

    let now = config.token_gate.now();
    let remaining = ((token.expires_at - now).num_seconds() as f64 / 60.0).round() as i64;

    Ok(HttpResponse::Ok().json(TokenStatus {
        expires_at: token.expires_at,
        is_valid: token.is_valid_at(now),
        minutes_remaining: remaining.max(0),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_config, FakeGateway, UnavailableApplicants};
    use actix_web::{test, App};
    use chrono::{Duration, Utc};
    use database::applicants::model::{NewApplicant, PaymentStatus};
    use database::memory::InMemoryStore;
    use database::store::{ApplicantStore, TokenStore};
    use database::tokens::model::AuthToken;
    use std::sync::Arc;

    const BOUNDARY: &str = "----portal-test-boundary";

    fn multipart_body(fields: &[(&str, &str)], files: &[(&str, &str, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                    BOUNDARY, name, value
                )
                .as_bytes(),
            );
        }
        for (name, file_name, bytes) in files {
            body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                    BOUNDARY, name, file_name
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    fn apply_request(fields: &[(&str, &str)], files: &[(&str, &str, &[u8])]) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/api/apply")
            .insert_header((
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            ))
            .set_payload(multipart_body(fields, files))
    }

    const FORM: [(&str, &str); 8] = [
        ("name", "Ayesha Siddika"),
        ("phone", "01700000042"),
        ("email", "ayesha@example.com"),
        ("address", "Sylhet"),
        ("nid", "1990123456"),
        ("lastDegree", "Honors/Fazil"),
        ("applyFor", "Assistant Teacher"),
        ("selectedSubject", "English"),
    ];

    async fn seed(store: &InMemoryStore, name: &str, apply_for: &str) -> i64 {
        store
            .insert(NewApplicant {
                name: name.to_string(),
                phone: "01800000000".to_string(),
                apply_for: apply_for.to_string(),
                ..Default::default()
            })
            .await
            .unwrap()
            .id
    }

    #[actix_web::test]
    async fn apply_stores_applicant_and_cv() {
        let uploads = tempfile::tempdir().unwrap();
        let store = InMemoryStore::new();
        let config = test_config(&store, Arc::new(FakeGateway::new()), uploads.path());
        let app = test::init_service(App::new().app_data(Data::new(config)).configure(configure)).await;

        let req = apply_request(&FORM, &[("cv", "cv.pdf", &b"%PDF-1.4 test"[..])]).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["id"], 1);
        assert_eq!(body["data"]["applyFor"], "Assistant Teacher");
        assert_eq!(body["data"]["selectedSubject"], "English");
        assert_eq!(body["data"]["paymentStatus"], "Not Approved");

        let stored = store.get(1).await.unwrap().unwrap();
        let cv = stored.cv_url.unwrap();
        assert!(cv.ends_with("-cv.pdf"));
        assert_eq!(
            std::fs::read(uploads.path().join(cv)).unwrap(),
            b"%PDF-1.4 test".to_vec()
        );
    }

    #[actix_web::test]
    async fn apply_removes_saved_files_when_the_store_fails() {
        let uploads = tempfile::tempdir().unwrap();
        let store = InMemoryStore::new();
        let mut config = test_config(&store, Arc::new(FakeGateway::new()), uploads.path());
        config.applicants = Arc::new(UnavailableApplicants);
        let app = test::init_service(App::new().app_data(Data::new(config)).configure(configure)).await;

        let req = apply_request(
            &FORM,
            &[
                ("cv", "cv.pdf", &b"%PDF-1.4 test"[..]),
                ("photo", "me.png", &b"png"[..]),
            ],
        )
        .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let left = std::fs::read_dir(uploads.path()).unwrap().count();
        assert_eq!(left, 0);
    }

    #[actix_web::test]
    async fn apply_rejects_unsupported_cv() {
        let uploads = tempfile::tempdir().unwrap();
        let store = InMemoryStore::new();
        let config = test_config(&store, Arc::new(FakeGateway::new()), uploads.path());
        let app = test::init_service(App::new().app_data(Data::new(config)).configure(configure)).await;

        let req = apply_request(&FORM, &[("cv", "cv.txt", &b"plain"[..])]).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn apply_requires_position() {
        let uploads = tempfile::tempdir().unwrap();
        let store = InMemoryStore::new();
        let config = test_config(&store, Arc::new(FakeGateway::new()), uploads.path());
        let app = test::init_service(App::new().app_data(Data::new(config)).configure(configure)).await;

        let req = apply_request(&[("name", "No Position"), ("phone", "017")], &[]).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn admin_routes_list_update_and_delete() {
        let uploads = tempfile::tempdir().unwrap();
        let store = InMemoryStore::new();
        let first = seed(&store, "Karim", "Teacher Assistant").await;
        let second = seed(&store, "Selina", "Assistant Teacher").await;
        let config = test_config(&store, Arc::new(FakeGateway::new()), uploads.path());
        let app = test::init_service(App::new().app_data(Data::new(config)).configure(configure)).await;

        let req = test::TestRequest::get().uri("/api/applicants").to_request();
        let listed: Vec<ApplicantResponse> = test::call_and_read_body_json(&app, req).await;
        let ids: Vec<i64> = listed.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![second, first]);

        let req = test::TestRequest::get()
            .uri("/api/applicants?role=Teacher%20Assistant&subject=All")
            .to_request();
        let filtered: Vec<ApplicantResponse> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Karim");

        let req = test::TestRequest::patch()
            .uri(&format!("/api/applicants/{}/status", first))
            .set_json(serde_json::json!({ "paymentStatus": "Approved" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        assert_eq!(
            store.get(first).await.unwrap().unwrap().payment_status,
            PaymentStatus::Approved
        );

        let req = test::TestRequest::put()
            .uri(&format!("/api/applicants/{}", second))
            .set_json(serde_json::json!({
                "name": "Selina Begum",
                "phone": "01900000000",
                "email": "selina@example.com",
                "applyFor": "Assistant Teacher",
                "selectedSubject": "Bangla",
                "lastDegree": "Masters/Kamil"
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        let edited = store.get(second).await.unwrap().unwrap();
        assert_eq!(edited.name, "Selina Begum");
        assert_eq!(edited.selected_subject.as_deref(), Some("Bangla"));

        let req = test::TestRequest::delete()
            .uri(&format!("/api/applicants/{}", first))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/applicants/{}", first))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn create_payment_returns_gateway_url() {
        let uploads = tempfile::tempdir().unwrap();
        let store = InMemoryStore::new();
        let id = seed(&store, "Karim", "Teacher Assistant").await;
        let gateway = Arc::new(FakeGateway::new());
        let config = test_config(&store, gateway.clone(), uploads.path());
        let app = test::init_service(App::new().app_data(Data::new(config)).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/bkash/create")
            .set_json(serde_json::json!({ "applicantId": id }))
            .to_request();
        let body: CreatePaymentResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.bkash_url, "https://sandbox.bka.sh/checkout?invoice=APP-000001");
        assert_eq!(gateway.grant_calls(), 1);
        assert_eq!(gateway.created()[0].1.amount, 200);
    }

    #[actix_web::test]
    async fn create_payment_for_unknown_position_makes_no_external_call() {
        let uploads = tempfile::tempdir().unwrap();
        let store = InMemoryStore::new();
        let id = seed(&store, "Rafiq", "Night Guard").await;
        let gateway = Arc::new(FakeGateway::new());
        let config = test_config(&store, gateway.clone(), uploads.path());
        let app = test::init_service(App::new().app_data(Data::new(config)).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/bkash/create")
            .set_json(serde_json::json!({ "applicantId": id }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(gateway.grant_calls(), 0);
        assert!(gateway.created().is_empty());
    }

    #[actix_web::test]
    async fn create_payment_surfaces_authentication_failure() {
        let uploads = tempfile::tempdir().unwrap();
        let store = InMemoryStore::new();
        let id = seed(&store, "Karim", "Teacher Assistant").await;
        let gateway = Arc::new(FakeGateway::new().failing_grant());
        let config = test_config(&store, gateway.clone(), uploads.path());
        let app = test::init_service(App::new().app_data(Data::new(config)).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/bkash/create")
            .set_json(serde_json::json!({ "applicantId": id }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::post()
            .uri("/api/bkash/create")
            .set_json(serde_json::json!({ "applicantId": 999 }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn callback_redirects_to_terminal_views_without_touching_status() {
        let uploads = tempfile::tempdir().unwrap();
        let store = InMemoryStore::new();
        let id = seed(&store, "Karim", "Teacher Assistant").await;
        let config = test_config(&store, Arc::new(FakeGateway::new()), uploads.path());
        let app = test::init_service(App::new().app_data(Data::new(config)).configure(configure)).await;

        let req = test::TestRequest::get()
            .uri("/api/bkash/callback?paymentID=TR001&status=success")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get(LOCATION).unwrap(),
            "http://localhost:5173/#payment-success"
        );

        let req = test::TestRequest::get()
            .uri("/api/bkash/callback?paymentID=TR002&status=cancel")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(
            resp.headers().get(LOCATION).unwrap(),
            "http://localhost:5173/#payment-failure"
        );

        let applicant = store.get(id).await.unwrap().unwrap();
        assert_eq!(applicant.payment_status, PaymentStatus::NotApproved);
    }

    #[actix_web::test]
    async fn token_status_reports_remaining_minutes() {
        let uploads = tempfile::tempdir().unwrap();
        let store = InMemoryStore::new();
        let config = test_config(&store, Arc::new(FakeGateway::new()), uploads.path());
        let app = test::init_service(App::new().app_data(Data::new(config)).configure(configure)).await;

        let req = test::TestRequest::get().uri("/api/bkash/token-status").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let now = Utc::now();
        store
            .save_token(&AuthToken {
                token: "secret-token".to_string(),
                issued_at: now,
                expires_at: now + Duration::minutes(30),
            })
            .await
            .unwrap();

        let req = test::TestRequest::get().uri("/api/bkash/token-status").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = test::read_body(resp).await;
        assert!(!String::from_utf8_lossy(&body).contains("secret-token"));

        let status: TokenStatus = serde_json::from_slice(&body).unwrap();
        assert!(status.is_valid);
        assert!((29..=30).contains(&status.minutes_remaining));
    }
}
