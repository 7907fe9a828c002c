// utils.rs - utility functions used across modules

use actix_web::{http::StatusCode, HttpResponse};
use serde::Serialize;

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    success: bool,
    data: T,
    message: &'a str,
}

// Wraps a payload in the { success, data, message } envelope the frontend expects
pub fn response<T: Serialize>(status: StatusCode, success: bool, data: T, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(Envelope {
        success,
        data,
        message,
    })
}
