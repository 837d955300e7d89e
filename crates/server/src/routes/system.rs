use actix_web::{get, HttpResponse};

use crate::types::MessageResponse;

/// Health check
#[get("/")]
pub async fn home() -> HttpResponse {
    HttpResponse::Ok().json(MessageResponse {
        message: "AI Research Platform is running!".to_string(),
    })
}
