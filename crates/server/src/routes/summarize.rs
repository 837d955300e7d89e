use actix_web::{post, web, HttpResponse};
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::types::{SummarizationRequest, SummaryResponse};

/// Summarize pasted text
#[post("/summarize")]
pub async fn summarize(
    request: web::Json<SummarizationRequest>,
    state: web::Data<Arc<AppState>>,
) -> ApiResult<HttpResponse> {
    if request.text.is_empty() {
        return Err(ApiError::bad_request("Text cannot be empty"));
    }

    let summary = state
        .workflow
        .summarize_text(&request.text, request.use_gpt)
        .await?;

    Ok(HttpResponse::Ok().json(SummaryResponse { summary }))
}
