use actix_web::{get, web, HttpResponse};
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::types::{ArxivSearchQuery, PapersResponse, SearchAndSummarizeQuery, MAX_RESULTS};

fn check_num_results(num_results: usize) -> ApiResult<()> {
    if !(1..=MAX_RESULTS).contains(&num_results) {
        return Err(ApiError::bad_request(format!(
            "num_results must be between 1 and {}",
            MAX_RESULTS
        )));
    }
    Ok(())
}

/// Fetch papers from arXiv
#[get("/search/arxiv/")]
pub async fn arxiv_search(
    query: web::Query<ArxivSearchQuery>,
    state: web::Data<Arc<AppState>>,
) -> ApiResult<HttpResponse> {
    check_num_results(query.num_results)?;

    let papers = state
        .workflow
        .search("arxiv", &query.query, query.num_results)
        .await?;

    Ok(HttpResponse::Ok().json(PapersResponse { papers }))
}

/// Search papers and summarize each one
#[get("/search-and-summarize/")]
pub async fn search_and_summarize(
    query: web::Query<SearchAndSummarizeQuery>,
    state: web::Data<Arc<AppState>>,
) -> ApiResult<HttpResponse> {
    check_num_results(query.num_results)?;

    let papers = state
        .workflow
        .search_and_summarize(&query.source, &query.query, query.num_results, query.use_gpt)
        .await?;

    Ok(HttpResponse::Ok().json(PapersResponse { papers }))
}
