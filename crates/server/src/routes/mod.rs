use actix_web::{error, web};

use crate::error::ApiError;

pub mod search;
pub mod summarize;
pub mod system;
pub mod upload;

/// Register all routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        error::Error::from(ApiError::bad_request(err.to_string()))
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        error::Error::from(ApiError::bad_request(err.to_string()))
    }))
    .service(system::home)
    .service(summarize::summarize)
    .service(upload::upload_pdf)
    .service(search::arxiv_search)
    .service(search::search_and_summarize);
}
