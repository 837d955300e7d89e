use actix_multipart::Multipart;
use actix_web::{post, web, HttpResponse};
use futures_util::StreamExt;
use paperbrief_extract::is_pdf;
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::types::{parse_form_bool, SummaryResponse};

/// Upload a PDF, extract its text and summarize it
#[post("/upload-pdf/")]
pub async fn upload_pdf(
    mut payload: Multipart,
    state: web::Data<Arc<AppState>>,
) -> ApiResult<HttpResponse> {
    let mut saved_path = None;
    let mut use_gpt = false;

    while let Some(field) = payload.next().await {
        let mut field = field?;
        let content_disposition = field.content_disposition();
        let name = content_disposition.get_name().unwrap_or_default().to_string();
        let filename = content_disposition.get_filename().map(|f| f.to_string());

        match name.as_str() {
            "file" => {
                let filename = sanitize_filename(filename.as_deref().unwrap_or_default())
                    .ok_or_else(|| ApiError::bad_request("Only PDF Files are allowed."))?;
                if !is_pdf(Path::new(&filename)) {
                    return Err(ApiError::bad_request("Only PDF Files are allowed."));
                }

                let filepath = state.config.get_upload_path(&filename);
                let mut f = tokio::fs::File::create(&filepath).await?;
                while let Some(chunk) = field.next().await {
                    let data = chunk?;
                    f.write_all(&data).await?;
                }
                f.flush().await?;

                info!("Saved upload {} to {}", filename, filepath.display());
                saved_path = Some(filepath);
            }
            "use_gpt" => {
                let mut value = Vec::new();
                while let Some(chunk) = field.next().await {
                    value.extend_from_slice(&chunk?);
                }
                let value = String::from_utf8_lossy(&value);
                use_gpt = parse_form_bool(&value).ok_or_else(|| {
                    ApiError::bad_request(format!("Invalid boolean for use_gpt: {}", value))
                })?;
            }
            _ => {
                // Drain unknown fields
                while let Some(chunk) = field.next().await {
                    chunk?;
                }
            }
        }
    }

    let path = saved_path.ok_or_else(|| ApiError::bad_request("No file uploaded"))?;
    let summary = state.workflow.summarize_pdf(&path, use_gpt).await?;

    Ok(HttpResponse::Ok().json(SummaryResponse { summary }))
}

/// Keep only the final path component of a client-supplied name
pub fn sanitize_filename(name: &str) -> Option<String> {
    let last = name.rsplit(['/', '\\']).next()?.trim();
    if last.is_empty() || last == "." || last == ".." {
        return None;
    }
    Some(last.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("paper.pdf").as_deref(), Some("paper.pdf"));
        assert_eq!(sanitize_filename("../../etc/paper.pdf").as_deref(), Some("paper.pdf"));
        assert_eq!(sanitize_filename("C:\\docs\\scan.pdf").as_deref(), Some("scan.pdf"));
        assert_eq!(sanitize_filename("dir/"), None);
        assert_eq!(sanitize_filename(".."), None);
    }
}
